//! Outbound notifications. Delivery is fire-and-forget: handlers hand the message over and move on.

use crate::prelude::*;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::domain::events::{UserRegisteredEvent, UserVotedEvent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
	Registration(UserRegisteredEvent),
	Vote(UserVotedEvent),
}

impl Notification {
	pub fn recipient(&self) -> &str {
		match self {
			Self::Registration(event) => &event.email,
			Self::Vote(event) => &event.voted_for_user_email,
		}
	}
}

pub trait TNotifier: Send + Sync {
	/// Hand over `notification` for delivery. Must not block on delivery.
	fn send(&self, notification: Notification);
}

pub type SharedNotifier = Arc<dyn TNotifier>;

/// Writes notifications to the log.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl TNotifier for TracingNotifier {
	fn send(&self, notification: Notification) {
		match serde_json::to_string(&notification) {
			Ok(payload) => tracing::info!("notify {}: {}", notification.recipient(), payload),
			Err(err) => tracing::error!("unserializable notification for {}: {}", notification.recipient(), err),
		}
	}
}

/// Queues notifications for a delivery worker on the other end of the channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier(UnboundedSender<Notification>);

impl ChannelNotifier {
	pub fn new() -> (Self, UnboundedReceiver<Notification>) {
		let (tx, rx) = unbounded_channel();
		(Self(tx), rx)
	}
}

impl TNotifier for ChannelNotifier {
	fn send(&self, notification: Notification) {
		if let Err(err) = self.0.send(notification) {
			tracing::warn!("notification dropped, no delivery worker: {}", err.0.recipient());
		}
	}
}
