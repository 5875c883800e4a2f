use crate::prelude::*;

use crate::users::{
	domain::events::{UserRegisteredEvent, UserVotedEvent},
	error::UsersError,
	notification::{Notification, SharedNotifier},
};

pub struct SendVoteNotificationEventHandler {
	notifier: SharedNotifier,
}

impl SendVoteNotificationEventHandler {
	pub fn new(notifier: SharedNotifier) -> Self {
		Self { notifier }
	}
}

#[async_trait]
impl TEventHandler<UsersError> for SendVoteNotificationEventHandler {
	type Event = UserVotedEvent;

	async fn handle(&self, event: &UserVotedEvent) -> Result<(), UsersError> {
		self.notifier.send(Notification::Vote(event.clone()));
		Ok(())
	}
}

pub struct SendRegistrationNotificationEventHandler {
	notifier: SharedNotifier,
}

impl SendRegistrationNotificationEventHandler {
	pub fn new(notifier: SharedNotifier) -> Self {
		Self { notifier }
	}
}

#[async_trait]
impl TEventHandler<UsersError> for SendRegistrationNotificationEventHandler {
	type Event = UserRegisteredEvent;

	async fn handle(&self, event: &UserRegisteredEvent) -> Result<(), UsersError> {
		self.notifier.send(Notification::Registration(event.clone()));
		Ok(())
	}
}
