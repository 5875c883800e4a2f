use downcast_rs::{impl_downcast, Downcast};
use std::{fmt::Debug, sync::Arc};

/// Anything the message bus can carry.
///
/// `topic` is the stable name of the message type. It is used for logging and in lookup errors;
/// routing itself goes by the concrete type.
pub trait TMessage: Downcast + Send + Sync + Debug {
	fn topic(&self) -> &'static str;
}
impl_downcast!(TMessage);

/// An intent to change state. Exactly one handler owns a command type and produces its result.
pub trait TCommand: TMessage {}
impl_downcast!(TCommand);

/// A fact that already happened. Dispatched to zero or more handlers; produces no result.
pub trait TEvent: TMessage {}
impl_downcast!(TEvent);

/// What the bus queues.
///
/// Commands are consumed by their handler, events are shared between all handlers registered for them.
#[derive(Debug)]
pub enum Message {
	Command(Box<dyn TCommand>),
	Event(Arc<dyn TEvent>),
}

impl Message {
	pub fn command(command: impl TCommand) -> Self {
		Self::Command(Box::new(command))
	}

	pub fn event(event: impl TEvent) -> Self {
		Self::Event(Arc::new(event))
	}

	pub fn topic(&self) -> &'static str {
		match self {
			Self::Command(command) => command.topic(),
			Self::Event(event) => event.topic(),
		}
	}
}

impl From<Arc<dyn TEvent>> for Message {
	fn from(value: Arc<dyn TEvent>) -> Self {
		Self::Event(value)
	}
}

impl From<Box<dyn TCommand>> for Message {
	fn from(value: Box<dyn TCommand>) -> Self {
		Self::Command(value)
	}
}
