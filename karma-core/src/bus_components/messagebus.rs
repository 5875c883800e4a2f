//! # Message Bus
//! Runs one message and every event it transitively produces, in FIFO order.
//!
//! After each handler invocation the unit of work's staged events are drained to the tail of
//! the queue, so events raised by one handler are processed before those of the next message.
//! A bus is built per operation by [Bootstrap](super::bootstrap::Bootstrap) and is not shared
//! between operations.
//!
//! ### example
//! ```ignore
//! let mut bus = users::messagebus(uow, notifier, &config)?;
//! let res = bus.execute(VoteForUserCommand { voted_for_user_id: 2, voting_user_id: 1, liked: true, disliked: false }).await?;
//! ```

use super::handler::{BoxedCommandHandler, BoxedEventHandler};
use crate::{
	message::{Message, TCommand, TEvent},
	responses::{ApplicationError, ApplicationResponse, BaseError},
	unit_of_work::{AtomicUnitOfWork, TUnitOfWork},
};
use hashbrown::HashMap;
use std::{
	any::{Any, TypeId},
	collections::VecDeque,
	sync::Arc,
};

pub type EventHandlers<E> = HashMap<TypeId, Vec<BoxedEventHandler<E>>>;
pub type CommandHandlers<R, E> = HashMap<TypeId, BoxedCommandHandler<R, E>>;

pub struct MessageBus<U, R, E> {
	uow: AtomicUnitOfWork<U>,
	event_handlers: EventHandlers<E>,
	command_handlers: CommandHandlers<R, E>,
	queue: VecDeque<Message>,
	command_result: Option<R>,
	max_iterations: usize,
}

impl<U, R, E> MessageBus<U, R, E>
where
	U: TUnitOfWork + 'static,
	R: ApplicationResponse,
	E: ApplicationError + From<BaseError>,
{
	pub const DEFAULT_MAX_ITERATIONS: usize = 1024;

	pub fn new(uow: AtomicUnitOfWork<U>, event_handlers: EventHandlers<E>, command_handlers: CommandHandlers<R, E>) -> Self {
		Self {
			uow,
			event_handlers,
			command_handlers,
			queue: VecDeque::new(),
			command_result: None,
			max_iterations: Self::DEFAULT_MAX_ITERATIONS,
		}
	}

	/// Upper bound of messages processed by one `handle` call.
	pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
		self.max_iterations = max_iterations;
		self
	}

	pub fn uow(&self) -> AtomicUnitOfWork<U> {
		Arc::clone(&self.uow)
	}

	/// Process `message` and everything it causes until the queue drains.
	///
	/// The first failure stops the dispatch: remaining messages and staged events are dropped
	/// and the error is returned as the handler produced it.
	pub async fn handle(&mut self, message: impl Into<Message>) -> Result<(), E> {
		self.queue.clear();
		self.command_result = None;
		self.queue.push_back(message.into());

		let result = self.process().await;
		if let Err(err) = &result {
			tracing::error!("dispatch aborted: {}", err);
			let dropped = self.queue.len() + self.uow.write().await.get_events().len();
			self.queue.clear();
			if dropped > 0 {
				tracing::warn!("dropped {} pending message(s)", dropped);
			}
		}
		result
	}

	/// Handle `command` and hand back its handler's result.
	pub async fn execute(&mut self, command: impl TCommand) -> Result<R, E> {
		self.handle(Message::command(command)).await?;
		self.take_command_result().ok_or_else(|| BaseError::NoCommandResult.into())
	}

	/// Result of the command processed by the last `handle` call, if any.
	pub fn command_result(&self) -> Option<&R> {
		self.command_result.as_ref()
	}

	pub fn take_command_result(&mut self) -> Option<R> {
		self.command_result.take()
	}

	async fn process(&mut self) -> Result<(), E> {
		let mut processed = 0;
		while let Some(message) = self.queue.pop_front() {
			if processed == self.max_iterations {
				tracing::error!("message bus exceeded {} messages; the last handlers keep re-emitting events", self.max_iterations);
				return Err(BaseError::IterationLimitExceeded(self.max_iterations).into());
			}
			processed += 1;

			tracing::info!("Processing {}...", message.topic());
			match message {
				Message::Command(command) => self.dispatch_command(command).await?,
				Message::Event(event) => self.dispatch_event(event).await?,
			}
		}
		Ok(())
	}

	async fn dispatch_command(&mut self, command: Box<dyn TCommand>) -> Result<(), E> {
		let Some(handler) = self.command_handlers.get(&Any::type_id((*command).as_any())) else {
			tracing::error!("Unprocessable Command Given! {:?}", command);
			return Err(BaseError::CommandHandlerNotFound(command.topic()).into());
		};
		self.command_result = Some(handler.handle_message(command).await?);
		Self::collect_events(&self.uow, &mut self.queue).await;
		Ok(())
	}

	async fn dispatch_event(&mut self, event: Arc<dyn TEvent>) -> Result<(), E> {
		let Some(handlers) = self.event_handlers.get(&Any::type_id((*event).as_any())) else {
			tracing::error!("Unprocessable Event Given! {:?}", event);
			return Err(BaseError::EventHandlerNotFound(event.topic()).into());
		};
		for (i, handler) in handlers.iter().enumerate() {
			tracing::debug!("{} handler #{}", event.topic(), i);
			handler.handle_message(Arc::clone(&event)).await?;
			Self::collect_events(&self.uow, &mut self.queue).await;
		}
		Ok(())
	}

	async fn collect_events(uow: &AtomicUnitOfWork<U>, queue: &mut VecDeque<Message>) {
		let events = uow.write().await.get_events();
		queue.extend(events.into_iter().map(Message::Event));
	}
}
