//! ### Bootstrap
//! Composition root of one dispatch. It binds a unit of work and a pool of named dependencies
//! to the handler registries and builds a [MessageBus] out of them.
//!
//! ```ignore
//! let events = EventHandlersForInjection::new()
//!     .event(|deps| Ok(SendVoteNotificationEventHandler::new(deps.get("notifier")?)));
//! let commands = CommandHandlersForInjection::new()
//!     .command(|deps| Ok(VoteForUserCommandHandler::new(deps.uow())));
//!
//! let mut bus = Bootstrap::new(uow, events, commands)
//!     .with_dependency("notifier", notifier)
//!     .get_messagebus()?;
//! ```

use super::{
	dependencies::Dependencies,
	handler::{BoxedCommandHandler, BoxedEventHandler, TCommandHandler, TEventHandler},
	messagebus::{CommandHandlers, EventHandlers, MessageBus},
};
use crate::{
	message::TEvent,
	responses::{ApplicationError, ApplicationResponse, BaseError},
	unit_of_work::{AtomicUnitOfWork, TUnitOfWork},
};
use hashbrown::HashMap;
use std::{
	any::{type_name, Any, TypeId},
	sync::Arc,
};

type Factory<U, H> = Arc<dyn Fn(&Dependencies<U>) -> Result<H, BaseError> + Send + Sync>;

struct Registered<T> {
	topic: &'static str,
	entry: T,
}

impl<T: Clone> Clone for Registered<T> {
	fn clone(&self) -> Self {
		Self {
			topic: self.topic,
			entry: self.entry.clone(),
		}
	}
}

/// Event type to its handler factories, in invocation order.
pub struct EventHandlersForInjection<U, E> {
	handlers: HashMap<TypeId, Registered<Vec<Factory<U, BoxedEventHandler<E>>>>>,
}

impl<U, E> Clone for EventHandlersForInjection<U, E> {
	fn clone(&self) -> Self {
		Self { handlers: self.handlers.clone() }
	}
}

impl<U, E> Default for EventHandlersForInjection<U, E> {
	fn default() -> Self {
		Self { handlers: HashMap::new() }
	}
}

impl<U, E> EventHandlersForInjection<U, E>
where
	U: Send + Sync + 'static,
	E: ApplicationError + From<BaseError>,
{
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a handler for `H::Event`. Handlers run in the order they were registered.
	pub fn event<H, F>(mut self, factory: F) -> Self
	where
		H: TEventHandler<E>,
		F: Fn(&Dependencies<U>) -> Result<H, BaseError> + Send + Sync + 'static,
	{
		self.entry::<H::Event>().push(Arc::new(move |deps: &Dependencies<U>| -> Result<BoxedEventHandler<E>, BaseError> { Ok(Box::new(factory(deps)?)) }));
		self
	}

	/// Known event with no handler yet. Dispatching it is a no-op rather than a lookup error.
	pub fn declare<Ev: TEvent>(mut self) -> Self {
		self.entry::<Ev>();
		self
	}

	pub fn handler_count<Ev: TEvent>(&self) -> Option<usize> {
		self.handlers.get(&TypeId::of::<Ev>()).map(|registered| registered.entry.len())
	}

	fn entry<Ev: TEvent>(&mut self) -> &mut Vec<Factory<U, BoxedEventHandler<E>>> {
		&mut self
			.handlers
			.entry(TypeId::of::<Ev>())
			.or_insert_with(|| Registered {
				topic: type_name::<Ev>(),
				entry: vec![],
			})
			.entry
	}

	fn build(&self, deps: &Dependencies<U>) -> Result<EventHandlers<E>, BaseError> {
		self.handlers
			.iter()
			.map(|(type_id, registered)| {
				tracing::debug!("injecting {} handler(s) for {}", registered.entry.len(), registered.topic);
				let handlers = registered.entry.iter().map(|factory| factory(deps)).collect::<Result<Vec<_>, _>>()?;
				Ok((*type_id, handlers))
			})
			.collect()
	}
}

/// Command type to the single factory of its handler.
pub struct CommandHandlersForInjection<U, R, E> {
	handlers: HashMap<TypeId, Registered<Factory<U, BoxedCommandHandler<R, E>>>>,
}

impl<U, R, E> Clone for CommandHandlersForInjection<U, R, E> {
	fn clone(&self) -> Self {
		Self { handlers: self.handlers.clone() }
	}
}

impl<U, R, E> Default for CommandHandlersForInjection<U, R, E> {
	fn default() -> Self {
		Self { handlers: HashMap::new() }
	}
}

impl<U, R, E> CommandHandlersForInjection<U, R, E>
where
	U: Send + Sync + 'static,
	R: ApplicationResponse,
	E: ApplicationError + From<BaseError>,
{
	pub fn new() -> Self {
		Self::default()
	}

	/// Register the handler of `H::Command`, replacing a previous registration.
	pub fn command<H, F>(mut self, factory: F) -> Self
	where
		H: TCommandHandler<R, E>,
		F: Fn(&Dependencies<U>) -> Result<H, BaseError> + Send + Sync + 'static,
	{
		let topic = type_name::<H::Command>();
		let registered = Registered {
			topic,
			entry: Arc::new(move |deps: &Dependencies<U>| -> Result<BoxedCommandHandler<R, E>, BaseError> { Ok(Box::new(factory(deps)?)) }) as Factory<U, BoxedCommandHandler<R, E>>,
		};
		if self.handlers.insert(TypeId::of::<H::Command>(), registered).is_some() {
			tracing::warn!("command handler for {} registered twice; the last one wins", topic);
		}
		self
	}

	pub fn contains<C: Any>(&self) -> bool {
		self.handlers.contains_key(&TypeId::of::<C>())
	}

	fn build(&self, deps: &Dependencies<U>) -> Result<CommandHandlers<R, E>, BaseError> {
		self.handlers
			.iter()
			.map(|(type_id, registered)| {
				tracing::debug!("injecting handler for {}", registered.topic);
				Ok((*type_id, (registered.entry)(deps)?))
			})
			.collect()
	}
}

pub struct Bootstrap<U, R, E> {
	dependencies: Dependencies<U>,
	event_handlers: EventHandlersForInjection<U, E>,
	command_handlers: CommandHandlersForInjection<U, R, E>,
	max_iterations: usize,
}

impl<U, R, E> Bootstrap<U, R, E>
where
	U: TUnitOfWork + 'static,
	R: ApplicationResponse,
	E: ApplicationError + From<BaseError>,
{
	pub fn new(uow: AtomicUnitOfWork<U>, event_handlers: EventHandlersForInjection<U, E>, command_handlers: CommandHandlersForInjection<U, R, E>) -> Self {
		Self {
			dependencies: Dependencies::new(uow),
			event_handlers,
			command_handlers,
			max_iterations: MessageBus::<U, R, E>::DEFAULT_MAX_ITERATIONS,
		}
	}

	pub fn with_dependency<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
		self.dependencies.insert(name, value);
		self
	}

	pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
		self.max_iterations = max_iterations;
		self
	}

	pub fn dependencies(&self) -> &Dependencies<U> {
		&self.dependencies
	}

	/// Build one handler out of the dependency pool.
	pub fn inject<H>(&self, factory: impl FnOnce(&Dependencies<U>) -> Result<H, BaseError>) -> Result<H, BaseError> {
		factory(&self.dependencies)
	}

	/// Instantiate every registered handler and assemble the bus. No handler is invoked.
	pub fn get_messagebus(&self) -> Result<MessageBus<U, R, E>, BaseError> {
		let event_handlers = self.event_handlers.build(&self.dependencies)?;
		let command_handlers = self.command_handlers.build(&self.dependencies)?;
		Ok(MessageBus::new(self.dependencies.uow(), event_handlers, command_handlers).with_max_iterations(self.max_iterations))
	}
}
