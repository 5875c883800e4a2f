//! ### Handlers
//! A handler is bound to exactly one message type.
//!
//! ```ignore
//! pub struct RegisterUserCommandHandler<U> {
//!     uow: AtomicUnitOfWork<U>,
//! }
//!
//! #[async_trait]
//! impl<U: TUsersUnitOfWork> TCommandHandler<UsersResponse, UsersError> for RegisterUserCommandHandler<U> {
//!     type Command = RegisterUserCommand;
//!     async fn handle(&self, command: RegisterUserCommand) -> Result<UsersResponse, UsersError> { .. }
//! }
//! ```
//!
//! The bus only sees type-erased handlers. Erasure happens at registration, keyed by the
//! handler's message type, so a downcast failure means the registry was corrupted.

use crate::{
	message::{TCommand, TEvent},
	responses::{ApplicationError, ApplicationResponse, BaseError},
};
use async_trait::async_trait;
use std::{any::type_name, sync::Arc};

#[async_trait]
pub trait TCommandHandler<R, E>: Send + Sync + 'static
where
	R: ApplicationResponse,
	E: ApplicationError,
{
	type Command: TCommand;

	async fn handle(&self, command: Self::Command) -> Result<R, E>;
}

#[async_trait]
pub trait TEventHandler<E>: Send + Sync + 'static
where
	E: ApplicationError,
{
	type Event: TEvent;

	async fn handle(&self, event: &Self::Event) -> Result<(), E>;
}

#[async_trait]
pub trait TErasedCommandHandler<R, E>: Send + Sync {
	async fn handle_message(&self, command: Box<dyn TCommand>) -> Result<R, E>;
}

#[async_trait]
pub trait TErasedEventHandler<E>: Send + Sync {
	async fn handle_message(&self, event: Arc<dyn TEvent>) -> Result<(), E>;
}

pub type BoxedCommandHandler<R, E> = Box<dyn TErasedCommandHandler<R, E>>;
pub type BoxedEventHandler<E> = Box<dyn TErasedEventHandler<E>>;

#[async_trait]
impl<H, R, E> TErasedCommandHandler<R, E> for H
where
	H: TCommandHandler<R, E>,
	R: ApplicationResponse,
	E: ApplicationError + From<BaseError>,
{
	async fn handle_message(&self, command: Box<dyn TCommand>) -> Result<R, E> {
		let found = command.topic();
		let command = command.downcast::<H::Command>().map_err(|_| BaseError::TypeMismatch {
			expected: type_name::<H::Command>(),
			found,
		})?;
		TCommandHandler::handle(self, *command).await
	}
}

#[async_trait]
impl<H, E> TErasedEventHandler<E> for H
where
	H: TEventHandler<E>,
	E: ApplicationError + From<BaseError>,
{
	async fn handle_message(&self, event: Arc<dyn TEvent>) -> Result<(), E> {
		let Some(typed) = event.downcast_ref::<H::Event>() else {
			return Err(BaseError::TypeMismatch {
				expected: type_name::<H::Event>(),
				found: event.topic(),
			}
			.into());
		};
		TEventHandler::handle(self, typed).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::message::TMessage;

	#[derive(Debug)]
	struct Add(i32, i32);
	impl TMessage for Add {
		fn topic(&self) -> &'static str {
			"Add"
		}
	}
	impl TCommand for Add {}

	#[derive(Debug)]
	struct Sub(i32, i32);
	impl TMessage for Sub {
		fn topic(&self) -> &'static str {
			"Sub"
		}
	}
	impl TCommand for Sub {}

	struct AddHandler;
	#[async_trait]
	impl TCommandHandler<i32, BaseError> for AddHandler {
		type Command = Add;
		async fn handle(&self, command: Add) -> Result<i32, BaseError> {
			Ok(command.0 + command.1)
		}
	}
	impl ApplicationResponse for i32 {}

	#[tokio::test]
	async fn test_erased_command_handler_downcasts_its_own_command() {
		let handler: BoxedCommandHandler<i32, BaseError> = Box::new(AddHandler);
		assert_eq!(handler.handle_message(Box::new(Add(1, 2))).await.unwrap(), 3);

		let err = handler.handle_message(Box::new(Sub(1, 2))).await.unwrap_err();
		assert!(matches!(err, BaseError::TypeMismatch { found: "Sub", .. }));
	}
}
