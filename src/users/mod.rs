//! Users bounded context: registration, credential checks and like/dislike votes.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod notification;
pub mod repository;
pub mod responses;
pub mod service;
pub mod unit_of_work;
pub mod utils;

use crate::{config::Config, prelude::*};

use self::{
	error::UsersError,
	handlers::{
		command::{RegisterUserCommandHandler, VerifyUserCredentialsCommandHandler, VoteForUserCommandHandler},
		event::{SendRegistrationNotificationEventHandler, SendVoteNotificationEventHandler},
	},
	notification::SharedNotifier,
	responses::UsersResponse,
	unit_of_work::TUsersUnitOfWork,
};

/// Name of the notifier in the dependency pool.
pub const NOTIFIER: &str = "notifier";

pub type UsersMessageBus<U> = MessageBus<U, UsersResponse, UsersError>;

pub fn events_handlers_for_injection<U: TUsersUnitOfWork>() -> EventHandlersForInjection<U, UsersError> {
	EventHandlersForInjection::new()
		.event(|deps| Ok(SendRegistrationNotificationEventHandler::new(deps.get(NOTIFIER)?)))
		.event(|deps| Ok(SendVoteNotificationEventHandler::new(deps.get(NOTIFIER)?)))
}

pub fn commands_handlers_for_injection<U: TUsersUnitOfWork>() -> CommandHandlersForInjection<U, UsersResponse, UsersError> {
	CommandHandlersForInjection::new()
		.command(|deps| Ok(RegisterUserCommandHandler::new(deps.uow())))
		.command(|deps| Ok(VoteForUserCommandHandler::new(deps.uow())))
		.command(|deps| Ok(VerifyUserCredentialsCommandHandler::new(deps.uow())))
}

/// Bus of one users operation running on `uow`.
pub fn messagebus<U: TUsersUnitOfWork>(uow: U, notifier: SharedNotifier, config: &Config) -> Result<UsersMessageBus<U>, UsersError> {
	let uow: AtomicUnitOfWork<U> = std::sync::Arc::new(tokio::sync::RwLock::new(uow));
	Ok(Bootstrap::new(uow, events_handlers_for_injection(), commands_handlers_for_injection())
		.with_dependency(NOTIFIER, notifier)
		.with_max_iterations(config.bus_max_iterations)
		.get_messagebus()?)
}
