use crate::prelude::*;

use crate::users::{
	domain::{
		commands::{RegisterUserCommand, VerifyUserCredentialsCommand, VoteForUserCommand},
		events::{UserRegisteredEvent, UserVotedEvent},
		models::User,
	},
	error::UsersError,
	responses::UsersResponse,
	service::UsersService,
	unit_of_work::TUsersUnitOfWork,
	utils::{hash_password, verify_password},
};

pub struct RegisterUserCommandHandler<U> {
	uow: AtomicUnitOfWork<U>,
}

impl<U> RegisterUserCommandHandler<U> {
	pub fn new(uow: AtomicUnitOfWork<U>) -> Self {
		Self { uow }
	}
}

#[async_trait]
impl<U: TUsersUnitOfWork> TCommandHandler<UsersResponse, UsersError> for RegisterUserCommandHandler<U> {
	type Command = RegisterUserCommand;

	/// Register a new user unless the e-mail or username is taken, and stage [UserRegisteredEvent].
	async fn handle(&self, command: RegisterUserCommand) -> Result<UsersResponse, UsersError> {
		let mut uow = self.uow.write().await;
		run_in_transaction(&mut *uow, |uow| {
			Box::pin(async move {
				let mut service = UsersService::new(&mut *uow);
				if service.check_user_existence(None, Some(&command.email), Some(&command.username)).await? {
					return Err(UsersError::UserAlreadyExists);
				}

				let user = User::new(command.email, command.username, hash_password(&command.password)?);
				let user = service.register_user(user).await?;
				uow.add_event(UserRegisteredEvent::from(&user));
				Ok(UsersResponse::User(user))
			})
		})
		.await
	}
}

pub struct VerifyUserCredentialsCommandHandler<U> {
	uow: AtomicUnitOfWork<U>,
}

impl<U> VerifyUserCredentialsCommandHandler<U> {
	pub fn new(uow: AtomicUnitOfWork<U>) -> Self {
		Self { uow }
	}
}

#[async_trait]
impl<U: TUsersUnitOfWork> TCommandHandler<UsersResponse, UsersError> for VerifyUserCredentialsCommandHandler<U> {
	type Command = VerifyUserCredentialsCommand;

	/// Look the account up by e-mail first, then by username, and check the password.
	async fn handle(&self, command: VerifyUserCredentialsCommand) -> Result<UsersResponse, UsersError> {
		let mut uow = self.uow.write().await;
		run_in_transaction(&mut *uow, |uow| {
			Box::pin(async move {
				let mut service = UsersService::new(uow);
				let user = if service.check_user_existence(None, Some(&command.username), None).await? {
					service.get_user_by_email(&command.username).await?
				} else if service.check_user_existence(None, None, Some(&command.username)).await? {
					service.get_user_by_username(&command.username).await?
				} else {
					return Err(UsersError::UserNotFound);
				};

				if !verify_password(&command.password, &user.password) {
					return Err(UsersError::InvalidPassword);
				}
				Ok(UsersResponse::User(user))
			})
		})
		.await
	}
}

pub struct VoteForUserCommandHandler<U> {
	uow: AtomicUnitOfWork<U>,
}

impl<U> VoteForUserCommandHandler<U> {
	pub fn new(uow: AtomicUnitOfWork<U>) -> Self {
		Self { uow }
	}
}

#[async_trait]
impl<U: TUsersUnitOfWork> TCommandHandler<UsersResponse, UsersError> for VoteForUserCommandHandler<U> {
	type Command = VoteForUserCommand;

	/// Reject self and repeated votes, count the vote and stage [UserVotedEvent].
	async fn handle(&self, command: VoteForUserCommand) -> Result<UsersResponse, UsersError> {
		if command.voting_user_id == command.voted_for_user_id {
			return Err(UsersError::CannotVoteForSelf);
		}

		let mut uow = self.uow.write().await;
		run_in_transaction(&mut *uow, |uow| {
			Box::pin(async move {
				let mut service = UsersService::new(&mut *uow);
				if service.check_if_user_already_voted(command.voting_user_id, command.voted_for_user_id).await? {
					return Err(UsersError::UserAlreadyVoted);
				}

				// users are read before the vote commits the transaction
				let voted_for_user = service.get_user_by_id(command.voted_for_user_id).await?;
				let voting_user = service.get_user_by_id(command.voting_user_id).await?;

				let statistics = if command.liked {
					service.like_user(command.voting_user_id, command.voted_for_user_id).await?
				} else {
					service.dislike_user(command.voting_user_id, command.voted_for_user_id).await?
				};

				uow.add_event(UserVotedEvent {
					voted_for_user_email: voted_for_user.email,
					voted_for_user_username: voted_for_user.username,
					voting_user_email: voting_user.email,
					voting_user_username: voting_user.username,
					liked: command.liked,
					disliked: command.disliked,
				});
				Ok(UsersResponse::Statistics(statistics))
			})
		})
		.await
	}
}
