use crate::prelude::*;

use super::{
	domain::models::{User, UserStatistics, UserVote},
	error::UsersError,
	repository::{TUsersRepository, TUsersStatisticsRepository, TUsersVotesRepository},
	unit_of_work::TUsersUnitOfWork,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
	Like,
	Dislike,
}

/// Business operations over the repositories of a unit of work.
///
/// The service runs inside the caller's transaction. Writing operations commit it.
pub struct UsersService<'a, U> {
	uow: &'a mut U,
}

impl<'a, U: TUsersUnitOfWork> UsersService<'a, U> {
	pub fn new(uow: &'a mut U) -> Self {
		Self { uow }
	}

	/// Store `user` along with zeroed statistics and commit.
	pub async fn register_user(&mut self, user: User) -> Result<User, UsersError> {
		let user = self.uow.users().add(user).await.map_err(conflict_as(|| UsersError::UserAlreadyExists))?;
		self.uow
			.users_statistics()
			.add(UserStatistics::new(user.id))
			.await
			.map_err(conflict_as(|| UsersError::UserAlreadyExists))?;
		self.uow.commit().await.map_err(log_error!()).map_err(conflict_as(|| UsersError::UserAlreadyExists))?;
		Ok(user)
	}

	/// Whether a user matches any of the given attributes. Zero ids and empty strings count as absent.
	pub async fn check_user_existence(&mut self, id: Option<i64>, email: Option<&str>, username: Option<&str>) -> Result<bool, UsersError> {
		let id = id.filter(|id| *id != 0);
		let email = email.filter(|email| !email.is_empty());
		let username = username.filter(|username| !username.is_empty());
		if id.is_none() && email.is_none() && username.is_none() {
			return Err(UsersError::UserAttributeRequired);
		}

		if let Some(id) = id {
			if self.uow.users().get(id).await?.is_some() {
				return Ok(true);
			}
		}
		if let Some(email) = email {
			if self.uow.users().get_by_email(email).await?.is_some() {
				return Ok(true);
			}
		}
		if let Some(username) = username {
			if self.uow.users().get_by_username(username).await?.is_some() {
				return Ok(true);
			}
		}
		Ok(false)
	}

	pub async fn get_user_by_id(&mut self, id: i64) -> Result<User, UsersError> {
		self.uow.users().get(id).await?.ok_or(UsersError::UserNotFound)
	}

	pub async fn get_user_by_email(&mut self, email: &str) -> Result<User, UsersError> {
		self.uow.users().get_by_email(email).await?.ok_or(UsersError::UserNotFound)
	}

	pub async fn get_user_by_username(&mut self, username: &str) -> Result<User, UsersError> {
		self.uow.users().get_by_username(username).await?.ok_or(UsersError::UserNotFound)
	}

	pub async fn get_all_users(&mut self) -> Result<Vec<User>, UsersError> {
		Ok(self.uow.users().list().await?)
	}

	pub async fn get_user_statistics_by_user_id(&mut self, user_id: i64) -> Result<UserStatistics, UsersError> {
		self.uow.users_statistics().get_by_user_id(user_id).await?.ok_or(UsersError::UserStatisticsNotFound)
	}

	pub async fn like_user(&mut self, voting_user_id: i64, voted_for_user_id: i64) -> Result<UserStatistics, UsersError> {
		self.vote(voting_user_id, voted_for_user_id, Vote::Like).await
	}

	pub async fn dislike_user(&mut self, voting_user_id: i64, voted_for_user_id: i64) -> Result<UserStatistics, UsersError> {
		self.vote(voting_user_id, voted_for_user_id, Vote::Dislike).await
	}

	pub async fn check_if_user_already_voted(&mut self, voting_user_id: i64, voted_for_user_id: i64) -> Result<bool, UsersError> {
		Ok(self
			.uow
			.users_votes()
			.get_by_voted_for_user_id_and_voting_user_id(voted_for_user_id, voting_user_id)
			.await?
			.is_some())
	}

	/// Count the vote on the target's statistics, record it and commit.
	///
	/// A concurrent vote for the same pair is rejected by the unique constraint, on insert or on commit.
	async fn vote(&mut self, voting_user_id: i64, voted_for_user_id: i64, vote: Vote) -> Result<UserStatistics, UsersError> {
		let mut statistics = self.get_user_statistics_by_user_id(voted_for_user_id).await?;
		match vote {
			Vote::Like => statistics.likes += 1,
			Vote::Dislike => statistics.dislikes += 1,
		}
		let statistics = self.uow.users_statistics().update(statistics.id, statistics).await?;
		self.uow
			.users_votes()
			.add(UserVote::new(voting_user_id, voted_for_user_id))
			.await
			.map_err(conflict_as(|| UsersError::UserAlreadyVoted))?;

		self.uow.commit().await.map_err(log_error!()).map_err(conflict_as(|| UsersError::UserAlreadyVoted))?;
		Ok(statistics)
	}
}

/// Turn a unique violation into the domain `conflict`, whether storage raised it on insert or on commit.
fn conflict_as(conflict: impl FnOnce() -> UsersError) -> impl FnOnce(BaseError) -> UsersError {
	move |err| match err {
		BaseError::UniqueViolation { constraint } => {
			tracing::debug!("unique constraint {} rejected the write", constraint);
			conflict()
		}
		err => err.into(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_only_unique_violations_become_conflicts() {
		let err = conflict_as(|| UsersError::UserAlreadyVoted)(BaseError::UniqueViolation { constraint: "users_votes_voting_user_id_voted_for_user_id_key".into() });
		assert!(matches!(err, UsersError::UserAlreadyVoted));

		let err = conflict_as(|| UsersError::UserAlreadyExists)(BaseError::TransactionNotBegun);
		assert!(matches!(err, UsersError::Base(BaseError::TransactionNotBegun)));
	}
}
