use crate::prelude::*;

use super::domain::models::{User, UserStatistics, UserVote};

#[async_trait]
pub trait TUsersRepository: TRepository<User> {
	async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, BaseError>;

	async fn get_by_username(&mut self, username: &str) -> Result<Option<User>, BaseError>;
}

#[async_trait]
pub trait TUsersStatisticsRepository: TRepository<UserStatistics> {
	async fn get_by_user_id(&mut self, user_id: i64) -> Result<Option<UserStatistics>, BaseError>;
}

#[async_trait]
pub trait TUsersVotesRepository: TRepository<UserVote> {
	async fn get_by_voted_for_user_id_and_voting_user_id(&mut self, voted_for_user_id: i64, voting_user_id: i64) -> Result<Option<UserVote>, BaseError>;
}
