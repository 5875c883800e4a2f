use crate::prelude::*;

use super::repository::{TUsersRepository, TUsersStatisticsRepository, TUsersVotesRepository};

/// Unit of work of the users context. The repositories write through its transaction.
pub trait TUsersUnitOfWork: TUnitOfWork + 'static {
	type Users: TUsersRepository;
	type UsersStatistics: TUsersStatisticsRepository;
	type UsersVotes: TUsersVotesRepository;

	fn users(&mut self) -> &mut Self::Users;
	fn users_statistics(&mut self) -> &mut Self::UsersStatistics;
	fn users_votes(&mut self) -> &mut Self::UsersVotes;
}
