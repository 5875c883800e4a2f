use crate::prelude::*;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::users::{
	domain::models::{User, UserStatistics, UserVote},
	repository::{TUsersRepository, TUsersStatisticsRepository, TUsersVotesRepository},
	unit_of_work::TUsersUnitOfWork,
};

#[async_trait]
impl TUsersRepository for InMemoryRepository<User> {
	async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, BaseError> {
		Ok(self.find(|user| user.email == email).await)
	}

	async fn get_by_username(&mut self, username: &str) -> Result<Option<User>, BaseError> {
		Ok(self.find(|user| user.username == username).await)
	}
}

#[async_trait]
impl TUsersStatisticsRepository for InMemoryRepository<UserStatistics> {
	async fn get_by_user_id(&mut self, user_id: i64) -> Result<Option<UserStatistics>, BaseError> {
		Ok(self.find(|statistics| statistics.user_id == user_id).await)
	}
}

#[async_trait]
impl TUsersVotesRepository for InMemoryRepository<UserVote> {
	async fn get_by_voted_for_user_id_and_voting_user_id(&mut self, voted_for_user_id: i64, voting_user_id: i64) -> Result<Option<UserVote>, BaseError> {
		Ok(self.find(|vote| vote.voted_for_user_id == voted_for_user_id && vote.voting_user_id == voting_user_id).await)
	}
}

/// Tables of the users context, shared by every unit of work created from it.
#[derive(Clone)]
pub struct InMemoryUsersDatabase {
	users: InMemoryTable<User>,
	users_statistics: InMemoryTable<UserStatistics>,
	users_votes: InMemoryTable<UserVote>,
	commit_lock: Arc<Mutex<()>>,
}

impl Default for InMemoryUsersDatabase {
	fn default() -> Self {
		Self::new()
	}
}

impl InMemoryUsersDatabase {
	pub fn new() -> Self {
		Self {
			users: InMemoryTable::new(vec![
				InMemoryTable::unique("users_email_key", |user: &User| user.email.clone()),
				InMemoryTable::unique("users_username_key", |user: &User| user.username.clone()),
			]),
			users_statistics: InMemoryTable::new(vec![InMemoryTable::unique("users_statistics_user_id_key", |statistics: &UserStatistics| {
				statistics.user_id.to_string()
			})]),
			users_votes: InMemoryTable::new(vec![InMemoryTable::unique("users_votes_voting_user_id_voted_for_user_id_key", |vote: &UserVote| {
				format!("{}:{}", vote.voting_user_id, vote.voted_for_user_id)
			})]),
			commit_lock: Arc::new(Mutex::new(())),
		}
	}

	pub fn unit_of_work(&self) -> InMemoryUsersUnitOfWork {
		InMemoryUsersUnitOfWork {
			db: self.clone(),
			users: InMemoryRepository::new(self.users.clone()),
			users_statistics: InMemoryRepository::new(self.users_statistics.clone()),
			users_votes: InMemoryRepository::new(self.users_votes.clone()),
			state: TransactionState::default(),
			events: EventQueue::default(),
		}
	}

	/// Committed users.
	pub async fn users(&self) -> Vec<User> {
		self.users.rows().await
	}

	pub async fn users_statistics(&self) -> Vec<UserStatistics> {
		self.users_statistics.rows().await
	}

	pub async fn users_votes(&self) -> Vec<UserVote> {
		self.users_votes.rows().await
	}
}

pub struct InMemoryUsersUnitOfWork {
	db: InMemoryUsersDatabase,
	users: InMemoryRepository<User>,
	users_statistics: InMemoryRepository<UserStatistics>,
	users_votes: InMemoryRepository<UserVote>,
	state: TransactionState,
	events: EventQueue,
}

impl InMemoryUsersUnitOfWork {
	pub fn state(&self) -> TransactionState {
		self.state
	}

	fn discard(&mut self) {
		self.users.discard();
		self.users_statistics.discard();
		self.users_votes.discard();
	}
}

#[async_trait]
impl TUnitOfWork for InMemoryUsersUnitOfWork {
	async fn begin(&mut self) -> Result<(), BaseError> {
		if self.state.is_active() {
			return Err(BaseError::TransactionAlreadyBegun);
		}
		self.discard();
		self.state = TransactionState::Active;
		Ok(())
	}

	/// Every table is validated under the commit lock before any of them is written.
	async fn commit(&mut self) -> Result<(), BaseError> {
		if !self.state.is_active() {
			return Err(BaseError::TransactionNotBegun);
		}
		let _guard = self.db.commit_lock.lock().await;
		self.users.check_constraints().await?;
		self.users_statistics.check_constraints().await?;
		self.users_votes.check_constraints().await?;

		self.users.flush().await;
		self.users_statistics.flush().await;
		self.users_votes.flush().await;
		self.state = TransactionState::Committed;
		Ok(())
	}

	async fn rollback(&mut self) -> Result<(), BaseError> {
		if !self.state.is_active() {
			return Err(BaseError::TransactionNotBegun);
		}
		self.discard();
		self.state = TransactionState::RolledBack;
		Ok(())
	}

	async fn close(&mut self) {
		if self.state.is_active() {
			tracing::debug!("rolling back uncommitted changes");
			if let Err(err) = self.rollback().await {
				tracing::error!("rollback on close failed: {}", err);
			}
		}
		self.state = TransactionState::Idle;
	}

	fn event_queue(&mut self) -> &mut EventQueue {
		&mut self.events
	}
}

impl TUsersUnitOfWork for InMemoryUsersUnitOfWork {
	type Users = InMemoryRepository<User>;
	type UsersStatistics = InMemoryRepository<UserStatistics>;
	type UsersVotes = InMemoryRepository<UserVote>;

	fn users(&mut self) -> &mut Self::Users {
		&mut self.users
	}
	fn users_statistics(&mut self) -> &mut Self::UsersStatistics {
		&mut self.users_statistics
	}
	fn users_votes(&mut self) -> &mut Self::UsersVotes {
		&mut self.users_votes
	}
}
