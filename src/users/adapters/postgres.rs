use crate::prelude::*;
use sqlx::PgPool;
use std::{marker::PhantomData, sync::Arc};
use tokio::sync::RwLock;

use crate::users::{
	domain::models::{User, UserStatistics, UserVote},
	repository::{TUsersRepository, TUsersStatisticsRepository, TUsersVotesRepository},
	unit_of_work::TUsersUnitOfWork,
};

/// Repository over one table, writing through the executor of its unit of work.
pub struct SqlRepository<M> {
	executor: Arc<RwLock<SqlExecutor>>,
	_model: PhantomData<M>,
}

impl<M> SqlRepository<M> {
	pub fn new(executor: Arc<RwLock<SqlExecutor>>) -> Self {
		Self { executor, _model: PhantomData }
	}
}

fn insert_sql(table: &str, columns: &[&str]) -> String {
	let placeholders = (1..=columns.len()).map(|i| format!("${i}")).collect::<Vec<_>>().join(", ");
	format!("INSERT INTO {table} ({}) VALUES ({placeholders}) RETURNING *", columns.join(", "))
}

fn update_sql(table: &str, columns: &[&str]) -> String {
	let assignments = columns.iter().enumerate().map(|(i, column)| format!("{column} = ${}", i + 1)).collect::<Vec<_>>().join(", ");
	format!("UPDATE {table} SET {assignments} WHERE id = ${} RETURNING *", columns.len() + 1)
}

macro_rules! impl_sql_repository {
	($model:ty, [$($column:ident),+]) => {
		#[async_trait]
		impl TRepository<$model> for SqlRepository<$model> {
			async fn add(&mut self, model: $model) -> Result<$model, BaseError> {
				let sql = insert_sql(<$model>::TABLE, &[$(stringify!($column)),+]);
				let mut executor = self.executor.write().await;
				let query = sqlx::query_as::<_, $model>(&sql);
				$(let query = query.bind(model.$column);)+
				Ok(query.fetch_one(executor.transaction()?).await.map_err(log_error!())?)
			}

			async fn get(&mut self, id: i64) -> Result<Option<$model>, BaseError> {
				let sql = format!("SELECT * FROM {} WHERE id = $1", <$model>::TABLE);
				let mut executor = self.executor.write().await;
				Ok(sqlx::query_as::<_, $model>(&sql).bind(id).fetch_optional(executor.transaction()?).await?)
			}

			async fn update(&mut self, id: i64, model: $model) -> Result<$model, BaseError> {
				let sql = update_sql(<$model>::TABLE, &[$(stringify!($column)),+]);
				let mut executor = self.executor.write().await;
				let query = sqlx::query_as::<_, $model>(&sql);
				$(let query = query.bind(model.$column);)+
				query
					.bind(id)
					.fetch_optional(executor.transaction()?)
					.await?
					.ok_or(BaseError::RowNotFound { table: <$model>::TABLE, id })
			}

			async fn delete(&mut self, id: i64) -> Result<(), BaseError> {
				let sql = format!("DELETE FROM {} WHERE id = $1", <$model>::TABLE);
				let mut executor = self.executor.write().await;
				let deleted = sqlx::query(&sql).bind(id).execute(executor.transaction()?).await?.rows_affected();
				if deleted == 0 {
					return Err(BaseError::RowNotFound { table: <$model>::TABLE, id });
				}
				Ok(())
			}

			async fn list(&mut self) -> Result<Vec<$model>, BaseError> {
				let sql = format!("SELECT * FROM {} ORDER BY id", <$model>::TABLE);
				let mut executor = self.executor.write().await;
				Ok(sqlx::query_as::<_, $model>(&sql).fetch_all(executor.transaction()?).await?)
			}
		}
	};
}

impl_sql_repository!(User, [email, password, username]);
impl_sql_repository!(UserStatistics, [user_id, likes, dislikes]);
impl_sql_repository!(UserVote, [voting_user_id, voted_for_user_id]);

#[async_trait]
impl TUsersRepository for SqlRepository<User> {
	async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, BaseError> {
		let mut executor = self.executor.write().await;
		Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
			.bind(email)
			.fetch_optional(executor.transaction()?)
			.await?)
	}

	async fn get_by_username(&mut self, username: &str) -> Result<Option<User>, BaseError> {
		let mut executor = self.executor.write().await;
		Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
			.bind(username)
			.fetch_optional(executor.transaction()?)
			.await?)
	}
}

#[async_trait]
impl TUsersStatisticsRepository for SqlRepository<UserStatistics> {
	async fn get_by_user_id(&mut self, user_id: i64) -> Result<Option<UserStatistics>, BaseError> {
		let mut executor = self.executor.write().await;
		Ok(sqlx::query_as::<_, UserStatistics>("SELECT * FROM users_statistics WHERE user_id = $1")
			.bind(user_id)
			.fetch_optional(executor.transaction()?)
			.await?)
	}
}

#[async_trait]
impl TUsersVotesRepository for SqlRepository<UserVote> {
	async fn get_by_voted_for_user_id_and_voting_user_id(&mut self, voted_for_user_id: i64, voting_user_id: i64) -> Result<Option<UserVote>, BaseError> {
		let mut executor = self.executor.write().await;
		Ok(sqlx::query_as::<_, UserVote>("SELECT * FROM users_votes WHERE voted_for_user_id = $1 AND voting_user_id = $2")
			.bind(voted_for_user_id)
			.bind(voting_user_id)
			.fetch_optional(executor.transaction()?)
			.await?)
	}
}

pub struct SqlUsersUnitOfWork {
	executor: Arc<RwLock<SqlExecutor>>,
	users: SqlRepository<User>,
	users_statistics: SqlRepository<UserStatistics>,
	users_votes: SqlRepository<UserVote>,
	events: EventQueue,
}

impl SqlUsersUnitOfWork {
	pub fn new(pool: PgPool) -> Self {
		let executor = SqlExecutor::new(pool);
		Self {
			users: SqlRepository::new(Arc::clone(&executor)),
			users_statistics: SqlRepository::new(Arc::clone(&executor)),
			users_votes: SqlRepository::new(Arc::clone(&executor)),
			executor,
			events: EventQueue::default(),
		}
	}
}

#[async_trait]
impl TUnitOfWork for SqlUsersUnitOfWork {
	async fn begin(&mut self) -> Result<(), BaseError> {
		self.executor.write().await.begin().await
	}

	async fn commit(&mut self) -> Result<(), BaseError> {
		self.executor.write().await.commit().await
	}

	async fn rollback(&mut self) -> Result<(), BaseError> {
		self.executor.write().await.rollback().await
	}

	async fn close(&mut self) {
		self.executor.write().await.close().await
	}

	fn event_queue(&mut self) -> &mut EventQueue {
		&mut self.events
	}
}

impl TUsersUnitOfWork for SqlUsersUnitOfWork {
	type Users = SqlRepository<User>;
	type UsersStatistics = SqlRepository<UserStatistics>;
	type UsersVotes = SqlRepository<UserVote>;

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
