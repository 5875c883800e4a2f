use crate::responses::BaseError;
use sqlx::{
	pool::PoolOptions,
	postgres::{PgConnectOptions, PgPool},
	ConnectOptions, PgConnection, Postgres, Transaction,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Pool handle plus the transaction of the unit of work that owns this executor.
///
/// Repositories of one unit of work share the executor, so they all write through the same transaction.
#[derive(Debug)]
pub struct SqlExecutor {
	pool: PgPool,
	transaction: Option<Transaction<'static, Postgres>>,
}

impl SqlExecutor {
	pub fn new(pool: PgPool) -> Arc<RwLock<Self>> {
		Arc::new(RwLock::new(Self { pool, transaction: None }))
	}

	pub fn is_active(&self) -> bool {
		self.transaction.is_some()
	}

	pub fn transaction(&mut self) -> Result<&mut PgConnection, BaseError> {
		match self.transaction.as_mut() {
			Some(trx) => Ok(&mut **trx),
			None => Err(BaseError::TransactionNotBegun),
		}
	}

	pub fn connection(&self) -> &PgPool {
		&self.pool
	}

	pub async fn begin(&mut self) -> Result<(), BaseError> {
		if self.transaction.is_some() {
			tracing::warn!("Transaction Begun Already!");
			return Err(BaseError::TransactionAlreadyBegun);
		}
		self.transaction = Some(self.pool.begin().await?);
		Ok(())
	}

	pub async fn commit(&mut self) -> Result<(), BaseError> {
		let trx = self.transaction.take().ok_or(BaseError::TransactionNotBegun)?;
		Ok(trx.commit().await?)
	}

	pub async fn rollback(&mut self) -> Result<(), BaseError> {
		let trx = self.transaction.take().ok_or(BaseError::TransactionNotBegun)?;
		Ok(trx.rollback().await?)
	}

	/// Roll back a transaction left open. Failures are logged, not returned.
	pub async fn close(&mut self) {
		if let Some(trx) = self.transaction.take() {
			if let Err(err) = trx.rollback().await {
				tracing::error!("rollback on close failed: {}", err);
			}
		}
	}
}

pub async fn connection_pool(url: &str, max_connections: u32) -> Result<PgPool, BaseError> {
	let options = url.parse::<PgConnectOptions>()?.disable_statement_logging();
	let pool = PoolOptions::new().max_connections(max_connections).connect_with(options).await?;
	tracing::info!("connected to postgres with up to {} connections", max_connections);
	Ok(pool)
}

impl From<sqlx::Error> for BaseError {
	fn from(err: sqlx::Error) -> Self {
		match &err {
			sqlx::Error::Database(db) if db.is_unique_violation() => BaseError::UniqueViolation {
				constraint: db.constraint().unwrap_or_default().to_string(),
			},
			_ => BaseError::DatabaseError(err.to_string()),
		}
	}
}
