use crate::{model::TModel, responses::BaseError};
use async_trait::async_trait;

/// CRUD access to one kind of model inside the current unit of work.
///
/// Reads see the unit of work's own uncommitted writes.
#[async_trait]
pub trait TRepository<M: TModel>: Send + Sync {
	/// Store `model` under a freshly assigned id and return the stored copy.
	async fn add(&mut self, model: M) -> Result<M, BaseError>;

	async fn get(&mut self, id: i64) -> Result<Option<M>, BaseError>;

	/// Replace the record `id` with `model`. Fails with [BaseError::RowNotFound] when there is no such record.
	async fn update(&mut self, id: i64, model: M) -> Result<M, BaseError>;

	/// Remove the record `id`. Fails with [BaseError::RowNotFound] when there is no such record.
	async fn delete(&mut self, id: i64) -> Result<(), BaseError>;

	async fn list(&mut self) -> Result<Vec<M>, BaseError>;
}
