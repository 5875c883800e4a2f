mod bus_components;
mod macros;
mod message;
mod model;
pub mod rdb;
mod repository;
mod responses;
mod unit_of_work;

pub mod prelude {
	pub use crate::bus_components::bootstrap::*;
	pub use crate::bus_components::dependencies::Dependencies;
	pub use crate::bus_components::handler::*;
	pub use crate::bus_components::messagebus::*;
	pub use crate::message::*;
	pub use crate::model::*;
	pub use crate::rdb::in_memory::{InMemoryRepository, InMemoryTable, UniqueConstraint};
	#[cfg(feature = "sqlx-postgres")]
	pub use crate::rdb::executor::{connection_pool, SqlExecutor};
	pub use crate::repository::TRepository;
	pub use crate::responses::{ApplicationError, ApplicationResponse, BaseError};
	pub use crate::unit_of_work::*;

	pub use async_trait::async_trait;
	pub use futures::future::BoxFuture;
	pub use hashbrown::HashMap as HandlerMapper;
	pub use serde;
	pub use serde::{Deserialize, Serialize};
	pub use serde_json;
	#[cfg(feature = "sqlx-postgres")]
	pub use sqlx;
	pub use tokio;
	pub use tracing;
}
