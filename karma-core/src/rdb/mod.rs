#[cfg(feature = "sqlx-postgres")]
pub mod executor;
pub mod in_memory;
