use std::{env, fmt::Display, str::FromStr};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid value for {key}: {reason}")]
	Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Postgres url. Without it only the in-memory store is available.
	pub database_url: Option<String>,
	pub db_max_connections: u32,
	/// Upper bound of messages one dispatch may process.
	pub bus_max_iterations: usize,
}

impl Config {
	pub const DATABASE_URL: &'static str = "DATABASE_URL";
	pub const DB_MAX_CONNECTIONS: &'static str = "KARMA_DB_MAX_CONNECTIONS";
	pub const BUS_MAX_ITERATIONS: &'static str = "KARMA_BUS_MAX_ITERATIONS";

	pub fn load() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Build the configuration from any key/value source.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
		let database_url = lookup(Self::DATABASE_URL);
		if database_url.is_none() {
			warn!("{} not set, only the in-memory store is available", Self::DATABASE_URL);
		}
		Ok(Self {
			database_url,
			db_max_connections: try_load(&lookup, Self::DB_MAX_CONNECTIONS, 10)?,
			bus_max_iterations: try_load(&lookup, Self::BUS_MAX_ITERATIONS, 1024)?,
		})
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			database_url: None,
			db_max_connections: 10,
			bus_max_iterations: 1024,
		}
	}
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
	T: FromStr + Display,
	T::Err: Display,
{
	match lookup(key) {
		None => {
			info!("{key} not set, using default: {default}");
			Ok(default)
		}
		Some(value) => value.trim().parse().map_err(|e: T::Err| {
			warn!("Invalid {key} value: {e}");
			ConfigError::Invalid { key, reason: e.to_string() }
		}),
	}
}
