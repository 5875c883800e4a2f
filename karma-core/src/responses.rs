use thiserror::Error;

/// Errors raised by the bus, the bootstrap and the storage layer.
///
/// Application errors must be convertible from this type so that configuration and storage
/// failures travel through the same `Result` as domain failures.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BaseError {
	// --- wiring ---
	#[error("no command handler registered for {0}")]
	CommandHandlerNotFound(&'static str),
	#[error("no event handlers registered for {0}")]
	EventHandlerNotFound(&'static str),
	#[error("dependency not provided: {0}")]
	MissingDependency(String),
	#[error("dependency {name} is not of type {expected}")]
	DependencyTypeMismatch { name: String, expected: &'static str },
	#[error("type mismatch: expected={expected}, found={found}")]
	TypeMismatch { expected: &'static str, found: &'static str },

	// --- dispatch ---
	#[error("message bus stopped after {0} messages")]
	IterationLimitExceeded(usize),
	#[error("no command result available")]
	NoCommandResult,

	// --- transaction ---
	#[error("transaction has begun already")]
	TransactionAlreadyBegun,
	#[error("transaction has not begun")]
	TransactionNotBegun,

	// --- storage ---
	#[error("unique constraint violated: {constraint}")]
	UniqueViolation { constraint: String },
	#[error("row not found: table={table}, id={id}")]
	RowNotFound { table: &'static str, id: i64 },
	#[error("database error: {0}")]
	DatabaseError(String),

	// --- projection ---
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
	#[error("{0} does not serialize into an object")]
	InvalidProjection(&'static str),
}

pub trait ApplicationResponse: Send + Sync + 'static {}

pub trait ApplicationError: std::error::Error + Send + Sync + 'static {}
impl ApplicationError for BaseError {}

impl ApplicationResponse for () {}
