#![allow(dead_code)]

use karma::prelude::*;
use std::sync::{Arc, Mutex};

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn entries(log: &Log) -> Vec<String> {
	log.lock().unwrap().clone()
}

#[derive(Debug, thiserror::Error, ApplicationError)]
pub enum TestError {
	#[error("boom: {0}")]
	Boom(String),
	#[error(transparent)]
	Base(#[from] BaseError),
}

#[derive(Debug, Clone, PartialEq, Eq, ApplicationResponse)]
pub struct Echo(pub String);

/// Unit of work without storage, counting transaction calls.
#[derive(Default)]
pub struct RecordingUnitOfWork {
	pub state: TransactionState,
	pub commits: usize,
	pub rollbacks: usize,
	events: EventQueue,
}

#[async_trait]
impl TUnitOfWork for RecordingUnitOfWork {
	async fn begin(&mut self) -> Result<(), BaseError> {
		if self.state.is_active() {
			return Err(BaseError::TransactionAlreadyBegun);
		}
		self.state = TransactionState::Active;
		Ok(())
	}
	async fn commit(&mut self) -> Result<(), BaseError> {
		if !self.state.is_active() {
			return Err(BaseError::TransactionNotBegun);
		}
		self.commits += 1;
		self.state = TransactionState::Committed;
		Ok(())
	}
	async fn rollback(&mut self) -> Result<(), BaseError> {
		if !self.state.is_active() {
			return Err(BaseError::TransactionNotBegun);
		}
		self.rollbacks += 1;
		self.state = TransactionState::RolledBack;
		Ok(())
	}
	async fn close(&mut self) {
		if self.state.is_active() {
			let _ = self.rollback().await;
		}
		self.state = TransactionState::Idle;
	}
	fn event_queue(&mut self) -> &mut EventQueue {
		&mut self.events
	}
}

pub fn atomic(uow: RecordingUnitOfWork) -> AtomicUnitOfWork<RecordingUnitOfWork> {
	Arc::new(tokio::sync::RwLock::new(uow))
}
