//! ### UnitOfWork
//! [TUnitOfWork] is a unit that manages an atomic transaction and stages the events raised while it runs.
//!
//! `commit` and `rollback` are governed by the implementation. `close` is the exit half of the scope:
//! it rolls back whatever was not committed and releases the transaction.
//!
//! The message bus drains staged events with [TUnitOfWork::get_events] after every handler invocation.
//!
//! #### Usage Pattern
//!
//! ```ignore
//! let mut uow = uow.write().await;
//! run_in_transaction(&mut *uow, |uow| {
//!     Box::pin(async move {
//!         let user = uow.users().add(user).await?;
//!         uow.commit().await?;
//!         uow.add_event(UserRegisteredEvent::from(&user));
//!         Ok(user)
//!     })
//! })
//! .await
//! ```

use crate::{make_smart_pointer, message::TEvent, responses::BaseError};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::{collections::VecDeque, sync::Arc};
use tokio::sync::RwLock;

/// Unit of work shared by the bus and every handler of one dispatch.
pub type AtomicUnitOfWork<U> = Arc<RwLock<U>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
	#[default]
	Idle,
	Active,
	Committed,
	RolledBack,
}

impl TransactionState {
	pub fn is_active(&self) -> bool {
		matches!(self, Self::Active)
	}
}

/// FIFO buffer of events staged during a transaction.
#[derive(Default)]
pub struct EventQueue(VecDeque<Arc<dyn TEvent>>);

make_smart_pointer!(EventQueue, VecDeque<Arc<dyn TEvent>>);

#[async_trait]
pub trait TUnitOfWork: Send + Sync {
	async fn begin(&mut self) -> Result<(), BaseError>;

	async fn commit(&mut self) -> Result<(), BaseError>;

	async fn rollback(&mut self) -> Result<(), BaseError>;

	/// Roll back anything that was not committed and release the transaction. Never fails.
	async fn close(&mut self);

	fn event_queue(&mut self) -> &mut EventQueue;

	fn add_event(&mut self, event: impl TEvent) {
		self.event_queue().push_back(Arc::new(event));
	}

	/// Take every staged event in staging order. Each event is returned exactly once.
	fn get_events(&mut self) -> Vec<Arc<dyn TEvent>> {
		self.event_queue().drain(..).collect()
	}
}

/// Begin a transaction on `uow`, run `operation` in it and close it on every path.
///
/// The operation's result is returned untouched; committing is the operation's job.
pub async fn run_in_transaction<U, T, E, F>(uow: &mut U, operation: F) -> Result<T, E>
where
	U: TUnitOfWork,
	E: From<BaseError>,
	F: for<'a> FnOnce(&'a mut U) -> BoxFuture<'a, Result<T, E>>,
{
	uow.begin().await?;
	let result = operation(uow).await;
	uow.close().await;
	result
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::message::TMessage;

	#[derive(Debug)]
	struct Counted(usize);
	impl TMessage for Counted {
		fn topic(&self) -> &'static str {
			"Counted"
		}
	}
	impl TEvent for Counted {}

	#[derive(Default)]
	struct FakeUnitOfWork {
		state: TransactionState,
		commits: usize,
		rollbacks: usize,
		events: EventQueue,
	}

	#[async_trait]
	impl TUnitOfWork for FakeUnitOfWork {
		async fn begin(&mut self) -> Result<(), BaseError> {
			if self.state.is_active() {
				return Err(BaseError::TransactionAlreadyBegun);
			}
			self.state = TransactionState::Active;
			Ok(())
		}
		async fn commit(&mut self) -> Result<(), BaseError> {
			self.commits += 1;
			self.state = TransactionState::Committed;
			Ok(())
		}
		async fn rollback(&mut self) -> Result<(), BaseError> {
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

	fn order(events: Vec<Arc<dyn TEvent>>) -> Vec<usize> {
		events.iter().map(|e| e.downcast_ref::<Counted>().unwrap().0).collect()
	}

	#[test]
	fn test_get_events_drains_in_staging_order() {
		let mut uow = FakeUnitOfWork::default();
		(0..5).for_each(|i| uow.add_event(Counted(i)));

		assert_eq!(order(uow.get_events()), vec![0, 1, 2, 3, 4]);
		assert!(uow.get_events().is_empty());

		uow.add_event(Counted(9));
		assert_eq!(order(uow.get_events()), vec![9]);
		assert!(uow.get_events().is_empty());
	}

	#[tokio::test]
	async fn test_run_in_transaction_rolls_back_uncommitted_work() {
		let mut uow = FakeUnitOfWork::default();
		let res: Result<(), BaseError> = run_in_transaction(&mut uow, |_uow| Box::pin(async move { Err(BaseError::NoCommandResult) })).await;

		assert!(matches!(res, Err(BaseError::NoCommandResult)));
		assert_eq!(uow.rollbacks, 1);
		assert_eq!(uow.commits, 0);
		assert_eq!(uow.state, TransactionState::Idle);
	}

	#[tokio::test]
	async fn test_run_in_transaction_keeps_committed_work() {
		let mut uow = FakeUnitOfWork::default();
		let res: Result<usize, BaseError> = run_in_transaction(&mut uow, |uow| {
			Box::pin(async move {
				uow.commit().await?;
				Ok(1)
			})
		})
		.await;

		assert_eq!(res.unwrap(), 1);
		assert_eq!(uow.commits, 1);
		assert_eq!(uow.rollbacks, 0);
	}

	#[tokio::test]
	async fn test_begin_twice_is_an_error() {
		let mut uow = FakeUnitOfWork::default();
		uow.begin().await.unwrap();
		assert!(matches!(uow.begin().await, Err(BaseError::TransactionAlreadyBegun)));
	}
}
