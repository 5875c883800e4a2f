//! In-memory storage engine.
//!
//! An [InMemoryTable] holds committed rows and is shared by every unit of work built on the same database.
//! An [InMemoryRepository] stages its unit of work's writes on top of the table until they are flushed on commit.
//! Ids come from a per-table sequence that, like a database sequence, is not rolled back.

use crate::{model::TModel, repository::TRepository, responses::BaseError};
use async_trait::async_trait;
use std::{
	collections::{BTreeMap, HashSet},
	sync::Arc,
};
use tokio::sync::RwLock;

pub struct UniqueConstraint<M> {
	pub name: &'static str,
	key: fn(&M) -> String,
}

struct TableState<M> {
	rows: BTreeMap<i64, M>,
	sequence: i64,
}

pub struct InMemoryTable<M: TModel> {
	state: Arc<RwLock<TableState<M>>>,
	constraints: Arc<Vec<UniqueConstraint<M>>>,
}

impl<M: TModel> Clone for InMemoryTable<M> {
	fn clone(&self) -> Self {
		Self {
			state: Arc::clone(&self.state),
			constraints: Arc::clone(&self.constraints),
		}
	}
}

impl<M: TModel> Default for InMemoryTable<M> {
	fn default() -> Self {
		Self::new(vec![])
	}
}

impl<M: TModel> InMemoryTable<M> {
	pub fn new(constraints: Vec<UniqueConstraint<M>>) -> Self {
		Self {
			state: Arc::new(RwLock::new(TableState { rows: BTreeMap::new(), sequence: 0 })),
			constraints: Arc::new(constraints),
		}
	}

	pub fn unique(name: &'static str, key: fn(&M) -> String) -> UniqueConstraint<M> {
		UniqueConstraint { name, key }
	}

	/// Committed rows ordered by id.
	pub async fn rows(&self) -> Vec<M> {
		self.state.read().await.rows.values().cloned().collect()
	}

	async fn next_id(&self) -> i64 {
		let mut state = self.state.write().await;
		state.sequence += 1;
		state.sequence
	}
}

pub struct InMemoryRepository<M: TModel> {
	table: InMemoryTable<M>,
	/// `None` marks a deletion.
	staged: BTreeMap<i64, Option<M>>,
}

impl<M: TModel> InMemoryRepository<M> {
	pub fn new(table: InMemoryTable<M>) -> Self {
		Self { table, staged: BTreeMap::new() }
	}

	pub fn has_pending_changes(&self) -> bool {
		!self.staged.is_empty()
	}

	/// Drop every staged write.
	pub fn discard(&mut self) {
		self.staged.clear();
	}

	/// First row, by id, matching `predicate` as seen from this unit of work.
	pub async fn find(&self, predicate: impl Fn(&M) -> bool) -> Option<M> {
		self.snapshot().await.into_values().find(|m| predicate(m))
	}

	async fn snapshot(&self) -> BTreeMap<i64, M> {
		let mut rows = self.table.state.read().await.rows.clone();
		for (id, staged) in &self.staged {
			match staged {
				Some(model) => rows.insert(*id, model.clone()),
				None => rows.remove(id),
			};
		}
		rows
	}

	/// Check the unique constraints against committed rows plus this repository's staged writes.
	pub async fn check_constraints(&self) -> Result<(), BaseError> {
		if self.staged.is_empty() {
			return Ok(());
		}
		let rows = self.snapshot().await;
		for constraint in self.table.constraints.iter() {
			let mut seen = HashSet::with_capacity(rows.len());
			if !rows.values().all(|row| seen.insert((constraint.key)(row))) {
				tracing::warn!("unique constraint {} violated on {}", constraint.name, M::TABLE);
				return Err(BaseError::UniqueViolation { constraint: constraint.name.to_string() });
			}
		}
		Ok(())
	}

	/// Apply staged writes to the table. Callers check constraints first.
	pub async fn flush(&mut self) {
		if self.staged.is_empty() {
			return;
		}
		let mut state = self.table.state.write().await;
		for (id, staged) in std::mem::take(&mut self.staged) {
			match staged {
				Some(model) => state.rows.insert(id, model),
				None => state.rows.remove(&id),
			};
		}
	}
}

#[async_trait]
impl<M: TModel> TRepository<M> for InMemoryRepository<M> {
	async fn add(&mut self, mut model: M) -> Result<M, BaseError> {
		model.set_id(self.table.next_id().await);
		self.staged.insert(model.id(), Some(model.clone()));
		Ok(model)
	}

	async fn get(&mut self, id: i64) -> Result<Option<M>, BaseError> {
		if let Some(staged) = self.staged.get(&id) {
			return Ok(staged.clone());
		}
		Ok(self.table.state.read().await.rows.get(&id).cloned())
	}

	async fn update(&mut self, id: i64, mut model: M) -> Result<M, BaseError> {
		if self.get(id).await?.is_none() {
			return Err(BaseError::RowNotFound { table: M::TABLE, id });
		}
		model.set_id(id);
		self.staged.insert(id, Some(model.clone()));
		Ok(model)
	}

	async fn delete(&mut self, id: i64) -> Result<(), BaseError> {
		if self.get(id).await?.is_none() {
			return Err(BaseError::RowNotFound { table: M::TABLE, id });
		}
		self.staged.insert(id, None);
		Ok(())
	}

	async fn list(&mut self) -> Result<Vec<M>, BaseError> {
		Ok(self.snapshot().await.into_values().collect())
	}
}
