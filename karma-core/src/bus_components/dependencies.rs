use crate::{responses::BaseError, unit_of_work::AtomicUnitOfWork};
use hashbrown::HashMap;
use std::{
	any::{type_name, Any},
	sync::Arc,
};

/// Flat pool of named values handed to handler factories.
///
/// `"uow"` is always present and holds the unit of work shared by the whole dispatch.
pub struct Dependencies<U> {
	uow: AtomicUnitOfWork<U>,
	extras: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl<U> Clone for Dependencies<U> {
	fn clone(&self) -> Self {
		Self {
			uow: Arc::clone(&self.uow),
			extras: self.extras.clone(),
		}
	}
}

impl<U: Send + Sync + 'static> Dependencies<U> {
	pub const UOW: &'static str = "uow";

	pub fn new(uow: AtomicUnitOfWork<U>) -> Self {
		Self { uow, extras: HashMap::new() }
	}

	/// Register `value` under `name`, replacing any previous value. `"uow"` cannot be replaced.
	pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
		let name = name.into();
		if name == Self::UOW {
			tracing::warn!("ignoring dependency named {}: the unit of work is fixed at bootstrap", Self::UOW);
			return;
		}
		self.extras.insert(name, Arc::new(value));
	}

	pub fn uow(&self) -> AtomicUnitOfWork<U> {
		Arc::clone(&self.uow)
	}

	pub fn contains(&self, name: &str) -> bool {
		name == Self::UOW || self.extras.contains_key(name)
	}

	/// Clone out the dependency registered under `name`.
	pub fn get<T: Any + Clone>(&self, name: &str) -> Result<T, BaseError> {
		let value: &(dyn Any + Send + Sync) = if name == Self::UOW {
			&self.uow
		} else {
			self.extras.get(name).ok_or_else(|| BaseError::MissingDependency(name.to_string()))?.as_ref()
		};
		value.downcast_ref::<T>().cloned().ok_or_else(|| BaseError::DependencyTypeMismatch {
			name: name.to_string(),
			expected: type_name::<T>(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tokio::sync::RwLock;

	fn deps() -> Dependencies<Vec<u8>> {
		Dependencies::new(Arc::new(RwLock::new(vec![])))
	}

	#[test]
	fn test_get_returns_registered_value() {
		let mut deps = deps();
		deps.insert("greeting", String::from("hello"));
		assert_eq!(deps.get::<String>("greeting").unwrap(), "hello");
		assert!(deps.contains("greeting"));
	}

	#[test]
	fn test_uow_is_always_available() {
		let deps = deps();
		let uow = deps.get::<AtomicUnitOfWork<Vec<u8>>>("uow").unwrap();
		assert!(Arc::ptr_eq(&uow, &deps.uow()));
	}

	#[test]
	fn test_missing_and_mistyped_dependencies() {
		let mut deps = deps();
		deps.insert("count", 3_usize);

		assert!(matches!(deps.get::<String>("nothing"), Err(BaseError::MissingDependency(name)) if name == "nothing"));
		assert!(matches!(deps.get::<String>("count"), Err(BaseError::DependencyTypeMismatch { name, .. }) if name == "count"));
	}

	#[test]
	fn test_uow_cannot_be_shadowed() {
		let mut deps = deps();
		deps.insert("uow", 1_u8);
		assert!(deps.get::<AtomicUnitOfWork<Vec<u8>>>("uow").is_ok());
	}
}
