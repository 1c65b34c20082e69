//! Component scopes and the singleton registry

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Lifetime of the instances produced for one component identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
	/// One shared instance per container.
	#[default]
	Singleton,
	/// A fresh instance per request.
	Prototype,
}

impl Scope {
	/// Returns `true` for [`Scope::Singleton`].
	pub fn is_singleton(self) -> bool {
		matches!(self, Self::Singleton)
	}
}

impl fmt::Display for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Singleton => f.write_str("singleton"),
			Self::Prototype => f.write_str("prototype"),
		}
	}
}

/// Registry of constructed singletons keyed by component identifier.
///
/// Clones share the same storage. Entries are written once per identifier
/// by the construction code and read on every later request.
#[derive(Clone, Default)]
pub struct SingletonEntries {
	entries: Arc<RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>>,
}

impl SingletonEntries {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Retrieves the entry stored for `id` if it has type `T`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_forge_core::scope::SingletonEntries;
	/// use std::sync::Arc;
	///
	/// let entries = SingletonEntries::new();
	/// entries.insert("app::Clock", Arc::new(42u64));
	///
	/// let clock = entries.get::<Arc<u64>>("app::Clock").unwrap();
	/// assert_eq!(*clock, 42);
	/// assert!(entries.get::<Arc<String>>("app::Clock").is_none());
	/// ```
	pub fn get<T: Clone + Send + Sync + 'static>(&self, id: &str) -> Option<T> {
		self.entries
			.read()
			.get(id)
			.and_then(|entry| entry.downcast_ref::<T>())
			.cloned()
	}

	/// Stores `value` for `id`, replacing any previous entry.
	pub fn insert<T: Send + Sync + 'static>(&self, id: impl Into<String>, value: T) {
		self.entries.write().insert(id.into(), Arc::new(value));
	}

	/// Returns `true` if an entry exists for `id`.
	pub fn contains(&self, id: &str) -> bool {
		self.entries.read().contains_key(id)
	}

	/// Returns the number of stored entries.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Returns `true` if nothing has been stored yet.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	/// Removes every entry.
	pub fn clear(&self) {
		self.entries.write().clear();
	}
}

impl fmt::Debug for SingletonEntries {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let entries = self.entries.read();
		let mut ids: Vec<&String> = entries.keys().collect();
		ids.sort();
		f.debug_struct("SingletonEntries").field("ids", &ids).finish()
	}
}
