//! Direct construction of definitions without code generation.
//!
//! The interpreter produces [`Instance`] trees that mirror what a generated
//! container would build: the same arguments, the same properties and the
//! same sharing of singletons.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::container::{ContainerRef, RuntimeContainer};
use crate::definition::Definitions;
use crate::error::{ContainerError, ContainerResult};
use crate::scope::SingletonEntries;

/// Maximum construction nesting.
pub const MAX_CONSTRUCTION_DEPTH: usize = 100;

/// Product of one construction.
#[derive(Debug, Clone)]
pub enum Instance {
	/// Literal argument or property value.
	Value(Value),
	/// Constructed component.
	Object(Arc<Object>),
	/// Handle to the container itself.
	Container(ContainerRef),
}

impl Instance {
	/// Wraps a constructed component.
	pub fn object(object: Object) -> Self {
		Self::Object(Arc::new(object))
	}

	/// Returns `true` if both sides are the very same instance.
	///
	/// Values have no identity and compare by content.
	pub fn same_instance(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Object(left), Self::Object(right)) => Arc::ptr_eq(left, right),
			(Self::Container(left), Self::Container(right)) => left == right,
			(Self::Value(left), Self::Value(right)) => left == right,
			_ => false,
		}
	}

	/// Returns the constructed component, if any.
	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(object) => Some(object),
			_ => None,
		}
	}

	/// Returns the literal value, if any.
	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Self::Value(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the container handle, if the container is still alive.
	pub fn as_container(&self) -> Option<RuntimeContainer> {
		match self {
			Self::Container(container) => container.upgrade(),
			_ => None,
		}
	}

	/// Identifier of the constructed component.
	pub fn class(&self) -> Option<&str> {
		self.as_object().map(|object| object.class.as_str())
	}
}

impl PartialEq for Instance {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Value(left), Self::Value(right)) => left == right,
			(Self::Object(left), Self::Object(right)) => Arc::ptr_eq(left, right) || left == right,
			(Self::Container(left), Self::Container(right)) => left == right,
			_ => false,
		}
	}
}

/// A constructed component.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
	/// Component identifier.
	pub class: String,
	/// Constructor arguments in call order.
	pub arguments: Vec<Instance>,
	/// Assigned properties.
	pub properties: BTreeMap<String, Instance>,
}

impl Object {
	/// Returns constructor argument `index`.
	pub fn argument(&self, index: usize) -> Option<&Instance> {
		self.arguments.get(index)
	}

	/// Returns property `name`.
	pub fn property(&self, name: &str) -> Option<&Instance> {
		self.properties.get(name)
	}
}

/// Mutable state of one construction pass.
pub struct DefinitionInstantiation {
	container: ContainerRef,
	definitions: Arc<Definitions>,
	singleton_entries: SingletonEntries,
	path: Vec<String>,
}

impl DefinitionInstantiation {
	/// Creates a pass over `definitions` sharing `singleton_entries`.
	pub fn new(
		container: ContainerRef,
		definitions: Arc<Definitions>,
		singleton_entries: SingletonEntries,
	) -> Self {
		Self {
			container,
			definitions,
			singleton_entries,
			path: Vec::new(),
		}
	}

	/// Handle to the owning container.
	pub fn container(&self) -> ContainerRef {
		self.container.clone()
	}

	/// Every resolved definition.
	pub fn definitions(&self) -> Arc<Definitions> {
		Arc::clone(&self.definitions)
	}

	/// Singleton cache shared with the container.
	pub fn singleton_entries(&self) -> &SingletonEntries {
		&self.singleton_entries
	}

	/// Returns the cached singleton of `id`.
	pub fn singleton(&self, id: &str) -> Option<Instance> {
		self.singleton_entries.get(id)
	}

	/// Caches `instance` as the singleton of `id`.
	pub fn store_singleton(&self, id: &str, instance: Instance) {
		self.singleton_entries.insert(id, instance);
	}

	/// Constructs `id` on behalf of `parent`.
	pub fn instantiate(&mut self, id: &str, parent: &str) -> ContainerResult<Instance> {
		let definitions = self.definitions();
		definitions.resolve(id, parent)?.instantiate(self)
	}

	/// Current construction nesting.
	pub fn depth(&self) -> usize {
		self.path.len()
	}

	/// Runs `construct` with `id` on the construction path.
	///
	/// `id` leaves the path on every exit, so a failed construction does not
	/// poison later requests on the same pass.
	pub(crate) fn within<T>(
		&mut self,
		id: &str,
		construct: impl FnOnce(&mut Self) -> ContainerResult<T>,
	) -> ContainerResult<T> {
		self.enter(id)?;
		let result = construct(self);
		self.leave(id);
		result
	}

	pub(crate) fn enter(&mut self, id: &str) -> ContainerResult<()> {
		if let Some(start) = self.path.iter().position(|entry| entry == id) {
			let mut cycle: Vec<&str> = self.path[start..].iter().map(String::as_str).collect();
			cycle.push(id);
			return Err(ContainerError::CircularDependency {
				id: id.to_string(),
				path: cycle.join(" -> "),
			});
		}
		if self.path.len() >= MAX_CONSTRUCTION_DEPTH {
			return Err(ContainerError::MaxDepthExceeded(self.path.len() + 1));
		}
		self.path.push(id.to_string());
		Ok(())
	}

	pub(crate) fn leave(&mut self, id: &str) {
		if self.path.last().is_some_and(|last| last == id) {
			self.path.pop();
		}
	}
}
