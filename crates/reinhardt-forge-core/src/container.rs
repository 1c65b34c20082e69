//! Interpreted container.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::definition::Definitions;
use crate::error::ContainerResult;
use crate::instantiation::{DefinitionInstantiation, Instance};
use crate::scope::SingletonEntries;

struct ContainerState {
	definitions: Arc<Definitions>,
	singletons: SingletonEntries,
}

/// Container that constructs components straight from their definitions.
///
/// Produces the same object graphs a generated container would, without
/// emitting any code. Cloning is cheap and clones share the singleton cache.
///
/// # Examples
///
/// ```
/// use reinhardt_forge_core::container::RuntimeContainer;
/// use reinhardt_forge_core::definition::{ClassDefinition, Definitions};
///
/// let definitions = Definitions::new()
///     .with(ClassDefinition::singleton("app::Clock").entry_point(true));
/// let container = RuntimeContainer::new(definitions);
///
/// let first = container.get("app::Clock").unwrap();
/// let second = container.get("app::Clock").unwrap();
/// assert!(first.same_instance(&second));
/// ```
#[derive(Clone)]
pub struct RuntimeContainer {
	state: Arc<ContainerState>,
}

impl RuntimeContainer {
	/// Creates a container over resolved `definitions`.
	pub fn new(definitions: Definitions) -> Self {
		Self {
			state: Arc::new(ContainerState {
				definitions: Arc::new(definitions),
				singletons: SingletonEntries::new(),
			}),
		}
	}

	/// Constructs `id` as a root request.
	pub fn get(&self, id: &str) -> ContainerResult<Instance> {
		tracing::trace!(id = %id, "Constructing component");
		self.instantiation().instantiate(id, "")
	}

	/// Returns `true` if `id` has a definition.
	pub fn has(&self, id: &str) -> bool {
		self.state.definitions.contains(id)
	}

	/// Every resolved definition.
	pub fn definitions(&self) -> &Definitions {
		&self.state.definitions
	}

	/// Singletons constructed so far.
	pub fn singletons(&self) -> &SingletonEntries {
		&self.state.singletons
	}

	/// Starts a construction pass bound to this container.
	pub fn instantiation(&self) -> DefinitionInstantiation {
		DefinitionInstantiation::new(
			self.downgrade(),
			Arc::clone(&self.state.definitions),
			self.state.singletons.clone(),
		)
	}

	/// Returns a handle that does not keep the container alive.
	pub fn downgrade(&self) -> ContainerRef {
		ContainerRef(Arc::downgrade(&self.state))
	}
}

impl fmt::Debug for RuntimeContainer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RuntimeContainer")
			.field("definitions", &self.state.definitions.len())
			.field("singletons", &self.state.singletons.len())
			.finish()
	}
}

/// Weak handle to a [`RuntimeContainer`], injected wherever the container
/// asks for itself.
#[derive(Clone)]
pub struct ContainerRef(Weak<ContainerState>);

impl ContainerRef {
	/// Returns the container if it is still alive.
	pub fn upgrade(&self) -> Option<RuntimeContainer> {
		self.0.upgrade().map(|state| RuntimeContainer { state })
	}
}

impl PartialEq for ContainerRef {
	fn eq(&self, other: &Self) -> bool {
		Weak::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for ContainerRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ContainerRef")
			.field(&(self.0.strong_count() > 0))
			.finish()
	}
}
