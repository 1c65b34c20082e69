//! Construction recipes for component identifiers.
//!
//! A [`Definition`] describes how to obtain an instance of one identifier
//! for one or more consumers. The four variants form a closed set:
//!
//! - [`ClassDefinition`]: call a constructor and assign properties.
//! - [`ReferenceDefinition`]: alias of another identifier, typically a trait
//!   implemented by a concrete class.
//! - [`ContextDependentDefinition`]: picks another identifier depending on
//!   the consumer that asks.
//! - [`SelfDefinition`]: the container itself.
//!
//! Context-dependent definitions never construct anything on their own.
//! [`Definitions::resolve`] follows them to a [`ResolvedDefinition`], which
//! can only be one of the three concrete variants, and everything that
//! emits or runs construction code works on that view.

mod class;
mod container;
mod context_dependent;
mod reference;

use std::collections::BTreeMap;

use serde_json::Value;

pub use class::ClassDefinition;
pub use container::SelfDefinition;
pub use context_dependent::ContextDependentDefinition;
pub use reference::ReferenceDefinition;

use crate::compilation::{DefinitionCompilation, PreloadedIds};
use crate::config::CompilerConfig;
use crate::error::{ContainerError, ContainerResult};
use crate::instantiation::{DefinitionInstantiation, Instance};
use crate::naming;
use crate::scope::Scope;
use crate::shape::TypeShapeProvider;

/// Source of one constructor argument or property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
	/// Literal value emitted verbatim.
	Value(Value),
	/// Instance of another component.
	Class(String),
	/// Value looked up by name in the definition's override table.
	Override(String),
}

impl Argument {
	/// Returns the referenced identifier of a class argument.
	pub fn class_id(&self) -> Option<&str> {
		match self {
			Self::Class(id) => Some(id),
			_ => None,
		}
	}
}

/// State shared by the concrete definition variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionBase {
	id: String,
	scope: Scope,
	is_entry_point: bool,
	is_autoloaded: bool,
	is_file_based: bool,
	singleton_reference_count: usize,
	prototype_reference_count: usize,
	source_files: Vec<String>,
}

impl DefinitionBase {
	/// Creates the base of `id` with no references and every flag unset.
	pub fn new(id: impl Into<String>, scope: Scope) -> Self {
		Self {
			id: id.into(),
			scope,
			is_entry_point: false,
			is_autoloaded: false,
			is_file_based: false,
			singleton_reference_count: 0,
			prototype_reference_count: 0,
			source_files: Vec::new(),
		}
	}

	/// Component identifier.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Accessor name of the identifier.
	pub fn hash(&self) -> String {
		naming::mangle(&self.id)
	}

	/// Scope of the produced instances.
	pub fn scope(&self) -> Scope {
		self.scope
	}

	/// Returns `true` for singleton scope.
	pub fn is_singleton(&self) -> bool {
		self.scope.is_singleton()
	}

	/// Returns `true` if the component is reachable from outside the container.
	pub fn is_entry_point(&self) -> bool {
		self.is_entry_point
	}

	/// Returns `true` if the component source is loaded before construction.
	pub fn is_autoloaded(&self) -> bool {
		self.is_autoloaded
	}

	/// Returns `true` if the component is emitted as a separate file.
	pub fn is_file_based(&self) -> bool {
		self.is_file_based
	}

	/// Number of references from singleton consumers.
	pub fn singleton_reference_count(&self) -> usize {
		self.singleton_reference_count
	}

	/// Number of references from prototype consumers.
	pub fn prototype_reference_count(&self) -> usize {
		self.prototype_reference_count
	}

	/// Total number of references.
	pub fn reference_count(&self) -> usize {
		self.singleton_reference_count + self.prototype_reference_count
	}

	/// Files loaded before construction, supertypes first.
	pub fn source_files(&self) -> &[String] {
		&self.source_files
	}

	pub(crate) fn set_entry_point(&mut self, is_entry_point: bool) {
		self.is_entry_point = is_entry_point;
	}

	pub(crate) fn set_autoloaded(&mut self, is_autoloaded: bool) {
		self.is_autoloaded = is_autoloaded;
	}

	pub(crate) fn set_file_based(&mut self, is_file_based: bool) {
		self.is_file_based = is_file_based;
	}

	pub(crate) fn set_reference_counts(&mut self, singleton: usize, prototype: usize) {
		self.singleton_reference_count = singleton;
		self.prototype_reference_count = prototype;
	}

	pub(crate) fn set_source_files(&mut self, files: Vec<String>) {
		self.source_files = files;
	}

	/// Records one consumer edge, partitioned by the consumer's scope.
	pub fn increase_reference_count(&mut self, parent_is_singleton: bool) {
		if parent_is_singleton {
			self.singleton_reference_count += 1;
		} else {
			self.prototype_reference_count += 1;
		}
	}

	/// Returns `true` when construction can skip the singleton registry.
	///
	/// Prototypes never use the registry. A singleton may skip it when it is
	/// not an entry point and at most one singleton consumer refers to it,
	/// because that consumer is itself constructed at most once.
	pub fn is_singleton_check_eliminable(&self) -> bool {
		match self.scope {
			Scope::Prototype => true,
			Scope::Singleton => {
				!self.is_entry_point
					&& self.prototype_reference_count == 0
					&& self.singleton_reference_count <= 1
			}
		}
	}

	/// Returns `true` when the construction expression can be embedded in its consumer.
	pub fn is_inlinable(&self) -> bool {
		!self.is_entry_point
			&& !self.is_file_based
			&& self.reference_count() <= 1
			&& self.is_singleton_check_eliminable()
	}

	/// Returns `true` when the consumer must emit the load statements of this definition.
	pub fn is_autoloading_inlinable(&self, inline: bool) -> bool {
		self.is_autoloaded && (!inline || self.is_inlinable())
	}
}

/// Construction recipe of one component identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
	/// Constructor call plus property assignments.
	Class(ClassDefinition),
	/// Alias of another identifier.
	Reference(ReferenceDefinition),
	/// Consumer-dependent choice of another identifier.
	ContextDependent(ContextDependentDefinition),
	/// The container itself.
	Container(SelfDefinition),
}

impl Definition {
	/// Component identifier.
	pub fn id(&self) -> &str {
		match self {
			Self::Class(definition) => definition.id(),
			Self::Reference(definition) => definition.id(),
			Self::ContextDependent(definition) => definition.id(),
			Self::Container(definition) => definition.id(),
		}
	}

	/// Accessor name of the identifier.
	pub fn hash(&self) -> String {
		naming::mangle(self.id())
	}

	/// Returns `true` if the identifier is reachable from outside the container.
	pub fn is_entry_point(&self) -> bool {
		match self {
			Self::ContextDependent(definition) => definition.is_entry_point(),
			_ => self.base().is_some_and(DefinitionBase::is_entry_point),
		}
	}

	/// Shared state, absent for context-dependent definitions.
	pub fn base(&self) -> Option<&DefinitionBase> {
		match self {
			Self::Class(definition) => Some(definition.base()),
			Self::Reference(definition) => Some(definition.base()),
			Self::ContextDependent(_) => None,
			Self::Container(definition) => Some(definition.base()),
		}
	}

	pub(crate) fn base_mut(&mut self) -> Option<&mut DefinitionBase> {
		match self {
			Self::Class(definition) => Some(definition.base_mut()),
			Self::Reference(definition) => Some(definition.base_mut()),
			Self::ContextDependent(_) => None,
			Self::Container(_) => None,
		}
	}

	/// Returns `true` while the constructor and property shape is unknown.
	pub fn needs_dependency_resolution(&self) -> bool {
		match self {
			Self::Class(definition) => definition.needs_dependency_resolution(),
			_ => false,
		}
	}

	/// Expands the constructor and property shape of a class definition.
	pub fn resolve_dependencies(
		&mut self,
		shapes: &dyn TypeShapeProvider,
		config: &CompilerConfig,
	) -> ContainerResult<()> {
		match self {
			Self::Class(definition) => definition.resolve_dependencies(shapes, config),
			_ => Ok(()),
		}
	}

	/// Identifiers this definition needs, in emission order.
	pub fn class_dependencies(&self) -> Vec<String> {
		match self {
			Self::Class(definition) => definition.class_dependencies(),
			Self::Reference(definition) => vec![definition.referenced_id().to_string()],
			Self::ContextDependent(definition) => definition.class_dependencies(),
			Self::Container(_) => Vec::new(),
		}
	}

	/// Resolves this definition for `parent`.
	pub fn resolve<'a>(
		&'a self,
		definitions: &'a Definitions,
		parent: &str,
	) -> ContainerResult<ResolvedDefinition<'a>> {
		match self {
			Self::Class(definition) => Ok(ResolvedDefinition::Class(definition)),
			Self::Reference(definition) => Ok(ResolvedDefinition::Reference(definition)),
			Self::Container(definition) => Ok(ResolvedDefinition::Container(definition)),
			Self::ContextDependent(_) => definitions.resolve(self.id(), parent),
		}
	}

	/// Constructs an instance for `parent`.
	pub fn instantiate(
		&self,
		instantiation: &mut DefinitionInstantiation,
		parent: &str,
	) -> ContainerResult<Instance> {
		let definitions = instantiation.definitions();
		self.resolve(&definitions, parent)?
			.instantiate(instantiation)
	}

	/// Emits construction code for `parent`.
	pub fn compile(
		&self,
		compilation: &DefinitionCompilation<'_>,
		parent: &str,
		indent: usize,
		inline: bool,
		preloaded: &mut PreloadedIds,
	) -> ContainerResult<String> {
		self.resolve(compilation.definitions(), parent)?
			.compile(compilation, indent, inline, preloaded)
	}
}

impl From<ClassDefinition> for Definition {
	fn from(definition: ClassDefinition) -> Self {
		Self::Class(definition)
	}
}

impl From<ReferenceDefinition> for Definition {
	fn from(definition: ReferenceDefinition) -> Self {
		Self::Reference(definition)
	}
}

impl From<ContextDependentDefinition> for Definition {
	fn from(definition: ContextDependentDefinition) -> Self {
		Self::ContextDependent(definition)
	}
}

impl From<SelfDefinition> for Definition {
	fn from(definition: SelfDefinition) -> Self {
		Self::Container(definition)
	}
}

/// A definition after context resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedDefinition<'a> {
	/// Constructor call plus property assignments.
	Class(&'a ClassDefinition),
	/// Alias of another identifier.
	Reference(&'a ReferenceDefinition),
	/// The container itself.
	Container(&'a SelfDefinition),
}

impl<'a> ResolvedDefinition<'a> {
	/// Shared state.
	pub fn base(&self) -> &'a DefinitionBase {
		match self {
			Self::Class(definition) => definition.base(),
			Self::Reference(definition) => definition.base(),
			Self::Container(definition) => definition.base(),
		}
	}

	/// Component identifier.
	pub fn id(&self) -> &'a str {
		self.base().id()
	}

	/// Accessor name.
	pub fn hash(&self) -> String {
		self.base().hash()
	}

	/// Returns `true` for singleton scope.
	pub fn is_singleton(&self) -> bool {
		self.base().is_singleton()
	}

	/// Returns `true` if the component is reachable from outside the container.
	pub fn is_entry_point(&self) -> bool {
		self.base().is_entry_point()
	}

	/// Returns `true` if the component source is loaded before construction.
	pub fn is_autoloaded(&self) -> bool {
		self.base().is_autoloaded()
	}

	/// Returns `true` if the component is emitted as a separate file.
	pub fn is_file_based(&self) -> bool {
		self.base().is_file_based()
	}

	/// Returns `true` when construction can skip the singleton registry.
	pub fn is_singleton_check_eliminable(&self) -> bool {
		self.base().is_singleton_check_eliminable()
	}

	/// Returns `true` when the construction expression can be embedded in its consumer.
	pub fn is_inlinable(&self) -> bool {
		self.base().is_inlinable()
	}

	/// Returns `true` when the consumer must emit the load statements of this definition.
	pub fn is_autoloading_inlinable(&self, inline: bool) -> bool {
		self.base().is_autoloading_inlinable(inline)
	}

	/// Type returned by the accessor of this definition.
	pub fn return_type(&self) -> String {
		match self {
			Self::Class(definition) => format!("Arc<{}>", definition.id()),
			Self::Reference(definition) => format!("Arc<dyn {} + Send + Sync>", definition.id()),
			Self::Container(_) => "Arc<Self>".to_string(),
		}
	}

	/// Constructs an instance.
	pub fn instantiate(&self, instantiation: &mut DefinitionInstantiation) -> ContainerResult<Instance> {
		match self {
			Self::Class(definition) => definition.instantiate(instantiation),
			Self::Reference(definition) => definition.instantiate(instantiation),
			Self::Container(definition) => Ok(definition.instantiate(instantiation)),
		}
	}

	/// Emits construction code.
	///
	/// With `inline` unset the result is a function body indented by
	/// `indent` tabs. With `inline` set it is an expression whose
	/// continuation lines are indented relative to `indent`.
	pub fn compile(
		&self,
		compilation: &DefinitionCompilation<'_>,
		indent: usize,
		inline: bool,
		preloaded: &mut PreloadedIds,
	) -> ContainerResult<String> {
		match self {
			Self::Class(definition) => definition.compile(compilation, indent, inline, preloaded),
			Self::Reference(definition) => definition.compile(compilation, indent, inline, preloaded),
			Self::Container(definition) => Ok(definition.compile(compilation, indent, inline)),
		}
	}

	/// Appends the source files to load before this construction runs.
	///
	/// Inlined dependencies contribute their files too, since their
	/// construction happens in the same body.
	pub fn collect_loads(
		&self,
		compilation: &DefinitionCompilation<'_>,
		inline: bool,
		preloaded: &mut PreloadedIds,
		files: &mut Vec<String>,
	) -> ContainerResult<()> {
		let base = self.base();
		if base.is_autoloading_inlinable(inline) && preloaded.insert(base.id()) {
			for file in base.source_files() {
				let file = compilation.autoload().relative_path(file);
				if !files.contains(&file) {
					files.push(file);
				}
			}
		}

		let dependencies: Vec<&str> = match self {
			Self::Class(definition) => definition.argument_class_ids().collect(),
			Self::Reference(definition) => vec![definition.referenced_id()],
			Self::Container(_) => Vec::new(),
		};
		for dependency in dependencies {
			let resolved = compilation.resolve(dependency, base.id())?;
			if resolved.is_inlinable() {
				resolved.collect_loads(compilation, true, preloaded, files)?;
			}
		}
		Ok(())
	}
}

/// Resolved definitions keyed by component identifier.
///
/// Iteration follows identifier order, which keeps generated output stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
	definitions: BTreeMap<String, Definition>,
}

impl Definitions {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts `definition` under its own identifier, replacing any previous one.
	pub fn insert(&mut self, definition: impl Into<Definition>) {
		let definition = definition.into();
		self.definitions.insert(definition.id().to_string(), definition);
	}

	/// Builder-style [`Definitions::insert`].
	pub fn with(mut self, definition: impl Into<Definition>) -> Self {
		self.insert(definition);
		self
	}

	/// Returns the definition of `id`.
	pub fn get(&self, id: &str) -> ContainerResult<&Definition> {
		self.definitions
			.get(id)
			.ok_or_else(|| ContainerError::DefinitionNotFound(id.to_string()))
	}

	pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Definition> {
		self.definitions.get_mut(id)
	}

	/// Returns `true` if `id` has a definition.
	pub fn contains(&self, id: &str) -> bool {
		self.definitions.contains_key(id)
	}

	/// Number of definitions.
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	/// Returns `true` if there are no definitions.
	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	/// Iterates over the definitions in identifier order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Definition)> {
		self.definitions.iter().map(|(id, definition)| (id.as_str(), definition))
	}

	pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Definition> {
		self.definitions.values_mut()
	}

	/// Follows context-dependent definitions of `id` for `parent` to a concrete identifier.
	pub fn resolve_id<'a>(&'a self, id: &'a str, parent: &str) -> ContainerResult<&'a str> {
		let mut current = id;
		for _ in 0..=self.definitions.len() {
			match self.get(current)? {
				Definition::ContextDependent(definition) => {
					current = definition.target_for(parent)?;
				}
				_ => return Ok(current),
			}
		}
		Err(ContainerError::UnresolvedContext {
			id: id.to_string(),
			parent: parent.to_string(),
		})
	}

	/// Returns the concrete definition that constructs `id` for `parent`.
	pub fn resolve(&self, id: &str, parent: &str) -> ContainerResult<ResolvedDefinition<'_>> {
		let concrete = self.resolve_id(id, parent)?;
		match self.get(concrete)? {
			Definition::Class(definition) => Ok(ResolvedDefinition::Class(definition)),
			Definition::Reference(definition) => Ok(ResolvedDefinition::Reference(definition)),
			Definition::Container(definition) => Ok(ResolvedDefinition::Container(definition)),
			Definition::ContextDependent(_) => Err(ContainerError::UnresolvedContext {
				id: id.to_string(),
				parent: parent.to_string(),
			}),
		}
	}

	/// Records a consumer edge from `parent` to `id`.
	///
	/// The count lands on the definition `id` resolves to for `parent`.
	pub fn increase_reference_count(
		&mut self,
		id: &str,
		parent: &str,
		parent_is_singleton: bool,
	) -> ContainerResult<()> {
		let concrete = self.resolve_id(id, parent)?.to_string();
		if let Some(base) = self.get_mut(&concrete).and_then(Definition::base_mut) {
			base.increase_reference_count(parent_is_singleton);
		}
		Ok(())
	}
}

impl FromIterator<Definition> for Definitions {
	fn from_iter<I: IntoIterator<Item = Definition>>(iter: I) -> Self {
		let mut definitions = Self::new();
		for definition in iter {
			definitions.insert(definition);
		}
		definitions
	}
}
