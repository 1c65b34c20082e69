use super::{DefinitionBase, ResolvedDefinition};
use crate::compilation::{DefinitionCompilation, PreloadedIds};
use crate::error::ContainerResult;
use crate::instantiation::{DefinitionInstantiation, Instance};
use crate::scope::Scope;

/// Alias of one identifier to another.
///
/// The referrer is usually a trait and the referenced identifier a class
/// implementing it. The alias keeps its own scope and reference counts, so
/// a singleton alias of a prototype class hands out one shared instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDefinition {
	base: DefinitionBase,
	referenced_id: String,
}

impl ReferenceDefinition {
	/// Creates an alias of `referrer_id` to `referenced_id`.
	pub fn new(referrer_id: impl Into<String>, referenced_id: impl Into<String>, scope: Scope) -> Self {
		Self {
			base: DefinitionBase::new(referrer_id, scope),
			referenced_id: referenced_id.into(),
		}
	}

	/// Creates a singleton alias.
	pub fn singleton(referrer_id: impl Into<String>, referenced_id: impl Into<String>) -> Self {
		Self::new(referrer_id, referenced_id, Scope::Singleton)
	}

	/// Creates a prototype alias.
	pub fn prototype(referrer_id: impl Into<String>, referenced_id: impl Into<String>) -> Self {
		Self::new(referrer_id, referenced_id, Scope::Prototype)
	}

	/// Marks the alias as an entry point.
	pub fn entry_point(mut self, is_entry_point: bool) -> Self {
		self.base.set_entry_point(is_entry_point);
		self
	}

	/// Marks the alias as autoloaded.
	pub fn autoloaded(mut self, is_autoloaded: bool) -> Self {
		self.base.set_autoloaded(is_autoloaded);
		self
	}

	/// Marks the alias as file-based.
	pub fn file_based(mut self, is_file_based: bool) -> Self {
		self.base.set_file_based(is_file_based);
		self
	}

	/// Sets the reference counts directly.
	pub fn reference_counts(mut self, singleton: usize, prototype: usize) -> Self {
		self.base.set_reference_counts(singleton, prototype);
		self
	}

	/// Sets the files loaded before construction.
	pub fn source_files<I, S>(mut self, files: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.base.set_source_files(files.into_iter().map(Into::into).collect());
		self
	}

	/// Identifier of the alias.
	pub fn id(&self) -> &str {
		self.base.id()
	}

	/// Identifier the alias points to.
	pub fn referenced_id(&self) -> &str {
		&self.referenced_id
	}

	/// Shared state.
	pub fn base(&self) -> &DefinitionBase {
		&self.base
	}

	pub(crate) fn base_mut(&mut self) -> &mut DefinitionBase {
		&mut self.base
	}

	pub(crate) fn instantiate(
		&self,
		instantiation: &mut DefinitionInstantiation,
	) -> ContainerResult<Instance> {
		let id = self.base.id();
		if self.base.is_singleton()
			&& let Some(instance) = instantiation.singleton(id)
		{
			return Ok(instance);
		}

		let instance = instantiation.within(id, |instantiation| {
			instantiation.instantiate(&self.referenced_id, id)
		})?;

		if self.base.is_singleton() {
			instantiation.store_singleton(id, instance.clone());
		}
		Ok(instance)
	}

	pub(crate) fn compile(
		&self,
		compilation: &DefinitionCompilation<'_>,
		indent: usize,
		inline: bool,
		preloaded: &mut PreloadedIds,
	) -> ContainerResult<String> {
		let id = self.base.id();
		if inline {
			return compilation.compile_reference(&self.referenced_id, id, indent, preloaded);
		}

		let return_type = ResolvedDefinition::Reference(self).return_type();
		let memoized = !self.base.is_singleton_check_eliminable();
		let mut code = String::new();

		if memoized {
			code.push_str(&compilation.singleton_check(indent, &return_type, id));
		}

		let mut files = Vec::new();
		ResolvedDefinition::Reference(self).collect_loads(compilation, false, preloaded, &mut files)?;
		code.push_str(&compilation.load_statements(indent, &files));

		let value = compilation.compile_reference(&self.referenced_id, id, indent, preloaded)?;
		code.push_str(&compilation.return_value(indent, memoized, &return_type, id, &value));
		Ok(code)
	}
}
