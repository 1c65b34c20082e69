use super::DefinitionBase;
use crate::compilation::DefinitionCompilation;
use crate::instantiation::{DefinitionInstantiation, Instance};
use crate::scope::Scope;

/// The container handing out itself.
///
/// Always a singleton, never an entry point, never autoloaded. Reference
/// counts stay at zero since construction is a handle copy.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfDefinition {
	base: DefinitionBase,
}

impl SelfDefinition {
	/// Creates the definition of the container identified by `id`.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			base: DefinitionBase::new(id, Scope::Singleton),
		}
	}

	/// Identifier of the container.
	pub fn id(&self) -> &str {
		self.base.id()
	}

	/// Shared state.
	pub fn base(&self) -> &DefinitionBase {
		&self.base
	}

	pub(crate) fn instantiate(&self, instantiation: &DefinitionInstantiation) -> Instance {
		Instance::Container(instantiation.container())
	}

	pub(crate) fn compile(
		&self,
		compilation: &DefinitionCompilation<'_>,
		indent: usize,
		inline: bool,
	) -> String {
		if inline {
			"Arc::new(self.clone())".to_string()
		} else {
			format!("{}Arc::new(self.clone())\n", compilation.indent(indent))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compilation::PreloadedIds;
	use crate::config::{AutoloadConfig, FileBasedDefinitionConfig};
	use crate::definition::{ClassDefinition, Definition, Definitions};
	use rstest::rstest;

	#[rstest]
	fn test_self_definition_flags() {
		// Arrange
		let definition = Definition::from(SelfDefinition::new("crate::Container"));

		// Act
		let base = definition.base().unwrap();

		// Assert
		assert!(base.is_singleton());
		assert!(!base.is_entry_point());
		assert!(!base.is_autoloaded());
		assert!(!base.is_file_based());
		assert_eq!(base.reference_count(), 0);
		assert!(!definition.needs_dependency_resolution());
		assert!(definition.class_dependencies().is_empty());
	}

	#[rstest]
	fn test_reference_count_stays_zero() {
		// Arrange
		let mut definitions = Definitions::new().with(SelfDefinition::new("crate::Container"));

		// Act
		definitions
			.increase_reference_count("crate::Container", "app::A", true)
			.unwrap();

		// Assert
		let base = definitions.get("crate::Container").unwrap().base().unwrap();
		assert_eq!(base.reference_count(), 0);
	}

	#[rstest]
	fn test_compile_injects_container_handle() {
		// Arrange
		let definitions = Definitions::new()
			.with(SelfDefinition::new("crate::Container"))
			.with(
				ClassDefinition::prototype("app::Jobs")
					.entry_point(true)
					.add_constructor_argument_from_class("crate::Container"),
			);
		let autoload = AutoloadConfig::default();
		let file_based = FileBasedDefinitionConfig::default();
		let compilation = DefinitionCompilation::new(&autoload, &file_based, &definitions);
		let mut preloaded = PreloadedIds::new();

		// Act
		let jobs = definitions
			.get("app::Jobs")
			.unwrap()
			.compile(&compilation, "", 0, false, &mut preloaded)
			.unwrap();
		let container = definitions
			.get("crate::Container")
			.unwrap()
			.compile(&compilation, "", 1, false, &mut preloaded)
			.unwrap();

		// Assert
		assert_eq!(jobs, "Arc::new(app::Jobs::new(\n\tArc::new(self.clone()),\n))\n");
		assert_eq!(container, "\tArc::new(self.clone())\n");
	}
}
