//! Compiler configuration.
//!
//! A [`CompilerConfig`] is built in code or loaded from TOML and passed
//! explicitly to the resolver, the compiler and the builders:
//!
//! ```toml
//! container_namespace = "crate::di"
//! container_name = "Container"
//!
//! [[entry_points]]
//! class = "crate::mail::Mailer"
//!
//! [[entry_points]]
//! namespace = "crate::jobs"
//! recursive = false
//!
//! [autoload]
//! enabled_globally = true
//! root_directory = "/srv/app"
//!
//! [file_based_definitions]
//! enabled_globally = false
//! relative_directory = "definitions"
//! ```

mod autoload;
mod preload;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use autoload::{AutoloadConfig, FileBasedDefinitionConfig};
pub(crate) use autoload::relative_to;
pub use preload::{NamespacePreload, PreloadConfig};

use crate::error::{ContainerError, ContainerResult};
use crate::hint::Hint;

/// Everything the resolver and the compiler need to know about one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
	/// Module the generated container is included in.
	pub container_namespace: String,
	/// Name of the generated container struct.
	pub container_name: String,
	/// Inject class-typed constructor parameters.
	pub use_constructor_injection: bool,
	/// Inject class-typed properties.
	pub use_property_injection: bool,
	/// Externally reachable components.
	pub entry_points: Vec<EntryPoint>,
	/// Hints keyed by component identifier.
	pub hints: BTreeMap<String, Hint>,
	/// Autoloading policy.
	pub autoload: AutoloadConfig,
	/// File-based definition policy.
	pub file_based_definitions: FileBasedDefinitionConfig,
	/// Preload manifest contents.
	pub preload: PreloadConfig,
}

impl Default for CompilerConfig {
	fn default() -> Self {
		Self {
			container_namespace: "crate".to_string(),
			container_name: "Container".to_string(),
			use_constructor_injection: true,
			use_property_injection: true,
			entry_points: Vec::new(),
			hints: BTreeMap::new(),
			autoload: AutoloadConfig::default(),
			file_based_definitions: FileBasedDefinitionConfig::default(),
			preload: PreloadConfig::default(),
		}
	}
}

impl CompilerConfig {
	/// Creates a configuration with default policies.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a configuration from TOML.
	pub fn from_toml_str(source: &str) -> ContainerResult<Self> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads a configuration from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> ContainerResult<Self> {
		let source = std::fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}

	/// Checks the values the generated code depends on.
	pub fn validate(&self) -> ContainerResult<()> {
		if !is_identifier(&self.container_name) {
			return Err(ContainerError::InvalidConfiguration(format!(
				"container name '{}' is not a valid identifier",
				self.container_name
			)));
		}
		if self.container_namespace.trim_matches(':').is_empty() {
			return Err(ContainerError::InvalidConfiguration(
				"container namespace can not be empty".to_string(),
			));
		}
		Ok(())
	}

	/// Identifier of the container itself, e.g. `crate::di::Container`.
	pub fn container_id(&self) -> String {
		format!(
			"{}::{}",
			self.container_namespace.trim_matches(':'),
			self.container_name
		)
	}

	/// Sets the container module and struct name.
	pub fn container(mut self, namespace: impl Into<String>, name: impl Into<String>) -> Self {
		self.container_namespace = namespace.into();
		self.container_name = name.into();
		self
	}

	/// Adds an entry point.
	pub fn entry_point(mut self, entry_point: impl Into<EntryPoint>) -> Self {
		self.entry_points.push(entry_point.into());
		self
	}

	/// Adds or replaces the hint for `id`.
	pub fn hint(mut self, id: impl Into<String>, hint: impl Into<Hint>) -> Self {
		self.hints.insert(id.into(), hint.into());
		self
	}

	/// Enables or disables constructor injection.
	pub fn constructor_injection(mut self, enabled: bool) -> Self {
		self.use_constructor_injection = enabled;
		self
	}

	/// Enables or disables property injection.
	pub fn property_injection(mut self, enabled: bool) -> Self {
		self.use_property_injection = enabled;
		self
	}

	/// Replaces the autoloading policy.
	pub fn autoload(mut self, autoload: AutoloadConfig) -> Self {
		self.autoload = autoload;
		self
	}

	/// Replaces the file-based definition policy.
	pub fn file_based_definitions(mut self, file_based: FileBasedDefinitionConfig) -> Self {
		self.file_based_definitions = file_based;
		self
	}

	/// Replaces the preload configuration.
	pub fn preload(mut self, preload: PreloadConfig) -> Self {
		self.preload = preload;
		self
	}
}

/// An externally reachable component or module of components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryPoint {
	/// A single component.
	Class(ClassEntryPoint),
	/// Every component found in a module.
	Namespace(NamespaceEntryPoint),
}

impl EntryPoint {
	/// Entry point for one component.
	pub fn class(id: impl Into<String>) -> Self {
		Self::Class(ClassEntryPoint {
			class: id.into(),
			autoloaded: None,
			file_based: None,
		})
	}

	/// Recursive entry point for the instantiable components of `namespace`.
	pub fn namespace(namespace: impl Into<String>) -> Self {
		Self::Namespace(NamespaceEntryPoint {
			namespace: namespace.into(),
			recursive: true,
			only_instantiable: true,
			autoloaded: None,
			file_based: None,
		})
	}

	/// Forces autoloading on or off for the components of this entry point.
	pub fn autoloaded(mut self, autoloaded: bool) -> Self {
		match &mut self {
			Self::Class(entry) => entry.autoloaded = Some(autoloaded),
			Self::Namespace(entry) => entry.autoloaded = Some(autoloaded),
		}
		self
	}

	/// Forces file-based emission on or off for the components of this entry point.
	pub fn file_based(mut self, file_based: bool) -> Self {
		match &mut self {
			Self::Class(entry) => entry.file_based = Some(file_based),
			Self::Namespace(entry) => entry.file_based = Some(file_based),
		}
		self
	}

	/// Sets whether a namespace entry point scans nested modules.
	pub fn recursive(mut self, recursive: bool) -> Self {
		if let Self::Namespace(entry) = &mut self {
			entry.recursive = recursive;
		}
		self
	}

	/// Autoload override, if any.
	pub fn autoload_override(&self) -> Option<bool> {
		match self {
			Self::Class(entry) => entry.autoloaded,
			Self::Namespace(entry) => entry.autoloaded,
		}
	}

	/// File-based override, if any.
	pub fn file_based_override(&self) -> Option<bool> {
		match self {
			Self::Class(entry) => entry.file_based,
			Self::Namespace(entry) => entry.file_based,
		}
	}
}

impl From<&str> for EntryPoint {
	fn from(id: &str) -> Self {
		Self::class(id)
	}
}

/// A single externally reachable component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassEntryPoint {
	/// Component identifier.
	pub class: String,
	/// Autoload override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub autoloaded: Option<bool>,
	/// File-based override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_based: Option<bool>,
}

/// Every component of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceEntryPoint {
	/// Module path.
	pub namespace: String,
	/// Include nested modules.
	#[serde(default = "preload::default_true")]
	pub recursive: bool,
	/// Skip abstract types.
	#[serde(default = "preload::default_true")]
	pub only_instantiable: bool,
	/// Autoload override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub autoloaded: Option<bool>,
	/// File-based override.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file_based: Option<bool>,
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
		_ => return false,
	}
	name != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
