//! Container build error types.
//!
//! Every failure of a build is fatal: resolution, compilation and
//! persistence abort with one of these variants and nothing is emitted.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Container build and construction errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContainerError {
	/// A context-dependent definition has no branch for the requesting parent and no default.
	#[error("the context-dependent definition '{id}' can't be injected for '{parent}'")]
	UnresolvedContext {
		/// Identifier of the context-dependent definition.
		id: String,
		/// Identifier of the requesting parent (empty for a root request).
		parent: String,
	},

	/// Required configuration is missing or empty.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),

	/// The output sink could not materialize a location.
	#[error("cannot persist '{}': {source}", path.display())]
	OutputPersistence {
		/// Directory or file that could not be written.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// The type-shape provider does not know the identifier.
	#[error("unknown type: {0}")]
	UnknownType(String),

	/// An abstract type was reached without a hint choosing a concrete type.
	#[error("type '{0}' is not instantiable; add a hint that selects a concrete type")]
	NotInstantiable(String),

	/// A constructor parameter has no class, override or default value.
	#[error("parameter '{parameter}' of '{id}' can not be resolved")]
	UnresolvableParameter {
		/// Identifier of the type being constructed.
		id: String,
		/// Parameter name.
		parameter: String,
	},

	/// An override-typed argument or property has no value.
	#[error("no override value named '{name}' for '{id}'")]
	MissingOverride {
		/// Identifier of the definition.
		id: String,
		/// Parameter or property name.
		name: String,
	},

	/// Lookup of an identifier that has no definition.
	#[error("definition not found: {0}")]
	DefinitionNotFound(String),

	/// Construction reached a definition that is already being constructed.
	#[error("circular dependency detected while constructing '{id}': {path}")]
	CircularDependency {
		/// Identifier that closed the cycle.
		id: String,
		/// Construction path, e.g. `A -> B -> A`.
		path: String,
	},

	/// Construction nesting exceeded the supported depth.
	#[error("maximum construction depth of {0} exceeded")]
	MaxDepthExceeded(usize),

	/// TOML configuration could not be parsed.
	#[error("configuration parse error: {0}")]
	ConfigParse(String),

	/// IO error.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ContainerError {
	fn from(err: toml::de::Error) -> Self {
		Self::ConfigParse(err.to_string())
	}
}

impl ContainerError {
	/// Wraps an I/O failure that happened while writing `path`.
	pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::OutputPersistence {
			path: path.into(),
			source,
		}
	}
}
