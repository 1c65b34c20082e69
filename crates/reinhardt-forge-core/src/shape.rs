//! Type shapes: what the resolver needs to know about a component type.
//!
//! The resolver never inspects types itself. It asks a [`TypeShapeProvider`]
//! for the constructor and property dependencies of each identifier and for
//! the identifiers contained in a module when scanning namespaces.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ContainerResult;

/// Source of constructor and property shapes.
pub trait TypeShapeProvider {
	/// Returns the shape of `id`, or `None` if the type is unknown.
	fn shape(&self, id: &str) -> Option<TypeShape>;

	/// Returns the identifiers declared in `namespace`, sorted.
	///
	/// Nested modules are included only when `recursive` is set.
	fn identifiers_in(&self, namespace: &str, recursive: bool) -> Vec<String>;
}

/// Constructor and property dependencies of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeShape {
	/// Name of the associated constructor function.
	pub constructor: String,
	/// Constructor parameters, in call order.
	pub parameters: Vec<Parameter>,
	/// Injectable public fields.
	pub properties: Vec<Property>,
	/// `false` for traits and other types that can not be constructed.
	pub instantiable: bool,
	/// File declaring the type, used for autoloading and preloading.
	pub source_file: Option<String>,
	/// Types whose sources must be loaded before this one.
	pub supertypes: Vec<String>,
}

impl Default for TypeShape {
	fn default() -> Self {
		Self {
			constructor: "new".to_string(),
			parameters: Vec::new(),
			properties: Vec::new(),
			instantiable: true,
			source_file: None,
			supertypes: Vec::new(),
		}
	}
}

impl TypeShape {
	/// Creates a shape with a parameterless `new` constructor.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates the shape of an abstract type.
	pub fn abstract_type() -> Self {
		Self {
			instantiable: false,
			..Self::default()
		}
	}

	/// Sets the constructor name.
	pub fn constructor(mut self, name: impl Into<String>) -> Self {
		self.constructor = name.into();
		self
	}

	/// Appends a class-typed constructor parameter.
	pub fn class_parameter(mut self, name: impl Into<String>, class: impl Into<String>) -> Self {
		self.parameters.push(Parameter {
			name: name.into(),
			class: Some(class.into()),
			default: None,
		});
		self
	}

	/// Appends a scalar constructor parameter with an optional default.
	pub fn value_parameter(
		mut self,
		name: impl Into<String>,
		default: Option<serde_json::Value>,
	) -> Self {
		self.parameters.push(Parameter {
			name: name.into(),
			class: None,
			default,
		});
		self
	}

	/// Appends a class-typed property.
	pub fn class_property(mut self, name: impl Into<String>, class: impl Into<String>) -> Self {
		self.properties.push(Property {
			name: name.into(),
			class: Some(class.into()),
		});
		self
	}

	/// Appends a property that can only be set through an override.
	pub fn value_property(mut self, name: impl Into<String>) -> Self {
		self.properties.push(Property {
			name: name.into(),
			class: None,
		});
		self
	}

	/// Sets the declaring source file.
	pub fn source_file(mut self, path: impl Into<String>) -> Self {
		self.source_file = Some(path.into());
		self
	}

	/// Appends a supertype.
	pub fn supertype(mut self, id: impl Into<String>) -> Self {
		self.supertypes.push(id.into());
		self
	}
}

/// One constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
	/// Parameter name.
	pub name: String,
	/// Component identifier of the parameter type, when it is injectable.
	#[serde(default)]
	pub class: Option<String>,
	/// Literal used when nothing else supplies a value.
	#[serde(default)]
	pub default: Option<serde_json::Value>,
}

/// One injectable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
	/// Field name.
	pub name: String,
	/// Component identifier of the field type, when it is injectable.
	#[serde(default)]
	pub class: Option<String>,
}

/// In-memory [`TypeShapeProvider`].
///
/// Registries are usually generated by a build script and stored as TOML:
///
/// ```toml
/// [types."crate::mail::Mailer"]
/// source_file = "src/mail.rs"
/// parameters = [
///     { name = "transport", class = "crate::mail::Transport" },
///     { name = "sender", default = "noreply@example.com" },
/// ]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticTypeRegistry {
	#[serde(default)]
	types: BTreeMap<String, TypeShape>,
}

impl StaticTypeRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the shape of `id`.
	pub fn register(mut self, id: impl Into<String>, shape: TypeShape) -> Self {
		self.insert(id, shape);
		self
	}

	/// Registers the shape of `id` in place.
	pub fn insert(&mut self, id: impl Into<String>, shape: TypeShape) {
		self.types.insert(id.into(), shape);
	}

	/// Parses a registry from TOML.
	pub fn from_toml_str(source: &str) -> ContainerResult<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Reads a registry from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> ContainerResult<Self> {
		let source = std::fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}

	/// Returns the number of registered types.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Returns `true` if no type is registered.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

impl TypeShapeProvider for StaticTypeRegistry {
	fn shape(&self, id: &str) -> Option<TypeShape> {
		self.types.get(id).cloned()
	}

	fn identifiers_in(&self, namespace: &str, recursive: bool) -> Vec<String> {
		let namespace = namespace.trim_matches(':');
		let prefix = format!("{namespace}::");
		self.types
			.keys()
			.filter_map(|id| {
				let rest = id.strip_prefix(&prefix)?;
				(recursive || !rest.contains("::")).then(|| id.clone())
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn registry() -> StaticTypeRegistry {
		StaticTypeRegistry::new()
			.register("app::mail::Mailer", TypeShape::new())
			.register("app::mail::smtp::Transport", TypeShape::new())
			.register("app::mail::Sender", TypeShape::abstract_type())
			.register("app::billing::Invoice", TypeShape::new())
	}

	#[rstest]
	fn test_identifiers_in_recursive(registry: StaticTypeRegistry) {
		// Act
		let ids = registry.identifiers_in("app::mail", true);

		// Assert
		assert_eq!(
			ids,
			vec!["app::mail::Mailer", "app::mail::Sender", "app::mail::smtp::Transport"]
		);
	}

	#[rstest]
	fn test_identifiers_in_flat(registry: StaticTypeRegistry) {
		// Act
		let ids = registry.identifiers_in("::app::mail::", false);

		// Assert
		assert_eq!(ids, vec!["app::mail::Mailer", "app::mail::Sender"]);
	}

	#[rstest]
	fn test_registry_from_toml() {
		// Arrange
		let source = r#"
[types."app::mail::Mailer"]
source_file = "src/mail.rs"
supertypes = ["app::mail::Sender"]
parameters = [
	{ name = "transport", class = "app::mail::Transport" },
	{ name = "retries", default = 3 },
]
properties = [{ name = "logger", class = "app::Logger" }]

[types."app::mail::Sender"]
instantiable = false
"#;

		// Act
		let registry = StaticTypeRegistry::from_toml_str(source).unwrap();

		// Assert
		let mailer = registry.shape("app::mail::Mailer").unwrap();
		assert_eq!(mailer.constructor, "new");
		assert_eq!(mailer.parameters.len(), 2);
		assert_eq!(
			mailer.parameters[0].class.as_deref(),
			Some("app::mail::Transport")
		);
		assert_eq!(mailer.parameters[1].default, Some(serde_json::json!(3)));
		assert_eq!(mailer.properties[0].name, "logger");
		assert_eq!(mailer.source_file.as_deref(), Some("src/mail.rs"));
		assert!(mailer.instantiable);
		assert!(!registry.shape("app::mail::Sender").unwrap().instantiable);
	}

	#[rstest]
	fn test_registry_from_invalid_toml_fails() {
		// Act
		let result = StaticTypeRegistry::from_toml_str("[types.\"a\"]\nparameters = 3");

		// Assert
		assert!(result.is_err());
	}
}
