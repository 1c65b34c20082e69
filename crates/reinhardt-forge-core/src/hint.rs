//! User-declared construction hints.
//!
//! Hints take precedence over everything the type-shape provider reports.
//! In TOML a hint is either a class name, a [`DefinitionHint`] table or a
//! [`ContextDependentDefinitionHint`] table:
//!
//! ```toml
//! [hints]
//! "crate::mail::Transport" = "crate::mail::SmtpTransport"
//!
//! [hints."crate::mail::Mailer"]
//! class = "crate::mail::Mailer"
//! scope = "prototype"
//! parameters = { sender = "noreply@example.com" }
//!
//! [hints."crate::log::Logger"]
//! default = "crate::log::FileLogger"
//! contexts = [{ target = "crate::log::NullLogger", parents = ["crate::jobs::Cleanup"] }]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scope::Scope;

/// Hint for one component identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hint {
	/// Construction depends on the consumer.
	ContextDependent(ContextDependentDefinitionHint),
	/// Fixed class, scope and overrides.
	Definition(DefinitionHint),
}

impl Hint {
	/// Hint that aliases an identifier to `class`.
	pub fn alias(class: impl Into<String>) -> Self {
		Self::Definition(DefinitionHint::singleton(class))
	}

	/// Returns every class hint mentioned by this hint.
	pub fn targets(&self) -> Vec<&DefinitionHint> {
		match self {
			Self::Definition(hint) => vec![hint],
			Self::ContextDependent(hint) => hint.targets().collect(),
		}
	}
}

impl From<DefinitionHint> for Hint {
	fn from(hint: DefinitionHint) -> Self {
		Self::Definition(hint)
	}
}

impl From<ContextDependentDefinitionHint> for Hint {
	fn from(hint: ContextDependentDefinitionHint) -> Self {
		Self::ContextDependent(hint)
	}
}

impl From<&str> for Hint {
	fn from(class: &str) -> Self {
		Self::alias(class)
	}
}

/// Concrete class choice with literal overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DefinitionHintRepr")]
pub struct DefinitionHint {
	/// Class constructed for the hinted identifier.
	pub class: String,
	/// Scope of the constructed class.
	pub scope: Scope,
	/// Constructor parameter overrides by name.
	pub parameters: BTreeMap<String, Value>,
	/// Property overrides by name.
	pub properties: BTreeMap<String, Value>,
}

impl DefinitionHint {
	/// Singleton hint for `class`.
	pub fn singleton(class: impl Into<String>) -> Self {
		Self::new(class, Scope::Singleton)
	}

	/// Prototype hint for `class`.
	pub fn prototype(class: impl Into<String>) -> Self {
		Self::new(class, Scope::Prototype)
	}

	fn new(class: impl Into<String>, scope: Scope) -> Self {
		Self {
			class: class.into(),
			scope,
			parameters: BTreeMap::new(),
			properties: BTreeMap::new(),
		}
	}

	/// Overrides constructor parameter `name`.
	pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.parameters.insert(name.into(), value.into());
		self
	}

	/// Overrides property `name`.
	pub fn property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.properties.insert(name.into(), value.into());
		self
	}
}

impl From<&str> for DefinitionHint {
	fn from(class: &str) -> Self {
		Self::singleton(class)
	}
}

impl From<String> for DefinitionHint {
	fn from(class: String) -> Self {
		Self::singleton(class)
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionHintRepr {
	Class(String),
	Table(DefinitionHintTable),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionHintTable {
	class: String,
	#[serde(default)]
	scope: Scope,
	#[serde(default)]
	parameters: BTreeMap<String, Value>,
	#[serde(default)]
	properties: BTreeMap<String, Value>,
}

impl From<DefinitionHintRepr> for DefinitionHint {
	fn from(repr: DefinitionHintRepr) -> Self {
		match repr {
			DefinitionHintRepr::Class(class) => Self::singleton(class),
			DefinitionHintRepr::Table(table) => Self {
				class: table.class,
				scope: table.scope,
				parameters: table.parameters,
				properties: table.properties,
			},
		}
	}
}

/// Per-consumer class selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextDependentDefinitionHint {
	/// Class used when no branch names the consumer.
	#[serde(default)]
	pub default: Option<DefinitionHint>,
	/// Consumer-specific branches; later branches win for a repeated parent.
	#[serde(default)]
	pub contexts: Vec<ContextBranch>,
}

/// One branch of a [`ContextDependentDefinitionHint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextBranch {
	/// Class constructed for the listed parents.
	pub target: DefinitionHint,
	/// Consumers receiving `target`.
	pub parents: Vec<String>,
}

impl ContextDependentDefinitionHint {
	/// Creates a hint with an optional default class.
	pub fn new(default: Option<DefinitionHint>) -> Self {
		Self {
			default,
			contexts: Vec::new(),
		}
	}

	/// Sets the default class.
	pub fn default_class(mut self, hint: impl Into<DefinitionHint>) -> Self {
		self.default = Some(hint.into());
		self
	}

	/// Selects `hint` whenever one of `parents` asks for the identifier.
	pub fn class_context<I, S>(mut self, hint: impl Into<DefinitionHint>, parents: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.contexts.push(ContextBranch {
			target: hint.into(),
			parents: parents.into_iter().map(Into::into).collect(),
		});
		self
	}

	/// Returns the class hint selected for `parent`, if any branch names it.
	pub fn branch_for(&self, parent: &str) -> Option<&DefinitionHint> {
		self.contexts
			.iter()
			.rev()
			.find(|branch| branch.parents.iter().any(|p| p == parent))
			.map(|branch| &branch.target)
	}

	/// Returns the consumer-to-class mapping, later branches overriding earlier ones.
	pub fn parent_map(&self) -> BTreeMap<String, String> {
		let mut map = BTreeMap::new();
		for branch in &self.contexts {
			for parent in &branch.parents {
				map.insert(parent.clone(), branch.target.class.clone());
			}
		}
		map
	}

	/// Iterates over the default and every branch target.
	pub fn targets(&self) -> impl Iterator<Item = &DefinitionHint> {
		self.default
			.iter()
			.chain(self.contexts.iter().map(|branch| &branch.target))
	}
}
