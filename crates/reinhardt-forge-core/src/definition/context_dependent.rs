use std::collections::BTreeMap;

use crate::error::{ContainerError, ContainerResult};

/// Chooses the identifier to construct based on the consumer that asks.
///
/// Branches and the default are identifiers of other definitions, so a
/// branch shared by several consumers keeps a single reference count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDependentDefinition {
	referrer_id: String,
	is_entry_point: bool,
	default: Option<String>,
	contexts: BTreeMap<String, String>,
}

impl ContextDependentDefinition {
	/// Creates a definition selecting `contexts[parent]`, else `default`.
	pub fn new(
		referrer_id: impl Into<String>,
		default: Option<String>,
		contexts: BTreeMap<String, String>,
	) -> Self {
		Self {
			referrer_id: referrer_id.into(),
			is_entry_point: false,
			default,
			contexts,
		}
	}

	/// Marks the definition as an entry point.
	pub fn entry_point(mut self, is_entry_point: bool) -> Self {
		self.is_entry_point = is_entry_point;
		self
	}

	/// Identifier of the definition.
	pub fn id(&self) -> &str {
		&self.referrer_id
	}

	/// Returns `true` if the identifier is reachable from outside the container.
	pub fn is_entry_point(&self) -> bool {
		self.is_entry_point
	}

	/// Identifier selected when no branch names the consumer.
	pub fn default(&self) -> Option<&str> {
		self.default.as_deref()
	}

	/// Consumer to identifier mapping.
	pub fn contexts(&self) -> &BTreeMap<String, String> {
		&self.contexts
	}

	/// Returns the identifier constructed for `parent`.
	pub fn target_for(&self, parent: &str) -> ContainerResult<&str> {
		self.contexts
			.get(parent)
			.or(self.default.as_ref())
			.map(String::as_str)
			.ok_or_else(|| ContainerError::UnresolvedContext {
				id: self.referrer_id.clone(),
				parent: parent.to_string(),
			})
	}

	/// Default followed by every distinct branch target.
	pub fn class_dependencies(&self) -> Vec<String> {
		let mut dependencies: Vec<String> = self.default.iter().cloned().collect();
		for target in self.contexts.values() {
			if !dependencies.contains(target) {
				dependencies.push(target.clone());
			}
		}
		dependencies
	}
}
