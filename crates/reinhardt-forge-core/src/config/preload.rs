//! Preload manifest configuration.

use serde::{Deserialize, Serialize};

/// Files and classes listed in the generated preload manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreloadConfig {
	/// Component identifiers whose sources are preloaded.
	pub classes: Vec<String>,
	/// Extra files preloaded verbatim.
	pub files: Vec<String>,
	/// Namespaces whose components are preloaded.
	pub namespaces: Vec<NamespacePreload>,
	/// Directory that manifest entries are made relative to.
	pub relative_base_path: String,
}

impl PreloadConfig {
	/// Creates a manifest configuration relative to `relative_base_path`.
	pub fn new(relative_base_path: impl Into<String>) -> Self {
		Self {
			relative_base_path: relative_base_path.into(),
			..Self::default()
		}
	}

	/// Preloads the source of `id`.
	pub fn class(mut self, id: impl Into<String>) -> Self {
		self.classes.push(id.into());
		self
	}

	/// Preloads `file`.
	pub fn file(mut self, file: impl Into<String>) -> Self {
		self.files.push(file.into());
		self
	}

	/// Preloads every component in `namespace`.
	pub fn namespace(mut self, preload: NamespacePreload) -> Self {
		self.namespaces.push(preload);
		self
	}

	/// Returns `true` if nothing would be preloaded.
	pub fn is_empty(&self) -> bool {
		self.classes.is_empty() && self.files.is_empty() && self.namespaces.is_empty()
	}
}

/// Module scan feeding the preload manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespacePreload {
	/// Module path, e.g. `crate::mail`.
	pub namespace: String,
	/// Include nested modules.
	#[serde(default = "default_true")]
	pub recursive: bool,
	/// Skip abstract types.
	#[serde(default)]
	pub only_instantiable: bool,
}

impl NamespacePreload {
	/// Scans `namespace` recursively, abstract types included.
	pub fn new(namespace: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into().trim_matches(':').to_string(),
			recursive: true,
			only_instantiable: false,
		}
	}

	/// Sets whether nested modules are scanned.
	pub fn recursive(mut self, recursive: bool) -> Self {
		self.recursive = recursive;
		self
	}

	/// Sets whether abstract types are skipped.
	pub fn only_instantiable(mut self, only_instantiable: bool) -> Self {
		self.only_instantiable = only_instantiable;
		self
	}
}

pub(crate) fn default_true() -> bool {
	true
}
