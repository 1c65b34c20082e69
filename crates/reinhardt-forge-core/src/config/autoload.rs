//! Autoloading and file-based definition policies.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Decides which components load their source before construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoloadConfig {
	/// Autoload every component unless excluded.
	pub enabled_globally: bool,
	/// Directory that emitted load paths are made relative to.
	pub root_directory: String,
	/// Components autoloaded even when the global switch is off.
	pub always_autoloaded: Vec<String>,
	/// Components never autoloaded.
	pub excluded: Vec<String>,
}

impl AutoloadConfig {
	/// Autoloads every component below `root_directory`.
	pub fn enabled_globally(root_directory: impl Into<String>) -> Self {
		Self {
			enabled_globally: true,
			root_directory: root_directory.into(),
			..Self::default()
		}
	}

	/// Autoloads only the components listed in `always_autoloaded`.
	pub fn disabled_globally(root_directory: impl Into<String>) -> Self {
		Self {
			enabled_globally: false,
			root_directory: root_directory.into(),
			..Self::default()
		}
	}

	/// Adds a component that is always autoloaded.
	pub fn always_autoload(mut self, id: impl Into<String>) -> Self {
		self.always_autoloaded.push(id.into());
		self
	}

	/// Adds a component that is never autoloaded.
	pub fn exclude(mut self, id: impl Into<String>) -> Self {
		self.excluded.push(id.into());
		self
	}

	/// Applies the policy to `id`.
	pub fn is_autoloaded(&self, id: &str) -> bool {
		if self.excluded.iter().any(|excluded| excluded == id) {
			return false;
		}
		self.enabled_globally || self.always_autoloaded.iter().any(|always| always == id)
	}

	/// Returns `file` relative to the root directory when it lies below it.
	pub fn relative_path(&self, file: &str) -> String {
		relative_to(&self.root_directory, file)
	}
}

/// Decides which components are emitted as separate definition files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBasedDefinitionConfig {
	/// Emit every component as a separate file unless excluded.
	pub enabled_globally: bool,
	/// Directory, relative to the container file, holding the fragments.
	pub relative_directory: String,
	/// Components always kept inside the container.
	pub excluded: Vec<String>,
}

impl Default for FileBasedDefinitionConfig {
	fn default() -> Self {
		Self {
			enabled_globally: false,
			relative_directory: "definitions".to_string(),
			excluded: Vec::new(),
		}
	}
}

impl FileBasedDefinitionConfig {
	/// Emits every component into `relative_directory`.
	pub fn enabled_globally(relative_directory: impl Into<String>) -> Self {
		Self {
			enabled_globally: true,
			relative_directory: relative_directory.into(),
			excluded: Vec::new(),
		}
	}

	/// Keeps every component inside the container.
	pub fn disabled_globally() -> Self {
		Self::default()
	}

	/// Adds a component that stays inside the container.
	pub fn exclude(mut self, id: impl Into<String>) -> Self {
		self.excluded.push(id.into());
		self
	}

	/// Applies the policy to `id`.
	pub fn is_file_based(&self, id: &str) -> bool {
		self.enabled_globally && !self.excluded.iter().any(|excluded| excluded == id)
	}

	/// Returns the path of the fragment for `hash`, as seen from the container file.
	pub fn fragment_path(&self, hash: &str) -> String {
		let directory = self.relative_directory.trim_end_matches('/');
		format!("{directory}/{hash}.rs")
	}
}

/// Strips `base` from `file` when `file` lies below it.
pub(crate) fn relative_to(base: &str, file: &str) -> String {
	if base.is_empty() {
		return file.to_string();
	}
	match Path::new(file).strip_prefix(base) {
		Ok(relative) => relative.to_string_lossy().into_owned(),
		Err(_) => file.to_string(),
	}
}
