//! Runtime support for generated containers.
//!
//! A generated container holds an `Arc<ContainerRuntime>` and calls into it
//! from its accessors: `load` before constructing autoloaded components and
//! `singleton`/`store_singleton` around memoized constructions.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::scope::SingletonEntries;

/// Hook invoked the first time a generated container needs a source file.
pub trait SourceLoader: Send + Sync {
	/// Makes the source at `path` available. Called at most once per path.
	fn load(&self, path: &Path);
}

impl<F> SourceLoader for F
where
	F: Fn(&Path) + Send + Sync,
{
	fn load(&self, path: &Path) {
		self(path)
	}
}

/// Shared state of one generated container instance.
pub struct ContainerRuntime {
	root_directory: PathBuf,
	loader: Option<Arc<dyn SourceLoader>>,
	loaded: Mutex<HashSet<String>>,
	singletons: SingletonEntries,
}

impl ContainerRuntime {
	/// Creates a runtime whose relative source paths resolve against `root_directory`.
	pub fn new(root_directory: impl Into<PathBuf>) -> Self {
		Self {
			root_directory: root_directory.into(),
			loader: None,
			loaded: Mutex::new(HashSet::new()),
			singletons: SingletonEntries::new(),
		}
	}

	/// Installs the hook that receives every newly loaded source file.
	pub fn with_loader(mut self, loader: impl SourceLoader + 'static) -> Self {
		self.loader = Some(Arc::new(loader));
		self
	}

	/// Returns the root directory used for relative source paths.
	pub fn root_directory(&self) -> &Path {
		&self.root_directory
	}

	/// Ensures `file` has been handed to the loader exactly once.
	pub fn load(&self, file: &str) {
		if !self.loaded.lock().insert(file.to_string()) {
			return;
		}
		let path = self.root_directory.join(file);
		tracing::debug!(path = %path.display(), "Loading component source");
		if let Some(loader) = &self.loader {
			loader.load(&path);
		}
	}

	/// Returns the files loaded so far, sorted.
	pub fn loaded_files(&self) -> Vec<String> {
		let mut files: Vec<String> = self.loaded.lock().iter().cloned().collect();
		files.sort();
		files
	}

	/// Returns the singleton stored for `id`, if any.
	pub fn singleton<T: Clone + Send + Sync + 'static>(&self, id: &str) -> Option<T> {
		self.singletons.get(id)
	}

	/// Stores `value` as the singleton for `id` and hands it back.
	pub fn store_singleton<T: Clone + Send + Sync + 'static>(&self, id: &str, value: T) -> T {
		self.singletons.insert(id, value.clone());
		value
	}

	/// Returns the singleton registry.
	pub fn singletons(&self) -> &SingletonEntries {
		&self.singletons
	}
}

impl Default for ContainerRuntime {
	fn default() -> Self {
		Self::new("")
	}
}

impl fmt::Debug for ContainerRuntime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContainerRuntime")
			.field("root_directory", &self.root_directory)
			.field("has_loader", &self.loader.is_some())
			.field("loaded", &self.loaded_files())
			.field("singletons", &self.singletons)
			.finish()
	}
}
