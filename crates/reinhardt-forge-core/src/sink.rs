//! Persistence of generated sources.

use std::fs;
use std::path::{Path, PathBuf};

use crate::compiler::CompiledContainer;
use crate::error::{ContainerError, ContainerResult};

/// Destination of compiled output.
pub trait OutputSink {
	/// Stores the container source and its file-based fragments.
	fn persist_container(&mut self, compiled: &CompiledContainer) -> ContainerResult<()>;

	/// Stores the preload manifest.
	fn persist_preload(&mut self, manifest: &str) -> ContainerResult<()>;
}

/// Writes generated sources next to each other on disk.
///
/// Fragments land in `relative_directory` below the directory of the
/// container file, which is what the generated `include!` paths expect.
#[derive(Debug, Clone)]
pub struct FileSystemSink {
	container_path: PathBuf,
	relative_directory: String,
	preload_path: Option<PathBuf>,
}

impl FileSystemSink {
	/// Creates a sink writing the container to `container_path`.
	pub fn new(container_path: impl Into<PathBuf>, relative_directory: impl Into<String>) -> Self {
		Self {
			container_path: container_path.into(),
			relative_directory: relative_directory.into(),
			preload_path: None,
		}
	}

	/// Sets where the preload manifest is written.
	pub fn with_preload_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.preload_path = Some(path.into());
		self
	}

	/// Path of the container file.
	pub fn container_path(&self) -> &Path {
		&self.container_path
	}

	/// Directory holding file-based fragments.
	pub fn definitions_directory(&self) -> PathBuf {
		self.container_directory()
			.join(self.relative_directory.trim_end_matches('/'))
	}

	fn container_directory(&self) -> &Path {
		self.container_path.parent().unwrap_or_else(|| Path::new(""))
	}

	fn persist_fragments(&self, compiled: &CompiledContainer) -> ContainerResult<()> {
		if self.relative_directory.trim_matches('/').is_empty() {
			return Err(ContainerError::InvalidConfiguration(
				"Relative directory of file-based definitions can not be empty".to_string(),
			));
		}

		let directory = self.definitions_directory();
		if directory.exists() {
			fs::remove_dir_all(&directory)
				.map_err(|source| ContainerError::persistence(&directory, source))?;
		}
		fs::create_dir_all(&directory)
			.map_err(|source| ContainerError::persistence(&directory, source))?;

		for (name, content) in &compiled.definitions {
			let path = directory.join(name);
			atomic_write(&path, content).map_err(|source| ContainerError::persistence(&path, source))?;
		}
		tracing::debug!(
			directory = %directory.display(),
			fragments = compiled.definitions.len(),
			"Persisted file-based definitions"
		);
		Ok(())
	}
}

impl OutputSink for FileSystemSink {
	fn persist_container(&mut self, compiled: &CompiledContainer) -> ContainerResult<()> {
		ensure_parent(&self.container_path)?;
		if compiled.has_fragments() {
			self.persist_fragments(compiled)?;
		}
		atomic_write(&self.container_path, &compiled.container)
			.map_err(|source| ContainerError::persistence(&self.container_path, source))?;
		tracing::info!(path = %self.container_path.display(), "Persisted container");
		Ok(())
	}

	fn persist_preload(&mut self, manifest: &str) -> ContainerResult<()> {
		let path = self.preload_path.as_ref().ok_or_else(|| {
			ContainerError::InvalidConfiguration("Preload file path is not configured".to_string())
		})?;
		ensure_parent(path)?;
		atomic_write(path, manifest).map_err(|source| ContainerError::persistence(path, source))?;
		tracing::info!(path = %path.display(), "Persisted preload manifest");
		Ok(())
	}
}

/// Keeps compiled output in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
	/// Last persisted container.
	pub container: Option<CompiledContainer>,
	/// Last persisted preload manifest.
	pub preload: Option<String>,
}

impl MemorySink {
	/// Creates an empty sink.
	pub fn new() -> Self {
		Self::default()
	}
}

impl OutputSink for MemorySink {
	fn persist_container(&mut self, compiled: &CompiledContainer) -> ContainerResult<()> {
		self.container = Some(compiled.clone());
		Ok(())
	}

	fn persist_preload(&mut self, manifest: &str) -> ContainerResult<()> {
		self.preload = Some(manifest.to_string());
		Ok(())
	}
}

fn ensure_parent(path: &Path) -> ContainerResult<()> {
	match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
			.map_err(|source| ContainerError::persistence(parent, source)),
		_ => Ok(()),
	}
}

/// Writes `content` through a temporary file renamed over `path`.
fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
	// Regenerated files keep the mode of the file they replace.
	let original_perms = fs::metadata(path).ok().map(|m| m.permissions());

	let tmp_path = path.with_extension("tmp");
	fs::write(&tmp_path, content)?;

	if let Err(e) = fs::rename(&tmp_path, path) {
		let _ = fs::remove_file(&tmp_path);
		return Err(e);
	}

	if let Some(perms) = original_perms {
		fs::set_permissions(path, perms)?;
	}

	Ok(())
}
