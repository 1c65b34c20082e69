//! End-to-end builds wiring configuration, resolution and output together.

use std::path::{Path, PathBuf};

use crate::compiler::{CompiledContainer, Compiler};
use crate::config::CompilerConfig;
use crate::container::RuntimeContainer;
use crate::error::ContainerResult;
use crate::preload::PreloadCompiler;
use crate::resolver::DependencyResolver;
use crate::shape::TypeShapeProvider;
use crate::sink::{FileSystemSink, OutputSink};

/// Generates a container source file.
///
/// # Examples
///
/// ```no_run
/// use reinhardt_forge_core::builder::FileSystemContainerBuilder;
/// use reinhardt_forge_core::config::CompilerConfig;
/// use reinhardt_forge_core::shape::StaticTypeRegistry;
///
/// let config = CompilerConfig::from_file("forge.toml")?;
/// let types = StaticTypeRegistry::from_file("types.toml")?;
/// FileSystemContainerBuilder::new(&config, &types, "src/container.rs")
///     .with_preload_path("src/preload.rs")
///     .build()?;
/// # Ok::<(), reinhardt_forge_core::error::ContainerError>(())
/// ```
pub struct FileSystemContainerBuilder<'a> {
	config: &'a CompilerConfig,
	shapes: &'a dyn TypeShapeProvider,
	container_path: PathBuf,
	preload_path: Option<PathBuf>,
}

impl<'a> FileSystemContainerBuilder<'a> {
	/// Creates a builder writing the container to `container_path`.
	pub fn new(
		config: &'a CompilerConfig,
		shapes: &'a dyn TypeShapeProvider,
		container_path: impl Into<PathBuf>,
	) -> Self {
		Self {
			config,
			shapes,
			container_path: container_path.into(),
			preload_path: None,
		}
	}

	/// Also writes the preload manifest to `path`.
	pub fn with_preload_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.preload_path = Some(path.into());
		self
	}

	/// Path of the generated container.
	pub fn container_path(&self) -> &Path {
		&self.container_path
	}

	/// Resolves, compiles and writes the container.
	pub fn build(&self) -> ContainerResult<CompiledContainer> {
		let mut sink = FileSystemSink::new(
			&self.container_path,
			self.config.file_based_definitions.relative_directory.clone(),
		);
		if let Some(path) = &self.preload_path {
			sink = sink.with_preload_path(path);
		}
		self.build_into(&mut sink)
	}

	/// Resolves and compiles the container, handing the output to `sink`.
	///
	/// The preload manifest is only produced when a preload path is set.
	/// A failure in either output leaves the sink untouched.
	pub fn build_into(&self, sink: &mut dyn OutputSink) -> ContainerResult<CompiledContainer> {
		let mut resolver = DependencyResolver::new(self.config, self.shapes);
		resolver.resolve_entry_points()?;
		let compiled = Compiler::compile(self.config, resolver.definitions())?;
		let manifest = match &self.preload_path {
			Some(_) => {
				let class_files = resolver.resolve_preloads()?;
				Some(PreloadCompiler::compile(self.config, &class_files))
			}
			None => None,
		};

		// Nothing is written until every output compiled.
		sink.persist_container(&compiled)?;
		if let Some(manifest) = &manifest {
			sink.persist_preload(manifest)?;
		}

		tracing::info!(
			container = %self.config.container_id(),
			definitions = resolver.definitions().len(),
			fragments = compiled.definitions.len(),
			"Built container"
		);
		Ok(compiled)
	}
}

/// Builds an interpreted container.
pub struct RuntimeContainerBuilder<'a> {
	config: &'a CompilerConfig,
	shapes: &'a dyn TypeShapeProvider,
}

impl<'a> RuntimeContainerBuilder<'a> {
	/// Creates a builder.
	pub fn new(config: &'a CompilerConfig, shapes: &'a dyn TypeShapeProvider) -> Self {
		Self { config, shapes }
	}

	/// Resolves the definitions and wraps them in a [`RuntimeContainer`].
	pub fn build(&self) -> ContainerResult<RuntimeContainer> {
		let mut resolver = DependencyResolver::new(self.config, self.shapes);
		resolver.resolve_entry_points()?;
		let definitions = resolver.into_definitions();
		tracing::info!(
			container = %self.config.container_id(),
			definitions = definitions.len(),
			"Built runtime container"
		);
		Ok(RuntimeContainer::new(definitions))
	}
}
