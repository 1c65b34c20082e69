//! # Reinhardt Forge
//!
//! Compile-time dependency injection container generator for Reinhardt.
//!
//! Given entry points and construction hints, Forge resolves the complete
//! object graph and either emits Rust source for a container that builds
//! each component on demand, or interprets the same graph directly.
//!
//! ## Features
//!
//! - **Scoped**: singleton and prototype components
//! - **Context-dependent injection**: the same identifier can construct
//!   differently depending on the consumer that asks
//! - **Optimized output**: single-use dependencies are inlined and provably
//!   unique singletons skip the registry
//! - **Deterministic**: identical inputs always produce identical sources
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_forge_core::prelude::*;
//!
//! let types = StaticTypeRegistry::new()
//!     .register(
//!         "app::Mailer",
//!         TypeShape::new().class_parameter("transport", "app::Transport"),
//!     )
//!     .register("app::Transport", TypeShape::abstract_type())
//!     .register("app::SmtpTransport", TypeShape::new());
//!
//! let config = CompilerConfig::new()
//!     .entry_point("app::Mailer")
//!     .hint("app::Transport", "app::SmtpTransport");
//!
//! let mut resolver = DependencyResolver::new(&config, &types);
//! resolver.resolve_entry_points()?;
//! let compiled = Compiler::compile(&config, resolver.definitions())?;
//! assert!(compiled.container.contains("pub fn app__Mailer(&self) -> Arc<app::Mailer>"));
//!
//! let container = RuntimeContainerBuilder::new(&config, &types).build()?;
//! let mailer = container.get("app::Mailer")?;
//! assert_eq!(mailer.class(), Some("app::Mailer"));
//! # Ok::<(), ContainerError>(())
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod compilation;
pub mod compiler;
pub mod config;
pub mod container;
pub mod definition;
pub mod error;
pub mod graph;
pub mod hint;
pub mod instantiation;
pub mod naming;
pub mod preload;
pub mod resolver;
pub mod runtime;
pub mod scope;
pub mod shape;
pub mod sink;

pub use error::{ContainerError, ContainerResult};

/// Commonly used types.
pub mod prelude {
	pub use crate::builder::{FileSystemContainerBuilder, RuntimeContainerBuilder};
	pub use crate::compiler::{CompiledContainer, Compiler};
	pub use crate::config::{
		AutoloadConfig, CompilerConfig, EntryPoint, FileBasedDefinitionConfig, NamespacePreload,
		PreloadConfig,
	};
	pub use crate::container::RuntimeContainer;
	pub use crate::definition::{
		ClassDefinition, ContextDependentDefinition, Definition, Definitions, ReferenceDefinition,
		SelfDefinition,
	};
	pub use crate::error::{ContainerError, ContainerResult};
	pub use crate::hint::{ContextDependentDefinitionHint, DefinitionHint, Hint};
	pub use crate::instantiation::{Instance, Object};
	pub use crate::preload::PreloadCompiler;
	pub use crate::resolver::DependencyResolver;
	pub use crate::runtime::ContainerRuntime;
	pub use crate::scope::Scope;
	pub use crate::shape::{StaticTypeRegistry, TypeShape, TypeShapeProvider};
	pub use crate::sink::{FileSystemSink, MemorySink, OutputSink};
}
