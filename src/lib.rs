//! # Reinhardt Forge
//!
//! Compile-time dependency injection container generator for Reinhardt.
//!
//! This is the facade crate. Generated containers depend on it for
//! [`runtime::ContainerRuntime`], and build scripts use it to resolve and
//! compile containers.
//!
//! ## Generating a container from a build script
//!
//! ```rust,no_run
//! use reinhardt_forge::prelude::*;
//!
//! let config = CompilerConfig::from_file("forge.toml")?;
//! let types = StaticTypeRegistry::from_file("types.toml")?;
//! FileSystemContainerBuilder::new(&config, &types, "src/container.rs").build()?;
//! # Ok::<(), ContainerError>(())
//! ```
//!
//! ## Using the generated container
//!
//! ```rust,ignore
//! mod container {
//!     include!("container.rs");
//! }
//!
//! let container = container::Container::new(ContainerRuntime::new(env!("CARGO_MANIFEST_DIR")));
//! let mailer = container.app__mail__Mailer();
//! ```
//!
//! See the `reinhardt-forge` command-line tool for generating containers
//! outside of build scripts.

pub use reinhardt_forge_core::*;
