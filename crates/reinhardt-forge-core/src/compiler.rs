//! Container source generation.
//!
//! [`Compiler::compile`] renders resolved definitions as a Rust module:
//!
//! ```text
//! // @generated by reinhardt-forge. Do not edit.
//!
//! use std::any::Any;
//! use std::sync::Arc;
//!
//! use reinhardt_forge::runtime::ContainerRuntime;
//!
//! #[derive(Clone)]
//! pub struct Container {
//!     runtime: Arc<ContainerRuntime>,
//! }
//!
//! impl Container {
//!     pub const ENTRY_POINTS: &'static [(&'static str, &'static str)] = &[...];
//!     pub const HASH_MAP: &'static [(&'static str, &'static str)] = &[...];
//!
//!     pub fn new(runtime: ContainerRuntime) -> Self { ... }
//!     pub fn has(&self, id: &str) -> bool { ... }
//!     pub fn get(&self, id: &str) -> Option<Box<dyn Any + Send + Sync>> { ... }
//!
//!     pub fn app__mail__Mailer(&self) -> Arc<app::mail::Mailer> { ... }
//!     fn app__mail__SmtpTransport(&self) -> Arc<app::mail::SmtpTransport> { ... }
//! }
//! ```
//!
//! Entry points get public accessors, everything else stays private.
//! File-based definitions keep their accessor in the container but the body
//! is an `include!` of a separate fragment.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::compilation::{DefinitionCompilation, INDENT, PreloadedIds};
use crate::config::CompilerConfig;
use crate::definition::{Definition, Definitions};
use crate::error::ContainerResult;
use crate::graph::DependencyGraph;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// @generated by reinhardt-forge. Do not edit.";

/// Output of one compile pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledContainer {
	/// Source of the container module.
	pub container: String,
	/// File-based fragments keyed by file name.
	pub definitions: BTreeMap<String, String>,
}

impl CompiledContainer {
	/// Returns `true` if some definitions were emitted as fragments.
	pub fn has_fragments(&self) -> bool {
		!self.definitions.is_empty()
	}
}

/// Turns resolved definitions into container source.
pub struct Compiler;

struct Accessor {
	hash: String,
	is_public: bool,
	return_type: String,
	body: String,
}

impl Compiler {
	/// Compiles `definitions` into a container named after `config`.
	pub fn compile(
		config: &CompilerConfig,
		definitions: &Definitions,
	) -> ContainerResult<CompiledContainer> {
		config.validate()?;

		for cycle in DependencyGraph::from_definitions(definitions).detect_cycles() {
			let mut path = cycle.clone();
			if let Some(first) = cycle.first() {
				path.push(first.clone());
			}
			tracing::warn!(cycle = %path.join(" -> "), "Dependency cycle in container definitions");
		}

		let compilation = DefinitionCompilation::new(
			&config.autoload,
			&config.file_based_definitions,
			definitions,
		);

		let mut accessors = Vec::new();
		let mut fragments = BTreeMap::new();
		let mut entry_points = Vec::new();
		let mut hash_map = Vec::new();

		for (id, definition) in definitions.iter() {
			let hash = definition.hash();
			hash_map.push((id, hash.clone()));
			if definition.is_entry_point() {
				entry_points.push((id, hash.clone()));
			}

			let accessor = match definition {
				Definition::ContextDependent(context) => {
					if !context.is_entry_point() {
						continue;
					}
					let mut preloaded = PreloadedIds::new();
					let value = compilation.compile_reference(id, "", 2, &mut preloaded)?;
					Accessor {
						hash,
						is_public: true,
						return_type: format!("Arc<dyn {id} + Send + Sync>"),
						body: format!("{}{value}\n", compilation.indent(2)),
					}
				}
				_ => {
					let resolved = definitions.resolve(id, "")?;
					let return_type = resolved.return_type();
					let is_public = resolved.is_entry_point();
					if resolved.is_file_based() {
						let mut preloaded = PreloadedIds::new();
						let body = resolved.compile(&compilation, 1, false, &mut preloaded)?;
						fragments.insert(format!("{hash}.rs"), format!("{{\n{body}}}\n"));
						let path = config.file_based_definitions.fragment_path(&hash);
						Accessor {
							hash,
							is_public,
							return_type,
							body: format!("{}include!({path:?})\n", compilation.indent(2)),
						}
					} else {
						let mut preloaded = PreloadedIds::new();
						let body = resolved.compile(&compilation, 2, false, &mut preloaded)?;
						Accessor {
							hash,
							is_public,
							return_type,
							body,
						}
					}
				}
			};
			tracing::debug!(id = %id, accessor = %accessor.hash, public = accessor.is_public, "Compiled accessor");
			accessors.push(accessor);
		}

		let container = render_container(config, &entry_points, &hash_map, &accessors);
		tracing::info!(
			accessors = accessors.len(),
			entry_points = entry_points.len(),
			fragments = fragments.len(),
			"Compiled container"
		);
		Ok(CompiledContainer {
			container,
			definitions: fragments,
		})
	}
}

fn render_container(
	config: &CompilerConfig,
	entry_points: &[(&str, String)],
	hash_map: &[(&str, String)],
	accessors: &[Accessor],
) -> String {
	let name = &config.container_name;
	let mut code = String::new();
	let _ = writeln!(code, "{GENERATED_HEADER}");
	code.push('\n');
	code.push_str("use std::any::Any;\n");
	code.push_str("use std::sync::Arc;\n\n");
	code.push_str("use reinhardt_forge::runtime::ContainerRuntime;\n\n");

	code.push_str("#[derive(Clone)]\n");
	let _ = writeln!(code, "pub struct {name} {{");
	let _ = writeln!(code, "{INDENT}runtime: Arc<ContainerRuntime>,");
	code.push_str("}\n\n");

	code.push_str("#[allow(dead_code, non_snake_case, unused_mut, clippy::all)]\n");
	let _ = writeln!(code, "impl {name} {{");
	render_table(&mut code, "pub const ENTRY_POINTS", entry_points);
	code.push('\n');
	render_table(&mut code, "pub const HASH_MAP", hash_map);
	code.push('\n');

	let _ = writeln!(code, "{INDENT}pub fn new(runtime: ContainerRuntime) -> Self {{");
	let _ = writeln!(code, "{INDENT}{INDENT}Self {{");
	let _ = writeln!(code, "{INDENT}{INDENT}{INDENT}runtime: Arc::new(runtime),");
	let _ = writeln!(code, "{INDENT}{INDENT}}}");
	let _ = writeln!(code, "{INDENT}}}");
	code.push('\n');

	let _ = writeln!(code, "{INDENT}pub fn has(&self, id: &str) -> bool {{");
	let _ = writeln!(
		code,
		"{INDENT}{INDENT}Self::ENTRY_POINTS.iter().any(|(entry, _)| *entry == id)"
	);
	let _ = writeln!(code, "{INDENT}}}");
	code.push('\n');

	let _ = writeln!(
		code,
		"{INDENT}pub fn get(&self, id: &str) -> Option<Box<dyn Any + Send + Sync>> {{"
	);
	let _ = writeln!(code, "{INDENT}{INDENT}match id {{");
	for (id, hash) in entry_points {
		let _ = writeln!(
			code,
			"{INDENT}{INDENT}{INDENT}{id:?} => Some(Box::new(self.{hash}())),"
		);
	}
	let _ = writeln!(code, "{INDENT}{INDENT}{INDENT}_ => None,");
	let _ = writeln!(code, "{INDENT}{INDENT}}}");
	let _ = writeln!(code, "{INDENT}}}");

	for accessor in accessors {
		code.push('\n');
		let visibility = if accessor.is_public { "pub " } else { "" };
		let _ = writeln!(
			code,
			"{INDENT}{visibility}fn {}(&self) -> {} {{",
			accessor.hash, accessor.return_type
		);
		code.push_str(&accessor.body);
		let _ = writeln!(code, "{INDENT}}}");
	}
	code.push_str("}\n");
	code
}

fn render_table(code: &mut String, declaration: &str, rows: &[(&str, String)]) {
	if rows.is_empty() {
		let _ = writeln!(
			code,
			"{INDENT}{declaration}: &'static [(&'static str, &'static str)] = &[];"
		);
		return;
	}
	let _ = writeln!(
		code,
		"{INDENT}{declaration}: &'static [(&'static str, &'static str)] = &["
	);
	for (id, hash) in rows {
		let _ = writeln!(code, "{INDENT}{INDENT}({id:?}, {hash:?}),");
	}
	let _ = writeln!(code, "{INDENT}];");
}
