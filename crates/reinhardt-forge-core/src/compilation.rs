//! Read-only context shared by every definition emitted in one compile pass.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde_json::Value;

use crate::config::{AutoloadConfig, FileBasedDefinitionConfig};
use crate::definition::{Definitions, ResolvedDefinition};
use crate::error::ContainerResult;

/// Indentation unit of generated code.
pub const INDENT: &str = "\t";

/// Identifiers whose load statements were already emitted in the current body.
#[derive(Debug, Clone, Default)]
pub struct PreloadedIds {
	ids: HashSet<String>,
}

impl PreloadedIds {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `id`; returns `false` if it was already recorded.
	pub fn insert(&mut self, id: &str) -> bool {
		self.ids.insert(id.to_string())
	}

	/// Returns `true` if `id` was recorded.
	pub fn contains(&self, id: &str) -> bool {
		self.ids.contains(id)
	}
}

/// Lookup view used while emitting construction code.
#[derive(Debug, Clone, Copy)]
pub struct DefinitionCompilation<'a> {
	autoload: &'a AutoloadConfig,
	file_based: &'a FileBasedDefinitionConfig,
	definitions: &'a Definitions,
}

impl<'a> DefinitionCompilation<'a> {
	/// Creates the view.
	pub fn new(
		autoload: &'a AutoloadConfig,
		file_based: &'a FileBasedDefinitionConfig,
		definitions: &'a Definitions,
	) -> Self {
		Self {
			autoload,
			file_based,
			definitions,
		}
	}

	/// Autoloading policy.
	pub fn autoload(&self) -> &'a AutoloadConfig {
		self.autoload
	}

	/// File-based definition policy.
	pub fn file_based(&self) -> &'a FileBasedDefinitionConfig {
		self.file_based
	}

	/// Every resolved definition.
	pub fn definitions(&self) -> &'a Definitions {
		self.definitions
	}

	/// Returns the definition that constructs `id` for `parent`.
	pub fn resolve(&self, id: &str, parent: &str) -> ContainerResult<ResolvedDefinition<'a>> {
		self.definitions.resolve(id, parent)
	}

	/// Returns `level` indentation units.
	pub fn indent(&self, level: usize) -> String {
		INDENT.repeat(level)
	}

	/// Emits the expression that supplies `id` to `parent`.
	///
	/// Inlinable definitions are embedded, everything else goes through
	/// its accessor.
	pub fn compile_reference(
		&self,
		id: &str,
		parent: &str,
		indent: usize,
		preloaded: &mut PreloadedIds,
	) -> ContainerResult<String> {
		let resolved = self.resolve(id, parent)?;
		if resolved.is_inlinable() {
			resolved.compile(self, indent, true, preloaded)
		} else {
			Ok(format!("self.{}()", resolved.hash()))
		}
	}

	pub(crate) fn singleton_check(&self, indent: usize, return_type: &str, id: &str) -> String {
		let pad = self.indent(indent);
		format!(
			"{pad}if let Some(entry) = self.runtime.singleton::<{return_type}>({id:?}) {{\n\
			 {pad}{INDENT}return entry;\n\
			 {pad}}}\n\n"
		)
	}

	pub(crate) fn load_statements(&self, indent: usize, files: &[String]) -> String {
		if files.is_empty() {
			return String::new();
		}
		let pad = self.indent(indent);
		let mut code = String::new();
		for file in files {
			let _ = writeln!(code, "{pad}self.runtime.load({file:?});");
		}
		code.push('\n');
		code
	}

	pub(crate) fn return_value(
		&self,
		indent: usize,
		memoized: bool,
		return_type: &str,
		id: &str,
		value: &str,
	) -> String {
		let pad = self.indent(indent);
		if memoized {
			format!("{pad}self.runtime.store_singleton::<{return_type}>({id:?}, {value})\n")
		} else {
			format!("{pad}{value}\n")
		}
	}
}

/// Renders `value` as a Rust expression.
///
/// Scalars become plain literals and `null` becomes `None`. Arrays and
/// objects are rebuilt with `serde_json::json!`.
pub fn literal(value: &Value) -> String {
	match value {
		Value::Null => "None".to_string(),
		Value::Bool(flag) => flag.to_string(),
		Value::Number(number) => number.to_string(),
		Value::String(text) => format!("{text:?}"),
		Value::Array(_) | Value::Object(_) => format!("serde_json::json!({value})"),
	}
}
