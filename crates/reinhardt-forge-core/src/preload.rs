//! Preload manifest generation.

use std::fmt::Write as _;

use crate::compiler::GENERATED_HEADER;
use crate::config::{CompilerConfig, relative_to};

/// Renders the list of files to load eagerly at startup.
pub struct PreloadCompiler;

impl PreloadCompiler {
	/// Compiles the configured files followed by `class_files`.
	///
	/// Every file appears once, in first-seen order, relative to
	/// `preload.relative_base_path`.
	pub fn compile(config: &CompilerConfig, class_files: &[String]) -> String {
		let base = &config.preload.relative_base_path;
		let mut files: Vec<String> = Vec::new();
		for file in config.preload.files.iter().chain(class_files) {
			let file = relative_to(base, file);
			if !files.contains(&file) {
				files.push(file);
			}
		}

		let mut code = String::new();
		let _ = writeln!(code, "{GENERATED_HEADER}");
		code.push('\n');
		if files.is_empty() {
			code.push_str("pub const PRELOADED_FILES: &[&str] = &[];\n");
		} else {
			code.push_str("pub const PRELOADED_FILES: &[&str] = &[\n");
			for file in &files {
				let _ = writeln!(code, "\t{file:?},");
			}
			code.push_str("];\n");
		}
		tracing::debug!(files = files.len(), "Compiled preload manifest");
		code
	}
}
