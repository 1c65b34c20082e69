//! End-to-end tests for container generation
//!
//! Loads a configuration and a type registry from TOML, then checks the
//! resolved graph, the generated sources and the interpreted container.

use reinhardt_forge_core::compiler::GENERATED_HEADER;
use reinhardt_forge_core::prelude::*;
use rstest::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
container_namespace = "app::di"

[[entry_points]]
class = "app::mail::Mailer"

[[entry_points]]
class = "app::jobs::Cleanup"

[hints]
"app::mail::Transport" = "app::mail::SmtpTransport"

[hints."app::mail::Mailer"]
class = "app::mail::Mailer"
parameters = { sender = "ops@example.com" }

[hints."app::log::Logger"]
default = "app::log::FileLogger"
contexts = [
	{ target = { class = "app::log::NullLogger", scope = "prototype" }, parents = ["app::jobs::Cleanup"] },
]
"#;

const TYPES: &str = r#"
[types."app::mail::Mailer"]
source_file = "/srv/app/src/mail/mailer.rs"
parameters = [
	{ name = "transport", class = "app::mail::Transport" },
	{ name = "logger", class = "app::log::Logger" },
	{ name = "sender" },
]

[types."app::mail::Transport"]
instantiable = false

[types."app::mail::SmtpTransport"]
parameters = [{ name = "port", default = 25 }]

[types."app::log::Logger"]
instantiable = false

[types."app::log::FileLogger"]

[types."app::log::NullLogger"]

[types."app::jobs::Cleanup"]
parameters = [
	{ name = "logger", class = "app::log::Logger" },
	{ name = "mailer", class = "app::mail::Mailer" },
]
"#;

#[fixture]
fn config() -> CompilerConfig {
	CompilerConfig::from_toml_str(CONFIG).unwrap()
}

#[fixture]
fn types() -> StaticTypeRegistry {
	StaticTypeRegistry::from_toml_str(TYPES).unwrap()
}

// ============================================================================
// Resolution
// ============================================================================

#[rstest]
fn test_resolution_discovers_the_whole_graph(config: CompilerConfig, types: StaticTypeRegistry) {
	// Arrange
	let mut resolver = DependencyResolver::new(&config, &types);

	// Act
	resolver.resolve_entry_points().unwrap();

	// Assert
	let ids: Vec<&str> = resolver.definitions().iter().map(|(id, _)| id).collect();
	assert_eq!(
		ids,
		vec![
			"app::di::Container",
			"app::jobs::Cleanup",
			"app::log::FileLogger",
			"app::log::Logger",
			"app::log::NullLogger",
			"app::mail::Mailer",
			"app::mail::SmtpTransport",
			"app::mail::Transport",
		]
	);
	assert!(matches!(
		resolver.definitions().get("app::log::Logger").unwrap(),
		Definition::ContextDependent(_)
	));
	assert!(matches!(
		resolver.definitions().get("app::mail::Transport").unwrap(),
		Definition::Reference(_)
	));
}

#[rstest]
fn test_context_without_default_fails_for_other_consumers(types: StaticTypeRegistry) {
	// Arrange
	let config = CompilerConfig::new()
		.entry_point("app::mail::Mailer")
		.hint("app::mail::Transport", Hint::alias("app::mail::SmtpTransport"))
		.hint(
			"app::log::Logger",
			ContextDependentDefinitionHint::new(None)
				.class_context("app::log::NullLogger", ["app::jobs::Cleanup"]),
		)
		.hint(
			"app::mail::Mailer",
			DefinitionHint::singleton("app::mail::Mailer").parameter("sender", "ops@example.com"),
		);
	let mut resolver = DependencyResolver::new(&config, &types);

	// Act
	let result = resolver.resolve_entry_points();

	// Assert
	match result {
		Err(ContainerError::UnresolvedContext { id, parent }) => {
			assert_eq!(id, "app::log::Logger");
			assert_eq!(parent, "app::mail::Mailer");
		}
		other => panic!("expected an unresolved context, got {other:?}"),
	}
}

#[rstest]
fn test_missing_parameter_value_is_reported(types: StaticTypeRegistry) {
	// Arrange
	let config = CompilerConfig::new()
		.entry_point("app::mail::Mailer")
		.hint("app::mail::Transport", Hint::alias("app::mail::SmtpTransport"))
		.hint(
			"app::log::Logger",
			ContextDependentDefinitionHint::new(Some(DefinitionHint::singleton("app::log::FileLogger"))),
		);
	let mut resolver = DependencyResolver::new(&config, &types);

	// Act
	let result = resolver.resolve_entry_points();

	// Assert
	assert!(matches!(
		result,
		Err(ContainerError::UnresolvableParameter { ref id, ref parameter })
			if id == "app::mail::Mailer" && parameter == "sender"
	));
}

// ============================================================================
// Compilation
// ============================================================================

#[rstest]
fn test_compiled_container_exposes_entry_points(config: CompilerConfig, types: StaticTypeRegistry) {
	// Arrange
	let mut resolver = DependencyResolver::new(&config, &types);
	resolver.resolve_entry_points().unwrap();

	// Act
	let compiled = Compiler::compile(&config, resolver.definitions()).unwrap();

	// Assert
	let code = &compiled.container;
	assert!(code.starts_with(GENERATED_HEADER));
	assert!(code.contains("\t\t(\"app::mail::Mailer\", \"app__mail__Mailer\"),\n"));
	assert!(code.contains("\t\t(\"app::jobs::Cleanup\", \"app__jobs__Cleanup\"),\n"));
	assert!(code.contains("\tpub fn app__mail__Mailer(&self) -> Arc<app::mail::Mailer> {\n"));
	assert!(code.contains("\tpub fn app__jobs__Cleanup(&self) -> Arc<app::jobs::Cleanup> {\n"));
	assert!(!code.contains("fn app__log__Logger("));
	assert!(!compiled.has_fragments());
}

#[rstest]
fn test_compilation_is_deterministic(config: CompilerConfig, types: StaticTypeRegistry) {
	// Arrange
	let compile = || {
		let mut resolver = DependencyResolver::new(&config, &types);
		resolver.resolve_entry_points().unwrap();
		Compiler::compile(&config, resolver.definitions()).unwrap()
	};

	// Act
	let first = compile();
	let second = compile();

	// Assert
	assert_eq!(first, second);
}

#[rstest]
fn test_builder_writes_file_based_fragments(config: CompilerConfig, types: StaticTypeRegistry) {
	// Arrange
	let temp = TempDir::new().unwrap();
	let config = config
		.file_based_definitions(FileBasedDefinitionConfig::enabled_globally("definitions"))
		.preload(PreloadConfig::new("/srv/app").class("app::mail::Mailer"));
	let output = temp.path().join("src/container.rs");
	let preload = temp.path().join("src/preload.rs");

	// Act
	let compiled = FileSystemContainerBuilder::new(&config, &types, &output)
		.with_preload_path(&preload)
		.build()
		.unwrap();

	// Assert
	assert_eq!(fs::read_to_string(&output).unwrap(), compiled.container);
	assert!(compiled.definitions.contains_key("app__mail__Mailer.rs"));
	for (name, content) in &compiled.definitions {
		let fragment = temp.path().join("src/definitions").join(name);
		assert_eq!(&fs::read_to_string(fragment).unwrap(), content);
	}
	assert!(
		compiled
			.container
			.contains("\t\tinclude!(\"definitions/app__mail__Mailer.rs\")\n")
	);
	let manifest = fs::read_to_string(&preload).unwrap();
	assert!(manifest.contains("\t\"src/mail/mailer.rs\",\n"));
}

// ============================================================================
// Interpretation
// ============================================================================

#[rstest]
fn test_runtime_container_applies_hints(config: CompilerConfig, types: StaticTypeRegistry) {
	// Arrange
	let container = RuntimeContainerBuilder::new(&config, &types).build().unwrap();

	// Act
	let mailer = container.get("app::mail::Mailer").unwrap();

	// Assert
	let mailer = mailer.as_object().unwrap();
	let transport = mailer.argument(0).unwrap();
	assert_eq!(transport.class(), Some("app::mail::SmtpTransport"));
	assert_eq!(
		transport.as_object().unwrap().argument(0).unwrap().as_value(),
		Some(&json!(25))
	);
	assert_eq!(mailer.argument(1).unwrap().class(), Some("app::log::FileLogger"));
	assert_eq!(
		mailer.argument(2).unwrap().as_value(),
		Some(&json!("ops@example.com"))
	);
}

#[rstest]
fn test_runtime_container_selects_context_branch(config: CompilerConfig, types: StaticTypeRegistry) {
	// Arrange
	let container = RuntimeContainerBuilder::new(&config, &types).build().unwrap();

	// Act
	let cleanup = container.get("app::jobs::Cleanup").unwrap();
	let root_logger = container.get("app::log::Logger").unwrap();

	// Assert
	let cleanup = cleanup.as_object().unwrap();
	assert_eq!(cleanup.argument(0).unwrap().class(), Some("app::log::NullLogger"));
	assert_eq!(root_logger.class(), Some("app::log::FileLogger"));
}

#[rstest]
fn test_runtime_container_scopes(config: CompilerConfig, types: StaticTypeRegistry) {
	// Arrange
	let container = RuntimeContainerBuilder::new(&config, &types).build().unwrap();

	// Act
	let mailer = container.get("app::mail::Mailer").unwrap();
	let cleanup = container.get("app::jobs::Cleanup").unwrap();
	let first_null = container.get("app::log::NullLogger").unwrap();
	let second_null = container.get("app::log::NullLogger").unwrap();

	// Assert
	let shared_mailer = cleanup.as_object().unwrap().argument(1).unwrap();
	assert!(shared_mailer.same_instance(&mailer));
	assert!(container.get("app::jobs::Cleanup").unwrap().same_instance(&cleanup));
	assert!(!first_null.same_instance(&second_null));
	assert_eq!(first_null, second_null);
}

#[rstest]
fn test_runtime_container_unknown_identifier(config: CompilerConfig, types: StaticTypeRegistry) {
	// Arrange
	let container = RuntimeContainerBuilder::new(&config, &types).build().unwrap();

	// Act
	let result = container.get("app::Missing");

	// Assert
	assert!(!container.has("app::Missing"));
	assert!(matches!(result, Err(ContainerError::DefinitionNotFound(ref id)) if id == "app::Missing"));
}
