//! Dependency discovery.
//!
//! [`DependencyResolver`] turns entry points and hints into a closed
//! [`Definitions`] map. Discovery is a worklist over identifiers: every
//! identifier gets exactly one definition, class definitions are expanded
//! through the [`TypeShapeProvider`] until none is left unresolved, and the
//! dependencies they reveal are queued in turn. Reference counts are tallied
//! once the graph is closed.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::config::{CompilerConfig, EntryPoint};
use crate::definition::{
	ClassDefinition, ContextDependentDefinition, Definition, Definitions, ReferenceDefinition,
	SelfDefinition,
};
use crate::error::{ContainerError, ContainerResult};
use crate::hint::{DefinitionHint, Hint};
use crate::scope::Scope;
use crate::shape::TypeShapeProvider;

#[derive(Debug, Clone, Copy, Default)]
struct EntryFlags {
	autoloaded: Option<bool>,
	file_based: Option<bool>,
}

/// Builds the definition map of one container.
pub struct DependencyResolver<'a> {
	config: &'a CompilerConfig,
	shapes: &'a dyn TypeShapeProvider,
	definitions: Definitions,
}

impl<'a> DependencyResolver<'a> {
	/// Creates a resolver with an empty map.
	pub fn new(config: &'a CompilerConfig, shapes: &'a dyn TypeShapeProvider) -> Self {
		Self {
			config,
			shapes,
			definitions: Definitions::new(),
		}
	}

	/// Resolved definitions.
	pub fn definitions(&self) -> &Definitions {
		&self.definitions
	}

	/// Consumes the resolver, returning the resolved definitions.
	pub fn into_definitions(self) -> Definitions {
		self.definitions
	}

	/// Discovers every definition reachable from the entry points.
	///
	/// Starts over from an empty map on every call.
	pub fn resolve_entry_points(&mut self) -> ContainerResult<()> {
		self.config.validate()?;
		self.definitions = Definitions::new();

		let entries = self.entry_points();
		let implied = self.implied_hints();

		let mut queue: VecDeque<String> = VecDeque::new();
		queue.push_back(self.config.container_id());
		queue.extend(entries.keys().cloned());
		let mut seen: HashSet<String> = HashSet::new();

		loop {
			while let Some(id) = queue.pop_front() {
				if !seen.insert(id.clone()) {
					continue;
				}
				let definition = self.create_definition(&id, &entries, &implied)?;
				tracing::debug!(id = %id, kind = kind_of(&definition), "Discovered definition");
				queue.extend(
					definition
						.class_dependencies()
						.into_iter()
						.filter(|dependency| !seen.contains(dependency)),
				);
				self.definitions.insert(definition);
			}

			let pending: Vec<String> = self
				.definitions
				.iter()
				.filter(|(_, definition)| definition.needs_dependency_resolution())
				.map(|(id, _)| id.to_string())
				.collect();
			if pending.is_empty() {
				break;
			}

			for id in pending {
				if let Some(definition) = self.definitions.get_mut(&id) {
					definition.resolve_dependencies(self.shapes, self.config)?;
					queue.extend(
						definition
							.class_dependencies()
							.into_iter()
							.filter(|dependency| !seen.contains(dependency)),
					);
				}
			}
		}

		self.count_references()?;
		tracing::info!(
			definitions = self.definitions.len(),
			entry_points = self
				.definitions
				.iter()
				.filter(|(_, definition)| definition.is_entry_point())
				.count(),
			"Resolved container definitions"
		);
		Ok(())
	}

	/// Returns the source files listed by the preload configuration.
	///
	/// Supertype sources come before the sources depending on them and each
	/// file appears once.
	pub fn resolve_preloads(&self) -> ContainerResult<Vec<String>> {
		let preload = &self.config.preload;
		let mut classes = preload.classes.clone();
		for namespace in &preload.namespaces {
			let ids = self
				.shapes
				.identifiers_in(&namespace.namespace, namespace.recursive);
			for id in ids {
				if namespace.only_instantiable && !self.is_instantiable(&id) {
					continue;
				}
				classes.push(id);
			}
		}

		let mut files = Vec::new();
		for id in &classes {
			if self.shapes.shape(id).is_none() {
				return Err(ContainerError::UnknownType(id.clone()));
			}
			self.collect_source_files(id, &mut files, &mut HashSet::new());
		}
		tracing::debug!(classes = classes.len(), files = files.len(), "Resolved preloads");
		Ok(files)
	}

	fn entry_points(&self) -> BTreeMap<String, EntryFlags> {
		let mut entries: BTreeMap<String, EntryFlags> = BTreeMap::new();
		for entry_point in &self.config.entry_points {
			let flags = EntryFlags {
				autoloaded: entry_point.autoload_override(),
				file_based: entry_point.file_based_override(),
			};
			match entry_point {
				EntryPoint::Class(entry) => {
					entries.entry(entry.class.clone()).or_insert(flags);
				}
				EntryPoint::Namespace(entry) => {
					let ids = self.shapes.identifiers_in(&entry.namespace, entry.recursive);
					if ids.is_empty() {
						tracing::warn!(namespace = %entry.namespace, "Entry point namespace is empty");
					}
					for id in ids {
						if entry.only_instantiable && !self.is_instantiable(&id) {
							continue;
						}
						entries.entry(id).or_insert(flags);
					}
				}
			}
		}

		// Branches of an externally reachable context-dependent identifier
		// are handed out through its accessor.
		let mut pending: Vec<(String, EntryFlags)> =
			entries.iter().map(|(id, flags)| (id.clone(), *flags)).collect();
		while let Some((id, flags)) = pending.pop() {
			if let Some(Hint::ContextDependent(hint)) = self.config.hints.get(&id) {
				for target in hint.targets() {
					if !entries.contains_key(&target.class) {
						entries.insert(target.class.clone(), flags);
						pending.push((target.class.clone(), flags));
					}
				}
			}
		}
		entries
	}

	/// Class hints carried over from aliases and context branches to
	/// identifiers without a hint of their own.
	fn implied_hints(&self) -> BTreeMap<String, DefinitionHint> {
		let mut implied = BTreeMap::new();
		for (id, hint) in &self.config.hints {
			for target in hint.targets() {
				if target.class != *id && !self.config.hints.contains_key(&target.class) {
					implied
						.entry(target.class.clone())
						.or_insert_with(|| target.clone());
				}
			}
		}
		implied
	}

	fn create_definition(
		&self,
		id: &str,
		entries: &BTreeMap<String, EntryFlags>,
		implied: &BTreeMap<String, DefinitionHint>,
	) -> ContainerResult<Definition> {
		if id == self.config.container_id() {
			return Ok(SelfDefinition::new(id).into());
		}

		let flags = entries.get(id).copied();
		let is_entry_point = flags.is_some();
		let flags = flags.unwrap_or_default();
		let is_autoloaded = flags
			.autoloaded
			.unwrap_or_else(|| self.config.autoload.is_autoloaded(id));
		let is_file_based = flags
			.file_based
			.unwrap_or_else(|| self.config.file_based_definitions.is_file_based(id));

		let definition = match self.config.hints.get(id) {
			Some(Hint::ContextDependent(hint)) => {
				if hint.targets().any(|target| target.class == id) {
					return Err(ContainerError::InvalidConfiguration(format!(
						"context-dependent hint of '{id}' can not select '{id}' itself"
					)));
				}
				ContextDependentDefinition::new(
					id,
					hint.default.as_ref().map(|default| default.class.clone()),
					hint.parent_map(),
				)
				.entry_point(is_entry_point)
				.into()
			}
			Some(Hint::Definition(hint)) if hint.class != id => {
				ReferenceDefinition::new(id, hint.class.clone(), hint.scope)
					.entry_point(is_entry_point)
					.autoloaded(is_autoloaded)
					.file_based(is_file_based)
					.source_files(self.source_files(id))
					.into()
			}
			Some(Hint::Definition(hint)) => self.class_definition(id, Some(hint)),
			None => self.class_definition(id, implied.get(id)),
		};

		let definition = match definition {
			Definition::Class(class) => class
				.entry_point(is_entry_point)
				.autoloaded(is_autoloaded)
				.file_based(is_file_based)
				.source_files(self.source_files(id))
				.into(),
			other => other,
		};
		Ok(definition)
	}

	fn class_definition(&self, id: &str, hint: Option<&DefinitionHint>) -> Definition {
		let scope = hint.map_or(Scope::Singleton, |hint| hint.scope);
		let mut definition = ClassDefinition::with_scope(id, scope);
		if let Some(hint) = hint {
			for (name, value) in &hint.parameters {
				definition = definition.override_parameter(name.clone(), value.clone());
			}
			for (name, value) in &hint.properties {
				definition = definition.override_property(name.clone(), value.clone());
			}
		}
		definition.into()
	}

	fn count_references(&mut self) -> ContainerResult<()> {
		for definition in self.definitions.values_mut() {
			if let Some(base) = definition.base_mut() {
				base.set_reference_counts(0, 0);
			}
		}

		let mut edges: Vec<(String, String, bool)> = Vec::new();
		for (id, definition) in self.definitions.iter() {
			match definition {
				Definition::Class(class) => {
					let is_singleton = class.base().is_singleton();
					edges.extend(
						class
							.argument_class_ids()
							.map(|dependency| (dependency.to_string(), id.to_string(), is_singleton)),
					);
				}
				Definition::Reference(reference) => edges.push((
					reference.referenced_id().to_string(),
					id.to_string(),
					reference.base().is_singleton(),
				)),
				Definition::ContextDependent(_) | Definition::Container(_) => {}
			}
		}

		for (dependency, parent, is_singleton) in edges {
			self.definitions
				.increase_reference_count(&dependency, &parent, is_singleton)?;
		}
		Ok(())
	}

	fn is_instantiable(&self, id: &str) -> bool {
		self.shapes.shape(id).is_some_and(|shape| shape.instantiable)
	}

	fn source_files(&self, id: &str) -> Vec<String> {
		let mut files = Vec::new();
		self.collect_source_files(id, &mut files, &mut HashSet::new());
		files
	}

	fn collect_source_files(&self, id: &str, files: &mut Vec<String>, visited: &mut HashSet<String>) {
		if !visited.insert(id.to_string()) {
			return;
		}
		let Some(shape) = self.shapes.shape(id) else {
			return;
		};
		for supertype in &shape.supertypes {
			self.collect_source_files(supertype, files, visited);
		}
		if let Some(file) = shape.source_file
			&& !files.contains(&file)
		{
			files.push(file);
		}
	}
}

fn kind_of(definition: &Definition) -> &'static str {
	match definition {
		Definition::Class(_) => "class",
		Definition::Reference(_) => "reference",
		Definition::ContextDependent(_) => "context_dependent",
		Definition::Container(_) => "container",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{AutoloadConfig, NamespacePreload, PreloadConfig};
	use crate::hint::ContextDependentDefinitionHint;
	use crate::shape::{StaticTypeRegistry, TypeShape};
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn registry() -> StaticTypeRegistry {
		StaticTypeRegistry::new()
			.register(
				"app::mail::Mailer",
				TypeShape::new()
					.class_parameter("transport", "app::mail::Transport")
					.value_parameter("sender", Some(json!("noreply@example.com")))
					.class_property("logger", "app::log::Logger")
					.source_file("src/mail/mailer.rs")
					.supertype("app::mail::Service"),
			)
			.register(
				"app::mail::Service",
				TypeShape::abstract_type().source_file("src/mail/service.rs"),
			)
			.register(
				"app::mail::Transport",
				TypeShape::abstract_type().source_file("src/mail/transport.rs"),
			)
			.register(
				"app::mail::SmtpTransport",
				TypeShape::new()
					.value_parameter("host", Some(json!("localhost")))
					.source_file("src/mail/smtp.rs"),
			)
			.register("app::log::Logger", TypeShape::abstract_type().source_file("src/log.rs"))
			.register(
				"app::log::FileLogger",
				TypeShape::new()
					.value_parameter("path", Some(json!("/var/log/app.log")))
					.source_file("src/log.rs"),
			)
			.register("app::log::NullLogger", TypeShape::new())
			.register(
				"app::jobs::Cleanup",
				TypeShape::new().class_parameter("logger", "app::log::Logger"),
			)
			.register(
				"app::jobs::Digest",
				TypeShape::new()
					.class_parameter("mailer", "app::mail::Mailer")
					.class_parameter("logger", "app::log::Logger"),
			)
			.register("app::jobs::Job", TypeShape::abstract_type())
	}

	#[fixture]
	fn config() -> CompilerConfig {
		CompilerConfig::new()
			.entry_point("app::mail::Mailer")
			.entry_point(EntryPoint::namespace("app::jobs"))
			.hint("app::mail::Transport", "app::mail::SmtpTransport")
			.hint(
				"app::log::Logger",
				ContextDependentDefinitionHint::new(None)
					.default_class("app::log::FileLogger")
					.class_context("app::log::NullLogger", ["app::jobs::Cleanup"]),
			)
	}

	fn resolve(config: &CompilerConfig, registry: &StaticTypeRegistry) -> Definitions {
		let mut resolver = DependencyResolver::new(config, registry);
		resolver.resolve_entry_points().unwrap();
		resolver.into_definitions()
	}

	#[rstest]
	fn test_resolve_discovers_reachable_graph(config: CompilerConfig, registry: StaticTypeRegistry) {
		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		let ids: Vec<&str> = definitions.iter().map(|(id, _)| id).collect();
		assert_eq!(
			ids,
			vec![
				"app::jobs::Cleanup",
				"app::jobs::Digest",
				"app::log::FileLogger",
				"app::log::Logger",
				"app::log::NullLogger",
				"app::mail::Mailer",
				"app::mail::SmtpTransport",
				"app::mail::Transport",
				"crate::Container",
			]
		);
		assert!(definitions.iter().all(|(_, d)| !d.needs_dependency_resolution()));
	}

	#[rstest]
	fn test_resolve_assigns_variants(config: CompilerConfig, registry: StaticTypeRegistry) {
		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		assert!(matches!(definitions.get("crate::Container").unwrap(), Definition::Container(_)));
		assert!(matches!(
			definitions.get("app::mail::Transport").unwrap(),
			Definition::Reference(r) if r.referenced_id() == "app::mail::SmtpTransport"
		));
		assert!(matches!(
			definitions.get("app::log::Logger").unwrap(),
			Definition::ContextDependent(c) if c.default() == Some("app::log::FileLogger")
		));
		assert!(matches!(definitions.get("app::mail::Mailer").unwrap(), Definition::Class(_)));
	}

	#[rstest]
	fn test_resolve_marks_entry_points(config: CompilerConfig, registry: StaticTypeRegistry) {
		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		let entry_points: Vec<&str> = definitions
			.iter()
			.filter(|(_, d)| d.is_entry_point())
			.map(|(id, _)| id)
			.collect();
		assert_eq!(
			entry_points,
			vec!["app::jobs::Cleanup", "app::jobs::Digest", "app::mail::Mailer"]
		);
	}

	#[rstest]
	fn test_resolve_tallies_references_per_consumer(
		config: CompilerConfig,
		registry: StaticTypeRegistry,
	) {
		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		let counts = |id: &str| {
			let base = definitions.get(id).unwrap().base().unwrap();
			(base.singleton_reference_count(), base.prototype_reference_count())
		};
		assert_eq!(counts("app::mail::Mailer"), (1, 0));
		assert_eq!(counts("app::mail::Transport"), (1, 0));
		assert_eq!(counts("app::mail::SmtpTransport"), (1, 0));
		assert_eq!(counts("app::log::FileLogger"), (2, 0));
		assert_eq!(counts("app::log::NullLogger"), (1, 0));
		assert_eq!(counts("crate::Container"), (0, 0));
	}

	#[rstest]
	fn test_resolve_partitions_counts_by_consumer_scope(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new()
			.entry_point("app::jobs::Cleanup")
			.hint("app::jobs::Cleanup", DefinitionHint::prototype("app::jobs::Cleanup"))
			.hint("app::log::Logger", "app::log::NullLogger");

		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		let logger = definitions.get("app::log::Logger").unwrap().base().unwrap();
		assert_eq!(logger.prototype_reference_count(), 1);
		assert_eq!(logger.singleton_reference_count(), 0);
	}

	#[rstest]
	fn test_resolve_reuses_definitions_reached_twice(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new()
			.entry_point("app::jobs::Cleanup")
			.entry_point("app::jobs::Digest")
			.hint("app::mail::Transport", "app::mail::SmtpTransport")
			.hint("app::log::Logger", "app::log::NullLogger");

		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		let logger = definitions.get("app::log::Logger").unwrap().base().unwrap();
		let target = definitions.get("app::log::NullLogger").unwrap().base().unwrap();
		assert_eq!(logger.singleton_reference_count(), 3);
		assert_eq!(target.singleton_reference_count(), 1);
	}

	#[rstest]
	fn test_hint_wins_over_discovery(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new().entry_point("app::log::FileLogger").hint(
			"app::log::FileLogger",
			DefinitionHint::prototype("app::log::FileLogger").parameter("path", "/tmp/app.log"),
		);

		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		let Definition::Class(logger) = definitions.get("app::log::FileLogger").unwrap() else {
			panic!("expected a class definition");
		};
		assert_eq!(logger.base().scope(), Scope::Prototype);
		assert!(logger.is_constructor_parameter_overridden("path"));
	}

	#[rstest]
	fn test_alias_hint_carries_scope_to_target(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new().entry_point("app::mail::Transport").hint(
			"app::mail::Transport",
			DefinitionHint::prototype("app::mail::SmtpTransport").parameter("host", "mail.local"),
		);

		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		let Definition::Class(smtp) = definitions.get("app::mail::SmtpTransport").unwrap() else {
			panic!("expected a class definition");
		};
		assert_eq!(smtp.base().scope(), Scope::Prototype);
		assert_eq!(smtp.overridden_constructor_parameters(), vec!["host"]);
		let transport = definitions.get("app::mail::Transport").unwrap();
		assert_eq!(transport.base().unwrap().scope(), Scope::Prototype);
		assert!(transport.is_entry_point());
	}

	#[rstest]
	fn test_context_dependent_entry_point_promotes_branches(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new().entry_point("app::log::Logger").hint(
			"app::log::Logger",
			ContextDependentDefinitionHint::new(None)
				.default_class("app::log::FileLogger")
				.class_context("app::log::NullLogger", ["app::jobs::Cleanup"]),
		);

		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		assert!(definitions.get("app::log::Logger").unwrap().is_entry_point());
		assert!(definitions.get("app::log::FileLogger").unwrap().is_entry_point());
		assert!(definitions.get("app::log::NullLogger").unwrap().is_entry_point());
	}

	#[rstest]
	fn test_namespace_entry_point_respects_filters(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new()
			.entry_point(EntryPoint::namespace("app::log").recursive(false))
			.hint("app::log::Logger", "app::log::NullLogger");

		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		assert!(definitions.get("app::log::FileLogger").unwrap().is_entry_point());
		assert!(definitions.get("app::log::NullLogger").unwrap().is_entry_point());
		assert!(!definitions.contains("app::log::Logger"));
	}

	#[rstest]
	fn test_entry_point_overrides_policies(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new()
			.autoload(AutoloadConfig::enabled_globally("/srv/app"))
			.entry_point(EntryPoint::class("app::log::NullLogger").autoloaded(false).file_based(true))
			.entry_point("app::log::FileLogger");

		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		let null = definitions.get("app::log::NullLogger").unwrap().base().unwrap();
		let file = definitions.get("app::log::FileLogger").unwrap().base().unwrap();
		assert!(!null.is_autoloaded());
		assert!(null.is_file_based());
		assert!(file.is_autoloaded());
		assert!(!file.is_file_based());
	}

	#[rstest]
	fn test_source_files_list_supertypes_first(config: CompilerConfig, registry: StaticTypeRegistry) {
		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		let mailer = definitions.get("app::mail::Mailer").unwrap().base().unwrap();
		assert_eq!(mailer.source_files(), ["src/mail/service.rs", "src/mail/mailer.rs"]);
	}

	#[rstest]
	fn test_resolve_unknown_type_fails(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new().entry_point("app::Missing");

		// Act
		let result = DependencyResolver::new(&config, &registry).resolve_entry_points();

		// Assert
		assert!(matches!(result, Err(ContainerError::UnknownType(ref id)) if id == "app::Missing"));
	}

	#[rstest]
	fn test_resolve_abstract_type_without_hint_fails(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new().entry_point("app::jobs::Cleanup");

		// Act
		let result = DependencyResolver::new(&config, &registry).resolve_entry_points();

		// Assert
		assert!(matches!(result, Err(ContainerError::NotInstantiable(ref id)) if id == "app::log::Logger"));
	}

	#[rstest]
	fn test_resolve_unmatched_context_without_default_fails(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new()
			.entry_point("app::jobs::Digest")
			.hint("app::mail::Transport", "app::mail::SmtpTransport")
			.hint(
				"app::log::Logger",
				ContextDependentDefinitionHint::new(None)
					.class_context("app::log::NullLogger", ["app::jobs::Cleanup"]),
			);

		// Act
		let result = DependencyResolver::new(&config, &registry).resolve_entry_points();

		// Assert
		assert!(matches!(
			result,
			Err(ContainerError::UnresolvedContext { ref id, .. }) if id == "app::log::Logger"
		));
	}

	#[rstest]
	fn test_self_selecting_context_hint_is_rejected(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new().entry_point("app::jobs::Cleanup").hint(
			"app::log::Logger",
			ContextDependentDefinitionHint::new(None).default_class("app::log::Logger"),
		);

		// Act
		let result = DependencyResolver::new(&config, &registry).resolve_entry_points();

		// Assert
		assert!(matches!(result, Err(ContainerError::InvalidConfiguration(_))));
	}

	#[rstest]
	fn test_container_is_always_defined(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new().container("app::di", "AppContainer");

		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		assert_eq!(definitions.len(), 1);
		assert!(matches!(
			definitions.get("app::di::AppContainer").unwrap(),
			Definition::Container(_)
		));
	}

	#[rstest]
	fn test_resolve_long_chain_reaches_fixpoint() {
		// Arrange
		let mut registry = StaticTypeRegistry::new();
		for index in 0..500 {
			registry.insert(
				format!("app::chain::Link{index}"),
				TypeShape::new().class_parameter("next", format!("app::chain::Link{}", index + 1)),
			);
		}
		registry.insert("app::chain::Link500", TypeShape::new());
		let config = CompilerConfig::new().entry_point("app::chain::Link0");

		// Act
		let definitions = resolve(&config, &registry);

		// Assert
		assert_eq!(definitions.len(), 502);
		let last = definitions.get("app::chain::Link500").unwrap().base().unwrap();
		assert_eq!(last.reference_count(), 1);
	}

	#[rstest]
	fn test_resolve_preloads(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new().preload(
			PreloadConfig::new("/srv/app")
				.class("app::mail::Mailer")
				.namespace(NamespacePreload::new("app::log").recursive(false)),
		);
		let resolver = DependencyResolver::new(&config, &registry);

		// Act
		let files = resolver.resolve_preloads().unwrap();

		// Assert
		assert_eq!(files, vec!["src/mail/service.rs", "src/mail/mailer.rs", "src/log.rs"]);
	}

	#[rstest]
	fn test_resolve_preloads_unknown_class_fails(registry: StaticTypeRegistry) {
		// Arrange
		let config = CompilerConfig::new().preload(PreloadConfig::new("").class("app::Missing"));
		let resolver = DependencyResolver::new(&config, &registry);

		// Act
		let result = resolver.resolve_preloads();

		// Assert
		assert!(matches!(result, Err(ContainerError::UnknownType(_))));
	}
}
