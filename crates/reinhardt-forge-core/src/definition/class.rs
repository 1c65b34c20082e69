use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::Value;

use super::{Argument, DefinitionBase, ResolvedDefinition};
use crate::compilation::{DefinitionCompilation, PreloadedIds, literal};
use crate::config::CompilerConfig;
use crate::error::{ContainerError, ContainerResult};
use crate::instantiation::{DefinitionInstantiation, Instance, Object};
use crate::scope::Scope;
use crate::shape::TypeShapeProvider;

/// Definition backed by a constructor call.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDefinition {
	base: DefinitionBase,
	constructor: String,
	constructor_arguments: Vec<Argument>,
	properties: Vec<(String, Argument)>,
	overridden_parameters: BTreeMap<String, Value>,
	overridden_properties: BTreeMap<String, Value>,
	needs_dependency_resolution: bool,
}

impl ClassDefinition {
	/// Creates a singleton definition of `id` whose shape is not resolved yet.
	pub fn new(id: impl Into<String>) -> Self {
		Self::with_scope(id, Scope::Singleton)
	}

	/// Creates a singleton definition of `id`.
	pub fn singleton(id: impl Into<String>) -> Self {
		Self::with_scope(id, Scope::Singleton)
	}

	/// Creates a prototype definition of `id`.
	pub fn prototype(id: impl Into<String>) -> Self {
		Self::with_scope(id, Scope::Prototype)
	}

	/// Creates a definition of `id` with `scope`.
	pub fn with_scope(id: impl Into<String>, scope: Scope) -> Self {
		Self {
			base: DefinitionBase::new(id, scope),
			constructor: "new".to_string(),
			constructor_arguments: Vec::new(),
			properties: Vec::new(),
			overridden_parameters: BTreeMap::new(),
			overridden_properties: BTreeMap::new(),
			needs_dependency_resolution: true,
		}
	}

	/// Marks the definition as an entry point.
	pub fn entry_point(mut self, is_entry_point: bool) -> Self {
		self.base.set_entry_point(is_entry_point);
		self
	}

	/// Marks the definition as autoloaded.
	pub fn autoloaded(mut self, is_autoloaded: bool) -> Self {
		self.base.set_autoloaded(is_autoloaded);
		self
	}

	/// Marks the definition as file-based.
	pub fn file_based(mut self, is_file_based: bool) -> Self {
		self.base.set_file_based(is_file_based);
		self
	}

	/// Sets the reference counts directly.
	pub fn reference_counts(mut self, singleton: usize, prototype: usize) -> Self {
		self.base.set_reference_counts(singleton, prototype);
		self
	}

	/// Sets the files loaded before construction.
	pub fn source_files<I, S>(mut self, files: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.base.set_source_files(files.into_iter().map(Into::into).collect());
		self
	}

	/// Sets the constructor function name.
	pub fn constructor(mut self, name: impl Into<String>) -> Self {
		self.constructor = name.into();
		self
	}

	/// Provides the value of constructor parameter `name`.
	pub fn override_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.overridden_parameters.insert(name.into(), value.into());
		self
	}

	/// Provides the value of property `name`.
	pub fn override_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.overridden_properties.insert(name.into(), value.into());
		self
	}

	/// Appends a literal constructor argument.
	pub fn add_constructor_argument_from_value(mut self, value: impl Into<Value>) -> Self {
		self.constructor_arguments.push(Argument::Value(value.into()));
		self
	}

	/// Appends a constructor argument supplied by component `id`.
	pub fn add_constructor_argument_from_class(mut self, id: impl Into<String>) -> Self {
		self.constructor_arguments.push(Argument::Class(id.into()));
		self
	}

	/// Appends a constructor argument read from the parameter override `name`.
	pub fn add_constructor_argument_from_override(mut self, name: impl Into<String>) -> Self {
		self.constructor_arguments.push(Argument::Override(name.into()));
		self
	}

	/// Assigns property `name` from component `id`.
	pub fn add_property_from_class(self, name: impl Into<String>, id: impl Into<String>) -> Self {
		self.with_property(name.into(), Argument::Class(id.into()))
	}

	/// Assigns a literal to property `name`.
	pub fn add_property_from_value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.with_property(name.into(), Argument::Value(value.into()))
	}

	/// Assigns property `name` from its property override.
	pub fn add_property_from_override(self, name: impl Into<String>) -> Self {
		let name = name.into();
		self.with_property(name.clone(), Argument::Override(name))
	}

	fn with_property(mut self, name: String, argument: Argument) -> Self {
		match self.properties.iter_mut().find(|(existing, _)| *existing == name) {
			Some(slot) => slot.1 = argument,
			None => self.properties.push((name, argument)),
		}
		self
	}

	/// Component identifier.
	pub fn id(&self) -> &str {
		self.base.id()
	}

	/// Shared state.
	pub fn base(&self) -> &DefinitionBase {
		&self.base
	}

	pub(crate) fn base_mut(&mut self) -> &mut DefinitionBase {
		&mut self.base
	}

	/// Constructor arguments in call order.
	pub fn constructor_arguments(&self) -> &[Argument] {
		&self.constructor_arguments
	}

	/// Property assignments in emission order.
	pub fn properties(&self) -> &[(String, Argument)] {
		&self.properties
	}

	/// Returns `true` if constructor parameter `name` has an override.
	pub fn is_constructor_parameter_overridden(&self, name: &str) -> bool {
		self.overridden_parameters.contains_key(name)
	}

	/// Names of the overridden constructor parameters.
	pub fn overridden_constructor_parameters(&self) -> Vec<&str> {
		self.overridden_parameters.keys().map(String::as_str).collect()
	}

	/// Returns `true` if property `name` has an override.
	pub fn is_property_overridden(&self, name: &str) -> bool {
		self.overridden_properties.contains_key(name)
	}

	/// Names of the overridden properties.
	pub fn overridden_properties(&self) -> Vec<&str> {
		self.overridden_properties.keys().map(String::as_str).collect()
	}

	/// Returns `true` until [`ClassDefinition::resolve_dependencies`] succeeds.
	pub fn needs_dependency_resolution(&self) -> bool {
		self.needs_dependency_resolution
	}

	/// Builds the argument and property lists from the type shape.
	///
	/// Overrides win over injection, injection wins over parameter defaults.
	/// Properties without a class or an override are left untouched.
	pub fn resolve_dependencies(
		&mut self,
		shapes: &dyn TypeShapeProvider,
		config: &CompilerConfig,
	) -> ContainerResult<()> {
		let id = self.base.id().to_string();
		let shape = shapes
			.shape(&id)
			.ok_or_else(|| ContainerError::UnknownType(id.clone()))?;
		if !shape.instantiable {
			return Err(ContainerError::NotInstantiable(id));
		}

		let mut arguments = Vec::with_capacity(shape.parameters.len());
		for parameter in &shape.parameters {
			let argument = if self.overridden_parameters.contains_key(&parameter.name) {
				Argument::Override(parameter.name.clone())
			} else if let Some(class) = parameter
				.class
				.as_ref()
				.filter(|_| config.use_constructor_injection)
			{
				Argument::Class(class.clone())
			} else if let Some(default) = &parameter.default {
				Argument::Value(default.clone())
			} else {
				return Err(ContainerError::UnresolvableParameter {
					id,
					parameter: parameter.name.clone(),
				});
			};
			arguments.push(argument);
		}

		let mut properties = Vec::new();
		for property in &shape.properties {
			if self.overridden_properties.contains_key(&property.name) {
				properties.push((property.name.clone(), Argument::Override(property.name.clone())));
			} else if let Some(class) = property
				.class
				.as_ref()
				.filter(|_| config.use_property_injection)
			{
				properties.push((property.name.clone(), Argument::Class(class.clone())));
			}
		}

		for name in self.overridden_parameters.keys() {
			if !shape.parameters.iter().any(|parameter| &parameter.name == name) {
				tracing::warn!(id = %id, parameter = %name, "Override names no constructor parameter");
			}
		}
		for name in self.overridden_properties.keys() {
			if !shape.properties.iter().any(|property| &property.name == name) {
				tracing::warn!(id = %id, property = %name, "Override names no property");
			}
		}

		self.constructor = shape.constructor;
		self.constructor_arguments = arguments;
		self.properties = properties;
		self.needs_dependency_resolution = false;
		tracing::debug!(
			id = %id,
			arguments = self.constructor_arguments.len(),
			properties = self.properties.len(),
			"Resolved class definition"
		);
		Ok(())
	}

	/// Identifiers referenced by arguments and properties, in emission order.
	pub fn class_dependencies(&self) -> Vec<String> {
		let mut dependencies: Vec<String> = Vec::new();
		for id in self.argument_class_ids() {
			if !dependencies.iter().any(|existing| existing == id) {
				dependencies.push(id.to_string());
			}
		}
		dependencies
	}

	/// Every class-typed argument and property slot, duplicates included.
	pub(crate) fn argument_class_ids(&self) -> impl Iterator<Item = &str> {
		self.constructor_arguments
			.iter()
			.chain(self.properties.iter().map(|(_, argument)| argument))
			.filter_map(Argument::class_id)
	}

	pub(crate) fn instantiate(
		&self,
		instantiation: &mut DefinitionInstantiation,
	) -> ContainerResult<Instance> {
		let id = self.base.id();
		if self.base.is_singleton()
			&& let Some(instance) = instantiation.singleton(id)
		{
			return Ok(instance);
		}

		let (arguments, properties) = instantiation.within(id, |instantiation| {
			let mut arguments = Vec::with_capacity(self.constructor_arguments.len());
			for argument in &self.constructor_arguments {
				arguments.push(self.instantiate_argument(
					argument,
					&self.overridden_parameters,
					instantiation,
				)?);
			}
			let mut properties = BTreeMap::new();
			for (name, argument) in &self.properties {
				let value =
					self.instantiate_argument(argument, &self.overridden_properties, instantiation)?;
				properties.insert(name.clone(), value);
			}
			Ok((arguments, properties))
		})?;

		let instance = Instance::object(Object {
			class: id.to_string(),
			arguments,
			properties,
		});
		if self.base.is_singleton() {
			instantiation.store_singleton(id, instance.clone());
		}
		Ok(instance)
	}

	fn instantiate_argument(
		&self,
		argument: &Argument,
		overrides: &BTreeMap<String, Value>,
		instantiation: &mut DefinitionInstantiation,
	) -> ContainerResult<Instance> {
		match argument {
			Argument::Value(value) => Ok(Instance::Value(value.clone())),
			Argument::Override(name) => self.override_value(overrides, name).map(Instance::Value),
			Argument::Class(dependency) => instantiation.instantiate(dependency, self.base.id()),
		}
	}

	fn override_value(&self, overrides: &BTreeMap<String, Value>, name: &str) -> ContainerResult<Value> {
		overrides
			.get(name)
			.cloned()
			.ok_or_else(|| ContainerError::MissingOverride {
				id: self.base.id().to_string(),
				name: name.to_string(),
			})
	}

	pub(crate) fn compile(
		&self,
		compilation: &DefinitionCompilation<'_>,
		indent: usize,
		inline: bool,
		preloaded: &mut PreloadedIds,
	) -> ContainerResult<String> {
		if inline {
			return self.compile_expression(compilation, indent, preloaded);
		}

		let pad = compilation.indent(indent);
		let id = self.base.id();
		let return_type = ResolvedDefinition::Class(self).return_type();
		let memoized = !self.base.is_singleton_check_eliminable();
		let mut code = String::new();

		if memoized {
			code.push_str(&compilation.singleton_check(indent, &return_type, id));
		}

		let mut files = Vec::new();
		ResolvedDefinition::Class(self).collect_loads(compilation, false, preloaded, &mut files)?;
		code.push_str(&compilation.load_statements(indent, &files));

		let call = self.compile_constructor_call(compilation, indent, preloaded)?;
		let value = if self.properties.is_empty() {
			format!("Arc::new({call})")
		} else {
			let _ = writeln!(code, "{pad}let mut entry = {call};");
			for (name, argument) in &self.properties {
				let expression = self.compile_argument(
					compilation,
					argument,
					&self.overridden_properties,
					indent,
					preloaded,
				)?;
				let _ = writeln!(code, "{pad}entry.{name} = {expression};");
			}
			"Arc::new(entry)".to_string()
		};

		code.push_str(&compilation.return_value(indent, memoized, &return_type, id, &value));
		Ok(code)
	}

	fn compile_expression(
		&self,
		compilation: &DefinitionCompilation<'_>,
		indent: usize,
		preloaded: &mut PreloadedIds,
	) -> ContainerResult<String> {
		if self.properties.is_empty() {
			let call = self.compile_constructor_call(compilation, indent, preloaded)?;
			return Ok(format!("Arc::new({call})"));
		}

		let pad = compilation.indent(indent);
		let inner = compilation.indent(indent + 1);
		let call = self.compile_constructor_call(compilation, indent + 1, preloaded)?;
		let mut code = String::from("{\n");
		let _ = writeln!(code, "{inner}let mut entry = {call};");
		for (name, argument) in &self.properties {
			let expression = self.compile_argument(
				compilation,
				argument,
				&self.overridden_properties,
				indent + 1,
				preloaded,
			)?;
			let _ = writeln!(code, "{inner}entry.{name} = {expression};");
		}
		let _ = writeln!(code, "{inner}Arc::new(entry)");
		let _ = write!(code, "{pad}}}");
		Ok(code)
	}

	fn compile_constructor_call(
		&self,
		compilation: &DefinitionCompilation<'_>,
		indent: usize,
		preloaded: &mut PreloadedIds,
	) -> ContainerResult<String> {
		let mut code = format!("{}::{}(", self.base.id(), self.constructor);
		if self.constructor_arguments.is_empty() {
			code.push(')');
			return Ok(code);
		}

		let pad = compilation.indent(indent);
		let inner = compilation.indent(indent + 1);
		code.push('\n');
		for argument in &self.constructor_arguments {
			let expression = self.compile_argument(
				compilation,
				argument,
				&self.overridden_parameters,
				indent + 1,
				preloaded,
			)?;
			let _ = writeln!(code, "{inner}{expression},");
		}
		let _ = write!(code, "{pad})");
		Ok(code)
	}

	fn compile_argument(
		&self,
		compilation: &DefinitionCompilation<'_>,
		argument: &Argument,
		overrides: &BTreeMap<String, Value>,
		indent: usize,
		preloaded: &mut PreloadedIds,
	) -> ContainerResult<String> {
		match argument {
			Argument::Value(value) => Ok(literal(value)),
			Argument::Override(name) => self.override_value(overrides, name).map(|value| literal(&value)),
			Argument::Class(dependency) => {
				compilation.compile_reference(dependency, self.base.id(), indent, preloaded)
			}
		}
	}
}
