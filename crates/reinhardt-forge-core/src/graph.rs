//! Dependency graph analysis and visualization.
//!
//! Renders resolved definitions in DOT format, which can be displayed with
//! Graphviz, and finds dependency cycles before any code is generated.
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_forge_core::definition::{ClassDefinition, Definitions};
//! use reinhardt_forge_core::graph::DependencyGraph;
//!
//! let definitions = Definitions::new()
//!     .with(ClassDefinition::singleton("app::Mailer").add_constructor_argument_from_class("app::Smtp"))
//!     .with(ClassDefinition::singleton("app::Smtp"));
//!
//! let graph = DependencyGraph::from_definitions(&definitions);
//! assert!(graph.to_dot().contains("\"app::Mailer\" -> \"app::Smtp\";"));
//! assert!(graph.detect_cycles().is_empty());
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;

use crate::definition::{Definition, Definitions};
use crate::scope::Scope;

/// Kind of definition behind a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	/// Constructor call.
	Class,
	/// Alias of another identifier.
	Reference,
	/// Consumer-dependent choice.
	ContextDependent,
	/// The container itself.
	Container,
}

/// A node in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
	/// Component identifier
	pub id: String,
	/// Definition kind
	pub kind: NodeKind,
	/// Scope, absent for context-dependent definitions
	pub scope: Option<Scope>,
	/// Whether the component is reachable from outside the container
	pub is_entry_point: bool,
}

/// A dependency edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
	/// Consumer identifier
	pub from: String,
	/// Dependency identifier
	pub to: String,
	/// Consumer selecting this branch, for context-dependent edges
	pub label: Option<String>,
}

/// Dependency graph of resolved definitions
#[derive(Debug, Default)]
pub struct DependencyGraph {
	nodes: BTreeMap<String, GraphNode>,
	edges: Vec<GraphEdge>,
}

impl DependencyGraph {
	/// Builds the graph of `definitions`.
	///
	/// Edges follow constructor arguments and properties of class
	/// definitions, aliases of references and every branch of a
	/// context-dependent definition.
	pub fn from_definitions(definitions: &Definitions) -> Self {
		let mut graph = Self::default();
		for (id, definition) in definitions.iter() {
			let (kind, scope) = match definition {
				Definition::Class(class) => (NodeKind::Class, Some(class.base().scope())),
				Definition::Reference(reference) => {
					(NodeKind::Reference, Some(reference.base().scope()))
				}
				Definition::ContextDependent(_) => (NodeKind::ContextDependent, None),
				Definition::Container(_) => (NodeKind::Container, Some(Scope::Singleton)),
			};
			graph.nodes.insert(
				id.to_string(),
				GraphNode {
					id: id.to_string(),
					kind,
					scope,
					is_entry_point: definition.is_entry_point(),
				},
			);

			match definition {
				Definition::ContextDependent(context) => {
					if let Some(default) = context.default() {
						graph.add_edge(id, default, Some("default".to_string()));
					}
					for (parent, target) in context.contexts() {
						graph.add_edge(id, target, Some(parent.clone()));
					}
				}
				other => {
					for dependency in other.class_dependencies() {
						graph.add_edge(id, &dependency, None);
					}
				}
			}
		}
		graph
	}

	fn add_edge(&mut self, from: &str, to: &str, label: Option<String>) {
		self.edges.push(GraphEdge {
			from: from.to_string(),
			to: to.to_string(),
			label,
		});
	}

	/// Nodes in identifier order.
	pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
		self.nodes.values()
	}

	/// Edges in discovery order.
	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	/// Generate DOT format output for Graphviz
	pub fn to_dot(&self) -> String {
		let mut output = String::from("digraph DependencyGraph {\n");
		output.push_str("  rankdir=LR;\n");
		output.push_str("  node [shape=box, style=rounded];\n\n");

		for node in self.nodes.values() {
			let color = match (node.kind, node.scope) {
				(NodeKind::Container, _) => "lightgray",
				(_, Some(Scope::Singleton)) => "lightblue",
				(_, Some(Scope::Prototype)) => "lightyellow",
				(_, None) => "white",
			};
			let shape = match node.kind {
				NodeKind::ContextDependent => ", shape=diamond",
				NodeKind::Reference => ", shape=ellipse",
				_ => "",
			};
			let border = if node.is_entry_point { ", penwidth=2" } else { "" };
			let _ = writeln!(
				output,
				"  \"{id}\" [label=\"{id}\", fillcolor={color}, style=filled{shape}{border}];",
				id = escape(&node.id),
			);
		}

		output.push('\n');

		for edge in &self.edges {
			match &edge.label {
				Some(label) => {
					let _ = writeln!(
						output,
						"  \"{}\" -> \"{}\" [label=\"{}\"];",
						escape(&edge.from),
						escape(&edge.to),
						escape(label)
					);
				}
				None => {
					let _ = writeln!(output, "  \"{}\" -> \"{}\";", escape(&edge.from), escape(&edge.to));
				}
			}
		}

		output.push_str("}\n");
		output
	}

	/// Detect circular dependencies in the graph
	///
	/// Returns every cycle found, each listed from its first member.
	pub fn detect_cycles(&self) -> Vec<Vec<String>> {
		let mut cycles = Vec::new();
		let mut visited = HashSet::new();
		let mut rec_stack = HashSet::new();

		for id in self.nodes.keys() {
			if !visited.contains(id) {
				let mut path = Vec::new();
				self.dfs_detect_cycles(id, &mut visited, &mut rec_stack, &mut path, &mut cycles);
			}
		}

		cycles
	}

	fn dfs_detect_cycles(
		&self,
		node: &str,
		visited: &mut HashSet<String>,
		rec_stack: &mut HashSet<String>,
		path: &mut Vec<String>,
		cycles: &mut Vec<Vec<String>>,
	) {
		visited.insert(node.to_string());
		rec_stack.insert(node.to_string());
		path.push(node.to_string());

		let dependencies: Vec<&str> = self
			.edges
			.iter()
			.filter(|edge| edge.from == node)
			.map(|edge| edge.to.as_str())
			.collect();

		for dependency in dependencies {
			if !visited.contains(dependency) {
				self.dfs_detect_cycles(dependency, visited, rec_stack, path, cycles);
			} else if rec_stack.contains(dependency)
				&& let Some(start) = path.iter().position(|p| p == dependency)
			{
				cycles.push(path[start..].to_vec());
			}
		}

		path.pop();
		rec_stack.remove(node);
	}

	/// Get statistics about the dependency graph
	pub fn statistics(&self) -> GraphStatistics {
		GraphStatistics {
			node_count: self.nodes.len(),
			edge_count: self.edges.len(),
			singleton_count: self.count(|node| node.scope == Some(Scope::Singleton)),
			prototype_count: self.count(|node| node.scope == Some(Scope::Prototype)),
			context_dependent_count: self.count(|node| node.kind == NodeKind::ContextDependent),
			entry_point_count: self.count(|node| node.is_entry_point),
		}
	}

	fn count(&self, predicate: impl Fn(&GraphNode) -> bool) -> usize {
		self.nodes.values().filter(|node| predicate(node)).count()
	}
}

fn escape(text: &str) -> String {
	text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Statistics about a dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStatistics {
	/// Total number of nodes
	pub node_count: usize,
	/// Total number of edges
	pub edge_count: usize,
	/// Number of singleton-scoped definitions
	pub singleton_count: usize,
	/// Number of prototype-scoped definitions
	pub prototype_count: usize,
	/// Number of context-dependent definitions
	pub context_dependent_count: usize,
	/// Number of entry points
	pub entry_point_count: usize,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::definition::{
		ClassDefinition, ContextDependentDefinition, ReferenceDefinition, SelfDefinition,
	};
	use rstest::{fixture, rstest};

	#[fixture]
	fn definitions() -> Definitions {
		let mut contexts = BTreeMap::new();
		contexts.insert("app::Cleanup".to_string(), "app::NullLogger".to_string());
		Definitions::new()
			.with(SelfDefinition::new("crate::Container"))
			.with(
				ClassDefinition::singleton("app::Mailer")
					.entry_point(true)
					.add_constructor_argument_from_class("app::Transport")
					.add_property_from_class("logger", "app::Logger"),
			)
			.with(ReferenceDefinition::singleton("app::Transport", "app::Smtp"))
			.with(ClassDefinition::prototype("app::Smtp"))
			.with(ContextDependentDefinition::new(
				"app::Logger",
				Some("app::FileLogger".to_string()),
				contexts,
			))
			.with(ClassDefinition::singleton("app::FileLogger"))
			.with(ClassDefinition::singleton("app::NullLogger"))
	}

	#[rstest]
	fn test_to_dot(definitions: Definitions) {
		// Arrange
		let graph = DependencyGraph::from_definitions(&definitions);

		// Act
		let dot = graph.to_dot();

		// Assert
		assert!(dot.starts_with("digraph DependencyGraph {\n"));
		assert!(dot.contains(
			"  \"app::Mailer\" [label=\"app::Mailer\", fillcolor=lightblue, style=filled, penwidth=2];"
		));
		assert!(dot.contains("  \"app::Logger\" [label=\"app::Logger\", fillcolor=white, style=filled, shape=diamond];"));
		assert!(dot.contains("  \"app::Mailer\" -> \"app::Transport\";"));
		assert!(dot.contains("  \"app::Logger\" -> \"app::NullLogger\" [label=\"app::Cleanup\"];"));
		assert!(dot.contains("  \"app::Logger\" -> \"app::FileLogger\" [label=\"default\"];"));
		assert!(dot.ends_with("}\n"));
	}

	#[rstest]
	fn test_to_dot_escapes_quotes() {
		// Arrange
		let definitions = Definitions::new().with(ClassDefinition::singleton("app::Say\"Hi\""));
		let graph = DependencyGraph::from_definitions(&definitions);

		// Act
		let dot = graph.to_dot();

		// Assert
		assert!(dot.contains("\"app::Say\\\"Hi\\\"\""));
	}

	#[rstest]
	fn test_statistics(definitions: Definitions) {
		// Arrange
		let graph = DependencyGraph::from_definitions(&definitions);

		// Act
		let stats = graph.statistics();

		// Assert
		assert_eq!(
			stats,
			GraphStatistics {
				node_count: 7,
				edge_count: 5,
				singleton_count: 5,
				prototype_count: 1,
				context_dependent_count: 1,
				entry_point_count: 1,
			}
		);
	}

	#[rstest]
	fn test_detect_cycles_none(definitions: Definitions) {
		// Arrange
		let graph = DependencyGraph::from_definitions(&definitions);

		// Act
		let cycles = graph.detect_cycles();

		// Assert
		assert!(cycles.is_empty());
	}

	#[rstest]
	fn test_detect_cycles_through_alias() {
		// Arrange
		let definitions = Definitions::new()
			.with(ClassDefinition::singleton("app::A").add_constructor_argument_from_class("app::B"))
			.with(ClassDefinition::singleton("app::B").add_property_from_class("a", "app::I"))
			.with(ReferenceDefinition::singleton("app::I", "app::A"));
		let graph = DependencyGraph::from_definitions(&definitions);

		// Act
		let cycles = graph.detect_cycles();

		// Assert
		assert_eq!(cycles, vec![vec!["app::A", "app::B", "app::I"]]);
	}
}
