//! Dependency graph export for visualization and debugging.
//!
//! The graph is built from [`Container::components`], so it shows the
//! declared dependency aliases, not the objects currently cached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::descriptors::ComponentInfo;
use crate::error::{DiError, DiResult};

/// A registered component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Key rendered with [`Key`](crate::Key)'s `Display`
    pub id: String,
    /// Constructed type (the factory type for factory components)
    pub type_name: String,
    /// Scope id
    pub scope: String,
    pub is_factory: bool,
}

/// A dependency alias: `from` receives `to` as parameter `parameter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub parameter: String,
    /// `to` is not registered; resolving `from` will fail
    pub dangling: bool,
}

/// Summary counts for a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub component_count: usize,
    pub factory_count: usize,
    /// Components per scope id
    pub scope_counts: BTreeMap<String, usize>,
    pub dangling_count: usize,
}

/// Nodes and edges of a container's registrations.
///
/// # Examples
///
/// ```rust
/// use scoped_di::graph_export::DependencyGraph;
/// use scoped_di::{ComponentDescriptor, Container, ScopeId};
///
/// let container = Container::new();
/// container
///     .register("Db", ComponentDescriptor::of(|_| Ok(1u8)).in_scope(ScopeId::SINGLETON))
///     .register("Dao", ComponentDescriptor::of(|_| Ok(2u8)).depends_on("db", "Db"));
///
/// let graph = DependencyGraph::from_container(&container);
/// assert_eq!(graph.nodes.len(), 2);
/// assert_eq!(graph.edges[0].from, "'Dao'");
/// assert_eq!(graph.edges[0].to, "'Db'");
///
/// let json = graph.to_json().unwrap();
/// assert!(json.contains("\"parameter\": \"db\""));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

impl DependencyGraph {
    pub fn from_container(container: &Container) -> Self {
        Self::from_components(&container.components())
    }

    /// Builds the graph from a registration snapshot.
    pub fn from_components(components: &[ComponentInfo]) -> Self {
        let mut graph = DependencyGraph::default();

        for info in components {
            graph.nodes.push(GraphNode {
                id: info.key.to_string(),
                type_name: info.type_name.to_string(),
                scope: info.scope.to_string(),
                is_factory: info.is_factory,
            });

            for (parameter, dependency) in &info.dependencies {
                let dangling = !components.iter().any(|other| &other.key == dependency);
                graph.edges.push(GraphEdge {
                    from: info.key.to_string(),
                    to: dependency.to_string(),
                    parameter: parameter.clone(),
                    dangling,
                });
            }

            graph.metadata.component_count += 1;
            if info.is_factory {
                graph.metadata.factory_count += 1;
            }
            *graph
                .metadata
                .scope_counts
                .entry(info.scope.to_string())
                .or_insert(0) += 1;
        }

        graph.metadata.dangling_count = graph.edges.iter().filter(|e| e.dangling).count();
        graph
    }

    pub fn to_json(&self) -> DiResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| DiError::Config(format!("JSON serialization failed: {}", err)))
    }

    pub fn to_yaml(&self) -> DiResult<String> {
        serde_yaml::to_string(self)
            .map_err(|err| DiError::Config(format!("YAML serialization failed: {}", err)))
    }

    /// Renders the graph in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        let mut output = String::from("digraph DependencyGraph {\n  rankdir=TB;\n  node [shape=box];\n\n");

        for node in &self.nodes {
            let shape = if node.is_factory { "component" } else { "box" };
            output.push_str(&format!(
                "  \"{}\" [label=\"{}\\n({})\", shape={}];\n",
                escape(&node.id),
                escape(&node.type_name),
                escape(&node.scope),
                shape
            ));
        }
        output.push('\n');

        for edge in &self.edges {
            let style = if edge.dangling { "dashed" } else { "solid" };
            output.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\", style={}];\n",
                escape(&edge.from),
                escape(&edge.to),
                escape(&edge.parameter),
                style
            ));
        }

        output.push_str("}\n");
        output
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
