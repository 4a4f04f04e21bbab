use crate::error::{EntityKind, TopologyError};
use crate::graph::edge::{Edge, EdgeId};
use crate::graph::graph::Graph;
use crate::graph::node::{Node, NodeId, NodeRole};
use crate::graph::path::{Path, PathId};
use crate::state::edge_state::EdgeState;
use crate::state::network::NetworkState;
use std::collections::HashMap;

struct EdgeSpec {
    name: String,
    from: String,
    to: String,
    capacity: f64,
}

struct PathSpec {
    name: String,
    edges: Vec<String>,
}

/// Assembles a [`NetworkState`] from string ids, the form topology builders
/// and loaders hand over. Everything is validated in [`build`](Self::build).
///
/// ```
/// use flowgraph::graph::builder::NetworkBuilder;
///
/// let network = NetworkBuilder::new()
///     .source("s")
///     .intermediate("a")
///     .sink("t")
///     .edge("s-a", "s", "a", 5.0)
///     .edge("a-t", "a", "t", 6.0)
///     .path("P1", ["s-a", "a-t"])
///     .build()
///     .unwrap();
/// assert_eq!(network.graph().paths().len(), 1);
/// ```
#[derive(Default)]
pub struct NetworkBuilder {
    nodes: Vec<(String, NodeRole)>,
    edges: Vec<EdgeSpec>,
    paths: Vec<PathSpec>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, name: impl Into<String>, role: NodeRole) -> Self {
        self.nodes.push((name.into(), role));
        self
    }

    pub fn source(self, name: impl Into<String>) -> Self {
        self.node(name, NodeRole::Source)
    }

    pub fn sink(self, name: impl Into<String>) -> Self {
        self.node(name, NodeRole::Sink)
    }

    pub fn intermediate(self, name: impl Into<String>) -> Self {
        self.node(name, NodeRole::Intermediate)
    }

    pub fn edge(
        mut self,
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        capacity: f64,
    ) -> Self {
        self.edges.push(EdgeSpec {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            capacity,
        });
        self
    }

    pub fn path<I, S>(mut self, name: impl Into<String>, edges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.push(PathSpec {
            name: name.into(),
            edges: edges.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn build(self) -> Result<NetworkState, TopologyError> {
        let mut node_ids: HashMap<&str, NodeId> = HashMap::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (i, (name, role)) in self.nodes.iter().enumerate() {
            if node_ids.insert(name, NodeId(i)).is_some() {
                return Err(duplicate(EntityKind::Node, name));
            }
            nodes.push(Node::new(NodeId(i), name.clone(), *role));
        }

        let mut edge_ids: HashMap<&str, EdgeId> = HashMap::new();
        let mut edges = Vec::with_capacity(self.edges.len());
        let mut edge_states = Vec::with_capacity(self.edges.len());
        for (i, spec) in self.edges.iter().enumerate() {
            if edge_ids.insert(&spec.name, EdgeId(i)).is_some() {
                return Err(duplicate(EntityKind::Edge, &spec.name));
            }
            if !spec.capacity.is_finite() || spec.capacity < 0.0 {
                return Err(TopologyError::InvalidCapacity {
                    edge: spec.name.clone(),
                    capacity: spec.capacity,
                });
            }
            let resolve = |node: &str| {
                node_ids
                    .get(node)
                    .copied()
                    .ok_or_else(|| TopologyError::UnknownNode {
                        edge: spec.name.clone(),
                        node: node.to_string(),
                    })
            };
            let from = resolve(&spec.from)?;
            let to = resolve(&spec.to)?;
            edges.push(Edge::new(EdgeId(i), spec.name.clone(), from, to));
            edge_states.push(EdgeState::new(spec.capacity));
        }

        let mut path_names: HashMap<&str, PathId> = HashMap::new();
        let mut paths = Vec::with_capacity(self.paths.len());
        for (i, spec) in self.paths.iter().enumerate() {
            if path_names.insert(&spec.name, PathId(i)).is_some() {
                return Err(duplicate(EntityKind::Path, &spec.name));
            }
            let sequence = spec
                .edges
                .iter()
                .map(|e| {
                    edge_ids
                        .get(e.as_str())
                        .copied()
                        .ok_or_else(|| TopologyError::UnknownEdge {
                            path: spec.name.clone(),
                            edge: e.clone(),
                        })
                })
                .collect::<Result<Vec<EdgeId>, TopologyError>>()?;
            paths.push(Path::new(PathId(i), spec.name.clone(), sequence));
        }

        let graph = Graph::new(nodes, edges, paths)?;
        Ok(NetworkState::new(graph, edge_states))
    }
}

fn duplicate(kind: EntityKind, id: &str) -> TopologyError {
    TopologyError::DuplicateId {
        kind,
        id: id.to_string(),
    }
}
