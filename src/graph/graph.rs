use crate::error::TopologyError;
use crate::graph::edge::{Edge, EdgeId};
use crate::graph::node::{Node, NodeId, NodeRole};
use crate::graph::path::{Path, PathId};
use std::collections::HashMap;

/// Immutable topology: nodes, edges, declared paths and the adjacency
/// derived from them. Ids are dense indices into the backing vectors.
#[derive(Clone, Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    paths: Vec<Path>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    edge_paths: Vec<Vec<PathId>>,
    source: NodeId,
    sink: NodeId,
    node_index: HashMap<String, NodeId>,
    edge_index: HashMap<String, EdgeId>,
    path_index: HashMap<String, PathId>,
}

impl Graph {
    /// Ids must be dense indices; [`NetworkBuilder`](crate::graph::builder::NetworkBuilder)
    /// is the public way in.
    pub(crate) fn new(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        paths: Vec<Path>,
    ) -> Result<Self, TopologyError> {
        check_indices(&nodes, &edges, &paths)?;
        let source = find_role(&nodes, NodeRole::Source)?.ok_or(TopologyError::MissingSource)?;
        let sink = find_role(&nodes, NodeRole::Sink)?.ok_or(TopologyError::MissingSink)?;

        let mut outgoing: Vec<Vec<EdgeId>> = vec![Vec::new(); nodes.len()];
        let mut incoming: Vec<Vec<EdgeId>> = vec![Vec::new(); nodes.len()];
        edges.iter().for_each(|e| {
            outgoing[e.from().index()].push(e.id());
            incoming[e.to().index()].push(e.id());
        });

        let mut edge_paths: Vec<Vec<PathId>> = vec![Vec::new(); edges.len()];
        paths.iter().for_each(|p| {
            p.edges().iter().for_each(|e| edge_paths[e.index()].push(p.id()));
        });

        let node_index = nodes.iter().map(|n| (n.name().to_string(), n.id())).collect();
        let edge_index = edges.iter().map(|e| (e.name().to_string(), e.id())).collect();
        let path_index = paths.iter().map(|p| (p.name().to_string(), p.id())).collect();

        let graph = Self {
            nodes,
            edges,
            paths,
            outgoing,
            incoming,
            edge_paths,
            source,
            sink,
            node_index,
            edge_index,
            path_index,
        };
        graph.paths.iter().try_for_each(|p| graph.check_route(p))?;
        Ok(graph)
    }

    fn check_route(&self, path: &Path) -> Result<(), TopologyError> {
        let (first, last) = match (path.edges().first(), path.edges().last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(TopologyError::EmptyPath(path.name().to_string())),
        };

        for (i, e) in path.edges().iter().enumerate() {
            if path.edges()[..i].contains(e) {
                return Err(TopologyError::RepeatedEdge {
                    path: path.name().to_string(),
                    edge: self.edge_by_id(*e).name().to_string(),
                });
            }
        }

        if let Some(pair) = path
            .edges()
            .windows(2)
            .find(|w| self.edge_by_id(w[0]).to() != self.edge_by_id(w[1]).from())
        {
            return Err(TopologyError::Discontiguous {
                path: path.name().to_string(),
                previous: self.edge_by_id(pair[0]).name().to_string(),
                next: self.edge_by_id(pair[1]).name().to_string(),
            });
        }

        if self.edge_by_id(first).from() != self.source {
            return Err(TopologyError::NotFromSource {
                path: path.name().to_string(),
                expected: self.node_by_id(self.source).name().to_string(),
            });
        }
        if self.edge_by_id(last).to() != self.sink {
            return Err(TopologyError::NotToSink {
                path: path.name().to_string(),
                expected: self.node_by_id(self.sink).name().to_string(),
            });
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn node_by_id(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn edge_by_id(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn path_by_id(&self, id: PathId) -> &Path {
        &self.paths[id.index()]
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    pub fn edge_id(&self, name: &str) -> Option<EdgeId> {
        self.edge_index.get(name).copied()
    }

    pub fn path_id(&self, name: &str) -> Option<PathId> {
        self.path_index.get(name).copied()
    }

    pub fn outgoing(&self, id: NodeId) -> &[EdgeId] {
        &self.outgoing[id.index()]
    }

    pub fn incoming(&self, id: NodeId) -> &[EdgeId] {
        &self.incoming[id.index()]
    }

    /// Paths that route through `id`, in declaration order.
    pub fn paths_through(&self, id: EdgeId) -> &[PathId] {
        &self.edge_paths[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn sink(&self) -> NodeId {
        self.sink
    }

    /// Node names along the path, e.g. `s → a → t`.
    pub fn route(&self, id: PathId) -> String {
        let path = self.path_by_id(id);
        let mut names = Vec::with_capacity(path.edges().len() + 1);
        if let Some(first) = path.edges().first() {
            names.push(self.node_by_id(self.edge_by_id(*first).from()).name());
        }
        path.edges()
            .iter()
            .for_each(|e| names.push(self.node_by_id(self.edge_by_id(*e).to()).name()));
        names.join(" → ")
    }
}

fn check_indices(nodes: &[Node], edges: &[Edge], paths: &[Path]) -> Result<(), TopologyError> {
    for edge in edges {
        if let Some(node) = [edge.from(), edge.to()]
            .into_iter()
            .find(|n| n.index() >= nodes.len())
        {
            return Err(TopologyError::UnknownNode {
                edge: edge.name().to_string(),
                node: format!("#{}", node.index()),
            });
        }
    }
    for path in paths {
        if let Some(e) = path.edges().iter().find(|e| e.index() >= edges.len()) {
            return Err(TopologyError::UnknownEdge {
                path: path.name().to_string(),
                edge: format!("#{}", e.index()),
            });
        }
    }
    Ok(())
}

fn find_role(nodes: &[Node], role: NodeRole) -> Result<Option<NodeId>, TopologyError> {
    let mut found = nodes.iter().filter(|n| n.role() == role);
    let first = found.next();
    if let (Some(first), Some(second)) = (first, found.next()) {
        return Err(TopologyError::DuplicateRole {
            role,
            first: first.name().to_string(),
            second: second.name().to_string(),
        });
    }
    Ok(first.map(|n| n.id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> Vec<Node> {
        vec![
            Node::new(NodeId(0), "s", NodeRole::Source),
            Node::new(NodeId(1), "t", NodeRole::Sink),
        ]
    }

    #[test]
    fn test_path_with_dangling_edge_id_is_rejected() {
        let edges = vec![Edge::new(EdgeId(0), "s-t", NodeId(0), NodeId(1))];
        let paths = vec![Path::new(PathId(0), "P1", vec![EdgeId(5)])];

        let err = Graph::new(nodes(), edges, paths).unwrap_err();
        assert_eq!(
            TopologyError::UnknownEdge {
                path: "P1".into(),
                edge: "#5".into(),
            },
            err
        );
    }

    #[test]
    fn test_edge_with_dangling_node_id_is_rejected() {
        let edges = vec![Edge::new(EdgeId(0), "s-x", NodeId(0), NodeId(9))];
        assert!(matches!(
            Graph::new(nodes(), edges, Vec::new()),
            Err(TopologyError::UnknownNode { .. })
        ));
    }
}
