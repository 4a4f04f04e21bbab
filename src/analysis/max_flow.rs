//! Theoretical source→sink maximum flow over declared capacities.
//!
//! Edmonds–Karp: breadth-first search finds a shortest augmenting path in
//! the residual graph, the path's minimum residual is pushed, and the loop
//! stops once the sink is unreachable. Current path assignments are ignored;
//! disabled edges count as capacity 0.

use crate::graph::edge::EdgeId;
use crate::graph::node::NodeId;
use crate::state::network::NetworkState;
use std::collections::VecDeque;
use tracing::debug;

/// Residuals below this are treated as exhausted.
const RESIDUAL_EPSILON: f64 = 1e-12;

struct Arc {
    to: usize,
    capacity: f64,
    flow: f64,
}

impl Arc {
    fn residual(&self) -> f64 {
        self.capacity - self.flow
    }
}

/// Forward arc of edge `i` sits at `2 * i`, its reverse at `2 * i + 1`.
struct ResidualNetwork {
    arcs: Vec<Arc>,
    adjacency: Vec<Vec<usize>>,
}

impl ResidualNetwork {
    fn from_network(network: &NetworkState) -> Self {
        let graph = network.graph();
        let mut arcs = Vec::with_capacity(graph.edges().len() * 2);
        let mut adjacency = vec![Vec::new(); graph.node_count()];

        for edge in graph.edges() {
            let (from, to) = (edge.from().index(), edge.to().index());
            adjacency[from].push(arcs.len());
            arcs.push(Arc {
                to,
                capacity: network.edge_state(edge.id()).effective_capacity(),
                flow: 0.0,
            });
            adjacency[to].push(arcs.len());
            arcs.push(Arc {
                to: from,
                capacity: 0.0,
                flow: 0.0,
            });
        }

        Self { arcs, adjacency }
    }

    /// Arc used to enter each node on a shortest augmenting path.
    fn bfs(&self, source: usize, sink: usize) -> (Vec<Option<usize>>, Vec<bool>) {
        let mut parent = vec![None; self.adjacency.len()];
        let mut visited = vec![false; self.adjacency.len()];
        let mut queue = VecDeque::new();
        visited[source] = true;
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            if node == sink {
                break;
            }
            for &a in &self.adjacency[node] {
                let arc = &self.arcs[a];
                if !visited[arc.to] && arc.residual() > RESIDUAL_EPSILON {
                    visited[arc.to] = true;
                    parent[arc.to] = Some(a);
                    queue.push_back(arc.to);
                }
            }
        }
        (parent, visited)
    }

    fn augment(&mut self, parent: &[Option<usize>], source: usize, sink: usize) -> f64 {
        let mut amount = f64::INFINITY;
        let mut node = sink;
        while node != source {
            let Some(a) = parent[node] else { break };
            amount = amount.min(self.arcs[a].residual());
            node = self.arcs[a ^ 1].to;
        }

        let mut node = sink;
        while node != source {
            let Some(a) = parent[node] else { break };
            self.arcs[a].flow += amount;
            self.arcs[a ^ 1].flow -= amount;
            node = self.arcs[a ^ 1].to;
        }
        amount
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaxFlow {
    pub value: f64,
    /// Flow per edge in one maximum assignment, indexed by `EdgeId`.
    pub edge_flows: Vec<f64>,
    /// Edges leaving the source side of a minimum cut.
    pub min_cut: Vec<EdgeId>,
    pub source_side: Vec<NodeId>,
}

impl MaxFlow {
    pub fn edge_flow(&self, id: EdgeId) -> f64 {
        self.edge_flows[id.index()]
    }

    pub fn cut_capacity(&self, network: &NetworkState) -> f64 {
        self.min_cut
            .iter()
            .map(|e| network.edge_state(*e).effective_capacity())
            .sum()
    }
}

pub fn max_flow(network: &NetworkState) -> MaxFlow {
    let graph = network.graph();
    let (source, sink) = (graph.source().index(), graph.sink().index());
    let mut residual = ResidualNetwork::from_network(network);

    let mut value = 0.0;
    let mut augmentations = 0usize;
    let reachable = loop {
        let (parent, visited) = residual.bfs(source, sink);
        if !visited[sink] {
            break visited;
        }
        value += residual.augment(&parent, source, sink);
        augmentations += 1;
    };

    let edge_flows = graph
        .edges()
        .iter()
        .map(|e| residual.arcs[2 * e.id().index()].flow)
        .collect();
    let min_cut = graph
        .edges()
        .iter()
        .filter(|e| reachable[e.from().index()] && !reachable[e.to().index()])
        .map(|e| e.id())
        .collect();
    let source_side = graph
        .nodes()
        .iter()
        .filter(|n| reachable[n.id().index()])
        .map(|n| n.id())
        .collect();

    debug!(value, augmentations, "max flow computed");
    MaxFlow {
        value,
        edge_flows,
        min_cut,
        source_side,
    }
}

/// Sum over declared paths of their smallest effective capacity. An upper
/// bound on path-routed throughput that overcounts when paths share edges.
pub fn path_capacity_bound(network: &NetworkState) -> f64 {
    network
        .graph()
        .paths()
        .iter()
        .map(|p| {
            p.edges()
                .iter()
                .map(|e| network.edge_state(*e).effective_capacity())
                .fold(f64::INFINITY, f64::min)
        })
        .filter(|c| c.is_finite())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::NetworkBuilder;
    use crate::scenario::diamond::DiamondScenario;
    use crate::scenario::scenario::Scenario;
    use crate::scenario::shared::SharedEdgeScenario;
    use approx::assert_relative_eq;

    #[test]
    fn test_diamond_max_flow() {
        let network = DiamondScenario.build().unwrap();
        let result = max_flow(&network);

        assert_relative_eq!(8.0, result.value);
        assert_relative_eq!(result.value, result.cut_capacity(&network));
        let cut = result
            .min_cut
            .iter()
            .map(|e| network.graph().edge_by_id(*e).name())
            .collect::<Vec<_>>();
        assert_eq!(vec!["s-a", "b-t"], cut);
    }

    #[test]
    fn test_edge_flows_respect_capacity() {
        let network = SharedEdgeScenario.build().unwrap();
        let result = max_flow(&network);

        assert_relative_eq!(22.0, result.value);
        for edge in network.graph().edges() {
            let flow = result.edge_flow(edge.id());
            assert!(flow >= -1e-9);
            assert!(flow <= network.edge_state(edge.id()).capacity() + 1e-9);
        }
        let out_of_source: f64 = network
            .graph()
            .outgoing(network.graph().source())
            .iter()
            .map(|e| result.edge_flow(*e))
            .sum();
        assert_relative_eq!(result.value, out_of_source);
    }

    #[test]
    fn test_cross_edge_does_not_inflate_flow() {
        let network = NetworkBuilder::new()
            .source("s")
            .intermediate("a")
            .intermediate("b")
            .sink("t")
            .edge("s-a", "s", "a", 1.0)
            .edge("s-b", "s", "b", 1.0)
            .edge("a-b", "a", "b", 1.0)
            .edge("a-t", "a", "t", 1.0)
            .edge("b-t", "b", "t", 1.0)
            .path("P1", ["s-a", "a-b", "b-t"])
            .build()
            .unwrap();
        assert_relative_eq!(2.0, max_flow(&network).value);
    }

    #[test]
    fn test_disabled_edges_count_as_zero() {
        let mut network = DiamondScenario.build().unwrap();
        let a_t = network.resolve_edge("a-t").unwrap();
        network.edge_state_mut(a_t).set_disabled(true);

        let result = max_flow(&network);
        assert_relative_eq!(3.0, result.value);
        assert_relative_eq!(0.0, result.edge_flow(a_t));
    }

    #[test]
    fn test_disconnected_sink() {
        let network = NetworkBuilder::new()
            .source("s")
            .sink("t")
            .edge("s-t", "s", "t", 0.0)
            .build()
            .unwrap();
        let result = max_flow(&network);
        assert_relative_eq!(0.0, result.value);
        assert_eq!(vec![network.graph().source()], result.source_side);
    }

    #[test]
    fn test_path_capacity_bound_overcounts_shared_edges() {
        let network = SharedEdgeScenario.build().unwrap();
        assert!(path_capacity_bound(&network) >= max_flow(&network).value);
    }
}
