use crate::error::{EntityKind, FlowError, Result};
use crate::graph::edge::EdgeId;
use crate::graph::graph::Graph;
use crate::graph::node::NodeId;
use crate::graph::path::PathId;
use crate::state::edge_state::EdgeState;
use crate::state::path_state::PathState;

/// Capacity a path can use once every other path's flow is accounted for,
/// together with the edge that limits it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bottleneck {
    pub capacity: f64,
    pub edge: EdgeId,
}

/// Topology plus the mutable capacities and flows the controller works on.
///
/// Only [`FlowController`](crate::controller::controller::FlowController)
/// mutates a `NetworkState`; everything public here is read-only.
#[derive(Clone, Debug)]
pub struct NetworkState {
    graph: Graph,
    edge_states: Vec<EdgeState>,
    path_states: Vec<PathState>,
}

impl NetworkState {
    /// Built through [`NetworkBuilder`](crate::graph::builder::NetworkBuilder),
    /// which validates capacities and supplies one state per edge.
    pub(crate) fn new(graph: Graph, edge_states: Vec<EdgeState>) -> Self {
        debug_assert_eq!(graph.edges().len(), edge_states.len());
        let path_states = vec![PathState::default(); graph.paths().len()];
        Self {
            graph,
            edge_states,
            path_states,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn edge_states(&self) -> &[EdgeState] {
        &self.edge_states
    }

    pub fn path_states(&self) -> &[PathState] {
        &self.path_states
    }

    pub fn edge_state(&self, id: EdgeId) -> &EdgeState {
        &self.edge_states[id.index()]
    }

    pub fn path_state(&self, id: PathId) -> &PathState {
        &self.path_states[id.index()]
    }

    pub fn resolve_path(&self, name: &str) -> Result<PathId> {
        self.graph
            .path_id(name)
            .ok_or_else(|| FlowError::not_found(EntityKind::Path, name))
    }

    pub fn resolve_edge(&self, name: &str) -> Result<EdgeId> {
        self.graph
            .edge_id(name)
            .ok_or_else(|| FlowError::not_found(EntityKind::Edge, name))
    }

    pub fn resolve_node(&self, name: &str) -> Result<NodeId> {
        self.graph
            .node_id(name)
            .ok_or_else(|| FlowError::not_found(EntityKind::Node, name))
    }

    pub fn bottleneck(&self, id: PathId) -> Bottleneck {
        let path = self.graph.path_by_id(id);
        let own = self.path_state(id).current_flow();

        let mut best: Option<Bottleneck> = None;
        for e in path.edges() {
            let state = self.edge_state(*e);
            if state.is_disabled() {
                return Bottleneck {
                    capacity: 0.0,
                    edge: *e,
                };
            }
            let left = state.capacity() - (state.flow() - own);
            if best.is_none_or(|b| left < b.capacity) {
                best = Some(Bottleneck {
                    capacity: left,
                    edge: *e,
                });
            }
        }
        // paths are non-empty by construction
        best.unwrap_or(Bottleneck {
            capacity: 0.0,
            edge: path.edges()[0],
        })
    }

    pub fn edge_utilization(&self, id: EdgeId) -> f64 {
        self.edge_state(id).utilization()
    }

    pub fn shared_paths(&self, id: EdgeId) -> &[PathId] {
        self.graph.paths_through(id)
    }

    /// Sum of all path flows.
    pub fn total_throughput(&self) -> f64 {
        self.path_states.iter().map(|p| p.current_flow()).sum()
    }

    /// Flow arriving at the sink over its incoming edges.
    pub fn sink_inflow(&self) -> f64 {
        self.graph
            .incoming(self.graph.sink())
            .iter()
            .map(|e| self.edge_state(*e).flow())
            .sum()
    }

    pub(crate) fn edge_state_mut(&mut self, id: EdgeId) -> &mut EdgeState {
        &mut self.edge_states[id.index()]
    }

    /// Moves `id` to `new_flow`, shifting every edge on the path by the same
    /// delta. Callers validate feasibility first.
    pub(crate) fn apply_path_flow(&mut self, id: PathId, new_flow: f64) {
        let delta = new_flow - self.path_states[id.index()].current_flow();
        let edges = self.graph.path_by_id(id).edges();
        for e in edges {
            self.edge_states[e.index()].shift_flow(delta);
        }
        self.path_states[id.index()].set_flow(new_flow);
    }

    pub(crate) fn clear_flows(&mut self) {
        self.edge_states.iter_mut().for_each(|e| e.reset_flow());
        self.path_states.iter_mut().for_each(|p| p.set_flow(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::diamond::DiamondScenario;
    use crate::scenario::scenario::Scenario;
    use approx::assert_relative_eq;

    fn network() -> NetworkState {
        DiamondScenario.build().unwrap()
    }

    #[test]
    fn test_bottleneck_picks_tightest_edge() {
        let network = network();
        let p2 = network.resolve_path("P2").unwrap();
        let b = network.bottleneck(p2);
        assert_relative_eq!(3.0, b.capacity);
        assert_eq!("b-t", network.graph().edge_by_id(b.edge).name());
    }

    #[test]
    fn test_bottleneck_discounts_own_flow() {
        let mut network = network();
        let p1 = network.resolve_path("P1").unwrap();
        network.apply_path_flow(p1, 4.0);

        let b = network.bottleneck(p1);
        assert_relative_eq!(5.0, b.capacity);
        assert_eq!("s-a", network.graph().edge_by_id(b.edge).name());
    }

    #[test]
    fn test_bottleneck_of_disabled_edge_is_zero() {
        let mut network = network();
        let p1 = network.resolve_path("P1").unwrap();
        let a_t = network.resolve_edge("a-t").unwrap();
        network.edge_state_mut(a_t).set_disabled(true);

        let b = network.bottleneck(p1);
        assert_relative_eq!(0.0, b.capacity);
        assert_eq!(a_t, b.edge);
    }

    #[test]
    fn test_apply_and_clear_keep_throughput_consistent() {
        let mut network = network();
        let p1 = network.resolve_path("P1").unwrap();
        let p2 = network.resolve_path("P2").unwrap();
        network.apply_path_flow(p1, 2.5);
        network.apply_path_flow(p2, 1.5);

        assert_relative_eq!(4.0, network.total_throughput());
        assert_relative_eq!(4.0, network.sink_inflow());
        let s_a = network.resolve_edge("s-a").unwrap();
        assert_relative_eq!(0.5, network.edge_utilization(s_a));

        network.clear_flows();
        assert_relative_eq!(0.0, network.total_throughput());
        assert_relative_eq!(0.0, network.sink_inflow());
    }

    #[test]
    fn test_unknown_ids() {
        let network = network();
        assert!(matches!(
            network.resolve_path("P9"),
            Err(FlowError::NotFound { kind: EntityKind::Path, .. })
        ));
        assert!(network.resolve_edge("nope").is_err());
        assert!(network.resolve_node("x").is_err());
    }
}
