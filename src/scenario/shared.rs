use crate::error::TopologyError;
use crate::graph::builder::NetworkBuilder;
use crate::scenario::scenario::Scenario;
use crate::state::network::NetworkState;

/// Two layers of intermediates where every first-hop edge and every
/// last-hop edge is shared by two of the four paths.
pub struct SharedEdgeScenario;

impl Scenario for SharedEdgeScenario {
    fn name(&self) -> &str {
        "shared"
    }

    fn description(&self) -> &str {
        "four paths over shared edges, max flow 22"
    }

    fn build(&self) -> Result<NetworkState, TopologyError> {
        NetworkBuilder::new()
            .source("s")
            .intermediate("a")
            .intermediate("b")
            .intermediate("c")
            .intermediate("d")
            .sink("t")
            .edge("s-a", "s", "a", 12.0)
            .edge("s-b", "s", "b", 10.0)
            .edge("a-c", "a", "c", 8.0)
            .edge("a-d", "a", "d", 9.0)
            .edge("b-c", "b", "c", 7.0)
            .edge("b-d", "b", "d", 11.0)
            .edge("c-t", "c", "t", 15.0)
            .edge("d-t", "d", "t", 13.0)
            .path("P1", ["s-a", "a-c", "c-t"])
            .path("P2", ["s-a", "a-d", "d-t"])
            .path("P3", ["s-b", "b-c", "c-t"])
            .path("P4", ["s-b", "b-d", "d-t"])
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last_hops_are_shared() {
        let network = SharedEdgeScenario.build().unwrap();
        for edge in ["s-a", "s-b", "c-t", "d-t"] {
            let id = network.resolve_edge(edge).unwrap();
            assert_eq!(2, network.shared_paths(id).len(), "{edge}");
        }
        let a_c = network.resolve_edge("a-c").unwrap();
        assert_eq!(1, network.shared_paths(a_c).len());
    }
}
