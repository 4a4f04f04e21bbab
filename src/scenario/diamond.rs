use crate::error::TopologyError;
use crate::graph::builder::NetworkBuilder;
use crate::scenario::scenario::Scenario;
use crate::state::network::NetworkState;

/// Two disjoint routes from `s` to `t`, one through `a` and one through `b`.
pub struct DiamondScenario;

impl Scenario for DiamondScenario {
    fn name(&self) -> &str {
        "diamond"
    }

    fn description(&self) -> &str {
        "two disjoint paths, max flow 8"
    }

    fn build(&self) -> Result<NetworkState, TopologyError> {
        NetworkBuilder::new()
            .source("s")
            .intermediate("a")
            .intermediate("b")
            .sink("t")
            .edge("s-a", "s", "a", 5.0)
            .edge("a-t", "a", "t", 6.0)
            .edge("s-b", "s", "b", 4.0)
            .edge("b-t", "b", "t", 3.0)
            .path("P1", ["s-a", "a-t"])
            .path("P2", ["s-b", "b-t"])
            .build()
    }
}
