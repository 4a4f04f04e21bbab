use crate::error::TopologyError;
use crate::scenario::diamond::DiamondScenario;
use crate::scenario::shared::SharedEdgeScenario;
use crate::state::network::NetworkState;
use clap::ValueEnum;

/// A ready-made network with zero flow on every path.
pub trait Scenario {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn build(&self) -> Result<NetworkState, TopologyError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ScenarioKind {
    #[default]
    Diamond,
    Shared,
}

impl ScenarioKind {
    pub fn scenario(self) -> Box<dyn Scenario> {
        match self {
            ScenarioKind::Diamond => Box::new(DiamondScenario),
            ScenarioKind::Shared => Box::new(SharedEdgeScenario),
        }
    }
}
