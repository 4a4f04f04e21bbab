//! Equal-share water-filling across every declared path.

use crate::controller::controller::FlowController;
use crate::controller::report::{Distribution, PathAssignment};
use crate::error::{FlowError, Result};
use crate::graph::path::PathId;
use tracing::{debug, info};

impl FlowController<'_> {
    /// Clears all flows, then repeatedly offers `remaining / unsaturated`
    /// to each unsaturated path in declaration order. A path that cannot
    /// take its full share drops out. The granted total never exceeds
    /// `total`.
    pub fn distribute_flow_equally(&mut self, total: f64) -> Result<Distribution> {
        if !total.is_finite() || total < 0.0 {
            return Err(FlowError::InvalidAmount(total));
        }

        let before = self.network.clone();
        match self.water_fill(total) {
            Ok(distribution) => Ok(distribution),
            Err(e) => {
                *self.network = before;
                Err(e)
            }
        }
    }

    fn water_fill(&mut self, total: f64) -> Result<Distribution> {
        self.network.clear_flows();

        let path_count = self.network.graph().paths().len();
        let mut active: Vec<PathId> = self.network.graph().paths().iter().map(|p| p.id()).collect();
        let mut saturated = vec![false; path_count];
        let mut remaining = total;
        let mut passes = 0;

        while remaining > self.tolerance && !active.is_empty() {
            passes += 1;
            let share = remaining / active.len() as f64;
            let mut granted = 0.0;
            let mut next = Vec::with_capacity(active.len());

            for id in active {
                let bounds = self.max_safe(id);
                let grant = share.min(bounds.available_capacity);
                if grant > 0.0 {
                    self.set_flow(id, bounds.current_flow + grant)?;
                    granted += grant;
                }
                if grant + self.tolerance < share {
                    saturated[id.index()] = true;
                } else {
                    next.push(id);
                }
            }

            debug!(pass = passes, share, granted, unsaturated = next.len(), "water-filling pass");
            remaining -= granted;
            active = next;
            if granted <= self.tolerance {
                break;
            }
        }

        let assignments: Vec<PathAssignment> = self
            .network
            .graph()
            .paths()
            .iter()
            .map(|p| PathAssignment {
                path_id: p.name().to_string(),
                flow: self.network.path_state(p.id()).current_flow(),
                saturated: saturated[p.id().index()],
            })
            .collect();
        let achieved = self.network.total_throughput();
        let saturated_count = saturated.iter().filter(|s| **s).count();

        info!(requested = total, achieved, passes, "flow distributed");
        Ok(Distribution {
            requested: total,
            achieved,
            assignments,
            passes,
            message: format!(
                "distributed {achieved:.2} of {total:.2} over {path_count} paths ({saturated_count} saturated)"
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::controller::FlowController;
    use crate::error::FlowError;
    use crate::scenario::diamond::DiamondScenario;
    use crate::scenario::scenario::Scenario;
    use crate::scenario::shared::SharedEdgeScenario;
    use approx::assert_relative_eq;

    #[test]
    fn test_equal_split_when_capacity_allows() {
        let mut network = DiamondScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);
        let result = controller.distribute_flow_equally(4.0).unwrap();

        assert_relative_eq!(4.0, result.achieved);
        assert_relative_eq!(2.0, result.flow_of("P1").unwrap());
        assert_relative_eq!(2.0, result.flow_of("P2").unwrap());
        assert_eq!(1, result.passes);
        assert!(result.assignments.iter().all(|a| !a.saturated));
    }

    #[test]
    fn test_leftover_moves_to_unsaturated_paths() {
        let mut network = DiamondScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);
        let result = controller.distribute_flow_equally(8.0).unwrap();

        assert_relative_eq!(8.0, result.achieved);
        assert_relative_eq!(5.0, result.flow_of("P1").unwrap());
        assert_relative_eq!(3.0, result.flow_of("P2").unwrap());
        assert_eq!(2, result.passes);
    }

    #[test]
    fn test_excess_is_not_granted() {
        let mut network = DiamondScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);
        controller.set_path_flow("P1", 1.0).unwrap();
        let result = controller.distribute_flow_equally(20.0).unwrap();

        assert_relative_eq!(8.0, result.achieved);
        assert!(result.assignments.iter().all(|a| a.saturated));
        assert_relative_eq!(8.0, controller.network().total_throughput());
    }

    #[test]
    fn test_shared_edges_stay_within_capacity() {
        let mut network = SharedEdgeScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);
        let result = controller.distribute_flow_equally(30.0).unwrap();

        assert!(result.achieved <= 30.0 + 1e-9);
        assert!(result.achieved <= 22.0 + 1e-9);
        let sum: f64 = result.assignments.iter().map(|a| a.flow).sum();
        assert_relative_eq!(result.achieved, sum, epsilon = 1e-9);
        for edge in controller.network().edge_states() {
            assert!(edge.flow() <= edge.capacity() + 1e-9);
        }
    }

    #[test]
    fn test_zero_and_invalid_totals() {
        let mut network = DiamondScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);
        controller.set_path_flow("P2", 2.0).unwrap();

        let result = controller.distribute_flow_equally(0.0).unwrap();
        assert_relative_eq!(0.0, result.achieved);
        assert_eq!(0, result.passes);

        controller.set_path_flow("P2", 2.0).unwrap();
        assert!(matches!(
            controller.distribute_flow_equally(-1.0),
            Err(FlowError::InvalidAmount(_))
        ));
        assert!(controller.distribute_flow_equally(f64::INFINITY).is_err());
        assert_relative_eq!(2.0, controller.network().total_throughput());
    }

    #[test]
    fn test_blocked_paths_receive_nothing() {
        let mut network = DiamondScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);
        controller.disable_edge("a-t").unwrap();
        let result = controller.distribute_flow_equally(6.0).unwrap();

        assert_relative_eq!(0.0, result.flow_of("P1").unwrap());
        assert_relative_eq!(3.0, result.flow_of("P2").unwrap());
        assert_relative_eq!(3.0, result.achieved);
    }
}
