use crate::state::network::NetworkState;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Overload,
    Failure,
}

/// Derived diagnostic; recomputed from the state on every request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Alert {
    pub subject: String,
    pub kind: AlertKind,
    pub description: String,
}

/// Overload is reported only beyond `tolerance`, matching the capacity
/// invariant.
pub fn generate_alerts(network: &NetworkState, tolerance: f64) -> Vec<Alert> {
    let graph = network.graph();
    graph
        .edges()
        .iter()
        .flat_map(|edge| {
            let state = network.edge_state(edge.id());
            let overload = (state.flow() > state.capacity() + tolerance).then(|| Alert {
                subject: edge.name().to_string(),
                kind: AlertKind::Overload,
                description: format!(
                    "edge {} carries {:.2} over capacity {:.2}",
                    edge.name(),
                    state.flow(),
                    state.capacity()
                ),
            });
            let failure = state.is_disabled().then(|| Alert {
                subject: edge.name().to_string(),
                kind: AlertKind::Failure,
                description: format!(
                    "edge {} ({} → {}) is disabled",
                    edge.name(),
                    graph.node_by_id(edge.from()).name(),
                    graph.node_by_id(edge.to()).name()
                ),
            });
            overload.into_iter().chain(failure)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::diamond::DiamondScenario;
    use crate::controller::controller::FlowController;
    use crate::scenario::scenario::Scenario;
    use crate::scenario::shared::SharedEdgeScenario;

    const TOL: f64 = 1e-6;

    #[test]
    fn test_no_alerts_on_healthy_network() {
        let network = DiamondScenario.build().unwrap();
        assert!(generate_alerts(&network, TOL).is_empty());
    }

    #[test]
    fn test_failure_and_overload_alerts() {
        let mut network = DiamondScenario.build().unwrap();
        let a_t = network.resolve_edge("a-t").unwrap();
        let s_b = network.resolve_edge("s-b").unwrap();
        network.edge_state_mut(a_t).set_disabled(true);
        // bypass the controller to fabricate an overload
        network.edge_state_mut(s_b).shift_flow(10.0);

        let alerts = generate_alerts(&network, TOL);
        assert_eq!(2, alerts.len());
        assert_eq!(AlertKind::Failure, alerts[0].kind);
        assert_eq!("a-t", alerts[0].subject);
        assert_eq!(AlertKind::Overload, alerts[1].kind);
        assert_eq!("s-b", alerts[1].subject);
    }

    #[test]
    fn test_saturated_shared_edges_do_not_raise_overload() {
        let mut network = SharedEdgeScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);

        for total in [7.3, 19.9, 22.0, 31.7] {
            controller.distribute_flow_equally(total).unwrap();
            for path in ["P1", "P2", "P3", "P4"] {
                let _ = controller.saturate_path_flow(path);
            }
            let _ = controller.update_path_flow("P3", -0.1);
            let _ = controller.saturate_path_flow("P4");

            let overloads = generate_alerts(controller.network(), TOL)
                .into_iter()
                .filter(|a| a.kind == AlertKind::Overload)
                .collect::<Vec<_>>();
            assert!(overloads.is_empty(), "{overloads:?}");
        }
    }

    #[test]
    fn test_overload_within_tolerance_is_ignored() {
        let mut network = DiamondScenario.build().unwrap();
        let b_t = network.resolve_edge("b-t").unwrap();
        network.edge_state_mut(b_t).shift_flow(3.0 + 1e-12);
        assert!(generate_alerts(&network, TOL).is_empty());

        network.edge_state_mut(b_t).shift_flow(0.5);
        assert_eq!(AlertKind::Overload, generate_alerts(&network, TOL)[0].kind);
    }
}
