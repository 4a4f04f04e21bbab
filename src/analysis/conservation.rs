use crate::error::{FlowError, Result};
use crate::graph::edge::EdgeId;
use crate::graph::node::NodeRole;
use crate::state::network::NetworkState;
use serde::Serialize;
use std::fmt;

/// A broken model invariant. Seeing one means the controller has a bug.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    EdgeFlowMismatch { edge: String, stored: f64, expected: f64 },
    NodeImbalance { node: String, inflow: f64, outflow: f64 },
    CapacityExceeded { edge: String, flow: f64, capacity: f64 },
    FlowOnDisabledEdge { edge: String, path: String, flow: f64 },
    NegativePathFlow { path: String, flow: f64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::EdgeFlowMismatch { edge, stored, expected } => {
                write!(f, "edge {edge} stores {stored} but its paths sum to {expected}")
            }
            Violation::NodeImbalance { node, inflow, outflow } => {
                write!(f, "node {node} receives {inflow} but sends {outflow}")
            }
            Violation::CapacityExceeded { edge, flow, capacity } => {
                write!(f, "edge {edge} carries {flow} over capacity {capacity}")
            }
            Violation::FlowOnDisabledEdge { edge, path, flow } => {
                write!(f, "path {path} sends {flow} through disabled edge {edge}")
            }
            Violation::NegativePathFlow { path, flow } => {
                write!(f, "path {path} has negative flow {flow}")
            }
        }
    }
}

/// Edge flows recomputed from the paths, plus node balance at every
/// intermediate node.
pub fn conservation_violations(network: &NetworkState, tolerance: f64) -> Vec<Violation> {
    let graph = network.graph();
    let mut violations = Vec::new();

    for edge in graph.edges() {
        let expected: f64 = network
            .shared_paths(edge.id())
            .iter()
            .map(|p| network.path_state(*p).current_flow())
            .sum();
        let stored = network.edge_state(edge.id()).flow();
        if (stored - expected).abs() > tolerance {
            violations.push(Violation::EdgeFlowMismatch {
                edge: edge.name().to_string(),
                stored,
                expected,
            });
        }
    }

    for node in graph.nodes().iter().filter(|n| n.role() == NodeRole::Intermediate) {
        let sum = |edges: &[EdgeId]| -> f64 {
            edges
                .iter()
                .map(|e| network.edge_state(*e).flow())
                .sum()
        };
        let inflow = sum(graph.incoming(node.id()));
        let outflow = sum(graph.outgoing(node.id()));
        if (inflow - outflow).abs() > tolerance {
            violations.push(Violation::NodeImbalance {
                node: node.name().to_string(),
                inflow,
                outflow,
            });
        }
    }

    violations
}

pub fn capacity_violations(network: &NetworkState, tolerance: f64) -> Vec<Violation> {
    let graph = network.graph();
    let mut violations = Vec::new();

    for edge in graph.edges() {
        let state = network.edge_state(edge.id());
        if state.is_disabled() {
            graph
                .paths_through(edge.id())
                .iter()
                .map(|p| (graph.path_by_id(*p), network.path_state(*p).current_flow()))
                .filter(|(_, flow)| *flow > tolerance)
                .for_each(|(path, flow)| {
                    violations.push(Violation::FlowOnDisabledEdge {
                        edge: edge.name().to_string(),
                        path: path.name().to_string(),
                        flow,
                    })
                });
        } else if state.flow() > state.capacity() + tolerance {
            violations.push(Violation::CapacityExceeded {
                edge: edge.name().to_string(),
                flow: state.flow(),
                capacity: state.capacity(),
            });
        }
    }

    for path in graph.paths() {
        let flow = network.path_state(path.id()).current_flow();
        if flow < -tolerance {
            violations.push(Violation::NegativePathFlow {
                path: path.name().to_string(),
                flow,
            });
        }
    }

    violations
}

pub fn validate_flow_conservation(network: &NetworkState, tolerance: f64) -> Result<()> {
    into_result(conservation_violations(network, tolerance))
}

/// Conservation and capacity together.
pub fn check_invariants(network: &NetworkState, tolerance: f64) -> Result<()> {
    let mut violations = conservation_violations(network, tolerance);
    violations.extend(capacity_violations(network, tolerance));
    into_result(violations)
}

fn into_result(violations: Vec<Violation>) -> Result<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(FlowError::InvariantViolation(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::diamond::DiamondScenario;
    use crate::scenario::scenario::Scenario;

    const TOL: f64 = 1e-6;

    #[test]
    fn test_consistent_network_passes() {
        let mut network = DiamondScenario.build().unwrap();
        let p1 = network.resolve_path("P1").unwrap();
        network.apply_path_flow(p1, 3.0);
        assert!(check_invariants(&network, TOL).is_ok());
    }

    #[test]
    fn test_detects_stored_flow_drift() {
        let mut network = DiamondScenario.build().unwrap();
        let s_a = network.resolve_edge("s-a").unwrap();
        network.edge_state_mut(s_a).shift_flow(1.0);

        let violations = conservation_violations(&network, TOL);
        assert!(violations.contains(&Violation::EdgeFlowMismatch {
            edge: "s-a".into(),
            stored: 1.0,
            expected: 0.0,
        }));
        assert!(violations.contains(&Violation::NodeImbalance {
            node: "a".into(),
            inflow: 1.0,
            outflow: 0.0,
        }));
        assert!(matches!(
            validate_flow_conservation(&network, TOL),
            Err(FlowError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_detects_capacity_breaches() {
        let mut network = DiamondScenario.build().unwrap();
        let p1 = network.resolve_path("P1").unwrap();
        let p2 = network.resolve_path("P2").unwrap();
        let a_t = network.resolve_edge("a-t").unwrap();
        network.apply_path_flow(p1, 2.0);
        network.apply_path_flow(p2, 3.5);
        network.edge_state_mut(a_t).set_disabled(true);

        let violations = capacity_violations(&network, TOL);
        assert_eq!(
            vec![
                Violation::FlowOnDisabledEdge {
                    edge: "a-t".into(),
                    path: "P1".into(),
                    flow: 2.0,
                },
                Violation::CapacityExceeded {
                    edge: "b-t".into(),
                    flow: 3.5,
                    capacity: 3.0,
                },
            ],
            violations
        );
        // conservation alone still holds
        assert!(validate_flow_conservation(&network, TOL).is_ok());
    }
}
