//! Read-only views over the controlled network.

use crate::analysis::alerts::generate_alerts;
use crate::analysis::conservation::{capacity_violations, conservation_violations};
use crate::analysis::max_flow::{max_flow, path_capacity_bound};
use crate::controller::controller::FlowController;
use crate::controller::report::{
    EdgeInfo, EdgeStatusEntry, NetworkSnapshot, PathEdgeDetail, PathInfo, PathUsage,
    PathUtilization, SystemMetrics, ValidationReport,
};
use crate::error::Result;
use crate::graph::edge::EdgeId;
use crate::graph::path::PathId;
use serde::{Deserialize, Serialize};

/// What [`FlowController::find_best_path`] optimises for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BestPathCriterion {
    /// Largest max safe flow.
    Capacity,
    /// Lowest utilization.
    Utilization,
    /// Least current flow.
    Flow,
}

impl FlowController<'_> {
    pub fn get_path_info(&self, path: &str) -> Result<PathInfo> {
        let id = self.network.resolve_path(path)?;
        Ok(self.path_info(id))
    }

    pub fn get_edge_info(&self, edge: &str) -> Result<EdgeInfo> {
        let id = self.network.resolve_edge(edge)?;
        Ok(self.edge_info(id))
    }

    pub fn list_edge_status(&self) -> Vec<EdgeStatusEntry> {
        let graph = self.network.graph();
        graph
            .edges()
            .iter()
            .map(|edge| {
                let state = self.network.edge_state(edge.id());
                let utilization = state.utilization();
                EdgeStatusEntry {
                    edge_id: edge.name().to_string(),
                    from: graph.node_by_id(edge.from()).name().to_string(),
                    to: graph.node_by_id(edge.to()).name().to_string(),
                    capacity: state.capacity(),
                    flow: state.flow(),
                    disabled: state.is_disabled(),
                    utilization,
                    status: self.thresholds.classify_edge(
                        utilization,
                        state.is_disabled(),
                        self.tolerance,
                    ),
                }
            })
            .collect()
    }

    pub fn get_complete_network_state(&self) -> NetworkSnapshot {
        let graph = self.network.graph();
        let paths: Vec<PathInfo> = graph.paths().iter().map(|p| self.path_info(p.id())).collect();
        let edges = self.list_edge_status();

        let flow = max_flow(self.network());
        let total_throughput = self.network.total_throughput();
        let network_efficiency = if flow.value > 0.0 {
            total_throughput / flow.value
        } else {
            0.0
        };
        let failed_edges = edges.iter().filter(|e| e.disabled).count();

        let metrics = SystemMetrics {
            total_throughput,
            theoretical_max_flow: flow.value,
            network_efficiency,
            unused_capacity: (flow.value - total_throughput).max(0.0),
            path_capacity_bound: path_capacity_bound(self.network()),
            min_cut: flow
                .min_cut
                .iter()
                .map(|e| graph.edge_by_id(*e).name().to_string())
                .collect(),
            flow_conservation_violations: conservation_violations(self.network(), self.tolerance)
                .len(),
            operational_edges: edges.len() - failed_edges,
            failed_edges,
            blocked_paths: paths.iter().filter(|p| p.is_blocked).count(),
        };

        NetworkSnapshot {
            source: graph.node_by_id(graph.source()).name().to_string(),
            sink: graph.node_by_id(graph.sink()).name().to_string(),
            edges,
            paths,
            alerts: generate_alerts(self.network(), self.tolerance),
            metrics,
        }
    }

    /// `current_flow / max_safe_flow` for every path, in declaration order.
    pub fn path_utilizations(&self) -> Vec<PathUtilization> {
        self.network
            .graph()
            .paths()
            .iter()
            .map(|p| {
                let bounds = self.max_safe(p.id());
                PathUtilization {
                    path_id: bounds.path_id,
                    utilization: ratio(bounds.current_flow, bounds.max_safe_flow),
                }
            })
            .collect()
    }

    /// Blocked paths are never chosen. Ties go to the earlier path.
    pub fn find_best_path(&self, criterion: BestPathCriterion) -> Option<String> {
        let candidates = self
            .network
            .graph()
            .paths()
            .iter()
            .map(|p| self.max_safe(p.id()))
            .filter(|b| !b.is_blocked);

        let mut best: Option<(f64, String)> = None;
        for bounds in candidates {
            // lower score wins
            let score = match criterion {
                BestPathCriterion::Capacity => -bounds.max_safe_flow,
                BestPathCriterion::Utilization => ratio(bounds.current_flow, bounds.max_safe_flow),
                BestPathCriterion::Flow => bounds.current_flow,
            };
            if best.as_ref().is_none_or(|(s, _)| score < *s) {
                best = Some((score, bounds.path_id));
            }
        }
        best.map(|(_, id)| id)
    }

    pub fn validate_and_report(&self) -> ValidationReport {
        let conservation = conservation_violations(self.network(), self.tolerance);
        let capacity = capacity_violations(self.network(), self.tolerance);
        ValidationReport {
            is_valid: conservation.is_empty() && capacity.is_empty(),
            conservation_violations: conservation,
            capacity_violations: capacity,
            total_throughput: self.network.total_throughput(),
            path_utilizations: self.path_utilizations(),
        }
    }

    fn path_info(&self, id: PathId) -> PathInfo {
        let graph = self.network.graph();
        let path = graph.path_by_id(id);
        let bounds = self.max_safe(id);
        let bottleneck = self.network.bottleneck(id);
        let utilization = ratio(bounds.current_flow, bounds.max_safe_flow);

        let edge_details = path
            .edges()
            .iter()
            .map(|e| {
                let edge = graph.edge_by_id(*e);
                let state = self.network.edge_state(*e);
                PathEdgeDetail {
                    edge_id: edge.name().to_string(),
                    from: graph.node_by_id(edge.from()).name().to_string(),
                    to: graph.node_by_id(edge.to()).name().to_string(),
                    capacity: state.capacity(),
                    flow: state.flow(),
                    utilization: state.utilization(),
                    disabled: state.is_disabled(),
                    is_bottleneck: *e == bottleneck.edge,
                }
            })
            .collect();

        let mut shared_paths: Vec<PathId> = path
            .edges()
            .iter()
            .flat_map(|e| self.network.shared_paths(*e).iter().copied())
            .filter(|p| *p != id)
            .collect();
        shared_paths.sort();
        shared_paths.dedup();

        PathInfo {
            path_id: bounds.path_id,
            edges: path.edges().iter().map(|e| graph.edge_by_id(*e).name().to_string()).collect(),
            route: graph.route(id),
            current_flow: bounds.current_flow,
            max_safe_flow: bounds.max_safe_flow,
            bottleneck_capacity: bounds.bottleneck_capacity,
            bottleneck_edge: bounds.bottleneck_edge,
            available_capacity: bounds.available_capacity,
            utilization,
            status: self.thresholds.classify_path(utilization, bounds.is_blocked, self.tolerance),
            is_blocked: bounds.is_blocked,
            edge_details,
            shared_paths: shared_paths
                .into_iter()
                .map(|p| graph.path_by_id(p).name().to_string())
                .collect(),
        }
    }

    fn edge_info(&self, id: EdgeId) -> EdgeInfo {
        let graph = self.network.graph();
        let edge = graph.edge_by_id(id);
        let state = self.network.edge_state(id);
        let utilization = state.utilization();

        let using_paths = self
            .network
            .shared_paths(id)
            .iter()
            .map(|p| {
                let path = graph.path_by_id(*p);
                PathUsage {
                    path_id: path.name().to_string(),
                    path_flow: self.network.path_state(*p).current_flow(),
                    position: path.position(id).unwrap_or(0),
                    total_edges: path.edges().len(),
                }
            })
            .collect();
        let bottleneck_for: Vec<String> = self
            .network
            .shared_paths(id)
            .iter()
            .filter(|p| self.network.bottleneck(**p).edge == id)
            .map(|p| graph.path_by_id(*p).name().to_string())
            .collect();

        EdgeInfo {
            edge_id: edge.name().to_string(),
            from: graph.node_by_id(edge.from()).name().to_string(),
            to: graph.node_by_id(edge.to()).name().to_string(),
            capacity: state.capacity(),
            flow: state.flow(),
            utilization,
            available_capacity: state.headroom(),
            status: self
                .thresholds
                .classify_edge(utilization, state.is_disabled(), self.tolerance),
            is_disabled: state.is_disabled(),
            is_overloaded: state.flow() > state.capacity() + self.tolerance,
            using_paths,
            is_critical: !bottleneck_for.is_empty(),
            bottleneck_for,
        }
    }
}

fn ratio(flow: f64, limit: f64) -> f64 {
    if limit > 0.0 {
        flow / limit
    } else if flow > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::alerts::AlertKind;
    use crate::analysis::status::{EdgeStatus, PathStatus};
    use crate::scenario::diamond::DiamondScenario;
    use crate::scenario::scenario::Scenario;
    use crate::scenario::shared::SharedEdgeScenario;
    use crate::state::network::NetworkState;
    use approx::assert_relative_eq;

    fn diamond() -> NetworkState {
        DiamondScenario.build().unwrap()
    }

    #[test]
    fn test_path_info_statuses() {
        let mut network = diamond();
        let mut controller = FlowController::new(&mut network);

        assert_eq!(PathStatus::Low, controller.get_path_info("P1").unwrap().status);
        controller.set_path_flow("P1", 3.0).unwrap();
        assert_eq!(PathStatus::Normal, controller.get_path_info("P1").unwrap().status);
        controller.set_path_flow("P1", 4.5).unwrap();
        assert_eq!(PathStatus::High, controller.get_path_info("P1").unwrap().status);
        controller.saturate_path_flow("P1").unwrap();

        let info = controller.get_path_info("P1").unwrap();
        assert_eq!(PathStatus::Saturated, info.status);
        assert_relative_eq!(1.0, info.utilization);
        assert_eq!("s → a → t", info.route);
        assert_eq!(vec!["s-a", "a-t"], info.edges);
        assert!(info.edge_details[0].is_bottleneck);
        assert!(!info.edge_details[1].is_bottleneck);
        assert!(info.shared_paths.is_empty());

        controller.clear_all_flows();
        controller.disable_edge("s-a").unwrap();
        assert_eq!(PathStatus::Blocked, controller.get_path_info("P1").unwrap().status);
    }

    #[test]
    fn test_shared_paths_are_listed_once() {
        let mut network = SharedEdgeScenario.build().unwrap();
        let controller = FlowController::new(&mut network);
        let info = controller.get_path_info("P1").unwrap();
        assert_eq!(vec!["P2", "P3"], info.shared_paths);
    }

    #[test]
    fn test_edge_info_usage_and_bottlenecks() {
        let mut network = SharedEdgeScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);
        controller.set_path_flow("P1", 5.0).unwrap();
        controller.set_path_flow("P2", 4.0).unwrap();

        let info = controller.get_edge_info("s-a").unwrap();
        assert_relative_eq!(9.0, info.flow);
        assert_relative_eq!(3.0, info.available_capacity);
        assert_relative_eq!(0.75, info.utilization);
        assert_eq!(EdgeStatus::Normal, info.status);
        assert_eq!(2, info.using_paths.len());
        assert_eq!(1, info.using_paths[0].position);
        assert_eq!(3, info.using_paths[0].total_edges);
        // P1 left on s-a: 12 - 4 = 8, tied with a-c at 8, first edge wins
        assert_eq!(vec!["P1", "P2"], info.bottleneck_for);
        assert!(info.is_critical);

        let c_t = controller.get_edge_info("c-t").unwrap();
        assert!(c_t.bottleneck_for.is_empty());
        assert!(!c_t.is_critical);
    }

    #[test]
    fn test_complete_state_metrics() {
        let mut network = diamond();
        let mut controller = FlowController::new(&mut network);
        controller.set_path_flow("P1", 3.0).unwrap();
        controller.set_path_flow("P2", 1.0).unwrap();
        controller.disable_edge("b-t").unwrap();

        let snapshot = controller.get_complete_network_state();
        assert_eq!("s", snapshot.source);
        assert_eq!("t", snapshot.sink);
        assert_eq!(4, snapshot.edges.len());
        assert_eq!(2, snapshot.paths.len());

        let m = &snapshot.metrics;
        assert_relative_eq!(3.0, m.total_throughput);
        assert_relative_eq!(5.0, m.theoretical_max_flow);
        assert_relative_eq!(0.6, m.network_efficiency);
        assert_relative_eq!(2.0, m.unused_capacity);
        assert_relative_eq!(5.0, m.path_capacity_bound);
        assert_eq!(vec!["s-a", "b-t"], m.min_cut);
        assert_eq!(0, m.flow_conservation_violations);
        assert_eq!(3, m.operational_edges);
        assert_eq!(1, m.failed_edges);
        assert_eq!(1, m.blocked_paths);

        assert_eq!(1, snapshot.alerts.len());
        assert_eq!(AlertKind::Failure, snapshot.alerts[0].kind);
        assert_eq!(EdgeStatus::Disabled, snapshot.edges[3].status);
    }

    #[test]
    fn test_find_best_path() {
        let mut network = diamond();
        let mut controller = FlowController::new(&mut network);
        assert_eq!(
            Some("P1".to_string()),
            controller.find_best_path(BestPathCriterion::Capacity)
        );

        controller.set_path_flow("P1", 1.0).unwrap();
        assert_eq!(
            Some("P2".to_string()),
            controller.find_best_path(BestPathCriterion::Flow)
        );
        controller.set_path_flow("P2", 2.5).unwrap();
        // P1 at 1/5, P2 at 2.5/3
        assert_eq!(
            Some("P1".to_string()),
            controller.find_best_path(BestPathCriterion::Utilization)
        );

        controller.disable_edge("s-a").unwrap();
        controller.disable_edge("b-t").unwrap();
        assert_eq!(None, controller.find_best_path(BestPathCriterion::Capacity));
    }

    #[test]
    fn test_validation_report() {
        let mut network = diamond();
        let mut controller = FlowController::new(&mut network);
        controller.set_path_flow("P2", 1.5).unwrap();

        let report = controller.validate_and_report();
        assert!(report.is_valid);
        assert_relative_eq!(1.5, report.total_throughput);
        assert_eq!(2, report.path_utilizations.len());
        assert_relative_eq!(0.5, report.path_utilizations[1].utilization);
    }
}
