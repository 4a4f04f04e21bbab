use crate::analysis::alerts::Alert;
use crate::analysis::conservation::Violation;
use crate::analysis::status::{EdgeStatus, PathStatus};
use serde::Serialize;

/// Payloads that carry a human-readable summary.
pub trait Outcome {
    fn message(&self) -> &str;
}

/// Safe operating range of one path given every other path's current flow.
/// Attached to infeasible requests so callers can retry with a valid value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaxSafeFlow {
    pub path_id: String,
    pub max_safe_flow: f64,
    pub suggested_flow: f64,
    pub bottleneck_capacity: f64,
    pub bottleneck_edge: String,
    pub current_flow: f64,
    pub available_capacity: f64,
    pub is_blocked: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowChange {
    pub path_id: String,
    pub previous_flow: f64,
    pub new_flow: f64,
    /// Bounds after the change was applied.
    pub bounds: MaxSafeFlow,
    pub message: String,
}

impl FlowChange {
    pub fn is_noop(&self) -> bool {
        self.previous_flow == self.new_flow
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowCleared {
    pub paths_cleared: usize,
    pub previous_throughput: f64,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathAssignment {
    pub path_id: String,
    pub flow: f64,
    pub saturated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Distribution {
    pub requested: f64,
    pub achieved: f64,
    pub assignments: Vec<PathAssignment>,
    pub passes: usize,
    pub message: String,
}

impl Distribution {
    pub fn flow_of(&self, path_id: &str) -> Option<f64> {
        self.assignments
            .iter()
            .find(|a| a.path_id == path_id)
            .map(|a| a.flow)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeToggle {
    pub edge_id: String,
    pub disabled: bool,
    /// False when the edge already was in the requested state.
    pub changed: bool,
    pub cleared_paths: Vec<String>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CapacityChange {
    pub edge_id: String,
    pub previous_capacity: f64,
    pub capacity: f64,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathEdgeDetail {
    pub edge_id: String,
    pub from: String,
    pub to: String,
    pub capacity: f64,
    pub flow: f64,
    pub utilization: f64,
    pub disabled: bool,
    pub is_bottleneck: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathInfo {
    pub path_id: String,
    pub edges: Vec<String>,
    pub route: String,
    pub current_flow: f64,
    pub max_safe_flow: f64,
    pub bottleneck_capacity: f64,
    pub bottleneck_edge: String,
    pub available_capacity: f64,
    pub utilization: f64,
    pub status: PathStatus,
    pub is_blocked: bool,
    pub edge_details: Vec<PathEdgeDetail>,
    /// Other paths with at least one edge in common.
    pub shared_paths: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathUsage {
    pub path_id: String,
    pub path_flow: f64,
    /// 1-based position of the edge along the path.
    pub position: usize,
    pub total_edges: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeInfo {
    pub edge_id: String,
    pub from: String,
    pub to: String,
    pub capacity: f64,
    pub flow: f64,
    pub utilization: f64,
    pub available_capacity: f64,
    pub status: EdgeStatus,
    pub is_disabled: bool,
    pub is_overloaded: bool,
    pub using_paths: Vec<PathUsage>,
    pub bottleneck_for: Vec<String>,
    pub is_critical: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeStatusEntry {
    pub edge_id: String,
    pub from: String,
    pub to: String,
    pub capacity: f64,
    pub flow: f64,
    pub disabled: bool,
    pub utilization: f64,
    pub status: EdgeStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SystemMetrics {
    pub total_throughput: f64,
    pub theoretical_max_flow: f64,
    /// throughput / theoretical max, 0 when the max is 0.
    pub network_efficiency: f64,
    pub unused_capacity: f64,
    pub path_capacity_bound: f64,
    pub min_cut: Vec<String>,
    pub flow_conservation_violations: usize,
    pub operational_edges: usize,
    pub failed_edges: usize,
    pub blocked_paths: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkSnapshot {
    pub source: String,
    pub sink: String,
    pub edges: Vec<EdgeStatusEntry>,
    pub paths: Vec<PathInfo>,
    pub alerts: Vec<Alert>,
    pub metrics: SystemMetrics,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathUtilization {
    pub path_id: String,
    pub utilization: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationReport {
    pub conservation_violations: Vec<Violation>,
    pub capacity_violations: Vec<Violation>,
    pub total_throughput: f64,
    pub path_utilizations: Vec<PathUtilization>,
    pub is_valid: bool,
}

impl Outcome for MaxSafeFlow {
    fn message(&self) -> &str {
        &self.message
    }
}

impl Outcome for FlowChange {
    fn message(&self) -> &str {
        &self.message
    }
}

impl Outcome for FlowCleared {
    fn message(&self) -> &str {
        &self.message
    }
}

impl Outcome for Distribution {
    fn message(&self) -> &str {
        &self.message
    }
}

impl Outcome for EdgeToggle {
    fn message(&self) -> &str {
        &self.message
    }
}

impl Outcome for CapacityChange {
    fn message(&self) -> &str {
        &self.message
    }
}
