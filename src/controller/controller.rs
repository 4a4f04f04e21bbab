use crate::analysis::conservation::check_invariants;
use crate::config::{ControllerConfig, StatusThresholds};
use crate::controller::report::{CapacityChange, EdgeToggle, FlowChange, FlowCleared, MaxSafeFlow};
use crate::error::{FlowError, InfeasibleReason, Result};
use crate::graph::path::PathId;
use crate::state::network::NetworkState;
use tracing::{info, warn};

/// Applies validated flow changes to a [`NetworkState`].
///
/// Every mutation checks feasibility before touching state, so a rejected
/// request leaves the network exactly as it was. Debug builds re-check all
/// flow invariants after each mutation.
pub struct FlowController<'a> {
    pub(crate) network: &'a mut NetworkState,
    pub(crate) thresholds: StatusThresholds,
    pub(crate) tolerance: f64,
}

impl<'a> FlowController<'a> {
    pub fn new(network: &'a mut NetworkState) -> Self {
        Self::with_config(network, &ControllerConfig::default())
    }

    pub fn with_config(network: &'a mut NetworkState, config: &ControllerConfig) -> Self {
        Self {
            network,
            thresholds: config.thresholds,
            tolerance: config.tolerance,
        }
    }

    pub fn network(&self) -> &NetworkState {
        &*self.network
    }

    pub fn calculate_max_safe_flow(&self, path: &str) -> Result<MaxSafeFlow> {
        let id = self.network.resolve_path(path)?;
        Ok(self.max_safe(id))
    }

    pub(crate) fn max_safe(&self, id: PathId) -> MaxSafeFlow {
        let graph = self.network.graph();
        let bottleneck = self.network.bottleneck(id);
        let current_flow = self.network.path_state(id).current_flow();
        let is_blocked = bottleneck.capacity <= self.tolerance;
        let max_safe_flow = if is_blocked {
            0.0
        } else {
            bottleneck.capacity
        };
        let available_capacity = (max_safe_flow - current_flow).max(0.0);
        let path_id = graph.path_by_id(id).name().to_string();
        let bottleneck_edge = graph.edge_by_id(bottleneck.edge).name().to_string();

        let message = if is_blocked {
            format!("path {path_id} is blocked at {bottleneck_edge}")
        } else {
            format!(
                "path {path_id} can carry up to {max_safe_flow:.2} ({available_capacity:.2} more), limited by {bottleneck_edge}"
            )
        };

        MaxSafeFlow {
            path_id,
            max_safe_flow,
            suggested_flow: max_safe_flow.max(0.0),
            bottleneck_capacity: bottleneck.capacity,
            bottleneck_edge,
            current_flow,
            available_capacity,
            is_blocked,
            message,
        }
    }

    pub fn set_path_flow(&mut self, path: &str, new_flow: f64) -> Result<FlowChange> {
        let id = self.network.resolve_path(path)?;
        self.set_flow(id, new_flow)
    }

    pub fn update_path_flow(&mut self, path: &str, delta: f64) -> Result<FlowChange> {
        let id = self.network.resolve_path(path)?;
        let current = self.network.path_state(id).current_flow();
        self.set_flow(id, current + delta)
    }

    pub fn saturate_path_flow(&mut self, path: &str) -> Result<FlowChange> {
        let id = self.network.resolve_path(path)?;
        let bounds = self.max_safe(id);
        if bounds.is_blocked {
            warn!(path, edge = %bounds.bottleneck_edge, "cannot saturate blocked path");
            return Err(FlowError::Infeasible {
                path: path.to_string(),
                requested: bounds.max_safe_flow,
                reason: InfeasibleReason::Blocked,
                alternatives: Box::new(bounds),
            });
        }
        if (bounds.max_safe_flow - bounds.current_flow).abs() <= self.tolerance {
            let current = bounds.current_flow;
            return Ok(FlowChange {
                path_id: path.to_string(),
                previous_flow: current,
                new_flow: current,
                message: format!("path {path} already saturated at {current:.2}"),
                bounds,
            });
        }
        self.set_flow(id, bounds.max_safe_flow)
    }

    /// The single primitive that changes a path's flow.
    pub(crate) fn set_flow(&mut self, id: PathId, new_flow: f64) -> Result<FlowChange> {
        let bounds = self.max_safe(id);
        let reason = if !new_flow.is_finite() || new_flow < -self.tolerance {
            Some(InfeasibleReason::Negative)
        } else if new_flow > bounds.max_safe_flow + self.tolerance {
            Some(if bounds.is_blocked {
                InfeasibleReason::Blocked
            } else {
                InfeasibleReason::ExceedsMaxSafe
            })
        } else {
            None
        };
        if let Some(reason) = reason {
            warn!(
                path = %bounds.path_id,
                requested = new_flow,
                max_safe = bounds.max_safe_flow,
                %reason,
                "rejected flow change"
            );
            return Err(FlowError::Infeasible {
                path: bounds.path_id.clone(),
                requested: new_flow,
                reason,
                alternatives: Box::new(bounds),
            });
        }

        // snap values inside the tolerance band onto the boundary
        let new_flow = new_flow.clamp(0.0, bounds.max_safe_flow.max(bounds.current_flow));
        let previous_flow = bounds.current_flow;
        self.network.apply_path_flow(id, new_flow);
        self.debug_check();

        let path_id = bounds.path_id;
        info!(path = %path_id, from = previous_flow, to = new_flow, "path flow set");
        Ok(FlowChange {
            message: format!("path {path_id} flow {previous_flow:.2} → {new_flow:.2}"),
            bounds: self.max_safe(id),
            path_id,
            previous_flow,
            new_flow,
        })
    }

    pub fn clear_all_flows(&mut self) -> FlowCleared {
        let previous_throughput = self.network.total_throughput();
        let paths_cleared = self
            .network
            .path_states()
            .iter()
            .filter(|p| p.current_flow() != 0.0)
            .count();
        self.network.clear_flows();
        self.debug_check();

        info!(paths_cleared, previous_throughput, "all flows cleared");
        FlowCleared {
            paths_cleared,
            previous_throughput,
            message: format!("cleared {paths_cleared} paths ({previous_throughput:.2} total)"),
        }
    }

    /// Zeroes every path through the edge, then marks it disabled.
    pub fn disable_edge(&mut self, edge: &str) -> Result<EdgeToggle> {
        let id = self.network.resolve_edge(edge)?;
        if self.network.edge_state(id).is_disabled() {
            return Ok(EdgeToggle {
                edge_id: edge.to_string(),
                disabled: true,
                changed: false,
                cleared_paths: Vec::new(),
                message: format!("edge {edge} already disabled"),
            });
        }

        let carrying: Vec<PathId> = self
            .network
            .shared_paths(id)
            .iter()
            .copied()
            .filter(|p| self.network.path_state(*p).current_flow() != 0.0)
            .collect();
        let mut cleared_paths = Vec::with_capacity(carrying.len());
        for p in carrying {
            cleared_paths.push(self.set_flow(p, 0.0)?.path_id);
        }
        self.network.edge_state_mut(id).set_disabled(true);
        self.debug_check();

        info!(edge, cleared = cleared_paths.len(), "edge disabled");
        let message = if cleared_paths.is_empty() {
            format!("edge {edge} disabled")
        } else {
            format!(
                "edge {edge} disabled, cleared {}",
                cleared_paths.join(", ")
            )
        };
        Ok(EdgeToggle {
            edge_id: edge.to_string(),
            disabled: true,
            changed: true,
            cleared_paths,
            message,
        })
    }

    /// Restores capacity only; paths stay at zero until set again.
    pub fn enable_edge(&mut self, edge: &str) -> Result<EdgeToggle> {
        let id = self.network.resolve_edge(edge)?;
        let changed = self.network.edge_state(id).is_disabled();
        if changed {
            self.network.edge_state_mut(id).set_disabled(false);
            self.debug_check();
            info!(edge, "edge enabled");
        }
        Ok(EdgeToggle {
            edge_id: edge.to_string(),
            disabled: false,
            changed,
            cleared_paths: Vec::new(),
            message: if changed {
                format!("edge {edge} enabled")
            } else {
                format!("edge {edge} already enabled")
            },
        })
    }

    pub fn set_edge_capacity(&mut self, edge: &str, capacity: f64) -> Result<CapacityChange> {
        let id = self.network.resolve_edge(edge)?;
        if !capacity.is_finite() || capacity < 0.0 {
            warn!(edge, capacity, "rejected capacity change");
            return Err(FlowError::InvalidAmount(capacity));
        }
        let current_flow = self.network.edge_state(id).flow();
        if capacity + self.tolerance < current_flow {
            warn!(edge, capacity, current_flow, "capacity below carried flow");
            return Err(FlowError::EdgeInfeasible {
                edge: edge.to_string(),
                requested: capacity,
                current_flow,
            });
        }

        let previous_capacity = self.network.edge_state(id).capacity();
        self.network.edge_state_mut(id).set_capacity(capacity);
        self.debug_check();

        info!(edge, from = previous_capacity, to = capacity, "edge capacity set");
        Ok(CapacityChange {
            edge_id: edge.to_string(),
            previous_capacity,
            capacity,
            message: format!("edge {edge} capacity {previous_capacity:.2} → {capacity:.2}"),
        })
    }

    pub(crate) fn debug_check(&self) {
        if cfg!(debug_assertions) {
            if let Err(e) = check_invariants(&*self.network, self.tolerance) {
                panic!("{e}");
            }
        }
    }
}
