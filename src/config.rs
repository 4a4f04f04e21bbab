use crate::error::{FlowError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Utilization cut-offs used to classify paths and edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    #[serde(default = "default_high")]
    pub high: f64,
    #[serde(default = "default_normal")]
    pub normal: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            high: default_high(),
            normal: default_normal(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `flowgraph=debug`.
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub thresholds: StatusThresholds,
    /// Slack allowed when comparing flows against capacities.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            thresholds: StatusThresholds::default(),
            tolerance: default_tolerance(),
            log: LogConfig::default(),
        }
    }
}

fn default_high() -> f64 {
    0.8
}

fn default_normal() -> f64 {
    0.5
}

fn default_tolerance() -> f64 {
    1e-6
}

impl ControllerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ControllerConfig =
            toml::from_str(&content).map_err(|e| FlowError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if !(t.normal > 0.0 && t.normal < t.high) {
            return Err(FlowError::Config(format!(
                "thresholds must satisfy 0 < normal < high (normal={}, high={})",
                t.normal, t.high
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(FlowError::Config(format!(
                "tolerance must be a non-negative number (got {})",
                self.tolerance
            )));
        }
        Ok(())
    }
}
