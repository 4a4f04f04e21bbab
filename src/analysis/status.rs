use crate::config::StatusThresholds;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathStatus {
    Low,
    Normal,
    High,
    Saturated,
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeStatus {
    Low,
    Normal,
    High,
    Overload,
    Disabled,
}

impl fmt::Display for PathStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PathStatus::Low => "LOW",
            PathStatus::Normal => "NORMAL",
            PathStatus::High => "HIGH",
            PathStatus::Saturated => "SATURATED",
            PathStatus::Blocked => "BLOCKED",
        };
        f.write_str(label)
    }
}

impl fmt::Display for EdgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EdgeStatus::Low => "LOW",
            EdgeStatus::Normal => "NORMAL",
            EdgeStatus::High => "HIGH",
            EdgeStatus::Overload => "OVERLOAD",
            EdgeStatus::Disabled => "DISABLED",
        };
        f.write_str(label)
    }
}

impl StatusThresholds {
    /// `utilization` is `current_flow / max_safe_flow`.
    pub fn classify_path(&self, utilization: f64, is_blocked: bool, tolerance: f64) -> PathStatus {
        match utilization {
            _ if is_blocked => PathStatus::Blocked,
            u if u >= 1.0 - tolerance => PathStatus::Saturated,
            u if u >= self.high => PathStatus::High,
            u if u >= self.normal => PathStatus::Normal,
            _ => PathStatus::Low,
        }
    }

    pub fn classify_edge(&self, utilization: f64, is_disabled: bool, tolerance: f64) -> EdgeStatus {
        match utilization {
            _ if is_disabled => EdgeStatus::Disabled,
            u if u > 1.0 + tolerance => EdgeStatus::Overload,
            u if u >= self.high => EdgeStatus::High,
            u if u >= self.normal => EdgeStatus::Normal,
            _ => EdgeStatus::Low,
        }
    }
}
