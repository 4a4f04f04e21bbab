use crate::analysis::conservation::Violation;
use crate::controller::report::MaxSafeFlow;
use crate::graph::node::NodeRole;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Node,
    Edge,
    Path,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Node => "node",
            EntityKind::Edge => "edge",
            EntityKind::Path => "path",
        };
        f.write_str(label)
    }
}

/// Why a requested path flow was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InfeasibleReason {
    ExceedsMaxSafe,
    Negative,
    Blocked,
}

impl fmt::Display for InfeasibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InfeasibleReason::ExceedsMaxSafe => "exceeds max safe flow",
            InfeasibleReason::Negative => "flow must be a non-negative number",
            InfeasibleReason::Blocked => "path is blocked",
        };
        f.write_str(label)
    }
}

/// Malformed network handed over at construction time.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TopologyError {
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("edge {edge} references unknown node {node}")]
    UnknownNode { edge: String, node: String },

    #[error("path {path} references unknown edge {edge}")]
    UnknownEdge { path: String, edge: String },

    #[error("edge {edge} has invalid capacity {capacity}")]
    InvalidCapacity { edge: String, capacity: f64 },

    #[error("network has no source node")]
    MissingSource,

    #[error("network has no sink node")]
    MissingSink,

    #[error("network has more than one {role} node: {first}, {second}")]
    DuplicateRole {
        role: NodeRole,
        first: String,
        second: String,
    },

    #[error("path {0} has no edges")]
    EmptyPath(String),

    #[error("path {path} uses edge {edge} more than once")]
    RepeatedEdge { path: String, edge: String },

    #[error("path {path} is discontiguous between {previous} and {next}")]
    Discontiguous {
        path: String,
        previous: String,
        next: String,
    },

    #[error("path {path} does not start at source {expected}")]
    NotFromSource { path: String, expected: String },

    #[error("path {path} does not end at sink {expected}")]
    NotToSink { path: String, expected: String },
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    #[error(
        "cannot set path {path} to {requested:.2}: {reason} (max safe {:.2}, bottleneck {})",
        .alternatives.max_safe_flow,
        .alternatives.bottleneck_edge
    )]
    Infeasible {
        path: String,
        requested: f64,
        reason: InfeasibleReason,
        alternatives: Box<MaxSafeFlow>,
    },

    #[error("cannot set edge {edge} capacity to {requested:.2}: it carries {current_flow:.2}")]
    EdgeInfeasible {
        edge: String,
        requested: f64,
        current_flow: f64,
    },

    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("invalid topology: {0}")]
    InvalidTopology(#[from] TopologyError),

    #[error("flow invariant violated: {}", format_violations(.0))]
    InvariantViolation(Vec<Violation>),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlowError {
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        FlowError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Alternatives attached to an infeasible path request.
    pub fn alternatives(&self) -> Option<&MaxSafeFlow> {
        match self {
            FlowError::Infeasible { alternatives, .. } => Some(alternatives),
            _ => None,
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, FlowError>;
