//! Scripted controller operations, parsed from short command strings such as
//! `set P1 3` or `disable a-t`.

use crate::controller::controller::FlowController;
use crate::controller::report::Outcome;
use crate::controller::response::ControlResponse;
use crate::error::FlowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Max { path: String },
    Set { path: String, flow: f64 },
    Update { path: String, delta: f64 },
    Saturate { path: String },
    Clear,
    Distribute { total: f64 },
    Disable { edge: String },
    Enable { edge: String },
    Capacity { edge: String, capacity: f64 },
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseOperationError {
    #[error("empty operation")]
    Empty,
    #[error("unknown operation: {0}")]
    Unknown(String),
    #[error("{op}: missing {arg}")]
    MissingArgument { op: String, arg: &'static str },
    #[error("{op}: invalid number {value:?}")]
    InvalidNumber { op: String, value: String },
    #[error("{0}: too many arguments")]
    TooManyArguments(String),
}

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let op = words.next().ok_or(ParseOperationError::Empty)?.to_lowercase();

        let mut id = |arg: &'static str| {
            words
                .next()
                .map(str::to_string)
                .ok_or_else(|| ParseOperationError::MissingArgument { op: op.clone(), arg })
        };
        let parsed = match op.as_str() {
            "max" => Operation::Max { path: id("path")? },
            "set" => Operation::Set {
                path: id("path")?,
                flow: number(&op, id("flow")?)?,
            },
            "update" => Operation::Update {
                path: id("path")?,
                delta: number(&op, id("delta")?)?,
            },
            "saturate" => Operation::Saturate { path: id("path")? },
            "clear" => Operation::Clear,
            "distribute" => Operation::Distribute {
                total: number(&op, id("total")?)?,
            },
            "disable" => Operation::Disable { edge: id("edge")? },
            "enable" => Operation::Enable { edge: id("edge")? },
            "capacity" => Operation::Capacity {
                edge: id("edge")?,
                capacity: number(&op, id("capacity")?)?,
            },
            _ => return Err(ParseOperationError::Unknown(op.clone())),
        };

        if words.next().is_some() {
            return Err(ParseOperationError::TooManyArguments(op));
        }
        Ok(parsed)
    }
}

fn number(op: &str, value: String) -> Result<f64, ParseOperationError> {
    value
        .parse()
        .map_err(|_| ParseOperationError::InvalidNumber {
            op: op.to_string(),
            value,
        })
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Max { path } => write!(f, "max {path}"),
            Operation::Set { path, flow } => write!(f, "set {path} {flow}"),
            Operation::Update { path, delta } => write!(f, "update {path} {delta}"),
            Operation::Saturate { path } => write!(f, "saturate {path}"),
            Operation::Clear => f.write_str("clear"),
            Operation::Distribute { total } => write!(f, "distribute {total}"),
            Operation::Disable { edge } => write!(f, "disable {edge}"),
            Operation::Enable { edge } => write!(f, "enable {edge}"),
            Operation::Capacity { edge, capacity } => write!(f, "capacity {edge} {capacity}"),
        }
    }
}

impl Operation {
    pub fn apply(&self, controller: &mut FlowController<'_>) -> ControlResponse<serde_json::Value> {
        match self {
            Operation::Max { path } => respond(controller.calculate_max_safe_flow(path)),
            Operation::Set { path, flow } => respond(controller.set_path_flow(path, *flow)),
            Operation::Update { path, delta } => {
                respond(controller.update_path_flow(path, *delta))
            }
            Operation::Saturate { path } => respond(controller.saturate_path_flow(path)),
            Operation::Clear => to_json(ControlResponse::success(controller.clear_all_flows())),
            Operation::Distribute { total } => {
                respond(controller.distribute_flow_equally(*total))
            }
            Operation::Disable { edge } => respond(controller.disable_edge(edge)),
            Operation::Enable { edge } => respond(controller.enable_edge(edge)),
            Operation::Capacity { edge, capacity } => {
                respond(controller.set_edge_capacity(edge, *capacity))
            }
        }
    }
}

fn respond<T: Outcome + Serialize>(result: Result<T, FlowError>) -> ControlResponse<serde_json::Value> {
    to_json(ControlResponse::from(result))
}

fn to_json<T: Serialize>(response: ControlResponse<T>) -> ControlResponse<serde_json::Value> {
    let mut failure = None;
    let response = response.map(|payload| {
        serde_json::to_value(payload).unwrap_or_else(|e| {
            failure = Some(e.to_string());
            serde_json::Value::Null
        })
    });
    match failure {
        Some(message) => ControlResponse::failure(&FlowError::Config(message)),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::diamond::DiamondScenario;
    use crate::scenario::scenario::Scenario;

    #[test]
    fn test_parse_operations() {
        assert_eq!(
            Operation::Set {
                path: "P1".into(),
                flow: 3.0
            },
            "set P1 3".parse().unwrap()
        );
        assert_eq!(
            Operation::Update {
                path: "P1".into(),
                delta: -1.0
            },
            "update P1 -1".parse().unwrap()
        );
        assert_eq!(Operation::Clear, "  CLEAR ".parse().unwrap());
        assert_eq!(
            Operation::Capacity {
                edge: "e1".into(),
                capacity: 4.0
            },
            "capacity e1 4".parse().unwrap()
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Err(ParseOperationError::Empty), "".parse::<Operation>());
        assert_eq!(
            Err(ParseOperationError::Unknown("boost".into())),
            "boost P1".parse::<Operation>()
        );
        assert!(matches!(
            "set P1".parse::<Operation>(),
            Err(ParseOperationError::MissingArgument { arg: "flow", .. })
        ));
        assert!(matches!(
            "distribute lots".parse::<Operation>(),
            Err(ParseOperationError::InvalidNumber { .. })
        ));
        assert_eq!(
            Err(ParseOperationError::TooManyArguments("clear".into())),
            "clear now".parse::<Operation>()
        );
    }

    #[test]
    fn test_display_parses_back() {
        let op = Operation::Distribute { total: 7.5 };
        assert_eq!(op, op.to_string().parse().unwrap());
    }

    #[test]
    fn test_serde_tagging() {
        let op: Operation = serde_json::from_str(r#"{"op":"disable","edge":"a-t"}"#).unwrap();
        assert_eq!(Operation::Disable { edge: "a-t".into() }, op);
        assert_eq!(
            serde_json::json!({"op": "clear"}),
            serde_json::to_value(Operation::Clear).unwrap()
        );
    }

    #[test]
    fn test_apply_sequence() {
        let mut network = DiamondScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);

        let ops: Vec<Operation> = ["set P2 3", "saturate P1", "set P1 9", "disable a-t"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let responses: Vec<_> = ops.iter().map(|op| op.apply(&mut controller)).collect();

        assert!(responses[0].success);
        assert_eq!(5.0, responses[1].payload.as_ref().unwrap()["new_flow"]);
        assert!(!responses[2].success);
        assert_eq!(5.0, responses[2].alternatives.as_ref().unwrap().max_safe_flow);
        assert_eq!(
            serde_json::json!(["P1"]),
            responses[3].payload.as_ref().unwrap()["cleared_paths"]
        );
        assert_eq!(3.0, controller.network().total_throughput());
    }
}
