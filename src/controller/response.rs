use crate::controller::report::{MaxSafeFlow, Outcome};
use crate::error::FlowError;
use serde::Serialize;

/// Uniform envelope for callers outside the crate: a success flag, a
/// message, and either the payload or the feasible alternatives.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControlResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<MaxSafeFlow>,
}

impl<T> ControlResponse<T> {
    pub fn failure(error: &FlowError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            payload: None,
            alternatives: error.alternatives().cloned(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ControlResponse<U> {
        ControlResponse {
            success: self.success,
            message: self.message,
            payload: self.payload.map(f),
            alternatives: self.alternatives,
        }
    }
}

impl<T: Outcome> ControlResponse<T> {
    pub fn success(payload: T) -> Self {
        Self {
            success: true,
            message: payload.message().to_string(),
            payload: Some(payload),
            alternatives: None,
        }
    }
}

impl<T: Outcome> From<Result<T, FlowError>> for ControlResponse<T> {
    fn from(result: Result<T, FlowError>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(e) => Self::failure(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::controller::FlowController;
    use crate::scenario::diamond::DiamondScenario;
    use crate::scenario::scenario::Scenario;

    #[test]
    fn test_failure_carries_alternatives() {
        let mut network = DiamondScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);

        let response = ControlResponse::from(controller.set_path_flow("P2", 9.0));
        assert!(!response.success);
        assert!(response.payload.is_none());
        let alternatives = response.alternatives.unwrap();
        assert_eq!(3.0, alternatives.suggested_flow);
        assert!(response.message.contains("P2"));

        let response = ControlResponse::from(controller.set_path_flow("P2", 2.0));
        assert!(response.success);
        assert!(response.alternatives.is_none());
        assert_eq!("path P2 flow 0.00 → 2.00", response.message);
    }

    #[test]
    fn test_not_found_has_no_alternatives() {
        let mut network = DiamondScenario.build().unwrap();
        let mut controller = FlowController::new(&mut network);
        let response = ControlResponse::from(controller.disable_edge("zz"));
        assert!(!response.success);
        assert!(response.alternatives.is_none());
        assert_eq!("edge zz not found", response.message);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(serde_json::json!({"success": false, "message": "edge zz not found"}), json);
    }
}
