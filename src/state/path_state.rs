#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathState {
    /// current_flow >= 0.0
    current_flow: f64,
}

impl PathState {
    pub fn current_flow(&self) -> f64 {
        self.current_flow
    }

    pub(crate) fn set_flow(&mut self, flow: f64) {
        self.current_flow = flow;
    }
}
