/// Mutable side of an edge. `flow` is kept equal to the sum of the flows of
/// every path routed through the edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeState {
    /// capacity >= 0.0
    capacity: f64,
    flow: f64,
    disabled: bool,
}

impl EdgeState {
    pub(crate) fn new(capacity: f64) -> Self {
        Self {
            capacity,
            flow: 0.0,
            disabled: false,
        }
    }

    /// Declared capacity, independent of the disabled flag.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Capacity as seen by every computation: 0 while disabled.
    pub fn effective_capacity(&self) -> f64 {
        if self.disabled { 0.0 } else { self.capacity }
    }

    pub fn flow(&self) -> f64 {
        self.flow
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn utilization(&self) -> f64 {
        let capacity = self.effective_capacity();
        if capacity > 0.0 {
            self.flow / capacity
        } else if self.flow > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }

    pub fn headroom(&self) -> f64 {
        (self.effective_capacity() - self.flow).max(0.0)
    }

    pub(crate) fn shift_flow(&mut self, delta: f64) {
        self.flow += delta;
    }

    pub(crate) fn reset_flow(&mut self) {
        self.flow = 0.0;
    }

    pub(crate) fn set_capacity(&mut self, capacity: f64) {
        self.capacity = capacity;
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_utilization() {
        let mut state = EdgeState::new(4.0);
        state.shift_flow(3.0);
        assert_relative_eq!(0.75, state.utilization());
        assert_relative_eq!(1.0, state.headroom());
    }

    #[test]
    fn test_zero_capacity_utilization() {
        let mut state = EdgeState::new(0.0);
        assert_relative_eq!(0.0, state.utilization());
        state.shift_flow(1.0);
        assert!(state.utilization().is_infinite());
    }

    #[test]
    fn test_disabled_edge_has_no_capacity() {
        let mut state = EdgeState::new(4.0);
        state.set_disabled(true);
        assert_relative_eq!(0.0, state.effective_capacity());
        assert_relative_eq!(4.0, state.capacity());
        assert_relative_eq!(0.0, state.headroom());
    }
}
