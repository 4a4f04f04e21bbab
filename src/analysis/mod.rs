pub mod alerts;
pub mod conservation;
pub mod max_flow;
pub mod status;
