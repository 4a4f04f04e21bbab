pub mod edge_state;
pub mod network;
pub mod path_state;
