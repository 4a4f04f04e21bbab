pub mod analysis;
pub mod config;
pub mod controller;
pub mod error;
pub mod graph;
pub mod ops;
pub mod scenario;
pub mod state;
pub mod tui;
