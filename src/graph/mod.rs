pub mod builder;
pub mod edge;
pub mod graph;
pub mod node;
pub mod path;
