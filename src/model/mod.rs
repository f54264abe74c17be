//! The in-memory strategy model: blocks, connections, positions.

pub mod graph;
pub mod types;

pub use graph::GraphIndex;
pub use types::*;
