//! Base-station adjacency and isolated-system analysis

pub mod graph;

pub use graph::{build_adjacency, TopologyAnalyzer};
