#![forbid(unsafe_code)]

//! Headless reference layout algorithms.
//!
//! `furl` drives these through its built-in solver so collapse/expand can be exercised without an
//! external layout engine. Both algorithms keep the input bounding-box center fixed, which lets a
//! caller lay out one sibling group at a time without the group drifting away from its parent.

pub mod algo;
pub mod error;
pub mod graph;

pub use algo::{Algorithm, GridOptions, LayeredOptions, RankDir};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, LayoutResult, Node, Point};

/// Headless layout entry point.
pub fn layout(graph: &Graph, algorithm: &Algorithm) -> Result<LayoutResult> {
    graph.validate()?;
    match algorithm {
        Algorithm::Grid(opts) => Ok(algo::grid::layout(graph, opts)),
        Algorithm::Layered(opts) => Ok(algo::layered::layout(graph, opts)),
        Algorithm::Preset => Ok(LayoutResult {
            positions: graph
                .nodes
                .iter()
                .map(|n| (n.id.clone(), Point { x: n.x, y: n.y }))
                .collect(),
        }),
    }
}
