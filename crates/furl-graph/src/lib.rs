#![forbid(unsafe_code)]

//! Compound multigraph container used by `furl`.
//!
//! Nodes and edges are addressed by string ids and kept in insertion order, so every query that
//! returns a list is deterministic. Parallel edges are distinguished by id rather than by a
//! `(v, w, name)` key: callers derive ids from edge content when they need identity to survive a
//! remove/re-add cycle.

mod graph;

pub use graph::{Graph, GraphOptions, alg};
