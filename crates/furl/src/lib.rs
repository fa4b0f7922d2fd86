#![forbid(unsafe_code)]

//! Collapse/expand engine for compound diagrams (headless).
//!
//! Containers fold into a single node and unfold back exactly; parallel edges fold into one
//! aggregate edge; after either, the layout is reconciled level by level so nested containers
//! never overlap their siblings. Layout itself is delegated to a [`LayoutSolver`].
//!
//! Design goals:
//! - exact, id-preserving collapse/expand round trips
//! - deterministic composite edge ids (`"{source}_{label}_{target}"`)
//! - runtime-agnostic async APIs (no specific executor required)

pub mod cluster;
pub mod collapse;
pub mod config;
pub mod consolidate;
pub mod cues;
pub mod edges;
mod engine;
pub mod error;
pub mod geom;
pub mod history;
pub mod levels;
pub mod model;
pub mod reconcile;
pub mod separation;
pub mod shadow;
pub mod snapshot;
pub mod solver;
mod state;

pub use cluster::ClusterResult;
pub use collapse::{CollapseResult, ExpandResult};
pub use config::{EngineOptions, NamedOptions, OperationOptions};
pub use cues::{CueState, RecordedCues, VisualCueProvider};
pub use edges::EdgeCollapseResult;
pub use engine::Engine;
pub use error::{Error, Result};
pub use geom::{Point, Rect, Size};
pub use history::{HistoryRecorder, MemoryHistory, OperationKind, OperationRecord};
pub use model::{
    EdgeData, EdgeKind, ElementGraph, NodeData, NodeKind, NodeRole, StoredEdge, StoredNode,
    StoredSubgraph,
};
pub use shadow::{HeadlessSurface, RenderSurface, ShadowGraph};
pub use snapshot::{GraphSnapshot, JsonBuffer, PersistenceAdapter};
pub use solver::{BuiltinSolver, LayoutGraph, LayoutSolver};
pub use state::EngineState;

pub use furl_layout::RankDir;
