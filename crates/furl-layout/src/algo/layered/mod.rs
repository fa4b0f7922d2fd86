//! A small rank-based layout pipeline.
//!
//! Stages mirror dagre's: break cycles, assign ranks by longest path, reduce crossings with
//! barycenter sweeps, then assign coordinates. Compound structure is not handled here: callers
//! lay out one sibling group at a time with containers already replaced by fixed-size boxes.

mod acyclic;
mod coordinate_system;
mod order;
mod position;
mod rank;

use crate::algo::LayeredOptions;
use crate::graph::{Graph, LayoutResult, Point, relocate};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Index-based working copy of the input graph.
#[derive(Debug, Clone)]
pub(crate) struct LayerGraph {
    pub(crate) ids: Vec<String>,
    pub(crate) width: Vec<f64>,
    pub(crate) height: Vec<f64>,
    /// Directed `(source, target)` pairs; self-loops are dropped on construction.
    pub(crate) edges: Vec<(usize, usize)>,
}

impl LayerGraph {
    fn from_graph(graph: &Graph) -> Self {
        let index: FxHashMap<&str, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();
        let edges = graph
            .edges
            .iter()
            .filter_map(|e| {
                let v = *index.get(e.source.as_str())?;
                let w = *index.get(e.target.as_str())?;
                (v != w).then_some((v, w))
            })
            .collect();
        Self {
            ids: graph.nodes.iter().map(|n| n.id.clone()).collect(),
            width: graph.nodes.iter().map(|n| n.width).collect(),
            height: graph.nodes.iter().map(|n| n.height).collect(),
            edges,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn out_neighbors(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.len()];
        for &(v, w) in &self.edges {
            out[v].push(w);
        }
        out
    }

    pub(crate) fn in_neighbors(&self) -> Vec<Vec<usize>> {
        let mut inn = vec![Vec::new(); self.len()];
        for &(v, w) in &self.edges {
            inn[w].push(v);
        }
        inn
    }
}

pub fn layout(graph: &Graph, opts: &LayeredOptions) -> LayoutResult {
    if graph.nodes.is_empty() {
        return LayoutResult::default();
    }

    let mut lg = LayerGraph::from_graph(graph);
    coordinate_system::adjust(&mut lg, opts.rankdir);
    acyclic::run(&mut lg);
    let ranks = rank::longest_path(&lg);
    let layers = order::order(&lg, &ranks);
    let mut coords = position::position(&lg, &layers, opts.nodesep.max(0.0), opts.ranksep.max(0.0));
    coordinate_system::undo(&mut coords, opts.rankdir);

    let mut positions: BTreeMap<String, Point> = BTreeMap::new();
    for (ix, id) in lg.ids.iter().enumerate() {
        let (x, y) = coords[ix];
        positions.insert(id.clone(), Point { x, y });
    }
    relocate(graph, &mut positions);
    LayoutResult { positions }
}
