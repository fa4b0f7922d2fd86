//! Duplicate-edge consolidation.
//!
//! Layout solvers only care whether two nodes are connected, so parallel and antiparallel edges
//! are reduced to one per unordered node pair before a solver run and put back afterwards.
//! Clusters use the same machinery keyed additionally by label.

use crate::model::{ElementGraph, StoredEdge};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsolidationKey {
    /// One edge per unordered node pair.
    #[default]
    Pair,
    /// One edge per unordered node pair and label.
    PairAndLabel,
}

/// Edges kept in the graph and, per kept edge, the duplicates that were taken out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consolidation {
    pub kept: Vec<String>,
    pub removed: IndexMap<String, Vec<StoredEdge>>,
}

impl Consolidation {
    pub fn removed_ids(&self) -> Vec<String> {
        self.removed
            .values()
            .flat_map(|edges| edges.iter().map(|e| e.id.clone()))
            .collect()
    }

    pub fn is_noop(&self) -> bool {
        self.removed.values().all(|v| v.is_empty())
    }
}

/// Keeps the first edge of every unordered endpoint pair in `edges` and removes the rest.
pub fn consolidate(g: &mut ElementGraph, edges: &[String]) -> Consolidation {
    consolidate_by(g, edges, ConsolidationKey::Pair)
}

pub fn consolidate_by(g: &mut ElementGraph, edges: &[String], key: ConsolidationKey) -> Consolidation {
    let mut first: BTreeMap<(String, String, Option<String>), String> = BTreeMap::new();
    let mut out = Consolidation::default();

    for id in edges {
        let Some((s, t)) = g.edge_ends(id) else {
            continue;
        };
        let (lo, hi) = if s <= t { (s, t) } else { (t, s) };
        let label = match key {
            ConsolidationKey::Pair => None,
            ConsolidationKey::PairAndLabel => g.edge(id).map(|e| e.label.clone()),
        };
        let pair = (lo.to_string(), hi.to_string(), label);
        match first.get(&pair) {
            None => {
                first.insert(pair, id.clone());
                out.kept.push(id.clone());
            }
            Some(kept) => {
                let kept = kept.clone();
                if let Some((source, target, data)) = g.remove_edge(id) {
                    out.removed.entry(kept).or_default().push(StoredEdge {
                        id: id.clone(),
                        source,
                        target,
                        data,
                    });
                }
            }
        }
    }
    out
}

/// Puts removed edges back. Edges whose endpoints are gone or whose id is taken are returned.
pub fn restore(g: &mut ElementGraph, consolidation: Consolidation) -> Vec<StoredEdge> {
    let mut skipped = Vec::new();
    for edge in consolidation.removed.into_values().flatten() {
        if g.has_edge(&edge.id) || !g.has_node(&edge.source) || !g.has_node(&edge.target) {
            tracing::warn!(edge = %edge.id, "consolidated edge can no longer be restored");
            skipped.push(edge);
            continue;
        }
        g.set_edge(edge.id, edge.source, edge.target, edge.data);
    }
    skipped
}
