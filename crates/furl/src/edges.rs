//! Aggregate edges.
//!
//! Two or more edges joining the same unordered node pair can be folded into one aggregate edge
//! that keeps the originals, in order, until it is expanded again.

use crate::model::{
    AggregateInfo, EdgeData, ElementGraph, EdgeKind, StoredEdge, canonical_edge_id, is_visible,
    unique_edge_id,
};
use indexmap::IndexMap;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeCollapseResult {
    /// Aggregates created (collapse) or originals restored (expand).
    pub edges: Vec<String>,
    /// Edges that left the graph.
    pub old_edges: Vec<String>,
}

impl EdgeCollapseResult {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.old_edges.is_empty()
    }

    fn merge(&mut self, other: EdgeCollapseResult) {
        self.edges.extend(other.edges);
        self.old_edges.extend(other.old_edges);
    }
}

fn is_aggregate(g: &ElementGraph, id: &str) -> bool {
    g.edge(id).is_some_and(|e| e.kind() == EdgeKind::Aggregate)
}

/// Folds `ids` into one aggregate edge.
///
/// Nothing happens unless at least two of the edges exist and all of them join the same unordered
/// pair. When `allow_nested` is false, aggregates among `ids` are expanded first and their
/// originals take part instead.
pub(crate) fn collapse_edges(g: &mut ElementGraph, ids: &[String], allow_nested: bool) -> EdgeCollapseResult {
    let mut seen = BTreeSet::new();
    let ids: Vec<String> = ids
        .iter()
        .filter(|id| g.has_edge(id) && seen.insert(id.as_str()))
        .cloned()
        .collect();
    if ids.len() < 2 || !same_pair(g, &ids) {
        return EdgeCollapseResult::default();
    }

    let ids: Vec<String> = if allow_nested {
        ids
    } else {
        let mut flat = Vec::new();
        for id in ids {
            if is_aggregate(g, &id) {
                flat.extend(expand_aggregate(g, &id).unwrap_or_default());
            } else {
                flat.push(id);
            }
        }
        flat
    };
    if ids.len() < 2 {
        return EdgeCollapseResult::default();
    }

    let Some((source, target)) = g
        .edge_ends(&ids[0])
        .map(|(s, t)| (s.to_string(), t.to_string()))
    else {
        return EdgeCollapseResult::default();
    };
    let mut labels: Vec<String> = Vec::new();
    for id in &ids {
        if let Some(e) = g.edge(id) {
            if !labels.contains(&e.label) {
                labels.push(e.label.clone());
            }
        }
    }
    let label = labels.join("|");
    // Picked while the originals are still live so the aggregate never reuses one of their ids.
    let id = unique_edge_id(g, canonical_edge_id(&source, &label, &target));

    let mut originals: Vec<StoredEdge> = Vec::new();
    for original in &ids {
        if let Some((s, t, data)) = g.remove_edge(original) {
            originals.push(StoredEdge {
                id: original.clone(),
                source: s,
                target: t,
                data,
            });
        }
    }
    let bidirectional = originals.iter().any(|e| {
        e.source != source || e.data.aggregate.as_ref().is_some_and(|agg| agg.bidirectional)
    });

    tracing::debug!(edge = %id, originals = originals.len(), bidirectional, "collapsed edges");
    g.set_edge(
        id.clone(),
        source,
        target,
        EdgeData {
            label,
            aggregate: Some(AggregateInfo {
                originals,
                bidirectional,
            }),
            ..EdgeData::default()
        },
    );
    EdgeCollapseResult {
        edges: vec![id],
        old_edges: ids,
    }
}

fn same_pair(g: &ElementGraph, ids: &[String]) -> bool {
    let mut ends = ids.iter().filter_map(|id| g.edge_ends(id));
    let Some((s, t)) = ends.next() else {
        return false;
    };
    ends.all(|(a, b)| (a == s && b == t) || (a == t && b == s))
}

/// Replaces aggregate `id` by its originals; returns the ids restored.
pub(crate) fn expand_aggregate(g: &mut ElementGraph, id: &str) -> Option<Vec<String>> {
    if !is_aggregate(g, id) {
        return None;
    }
    let (_, _, data) = g.remove_edge(id)?;
    let agg = data.aggregate?;
    let mut restored = Vec::new();
    for edge in agg.originals {
        if g.has_edge(&edge.id) || !g.has_node(&edge.source) || !g.has_node(&edge.target) {
            tracing::warn!(aggregate = %id, edge = %edge.id, "cannot restore folded edge");
            continue;
        }
        restored.push(edge.id.clone());
        g.set_edge(edge.id, edge.source, edge.target, edge.data);
    }
    tracing::debug!(edge = %id, restored = restored.len(), "expanded aggregate edge");
    Some(restored)
}

pub(crate) fn expand_edges(g: &mut ElementGraph, ids: &[String]) -> EdgeCollapseResult {
    let mut out = EdgeCollapseResult::default();
    for id in ids {
        if let Some(restored) = expand_aggregate(g, id) {
            out.edges.extend(restored);
            out.old_edges.push(id.clone());
        }
    }
    out
}

/// Unordered pairs over `nodes`, including each node with itself.
fn node_pairs(g: &ElementGraph, nodes: &[String]) -> Vec<(String, String)> {
    let mut seen = BTreeSet::new();
    let nodes: Vec<&String> = nodes
        .iter()
        .filter(|n| g.has_node(n) && seen.insert(n.as_str()))
        .collect();
    let mut pairs = Vec::new();
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i..] {
            pairs.push(((*a).clone(), (*b).clone()));
        }
    }
    pairs
}

pub(crate) fn collapse_edges_between_nodes(
    g: &mut ElementGraph,
    nodes: &[String],
    allow_nested: bool,
) -> EdgeCollapseResult {
    let mut out = EdgeCollapseResult::default();
    for (a, b) in node_pairs(g, nodes) {
        let between = g.edges_between(&a, &b);
        if between.len() >= 2 {
            out.merge(collapse_edges(g, &between, allow_nested));
        }
    }
    out
}

pub(crate) fn expand_edges_between_nodes(g: &mut ElementGraph, nodes: &[String]) -> EdgeCollapseResult {
    let mut out = EdgeCollapseResult::default();
    for (a, b) in node_pairs(g, nodes) {
        let aggregates: Vec<String> = g
            .edges_between(&a, &b)
            .into_iter()
            .filter(|id| is_aggregate(g, id))
            .collect();
        out.merge(expand_edges(g, &aggregates));
    }
    out
}

fn visible_nodes(g: &ElementGraph) -> Vec<String> {
    g.nodes()
        .filter(|n| is_visible(g, n))
        .map(str::to_string)
        .collect()
}

pub(crate) fn collapse_all_edges(g: &mut ElementGraph, allow_nested: bool) -> EdgeCollapseResult {
    let nodes = visible_nodes(g);
    collapse_edges_between_nodes(g, &nodes, allow_nested)
}

pub(crate) fn expand_all_edges(g: &mut ElementGraph) -> EdgeCollapseResult {
    let aggregates: Vec<String> = g
        .edge_ids()
        .into_iter()
        .filter(|id| is_aggregate(g, id))
        .collect();
    expand_edges(g, &aggregates)
}

/// Folds the edges of `node` that share both the other endpoint and the label.
pub(crate) fn group_edges_of_same_type(
    g: &mut ElementGraph,
    node: &str,
    allow_nested: bool,
) -> EdgeCollapseResult {
    let mut groups: IndexMap<(String, String), Vec<String>> = IndexMap::new();
    for id in g.node_edges(node) {
        let (Some((s, t)), Some(data)) = (g.edge_ends(&id), g.edge(&id)) else {
            continue;
        };
        let other = if s == node { t } else { s };
        groups
            .entry((other.to_string(), data.label.clone()))
            .or_default()
            .push(id.clone());
    }

    let mut out = EdgeCollapseResult::default();
    for ids in groups.into_values().filter(|ids| ids.len() >= 2) {
        out.merge(collapse_edges(g, &ids, allow_nested));
    }
    out
}
