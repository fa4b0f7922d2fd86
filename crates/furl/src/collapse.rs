//! Node collapse and expansion.
//!
//! Collapsing a container moves its descendants and every edge touching them into a
//! [`StoredSubgraph`] on the container. Edges that crossed the container boundary are rerouted
//! onto the container under a content-addressed id, so two originals that reduce to the same
//! endpoints and label share one replacement. Expansion undoes exactly that, including
//! replacements that have since been folded into aggregates or swallowed by another collapse.

use crate::edges;
use crate::error::Result;
use crate::geom::{self, Point};
use crate::levels;
use crate::model::{
    EdgeData, ElementGraph, NodeKind, RemappedEdge, StoredEdge, StoredNode, StoredSubgraph,
    canonical_edge_id, node_kind, unique_edge_id,
};
use furl_graph::alg;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollapseResult {
    pub collapsed: Vec<String>,
    /// Nodes moved into snapshots.
    pub hidden_nodes: Vec<String>,
    /// Replacement edges created on the collapsed nodes.
    pub remapped_edges: Vec<String>,
    /// Aggregates created by same-type edge grouping.
    pub grouped_edges: Vec<String>,
    /// Positions written by the follow-up layout, if one ran.
    pub positions: BTreeMap<String, Point>,
}

impl CollapseResult {
    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandResult {
    pub expanded: Vec<String>,
    pub restored_nodes: Vec<String>,
    pub positions: BTreeMap<String, Point>,
}

impl ExpandResult {
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

pub fn is_collapsible(g: &ElementGraph, id: &str) -> bool {
    node_kind(g, id) == Some(NodeKind::Container) && g.node(id).is_some_and(|n| !n.hidden)
}

pub fn is_expandable(g: &ElementGraph, id: &str) -> bool {
    node_kind(g, id) == Some(NodeKind::CollapsedContainer) && g.node(id).is_some_and(|n| !n.hidden)
}

/// Removes `nodes` (pre-order) from `g` and reroutes boundary edges onto `representative`.
///
/// An edge is internal when both ends are in `nodes` or equal `owner`; internal edges are only
/// stored. Every other edge touching `nodes` is stored and gets a replacement.
pub(crate) fn detach(
    g: &mut ElementGraph,
    nodes: &[String],
    owner: Option<&str>,
    representative: &str,
) -> StoredSubgraph {
    let members: BTreeSet<&str> = nodes.iter().map(String::as_str).collect();
    let inside = |v: &str| members.contains(v) || owner == Some(v);

    let touching: Vec<String> = g
        .edge_ids()
        .into_iter()
        .filter(|id| {
            g.edge_ends(id)
                .is_some_and(|(s, t)| members.contains(s) || members.contains(t))
        })
        .collect();

    let mut sub = StoredSubgraph::default();
    let mut reroutes: Vec<(String, String, String, EdgeData)> = Vec::new();
    for id in touching {
        let Some((source, target, data)) = g.remove_edge(&id) else {
            continue;
        };
        if !(inside(&source) && inside(&target)) {
            let rs = if inside(&source) { representative } else { source.as_str() };
            let rt = if inside(&target) { representative } else { target.as_str() };
            reroutes.push((id.clone(), rs.to_string(), rt.to_string(), data.clone()));
        }
        sub.edges.push(StoredEdge {
            id,
            source,
            target,
            data,
        });
    }

    let parents: Vec<Option<String>> = nodes
        .iter()
        .map(|n| g.parent(n).map(str::to_string))
        .collect();
    let mut removed: Vec<Option<_>> = nodes.iter().rev().map(|n| g.remove_node(n)).collect();
    removed.reverse();
    for ((id, parent), data) in nodes.iter().zip(parents).zip(removed) {
        if let Some(data) = data {
            sub.nodes.push(StoredNode {
                id: id.clone(),
                parent,
                data,
            });
        }
    }

    for (original, source, target, data) in reroutes {
        let (replacement, created) = link_replacement(g, &source, &target, &data);
        sub.remapped.push(RemappedEdge {
            original,
            replacement,
            created,
        });
    }
    sub
}

/// Finds or creates the replacement edge `source -> target` carrying `data`'s label.
fn link_replacement(g: &mut ElementGraph, source: &str, target: &str, data: &EdgeData) -> (String, bool) {
    let id = canonical_edge_id(source, &data.label, target);
    let reusable = g.edge_ends(&id) == Some((source, target))
        && g.edge(&id).is_some_and(|e| e.label == data.label);
    if reusable {
        return (id, false);
    }
    let id = unique_edge_id(g, id);
    let replacement = EdgeData {
        aggregate: None,
        ..data.clone()
    };
    g.set_edge(id.clone(), source, target, replacement);
    (id, true)
}

/// Re-inserts stored nodes and edges, returning the edges that could not be placed.
pub(crate) fn attach(g: &mut ElementGraph, sub: StoredSubgraph) -> Vec<StoredEdge> {
    let mut links: Vec<(String, String)> = Vec::new();
    for node in sub.nodes {
        if let Some(parent) = node.parent {
            links.push((node.id.clone(), parent));
        }
        g.set_node(node.id, node.data);
    }
    for (child, parent) in links {
        if g.has_node(&parent) {
            g.set_parent(child, parent);
        }
    }

    let mut unplaced = Vec::new();
    for edge in sub.edges {
        if g.has_edge(&edge.id) || !g.has_node(&edge.source) || !g.has_node(&edge.target) {
            unplaced.push(edge);
            continue;
        }
        g.set_edge(edge.id, edge.source, edge.target, edge.data);
    }
    unplaced
}

pub(crate) fn collapse_node(g: &mut ElementGraph, id: &str, padding: f64) -> Option<CollapseResult> {
    if node_kind(g, id) != Some(NodeKind::Container) {
        return None;
    }
    let anchor = geom::position(g, id, padding)?;
    let nodes = alg::descendants(g, id);
    let mut sub = detach(g, &nodes, Some(id), id);

    let node = g.node_mut(id)?;
    sub.anchor = anchor;
    sub.owner_position = node.position;
    node.position = anchor;

    let result = CollapseResult {
        collapsed: vec![id.to_string()],
        hidden_nodes: nodes,
        remapped_edges: sub
            .remapped
            .iter()
            .filter(|r| r.created)
            .map(|r| r.replacement.clone())
            .collect(),
        ..CollapseResult::default()
    };
    tracing::debug!(
        node = %id,
        hidden = result.hidden_nodes.len(),
        remapped = result.remapped_edges.len(),
        "collapsed node"
    );
    node.collapsed_children = Some(Box::new(sub));
    Some(result)
}

pub(crate) fn expand_node(g: &mut ElementGraph, id: &str) -> Option<Vec<String>> {
    if node_kind(g, id) != Some(NodeKind::CollapsedContainer) {
        return None;
    }
    let node = g.node_mut(id)?;
    let sub = *node.collapsed_children.take()?;
    let delta = node.position - sub.anchor;
    node.position = sub.owner_position + delta;

    let top_level: Vec<String> = sub
        .nodes
        .iter()
        .filter(|n| n.parent.as_deref() == Some(id))
        .map(|n| n.id.clone())
        .collect();
    let restored = restore_snapshot(g, id, sub, delta, &top_level);

    tracing::debug!(node = %id, restored = restored.len(), "expanded node");
    Some(restored)
}

/// Puts a snapshot taken from `owner` back into the graph and moves `roots` by `delta`.
///
/// Replacements created for the snapshot are retired first. Returns the restored node ids.
pub(crate) fn restore_snapshot(
    g: &mut ElementGraph,
    owner: &str,
    sub: StoredSubgraph,
    delta: Point,
    roots: &[String],
) -> Vec<String> {
    for record in &sub.remapped {
        if record.created {
            retire_replacement(g, &record.replacement);
        }
    }

    let restored = sub.node_ids();
    for edge in attach(g, sub) {
        let edge_id = edge.id.clone();
        if !reroute_stored_edge(g, edge) {
            tracing::warn!(node = %owner, edge = %edge_id, "dropping stored edge with no visible endpoint");
        }
    }
    geom::move_nodes(g, delta, roots);
    restored
}

/// Removes a replacement edge wherever it currently lives.
fn retire_replacement(g: &mut ElementGraph, id: &str) {
    loop {
        if g.remove_edge(id).is_some() {
            return;
        }
        let holder = g.edge_ids().into_iter().find(|e| {
            g.edge(e)
                .and_then(|d| d.aggregate.as_ref())
                .is_some_and(|agg| agg.contains(id))
        });
        match holder {
            Some(holder) => {
                edges::expand_aggregate(g, &holder);
            }
            None => break,
        }
    }
    if !purge_from_snapshots(g, id) {
        tracing::debug!(edge = %id, "replacement edge already gone");
    }
}

fn purge_from_snapshots(g: &mut ElementGraph, id: &str) -> bool {
    let owners: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|n| g.node(n).is_some_and(|d| d.collapsed_children.is_some()))
        .collect();
    for owner in owners {
        let stale = g
            .node_mut(&owner)
            .and_then(|n| n.collapsed_children.as_deref_mut())
            .and_then(|sub| purge_in_subgraph(sub, id));
        if let Some(stale) = stale {
            for replacement in stale {
                retire_replacement(g, &replacement);
            }
            return true;
        }
    }
    false
}

/// Removes edge `id` from `sub` or a nested snapshot. Returns the replacements that became
/// orphaned in the scope that holds `sub`.
fn purge_in_subgraph(sub: &mut StoredSubgraph, id: &str) -> Option<Vec<String>> {
    if let Some(pos) = sub.edges.iter().position(|e| e.id == id) {
        sub.edges.remove(pos);
        return Some(drop_remap_records(sub, id));
    }

    let folded = sub.edges.iter_mut().any(|e| {
        e.data
            .aggregate
            .as_mut()
            .is_some_and(|agg| remove_from_aggregate(&mut agg.originals, id))
    });
    if folded {
        return Some(Vec::new());
    }

    for i in 0..sub.nodes.len() {
        let nested = sub.nodes[i]
            .data
            .collapsed_children
            .as_deref_mut()
            .and_then(|nested| purge_in_subgraph(nested, id));
        if let Some(stale) = nested {
            let mut out = Vec::new();
            for replacement in stale {
                out.extend(purge_in_subgraph(sub, &replacement).unwrap_or_default());
            }
            return Some(out);
        }
    }
    None
}

fn remove_from_aggregate(originals: &mut Vec<StoredEdge>, id: &str) -> bool {
    if let Some(pos) = originals.iter().position(|e| e.id == id) {
        originals.remove(pos);
        return true;
    }
    originals.iter_mut().any(|e| {
        e.data
            .aggregate
            .as_mut()
            .is_some_and(|agg| remove_from_aggregate(&mut agg.originals, id))
    })
}

/// Drops the remap records of `original`; returns created replacements nobody else uses.
fn drop_remap_records(sub: &mut StoredSubgraph, original: &str) -> Vec<String> {
    let (dropped, kept): (Vec<RemappedEdge>, Vec<RemappedEdge>) = std::mem::take(&mut sub.remapped)
        .into_iter()
        .partition(|r| r.original == original);
    sub.remapped = kept;

    let mut stale = Vec::new();
    for record in dropped.into_iter().filter(|r| r.created) {
        match sub
            .remapped
            .iter_mut()
            .find(|r| r.replacement == record.replacement)
        {
            Some(heir) => heir.created = true,
            None => stale.push(record.replacement),
        }
    }
    stale
}

/// Collapsed node currently hiding `id`, if any.
fn hidden_owner(g: &ElementGraph, id: &str) -> Option<String> {
    g.nodes()
        .find(|n| {
            g.node(n)
                .and_then(|d| d.collapsed_children.as_ref())
                .is_some_and(|sub| sub.contains_node(id))
        })
        .map(str::to_string)
}

/// Places a restored edge whose endpoint is hidden inside another collapsed node.
///
/// The edge is stored in the snapshot of the collapsed node hiding its source (or target) and a
/// replacement is linked between the visible stand-ins.
pub(crate) fn reroute_stored_edge(g: &mut ElementGraph, edge: StoredEdge) -> bool {
    if g.has_edge(&edge.id) {
        return false;
    }
    let owner_of = |v: &str| -> Option<Option<String>> {
        if g.has_node(v) {
            Some(None)
        } else {
            hidden_owner(g, v).map(Some)
        }
    };
    let (Some(source_owner), Some(target_owner)) = (owner_of(&edge.source), owner_of(&edge.target))
    else {
        return false;
    };
    let Some(holder) = source_owner.clone().or_else(|| target_owner.clone()) else {
        return false;
    };
    let vs = source_owner.unwrap_or_else(|| edge.source.clone());
    let vt = target_owner.unwrap_or_else(|| edge.target.clone());

    let link = (vs != vt).then(|| link_replacement(g, &vs, &vt, &edge.data));
    let Some(sub) = g
        .node_mut(&holder)
        .and_then(|n| n.collapsed_children.as_deref_mut())
    else {
        return false;
    };
    if let Some((replacement, created)) = link {
        sub.remapped.push(RemappedEdge {
            original: edge.id.clone(),
            replacement,
            created,
        });
    }
    sub.edges.push(edge);
    true
}

/// Collapses every container in `ids`, deepest first.
pub(crate) fn collapse_nodes(g: &mut ElementGraph, ids: &[String], padding: f64) -> Result<CollapseResult> {
    let mut targets: Vec<(usize, String)> = Vec::new();
    let mut seen = BTreeSet::new();
    for id in ids {
        if is_collapsible(g, id) && seen.insert(id.as_str()) {
            targets.push((levels::depth(g, id)?, id.clone()));
        }
    }
    targets.sort_by(|a, b| b.0.cmp(&a.0));

    let mut out = CollapseResult::default();
    for (_, id) in targets {
        if let Some(r) = collapse_node(g, &id, padding) {
            out.collapsed.extend(r.collapsed);
            out.hidden_nodes.extend(r.hidden_nodes);
            out.remapped_edges.extend(r.remapped_edges);
        }
    }
    Ok(out)
}

/// `ids` plus all their descendants, collapsed deepest first.
pub(crate) fn collapse_recursively(
    g: &mut ElementGraph,
    ids: &[String],
    padding: f64,
) -> Result<CollapseResult> {
    let roots: Vec<&str> = ids.iter().map(String::as_str).collect();
    let all = alg::preorder(g, &roots);
    collapse_nodes(g, &all, padding)
}

pub(crate) fn expand_nodes(g: &mut ElementGraph, ids: &[String]) -> ExpandResult {
    let mut out = ExpandResult::default();
    for id in ids {
        if !is_expandable(g, id) {
            continue;
        }
        if let Some(restored) = expand_node(g, id) {
            out.expanded.push(id.clone());
            out.restored_nodes.extend(restored);
        }
    }
    out
}

/// Expands `ids` and then every collapsed node they reveal, top-down.
pub(crate) fn expand_recursively(g: &mut ElementGraph, ids: &[String]) -> ExpandResult {
    let mut out = ExpandResult::default();
    let mut queue: VecDeque<String> = ids.iter().cloned().collect();
    while let Some(id) = queue.pop_front() {
        if !is_expandable(g, &id) {
            continue;
        }
        let Some(restored) = expand_node(g, &id) else {
            continue;
        };
        out.expanded.push(id);
        for r in &restored {
            if is_expandable(g, r) {
                queue.push_back(r.clone());
            }
        }
        out.restored_nodes.extend(restored);
    }
    out
}

pub(crate) fn expandable_nodes(g: &ElementGraph) -> Vec<String> {
    g.nodes()
        .filter(|n| is_expandable(g, n))
        .map(str::to_string)
        .collect()
}
