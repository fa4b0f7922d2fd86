//! Cluster representatives.
//!
//! A cluster folds a set of leaf nodes into one visible representative. The members live in the
//! representative's snapshot exactly like the descendants of a collapsed container; the member
//! set is rebuilt from scratch on every change so the snapshot is always replaced, never merged.

use crate::collapse;
use crate::consolidate::{self, ConsolidationKey};
use crate::geom::{Point, Size};
use crate::model::{ElementGraph, NodeData, NodeKind, NodeRole, is_visible, node_kind};
use crate::state::EngineState;
use serde_json::Value;

pub const CLUSTER_CLASS: &str = "cluster";
pub const CHILD_COUNT_KEY: &str = "childCount";

#[derive(Debug, Clone, Copy)]
pub struct ClusterOptions<'a> {
    /// Member classes in priority order; the first one present is copied onto the representative.
    pub class_priority: &'a [String],
    pub allow_unique_edges: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterResult {
    pub representative: String,
    pub members: Vec<String>,
    /// Members put back into the graph by this call.
    pub released: Vec<String>,
    pub hidden: bool,
}

/// Current members of `representative`.
pub fn cluster_members(g: &ElementGraph, representative: &str) -> Vec<String> {
    match g.node(representative) {
        Some(n) if n.role == NodeRole::GroupRepresentative => n
            .collapsed_children
            .as_ref()
            .map(|sub| sub.node_ids())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn is_eligible(g: &ElementGraph, representative: &str, id: &str) -> bool {
    id != representative && node_kind(g, id) == Some(NodeKind::Leaf) && is_visible(g, id)
}

pub(crate) fn collapse_cluster(
    g: &mut ElementGraph,
    state: &mut EngineState,
    representative: &str,
    members: &[String],
    opts: ClusterOptions<'_>,
) -> ClusterResult {
    let mut set = cluster_members(g, representative);
    for m in members {
        if !set.contains(m) && is_eligible(g, representative, m) {
            set.push(m.clone());
        }
    }
    rebuild(g, state, representative, set, opts)
}

pub(crate) fn expand_cluster(
    g: &mut ElementGraph,
    state: &mut EngineState,
    representative: &str,
    opts: ClusterOptions<'_>,
) -> ClusterResult {
    rebuild(g, state, representative, Vec::new(), opts)
}

pub(crate) fn update_cluster(
    g: &mut ElementGraph,
    state: &mut EngineState,
    representative: &str,
    add: &[String],
    remove: &[String],
    opts: ClusterOptions<'_>,
) -> ClusterResult {
    let mut set: Vec<String> = cluster_members(g, representative)
        .into_iter()
        .filter(|m| !remove.contains(m))
        .collect();
    for m in add {
        if !set.contains(m) && !remove.contains(m) && is_eligible(g, representative, m) {
            set.push(m.clone());
        }
    }
    rebuild(g, state, representative, set, opts)
}

/// Returns every member of `representative` to the graph.
fn release(g: &mut ElementGraph, state: &mut EngineState, representative: &str) -> Vec<String> {
    if let Some(folded) = state.take_cluster_edges(representative) {
        consolidate::restore(g, folded);
    }
    let Some(node) = g.node_mut(representative) else {
        return Vec::new();
    };
    let Some(sub) = node.collapsed_children.take() else {
        return Vec::new();
    };
    let delta = node.position - sub.anchor;
    let roots = sub.node_ids();
    collapse::restore_snapshot(g, representative, *sub, delta, &roots)
}

fn rebuild(
    g: &mut ElementGraph,
    state: &mut EngineState,
    representative: &str,
    members: Vec<String>,
    opts: ClusterOptions<'_>,
) -> ClusterResult {
    let released = release(g, state, representative);
    let members: Vec<String> = members.into_iter().filter(|m| g.has_node(m)).collect();

    if members.is_empty() {
        if let Some(node) = g.node_mut(representative) {
            node.hidden = true;
            node.data.insert(CHILD_COUNT_KEY.to_string(), Value::from(0));
        }
        tracing::debug!(cluster = %representative, released = released.len(), "cluster emptied");
        return ClusterResult {
            representative: representative.to_string(),
            members,
            released,
            hidden: g.has_node(representative),
        };
    }

    let (center, size) = member_geometry(g, &members);
    let parent = common_parent(g, &members);
    if !g.has_node(representative) {
        g.set_node(representative, NodeData::default());
    }
    match &parent {
        Some(p) => {
            g.set_parent(representative, p.clone());
        }
        None => {
            g.clear_parent(representative);
        }
    }

    let mut sub = collapse::detach(g, &members, None, representative);
    sub.anchor = center;
    sub.owner_position = center;

    let rep_edges = g.node_edges(representative);
    let key = if opts.allow_unique_edges {
        ConsolidationKey::PairAndLabel
    } else {
        ConsolidationKey::Pair
    };
    let folded = consolidate::consolidate_by(g, &rep_edges, key);
    if !folded.is_noop() {
        state.set_cluster_edges(representative, folded);
    }

    let style = opts
        .class_priority
        .iter()
        .find(|c| sub.nodes.iter().any(|n| n.data.has_class(c)))
        .cloned();

    let released: Vec<String> = released.into_iter().filter(|r| !members.contains(r)).collect();
    if let Some(node) = g.node_mut(representative) {
        node.role = NodeRole::GroupRepresentative;
        node.hidden = false;
        node.position = center;
        node.size = size;
        node.classes
            .retain(|c| c != CLUSTER_CLASS && !opts.class_priority.contains(c));
        node.classes.push(CLUSTER_CLASS.to_string());
        node.classes.extend(style);
        node.data
            .insert(CHILD_COUNT_KEY.to_string(), Value::from(members.len()));
        node.collapsed_children = Some(Box::new(sub));
    }
    tracing::debug!(cluster = %representative, members = members.len(), "cluster rebuilt");

    ClusterResult {
        representative: representative.to_string(),
        members,
        released,
        hidden: false,
    }
}

/// Centroid of the members and the largest member size.
fn member_geometry(g: &ElementGraph, members: &[String]) -> (Point, Size) {
    let mut sum = Point::ZERO;
    let mut size = Size::default();
    let mut n = 0.0;
    for data in members.iter().filter_map(|m| g.node(m)) {
        sum = sum + data.position;
        size.width = size.width.max(data.size.width);
        size.height = size.height.max(data.size.height);
        n += 1.0;
    }
    if n == 0.0 {
        return (Point::ZERO, size);
    }
    (Point::new(sum.x / n, sum.y / n), size)
}

fn common_parent(g: &ElementGraph, members: &[String]) -> Option<String> {
    let first = g.parent(members.first()?)?;
    members
        .iter()
        .all(|m| g.parent(m) == Some(first))
        .then(|| first.to_string())
}
