//! Element data stored in the engine's graph.
//!
//! Node and edge kinds are not stored; they follow from the role, the presence of a collapsed
//! snapshot and the live compound structure (see [`node_kind`]).

use crate::geom::{Point, Size};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type ElementGraph = furl_graph::Graph<NodeData, EdgeData>;

/// Free-form per-element data.
pub type DataMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeRole {
    #[default]
    Regular,
    /// Stand-in for a container while the reconciler lays out its level.
    Placeholder,
    /// Visible stand-in for a cluster of hidden members.
    GroupRepresentative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Leaf,
    Container,
    CollapsedContainer,
    Placeholder,
    GroupRepresentative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    Simple,
    Aggregate,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub role: NodeRole,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: DataMap,
    /// Center position. Ignored while the node is an expanded container.
    #[serde(default)]
    pub position: Point,
    /// Intrinsic size, used whenever the node is drawn as a single box.
    #[serde(default)]
    pub size: Size,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed_children: Option<Box<StoredSubgraph>>,
}

impl NodeData {
    pub fn leaf(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Point::new(x, y),
            size: Size::new(width, height),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub(crate) fn placeholder(position: Point, size: Size) -> Self {
        Self {
            role: NodeRole::Placeholder,
            position,
            size,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: DataMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateInfo>,
}

impl EdgeData {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn kind(&self) -> EdgeKind {
        if self.aggregate.is_some() {
            EdgeKind::Aggregate
        } else {
            EdgeKind::Simple
        }
    }
}

/// Originals folded into an aggregate edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateInfo {
    pub originals: Vec<StoredEdge>,
    /// The originals run in both directions between the pair.
    pub bidirectional: bool,
}

impl AggregateInfo {
    /// Whether `id` is folded in here, directly or through a nested aggregate.
    pub fn contains(&self, id: &str) -> bool {
        self.originals.iter().any(|e| {
            e.id == id || e.data.aggregate.as_ref().is_some_and(|agg| agg.contains(id))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub data: NodeData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub data: EdgeData,
}

/// A boundary edge that was rerouted onto a collapsed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemappedEdge {
    pub original: String,
    pub replacement: String,
    /// The replacement was created for this edge rather than reused.
    pub created: bool,
}

/// Everything removed from the live graph when a node was collapsed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubgraph {
    /// Descendants in pre-order; nested collapsed nodes carry their own snapshot.
    pub nodes: Vec<StoredNode>,
    pub edges: Vec<StoredEdge>,
    #[serde(default)]
    pub remapped: Vec<RemappedEdge>,
    /// Where the collapsed node was placed when the snapshot was taken.
    pub anchor: Point,
    /// The collapsed node's own stored position at that time.
    #[serde(default)]
    pub owner_position: Point,
}

impl StoredSubgraph {
    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Whether `id` is stored here or in a nested snapshot.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| {
            n.id == id
                || n.data
                    .collapsed_children
                    .as_ref()
                    .is_some_and(|sub| sub.contains_node(id))
        })
    }

    /// All stored nodes, descending into nested snapshots.
    pub fn nodes_recursive(&self) -> Vec<&StoredNode> {
        let mut out = Vec::new();
        for n in &self.nodes {
            out.push(n);
            if let Some(sub) = &n.data.collapsed_children {
                out.extend(sub.nodes_recursive());
            }
        }
        out
    }
}

/// Kind of `id`, derived from its data and the live compound structure.
pub fn node_kind(g: &ElementGraph, id: &str) -> Option<NodeKind> {
    let node = g.node(id)?;
    Some(match node.role {
        NodeRole::Placeholder => NodeKind::Placeholder,
        NodeRole::GroupRepresentative => NodeKind::GroupRepresentative,
        NodeRole::Regular if node.collapsed_children.is_some() => NodeKind::CollapsedContainer,
        NodeRole::Regular if g.has_children(id) => NodeKind::Container,
        NodeRole::Regular => NodeKind::Leaf,
    })
}

pub fn is_visible(g: &ElementGraph, id: &str) -> bool {
    g.node(id).is_some_and(|n| !n.hidden)
}

/// Canonical id of an edge derived from its endpoints and label.
pub fn canonical_edge_id(source: &str, label: &str, target: &str) -> String {
    format!("{source}_{label}_{target}")
}

/// `base`, or `base#2`, `base#3`, ... whichever is free first.
pub(crate) fn unique_edge_id(g: &ElementGraph, base: String) -> String {
    if !g.has_edge(&base) {
        return base;
    }
    let mut i = 2u64;
    loop {
        let id = format!("{base}#{i}");
        if !g.has_edge(&id) {
            return id;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_structure() {
        let mut g = ElementGraph::default();
        g.set_node("c", NodeData::default());
        g.set_node("a", NodeData::default());
        g.set_parent("a", "c");
        assert_eq!(node_kind(&g, "c"), Some(NodeKind::Container));
        assert_eq!(node_kind(&g, "a"), Some(NodeKind::Leaf));

        g.node_mut("a").unwrap().collapsed_children = Some(Box::default());
        assert_eq!(node_kind(&g, "a"), Some(NodeKind::CollapsedContainer));
        assert_eq!(node_kind(&g, "missing"), None);
    }

    #[test]
    fn unique_edge_id_appends_counter() {
        let mut g = ElementGraph::default();
        g.set_edge("a_x_b", "a", "b", EdgeData::labeled("x"));
        g.set_edge("a_x_b#2", "a", "b", EdgeData::labeled("x"));
        assert_eq!(unique_edge_id(&g, "a_x_b".to_string()), "a_x_b#3");
        assert_eq!(unique_edge_id(&g, "a_y_b".to_string()), "a_y_b");
    }
}
