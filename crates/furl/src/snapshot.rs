//! Serializable copies of the element graph.

use crate::consolidate::Consolidation;
use crate::error::Result;
use crate::model::{ElementGraph, StoredEdge, StoredNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every node and edge of a graph, with parent links, geometry, collapsed snapshots and
/// aggregate originals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub nodes: Vec<StoredNode>,
    pub edges: Vec<StoredEdge>,
    /// Representative edges folded away by clusters, keyed by representative.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub clusters: BTreeMap<String, Consolidation>,
}

impl GraphSnapshot {
    pub fn capture(g: &ElementGraph) -> Self {
        let mut nodes = Vec::with_capacity(g.node_count());
        g.for_each_node(|id, data| {
            nodes.push(StoredNode {
                id: id.to_string(),
                parent: g.parent(id).map(str::to_string),
                data: data.clone(),
            });
        });
        let mut edges = Vec::with_capacity(g.edge_count());
        g.for_each_edge(|id, source, target, data| {
            edges.push(StoredEdge {
                id: id.to_string(),
                source: source.to_string(),
                target: target.to_string(),
                data: data.clone(),
            });
        });
        Self {
            nodes,
            edges,
            clusters: BTreeMap::new(),
        }
    }

    pub fn into_graph(self) -> ElementGraph {
        let mut g = ElementGraph::default();
        let mut links = Vec::new();
        for node in self.nodes {
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
        for edge in self.edges {
            g.set_edge(edge.id, edge.source, edge.target, edge.data);
        }
        g
    }

    /// Nodes and edges sorted by id, for order-insensitive comparison.
    pub fn normalized(mut self) -> Self {
        self.nodes.sort_by(|a, b| a.id.cmp(&b.id));
        self.edges.sort_by(|a, b| a.id.cmp(&b.id));
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Storage for exported snapshots.
pub trait PersistenceAdapter {
    fn save(&mut self, snapshot: &GraphSnapshot) -> Result<()>;
    fn load(&mut self) -> Result<GraphSnapshot>;
}

/// Keeps the last saved snapshot as JSON text.
#[derive(Debug, Clone, Default)]
pub struct JsonBuffer {
    pub text: String,
}

impl PersistenceAdapter for JsonBuffer {
    fn save(&mut self, snapshot: &GraphSnapshot) -> Result<()> {
        self.text = snapshot.to_json()?;
        Ok(())
    }

    fn load(&mut self) -> Result<GraphSnapshot> {
        GraphSnapshot::from_json(&self.text)
    }
}
