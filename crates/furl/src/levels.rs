//! Depth classification of compound nodes.

use crate::error::{Error, Result};
use crate::model::ElementGraph;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};

/// Siblings sharing a parent at one depth.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGroup {
    pub parent: Option<String>,
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyLevel {
    /// Number of ancestors of every node on this level.
    pub depth: usize,
    pub groups: Vec<LevelGroup>,
}

impl HierarchyLevel {
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.nodes.iter().map(String::as_str))
    }
}

/// Number of ancestors of `id`.
pub fn depth(g: &ElementGraph, id: &str) -> Result<usize> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    seen.insert(id);
    let mut depth = 0;
    let mut cur = g.parent(id);
    while let Some(p) = cur {
        if !seen.insert(p) {
            return Err(Error::CyclicParent {
                node_id: id.to_string(),
            });
        }
        depth += 1;
        cur = g.parent(p);
    }
    Ok(depth)
}

/// Partitions `nodes` by depth, deepest level first.
///
/// Within a level nodes are grouped by parent; groups and their members keep the order in which
/// they first appear in `nodes`. Ids missing from the graph are skipped.
pub fn classify(g: &ElementGraph, nodes: &[String]) -> Result<Vec<HierarchyLevel>> {
    let mut by_depth: BTreeMap<usize, IndexMap<Option<String>, Vec<String>>> = BTreeMap::new();
    for id in nodes {
        if !g.has_node(id) {
            continue;
        }
        let d = depth(g, id)?;
        let parent = g.parent(id).map(str::to_string);
        let members = by_depth.entry(d).or_default().entry(parent).or_default();
        if !members.contains(id) {
            members.push(id.clone());
        }
    }

    Ok(by_depth
        .into_iter()
        .rev()
        .map(|(depth, groups)| HierarchyLevel {
            depth,
            groups: groups
                .into_iter()
                .map(|(parent, nodes)| LevelGroup { parent, nodes })
                .collect(),
        })
        .collect())
}
