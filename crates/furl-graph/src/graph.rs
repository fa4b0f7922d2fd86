//! The core [`Graph`] container.
//!
//! Nodes carry a label `N`, edges carry a label `E`. Both are stored in insertion order with a
//! hash index from id to slot; removal shifts later slots down so iteration order stays stable.

use rustc_hash::FxBuildHasher;
use std::cell::{Ref, RefCell};

mod adj_cache;
pub mod alg;
mod entries;
mod options;

use adj_cache::IncidentCache;
use entries::{EdgeEntry, NodeEntry};
pub use options::GraphOptions;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug)]
pub struct Graph<N, E>
where
    N: Default,
    E: Default,
{
    options: GraphOptions,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<String, usize>,

    parent: HashMap<String, String>,
    children: HashMap<String, Vec<String>>,

    // Uses interior mutability to keep query APIs on `&self`.
    incident_gen: u64,
    incident_cache: RefCell<Option<IncidentCache>>,
}

impl<N, E> Default for Graph<N, E>
where
    N: Default,
    E: Default,
{
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}

impl<N, E> Clone for Graph<N, E>
where
    N: Default + Clone,
    E: Default + Clone,
{
    fn clone(&self) -> Self {
        Self {
            options: self.options,
            nodes: self.nodes.clone(),
            node_index: self.node_index.clone(),
            edges: self.edges.clone(),
            edge_index: self.edge_index.clone(),
            parent: self.parent.clone(),
            children: self.children.clone(),
            incident_gen: self.incident_gen,
            incident_cache: RefCell::new(None),
        }
    }
}

impl<N, E> Graph<N, E>
where
    N: Default,
    E: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            parent: HashMap::default(),
            children: HashMap::default(),
            incident_gen: 0,
            incident_cache: RefCell::new(None),
        }
    }

    fn invalidate_incident(&mut self) {
        self.incident_gen = self.incident_gen.wrapping_add(1);
        *self.incident_cache.get_mut() = None;
    }

    fn ensure_incident(&self) -> Ref<'_, IncidentCache> {
        let generation = self.incident_gen;
        let stale = self
            .incident_cache
            .borrow()
            .as_ref()
            .is_none_or(|c| c.generation != generation);
        if stale {
            let ends = self.edges.iter().enumerate().map(|(ix, e)| {
                (
                    ix,
                    self.node_index.get(&e.source).copied(),
                    self.node_index.get(&e.target).copied(),
                )
            });
            let cache = IncidentCache::build(generation, self.nodes.len(), ends);
            *self.incident_cache.borrow_mut() = Some(cache);
        }
        Ref::map(self.incident_cache.borrow(), |c| match c {
            Some(c) => c,
            None => unreachable!("incident cache is populated above"),
        })
    }

    // ----- nodes -------------------------------------------------------------------------

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Inserts a node, or replaces the label of an existing one.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        self.invalidate_incident();
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if self.node_index.contains_key(&id) {
            return self;
        }
        self.set_node(id, N::default())
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(&str, &N),
    {
        for n in &self.nodes {
            f(&n.id, &n.label);
        }
    }

    /// Removes a node together with its incident edges and returns its label.
    ///
    /// Children of the removed node become roots; callers that want to drop a whole subtree
    /// remove the descendants first (see [`alg::descendants`]).
    pub fn remove_node(&mut self, id: &str) -> Option<N> {
        let idx = self.node_index.remove(id)?;

        self.invalidate_incident();
        let entry = self.nodes.remove(idx);
        for i in idx..self.nodes.len() {
            let node_id = self.nodes[i].id.as_str();
            if let Some(v) = self.node_index.get_mut(node_id) {
                *v = i;
            }
        }

        if self.edges.iter().any(|e| e.touches(id)) {
            self.edges.retain(|e| !e.touches(id));
            self.edge_index.clear();
            for (i, e) in self.edges.iter().enumerate() {
                self.edge_index.insert(e.id.clone(), i);
            }
        }

        if let Some(parent) = self.parent.remove(id) {
            if let Some(ch) = self.children.get_mut(&parent) {
                ch.retain(|c| c != id);
            }
        }
        if let Some(ch) = self.children.remove(id) {
            for child in ch {
                self.parent.remove(&child);
            }
        }

        Some(entry.label)
    }

    // ----- edges -------------------------------------------------------------------------

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(|e| e.id.as_str())
    }

    pub fn edge_ids(&self) -> Vec<String> {
        self.edges.iter().map(|e| e.id.clone()).collect()
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    /// Inserts an edge, creating missing endpoints with default labels.
    ///
    /// Setting an existing id replaces its label but keeps its endpoints. On a non-multigraph a
    /// second edge between the same ordered pair is ignored.
    pub fn set_edge(
        &mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: E,
    ) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.edge_index.get(&id) {
            self.edges[idx].label = label;
            return self;
        }
        let source = source.into();
        let target = target.into();
        if !self.options.multigraph
            && self
                .edges
                .iter()
                .any(|e| e.source == source && e.target == target)
        {
            return self;
        }
        self.ensure_node(source.clone());
        self.ensure_node(target.clone());

        self.invalidate_incident();
        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            id: id.clone(),
            source,
            target,
            label,
        });
        self.edge_index.insert(id, idx);
        self
    }

    pub fn edge(&self, id: &str) -> Option<&E> {
        self.edge_index.get(id).map(|&idx| &self.edges[idx].label)
    }

    /// `(source, target)` of an edge.
    pub fn edge_ends(&self, id: &str) -> Option<(&str, &str)> {
        self.edge_index.get(id).map(|&idx| {
            let e = &self.edges[idx];
            (e.source.as_str(), e.target.as_str())
        })
    }

    pub fn for_each_edge<F>(&self, mut f: F)
    where
        F: FnMut(&str, &str, &str, &E),
    {
        for e in &self.edges {
            f(&e.id, &e.source, &e.target, &e.label);
        }
    }

    /// Removes an edge and returns `(source, target, label)`.
    pub fn remove_edge(&mut self, id: &str) -> Option<(String, String, E)> {
        let idx = self.edge_index.remove(id)?;
        self.invalidate_incident();
        let entry = self.edges.remove(idx);
        for i in idx..self.edges.len() {
            let k = self.edges[i].id.as_str();
            if let Some(v) = self.edge_index.get_mut(k) {
                *v = i;
            }
        }
        Some((entry.source, entry.target, entry.label))
    }

    /// Ids of all edges touching `v`, in graph order. Self-loops are listed once.
    pub fn node_edges(&self, v: &str) -> Vec<String> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        let cache = self.ensure_incident();
        let mut ixs = cache.incident(v_ix).to_vec();
        ixs.sort_unstable();
        ixs.into_iter().map(|ix| self.edges[ix].id.clone()).collect()
    }

    pub fn out_edges(&self, v: &str) -> Vec<String> {
        self.node_edges(v)
            .into_iter()
            .filter(|id| self.edge_ends(id).is_some_and(|(s, _)| s == v))
            .collect()
    }

    pub fn in_edges(&self, v: &str) -> Vec<String> {
        self.node_edges(v)
            .into_iter()
            .filter(|id| self.edge_ends(id).is_some_and(|(_, t)| t == v))
            .collect()
    }

    /// Ids of edges connecting `u` and `v` in either direction, in graph order.
    pub fn edges_between(&self, u: &str, v: &str) -> Vec<String> {
        self.node_edges(u)
            .into_iter()
            .filter(|id| {
                self.edge_ends(id)
                    .is_some_and(|(s, t)| (s == u && t == v) || (s == v && t == u))
            })
            .collect()
    }

    // ----- compound ----------------------------------------------------------------------

    pub fn set_parent(&mut self, child: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        if !self.options.compound {
            return self;
        }
        let child = child.into();
        let parent = parent.into();
        self.ensure_node(child.clone());
        self.ensure_node(parent.clone());
        if let Some(prev) = self.parent.insert(child.clone(), parent.clone()) {
            if let Some(ch) = self.children.get_mut(&prev) {
                ch.retain(|c| c != &child);
            }
        }
        let entry = self.children.entry(parent).or_default();
        if !entry.iter().any(|c| c == &child) {
            entry.push(child);
        }
        self
    }

    pub fn clear_parent(&mut self, child: &str) -> &mut Self {
        if let Some(prev) = self.parent.remove(child) {
            if let Some(ch) = self.children.get_mut(&prev) {
                ch.retain(|c| c != child);
            }
        }
        self
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        self.parent.get(child).map(|s| s.as_str())
    }

    pub fn children(&self, parent: &str) -> Vec<&str> {
        self.children
            .get(parent)
            .map(|v| v.iter().map(|s| s.as_str()).collect::<Vec<_>>())
            .unwrap_or_default()
    }

    pub fn has_children(&self, parent: &str) -> bool {
        self.children.get(parent).is_some_and(|c| !c.is_empty())
    }

    pub fn children_root(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| !self.parent.contains_key(&n.id))
            .map(|n| n.id.as_str())
            .collect()
    }
}
