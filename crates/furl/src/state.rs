use crate::consolidate::Consolidation;
use crate::model::ElementGraph;
use std::collections::BTreeMap;

/// Scratch state carried between engine operations.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    placeholder_seq: u64,
    cluster_edges: BTreeMap<String, Consolidation>,
}

impl EngineState {
    /// A fresh id for the node standing in for `container`; never one already in `g`.
    pub(crate) fn next_placeholder_id(&mut self, g: &ElementGraph, container: &str) -> String {
        loop {
            self.placeholder_seq += 1;
            let id = format!("{container}::placeholder#{}", self.placeholder_seq);
            if !g.has_node(&id) {
                return id;
            }
        }
    }

    /// Representative edges folded away when `representative` last took members in.
    pub fn cluster_edges(&self, representative: &str) -> Option<&Consolidation> {
        self.cluster_edges.get(representative)
    }

    pub(crate) fn all_cluster_edges(&self) -> &BTreeMap<String, Consolidation> {
        &self.cluster_edges
    }

    pub(crate) fn set_cluster_edges(&mut self, representative: &str, c: Consolidation) {
        self.cluster_edges.insert(representative.to_string(), c);
    }

    pub(crate) fn take_cluster_edges(&mut self, representative: &str) -> Option<Consolidation> {
        self.cluster_edges.remove(representative)
    }

    pub(crate) fn replace_cluster_edges(&mut self, all: BTreeMap<String, Consolidation>) {
        self.cluster_edges = all;
    }
}
