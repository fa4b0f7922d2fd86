//! Incident-edge cache used by [`Graph`](super::Graph).
//!
//! Collapse and reconciliation ask for the edges touching a node over and over while the graph
//! is otherwise unchanged. The cache is a CSR layout keyed by node index and is rebuilt lazily
//! after any structural mutation.

#[derive(Debug, Clone)]
pub(in crate::graph) struct IncidentCache {
    pub(in crate::graph) generation: u64,
    pub(in crate::graph) offsets: Vec<usize>,
    pub(in crate::graph) edges: Vec<usize>,
}

impl IncidentCache {
    pub(in crate::graph) fn build(
        generation: u64,
        node_count: usize,
        ends: impl Iterator<Item = (usize, Option<usize>, Option<usize>)>,
    ) -> Self {
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        for (edge_ix, v_ix, w_ix) in ends {
            if let Some(v_ix) = v_ix {
                buckets[v_ix].push(edge_ix);
            }
            // Self-loops are listed once.
            if let Some(w_ix) = w_ix.filter(|w| Some(*w) != v_ix) {
                buckets[w_ix].push(edge_ix);
            }
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut edges = Vec::new();
        offsets.push(0);
        for bucket in buckets {
            edges.extend(bucket);
            offsets.push(edges.len());
        }
        Self {
            generation,
            offsets,
            edges,
        }
    }

    pub(in crate::graph) fn incident(&self, v_ix: usize) -> &[usize] {
        let start = self.offsets[v_ix];
        let end = self.offsets[v_ix + 1];
        &self.edges[start..end]
    }
}
