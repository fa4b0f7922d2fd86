//! Internal storage entries for [`Graph`](super::Graph).

#[derive(Debug, Clone)]
pub(in crate::graph) struct NodeEntry<N> {
    pub(in crate::graph) id: String,
    pub(in crate::graph) label: N,
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct EdgeEntry<E> {
    pub(in crate::graph) id: String,
    pub(in crate::graph) source: String,
    pub(in crate::graph) target: String,
    pub(in crate::graph) label: E,
}

impl<E> EdgeEntry<E> {
    pub(in crate::graph) fn touches(&self, v: &str) -> bool {
        self.source == v || self.target == v
    }
}
