//! Graph configuration options.

#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    /// Allow more than one edge between the same ordered `(source, target)` pair.
    pub multigraph: bool,
    /// Allow parent/child relations between nodes.
    pub compound: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            multigraph: true,
            compound: true,
        }
    }
}
