//! Disposable copies of the graph used during reconciliation.

use crate::error::{Error, Result};
use crate::model::ElementGraph;
use crate::snapshot::GraphSnapshot;
use std::cell::RefCell;
use std::rc::Rc;

/// Host that a shadow graph is mounted on while it exists.
pub trait RenderSurface {
    fn mount(&mut self, node_count: usize);
    fn unmount(&mut self);
}

/// Surface that only counts mounts, for headless use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessSurface {
    pub mounted: usize,
    pub mounts: usize,
    pub unmounts: usize,
}

impl RenderSurface for HeadlessSurface {
    fn mount(&mut self, _node_count: usize) {
        self.mounted += 1;
        self.mounts += 1;
    }

    fn unmount(&mut self) {
        self.mounted = self.mounted.saturating_sub(1);
        self.unmounts += 1;
    }
}

impl<T: RenderSurface> RenderSurface for Rc<RefCell<T>> {
    fn mount(&mut self, node_count: usize) {
        self.borrow_mut().mount(node_count);
    }

    fn unmount(&mut self) {
        self.borrow_mut().unmount();
    }
}

/// An isolated copy of a graph, mounted on a render surface for as long as it lives.
///
/// Dropping the shadow unmounts it, whichever way the owning scope is left.
pub struct ShadowGraph<'s> {
    graph: ElementGraph,
    surface: &'s mut dyn RenderSurface,
}

impl<'s> ShadowGraph<'s> {
    pub fn acquire(source: &ElementGraph, surface: Option<&'s mut dyn RenderSurface>) -> Result<Self> {
        let surface = surface.ok_or(Error::MissingRenderSurface)?;
        let graph = GraphSnapshot::capture(source).into_graph();
        surface.mount(graph.node_count());
        tracing::trace!(nodes = graph.node_count(), "shadow graph mounted");
        Ok(Self { graph, surface })
    }

    pub fn graph(&self) -> &ElementGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ElementGraph {
        &mut self.graph
    }
}

impl Drop for ShadowGraph<'_> {
    fn drop(&mut self) {
        self.surface.unmount();
        tracing::trace!("shadow graph released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeData;

    #[test]
    fn shadow_is_independent_and_released_on_drop() {
        let mut g = ElementGraph::default();
        g.set_node("a", NodeData::leaf(0.0, 0.0, 1.0, 1.0));
        let mut surface = HeadlessSurface::default();
        {
            let mut shadow = ShadowGraph::acquire(&g, Some(&mut surface)).unwrap();
            shadow.graph_mut().set_node("b", NodeData::default());
            assert_eq!(shadow.graph().node_count(), 2);
        }
        assert_eq!(g.node_count(), 1);
        assert_eq!((surface.mounts, surface.unmounts, surface.mounted), (1, 1, 0));
    }

    #[test]
    fn missing_surface_is_an_error() {
        let g = ElementGraph::default();
        assert!(matches!(
            ShadowGraph::acquire(&g, None),
            Err(Error::MissingRenderSurface)
        ));
    }
}
