use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn validate(&self) -> Result<()> {
        let mut node_exists: BTreeSet<&str> = BTreeSet::new();
        for n in &self.nodes {
            if !node_exists.insert(n.id.as_str()) {
                return Err(Error::DuplicateNode {
                    node_id: n.id.clone(),
                });
            }
        }
        for e in &self.edges {
            if !node_exists.contains(e.source.as_str()) || !node_exists.contains(e.target.as_str())
            {
                return Err(Error::MissingEndpoint {
                    edge_id: e.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Center of the bounding box spanned by the input geometry.
    pub fn bounding_box_center(&self) -> Option<Point> {
        bounding_box_center(self.nodes.iter().map(|n| (n.x, n.y, n.width, n.height)))
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Current center position; algorithms use it only to keep the overall center in place.
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    pub positions: BTreeMap<String, Point>,
}

pub(crate) fn bounding_box_center(
    rects: impl Iterator<Item = (f64, f64, f64, f64)>,
) -> Option<Point> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut any = false;
    for (x, y, w, h) in rects {
        any = true;
        min_x = min_x.min(x - w / 2.0);
        min_y = min_y.min(y - h / 2.0);
        max_x = max_x.max(x + w / 2.0);
        max_y = max_y.max(y + h / 2.0);
    }
    any.then(|| Point {
        x: (min_x + max_x) / 2.0,
        y: (min_y + max_y) / 2.0,
    })
}

/// Translates `positions` so their bounding box is centered on the input graph's center.
pub(crate) fn relocate(graph: &Graph, positions: &mut BTreeMap<String, Point>) {
    let Some(orig) = graph.bounding_box_center() else {
        return;
    };
    let sizes: BTreeMap<&str, (f64, f64)> = graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), (n.width, n.height)))
        .collect();
    let Some(new) = bounding_box_center(positions.iter().map(|(id, p)| {
        let (w, h) = sizes.get(id.as_str()).copied().unwrap_or((0.0, 0.0));
        (p.x, p.y, w, h)
    })) else {
        return;
    };
    let (dx, dy) = (orig.x - new.x, orig.y - new.y);
    for p in positions.values_mut() {
        p.x += dx;
        p.y += dy;
    }
}
