use crate::algo::GridOptions;
use crate::graph::{Graph, LayoutResult, Point, relocate};
use std::collections::BTreeMap;

pub fn layout(graph: &Graph, opts: &GridOptions) -> LayoutResult {
    let n = graph.nodes.len();
    if n == 0 {
        return LayoutResult::default();
    }

    let cols = opts
        .cols
        .unwrap_or_else(|| (n as f64).sqrt().ceil() as usize)
        .clamp(1, n);
    let spacing = opts.spacing.max(0.0);
    let cell_w = graph.nodes.iter().map(|n| n.width).fold(0.0, f64::max) + spacing;
    let cell_h = graph.nodes.iter().map(|n| n.height).fold(0.0, f64::max) + spacing;

    let mut positions: BTreeMap<String, Point> = BTreeMap::new();
    for (idx, node) in graph.nodes.iter().enumerate() {
        let row = idx / cols;
        let col = idx % cols;
        positions.insert(
            node.id.clone(),
            Point {
                x: col as f64 * cell_w + cell_w / 2.0,
                y: row as f64 * cell_h + cell_h / 2.0,
            },
        );
    }

    relocate(graph, &mut positions);
    LayoutResult { positions }
}
