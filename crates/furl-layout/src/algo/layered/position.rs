//! Coordinate assignment in the top-to-bottom frame.
//!
//! Each rank is as tall as its tallest member; ranks are stacked with `ranksep` between their
//! facing edges. Members of a rank are packed left to right with `nodesep` gaps and centered on
//! `x = 0`.

use super::LayerGraph;

pub(crate) fn position(
    g: &LayerGraph,
    layers: &[Vec<usize>],
    nodesep: f64,
    ranksep: f64,
) -> Vec<(f64, f64)> {
    let mut coords = vec![(0.0, 0.0); g.len()];
    let mut prev_bottom: Option<f64> = None;

    for layer in layers {
        if layer.is_empty() {
            continue;
        }
        let rank_height = layer.iter().map(|&v| g.height[v]).fold(0.0, f64::max);
        let y = match prev_bottom {
            Some(bottom) => bottom + ranksep + rank_height / 2.0,
            None => rank_height / 2.0,
        };
        prev_bottom = Some(y + rank_height / 2.0);

        let total: f64 = layer.iter().map(|&v| g.width[v]).sum::<f64>()
            + nodesep * (layer.len() - 1) as f64;
        let mut cursor = -total / 2.0;
        for &v in layer {
            let w = g.width[v];
            coords[v] = (cursor + w / 2.0, y);
            cursor += w + nodesep;
        }
    }
    coords
}
