//! Rank-direction adjustment.
//!
//! The pipeline works top-to-bottom. For `LR`/`RL` node boxes are rotated before layout and the
//! axes swapped afterwards; `BT`/`RL` mirror the rank axis.

use super::LayerGraph;
use crate::algo::RankDir;

pub(crate) fn adjust(g: &mut LayerGraph, rankdir: RankDir) {
    if rankdir.is_horizontal() {
        std::mem::swap(&mut g.width, &mut g.height);
    }
}

pub(crate) fn undo(coords: &mut [(f64, f64)], rankdir: RankDir) {
    if rankdir.is_reversed() {
        for c in coords.iter_mut() {
            c.1 = -c.1;
        }
    }
    if rankdir.is_horizontal() {
        for c in coords.iter_mut() {
            (c.0, c.1) = (c.1, c.0);
        }
    }
}
