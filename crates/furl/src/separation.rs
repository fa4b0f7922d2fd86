//! Rank separation pass for rank-based layouts.
//!
//! Rank-based solvers see containers as fixed boxes of whatever size they had at the time, so
//! after subtrees are restored ranks can crowd each other. This pass re-derives ranks from the
//! rank-axis coordinate and re-spaces them from true rendered sizes.

use crate::geom::{self, Point, Rect};
use crate::model::{ElementGraph, is_visible};
use furl_graph::alg;
use furl_layout::RankDir;
use std::collections::BTreeMap;

/// Coordinates closer than this share a rank.
const RANK_RESOLUTION: f64 = 1e-3;

#[derive(Debug, Clone, Copy)]
pub struct SeparationOptions {
    pub node_sep: f64,
    pub rank_sep: f64,
    pub rank_dir: RankDir,
    pub padding: f64,
}

pub fn adjust_separation(g: &mut ElementGraph, nodes: &[String], opts: &SeparationOptions) {
    let horizontal = opts.rank_dir.is_horizontal();
    let sign = if opts.rank_dir.is_reversed() { -1.0 } else { 1.0 };
    // (rank-axis center, cross-axis min, cross-axis max, rank-axis size)
    let along = |r: &Rect| -> (f64, f64, f64, f64) {
        let c = r.center();
        let s = r.size();
        if horizontal {
            (c.x, r.min_y, r.max_y, s.width)
        } else {
            (c.y, r.min_x, r.max_x, s.height)
        }
    };

    let mut ranks: BTreeMap<i64, Vec<(String, Rect)>> = BTreeMap::new();
    for id in alg::top_most(g, nodes) {
        if !is_visible(g, &id) {
            continue;
        }
        let Some(rect) = geom::bounding_box(g, &id, opts.padding) else {
            continue;
        };
        let key = (along(&rect).0 / RANK_RESOLUTION).round() as i64;
        ranks.entry(key).or_default().push((id, rect));
    }
    if ranks.len() < 2 && ranks.values().all(|r| r.len() < 2) {
        return;
    }

    let ordered: Vec<Vec<(String, Rect)>> = if opts.rank_dir.is_reversed() {
        ranks.into_values().rev().collect()
    } else {
        ranks.into_values().collect()
    };

    let mut far_edge: Option<f64> = None;
    for mut rank in ordered {
        let extent = rank
            .iter()
            .map(|(_, r)| along(r).3)
            .fold(0.0_f64, f64::max);
        let rank_center = match far_edge {
            None => along(&rank[0].1).0,
            Some(edge) => edge + sign * (opts.rank_sep + extent / 2.0),
        };
        far_edge = Some(rank_center + sign * extent / 2.0);

        rank.sort_by(|a, b| {
            let (_, a_min, a_max, _) = along(&a.1);
            let (_, b_min, b_max, _) = along(&b.1);
            (a_min + a_max).total_cmp(&(b_min + b_max))
        });
        let span_min = rank.iter().map(|(_, r)| along(r).1).fold(f64::INFINITY, f64::min);
        let span_max = rank
            .iter()
            .map(|(_, r)| along(r).2)
            .fold(f64::NEG_INFINITY, f64::max);
        let total: f64 = rank
            .iter()
            .map(|(_, r)| along(r).2 - along(r).1)
            .sum::<f64>()
            + opts.node_sep * (rank.len() as f64 - 1.0);

        let mut cursor = (span_min + span_max) / 2.0 - total / 2.0;
        for (id, rect) in rank {
            let (_, min, max, _) = along(&rect);
            let cross = cursor + (max - min) / 2.0;
            cursor += (max - min) + opts.node_sep;
            let target = if horizontal {
                Point::new(rank_center, cross)
            } else {
                Point::new(cross, rank_center)
            };
            geom::move_nodes(g, target - rect.center(), &[id]);
        }
    }
}
