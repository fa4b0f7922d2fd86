//! Crossing reduction.
//!
//! Layers start in input order; alternating down/up barycenter sweeps reorder them and the order
//! with the fewest crossings seen so far is kept.

use super::LayerGraph;

const SWEEPS: usize = 4;

pub(crate) fn order(g: &LayerGraph, ranks: &[usize]) -> Vec<Vec<usize>> {
    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    for (v, &r) in ranks.iter().enumerate() {
        layers[r].push(v);
    }

    let out = g.out_neighbors();
    let inn = g.in_neighbors();
    let mut best = layers.clone();
    let mut best_cc = cross_count(&layers, &out);

    for i in 0..SWEEPS {
        if best_cc == 0 {
            break;
        }
        if i % 2 == 0 {
            for r in 1..layers.len() {
                let (fixed, movable) = layers.split_at_mut(r);
                sort_by_barycenter(&mut movable[0], &fixed[r - 1], &inn);
            }
        } else {
            for r in (0..layers.len().saturating_sub(1)).rev() {
                let (movable, fixed) = layers.split_at_mut(r + 1);
                sort_by_barycenter(&mut movable[r], &fixed[0], &out);
            }
        }
        let cc = cross_count(&layers, &out);
        if cc < best_cc {
            best_cc = cc;
            best = layers.clone();
        }
    }
    best
}

fn sort_by_barycenter(layer: &mut [usize], fixed: &[usize], neighbors: &[Vec<usize>]) {
    let pos_of = |v: usize| fixed.iter().position(|&u| u == v);
    let mut keyed: Vec<(f64, usize, usize)> = layer
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let adj: Vec<f64> = neighbors[v]
                .iter()
                .filter_map(|&u| pos_of(u))
                .map(|p| p as f64)
                .collect();
            let bc = if adj.is_empty() {
                i as f64
            } else {
                adj.iter().sum::<f64>() / adj.len() as f64
            };
            (bc, i, v)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    for (slot, (_, _, v)) in layer.iter_mut().zip(keyed) {
        *slot = v;
    }
}

/// Crossings between consecutive layers, counting only edges spanning exactly one rank.
fn cross_count(layers: &[Vec<usize>], out: &[Vec<usize>]) -> usize {
    let mut total = 0;
    for pair in layers.windows(2) {
        let (north, south) = (&pair[0], &pair[1]);
        let mut segs: Vec<(usize, usize)> = Vec::new();
        for (ni, &v) in north.iter().enumerate() {
            for &w in &out[v] {
                if let Some(si) = south.iter().position(|&u| u == w) {
                    segs.push((ni, si));
                }
            }
        }
        for (i, a) in segs.iter().enumerate() {
            for b in &segs[i + 1..] {
                if (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1) {
                    total += 1;
                }
            }
        }
    }
    total
}
