//! Longest-path ranking.
//!
//! Nodes are pulled as close to their successors as possible (sinks get the highest rank), then
//! ranks are shifted so the smallest is `0`. Expects an acyclic edge set.

use super::LayerGraph;

pub(crate) fn longest_path(g: &LayerGraph) -> Vec<usize> {
    let out = g.out_neighbors();
    let inn = g.in_neighbors();
    let mut rank: Vec<Option<i64>> = vec![None; g.len()];
    let mut active = vec![false; g.len()];

    let sources = (0..g.len()).filter(|&v| inn[v].is_empty());
    // Anything left after the sources is unreachable from one only if the input still had a cycle.
    for root in sources.chain(0..g.len()) {
        visit(root, &out, &mut rank, &mut active);
    }

    let min = rank.iter().flatten().copied().min().unwrap_or(0);
    rank.into_iter()
        .map(|r| (r.unwrap_or(0) - min) as usize)
        .collect()
}

/// Post-order walk from `root` with an explicit stack; a node is ranked once all its
/// successors are.
fn visit(root: usize, out: &[Vec<usize>], rank: &mut [Option<i64>], active: &mut [bool]) {
    if rank[root].is_some() {
        return;
    }
    active[root] = true;
    let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
    while let Some(frame) = stack.last_mut() {
        let (v, next) = *frame;
        if let Some(&w) = out[v].get(next) {
            frame.1 += 1;
            if rank[w].is_none() && !active[w] {
                active[w] = true;
                stack.push((w, 0));
            }
            continue;
        }
        let r = out[v]
            .iter()
            .filter_map(|&w| rank[w])
            .map(|r| r - 1)
            .min()
            .unwrap_or(0);
        rank[v] = Some(r);
        active[v] = false;
        stack.pop();
    }
}
