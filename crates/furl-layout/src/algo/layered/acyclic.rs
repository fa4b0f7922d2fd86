//! Break cycles by reversing the back edges found by a DFS in node order.

use super::LayerGraph;
use rustc_hash::FxHashSet;

pub(crate) fn run(g: &mut LayerGraph) {
    let out = g.out_neighbors();
    let mut visited = vec![false; g.len()];
    let mut on_stack = vec![false; g.len()];
    let mut back: FxHashSet<(usize, usize)> = FxHashSet::default();

    // Explicit `(node, next out-neighbor)` frames; long chains would overflow the call stack.
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for root in 0..g.len() {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        on_stack[root] = true;
        stack.push((root, 0));
        while let Some(frame) = stack.last_mut() {
            let (v, next) = *frame;
            let Some(&w) = out[v].get(next) else {
                on_stack[v] = false;
                stack.pop();
                continue;
            };
            frame.1 += 1;
            if on_stack[w] {
                back.insert((v, w));
            } else if !visited[w] {
                visited[w] = true;
                on_stack[w] = true;
                stack.push((w, 0));
            }
        }
    }

    if back.is_empty() {
        return;
    }
    for e in &mut g.edges {
        if back.contains(&*e) {
            *e = (e.1, e.0);
        }
    }
}
