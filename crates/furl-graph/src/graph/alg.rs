//! Compound-tree helpers.
//!
//! Parent links are plain data and nothing stops a caller from wiring a cycle, so every walk up
//! the tree carries a visited guard.

use super::Graph;
use std::collections::BTreeSet;

/// All descendants of `v` in pre-order (parents before their children), excluding `v`.
pub fn descendants<N, E>(g: &Graph<N, E>, v: &str) -> Vec<String>
where
    N: Default,
    E: Default,
{
    let mut out: Vec<String> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    seen.insert(v.to_string());
    let mut stack: Vec<String> = g.children(v).iter().rev().map(|c| c.to_string()).collect();
    while let Some(n) = stack.pop() {
        if !seen.insert(n.clone()) {
            continue;
        }
        for c in g.children(&n).iter().rev() {
            stack.push(c.to_string());
        }
        out.push(n);
    }
    out
}

/// Parent chain of `v`, nearest first. Stops early if the chain loops.
pub fn ancestors<N, E>(g: &Graph<N, E>, v: &str) -> Vec<String>
where
    N: Default,
    E: Default,
{
    let mut out: Vec<String> = Vec::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    seen.insert(v);
    let mut cur = g.parent(v);
    while let Some(p) = cur {
        if !seen.insert(p) {
            break;
        }
        out.push(p.to_string());
        cur = g.parent(p);
    }
    out
}

/// Whether `ancestor` appears on the parent chain of `v`.
pub fn is_descendant_of<N, E>(g: &Graph<N, E>, v: &str, ancestor: &str) -> bool
where
    N: Default,
    E: Default,
{
    ancestors(g, v).iter().any(|a| a == ancestor)
}

/// The members of `set` that have no ancestor also in `set`, in input order.
pub fn top_most<N, E>(g: &Graph<N, E>, set: &[String]) -> Vec<String>
where
    N: Default,
    E: Default,
{
    let members: BTreeSet<&str> = set.iter().map(|s| s.as_str()).collect();
    set.iter()
        .filter(|v| {
            !ancestors(g, v)
                .iter()
                .any(|a| members.contains(a.as_str()))
        })
        .cloned()
        .collect()
}

/// Pre-order walk of the compound tree starting from `roots` (roots included).
pub fn preorder<N, E>(g: &Graph<N, E>, roots: &[&str]) -> Vec<String>
where
    N: Default,
    E: Default,
{
    let mut out: Vec<String> = Vec::new();
    for r in roots {
        if !g.has_node(r) || out.iter().any(|o| o == r) {
            continue;
        }
        out.push(r.to_string());
        out.extend(descendants(g, r));
    }
    out
}
