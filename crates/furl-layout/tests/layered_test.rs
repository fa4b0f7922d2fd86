use furl_layout::{Algorithm, Edge, Graph, LayeredOptions, Node, RankDir, layout};

fn node(id: &str, w: f64, h: f64) -> Node {
    Node {
        id: id.to_string(),
        width: w,
        height: h,
        x: 0.0,
        y: 0.0,
    }
}

fn edge(v: &str, w: &str) -> Edge {
    Edge {
        id: format!("{v}->{w}"),
        source: v.to_string(),
        target: w.to_string(),
    }
}

fn run(graph: &Graph, rankdir: RankDir) -> std::collections::BTreeMap<String, (f64, f64)> {
    let result = layout(
        graph,
        &Algorithm::Layered(LayeredOptions {
            rankdir,
            nodesep: 10.0,
            ranksep: 20.0,
        }),
    )
    .unwrap();
    result
        .positions
        .into_iter()
        .map(|(k, p)| (k, (p.x, p.y)))
        .collect()
}

#[test]
fn layered_stacks_a_chain_top_to_bottom() {
    let graph = Graph {
        nodes: vec![node("a", 40.0, 20.0), node("b", 40.0, 30.0)],
        edges: vec![edge("a", "b")],
    };
    let pos = run(&graph, RankDir::TB);
    assert_eq!(pos["a"].0, pos["b"].0);
    // 10 (half of a) + 20 (ranksep) + 15 (half of b)
    assert_eq!(pos["b"].1 - pos["a"].1, 45.0);
}

#[test]
fn layered_bottom_to_top_mirrors_the_rank_axis() {
    let graph = Graph {
        nodes: vec![node("a", 40.0, 20.0), node("b", 40.0, 30.0)],
        edges: vec![edge("a", "b")],
    };
    let pos = run(&graph, RankDir::BT);
    assert_eq!(pos["a"].1 - pos["b"].1, 45.0);
}

#[test]
fn layered_left_to_right_uses_widths_on_the_rank_axis() {
    let graph = Graph {
        nodes: vec![node("a", 40.0, 20.0), node("b", 60.0, 20.0)],
        edges: vec![edge("a", "b")],
    };
    let pos = run(&graph, RankDir::LR);
    assert_eq!(pos["a"].1, pos["b"].1);
    // 20 + 20 + 30
    assert_eq!(pos["b"].0 - pos["a"].0, 70.0);
}

#[test]
fn layered_separates_nodes_on_the_same_rank() {
    let graph = Graph {
        nodes: vec![node("r", 10.0, 10.0), node("x", 30.0, 10.0), node("y", 50.0, 10.0)],
        edges: vec![edge("r", "x"), edge("r", "y")],
    };
    let pos = run(&graph, RankDir::TB);
    assert_eq!(pos["x"].1, pos["y"].1);
    let gap = (pos["y"].0 - 25.0) - (pos["x"].0 + 15.0);
    assert!((gap - 10.0).abs() < 1e-9);
}

#[test]
fn layered_tolerates_cycles() {
    let graph = Graph {
        nodes: vec![node("a", 10.0, 10.0), node("b", 10.0, 10.0), node("c", 10.0, 10.0)],
        edges: vec![edge("a", "b"), edge("b", "c"), edge("c", "a"), edge("a", "a")],
    };
    let pos = run(&graph, RankDir::TB);
    assert_eq!(pos.len(), 3);
    assert!(pos["a"].1 < pos["b"].1);
    assert!(pos["b"].1 < pos["c"].1);
}

#[test]
fn long_chains_are_ranked_without_deep_recursion() {
    const N: usize = 20_000;
    let ids: Vec<String> = (0..N).map(|i| format!("n{i}")).collect();
    let graph = Graph {
        nodes: ids.iter().map(|id| node(id, 10.0, 10.0)).collect(),
        edges: ids.windows(2).map(|w| edge(&w[0], &w[1])).collect(),
    };
    let pos = run(&graph, RankDir::TB);
    assert_eq!(pos.len(), N);
    // Every rank is 10 tall with a 20 gap.
    assert_eq!(pos["n1"].1 - pos["n0"].1, 30.0);
    assert_eq!(pos[&ids[N - 1]].1 - pos["n0"].1, 30.0 * (N - 1) as f64);
}

#[test]
fn chains_closing_a_cycle_are_still_laid_out() {
    let graph = Graph {
        nodes: vec![node("a", 10.0, 10.0), node("b", 10.0, 10.0), node("c", 10.0, 10.0)],
        edges: vec![edge("a", "b"), edge("b", "c"), edge("c", "a")],
    };
    let pos = run(&graph, RankDir::TB);
    assert!(pos["a"].1 < pos["b"].1 && pos["b"].1 < pos["c"].1);
}
