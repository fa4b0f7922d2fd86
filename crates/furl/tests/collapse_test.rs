use furl::{
    EdgeData, EdgeKind, ElementGraph, Engine, EngineOptions, GraphSnapshot, NodeData, NodeKind,
    OperationOptions, Point,
};
use futures::executor::block_on;

fn leaf(x: f64, y: f64) -> NodeData {
    NodeData::leaf(x, y, 20.0, 20.0)
}

/// `c` holds `a` and `b`; `x` sits outside.
fn container_graph() -> ElementGraph {
    let mut g = ElementGraph::default();
    g.set_node("c", NodeData::leaf(0.0, 0.0, 40.0, 40.0).with_class("box"));
    g.set_node("a", leaf(0.0, 0.0).with_class("svc"));
    g.set_node("b", leaf(40.0, 0.0));
    g.set_node("x", leaf(200.0, 0.0));
    g.set_parent("a", "c");
    g.set_parent("b", "c");
    g.set_edge("a_calls_b", "a", "b", EdgeData::labeled("calls"));
    g.set_edge("e_ax", "a", "x", EdgeData::labeled("uses"));
    g.set_edge("e_bx", "b", "x", EdgeData::labeled("uses"));
    g.set_edge("c_owns_a", "c", "a", EdgeData::labeled("owns"));
    g.set_edge("x_pings_c", "x", "c", EdgeData::labeled("pings"));
    g
}

fn kind(engine: &Engine, id: &str) -> Option<NodeKind> {
    furl::model::node_kind(engine.graph(), id)
}

#[test]
fn collapse_then_expand_reproduces_the_graph() {
    let before = GraphSnapshot::capture(&container_graph()).normalized();
    let mut engine = Engine::default().with_graph(container_graph());
    let opts = OperationOptions::default();

    let collapsed = block_on(engine.collapse(&["c"], &opts)).unwrap();
    assert_eq!(collapsed.collapsed, vec!["c".to_string()]);
    assert_eq!(collapsed.hidden_nodes, vec!["a".to_string(), "b".to_string()]);
    // Both boundary edges reduce to the same replacement.
    assert_eq!(collapsed.remapped_edges, vec!["c_uses_x".to_string()]);
    assert_eq!(kind(&engine, "c"), Some(NodeKind::CollapsedContainer));
    assert!(!engine.graph().has_node("a"));
    assert!(!engine.graph().has_edge("c_owns_a"));
    assert!(engine.graph().has_edge("x_pings_c"));
    assert_eq!(engine.graph().edge_ends("c_uses_x"), Some(("c", "x")));

    let sub = engine.collapsed_children("c").unwrap();
    assert_eq!(sub.edges.len(), 4);
    assert_eq!(sub.remapped.iter().filter(|r| r.created).count(), 1);

    let expanded = block_on(engine.expand(&["c"], &opts)).unwrap();
    assert_eq!(expanded.expanded, vec!["c".to_string()]);
    let after = GraphSnapshot::capture(engine.graph()).normalized();
    assert_eq!(after, before);
}

#[test]
fn expand_follows_the_collapsed_node() {
    let mut engine = Engine::default().with_graph(container_graph());
    let opts = OperationOptions::default();
    block_on(engine.collapse(&["c"], &opts)).unwrap();

    // The collapsed node sits at the center of its former contents.
    assert_eq!(engine.graph().node("c").unwrap().position, Point::new(20.0, 0.0));
    engine.graph_mut().node_mut("c").unwrap().position = Point::new(120.0, 50.0);

    block_on(engine.expand(&["c"], &opts)).unwrap();
    assert_eq!(engine.graph().node("a").unwrap().position, Point::new(100.0, 50.0));
    assert_eq!(engine.graph().node("b").unwrap().position, Point::new(140.0, 50.0));
}

#[test]
fn ineligible_nodes_are_ignored() {
    let mut engine = Engine::default().with_graph(container_graph());
    let opts = OperationOptions::default();
    let r = block_on(engine.collapse(&["a", "missing"], &opts)).unwrap();
    assert!(r.is_empty());
    let r = block_on(engine.expand(&["c"], &opts)).unwrap();
    assert!(r.is_empty());
    assert!(engine.is_collapsible("c"));
    assert!(!engine.is_expandable("c"));
}

/// `A ⊃ B ⊃ C`.
fn chain() -> ElementGraph {
    let mut g = ElementGraph::default();
    g.set_node("A", NodeData::leaf(0.0, 0.0, 60.0, 60.0));
    g.set_node("B", NodeData::leaf(0.0, 0.0, 40.0, 40.0));
    g.set_node("C", leaf(0.0, 0.0));
    g.set_parent("B", "A");
    g.set_parent("C", "B");
    g
}

#[test]
fn recursive_collapse_nests_snapshots() {
    let mut engine = Engine::default().with_graph(chain());
    let opts = OperationOptions::default();

    let r = block_on(engine.collapse_recursively(&["A"], &opts)).unwrap();
    assert_eq!(r.collapsed, vec!["B".to_string(), "A".to_string()]);
    assert_eq!(engine.graph().node_count(), 1);

    let nested: Vec<&str> = engine
        .collapsed_children_recursively("A")
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(nested, vec!["B", "C"]);
    assert_eq!(engine.all_collapsed_children_recursively().len(), 2);

    // One level at a time: B comes back still collapsed, with C intact inside it.
    block_on(engine.expand(&["A"], &opts)).unwrap();
    assert_eq!(engine.graph().parent("B"), Some("A"));
    assert_eq!(kind(&engine, "B"), Some(NodeKind::CollapsedContainer));
    let inner = engine.collapsed_children("B").unwrap();
    assert_eq!(inner.nodes.len(), 1);
    assert_eq!(inner.nodes[0].id, "C");
    assert_eq!(inner.nodes[0].parent.as_deref(), Some("B"));

    block_on(engine.expand(&["B"], &opts)).unwrap();
    assert_eq!(engine.graph().parent("C"), Some("B"));
    assert_eq!(
        GraphSnapshot::capture(engine.graph()).normalized(),
        GraphSnapshot::capture(&chain()).normalized()
    );
}

#[test]
fn expand_recursively_restores_every_level() {
    let mut engine = Engine::default().with_graph(chain());
    let opts = OperationOptions::default();
    block_on(engine.collapse_all(&opts)).unwrap();
    assert!(engine.is_expandable("A"));

    let r = block_on(engine.expand_recursively(&["A"], &opts)).unwrap();
    assert_eq!(r.expanded, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(engine.graph().parent("C"), Some("B"));
    assert_eq!(engine.graph().parent("B"), Some("A"));
    assert!(engine.all_collapsed_children_recursively().is_empty());
}

/// `P ⊃ p1`, `Q ⊃ q1`, edge `p1 -> q1`.
fn two_containers() -> ElementGraph {
    let mut g = ElementGraph::default();
    g.set_node("P", NodeData::default());
    g.set_node("Q", NodeData::default());
    g.set_node("p1", leaf(0.0, 0.0));
    g.set_node("q1", leaf(100.0, 0.0));
    g.set_parent("p1", "P");
    g.set_parent("q1", "Q");
    g.set_edge("p1_x_q1", "p1", "q1", EdgeData::labeled("x"));
    g
}

#[test]
fn edges_follow_endpoints_between_collapsed_nodes() {
    let original = GraphSnapshot::capture(&two_containers()).normalized();
    let mut engine = Engine::default().with_graph(two_containers());
    let opts = OperationOptions::default();

    block_on(engine.collapse(&["P"], &opts)).unwrap();
    assert!(engine.graph().has_edge("P_x_q1"));
    block_on(engine.collapse(&["Q"], &opts)).unwrap();
    assert!(!engine.graph().has_edge("P_x_q1"));
    assert_eq!(engine.graph().edge_ends("P_x_Q"), Some(("P", "Q")));

    // P's replacement was swallowed by Q; expanding P retires it and reroutes onto Q.
    block_on(engine.expand(&["P"], &opts)).unwrap();
    assert!(!engine.graph().has_edge("P_x_Q"));
    assert_eq!(engine.graph().edge_ends("p1_x_Q"), Some(("p1", "Q")));
    assert_eq!(engine.graph().edge_count(), 1);

    block_on(engine.expand(&["Q"], &opts)).unwrap();
    assert_eq!(GraphSnapshot::capture(engine.graph()).normalized(), original);
}

#[test]
fn same_type_edges_are_grouped_on_collapse() {
    let mut g = container_graph();
    g.set_edge("k", "c", "x", EdgeData::labeled("uses"));
    let original = GraphSnapshot::capture(&g).normalized();
    let mut engine = Engine::default().with_graph(g);
    let opts = OperationOptions {
        group_edges_of_same_type: Some(true),
        ..OperationOptions::default()
    };

    let r = block_on(engine.collapse(&["c"], &opts)).unwrap();
    assert_eq!(r.grouped_edges.len(), 1);
    let aggregate = engine.graph().edge(&r.grouped_edges[0]).unwrap();
    assert_eq!(aggregate.kind(), EdgeKind::Aggregate);
    assert_eq!(aggregate.label, "uses");
    assert!(!engine.graph().has_edge("k"));

    // The replacement is inside the aggregate; expansion digs it out.
    block_on(engine.expand(&["c"], &OperationOptions::default())).unwrap();
    assert_eq!(GraphSnapshot::capture(engine.graph()).normalized(), original);
}

#[test]
fn engine_options_enable_grouping_by_default() {
    let mut g = container_graph();
    g.set_edge("k", "x", "c", EdgeData::labeled("uses"));
    let options = EngineOptions {
        group_edges_of_same_type_on_collapse: true,
        ..EngineOptions::default()
    };
    let mut engine = Engine::new(options).with_graph(g);
    let r = block_on(engine.collapse(&["c"], &OperationOptions::default())).unwrap();
    assert_eq!(r.grouped_edges.len(), 1);
    let info = engine
        .graph()
        .edge(&r.grouped_edges[0])
        .and_then(|e| e.aggregate.clone())
        .unwrap();
    assert!(info.bidirectional);
    assert_eq!(info.originals.len(), 2);
}
