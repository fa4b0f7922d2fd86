use furl::{EdgeData, EdgeKind, ElementGraph, Engine, EngineOptions, NodeData};

fn graph() -> ElementGraph {
    let mut g = ElementGraph::default();
    for id in ["X", "Y", "Z"] {
        g.set_node(id, NodeData::leaf(0.0, 0.0, 10.0, 10.0));
    }
    g.set_edge("e1", "X", "Y", EdgeData::labeled("uses"));
    g.set_edge("e2", "X", "Y", EdgeData::labeled("uses"));
    g.set_edge("e3", "X", "Z", EdgeData::labeled("uses"));
    g
}

#[test]
fn parallel_edges_fold_into_a_canonical_aggregate() {
    let mut engine = Engine::default().with_graph(graph());

    let r = engine.collapse_edges(&["e1", "e2"]);
    assert_eq!(r.edges, vec!["X_uses_Y".to_string()]);
    assert_eq!(r.old_edges, vec!["e1".to_string(), "e2".to_string()]);

    let agg = engine.graph().edge("X_uses_Y").unwrap();
    assert_eq!(agg.kind(), EdgeKind::Aggregate);
    let info = agg.aggregate.as_ref().unwrap();
    assert!(!info.bidirectional);
    assert_eq!(
        info.originals.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
        vec!["e1", "e2"]
    );
    assert!(!engine.graph().has_edge("e1"));

    let r = engine.expand_edges(&["X_uses_Y"]);
    assert_eq!(r.edges, vec!["e1".to_string(), "e2".to_string()]);
    assert_eq!(r.old_edges, vec!["X_uses_Y".to_string()]);
    assert_eq!(engine.graph().edge_ends("e2"), Some(("X", "Y")));
    assert!(!engine.graph().has_edge("X_uses_Y"));
}

#[test]
fn edges_over_several_pairs_are_left_alone() {
    let mut engine = Engine::default().with_graph(graph());
    let r = engine.collapse_edges(&["e1", "e3"]);
    assert!(r.is_empty());
    assert_eq!(engine.graph().edge_count(), 3);

    assert!(engine.collapse_edges(&["e1"]).is_empty());
    assert!(engine.expand_edges(&["e1"]).is_empty());
}

#[test]
fn mixed_labels_and_directions() {
    let mut g = graph();
    g.set_edge("e4", "Y", "X", EdgeData::labeled("feeds"));
    let mut engine = Engine::default().with_graph(g);

    let r = engine.collapse_edges(&["e1", "e4", "e2"]);
    assert_eq!(r.edges, vec!["X_uses|feeds_Y".to_string()]);
    let info = engine.graph().edge("X_uses|feeds_Y").unwrap().aggregate.clone().unwrap();
    assert!(info.bidirectional);
}

#[test]
fn aggregate_id_takes_a_suffix_when_taken() {
    let mut g = graph();
    g.set_edge("X_uses_Y", "X", "Y", EdgeData::labeled("uses"));
    let mut engine = Engine::default().with_graph(g);
    let r = engine.collapse_edges(&["e1", "e2"]);
    assert_eq!(r.edges, vec!["X_uses_Y#2".to_string()]);
}

#[test]
fn between_nodes_covers_self_loops() {
    let mut g = graph();
    g.set_edge("l1", "Z", "Z", EdgeData::labeled("self"));
    g.set_edge("l2", "Z", "Z", EdgeData::labeled("self"));
    let mut engine = Engine::default().with_graph(g);

    let r = engine.collapse_edges_between_nodes(&["X", "Y", "Z"]);
    assert_eq!(r.edges, vec!["X_uses_Y".to_string(), "Z_self_Z".to_string()]);
    assert_eq!(engine.graph().edge_count(), 3);

    let r = engine.expand_edges_between_nodes(&["Z"]);
    assert_eq!(r.edges, vec!["l1".to_string(), "l2".to_string()]);
    assert!(engine.graph().has_edge("X_uses_Y"));
}

#[test]
fn all_edges_round_trip() {
    let mut engine = Engine::default().with_graph(graph());
    let r = engine.collapse_all_edges();
    assert_eq!(r.edges.len(), 1);
    let r = engine.expand_all_edges();
    assert_eq!(r.edges.len(), 2);
    let mut ids = engine.graph().edge_ids();
    ids.sort();
    assert_eq!(ids, vec!["e1", "e2", "e3"]);
}

#[test]
fn nested_aggregates_follow_the_option() {
    let mut g = graph();
    g.set_edge("e5", "X", "Y", EdgeData::labeled("uses"));

    let mut nested = Engine::default().with_graph(g.clone());
    let first = nested.collapse_edges(&["e1", "e2"]);
    let r = nested.collapse_edges(&[first.edges[0].as_str(), "e5"]);
    let info = nested.graph().edge(&r.edges[0]).unwrap().aggregate.clone().unwrap();
    assert_eq!(info.originals.len(), 2);
    assert_eq!(info.originals[0].data.kind(), EdgeKind::Aggregate);

    let options = EngineOptions {
        allow_nested_edge_collapse: false,
        ..EngineOptions::default()
    };
    let mut flat = Engine::new(options).with_graph(g);
    let first = flat.collapse_edges(&["e1", "e2"]);
    let r = flat.collapse_edges(&[first.edges[0].as_str(), "e5"]);
    let info = flat.graph().edge(&r.edges[0]).unwrap().aggregate.clone().unwrap();
    assert_eq!(
        info.originals.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
        vec!["e1", "e2", "e5"]
    );
}
