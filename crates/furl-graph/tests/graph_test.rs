use furl_graph::{Graph, GraphOptions, alg};

fn chain() -> Graph<(), ()> {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_parent("b", "a");
    g.set_parent("c", "b");
    g.set_parent("d", "a");
    g
}

#[test]
fn parallel_edges_are_distinguished_by_id() {
    let mut g: Graph<(), &str> = Graph::default();
    g.set_edge("e1", "x", "y", "uses");
    g.set_edge("e2", "x", "y", "uses");
    g.set_edge("e3", "y", "x", "calls");

    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.edges_between("x", "y"), vec!["e1", "e2", "e3"]);
    assert_eq!(g.edges_between("y", "x"), vec!["e1", "e2", "e3"]);
    assert_eq!(g.edge("e3"), Some(&"calls"));
    assert_eq!(g.edge_ends("e3"), Some(("y", "x")));
}

#[test]
fn non_multigraph_ignores_second_edge_between_same_pair() {
    let mut g: Graph<(), ()> = Graph::new(GraphOptions {
        multigraph: false,
        ..Default::default()
    });
    g.set_edge("e1", "x", "y", ());
    g.set_edge("e2", "x", "y", ());
    g.set_edge("e3", "y", "x", ());

    assert_eq!(g.edge_ids(), vec!["e1", "e3"]);
}

#[test]
fn setting_an_existing_edge_id_replaces_only_the_label() {
    let mut g: Graph<(), i32> = Graph::default();
    g.set_edge("e", "a", "b", 1);
    g.set_edge("e", "c", "d", 2);

    assert_eq!(g.edge_ends("e"), Some(("a", "b")));
    assert_eq!(g.edge("e"), Some(&2));
    assert!(!g.has_node("c"));
}

#[test]
fn node_edges_list_self_loops_once_and_follow_mutations() {
    let mut g: Graph<(), ()> = Graph::default();
    g.set_edge("loop", "a", "a", ());
    g.set_edge("ab", "a", "b", ());
    assert_eq!(g.node_edges("a"), vec!["loop", "ab"]);

    g.remove_edge("loop");
    assert_eq!(g.node_edges("a"), vec!["ab"]);
    assert_eq!(g.out_edges("a"), vec!["ab"]);
    assert_eq!(g.in_edges("b"), vec!["ab"]);
    assert!(g.in_edges("a").is_empty());
}

#[test]
fn remove_node_drops_incident_edges_and_detaches_children() {
    let mut g = chain();
    g.set_edge("bc", "b", "c", ());
    g.set_edge("ad", "a", "d", ());

    assert!(g.remove_node("b").is_some());
    assert!(!g.has_edge("bc"));
    assert!(g.has_edge("ad"));
    assert_eq!(g.parent("c"), None);
    assert_eq!(g.children("a"), vec!["d"]);
    assert!(g.remove_node("b").is_none());
}

#[test]
fn set_parent_moves_a_child_between_parents() {
    let mut g = chain();
    g.set_parent("c", "d");

    assert_eq!(g.parent("c"), Some("d"));
    assert!(!g.has_children("b"));
    assert_eq!(g.children("d"), vec!["c"]);
}

#[test]
fn descendants_are_listed_in_preorder() {
    let g = chain();
    assert_eq!(alg::descendants(&g, "a"), vec!["b", "c", "d"]);
    assert!(alg::descendants(&g, "c").is_empty());
    assert_eq!(alg::preorder(&g, &["b", "d"]), vec!["b", "c", "d"]);
}

#[test]
fn ancestors_walk_terminates_on_cycles() {
    let mut g = chain();
    assert_eq!(alg::ancestors(&g, "c"), vec!["b", "a"]);
    assert!(alg::is_descendant_of(&g, "c", "a"));

    g.set_parent("a", "c");
    assert_eq!(alg::ancestors(&g, "c"), vec!["b", "a"]);
}

#[test]
fn top_most_drops_members_with_an_ancestor_in_the_set() {
    let g = chain();
    let set = vec!["c".to_string(), "a".to_string(), "d".to_string()];
    assert_eq!(alg::top_most(&g, &set), vec!["a"]);

    let set = vec!["c".to_string(), "d".to_string()];
    assert_eq!(alg::top_most(&g, &set), vec!["c", "d"]);
}

#[test]
fn clone_is_independent_of_the_original() {
    let mut g = chain();
    g.set_edge("bc", "b", "c", ());
    let mut copy = g.clone();
    copy.remove_node("c");

    assert!(g.has_node("c"));
    assert_eq!(g.node_edges("b"), vec!["bc"]);
    assert!(copy.node_edges("b").is_empty());
}
