use furl::geom::bounding_box;
use furl::reconcile::{ReconcileOptions, resolve_overlap};
use furl::{
    BuiltinSolver, EdgeData, ElementGraph, Engine, EngineState, Error, HeadlessSurface,
    LayoutGraph, LayoutSolver, NamedOptions, NodeData, NodeRole, RenderSurface, Result,
};
use futures::executor::block_on;
use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::rc::Rc;

const PADDING: f64 = 10.0;

fn leaf() -> NodeData {
    NodeData::leaf(0.0, 0.0, 20.0, 20.0)
}

/// `P ⊃ {p1, p2}`, `Q ⊃ {q1}` and a loose `r`, all piled on the origin.
fn piled() -> ElementGraph {
    let mut g = ElementGraph::default();
    for id in ["P", "Q"] {
        g.set_node(id, NodeData::default());
    }
    for id in ["r", "p1", "p2", "q1"] {
        g.set_node(id, leaf());
    }
    g.set_parent("p1", "P");
    g.set_parent("p2", "P");
    g.set_parent("q1", "Q");
    g.set_edge("p1_to_r", "p1", "r", EdgeData::default());
    g.set_edge("q1_to_r", "q1", "r", EdgeData::default());
    g
}

#[derive(Default)]
struct Recording {
    inner: BuiltinSolver,
    calls: Rc<RefCell<Vec<Vec<String>>>>,
    edges: Rc<RefCell<Vec<Vec<(String, String)>>>>,
}

impl LayoutSolver for Recording {
    fn run<'a>(
        &'a self,
        graph: &'a mut LayoutGraph,
        options: &'a NamedOptions,
    ) -> LocalBoxFuture<'a, Result<()>> {
        self.calls
            .borrow_mut()
            .push(graph.nodes.iter().map(|n| n.id.clone()).collect());
        self.edges.borrow_mut().push(
            graph
                .edges
                .iter()
                .map(|e| (e.source.clone(), e.target.clone()))
                .collect(),
        );
        self.inner.run(graph, options)
    }
}

struct Failing;

impl LayoutSolver for Failing {
    fn run<'a>(
        &'a self,
        _graph: &'a mut LayoutGraph,
        _options: &'a NamedOptions,
    ) -> LocalBoxFuture<'a, Result<()>> {
        async {
            Err(Error::Solver {
                message: "no layout today".to_string(),
            })
        }
        .boxed_local()
    }
}

fn assert_disjoint(g: &ElementGraph, ids: &[&str]) {
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let ra = bounding_box(g, a, PADDING).unwrap();
            let rb = bounding_box(g, b, PADDING).unwrap();
            assert!(!ra.overlaps(&rb), "{a} overlaps {b}: {ra:?} / {rb:?}");
        }
    }
}

#[test]
fn siblings_do_not_overlap_after_relayout() {
    let mut engine = Engine::default().with_graph(piled());
    let positions = block_on(engine.relayout(&NamedOptions::named("grid"))).unwrap();

    let mut positioned: Vec<&str> = positions.keys().map(String::as_str).collect();
    positioned.sort();
    assert_eq!(positioned, vec!["p1", "p2", "q1", "r"]);

    assert_disjoint(engine.graph(), &["P", "Q", "r"]);
    assert_disjoint(engine.graph(), &["p1", "p2"]);
}

#[test]
fn solver_runs_once_per_sibling_group_deepest_first() {
    let solver = Recording::default();
    let calls = solver.calls.clone();
    let mut engine = Engine::default().with_graph(piled()).with_solver(solver);
    block_on(engine.relayout(&NamedOptions::named("grid"))).unwrap();

    let calls = calls.borrow();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], vec!["p1", "p2"]);
    assert_eq!(calls[1], vec!["q1"]);
    assert_eq!(calls[2].len(), 3);
    assert!(calls[2].iter().any(|id| id == "r"));
    assert!(calls[2].iter().all(|id| id != "P" && id != "Q"));
}

#[test]
fn boundary_edges_reach_the_solver_once_per_pair() {
    let mut g = ElementGraph::default();
    g.set_node("P", NodeData::default());
    for id in ["p1", "p2", "x"] {
        g.set_node(id, leaf());
    }
    g.set_parent("p1", "P");
    g.set_parent("p2", "P");
    g.set_edge("a", "p1", "x", EdgeData::default());
    g.set_edge("b", "p2", "x", EdgeData::default());
    g.set_edge("c", "x", "p1", EdgeData::default());

    let solver = Recording::default();
    let edges = solver.edges.clone();
    let mut engine = Engine::default().with_graph(g).with_solver(solver);
    block_on(engine.relayout(&NamedOptions::named("dagre"))).unwrap();

    let edges = edges.borrow();
    assert_eq!(edges.len(), 2);
    for call in edges.iter() {
        let mut pairs: Vec<(&str, &str)> = call
            .iter()
            .map(|(s, t)| {
                if s <= t {
                    (s.as_str(), t.as_str())
                } else {
                    (t.as_str(), s.as_str())
                }
            })
            .collect();
        let n = pairs.len();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), n, "repeated pair in {call:?}");
    }
    assert!(edges[0].is_empty());
    assert_eq!(edges[1].len(), 1);
    let (s, t) = &edges[1][0];
    assert!(
        (s.starts_with("P::placeholder#") && t == "x") || (s == "x" && t.starts_with("P::placeholder#")),
        "unexpected boundary edge {s} -> {t}"
    );

    let mut ids = engine.graph().edge_ids();
    ids.sort();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(engine.graph().edge_ends("c"), Some(("x", "p1")));
}

#[test]
fn user_nodes_named_like_placeholders_survive_relayout() {
    let mut g = piled();
    g.set_node("P::placeholder#1", NodeData::leaf(0.0, 0.0, 30.0, 30.0));
    g.set_edge("to_lookalike", "p2", "P::placeholder#1", EdgeData::default());

    let solver = Recording::default();
    let calls = solver.calls.clone();
    let mut engine = Engine::default().with_graph(g).with_solver(solver);
    let positions = block_on(engine.relayout(&NamedOptions::named("grid"))).unwrap();

    let top = calls.borrow().last().cloned().unwrap();
    assert_eq!(top.iter().filter(|id| *id == "P::placeholder#1").count(), 1);
    assert!(top.iter().any(|id| id.starts_with("P::placeholder#") && id != "P::placeholder#1"));

    let lookalike = engine.graph().node("P::placeholder#1").unwrap();
    assert_eq!((lookalike.size.width, lookalike.size.height), (30.0, 30.0));
    assert_eq!(lookalike.role, NodeRole::default());
    assert!(positions.contains_key("P::placeholder#1"));
    assert_eq!(
        engine.graph().edge_ends("to_lookalike"),
        Some(("p2", "P::placeholder#1"))
    );
    assert_disjoint(engine.graph(), &["P", "Q", "r", "P::placeholder#1"]);
}

#[test]
fn layered_layout_keeps_rank_separation_for_containers() {
    let mut g = ElementGraph::default();
    g.set_node("P", NodeData::default());
    for id in ["a1", "a2", "r"] {
        g.set_node(id, leaf());
    }
    g.set_parent("a1", "P");
    g.set_parent("a2", "P");
    g.set_edge("a1_to_r", "a1", "r", EdgeData::default());

    let mut engine = Engine::default().with_graph(g);
    let layout = NamedOptions::named("dagre")
        .with("nodeSep", 50.0)
        .with("rankSep", 50.0);
    block_on(engine.relayout(&layout)).unwrap();

    let p = bounding_box(engine.graph(), "P", PADDING).unwrap();
    let r = bounding_box(engine.graph(), "r", PADDING).unwrap();
    assert!((r.min_y - p.max_y - 50.0).abs() < 1e-9);
    assert_eq!(p.size().width, 110.0);
}

#[test]
fn shadow_is_released_when_the_solver_fails() {
    let surface = Rc::new(RefCell::new(HeadlessSurface::default()));
    let mut engine = Engine::default()
        .with_graph(piled())
        .with_solver(Failing)
        .with_surface(Some(Box::new(surface.clone())));

    let err = block_on(engine.relayout(&NamedOptions::named("grid"))).unwrap_err();
    assert!(matches!(err, Error::Solver { .. }));
    let s = *surface.borrow();
    assert_eq!((s.mounts, s.unmounts, s.mounted), (1, 1, 0));
    // The real graph was never touched.
    assert_eq!(engine.graph().node("p1").unwrap().position, leaf().position);
}

#[test]
fn compound_relayout_needs_a_surface() {
    let mut engine = Engine::default().with_graph(piled()).with_surface(None);
    let err = block_on(engine.relayout(&NamedOptions::named("grid"))).unwrap_err();
    assert!(matches!(err, Error::MissingRenderSurface));

    let mut flat = ElementGraph::default();
    flat.set_node("a", leaf());
    flat.set_node("b", leaf());
    let mut engine = Engine::default().with_graph(flat).with_surface(None);
    let positions = block_on(engine.relayout(&NamedOptions::named("grid"))).unwrap();
    assert_eq!(positions.len(), 2);
    assert_ne!(positions["a"], positions["b"]);
}

#[test]
fn graphs_with_placeholders_are_not_reconciled() {
    let mut g = piled();
    g.set_node(
        "stale",
        NodeData {
            role: NodeRole::Placeholder,
            ..leaf()
        },
    );
    let mut surface = HeadlessSurface::default();
    let mut state = EngineState::default();
    let opts = ReconcileOptions {
        padding: PADDING,
        adjust_separation: true,
    };
    let positions = block_on(resolve_overlap(
        &g,
        Some(&mut surface as &mut dyn RenderSurface),
        &BuiltinSolver,
        &NamedOptions::named("grid"),
        opts,
        &mut state,
    ))
    .unwrap();
    assert!(positions.is_empty());
    assert_eq!((surface.mounts, surface.unmounts), (1, 1));
}

#[test]
fn unknown_layout_names_fail() {
    let mut engine = Engine::default().with_graph(piled());
    let err = block_on(engine.relayout(&NamedOptions::named("cose-bilkent"))).unwrap_err();
    assert!(matches!(err, Error::Layout(_)));
}
