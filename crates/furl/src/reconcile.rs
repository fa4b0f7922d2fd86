//! Multi-level overlap resolution.
//!
//! A layout solver sees one sibling group at a time. Every expanded container in the group is
//! swapped for a placeholder box of the container's current size, the solver places the boxes,
//! and each container's subtree is put back and shifted by however far its placeholder moved.
//! Groups are processed deepest level first so a container's size is final before its own
//! siblings are placed. All of this happens on a [`ShadowGraph`]; only the resulting positions
//! leave this module.

use crate::collapse;
use crate::config::NamedOptions;
use crate::consolidate;
use crate::error::Result;
use crate::geom::{self, Point};
use crate::levels;
use crate::model::{ElementGraph, NodeData, NodeKind, StoredSubgraph, is_visible, node_kind};
use crate::separation::{self, SeparationOptions};
use crate::shadow::{RenderSurface, ShadowGraph};
use crate::solver::{self, LayoutGraph, LayoutSolver};
use crate::state::EngineState;
use furl_graph::alg;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy)]
pub struct ReconcileOptions {
    pub padding: f64,
    pub adjust_separation: bool,
}

/// A container swapped out for a placeholder during one group's layout.
struct Substitution {
    container: String,
    placeholder: String,
    before: Point,
    subtree: StoredSubgraph,
}

/// Lays out `graph` level by level and returns the new center of every positioned node.
///
/// Expanded containers are not in the result; their geometry follows from their children.
pub async fn resolve_overlap(
    graph: &ElementGraph,
    surface: Option<&mut dyn RenderSurface>,
    solver: &dyn LayoutSolver,
    layout: &NamedOptions,
    opts: ReconcileOptions,
    state: &mut EngineState,
) -> Result<BTreeMap<String, Point>> {
    let mut shadow = ShadowGraph::acquire(graph, surface)?;
    let g = shadow.graph_mut();
    if g.nodes().any(|n| node_kind(g, n) == Some(NodeKind::Placeholder)) {
        tracing::debug!("graph already holds placeholders; skipping reconciliation");
        return Ok(BTreeMap::new());
    }

    let separation = if opts.adjust_separation && solver::is_rank_based(layout) {
        let layered = solver::layered_options(layout)?;
        Some(SeparationOptions {
            node_sep: layered.nodesep,
            rank_sep: layered.ranksep,
            rank_dir: layered.rankdir,
            padding: opts.padding,
        })
    } else {
        None
    };

    let visible = visible_nodes(g);
    let levels = levels::classify(g, &visible)?;
    for level in &levels {
        tracing::trace!(depth = level.depth, groups = level.groups.len(), "reconciling level");
        for group in &level.groups {
            layout_group(g, &group.nodes, solver, layout, &opts, separation.as_ref(), state).await?;
        }
    }

    let positions = harvest(g);
    tracing::debug!(levels = levels.len(), positioned = positions.len(), "resolved overlap");
    Ok(positions)
}

async fn layout_group(
    g: &mut ElementGraph,
    nodes: &[String],
    solver: &dyn LayoutSolver,
    layout: &NamedOptions,
    opts: &ReconcileOptions,
    separation: Option<&SeparationOptions>,
    state: &mut EngineState,
) -> Result<()> {
    let mut members: Vec<String> = Vec::new();
    let mut substitutions: Vec<Substitution> = Vec::new();
    for id in nodes {
        if !is_visible(g, id) {
            continue;
        }
        if node_kind(g, id) != Some(NodeKind::Container) {
            members.push(id.clone());
            continue;
        }
        let Some(rect) = geom::bounding_box(g, id, opts.padding) else {
            continue;
        };
        let placeholder = state.next_placeholder_id(g, id);
        g.set_node(
            placeholder.clone(),
            NodeData::placeholder(rect.center(), rect.size()),
        );
        if let Some(parent) = g.parent(id).map(str::to_string) {
            g.set_parent(placeholder.clone(), parent);
        }
        let subtree_nodes = alg::preorder(g, &[id.as_str()]);
        let subtree = collapse::detach(g, &subtree_nodes, None, &placeholder);
        substitutions.push(Substitution {
            container: id.clone(),
            placeholder: placeholder.clone(),
            before: rect.center(),
            subtree,
        });
        members.push(placeholder);
    }
    if members.is_empty() {
        return Ok(());
    }

    tracing::trace!(
        members = members.len(),
        placeholders = substitutions.len(),
        "laying out sibling group"
    );
    run_solver(g, &members, solver, layout, opts.padding).await?;
    if let Some(sep) = separation {
        separation::adjust_separation(g, &members, sep);
    }

    for sub in substitutions.into_iter().rev() {
        let after = g
            .node(&sub.placeholder)
            .map(|n| n.position)
            .unwrap_or(sub.before);
        g.remove_node(&sub.placeholder);
        for edge in collapse::attach(g, sub.subtree) {
            tracing::warn!(container = %sub.container, edge = %edge.id, "edge lost while restoring subtree");
        }
        geom::move_nodes(g, after - sub.before, &[sub.container]);
    }
    Ok(())
}

/// Runs the solver over `members` and the edges among them, writing centers back into `g`.
///
/// Parallel edges are consolidated for the run and restored afterwards, also on failure.
pub(crate) async fn run_solver(
    g: &mut ElementGraph,
    members: &[String],
    solver: &dyn LayoutSolver,
    layout: &NamedOptions,
    padding: f64,
) -> Result<()> {
    let member_set: BTreeSet<&str> = members.iter().map(String::as_str).collect();
    let edges: Vec<String> = g
        .edge_ids()
        .into_iter()
        .filter(|e| {
            g.edge_ends(e)
                .is_some_and(|(s, t)| member_set.contains(s) && member_set.contains(t))
        })
        .collect();
    let folded = consolidate::consolidate(g, &edges);

    let mut input = LayoutGraph {
        nodes: members
            .iter()
            .filter_map(|id| {
                let rect = geom::bounding_box(g, id, padding)?;
                let (center, size) = (rect.center(), rect.size());
                Some(furl_layout::Node {
                    id: id.clone(),
                    width: size.width,
                    height: size.height,
                    x: center.x,
                    y: center.y,
                })
            })
            .collect(),
        edges: folded
            .kept
            .iter()
            .filter_map(|e| {
                let (s, t) = g.edge_ends(e)?;
                Some(furl_layout::Edge {
                    id: e.clone(),
                    source: s.to_string(),
                    target: t.to_string(),
                })
            })
            .collect(),
    };

    let outcome = solver.run(&mut input, layout).await;
    if outcome.is_ok() {
        for n in &input.nodes {
            let target = Point::new(n.x, n.y);
            if g.has_children(&n.id) {
                let current = geom::position(g, &n.id, padding).unwrap_or(target);
                geom::move_nodes(g, target - current, &[n.id.clone()]);
            } else if let Some(node) = g.node_mut(&n.id) {
                node.position = target;
            }
        }
    }
    consolidate::restore(g, folded);
    outcome
}

/// Lays out all visible nodes of a graph without compound structure in one solver run.
pub async fn layout_flat(
    g: &mut ElementGraph,
    solver: &dyn LayoutSolver,
    layout: &NamedOptions,
    padding: f64,
) -> Result<BTreeMap<String, Point>> {
    let members = visible_nodes(g);
    run_solver(g, &members, solver, layout, padding).await?;
    Ok(harvest(g))
}

fn visible_nodes(g: &ElementGraph) -> Vec<String> {
    g.nodes()
        .filter(|n| is_visible(g, n))
        .map(str::to_string)
        .collect()
}

fn harvest(g: &ElementGraph) -> BTreeMap<String, Point> {
    let mut out = BTreeMap::new();
    g.for_each_node(|id, data| {
        let positioned = !data.hidden
            && matches!(
                node_kind(g, id),
                Some(NodeKind::Leaf | NodeKind::CollapsedContainer | NodeKind::GroupRepresentative)
            );
        if positioned {
            out.insert(id.to_string(), data.position);
        }
    });
    out
}
