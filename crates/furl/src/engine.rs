use crate::cluster::{self, ClusterOptions, ClusterResult};
use crate::collapse::{self, CollapseResult, ExpandResult};
use crate::config::{EngineOptions, NamedOptions, OperationOptions};
use crate::cues::{CueState, VisualCueProvider};
use crate::edges::{self, EdgeCollapseResult};
use crate::error::Result;
use crate::geom::Point;
use crate::history::{HistoryRecorder, OperationKind, OperationRecord};
use crate::model::{ElementGraph, StoredNode, StoredSubgraph, is_visible};
use crate::reconcile::{self, ReconcileOptions};
use crate::separation::{self, SeparationOptions};
use crate::shadow::{HeadlessSurface, RenderSurface};
use crate::snapshot::{GraphSnapshot, PersistenceAdapter};
use crate::solver::{BuiltinSolver, LayoutSolver};
use crate::state::EngineState;
use furl_layout::RankDir;
use std::collections::BTreeMap;

fn owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Collapse/expand engine over one element graph.
///
/// Every mutating operation takes `&mut self`, so operations never interleave. Operations that
/// can trigger a layout are `async` and only suspend while the solver runs; they need no
/// particular executor.
pub struct Engine {
    graph: ElementGraph,
    options: EngineOptions,
    state: EngineState,
    solver: Box<dyn LayoutSolver>,
    surface: Option<Box<dyn RenderSurface>>,
    cues: Option<Box<dyn VisualCueProvider>>,
    history: Option<Box<dyn HistoryRecorder>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            graph: ElementGraph::default(),
            options,
            state: EngineState::default(),
            solver: Box::new(BuiltinSolver),
            surface: Some(Box::new(HeadlessSurface::default())),
            cues: None,
            history: None,
        }
    }

    pub fn with_graph(mut self, graph: ElementGraph) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_solver(mut self, solver: impl LayoutSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    /// Replaces the surface shadow graphs are mounted on; `None` makes compound relayout fail.
    pub fn with_surface(mut self, surface: Option<Box<dyn RenderSurface>>) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_cue_provider(mut self, cues: impl VisualCueProvider + 'static) -> Self {
        self.cues = Some(Box::new(cues));
        self
    }

    pub fn with_history(mut self, history: impl HistoryRecorder + 'static) -> Self {
        self.history = Some(Box::new(history));
        self
    }

    pub fn graph(&self) -> &ElementGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ElementGraph {
        &mut self.graph
    }

    pub fn into_graph(self) -> ElementGraph {
        self.graph
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EngineOptions) {
        self.options = options;
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    // ----- queries -----------------------------------------------------------------------

    pub fn is_collapsible(&self, id: &str) -> bool {
        collapse::is_collapsible(&self.graph, id)
    }

    pub fn is_expandable(&self, id: &str) -> bool {
        collapse::is_expandable(&self.graph, id)
    }

    pub fn collapsed_children(&self, id: &str) -> Option<&StoredSubgraph> {
        self.graph.node(id)?.collapsed_children.as_deref()
    }

    /// Everything hidden under `id`, including the contents of nested collapsed nodes.
    pub fn collapsed_children_recursively(&self, id: &str) -> Vec<&StoredNode> {
        self.collapsed_children(id)
            .map(|sub| sub.nodes_recursive())
            .unwrap_or_default()
    }

    pub fn all_collapsed_children_recursively(&self) -> Vec<&StoredNode> {
        self.graph
            .nodes()
            .filter_map(|id| self.collapsed_children(id))
            .flat_map(|sub| sub.nodes_recursive())
            .collect()
    }

    // ----- node collapse -----------------------------------------------------------------

    pub async fn collapse(&mut self, nodes: &[&str], opts: &OperationOptions) -> Result<CollapseResult> {
        let targets = owned(nodes);
        let result = collapse::collapse_nodes(&mut self.graph, &targets, self.options.compound_padding)?;
        self.after_collapse(OperationKind::Collapse, targets, result, opts)
            .await
    }

    pub async fn collapse_recursively(
        &mut self,
        nodes: &[&str],
        opts: &OperationOptions,
    ) -> Result<CollapseResult> {
        let targets = owned(nodes);
        let result =
            collapse::collapse_recursively(&mut self.graph, &targets, self.options.compound_padding)?;
        self.after_collapse(OperationKind::CollapseRecursively, targets, result, opts)
            .await
    }

    pub async fn collapse_all(&mut self, opts: &OperationOptions) -> Result<CollapseResult> {
        let roots: Vec<String> = self
            .graph
            .children_root()
            .into_iter()
            .map(str::to_string)
            .collect();
        let result =
            collapse::collapse_recursively(&mut self.graph, &roots, self.options.compound_padding)?;
        self.after_collapse(OperationKind::CollapseAll, Vec::new(), result, opts)
            .await
    }

    async fn after_collapse(
        &mut self,
        kind: OperationKind,
        targets: Vec<String>,
        mut result: CollapseResult,
        opts: &OperationOptions,
    ) -> Result<CollapseResult> {
        if result.is_empty() {
            tracing::debug!(?kind, "nothing to collapse");
            return Ok(result);
        }
        let group = opts
            .group_edges_of_same_type
            .unwrap_or(self.options.group_edges_of_same_type_on_collapse);
        if group {
            for id in &result.collapsed {
                let grouped = edges::group_edges_of_same_type(
                    &mut self.graph,
                    id,
                    self.options.allow_nested_edge_collapse,
                );
                result.grouped_edges.extend(grouped.edges);
            }
        }
        result.positions = self.layout_after(opts).await?;
        tracing::debug!(?kind, collapsed = result.collapsed.len(), "collapse finished");
        self.finish(kind, targets, result.collapsed.clone());
        Ok(result)
    }

    // ----- node expand -------------------------------------------------------------------

    pub async fn expand(&mut self, nodes: &[&str], opts: &OperationOptions) -> Result<ExpandResult> {
        let targets = owned(nodes);
        let result = collapse::expand_nodes(&mut self.graph, &targets);
        self.after_expand(OperationKind::Expand, targets, result, opts)
            .await
    }

    pub async fn expand_recursively(
        &mut self,
        nodes: &[&str],
        opts: &OperationOptions,
    ) -> Result<ExpandResult> {
        let targets = owned(nodes);
        let result = collapse::expand_recursively(&mut self.graph, &targets);
        self.after_expand(OperationKind::ExpandRecursively, targets, result, opts)
            .await
    }

    pub async fn expand_all(&mut self, opts: &OperationOptions) -> Result<ExpandResult> {
        let targets = collapse::expandable_nodes(&self.graph);
        let result = collapse::expand_recursively(&mut self.graph, &targets);
        self.after_expand(OperationKind::ExpandAll, Vec::new(), result, opts)
            .await
    }

    async fn after_expand(
        &mut self,
        kind: OperationKind,
        targets: Vec<String>,
        mut result: ExpandResult,
        opts: &OperationOptions,
    ) -> Result<ExpandResult> {
        if result.is_empty() {
            tracing::debug!(?kind, "nothing to expand");
            return Ok(result);
        }
        result.positions = self.layout_after(opts).await?;
        tracing::debug!(?kind, expanded = result.expanded.len(), "expand finished");
        self.finish(kind, targets, result.expanded.clone());
        Ok(result)
    }

    // ----- edges -------------------------------------------------------------------------

    pub fn collapse_edges(&mut self, edges: &[&str]) -> EdgeCollapseResult {
        let targets = owned(edges);
        let result = edges::collapse_edges(
            &mut self.graph,
            &targets,
            self.options.allow_nested_edge_collapse,
        );
        self.finish_edges(OperationKind::CollapseEdges, targets, result)
    }

    pub fn expand_edges(&mut self, edges: &[&str]) -> EdgeCollapseResult {
        let targets = owned(edges);
        let result = edges::expand_edges(&mut self.graph, &targets);
        self.finish_edges(OperationKind::ExpandEdges, targets, result)
    }

    pub fn collapse_edges_between_nodes(&mut self, nodes: &[&str]) -> EdgeCollapseResult {
        let targets = owned(nodes);
        let result = edges::collapse_edges_between_nodes(
            &mut self.graph,
            &targets,
            self.options.allow_nested_edge_collapse,
        );
        self.finish_edges(OperationKind::CollapseEdgesBetweenNodes, targets, result)
    }

    pub fn expand_edges_between_nodes(&mut self, nodes: &[&str]) -> EdgeCollapseResult {
        let targets = owned(nodes);
        let result = edges::expand_edges_between_nodes(&mut self.graph, &targets);
        self.finish_edges(OperationKind::ExpandEdgesBetweenNodes, targets, result)
    }

    pub fn collapse_all_edges(&mut self) -> EdgeCollapseResult {
        let result =
            edges::collapse_all_edges(&mut self.graph, self.options.allow_nested_edge_collapse);
        self.finish_edges(OperationKind::CollapseAllEdges, Vec::new(), result)
    }

    pub fn expand_all_edges(&mut self) -> EdgeCollapseResult {
        let result = edges::expand_all_edges(&mut self.graph);
        self.finish_edges(OperationKind::ExpandAllEdges, Vec::new(), result)
    }

    fn finish_edges(
        &mut self,
        kind: OperationKind,
        targets: Vec<String>,
        result: EdgeCollapseResult,
    ) -> EdgeCollapseResult {
        if !result.is_empty() {
            tracing::debug!(?kind, edges = result.edges.len(), old = result.old_edges.len(), "edge operation finished");
            self.finish(kind, targets, result.edges.clone());
        }
        result
    }

    // ----- clusters ----------------------------------------------------------------------

    pub async fn collapse_cluster(
        &mut self,
        representative: &str,
        members: &[&str],
        opts: &OperationOptions,
    ) -> Result<ClusterResult> {
        let members = owned(members);
        let cluster_opts = ClusterOptions {
            class_priority: &self.options.cluster_class_priority,
            allow_unique_edges: self.options.cluster_allow_unique_edges,
        };
        let result = cluster::collapse_cluster(
            &mut self.graph,
            &mut self.state,
            representative,
            &members,
            cluster_opts,
        );
        self.after_cluster(OperationKind::CollapseCluster, result, opts)
            .await
    }

    pub async fn expand_cluster(
        &mut self,
        representative: &str,
        opts: &OperationOptions,
    ) -> Result<ClusterResult> {
        let cluster_opts = ClusterOptions {
            class_priority: &self.options.cluster_class_priority,
            allow_unique_edges: self.options.cluster_allow_unique_edges,
        };
        let result =
            cluster::expand_cluster(&mut self.graph, &mut self.state, representative, cluster_opts);
        self.after_cluster(OperationKind::ExpandCluster, result, opts)
            .await
    }

    pub async fn update_cluster(
        &mut self,
        representative: &str,
        add: &[&str],
        remove: &[&str],
        opts: &OperationOptions,
    ) -> Result<ClusterResult> {
        let (add, remove) = (owned(add), owned(remove));
        let cluster_opts = ClusterOptions {
            class_priority: &self.options.cluster_class_priority,
            allow_unique_edges: self.options.cluster_allow_unique_edges,
        };
        let result = cluster::update_cluster(
            &mut self.graph,
            &mut self.state,
            representative,
            &add,
            &remove,
            cluster_opts,
        );
        self.after_cluster(OperationKind::UpdateCluster, result, opts)
            .await
    }

    async fn after_cluster(
        &mut self,
        kind: OperationKind,
        result: ClusterResult,
        opts: &OperationOptions,
    ) -> Result<ClusterResult> {
        if result.members.is_empty() && result.released.is_empty() {
            return Ok(result);
        }
        self.layout_after(opts).await?;
        let mut changed = result.members.clone();
        changed.extend(result.released.iter().cloned());
        self.finish(kind, vec![result.representative.clone()], changed);
        Ok(result)
    }

    // ----- layout ------------------------------------------------------------------------

    /// Lays the graph out with `layout` and writes the new positions back.
    ///
    /// Graphs with expanded containers go through level-by-level overlap resolution on a shadow
    /// graph; flat graphs are laid out in one solver run.
    pub async fn relayout(&mut self, layout: &NamedOptions) -> Result<BTreeMap<String, Point>> {
        let padding = self.options.compound_padding;
        let compound = self
            .graph
            .nodes()
            .any(|n| collapse::is_collapsible(&self.graph, n));
        if !compound {
            return reconcile::layout_flat(&mut self.graph, self.solver.as_ref(), layout, padding)
                .await;
        }

        let surface: Option<&mut dyn RenderSurface> = match self.surface.as_mut() {
            Some(s) => Some(&mut **s),
            None => None,
        };
        let opts = ReconcileOptions {
            padding,
            adjust_separation: self.options.adjust_dagre_separation,
        };
        let positions = reconcile::resolve_overlap(
            &self.graph,
            surface,
            self.solver.as_ref(),
            layout,
            opts,
            &mut self.state,
        )
        .await?;
        for (id, p) in &positions {
            if let Some(node) = self.graph.node_mut(id) {
                node.position = *p;
            }
        }
        Ok(positions)
    }

    async fn layout_after(&mut self, opts: &OperationOptions) -> Result<BTreeMap<String, Point>> {
        match opts.layout.clone().or_else(|| self.options.layout_by.clone()) {
            Some(layout) => self.relayout(&layout).await,
            None => Ok(BTreeMap::new()),
        }
    }

    /// Re-spaces the ranks formed by `nodes` (see [`separation::adjust_separation`]).
    pub fn adjust_separation(&mut self, nodes: &[&str], node_sep: f64, rank_sep: f64, rank_dir: RankDir) {
        let opts = SeparationOptions {
            node_sep,
            rank_sep,
            rank_dir,
            padding: self.options.compound_padding,
        };
        separation::adjust_separation(&mut self.graph, &owned(nodes), &opts);
    }

    // ----- snapshots ---------------------------------------------------------------------

    pub fn export_snapshot(&self) -> GraphSnapshot {
        let mut snapshot = GraphSnapshot::capture(&self.graph);
        snapshot.clusters = self.state.all_cluster_edges().clone();
        snapshot
    }

    pub fn import_snapshot(&mut self, mut snapshot: GraphSnapshot) {
        self.state
            .replace_cluster_edges(std::mem::take(&mut snapshot.clusters));
        self.graph = snapshot.into_graph();
        self.refresh_cues();
    }

    pub fn save(&self, adapter: &mut dyn PersistenceAdapter) -> Result<()> {
        adapter.save(&self.export_snapshot())
    }

    pub fn load(&mut self, adapter: &mut dyn PersistenceAdapter) -> Result<()> {
        let snapshot = adapter.load()?;
        self.import_snapshot(snapshot);
        Ok(())
    }

    // ----- collaborators -----------------------------------------------------------------

    fn finish(&mut self, kind: OperationKind, targets: Vec<String>, results: Vec<String>) {
        if self.options.undoable {
            if let Some(history) = self.history.as_mut() {
                history.record(OperationRecord {
                    kind,
                    targets,
                    results,
                });
            }
        }
        self.refresh_cues();
    }

    /// Current collapse/expand affordance of every visible node that has one.
    pub fn cue_states(&self) -> Vec<CueState> {
        self.graph
            .nodes()
            .filter(|id| is_visible(&self.graph, id))
            .filter_map(|id| {
                let collapsible = self.is_collapsible(id);
                let expandable = self.is_expandable(id);
                (collapsible || expandable).then(|| CueState {
                    node: id.to_string(),
                    collapsible,
                    expandable,
                })
            })
            .collect()
    }

    fn refresh_cues(&mut self) {
        if !self.options.cue_enabled {
            return;
        }
        let states = self.cue_states();
        if let Some(cues) = self.cues.as_mut() {
            cues.clear_visual_cue();
            cues.update(&states);
        }
    }
}
