//! The layout solver seam.

use crate::config::NamedOptions;
use crate::error::{Error, Result};
use furl_layout::{Algorithm, GridOptions, LayeredOptions, RankDir};
use futures::future::{FutureExt, LocalBoxFuture};

/// Input handed to a solver; the solver writes final centers into `nodes[..].x/y`.
pub type LayoutGraph = furl_layout::Graph;

pub trait LayoutSolver {
    fn run<'a>(
        &'a self,
        graph: &'a mut LayoutGraph,
        options: &'a NamedOptions,
    ) -> LocalBoxFuture<'a, Result<()>>;
}

/// Solver backed by the `furl-layout` reference algorithms.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSolver;

impl LayoutSolver for BuiltinSolver {
    fn run<'a>(
        &'a self,
        graph: &'a mut LayoutGraph,
        options: &'a NamedOptions,
    ) -> LocalBoxFuture<'a, Result<()>> {
        async move {
            let algorithm = algorithm_from_options(options)?;
            let result = furl_layout::layout(graph, &algorithm)?;
            for node in &mut graph.nodes {
                if let Some(p) = result.positions.get(&node.id) {
                    node.x = p.x;
                    node.y = p.y;
                }
            }
            Ok(())
        }
        .boxed_local()
    }
}

pub fn algorithm_from_options(options: &NamedOptions) -> Result<Algorithm> {
    match options.name().unwrap_or("grid") {
        "grid" => {
            let defaults = GridOptions::default();
            Ok(Algorithm::Grid(GridOptions {
                cols: options.get_u64("cols").map(|c| c as usize),
                spacing: options.get_f64("spacing").unwrap_or(defaults.spacing),
            }))
        }
        "layered" | "dagre" => Ok(Algorithm::Layered(layered_options(options)?)),
        "preset" | "null" => Ok(Algorithm::Preset),
        other => Err(furl_layout::Error::UnknownAlgorithm {
            name: other.to_string(),
        }
        .into()),
    }
}

pub(crate) fn layered_options(options: &NamedOptions) -> Result<LayeredOptions> {
    let defaults = LayeredOptions::default();
    let rankdir = match options.get_str("rankDir") {
        None => defaults.rankdir,
        Some(s) => RankDir::parse(s).ok_or_else(|| Error::InvalidOptions {
            message: format!("unknown rankDir {s:?}"),
        })?,
    };
    Ok(LayeredOptions {
        rankdir,
        nodesep: options.get_f64("nodeSep").unwrap_or(defaults.nodesep),
        ranksep: options.get_f64("rankSep").unwrap_or(defaults.ranksep),
    })
}

/// Whether `options` select a rank-based layout that the separation pass applies to.
pub fn is_rank_based(options: &NamedOptions) -> bool {
    matches!(options.name(), Some("layered" | "dagre"))
}
