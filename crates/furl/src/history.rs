//! Operation records for an external undo/redo stack.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Collapse,
    CollapseRecursively,
    CollapseAll,
    Expand,
    ExpandRecursively,
    ExpandAll,
    CollapseEdges,
    ExpandEdges,
    CollapseEdgesBetweenNodes,
    ExpandEdgesBetweenNodes,
    CollapseAllEdges,
    ExpandAllEdges,
    CollapseCluster,
    ExpandCluster,
    UpdateCluster,
}

impl OperationKind {
    /// The operation that undoes this one, where a single inverse exists.
    pub fn inverse(self) -> Option<OperationKind> {
        Some(match self {
            Self::Collapse => Self::Expand,
            Self::CollapseRecursively => Self::ExpandRecursively,
            Self::CollapseAll => Self::ExpandAll,
            Self::Expand => Self::Collapse,
            Self::ExpandRecursively => Self::CollapseRecursively,
            Self::ExpandAll => Self::CollapseAll,
            Self::CollapseEdges => Self::ExpandEdges,
            Self::ExpandEdges => Self::CollapseEdges,
            Self::CollapseEdgesBetweenNodes => Self::ExpandEdgesBetweenNodes,
            Self::ExpandEdgesBetweenNodes => Self::CollapseEdgesBetweenNodes,
            Self::CollapseAllEdges => Self::ExpandAllEdges,
            Self::ExpandAllEdges => Self::CollapseAllEdges,
            Self::CollapseCluster => Self::ExpandCluster,
            Self::ExpandCluster | Self::UpdateCluster => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub kind: OperationKind,
    /// Ids the operation was called with.
    pub targets: Vec<String>,
    /// Ids the operation produced or changed.
    pub results: Vec<String>,
}

pub trait HistoryRecorder {
    fn record(&mut self, record: OperationRecord);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    pub records: Vec<OperationRecord>,
}

impl HistoryRecorder for MemoryHistory {
    fn record(&mut self, record: OperationRecord) {
        self.records.push(record);
    }
}

impl<T: HistoryRecorder> HistoryRecorder for Rc<RefCell<T>> {
    fn record(&mut self, record: OperationRecord) {
        self.borrow_mut().record(record);
    }
}
