use thiserror::Error;

use crate::ir::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Raised only under `UnresolvedRankPolicy::Reject`.
    #[error("dependency cycle prevents ranking tasks {}", format_ids(.nodes))]
    CycleDetected { nodes: Vec<TaskId> },
}

fn format_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
