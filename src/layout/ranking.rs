use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::ir::{DependencyEdge, TaskId};

use super::LayoutError;

/// What to do with nodes the topological traversal never visits, which
/// only happens on or downstream of a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnresolvedRankPolicy {
    /// Keep any tentative rank a visited predecessor gave the node, else 0.
    #[default]
    AssignZero,
    Reject,
}

/// Edge lists restricted to known nodes, self loops removed. Parallel edges
/// stay parallel.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    nodes: Vec<TaskId>,
    incoming: HashMap<TaskId, Vec<TaskId>>,
    outgoing: HashMap<TaskId, Vec<TaskId>>,
    edges: Vec<DependencyEdge>,
}

impl Adjacency {
    pub fn new(nodes: &[TaskId], edges: &[DependencyEdge]) -> Self {
        let known: BTreeSet<TaskId> = nodes.iter().copied().collect();
        let mut adjacency = Self {
            nodes: known.iter().copied().collect(),
            ..Self::default()
        };
        let mut self_loops = 0usize;
        let mut dangling = 0usize;
        for edge in edges {
            if edge.is_self_loop() {
                self_loops += 1;
                continue;
            }
            if !known.contains(&edge.from) || !known.contains(&edge.to) {
                dangling += 1;
                continue;
            }
            adjacency
                .outgoing
                .entry(edge.from)
                .or_default()
                .push(edge.to);
            adjacency
                .incoming
                .entry(edge.to)
                .or_default()
                .push(edge.from);
            adjacency.edges.push(*edge);
        }
        if self_loops > 0 || dangling > 0 {
            tracing::debug!(self_loops, dangling, "dropped edges before ranking");
        }
        adjacency
    }

    /// Node ids, ascending.
    pub fn nodes(&self) -> &[TaskId] {
        &self.nodes
    }

    /// Edges that survived filtering, in input order.
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn incoming(&self, id: TaskId) -> &[TaskId] {
        self.incoming.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn outgoing(&self, id: TaskId) -> &[TaskId] {
        self.outgoing.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Levels {
    pub level: BTreeMap<TaskId, usize>,
    pub max_level: usize,
}

impl Levels {
    /// Node ids grouped by rank, each layer in ascending id order.
    pub fn layers(&self) -> Vec<Vec<TaskId>> {
        if self.level.is_empty() {
            return Vec::new();
        }
        let mut layers = vec![Vec::new(); self.max_level + 1];
        for (id, rank) in &self.level {
            layers[*rank].push(*id);
        }
        layers
    }
}

/// Longest-path ranking by Kahn traversal: every edge whose source is
/// visited ends in a strictly higher rank.
pub fn assign_levels(
    adjacency: &Adjacency,
    policy: UnresolvedRankPolicy,
) -> Result<Levels, LayoutError> {
    let mut indeg: HashMap<TaskId, usize> = adjacency
        .nodes()
        .iter()
        .map(|id| (*id, adjacency.incoming(*id).len()))
        .collect();

    let mut rank: HashMap<TaskId, usize> = HashMap::new();
    let mut queue: VecDeque<TaskId> = VecDeque::new();
    for id in adjacency.nodes() {
        if indeg[id] == 0 {
            rank.insert(*id, 0);
            queue.push_back(*id);
        }
    }

    let mut visited = 0usize;
    while let Some(node) = queue.pop_front() {
        visited += 1;
        let next_rank = rank[&node] + 1;
        for next in adjacency.outgoing(node) {
            let entry = rank.entry(*next).or_insert(next_rank);
            *entry = (*entry).max(next_rank);
            if let Some(deg) = indeg.get_mut(next) {
                *deg = deg.saturating_sub(1);
                if *deg == 0 {
                    queue.push_back(*next);
                }
            }
        }
    }

    if visited < adjacency.nodes().len() {
        let unresolved: Vec<TaskId> = adjacency
            .nodes()
            .iter()
            .copied()
            .filter(|id| indeg[id] > 0)
            .collect();
        match policy {
            UnresolvedRankPolicy::Reject => {
                return Err(LayoutError::CycleDetected { nodes: unresolved });
            }
            UnresolvedRankPolicy::AssignZero => {
                tracing::warn!(?unresolved, "cyclic dependencies, defaulting unranked tasks to 0");
            }
        }
    }

    let mut level = BTreeMap::new();
    for id in adjacency.nodes() {
        level.insert(*id, rank.get(id).copied().unwrap_or(0));
    }
    let max_level = level.values().copied().max().unwrap_or(0);
    Ok(Levels { level, max_level })
}
