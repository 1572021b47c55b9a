use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type TaskId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl TaskNode {
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// `from` must complete before `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: TaskId,
    pub to: TaskId,
}

impl DependencyEdge {
    pub fn new(from: TaskId, to: TaskId) -> Self {
        Self { from, to }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// One row of the workflow definitions query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub definition_id: Option<i64>,
    pub task_template_id: TaskId,
    #[serde(default)]
    pub task_template_name: Option<String>,
    #[serde(default)]
    pub depends_on_task_template_id: Option<TaskId>,
    #[serde(default)]
    pub depends_on_task_template_name: Option<String>,
}

/// Entry of the candidate tasks list; the only source of categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateTask {
    pub task_template_id: TaskId,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    pub workflow_template_id: i64,
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub templates: Vec<WorkflowTemplate>,
    #[serde(default)]
    pub candidate_tasks: Vec<CandidateTask>,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid workflow document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("workflow document contains no templates")]
    Empty,
    #[error("workflow template {0} not found")]
    UnknownTemplate(i64),
    #[error("document holds {} templates, pick one of: {}", .0.len(), join_ids(.0))]
    AmbiguousTemplate(Vec<i64>),
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl WorkflowDocument {
    pub fn from_json(input: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Resolves a template selection. Without an explicit id the document
    /// must hold exactly one template.
    pub fn select(&self, template_id: Option<i64>) -> Result<&WorkflowTemplate, DocumentError> {
        if self.templates.is_empty() {
            return Err(DocumentError::Empty);
        }
        match template_id {
            Some(id) => self
                .templates
                .iter()
                .find(|template| template.workflow_template_id == id)
                .ok_or(DocumentError::UnknownTemplate(id)),
            None if self.templates.len() == 1 => Ok(&self.templates[0]),
            None => Err(DocumentError::AmbiguousTemplate(
                self.templates
                    .iter()
                    .map(|template| template.workflow_template_id)
                    .collect(),
            )),
        }
    }

    pub fn layout_request(&self, template_id: Option<i64>) -> Result<LayoutRequest, DocumentError> {
        let template = self.select(template_id)?;
        Ok(LayoutRequest::from_definitions(
            &template.definitions,
            &self.candidate_tasks,
        ))
    }
}

/// Everything one layout invocation needs. Built fresh per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub nodes: Vec<TaskNode>,
    pub edges: Vec<DependencyEdge>,
    /// Overrides `TaskNode::category` for the same id.
    #[serde(default)]
    pub categories: BTreeMap<TaskId, String>,
}

impl LayoutRequest {
    pub fn new(nodes: Vec<TaskNode>, edges: Vec<DependencyEdge>) -> Self {
        Self {
            nodes,
            edges,
            categories: BTreeMap::new(),
        }
    }

    pub fn from_definitions(definitions: &[Definition], candidates: &[CandidateTask]) -> Self {
        let mut names: BTreeMap<TaskId, String> = BTreeMap::new();
        let mut ids: BTreeSet<TaskId> = BTreeSet::new();
        let mut edges = Vec::new();

        let mut remember = |id: TaskId, name: Option<&String>| {
            ids.insert(id);
            if let Some(name) = name.map(|n| n.trim()).filter(|n| !n.is_empty()) {
                names.entry(id).or_insert_with(|| name.to_string());
            }
        };

        for def in definitions {
            remember(def.task_template_id, def.task_template_name.as_ref());
            if let Some(dep) = def.depends_on_task_template_id {
                remember(dep, def.depends_on_task_template_name.as_ref());
                edges.push(DependencyEdge::new(dep, def.task_template_id));
            }
        }

        let mut categories = BTreeMap::new();
        for candidate in candidates {
            if !ids.contains(&candidate.task_template_id) {
                continue;
            }
            if let Some(name) = candidate
                .template_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
            {
                names
                    .entry(candidate.task_template_id)
                    .or_insert_with(|| name.to_string());
            }
            if let Some(category) = candidate
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
            {
                categories.insert(candidate.task_template_id, category.to_string());
            }
        }

        let nodes = ids
            .into_iter()
            .map(|id| TaskNode {
                id,
                name: names.remove(&id).unwrap_or_default(),
                category: categories.get(&id).cloned(),
            })
            .collect();

        Self {
            nodes,
            edges,
            categories,
        }
    }

    pub fn category_of<'a>(&'a self, node: &'a TaskNode) -> Option<&'a str> {
        self.categories
            .get(&node.id)
            .map(String::as_str)
            .or(node.category.as_deref())
    }
}
