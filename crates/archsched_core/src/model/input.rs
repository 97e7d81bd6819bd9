//! Form payloads for creating and editing schedule entities.
//!
//! # Responsibility
//! - Decode create payloads as a union discriminated by `type`, each variant
//!   carrying only the fields that make sense for it.
//! - Describe partial edits as explicit patches.
//!
//! # Invariants
//! - Decoding never produces a record; `into_task` does, and the result still
//!   goes through board validation.

use crate::model::task::{Task, TaskId, TaskKind, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Create payload keyed by entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskInput {
    #[serde(rename_all = "camelCase")]
    Task {
        name: String,
        start: NaiveDate,
        end: NaiveDate,
        #[serde(default)]
        status: TaskStatus,
        #[serde(default)]
        progress: f64,
        #[serde(default)]
        parent_stage_id: Option<TaskId>,
        #[serde(default)]
        milestone_id: Option<TaskId>,
        #[serde(default)]
        dependencies: Vec<TaskId>,
        #[serde(default)]
        sort_key: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Milestone {
        name: String,
        date: NaiveDate,
        #[serde(default)]
        status: TaskStatus,
        #[serde(default)]
        dependencies: Vec<TaskId>,
        #[serde(default)]
        sort_key: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Stage {
        name: String,
        start: NaiveDate,
        end: NaiveDate,
        #[serde(default)]
        status: TaskStatus,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        dependencies: Vec<TaskId>,
        #[serde(default)]
        sort_key: Option<f64>,
    },
}

impl TaskInput {
    /// Convenience constructor for a plain task row.
    pub fn task(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self::Task {
            name: name.into(),
            start,
            end,
            status: TaskStatus::NotStarted,
            progress: 0.0,
            parent_stage_id: None,
            milestone_id: None,
            dependencies: Vec::new(),
            sort_key: None,
        }
    }

    /// Convenience constructor for a milestone row.
    pub fn milestone(name: impl Into<String>, date: NaiveDate) -> Self {
        Self::Milestone {
            name: name.into(),
            date,
            status: TaskStatus::NotStarted,
            dependencies: Vec::new(),
            sort_key: None,
        }
    }

    /// Convenience constructor for a design stage row.
    pub fn stage(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self::Stage {
            name: name.into(),
            start,
            end,
            status: TaskStatus::NotStarted,
            color: None,
            dependencies: Vec::new(),
            sort_key: None,
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Task { .. } => TaskKind::Task,
            Self::Milestone { .. } => TaskKind::Milestone,
            Self::Stage { .. } => TaskKind::Stage,
        }
    }

    /// Builds the record for `id`. Unset sort keys default to `0`.
    pub fn into_task(self, id: TaskId) -> Task {
        match self {
            Self::Task {
                name,
                start,
                end,
                status,
                progress,
                parent_stage_id,
                milestone_id,
                dependencies,
                sort_key,
            } => {
                let mut task = Task::with_id(id, TaskKind::Task, name, start, end);
                task.status = status;
                task.progress = progress;
                task.parent_stage_id = parent_stage_id;
                task.milestone_id = milestone_id;
                task.dependencies = dependencies;
                task.sort_key = sort_key.unwrap_or(0.0);
                task
            }
            Self::Milestone {
                name,
                date,
                status,
                dependencies,
                sort_key,
            } => {
                let mut task = Task::with_id(id, TaskKind::Milestone, name, date, date);
                task.status = status;
                task.dependencies = dependencies;
                task.sort_key = sort_key.unwrap_or(0.0);
                task
            }
            Self::Stage {
                name,
                start,
                end,
                status,
                color,
                dependencies,
                sort_key,
            } => {
                let mut task = Task::with_id(id, TaskKind::Stage, name, start, end);
                task.status = status;
                task.color = color;
                task.dependencies = dependencies;
                task.sort_key = sort_key.unwrap_or(0.0);
                task
            }
        }
    }
}

/// Partial edit of an existing entity. `None` keeps the current value.
///
/// Clearable relations use a nested option: `Some(None)` clears the field.
/// The entity type cannot be changed by a patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub progress: Option<f64>,
    pub status: Option<TaskStatus>,
    pub parent_stage_id: Option<Option<TaskId>>,
    pub milestone_id: Option<Option<TaskId>>,
    pub dependencies: Option<Vec<TaskId>>,
    pub sort_key: Option<f64>,
    pub color: Option<Option<String>>,
}

impl TaskPatch {
    /// Patch moving an entity in time, as emitted by a bar drag.
    pub fn reschedule(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    /// Patch changing only progress, as emitted by a progress-handle drag.
    pub fn progress(progress: f64) -> Self {
        Self {
            progress: Some(progress),
            ..Self::default()
        }
    }

    /// Patch changing only status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns `current` with this patch merged in.
    ///
    /// For milestones a single provided date moves both ends together, so a
    /// marker stays zero-length.
    pub fn apply_to(&self, current: &Task) -> Task {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        match (current.kind, self.start, self.end) {
            (TaskKind::Milestone, Some(date), None) | (TaskKind::Milestone, None, Some(date)) => {
                next.start = date;
                next.end = date;
            }
            (_, start, end) => {
                if let Some(start) = start {
                    next.start = start;
                }
                if let Some(end) = end {
                    next.end = end;
                }
            }
        }
        if let Some(progress) = self.progress {
            next.progress = progress;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(parent_stage_id) = &self.parent_stage_id {
            next.parent_stage_id = parent_stage_id.clone();
        }
        if let Some(milestone_id) = &self.milestone_id {
            next.milestone_id = milestone_id.clone();
        }
        if let Some(dependencies) = &self.dependencies {
            next.dependencies = dependencies.clone();
        }
        if let Some(sort_key) = self.sort_key {
            next.sort_key = sort_key;
        }
        if let Some(color) = &self.color {
            next.color = color.clone();
        }
        next
    }
}
