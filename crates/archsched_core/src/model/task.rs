//! Schedule entity model.
//!
//! # Responsibility
//! - Define the canonical record shared by task, milestone and stage rows.
//! - Enforce intrinsic invariants that need no knowledge of other rows.
//!
//! # Invariants
//! - `id` is stable and never reused for another entity.
//! - `end >= start`; milestones have `end == start`.
//! - `progress` stays within `[0, 1]`.
//! - `parent_stage_id` and `milestone_id` are only set on `TaskKind::Task`.
//! - `dependencies` never contains the entity's own id.

use crate::error::ErrorKind;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static STAGE_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid stage color regex"));

/// Opaque entity identifier.
pub type TaskId = String;

/// Type-group of a schedule entity.
///
/// Declaration order is the display order of groups on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Zero-duration marker that dependent tasks are checked against.
    Milestone,
    /// Design phase grouping tasks.
    Stage,
    /// Regular unit of work.
    Task,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Milestone => "milestone",
            Self::Stage => "stage",
            Self::Task => "task",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "milestone" => Some(Self::Milestone),
            "stage" => Some(Self::Stage),
            "task" => Some(Self::Task),
            _ => None,
        }
    }
}

/// Work status of a schedule entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Validation failures for schedule entities.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskValidationError {
    /// Name is empty after trim.
    BlankName,
    /// End date precedes start date.
    InvertedDates { start: NaiveDate, end: NaiveDate },
    /// Milestone spans more than one day.
    MilestoneSpansDays { start: NaiveDate, end: NaiveDate },
    /// Progress is NaN or outside `[0, 1]`.
    ProgressOutOfRange(f64),
    /// Sort key is NaN or infinite.
    SortKeyNotFinite(f64),
    /// Entity lists itself as a dependency.
    SelfDependency(TaskId),
    /// Stage or milestone relation set on a non-task entity.
    RelationOnlyForTasks(TaskKind),
    /// Stage color is not `#RRGGBB`.
    InvalidColor(String),
    /// Color set on a non-stage entity.
    ColorOnlyForStages(TaskKind),
    /// Referenced dependency does not exist.
    UnknownDependency(TaskId),
    /// Dependency belongs to another type-group.
    DependencyKindMismatch {
        dependency: TaskId,
        expected: TaskKind,
        actual: TaskKind,
    },
    /// Task dependency lives under another stage.
    DependencyStageMismatch { dependency: TaskId },
    /// Dependency edge would close a cycle.
    DependencyCycle { task: TaskId, dependency: TaskId },
    /// Referenced stage does not exist or is not a stage.
    UnknownStage(TaskId),
    /// Referenced milestone does not exist or is not a milestone.
    UnknownMilestone(TaskId),
    /// Another entity already uses this id.
    DuplicateId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must not be blank"),
            Self::InvertedDates { start, end } => {
                write!(f, "end date {end} must not be earlier than start date {start}")
            }
            Self::MilestoneSpansDays { start, end } => {
                write!(f, "milestone must start and end on the same day, got {start}..{end}")
            }
            Self::ProgressOutOfRange(value) => {
                write!(f, "progress must be within [0, 1], got {value}")
            }
            Self::SortKeyNotFinite(value) => write!(f, "sort key must be finite, got {value}"),
            Self::SelfDependency(id) => write!(f, "entity {id} cannot depend on itself"),
            Self::RelationOnlyForTasks(kind) => write!(
                f,
                "stage and milestone relations are only allowed on tasks, got {}",
                kind.as_str()
            ),
            Self::InvalidColor(value) => write!(f, "invalid stage color `{value}`; expected #RRGGBB"),
            Self::ColorOnlyForStages(kind) => {
                write!(f, "color is only allowed on stages, got {}", kind.as_str())
            }
            Self::UnknownDependency(id) => write!(f, "dependency not found: {id}"),
            Self::DependencyKindMismatch {
                dependency,
                expected,
                actual,
            } => write!(
                f,
                "dependency {dependency} is a {}, expected a {}",
                actual.as_str(),
                expected.as_str()
            ),
            Self::DependencyStageMismatch { dependency } => {
                write!(f, "dependency {dependency} belongs to a different stage")
            }
            Self::DependencyCycle { task, dependency } => {
                write!(f, "dependency {task} -> {dependency} would create a cycle")
            }
            Self::UnknownStage(id) => write!(f, "stage not found: {id}"),
            Self::UnknownMilestone(id) => write!(f, "milestone not found: {id}"),
            Self::DuplicateId(id) => write!(f, "duplicate entity id: {id}"),
        }
    }
}

impl Error for TaskValidationError {}

impl TaskValidationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Canonical schedule record for tasks, milestones and stages.
///
/// Relation fields are optional so one shape serves every type-group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Serialized as `type` to match the board payload naming.
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub status: TaskStatus,
    /// Owning design stage. Meaningful only for `TaskKind::Task`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_stage_id: Option<TaskId>,
    /// Milestone this task must be finished for. Tasks only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<TaskId>,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    /// Display order within the type-group; carries no calendar meaning.
    #[serde(default)]
    pub sort_key: f64,
    /// Bar color for stages, `#RRGGBB`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Task {
    /// Creates an entity with a generated id and default relations.
    pub fn new(kind: TaskKind, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self::with_id(generate_task_id(kind), kind, name, start, end)
    }

    /// Creates an entity with a caller-provided id.
    ///
    /// Used by load paths where identity already exists externally.
    pub fn with_id(
        id: impl Into<TaskId>,
        kind: TaskKind,
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            start,
            end,
            progress: 0.0,
            status: TaskStatus::NotStarted,
            parent_stage_id: None,
            milestone_id: None,
            dependencies: Vec::new(),
            sort_key: 0.0,
            color: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Checks invariants that hold for a record in isolation.
    ///
    /// Cross-record rules (references, cycles) are enforced by the board.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.name.trim().is_empty() {
            return Err(TaskValidationError::BlankName);
        }
        if self.end < self.start {
            return Err(TaskValidationError::InvertedDates {
                start: self.start,
                end: self.end,
            });
        }
        if self.kind == TaskKind::Milestone && self.end != self.start {
            return Err(TaskValidationError::MilestoneSpansDays {
                start: self.start,
                end: self.end,
            });
        }
        if !(0.0..=1.0).contains(&self.progress) {
            return Err(TaskValidationError::ProgressOutOfRange(self.progress));
        }
        if !self.sort_key.is_finite() {
            return Err(TaskValidationError::SortKeyNotFinite(self.sort_key));
        }
        if self.kind != TaskKind::Task
            && (self.parent_stage_id.is_some() || self.milestone_id.is_some())
        {
            return Err(TaskValidationError::RelationOnlyForTasks(self.kind));
        }
        if let Some(color) = &self.color {
            if self.kind != TaskKind::Stage {
                return Err(TaskValidationError::ColorOnlyForStages(self.kind));
            }
            if !STAGE_COLOR_RE.is_match(color) {
                return Err(TaskValidationError::InvalidColor(color.clone()));
            }
        }
        if self.dependencies.iter().any(|dep| *dep == self.id) {
            return Err(TaskValidationError::SelfDependency(self.id.clone()));
        }
        Ok(())
    }

    /// Trims the name and removes repeated dependency ids, keeping first occurrence.
    pub fn normalize(&mut self) {
        let trimmed = self.name.trim();
        if trimmed.len() != self.name.len() {
            self.name = trimmed.to_string();
        }
        let mut seen = std::collections::HashSet::new();
        self.dependencies.retain(|dep| seen.insert(dep.clone()));
    }
}

/// Generates a fresh id prefixed with the entity type, e.g. `task_3f2a...`.
pub fn generate_task_id(kind: TaskKind) -> TaskId {
    format!("{}_{}", kind.as_str(), Uuid::new_v4().simple())
}
