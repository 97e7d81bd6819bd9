//! In-memory schedule board for one project.
//!
//! # Responsibility
//! - Hold the project's tasks, stages and milestones in insertion order.
//! - Validate create/update/delete/reorder against cross-record rules.
//! - Keep the derived milestone alert list current after every mutation.
//!
//! # Invariants
//! - Every stored entity passes `Task::validate`.
//! - Ids are unique within a board.
//! - Failed operations leave the board unchanged.
//! - Deletes do not cascade; dangling dependency/milestone ids are tolerated.
//!
//! Mutations are split into `plan_*` (validate, return the would-be record)
//! and `apply_*` (commit a planned record) so a persistence layer can write
//! between the two.

pub mod alerts;
pub mod gantt;
pub mod ordering;

use crate::clock::Clock;
use crate::error::ErrorKind;
use crate::model::input::{TaskInput, TaskPatch};
use crate::model::task::{generate_task_id, Task, TaskId, TaskKind, TaskValidationError};
use alerts::{milestone_alerts, MilestoneAlert};
use chrono::NaiveDate;
use log::{debug, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type BoardResult<T> = Result<T, BoardError>;

/// Errors from board operations.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardError {
    Validation(TaskValidationError),
    NotFound(TaskId),
}

impl BoardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "schedule entity not found: {id}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for BoardError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Schedule board state for a single editing session.
pub struct ScheduleBoard {
    tasks: Vec<Task>,
    alerts: Vec<MilestoneAlert>,
    clock: Arc<dyn Clock>,
}

impl ScheduleBoard {
    /// Creates an empty board.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks: Vec::new(),
            alerts: Vec::new(),
            clock,
        }
    }

    /// Creates a board from previously stored records.
    ///
    /// Records are checked for intrinsic validity and id uniqueness only;
    /// dangling references from earlier deletes are accepted as-is.
    pub fn from_tasks(tasks: Vec<Task>, clock: Arc<dyn Clock>) -> BoardResult<Self> {
        let mut seen = HashSet::new();
        for task in &tasks {
            task.validate()?;
            if !seen.insert(task.id.as_str()) {
                return Err(TaskValidationError::DuplicateId(task.id.clone()).into());
            }
        }

        let mut board = Self {
            tasks,
            alerts: Vec::new(),
            clock,
        };
        board.refresh_alerts();
        Ok(board)
    }

    /// Records in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Records in display order: milestones, stages, tasks; each by sort key.
    pub fn sorted_tasks(&self) -> Vec<&Task> {
        ordering::sorted_tasks(&self.tasks)
    }

    /// Current overdue-milestone alerts.
    pub fn alerts(&self) -> &[MilestoneAlert] {
        &self.alerts
    }

    /// Recomputes alerts against the clock. Mutations call this implicitly;
    /// callers use it when only time has moved.
    pub fn refresh_alerts(&mut self) {
        self.alerts = milestone_alerts(&self.tasks, self.clock.now());
    }

    /// Validates and inserts a new entity with a generated id.
    pub fn create_task(&mut self, input: TaskInput) -> BoardResult<&Task> {
        let task = self.plan_create(input)?;
        Ok(self.apply_insert(task))
    }

    /// Merges `patch` into the entity `id` and re-validates it.
    pub fn update_task(&mut self, id: &str, patch: &TaskPatch) -> BoardResult<&Task> {
        let task = self.plan_update(id, patch)?;
        self.apply_replace(task)
    }

    /// Moves an entity in time; status is kept.
    pub fn reschedule(&mut self, id: &str, start: NaiveDate, end: NaiveDate) -> BoardResult<&Task> {
        self.update_task(id, &TaskPatch::reschedule(start, end))
    }

    /// Sets progress from a progress-handle drag.
    pub fn set_progress(&mut self, id: &str, progress: f64) -> BoardResult<&Task> {
        self.update_task(id, &TaskPatch::progress(progress))
    }

    /// Removes an entity without touching references held by others.
    pub fn delete_task(&mut self, id: &str) -> BoardResult<Task> {
        self.ensure_exists(id)?;
        self.apply_remove(id)
    }

    /// Moves `dragged_id` next to `target_id` within their type-group.
    ///
    /// Returns the dragged entity's new key, or `None` when the drop is a
    /// no-op (different types, or dropped onto itself).
    pub fn reorder(&mut self, dragged_id: &str, target_id: &str) -> BoardResult<Option<f64>> {
        let planned = self.plan_reorder(dragged_id, target_id)?;
        if let Some(key) = planned {
            self.apply_sort_key(dragged_id, key)?;
        }
        Ok(planned)
    }

    /// Validates a create payload and returns the record that would be stored.
    pub fn plan_create(&self, input: TaskInput) -> BoardResult<Task> {
        let kind = input.kind();
        let mut task = input.into_task(generate_task_id(kind));
        task.normalize();
        self.validate_candidate(&task, None)?;
        Ok(task)
    }

    /// Validates an edit and returns the merged record.
    pub fn plan_update(&self, id: &str, patch: &TaskPatch) -> BoardResult<Task> {
        let current = self.ensure_exists(id)?;
        let mut next = patch.apply_to(current);
        next.normalize();
        self.validate_candidate(&next, Some(current))?;
        Ok(next)
    }

    /// Computes the key a reorder would assign, without applying it.
    pub fn plan_reorder(&self, dragged_id: &str, target_id: &str) -> BoardResult<Option<f64>> {
        let dragged = self.ensure_exists(dragged_id)?;
        let target = self.ensure_exists(target_id)?;
        let sorted = self.sorted_tasks();
        let key = ordering::reorder_key(&sorted, dragged, target);
        if let Some(key) = key.filter(|key| !key.is_finite()) {
            return Err(TaskValidationError::SortKeyNotFinite(key).into());
        }
        if key.is_none() {
            info!(
                "event=task_reorder module=board status=ignored dragged_kind={} target_kind={}",
                dragged.kind.as_str(),
                target.kind.as_str()
            );
        }
        Ok(key)
    }

    /// Stores a record produced by `plan_create`.
    pub fn apply_insert(&mut self, task: Task) -> &Task {
        debug!(
            "event=task_create module=board status=ok task_id={} kind={}",
            task.id,
            task.kind.as_str()
        );
        self.tasks.push(task);
        self.refresh_alerts();
        let last = self.tasks.len() - 1;
        &self.tasks[last]
    }

    /// Replaces a record with one produced by `plan_update`.
    pub fn apply_replace(&mut self, task: Task) -> BoardResult<&Task> {
        let index = self.index_of(&task.id)?;
        debug!(
            "event=task_update module=board status=ok task_id={} kind={}",
            task.id,
            task.kind.as_str()
        );
        self.tasks[index] = task;
        self.refresh_alerts();
        Ok(&self.tasks[index])
    }

    /// Removes a record by id.
    pub fn apply_remove(&mut self, id: &str) -> BoardResult<Task> {
        let index = self.index_of(id)?;
        let removed = self.tasks.remove(index);
        debug!(
            "event=task_delete module=board status=ok task_id={} kind={}",
            removed.id,
            removed.kind.as_str()
        );
        self.refresh_alerts();
        Ok(removed)
    }

    /// Assigns a sort key produced by `plan_reorder`.
    pub fn apply_sort_key(&mut self, id: &str, sort_key: f64) -> BoardResult<()> {
        if !sort_key.is_finite() {
            return Err(TaskValidationError::SortKeyNotFinite(sort_key).into());
        }
        let index = self.index_of(id)?;
        self.tasks[index].sort_key = sort_key;
        debug!("event=task_reorder module=board status=ok task_id={id} sort_key={sort_key}");
        self.refresh_alerts();
        Ok(())
    }

    fn ensure_exists(&self, id: &str) -> BoardResult<&Task> {
        self.get(id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))
    }

    fn index_of(&self, id: &str) -> BoardResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| BoardError::NotFound(id.to_string()))
    }

    /// Cross-record validation. Only references that differ from `previous`
    /// are resolved, so dangling ids left by deletes do not block edits.
    fn validate_candidate(
        &self,
        candidate: &Task,
        previous: Option<&Task>,
    ) -> Result<(), TaskValidationError> {
        candidate.validate()?;

        if previous.is_none() && self.get(&candidate.id).is_some() {
            return Err(TaskValidationError::DuplicateId(candidate.id.clone()));
        }

        if let Some(stage_id) = &candidate.parent_stage_id {
            let unchanged = previous.is_some_and(|p| p.parent_stage_id.as_ref() == Some(stage_id));
            if !unchanged && !self.is_kind(stage_id, TaskKind::Stage) {
                return Err(TaskValidationError::UnknownStage(stage_id.clone()));
            }
        }

        if let Some(milestone_id) = &candidate.milestone_id {
            let unchanged = previous.is_some_and(|p| p.milestone_id.as_ref() == Some(milestone_id));
            if !unchanged && !self.is_kind(milestone_id, TaskKind::Milestone) {
                return Err(TaskValidationError::UnknownMilestone(milestone_id.clone()));
            }
        }

        // Stage changes re-check every dependency, not only new ones.
        let stage_changed = previous.is_some_and(|p| p.parent_stage_id != candidate.parent_stage_id);
        for dep_id in &candidate.dependencies {
            let known_before = previous.is_some_and(|p| p.dependencies.contains(dep_id));
            if known_before && !stage_changed {
                continue;
            }
            let Some(dependency) = self.get(dep_id) else {
                if known_before {
                    continue;
                }
                return Err(TaskValidationError::UnknownDependency(dep_id.clone()));
            };
            if dependency.kind != candidate.kind {
                return Err(TaskValidationError::DependencyKindMismatch {
                    dependency: dep_id.clone(),
                    expected: candidate.kind,
                    actual: dependency.kind,
                });
            }
            if candidate.kind == TaskKind::Task
                && dependency.parent_stage_id != candidate.parent_stage_id
            {
                return Err(TaskValidationError::DependencyStageMismatch {
                    dependency: dep_id.clone(),
                });
            }
        }

        if let Some(dependency) = self.find_cycle(candidate) {
            return Err(TaskValidationError::DependencyCycle {
                task: candidate.id.clone(),
                dependency,
            });
        }

        Ok(())
    }

    fn is_kind(&self, id: &str, kind: TaskKind) -> bool {
        self.get(id).is_some_and(|task| task.kind == kind)
    }

    /// Walks the dependency graph from each of the candidate's dependencies
    /// and returns the first one that leads back to the candidate.
    fn find_cycle(&self, candidate: &Task) -> Option<TaskId> {
        for root in &candidate.dependencies {
            let mut visited = HashSet::new();
            let mut stack = vec![root.as_str()];
            while let Some(current) = stack.pop() {
                if current == candidate.id {
                    return Some(root.clone());
                }
                if !visited.insert(current) {
                    continue;
                }
                if let Some(task) = self.get(current) {
                    stack.extend(task.dependencies.iter().map(String::as_str));
                }
            }
        }
        None
    }
}
