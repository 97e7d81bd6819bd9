//! Persisted schedule board for one project.
//!
//! # Responsibility
//! - Load a project's records into a `ScheduleBoard`.
//! - Run every mutation as plan on the board, write to storage, apply.
//!
//! # Invariants
//! - A storage failure leaves the in-memory board untouched.
//! - Storage failures are logged and surfaced once; there is no retry.
//! - Writes the repository rejects as invalid surface as validation errors.

use crate::board::{BoardError, ScheduleBoard};
use crate::clock::Clock;
use crate::error::ErrorKind;
use crate::model::input::{TaskInput, TaskPatch};
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::schedule_repo::{RepoError, ScheduleRepository};
use chrono::NaiveDate;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type ScheduleServiceResult<T> = Result<T, ScheduleServiceError>;

/// Errors surfaced by `ScheduleService`.
#[derive(Debug)]
pub enum ScheduleServiceError {
    Validation(TaskValidationError),
    NotFound(TaskId),
    Storage(RepoError),
}

impl ScheduleServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl Display for ScheduleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "schedule entity not found: {id}"),
            Self::Storage(err) => write!(f, "schedule storage failed: {err}"),
        }
    }
}

impl Error for ScheduleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<BoardError> for ScheduleServiceError {
    fn from(value: BoardError) -> Self {
        match value {
            BoardError::Validation(err) => Self::Validation(err),
            BoardError::NotFound(id) => Self::NotFound(id),
        }
    }
}

impl From<RepoError> for ScheduleServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

/// Board editing session backed by a repository.
pub struct ScheduleService<R: ScheduleRepository> {
    repo: R,
    project_id: String,
    board: ScheduleBoard,
}

impl<R: ScheduleRepository> ScheduleService<R> {
    /// Loads `project_id` from `repo`.
    ///
    /// # Errors
    /// - `Storage` when reading fails or stored records are inconsistent.
    pub fn open(
        repo: R,
        project_id: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> ScheduleServiceResult<Self> {
        let project_id = project_id.into();
        let tasks = repo
            .list_tasks(&project_id)
            .map_err(|err| repo_failure("board_load", err))?;
        let board = ScheduleBoard::from_tasks(tasks, clock).map_err(|err| {
            repo_failure("board_load", RepoError::InvalidData(err.to_string()))
        })?;

        info!(
            "event=board_load module=service status=ok project_id={project_id} task_count={} alert_count={}",
            board.len(),
            board.alerts().len()
        );
        Ok(Self {
            repo,
            project_id,
            board,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Read access to the current board.
    pub fn board(&self) -> &ScheduleBoard {
        &self.board
    }

    /// Recomputes alerts when only time has advanced.
    pub fn refresh_alerts(&mut self) {
        self.board.refresh_alerts();
    }

    /// Validates, stores and adds a new entity.
    pub fn create_task(&mut self, input: TaskInput) -> ScheduleServiceResult<&Task> {
        let task = self.board.plan_create(input)?;
        self.repo
            .insert_task(&self.project_id, &task)
            .map_err(|err| repo_failure("task_create", err))?;
        Ok(self.board.apply_insert(task))
    }

    /// Validates, stores and applies an edit.
    pub fn update_task(&mut self, id: &str, patch: &TaskPatch) -> ScheduleServiceResult<&Task> {
        let task = self.board.plan_update(id, patch)?;
        self.repo
            .update_task(&self.project_id, &task)
            .map_err(|err| repo_failure("task_update", err))?;
        Ok(self.board.apply_replace(task)?)
    }

    /// Date drag from the chart.
    pub fn reschedule(
        &mut self,
        id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleServiceResult<&Task> {
        self.update_task(id, &TaskPatch::reschedule(start, end))
    }

    /// Progress drag from the chart.
    pub fn set_progress(&mut self, id: &str, progress: f64) -> ScheduleServiceResult<&Task> {
        self.update_task(id, &TaskPatch::progress(progress))
    }

    /// Deletes `id` from storage, then from the board.
    pub fn delete_task(&mut self, id: &str) -> ScheduleServiceResult<Task> {
        if self.board.get(id).is_none() {
            return Err(ScheduleServiceError::NotFound(id.to_string()));
        }
        self.repo
            .delete_task(&self.project_id, id)
            .map_err(|err| repo_failure("task_delete", err))?;
        Ok(self.board.apply_remove(id)?)
    }

    /// Reorders within a type-group; `Ok(None)` for an ignored drop.
    pub fn reorder(
        &mut self,
        dragged_id: &str,
        target_id: &str,
    ) -> ScheduleServiceResult<Option<f64>> {
        let Some(sort_key) = self.board.plan_reorder(dragged_id, target_id)? else {
            return Ok(None);
        };
        let Some(current) = self.board.get(dragged_id) else {
            return Err(ScheduleServiceError::NotFound(dragged_id.to_string()));
        };
        let mut moved = current.clone();
        moved.sort_key = sort_key;
        self.repo
            .update_task(&self.project_id, &moved)
            .map_err(|err| repo_failure("task_reorder", err))?;
        self.board.apply_sort_key(dragged_id, sort_key)?;
        Ok(Some(sort_key))
    }
}

fn repo_failure(event: &str, err: RepoError) -> ScheduleServiceError {
    if let RepoError::Validation(source) = err {
        info!(
            "event={event} module=service status=rejected error_kind=validation error={source}"
        );
        return ScheduleServiceError::Validation(source);
    }
    error!(
        "event={event} module=service status=error error_kind={} error={err}",
        err.kind()
    );
    ScheduleServiceError::Storage(err)
}
