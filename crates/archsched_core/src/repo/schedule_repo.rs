//! Schedule repository contract and SQLite implementation.
//!
//! # Invariants
//! - Rows are keyed by `(project_id, task_id)`.
//! - `list_tasks` returns records in insertion order (`seq`).
//! - Dependency order is preserved through the `position` column.
//! - Each write runs in one immediate transaction.

use crate::db::DbError;
use crate::error::ErrorKind;
use crate::model::task::{Task, TaskId, TaskKind, TaskStatus, TaskValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATE_FORMAT: &str = "%Y-%m-%d";

const TASK_SELECT_SQL: &str = "SELECT
    task_id,
    name,
    kind,
    start_date,
    end_date,
    progress,
    status,
    parent_stage_id,
    milestone_id,
    sort_key,
    color
FROM schedule_tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from schedule persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    /// Stored row cannot be turned back into a valid record.
    InvalidData(String),
}

impl RepoError {
    /// Rejected writes keep their validation category; everything else is a
    /// storage failure from the caller's point of view.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Db(_) | Self::InvalidData(_) => ErrorKind::Storage,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "stored schedule entity not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid stored schedule data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage for one or more projects' boards.
pub trait ScheduleRepository {
    fn list_tasks(&self, project_id: &str) -> RepoResult<Vec<Task>>;
    fn insert_task(&self, project_id: &str, task: &Task) -> RepoResult<()>;
    fn update_task(&self, project_id: &str, task: &Task) -> RepoResult<()>;
    fn delete_task(&self, project_id: &str, id: &str) -> RepoResult<()>;
}

/// SQLite-backed schedule repository.
pub struct SqliteScheduleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteScheduleRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ScheduleRepository for SqliteScheduleRepository<'_> {
    fn list_tasks(&self, project_id: &str) -> RepoResult<Vec<Task>> {
        let mut dependencies = load_dependencies(self.conn, project_id)?;

        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE project_id = ?1
             ORDER BY seq ASC;"
        ))?;
        let mut rows = stmt.query([project_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            let mut task = parse_task_row(row)?;
            task.dependencies = dependencies.remove(&task.id).unwrap_or_default();
            task.validate()
                .map_err(|err| RepoError::InvalidData(format!("row {}: {err}", task.id)))?;
            tasks.push(task);
        }
        Ok(tasks)
    }

    fn insert_task(&self, project_id: &str, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let seq: i64 = tx.query_row(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM schedule_tasks WHERE project_id = ?1;",
            [project_id],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO schedule_tasks (
                project_id,
                task_id,
                seq,
                name,
                kind,
                start_date,
                end_date,
                progress,
                status,
                parent_stage_id,
                milestone_id,
                sort_key,
                color,
                created_at,
                updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                (strftime('%s', 'now') * 1000),
                (strftime('%s', 'now') * 1000)
            );",
            params![
                project_id,
                task.id.as_str(),
                seq,
                task.name.as_str(),
                task.kind.as_str(),
                format_date(task.start),
                format_date(task.end),
                task.progress,
                task.status.as_str(),
                task.parent_stage_id.as_deref(),
                task.milestone_id.as_deref(),
                task.sort_key,
                task.color.as_deref(),
            ],
        )?;
        write_dependencies(&tx, project_id, task)?;
        tx.commit()?;
        Ok(())
    }

    fn update_task(&self, project_id: &str, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE schedule_tasks
             SET
                name = ?3,
                kind = ?4,
                start_date = ?5,
                end_date = ?6,
                progress = ?7,
                status = ?8,
                parent_stage_id = ?9,
                milestone_id = ?10,
                sort_key = ?11,
                color = ?12,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE project_id = ?1 AND task_id = ?2;",
            params![
                project_id,
                task.id.as_str(),
                task.name.as_str(),
                task.kind.as_str(),
                format_date(task.start),
                format_date(task.end),
                task.progress,
                task.status.as_str(),
                task.parent_stage_id.as_deref(),
                task.milestone_id.as_deref(),
                task.sort_key,
                task.color.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(task.id.clone()));
        }

        tx.execute(
            "DELETE FROM schedule_task_dependencies WHERE project_id = ?1 AND task_id = ?2;",
            params![project_id, task.id.as_str()],
        )?;
        write_dependencies(&tx, project_id, task)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_task(&self, project_id: &str, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM schedule_tasks WHERE project_id = ?1 AND task_id = ?2;",
            params![project_id, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn write_dependencies(tx: &Transaction<'_>, project_id: &str, task: &Task) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO schedule_task_dependencies (project_id, task_id, depends_on, position)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    for (position, dependency) in task.dependencies.iter().enumerate() {
        stmt.execute(params![
            project_id,
            task.id.as_str(),
            dependency.as_str(),
            position as i64
        ])?;
    }
    Ok(())
}

fn load_dependencies(
    conn: &Connection,
    project_id: &str,
) -> RepoResult<HashMap<TaskId, Vec<TaskId>>> {
    let mut stmt = conn.prepare(
        "SELECT task_id, depends_on
         FROM schedule_task_dependencies
         WHERE project_id = ?1
         ORDER BY task_id ASC, position ASC;",
    )?;
    let mut rows = stmt.query([project_id])?;
    let mut dependencies: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let task_id: String = row.get(0)?;
        let depends_on: String = row.get(1)?;
        dependencies.entry(task_id).or_default().push(depends_on);
    }
    Ok(dependencies)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let kind_text: String = row.get("kind")?;
    let kind = TaskKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid kind `{kind_text}` in schedule_tasks.kind"))
    })?;

    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in schedule_tasks.status"
        ))
    })?;

    Ok(Task {
        id: row.get("task_id")?,
        name: row.get("name")?,
        kind,
        start: parse_date(row.get("start_date")?, "start_date")?,
        end: parse_date(row.get("end_date")?, "end_date")?,
        progress: row.get("progress")?,
        status,
        parent_stage_id: row.get("parent_stage_id")?,
        milestone_id: row.get("milestone_id")?,
        dependencies: Vec::new(),
        sort_key: row.get("sort_key")?,
        color: row.get("color")?,
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: String, column: &'static str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{value}` in schedule_tasks.{column}"))
    })
}
