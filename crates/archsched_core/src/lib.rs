//! Core scheduling logic for archsched.
//! Board rules, milestone alerts, ordering and share snapshots live here;
//! the server and CLI crates only adapt them to their surfaces.

pub mod board;
pub mod clock;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod share;

pub use board::alerts::{milestone_alerts, MilestoneAlert};
pub use board::gantt::{display_window, gantt_rows, DisplayWindow, GanttRow};
pub use board::ordering::{reorder_key, sorted_tasks, REORDER_STEP};
pub use board::{BoardError, BoardResult, ScheduleBoard};
pub use clock::{Clock, ManualClock, SystemClock};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use error::ErrorKind;
pub use logging::{default_log_dir, default_log_level, init_logging, logging_status};
pub use model::input::{TaskInput, TaskPatch};
pub use model::task::{Task, TaskId, TaskKind, TaskStatus, TaskValidationError};
pub use repo::schedule_repo::{
    RepoError, RepoResult, ScheduleRepository, SqliteScheduleRepository,
};
pub use service::schedule_service::{
    ScheduleService, ScheduleServiceError, ScheduleServiceResult,
};
pub use share::{
    InMemoryShareStore, ShareError, ShareLink, ShareLookup, ShareResult, ShareService,
    ShareSnapshot, ShareStore, SHARE_PATH_PREFIX,
};
