//! Time-limited read-only schedule sharing.
//!
//! # Responsibility
//! - Issue unguessable tokens mapping to frozen copies of a task list.
//! - Serve snapshots until expiry, then evict them on read or by sweep.
//!
//! # Invariants
//! - A snapshot is never mutated after creation; later board edits do not
//!   reach it.
//! - A token is retrievable while `now < expires_at` and never again after.
//! - Storage lives for one process only.

mod service;
mod store;

pub use service::{ShareLink, ShareService, SHARE_PATH_PREFIX};
pub use store::{InMemoryShareStore, ShareLookup, ShareStore};

use crate::error::ErrorKind;
use crate::model::task::{Task, TaskId, TaskValidationError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Frozen copy of a task list behind a share token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSnapshot {
    pub token: String,
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ShareSnapshot {
    /// Whether the snapshot may still be served at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

pub type ShareResult<T> = Result<T, ShareError>;

/// Errors from share creation and retrieval.
#[derive(Debug, Clone, PartialEq)]
pub enum ShareError {
    /// Validity window is not a positive, representable number of hours.
    InvalidValidity(f64),
    /// A task in the submitted list violates record invariants.
    InvalidTask {
        id: TaskId,
        source: TaskValidationError,
    },
    /// Token is empty after trim.
    MissingToken,
    /// No snapshot under this token.
    NotFound(String),
    /// Snapshot existed but its window has closed; it has been evicted.
    Expired {
        token: String,
        expired_at: DateTime<Utc>,
    },
    /// Random token generation kept colliding with live tokens.
    TokenCollision,
}

impl ShareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidValidity(_) | Self::InvalidTask { .. } | Self::MissingToken => {
                ErrorKind::Validation
            }
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Expired { .. } => ErrorKind::Expired,
            Self::TokenCollision => ErrorKind::Storage,
        }
    }
}

impl Display for ShareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValidity(hours) => {
                write!(f, "validity must be a positive number of hours, got {hours}")
            }
            Self::InvalidTask { id, source } => write!(f, "invalid task {id}: {source}"),
            Self::MissingToken => write!(f, "share token is required"),
            Self::NotFound(_) => write!(f, "share not found"),
            Self::Expired { expired_at, .. } => write!(f, "share expired at {expired_at}"),
            Self::TokenCollision => write!(f, "failed to allocate a unique share token"),
        }
    }
}

impl Error for ShareError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTask { source, .. } => Some(source),
            _ => None,
        }
    }
}
