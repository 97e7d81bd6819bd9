//! Share use-case service.
//!
//! # Responsibility
//! - Validate share requests, mint tokens and compute expiry.
//! - Translate store lookups into typed results.
//! - Build public share URLs.

use crate::clock::Clock;
use crate::model::task::Task;
use crate::share::store::{ShareLookup, ShareStore};
use crate::share::{ShareError, ShareResult, ShareSnapshot};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;

/// Path under the public base URL where shared schedules are viewed.
pub const SHARE_PATH_PREFIX: &str = "/schedule/share/";

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const MAX_TOKEN_ATTEMPTS: usize = 4;

/// Result of a successful share creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub token: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Share service over a pluggable store.
pub struct ShareService<S: ShareStore> {
    store: S,
    clock: Arc<dyn Clock>,
    public_base_url: String,
}

impl<S: ShareStore> ShareService<S> {
    /// Creates a service issuing URLs under `public_base_url`.
    pub fn new(store: S, clock: Arc<dyn Clock>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            store,
            clock,
            public_base_url,
        }
    }

    /// Freezes `tasks` behind a new token valid for `validity_hours`.
    ///
    /// # Errors
    /// - `InvalidValidity` when hours are not positive and finite, or the
    ///   resulting expiry is not representable.
    /// - `InvalidTask` when a submitted record violates its invariants.
    pub fn create_share(&self, tasks: Vec<Task>, validity_hours: f64) -> ShareResult<ShareLink> {
        let validity = validity_from_hours(validity_hours)?;
        for task in &tasks {
            task.validate().map_err(|source| ShareError::InvalidTask {
                id: task.id.clone(),
                source,
            })?;
        }

        let created_at = self.clock.now();
        let expires_at = created_at
            .checked_add_signed(validity)
            .ok_or(ShareError::InvalidValidity(validity_hours))?;
        let task_count = tasks.len();

        let mut snapshot = ShareSnapshot {
            token: new_token(),
            tasks,
            created_at,
            expires_at,
        };
        let mut attempts = 1;
        let token = loop {
            let token = snapshot.token.clone();
            match self.store.insert(snapshot) {
                Ok(()) => break token,
                Err(rejected) if attempts < MAX_TOKEN_ATTEMPTS => {
                    attempts += 1;
                    snapshot = rejected;
                    snapshot.token = new_token();
                }
                Err(_) => {
                    warn!(
                        "event=share_create module=share status=error error_code=token_collision attempts={attempts}"
                    );
                    return Err(ShareError::TokenCollision);
                }
            }
        };

        info!(
            "event=share_create module=share status=ok task_count={task_count} validity_hours={validity_hours} expires_at={}",
            expires_at.to_rfc3339()
        );
        Ok(ShareLink {
            url: self.share_url(&token),
            token,
            expires_at,
        })
    }

    /// Returns the snapshot behind `token` if it is still live.
    ///
    /// An expired snapshot is evicted by this call, so every later call for
    /// the same token reports `NotFound`.
    pub fn get_share(&self, token: &str) -> ShareResult<Arc<ShareSnapshot>> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ShareError::MissingToken);
        }

        match self.store.lookup(token, self.clock.now()) {
            ShareLookup::Live(snapshot) => Ok(snapshot),
            ShareLookup::Expired(expired_at) => {
                info!("event=share_get module=share status=expired evicted=1");
                Err(ShareError::Expired {
                    token: token.to_string(),
                    expired_at,
                })
            }
            ShareLookup::Missing => Err(ShareError::NotFound(token.to_string())),
        }
    }

    /// Evicts all expired snapshots; returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let evicted = self.store.sweep(self.clock.now());
        if evicted > 0 {
            info!(
                "event=share_sweep module=share status=ok evicted={evicted} remaining={}",
                self.store.len()
            );
        }
        evicted
    }

    /// Number of snapshots currently held, live or not yet swept.
    pub fn stored_shares(&self) -> usize {
        self.store.len()
    }

    /// Public URL for `token`.
    pub fn share_url(&self, token: &str) -> String {
        format!("{}{SHARE_PATH_PREFIX}{token}", self.public_base_url)
    }
}

fn validity_from_hours(hours: f64) -> ShareResult<Duration> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(ShareError::InvalidValidity(hours));
    }
    let millis = (hours * MILLIS_PER_HOUR).round();
    if millis < 1.0 || millis >= i64::MAX as f64 {
        return Err(ShareError::InvalidValidity(hours));
    }
    Duration::try_milliseconds(millis as i64).ok_or(ShareError::InvalidValidity(hours))
}

/// 128 random bits rendered as 32 lowercase hex characters.
fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}
