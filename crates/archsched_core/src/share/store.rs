//! Keyed snapshot storage with expiry.
//!
//! # Invariants
//! - Lookup, expiry check and eviction of one token happen under one lock,
//!   so a reader never observes a half-evicted entry.
//! - The sweep holds the same lock for its whole scan.

use crate::share::ShareSnapshot;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of a token lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ShareLookup {
    Live(Arc<ShareSnapshot>),
    /// Entry existed but was past expiry; it has been removed.
    Expired(DateTime<Utc>),
    Missing,
}

/// Storage contract for share snapshots.
///
/// Any keyed store with expiry can stand behind this (an external cache
/// with native TTL, for example) without changing callers.
pub trait ShareStore: Send + Sync {
    /// Stores `snapshot` unless its token is taken, handing it back on a clash.
    fn insert(&self, snapshot: ShareSnapshot) -> Result<(), ShareSnapshot>;
    /// Returns the live snapshot, or evicts and reports an expired one.
    fn lookup(&self, token: &str, now: DateTime<Utc>) -> ShareLookup;
    /// Evicts every snapshot with `expires_at <= now`; returns how many.
    fn sweep(&self, now: DateTime<Utc>) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local share store.
#[derive(Debug, Default)]
pub struct InMemoryShareStore {
    entries: Mutex<HashMap<String, Arc<ShareSnapshot>>>,
}

impl InMemoryShareStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShareStore for InMemoryShareStore {
    fn insert(&self, snapshot: ShareSnapshot) -> Result<(), ShareSnapshot> {
        let mut entries = self.entries.lock();
        if entries.contains_key(&snapshot.token) {
            return Err(snapshot);
        }
        entries.insert(snapshot.token.clone(), Arc::new(snapshot));
        Ok(())
    }

    fn lookup(&self, token: &str, now: DateTime<Utc>) -> ShareLookup {
        let mut entries = self.entries.lock();
        let Some(snapshot) = entries.get(token) else {
            return ShareLookup::Missing;
        };
        if snapshot.is_live_at(now) {
            return ShareLookup::Live(Arc::clone(snapshot));
        }
        let expired_at = snapshot.expires_at;
        entries.remove(token);
        ShareLookup::Expired(expired_at)
    }

    fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, snapshot| snapshot.is_live_at(now));
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryShareStore, ShareLookup, ShareStore};
    use crate::share::ShareSnapshot;
    use chrono::{Duration, TimeZone, Utc};

    fn snapshot(token: &str, hours: i64) -> ShareSnapshot {
        let created_at = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
        ShareSnapshot {
            token: token.to_string(),
            tasks: Vec::new(),
            created_at,
            expires_at: created_at + Duration::hours(hours),
        }
    }

    #[test]
    fn insert_refuses_taken_token() {
        let store = InMemoryShareStore::new();
        assert!(store.insert(snapshot("abc", 1)).is_ok());
        let rejected = store.insert(snapshot("abc", 24)).unwrap_err();
        assert_eq!(rejected.token, "abc");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sweep_evicts_only_expired_entries() {
        let store = InMemoryShareStore::new();
        store.insert(snapshot("short", 1)).unwrap();
        store.insert(snapshot("long", 72)).unwrap();

        let later = Utc.with_ymd_and_hms(2025, 5, 1, 13, 0, 0).unwrap();
        assert_eq!(store.sweep(later), 1);
        assert!(matches!(store.lookup("long", later), ShareLookup::Live(_)));
        assert_eq!(store.lookup("short", later), ShareLookup::Missing);
    }
}
