//! Persistence contracts for schedule boards.
//!
//! # Responsibility
//! - Define the storage seam the schedule service writes through.
//! - Keep SQL details out of board and service code.
//!
//! # Invariants
//! - Writes re-check `Task::validate` before touching storage.
//! - Reads reject rows that no longer satisfy record invariants.

pub mod schedule_repo;
