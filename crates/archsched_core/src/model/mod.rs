//! Schedule domain model.
//!
//! # Responsibility
//! - Define the canonical entity record and its form payloads.
//! - Keep one record shape for the task, milestone and stage type-groups.
//!
//! # Invariants
//! - Every entity is identified by a stable `TaskId`.
//! - Intrinsic invariants are checked by `Task::validate`; cross-record rules
//!   live in the board.

pub mod input;
pub mod task;
