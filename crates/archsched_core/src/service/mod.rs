//! Use-case services composing the board, storage and sharing.
//!
//! # Invariants
//! - Services own no business rules; those live in `board` and `model`.
//! - Storage-backed services change memory only after storage succeeds.

pub mod schedule_service;
