//! Shared error classification.
//!
//! # Responsibility
//! - Give every layer-specific error a common coarse category so boundary
//!   layers (HTTP, CLI) can map failures without matching every variant.
//!
//! # Invariants
//! - Categories are stable; new error variants must map onto one of them.

use std::fmt::{Display, Formatter};

/// Coarse failure category shared by all core error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input rejected at the boundary.
    Validation,
    /// Unknown entity id or share token.
    NotFound,
    /// Share token past its validity window.
    Expired,
    /// Persistence collaborator failure, propagated without retry.
    Storage,
}

impl ErrorKind {
    /// Stable snake_case code used in log records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::Storage => "storage",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
