//! Cross-cutting error classification.
//!
//! Every service error maps onto one of a small set of kinds so callers (an
//! HTTP layer, a CLI) can translate failures without matching on each
//! context's enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification shared by all service errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input was missing or malformed; nothing was persisted.
    Validation,
    /// A referenced record does not exist; nothing was persisted.
    NotFound,
    /// The request conflicts with current state; nothing was mutated.
    Conflict,
    /// Storage or another collaborator failed.
    Internal,
}

impl ErrorKind {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
