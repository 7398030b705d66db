//! Shared result types for the validator engine.

use serde::{Deserialize, Serialize};

/// Outcome of a single validation.
///
/// Every failure path in the core degrades to a `Verdict` with
/// `passed: false` and a category-specific reason. Validators never
/// return errors; a malformed model output is a rejection, not a fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the output satisfied the task's constraints
    pub passed: bool,

    /// Human-readable reason ("OK" on acceptance)
    pub reason: String,
}

impl Verdict {
    /// Accept with the given reason.
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            passed: true,
            reason: reason.into(),
        }
    }

    /// Reject with the given reason.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: reason.into(),
        }
    }

    /// The 0/1 flag recorded in result tables.
    pub fn as_flag(&self) -> u8 {
        if self.passed {
            1
        } else {
            0
        }
    }
}
