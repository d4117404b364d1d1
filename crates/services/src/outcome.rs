//! Business outcomes that are answers rather than errors.

use std::fmt;

/// Result of a password-guarded delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Success,
    IncorrectPassword,
}

impl DeleteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteOutcome::Success => "success",
            DeleteOutcome::IncorrectPassword => "incorrect password",
        }
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgement of a report. Reports never fail on a missing target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reported;

impl Reported {
    pub fn as_str(&self) -> &'static str {
        "reported"
    }
}

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
