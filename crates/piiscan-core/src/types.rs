//! Shared types used across piiscan.

use crate::error::PiiscanError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How damaging the disclosure of a category of PII is.
///
/// Serialized as its numeric level (1-5) so reports stay compatible with
/// consumers that expect a bare integer, while invalid levels cannot be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Severity {
    /// Level 1: rarely identifying on its own
    Informational = 1,
    /// Level 2: identifies a device or asset rather than a person
    Low = 2,
    /// Level 3: contact or tracking information
    Moderate = 3,
    /// Level 4: identifying when combined with other data
    High = 4,
    /// Level 5: directly enables fraud or identity theft
    Critical = 5,
}

impl Severity {
    /// Get the numeric level (1-5).
    #[must_use]
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Get a lowercase label for the level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = PiiscanError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Informational),
            2 => Ok(Self::Low),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::High),
            5 => Ok(Self::Critical),
            other => Err(PiiscanError::Validation(format!(
                "invalid severity: must be between 1 and 5, got {other}"
            ))),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.level()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
