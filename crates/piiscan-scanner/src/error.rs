//! Error types for scanning.

use piiscan_core::ConfigError;
use piiscan_rules::RuleError;
use thiserror::Error;

/// Errors that can occur while building a [`Tester`](crate::Tester) or
/// running its phases.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A path given to the tester does not exist
    #[error("file not found: {path}")]
    InputNotFound {
        /// The missing path
        path: String,
    },

    /// A path given as a directory is something else
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The offending path
        path: String,
    },

    /// A file existed when added but could not be read at scan time
    #[error("failed to load {path}: {reason}")]
    Load {
        /// Path of the file
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// A per-rule worker panicked or was cancelled
    #[error("rule {rule} failed on {path}: {reason}")]
    Task {
        /// Path of the file
        path: String,
        /// Rule that was running
        rule: String,
        /// Underlying cause
        reason: String,
    },

    /// A per-file worker panicked or was cancelled
    #[error("scan worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Rule lookup failed
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Scanner configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Report serialization failed
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ScanError {
    /// Path of the file this error concerns, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InputNotFound { path }
            | Self::NotADirectory { path }
            | Self::Load { path, .. }
            | Self::Task { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type for scanner operations.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rule_message() {
        let err = ScanError::from(RuleError::UnknownRule {
            name: "link".to_string(),
        });
        assert_eq!(err.to_string(), "link is not a valid default rule");
        assert!(err.path().is_none());
    }

    #[test]
    fn test_load_error_carries_path() {
        let err = ScanError::Load {
            path: "/tmp/gone.txt".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(err.path(), Some("/tmp/gone.txt"));
        assert!(err.to_string().contains("/tmp/gone.txt"));
    }
}
