//! Error types for rule tables.

use thiserror::Error;

/// Errors that can occur while building or querying rule tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A requested rule name is not in the table
    #[error("{name} is not a valid default rule")]
    UnknownRule {
        /// The name that was requested
        name: String,
    },

    /// A rule with the same name is already in the set
    #[error("rule {name} is already defined in this rule set")]
    DuplicateRule {
        /// The conflicting name
        name: String,
    },
}

/// Result type for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
