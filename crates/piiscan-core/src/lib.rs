//! Piiscan Core - Foundation crate for the piiscan PII scanner.
//!
//! This crate provides the shared types, error handling and configuration
//! management that the rule and scanner crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared enums (`Severity`)
//!
//! # Example
//!
//! ```rust
//! use piiscan_core::{AppConfig, Severity};
//!
//! let config = AppConfig::default();
//! assert!(config.scanning.detect_enabled);
//! assert_eq!(Severity::try_from(5).ok(), Some(Severity::Critical));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, LoggingConfig, ScanningConfig};
pub use error::{ConfigError, ConfigResult, PiiscanError};
pub use types::Severity;
