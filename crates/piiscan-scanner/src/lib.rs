//! Piiscan Scanner - concurrent rule evaluation over files.
//!
//! A [`Tester`] holds the active rules and one [`ScanFile`] per input.
//! Running it loads each file once, evaluates every rule's detection
//! predicate, optionally extracts the matching literals for the rules that
//! hit, and aggregates per-rule latencies into a [`Metric`].
//!
//! # Example
//!
//! ```rust,no_run
//! use piiscan_scanner::{NoProgress, Tester};
//!
//! # async fn example() -> piiscan_scanner::Result<()> {
//! let mut tester = Tester::with_rules(&["phone_number", "credit_card"])?;
//! tester.set_finder(true);
//! tester.add_file("customers.csv")?;
//!
//! for error in tester.run(&NoProgress).await {
//!     eprintln!("{error}");
//! }
//! println!("{}", tester.report().to_json()?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod file;
pub mod metric;
pub mod progress;
pub mod report;
pub mod tester;

// Re-export commonly used types
pub use error::{Result, ScanError};
pub use file::{ScanFile, ScanState};
pub use metric::Metric;
pub use progress::{LogProgress, NoProgress, Phase, Progress};
pub use report::{FileReport, RuleSummary, ScanReport};
pub use tester::{ScanSettings, Tester};
