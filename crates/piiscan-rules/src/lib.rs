//! Piiscan Rules - PII categories, validators and rule tables.
//!
//! A [`Rule`] binds a name, description and [`Severity`](piiscan_core::Severity)
//! to one [`Category`], which supplies the detection predicate and the
//! extraction function. Extraction runs every raw pattern for the category
//! and then discards literals rejected by the exclusion predicates in
//! [`exclusion`] or the structural validators in [`checksum`].
//!
//! # Example
//!
//! ```rust
//! use piiscan_rules::{Category, DEFAULT_RULE_SET};
//!
//! let hits = DEFAULT_RULE_SET.hits("call 555-123-4567");
//! assert!(hits.iter().any(|rule| rule.category() == Category::PhoneNumber));
//!
//! let cards = Category::CreditCard.extract("card 4111111111111111");
//! assert_eq!(cards, vec!["4111111111111111"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod category;
pub mod checksum;
pub mod error;
pub mod exclusion;
mod extract;
mod patterns;
pub mod rule;

// Re-export commonly used types
pub use category::Category;
pub use error::{Result, RuleError};
pub use rule::{Rule, RuleSet, DEFAULT_RULE_SET};
