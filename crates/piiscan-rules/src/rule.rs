//! Rules and name-keyed rule sets.

use crate::category::Category;
use crate::error::{Result, RuleError};
use once_cell::sync::Lazy;
use piiscan_core::Severity;
use serde::Serialize;
use std::collections::BTreeMap;

/// The nine built-in rules, one per [`Category`].
pub static DEFAULT_RULE_SET: Lazy<RuleSet> =
    Lazy::new(|| Category::ALL.into_iter().map(Rule::new).collect());

/// A named pairing of a detection predicate and an extraction function.
///
/// Rules are immutable values and safe to share across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rule {
    name: &'static str,
    description: &'static str,
    severity: Severity,
    #[serde(skip)]
    category: Category,
}

impl Rule {
    /// Create the default rule for a category.
    #[must_use]
    pub fn new(category: Category) -> Self {
        Self {
            name: category.as_str(),
            description: category.description(),
            severity: category.severity(),
            category,
        }
    }

    /// Override the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Get the rule name (unique within a [`RuleSet`]).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Get the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the category supplying the predicate and extractor.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Run the detection predicate against a line.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.category.is_match(text)
    }

    /// Run the extraction function against a line.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.category.extract(text)
    }
}

impl From<Category> for Rule {
    fn from(category: Category) -> Self {
        Self::new(category)
    }
}

/// A collection of rules keyed by name.
///
/// Read-only after construction in normal use, so concurrent reads need
/// no synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: BTreeMap<&'static str, Rule>,
}

impl RuleSet {
    /// Create an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule set, rejecting duplicate names.
    pub fn try_from_rules(rules: impl IntoIterator<Item = Rule>) -> Result<Self> {
        let mut set = Self::new();
        for rule in rules {
            set.insert(rule)?;
        }
        Ok(set)
    }

    /// Add a rule.
    ///
    /// # Errors
    /// Returns [`RuleError::DuplicateRule`] if the name is already taken.
    pub fn insert(&mut self, rule: Rule) -> Result<()> {
        if self.rules.contains_key(rule.name()) {
            return Err(RuleError::DuplicateRule {
                name: rule.name().to_string(),
            });
        }
        self.rules.insert(rule.name(), rule);
        Ok(())
    }

    /// Get a rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Check if a rule with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Copy every rule into a list.
    #[must_use]
    pub fn rules(&self) -> Vec<Rule> {
        self.rules.values().copied().collect()
    }

    /// Return every rule whose detection predicate matches `text`.
    #[must_use]
    pub fn hits(&self, text: &str) -> Vec<Rule> {
        self.rules
            .values()
            .filter(|rule| rule.is_match(text))
            .copied()
            .collect()
    }

    /// Look up rules by name, in the order given.
    ///
    /// Fails on the first unknown name, or on a name given twice.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Rule>> {
        let mut selected: Vec<Rule> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let rule = self.get(name).ok_or_else(|| RuleError::UnknownRule {
                name: name.to_string(),
            })?;
            if selected.iter().any(|chosen| chosen.name() == name) {
                return Err(RuleError::DuplicateRule {
                    name: name.to_string(),
                });
            }
            selected.push(*rule);
        }
        Ok(selected)
    }
}

/// Later rules replace earlier ones with the same name; use
/// [`RuleSet::try_from_rules`] to reject duplicates instead.
impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(|rule| (rule.name(), rule)).collect(),
        }
    }
}
