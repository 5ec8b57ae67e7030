//! Serializable scan reports.

use crate::error::Result;
use crate::file::ScanState;
use crate::metric::Metric;
use piiscan_core::Severity;
use piiscan_rules::Rule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Rule metadata as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    /// Rule name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Severity level (1-5)
    pub severity: Severity,
}

impl From<&Rule> for RuleSummary {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name().to_string(),
            description: rule.description().to_string(),
            severity: rule.severity(),
        }
    }
}

/// Results for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    /// File name component of the path
    pub filename: String,
    /// Path as added to the tester
    pub path: PathBuf,
    /// Lifecycle state when the report was taken
    pub state: ScanState,
    /// Detection result per rule
    pub hits: BTreeMap<String, bool>,
    /// Extracted literals per rule
    pub matches: BTreeMap<String, Vec<String>>,
    /// True if the content could not be loaded
    pub errored: bool,
    /// Load error, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Per-rule latencies for this file
    #[serde(flatten)]
    pub metric: Metric,
}

impl FileReport {
    /// Names of the rules that hit, in name order.
    #[must_use]
    pub fn rules_hit(&self) -> Vec<&str> {
        self.hits
            .iter()
            .filter(|(_, hit)| **hit)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Results for a whole tester run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Whether detection was enabled
    pub detect_pii: bool,
    /// Whether extraction was enabled
    pub find_pii: bool,
    /// Mean latencies across non-errored files
    #[serde(flatten)]
    pub metric: Metric,
    /// Active rules
    pub rules: Vec<RuleSummary>,
    /// Per-file results, in the order files were added
    pub files: Vec<FileReport>,
}

impl ScanReport {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of files that could not be loaded.
    #[must_use]
    pub fn errored_files(&self) -> usize {
        self.files.iter().filter(|file| file.errored).count()
    }

    /// Files with at least one hit.
    pub fn files_with_hits(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|file| file.hits.values().any(|hit| *hit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piiscan_rules::Category;

    fn sample_file() -> FileReport {
        let mut metric = Metric::default();
        metric.detection_latencies.insert("ssn".to_string(), 0.5);

        FileReport {
            filename: "hr.csv".to_string(),
            path: PathBuf::from("/data/hr.csv"),
            state: ScanState::Matched,
            hits: BTreeMap::from([
                ("ssn".to_string(), true),
                ("email_address".to_string(), false),
            ]),
            matches: BTreeMap::from([("ssn".to_string(), vec!["536-22-1987".to_string()])]),
            errored: false,
            error_message: None,
            metric,
        }
    }

    #[test]
    fn test_report_json_layout() {
        let report = ScanReport {
            detect_pii: true,
            find_pii: true,
            metric: Metric::default(),
            rules: vec![RuleSummary::from(&Rule::new(Category::Ssn))],
            files: vec![sample_file()],
        };

        let json: serde_json::Value =
            serde_json::from_str(&report.to_json().expect("serialize report"))
                .expect("parse report");

        assert_eq!(json["detect_pii"], true);
        assert!(json["detection_latencies"].is_object());
        assert!(json["match_latencies"].is_object());
        assert_eq!(json["rules"][0]["name"], "ssn");
        assert_eq!(json["rules"][0]["severity"], 5);

        let file = &json["files"][0];
        assert_eq!(file["filename"], "hr.csv");
        assert_eq!(file["state"], "matched");
        assert_eq!(file["hits"]["ssn"], true);
        assert_eq!(file["matches"]["ssn"][0], "536-22-1987");
        assert_eq!(file["detection_latencies"]["ssn"], 0.5);
        assert!(file.get("error_message").is_none());
    }

    #[test]
    fn test_report_parses_back() {
        let report = ScanReport {
            detect_pii: true,
            find_pii: false,
            metric: Metric::default(),
            rules: Vec::new(),
            files: vec![sample_file()],
        };
        let json = report.to_json().expect("serialize report");
        let parsed: ScanReport = serde_json::from_str(&json).expect("parse report");
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_summaries() {
        let mut errored = sample_file();
        errored.errored = true;
        errored.error_message = Some("permission denied".to_string());
        errored.hits.clear();

        let report = ScanReport {
            detect_pii: true,
            find_pii: false,
            metric: Metric::default(),
            rules: Vec::new(),
            files: vec![sample_file(), errored],
        };

        assert_eq!(report.errored_files(), 1);
        assert_eq!(report.files_with_hits().count(), 1);
        assert_eq!(report.files[0].rules_hit(), vec!["ssn"]);
    }
}
