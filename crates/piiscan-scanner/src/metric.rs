//! Per-rule latency metrics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Latencies in milliseconds, keyed by rule name.
///
/// A file's metric holds the latency of each rule it ran; the tester's
/// metric holds the mean across files. A missing key means no data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metric {
    /// Detection latency per rule
    pub detection_latencies: BTreeMap<String, f64>,
    /// Extraction latency per rule
    pub match_latencies: BTreeMap<String, f64>,
}

impl Metric {
    /// Get the detection latency of a rule.
    #[must_use]
    pub fn detection_latency(&self, rule: &str) -> Option<f64> {
        self.detection_latencies.get(rule).copied()
    }

    /// Get the extraction latency of a rule.
    #[must_use]
    pub fn match_latency(&self, rule: &str) -> Option<f64> {
        self.match_latencies.get(rule).copied()
    }

    /// True if no latency has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detection_latencies.is_empty() && self.match_latencies.is_empty()
    }
}

/// Convert a duration to fractional milliseconds.
#[must_use]
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Running sums for per-rule means.
#[derive(Debug, Default)]
pub(crate) struct MeanAccumulator {
    sums: BTreeMap<String, (f64, u32)>,
}

impl MeanAccumulator {
    pub(crate) fn add(&mut self, rule: &str, millis: f64) {
        let (total, count) = self.sums.entry(rule.to_string()).or_insert((0.0, 0));
        *total += millis;
        *count += 1;
    }

    /// Only rules that received at least one sample get a key.
    pub(crate) fn finish(self) -> BTreeMap<String, f64> {
        self.sums
            .into_iter()
            .map(|(rule, (total, count))| (rule, total / f64::from(count)))
            .collect()
    }
}
