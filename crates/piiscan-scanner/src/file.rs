//! File scan units.
//!
//! A [`ScanFile`] owns one input file's content and every result produced
//! for it. Content is loaded and decoded once and never changes afterwards,
//! so rule workers read it without locking. Hits, matches, latencies and the error
//! state live behind the unit's own mutex; units never share a lock.

use crate::error::ScanError;
use crate::metric::{as_millis_f64, Metric};
use crate::report::FileReport;
use crate::tester::ScanSettings;
use futures::future::join_all;
use piiscan_rules::Rule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Lifecycle of a [`ScanFile`].
///
/// `Created -> Loading -> (Errored | Loaded) -> Detected -> Matched`.
/// `Errored` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    /// Path recorded, nothing read
    #[default]
    Created,
    /// Content is being read
    Loading,
    /// Content could not be read
    Errored,
    /// Content is in memory
    Loaded,
    /// Detection predicates have run
    Detected,
    /// Extraction functions have run
    Matched,
}

#[derive(Debug)]
struct FileState {
    state: ScanState,
    rules: Arc<[Rule]>,
    hits: BTreeMap<String, bool>,
    matches: BTreeMap<String, Vec<String>>,
    error_message: Option<String>,
    metric: Metric,
}

impl Default for FileState {
    fn default() -> Self {
        Self {
            state: ScanState::Created,
            rules: Arc::from(Vec::new()),
            hits: BTreeMap::new(),
            matches: BTreeMap::new(),
            error_message: None,
            metric: Metric::default(),
        }
    }
}

/// One input file and its per-rule results.
#[derive(Debug)]
pub struct ScanFile {
    filename: String,
    path: PathBuf,
    text: OnceLock<Arc<str>>,
    state: Mutex<FileState>,
}

impl ScanFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        Self {
            filename,
            path,
            text: OnceLock::new(),
            state: Mutex::new(FileState::default()),
        }
    }

    /// A panicked rule worker leaves only completed inserts behind, so the
    /// state is still usable after poisoning.
    fn lock(&self) -> MutexGuard<'_, FileState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    /// Cache the active rule list and pre-populate empty result entries.
    ///
    /// Results from earlier runs are kept.
    pub(crate) fn prepare(&self, rules: Arc<[Rule]>, settings: ScanSettings) {
        let mut state = self.lock();
        for rule in rules.iter() {
            if settings.detect_pii {
                state.hits.entry(rule.name().to_string()).or_insert(false);
            }
            if settings.find_pii {
                state.matches.entry(rule.name().to_string()).or_default();
            }
        }
        state.rules = rules;
    }

    /// Read and decode the file content, at most once.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. An errored unit stays
    /// errored: its original load error is returned again without touching
    /// the filesystem.
    async fn load(&self, max_file_size: u64) -> Result<Arc<str>, ScanError> {
        if let Some(text) = self.text.get() {
            return Ok(Arc::clone(text));
        }

        {
            let mut state = self.lock();
            if let Some(reason) = &state.error_message {
                return Err(ScanError::Load {
                    path: self.display_path(),
                    reason: reason.clone(),
                });
            }
            state.state = ScanState::Loading;
        }

        match read_limited(&self.path, max_file_size).await {
            Ok(bytes) => {
                debug!(path = %self.path.display(), bytes = bytes.len(), "Loaded file");
                let text = Arc::clone(self.text.get_or_init(|| decode(bytes)));
                self.lock().state = ScanState::Loaded;
                Ok(text)
            }
            Err(reason) => {
                warn!(path = %self.path.display(), %reason, "Failed to load file");
                let mut state = self.lock();
                state.state = ScanState::Errored;
                state.error_message = Some(reason.clone());
                Err(ScanError::Load {
                    path: self.display_path(),
                    reason,
                })
            }
        }
    }

    /// Load the file and evaluate every cached rule's detection predicate.
    ///
    /// One blocking worker runs per rule; all are joined before returning.
    /// A matched unit whose hits come out the same stays `Matched`.
    pub(crate) async fn detect(self: Arc<Self>, max_file_size: u64) -> Vec<ScanError> {
        let text = match self.load(max_file_size).await {
            Ok(text) => text,
            Err(e) => return vec![e],
        };

        let (rules, previous) = {
            let state = self.lock();
            let previous = (state.state == ScanState::Matched).then(|| state.hits.clone());
            (Arc::clone(&state.rules), previous)
        };

        let workers: Vec<_> = rules
            .iter()
            .map(|&rule| {
                let file = Arc::clone(&self);
                let text = Arc::clone(&text);
                tokio::task::spawn_blocking(move || {
                    let start = Instant::now();
                    let hit = text.lines().any(|line| rule.is_match(line));
                    file.record_detection(rule.name(), hit, as_millis_f64(start.elapsed()));
                })
            })
            .collect();

        let errors = self.join_rule_workers(&rules, workers).await;

        let mut state = self.lock();
        let unchanged = previous.is_some_and(|hits| hits == state.hits);
        if state.state != ScanState::Errored && !unchanged {
            state.state = ScanState::Detected;
        }
        errors
    }

    /// Run extraction for every cached rule that hit.
    ///
    /// Matches replace any from a previous run. Errored or unloaded units
    /// are left alone.
    pub(crate) async fn find(self: Arc<Self>) -> Vec<ScanError> {
        let Some(text) = self.text.get().cloned() else {
            return Vec::new();
        };

        let rules: Arc<[Rule]> = {
            let state = self.lock();
            let hit: Vec<Rule> = state
                .rules
                .iter()
                .filter(|rule| state.hits.get(rule.name()).copied().unwrap_or(false))
                .copied()
                .collect();
            hit.into()
        };

        let workers: Vec<_> = rules
            .iter()
            .map(|&rule| {
                let file = Arc::clone(&self);
                let text = Arc::clone(&text);
                tokio::task::spawn_blocking(move || {
                    let start = Instant::now();
                    let found: Vec<String> =
                        text.lines().flat_map(|line| rule.extract(line)).collect();
                    file.record_matches(rule.name(), found, as_millis_f64(start.elapsed()));
                })
            })
            .collect();

        let errors = self.join_rule_workers(&rules, workers).await;
        self.advance_to(ScanState::Matched);
        errors
    }

    async fn join_rule_workers(
        &self,
        rules: &[Rule],
        workers: Vec<JoinHandle<()>>,
    ) -> Vec<ScanError> {
        join_all(workers)
            .await
            .into_iter()
            .zip(rules)
            .filter_map(|(joined, rule)| {
                joined.err().map(|e| ScanError::Task {
                    path: self.display_path(),
                    rule: rule.name().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    fn record_detection(&self, rule: &str, hit: bool, millis: f64) {
        let mut state = self.lock();
        state.hits.insert(rule.to_string(), hit);
        state
            .metric
            .detection_latencies
            .insert(rule.to_string(), millis);
    }

    fn record_matches(&self, rule: &str, found: Vec<String>, millis: f64) {
        let mut state = self.lock();
        state.matches.insert(rule.to_string(), found);
        state.metric.match_latencies.insert(rule.to_string(), millis);
    }

    fn advance_to(&self, next: ScanState) {
        let mut state = self.lock();
        if state.state != ScanState::Errored {
            state.state = next;
        }
    }

    /// Get the file name component of the path.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Get the path as added.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.lock().state
    }

    /// True if the content could not be loaded.
    #[must_use]
    pub fn is_errored(&self) -> bool {
        self.lock().error_message.is_some()
    }

    /// Get the load error message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.lock().error_message.clone()
    }

    /// Get the detection result of one rule.
    #[must_use]
    pub fn hit(&self, rule: &str) -> Option<bool> {
        self.lock().hits.get(rule).copied()
    }

    /// Copy the hit map.
    #[must_use]
    pub fn hits(&self) -> BTreeMap<String, bool> {
        self.lock().hits.clone()
    }

    /// Copy the match map.
    #[must_use]
    pub fn matches(&self) -> BTreeMap<String, Vec<String>> {
        self.lock().matches.clone()
    }

    /// Copy this file's latencies.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.lock().metric.clone()
    }

    /// Snapshot the public state for a report.
    #[must_use]
    pub fn report(&self) -> FileReport {
        let state = self.lock();
        FileReport {
            filename: self.filename.clone(),
            path: self.path.clone(),
            state: state.state,
            hits: state.hits.clone(),
            matches: state.matches.clone(),
            errored: state.error_message.is_some(),
            error_message: state.error_message.clone(),
            metric: state.metric.clone(),
        }
    }
}

fn decode(bytes: Vec<u8>) -> Arc<str> {
    match String::from_utf8(bytes) {
        Ok(text) => text.into(),
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into(),
    }
}

async fn read_limited(path: &Path, max_file_size: u64) -> Result<Vec<u8>, String> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| e.to_string())?;
    if !metadata.is_file() {
        return Err("not a regular file".to_string());
    }
    if metadata.len() > max_file_size {
        return Err(format!(
            "file is {} bytes, limit is {max_file_size}",
            metadata.len()
        ));
    }
    tokio::fs::read(path).await.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use piiscan_rules::DEFAULT_RULE_SET;
    use std::fs;
    use tempfile::TempDir;

    const LIMIT: u64 = 1024 * 1024;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write test file");
        path
    }

    fn prepared(path: PathBuf, find_pii: bool) -> Arc<ScanFile> {
        let file = Arc::new(ScanFile::new(path));
        let settings = ScanSettings {
            detect_pii: true,
            find_pii,
        };
        file.prepare(DEFAULT_RULE_SET.rules().into(), settings);
        file
    }

    #[test]
    fn test_new_file_is_created() {
        let file = ScanFile::new(PathBuf::from("/data/customers.csv"));
        assert_eq!(file.filename(), "customers.csv");
        assert_eq!(file.state(), ScanState::Created);
        assert!(file.hits().is_empty());
        assert!(!file.is_errored());
    }

    #[test]
    fn test_prepare_populates_entries() {
        let file = prepared(PathBuf::from("notes.txt"), true);
        let hits = file.hits();
        assert_eq!(hits.len(), DEFAULT_RULE_SET.len());
        assert!(hits.values().all(|hit| !hit));
        assert!(file.matches().values().all(Vec::is_empty));
    }

    #[tokio::test]
    async fn test_detect_and_find() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_file(
            &tmp,
            "contacts.txt",
            "nothing here\r\nemail jane.doe@example.org\nand ops@example.org too\n",
        );
        let file = prepared(path, true);

        let errors = Arc::clone(&file).detect(LIMIT).await;
        assert!(errors.is_empty());
        assert_eq!(file.state(), ScanState::Detected);
        assert_eq!(file.hit("email_address"), Some(true));
        assert_eq!(file.hit("ssn"), Some(false));
        assert!(file.metric().detection_latency("ssn").is_some());

        let errors = Arc::clone(&file).find().await;
        assert!(errors.is_empty());
        assert_eq!(file.state(), ScanState::Matched);
        assert_eq!(
            file.matches()["email_address"],
            vec!["jane.doe@example.org", "ops@example.org"]
        );
        // Rules that missed are not extracted
        assert!(file.matches()["ssn"].is_empty());
        assert!(file.metric().match_latency("ssn").is_none());
        assert!(file.metric().match_latency("email_address").is_some());
    }

    #[tokio::test]
    async fn test_missing_file_errors_once_and_stays_errored() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_file(&tmp, "gone.txt", "555-123-4567");
        let file = prepared(path.clone(), false);
        fs::remove_file(&path).expect("remove test file");

        let errors = Arc::clone(&file).detect(LIMIT).await;
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ScanError::Load { .. }));
        assert_eq!(file.state(), ScanState::Errored);
        assert!(file.is_errored());
        assert!(file.metric().is_empty());

        // Recreating the file does not revive the unit
        fs::write(&path, "555-123-4567").expect("rewrite test file");
        let errors = Arc::clone(&file).detect(LIMIT).await;
        assert_eq!(errors.len(), 1);
        assert_eq!(file.state(), ScanState::Errored);
        assert_eq!(file.hit("phone_number"), Some(false));
    }

    #[tokio::test]
    async fn test_oversize_file_fails_to_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_file(&tmp, "big.log", "0123456789abcdef");
        let file = prepared(path, false);

        let errors = Arc::clone(&file).detect(8).await;
        assert_eq!(errors.len(), 1);
        let message = file.error_message().expect("error recorded");
        assert!(message.contains("limit is 8"));
    }

    #[tokio::test]
    async fn test_find_without_detection_is_noop() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_file(&tmp, "a.txt", "jane.doe@example.org");
        let file = prepared(path, true);

        assert!(Arc::clone(&file).find().await.is_empty());
        assert_eq!(file.state(), ScanState::Created);
        assert!(file.metric().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_scanned_lossily() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("mixed.bin");
        let mut bytes = vec![0xff, 0xfe, b'\n'];
        bytes.extend_from_slice(b"ip 10.20.30.40\n");
        fs::write(&path, bytes).expect("write test file");
        let file = prepared(path, true);

        assert!(Arc::clone(&file).detect(LIMIT).await.is_empty());
        let text = file.text.get().expect("content loaded");
        assert!(text.starts_with("\u{fffd}\u{fffd}\n"));

        assert!(Arc::clone(&file).find().await.is_empty());
        assert_eq!(file.matches()["ip_address"], vec!["10.20.30.40"]);
    }

    #[test]
    fn test_decode_keeps_valid_utf8() {
        assert_eq!(&*decode(b"ssn 536-22-1987".to_vec()), "ssn 536-22-1987");
        assert_eq!(&*decode(vec![b'a', 0xc3, b'b']), "a\u{fffd}b");
    }

    #[tokio::test]
    async fn test_repeat_detection_keeps_matched_state() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = write_file(&tmp, "hr.csv", "jane,536-22-1987
");
        let file = prepared(path, true);

        assert!(Arc::clone(&file).detect(LIMIT).await.is_empty());
        assert!(Arc::clone(&file).find().await.is_empty());
        assert_eq!(file.state(), ScanState::Matched);

        assert!(Arc::clone(&file).detect(LIMIT).await.is_empty());
        assert_eq!(file.state(), ScanState::Matched);
        assert_eq!(file.matches()["ssn"], vec!["536-22-1987"]);
    }
}
