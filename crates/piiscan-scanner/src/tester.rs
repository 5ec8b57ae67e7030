//! The scan harness.
//!
//! A [`Tester`] owns the active rules and every [`ScanFile`]. Its phases
//! fan out one worker per file, capped at `max_concurrent_files`, and each
//! file worker fans out one blocking worker per rule. Every phase joins all
//! of its workers before returning, and errors come back as worker return
//! values, so nothing is lost to a collector shutting down early.

use crate::error::{Result, ScanError};
use crate::file::ScanFile;
use crate::metric::{MeanAccumulator, Metric};
use crate::progress::{Phase, Progress};
use crate::report::{RuleSummary, ScanReport};
use futures::future::join_all;
use piiscan_core::config::{
    DEFAULT_MAX_CONCURRENT_FILES, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_SCAN_DEPTH,
};
use piiscan_core::ScanningConfig;
use piiscan_rules::{Category, Rule, DEFAULT_RULE_SET};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Which phases a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    /// Run detection predicates
    pub detect_pii: bool,
    /// Run extraction functions for rules that hit
    pub find_pii: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            detect_pii: true,
            find_pii: false,
        }
    }
}

/// Runs a set of rules against a set of files.
#[derive(Debug)]
pub struct Tester {
    rules: Vec<Rule>,
    files: Vec<Arc<ScanFile>>,
    settings: ScanSettings,
    metric: Metric,
    max_concurrent_files: usize,
    max_file_size: u64,
    max_scan_depth: usize,
}

impl Default for Tester {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl Tester {
    /// Create a tester with no rules and no files.
    #[must_use]
    pub fn new_empty() -> Self {
        Self {
            rules: Vec::new(),
            files: Vec::new(),
            settings: ScanSettings::default(),
            metric: Metric::default(),
            max_concurrent_files: DEFAULT_MAX_CONCURRENT_FILES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_scan_depth: DEFAULT_MAX_SCAN_DEPTH,
        }
    }

    /// Create a tester with every default rule, in table order.
    #[must_use]
    pub fn new_default() -> Self {
        Self {
            rules: Category::ALL.into_iter().map(Rule::new).collect(),
            ..Self::new_empty()
        }
    }

    /// Create a tester with the named subset of the default rules.
    ///
    /// # Errors
    /// Returns [`ScanError::Rule`] if any name is not a default rule or is
    /// given twice; no tester is built in that case.
    pub fn with_rules<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let rules = DEFAULT_RULE_SET.select(names)?;
        Ok(Self {
            rules,
            ..Self::new_empty()
        })
    }

    /// Create a tester from the `[scanning]` config section.
    ///
    /// An empty rule list selects every default rule.
    pub fn from_config(config: &ScanningConfig) -> Result<Self> {
        config.validate()?;

        let tester = if config.rules.is_empty() {
            Self::new_default()
        } else {
            Self::with_rules(&config.rules)?
        };

        let mut tester = tester
            .with_max_concurrent_files(config.max_concurrent_files)
            .with_max_file_size(config.max_file_size_bytes)
            .with_max_scan_depth(config.max_scan_depth);
        tester.set_detection(config.detect_enabled);
        tester.set_finder(config.find_enabled);
        Ok(tester)
    }

    /// Set the maximum number of files processed at once (at least 1).
    #[must_use]
    pub fn with_max_concurrent_files(mut self, max: usize) -> Self {
        self.max_concurrent_files = max.max(1);
        self
    }

    /// Set the largest file that will be loaded.
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Set the directory depth limit for [`Tester::add_directory`].
    #[must_use]
    pub fn with_max_scan_depth(mut self, depth: usize) -> Self {
        self.max_scan_depth = depth;
        self
    }

    /// Enable or disable detection.
    pub fn set_detection(&mut self, enabled: bool) {
        self.settings.detect_pii = enabled;
    }

    /// Enable or disable extraction.
    pub fn set_finder(&mut self, enabled: bool) {
        self.settings.find_pii = enabled;
    }

    /// Get the phase settings.
    #[must_use]
    pub fn settings(&self) -> ScanSettings {
        self.settings
    }

    /// Get the active rules.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Get the files, in the order they were added.
    pub fn files(&self) -> impl Iterator<Item = &ScanFile> {
        self.files.iter().map(|file| &**file)
    }

    /// Get the cross-file mean latencies from the last [`Tester::calc_averages`].
    #[must_use]
    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    /// Add one file. Its content is not read until detection.
    ///
    /// # Errors
    /// Returns [`ScanError::InputNotFound`] if the path does not exist.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScanError::InputNotFound {
                path: path.display().to_string(),
            });
        }

        debug!(path = %path.display(), "Adding file");
        self.files.push(Arc::new(ScanFile::new(path.to_path_buf())));
        Ok(())
    }

    /// Recursively add every regular file under a directory.
    ///
    /// Symlinks are skipped, as are directories deeper than the configured
    /// depth and directories that cannot be read. Files are added in path
    /// order. Returns the number of files added.
    pub async fn add_directory(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let metadata = tokio::fs::metadata(dir)
            .await
            .map_err(|_| ScanError::InputNotFound {
                path: dir.display().to_string(),
            })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: dir.display().to_string(),
            });
        }

        let mut paths = collect_files(dir, self.max_scan_depth).await;
        paths.sort();

        let added = paths.len();
        self.files
            .extend(paths.into_iter().map(|path| Arc::new(ScanFile::new(path))));
        info!(dir = %dir.display(), files = added, "Added directory");
        Ok(added)
    }

    /// Give every file the active rule list.
    ///
    /// Files are initialized concurrently; returns once all are done.
    pub async fn setup(&self) {
        let rules: Arc<[Rule]> = self.rules.clone().into();
        let settings = self.settings;

        join_all(self.files.iter().map(|file| {
            let rules = Arc::clone(&rules);
            async move { file.prepare(rules, settings) }
        }))
        .await;
    }

    /// Load every file and run the detection predicates.
    ///
    /// Returns every load and worker error. Files that failed to load on an
    /// earlier call are not read again, but their error is returned again.
    /// With no files or no rules this does nothing.
    pub async fn perform_detections(&self, progress: &dyn Progress) -> Vec<ScanError> {
        if self.files.is_empty() || self.rules.is_empty() {
            return Vec::new();
        }

        let max_file_size = self.max_file_size;
        self.fan_out(Phase::Detection, progress, |file| file.detect(max_file_size))
            .await
    }

    /// Run the extraction functions for every rule that hit.
    ///
    /// Errored files are skipped. With no files or no rules this does
    /// nothing.
    pub async fn perform_matches(&self, progress: &dyn Progress) -> Vec<ScanError> {
        if self.files.is_empty() || self.rules.is_empty() {
            return Vec::new();
        }

        self.fan_out(Phase::Matching, progress, ScanFile::find).await
    }

    async fn fan_out<F, Fut>(
        &self,
        phase: Phase,
        progress: &dyn Progress,
        work: F,
    ) -> Vec<ScanError>
    where
        F: Fn(Arc<ScanFile>) -> Fut,
        Fut: Future<Output = Vec<ScanError>> + Send + 'static,
    {
        progress.begin(phase, self.files.len());

        let mut workers = JoinSet::new();
        let mut errors = Vec::new();

        for file in &self.files {
            workers.spawn(work(Arc::clone(file)));

            // Respect concurrency limit
            while workers.len() >= self.max_concurrent_files {
                if let Some(joined) = workers.join_next().await {
                    collect_errors(joined, &mut errors);
                    progress.advance(phase);
                }
            }
        }

        while let Some(joined) = workers.join_next().await {
            collect_errors(joined, &mut errors);
            progress.advance(phase);
        }

        progress.finish(phase);
        info!(%phase, files = self.files.len(), errors = errors.len(), "Phase finished");
        errors
    }

    /// Compute per-rule mean latencies across files.
    ///
    /// Errored files are left out entirely. A file counts towards a rule's
    /// detection mean if it recorded a detection latency for it, and towards
    /// the extraction mean only if extraction is enabled and the rule hit.
    /// A rule with no contributing files gets no entry.
    pub fn calc_averages(&mut self) {
        let mut detection = MeanAccumulator::default();
        let mut matching = MeanAccumulator::default();

        for file in &self.files {
            if file.is_errored() {
                continue;
            }

            let metric = file.metric();
            for rule in &self.rules {
                let name = rule.name();
                if let Some(millis) = metric.detection_latency(name) {
                    detection.add(name, millis);
                }
                if self.settings.find_pii && file.hit(name) == Some(true) {
                    if let Some(millis) = metric.match_latency(name) {
                        matching.add(name, millis);
                    }
                }
            }
        }

        self.metric = Metric {
            detection_latencies: detection.finish(),
            match_latencies: matching.finish(),
        };
    }

    /// Run every enabled phase and compute the averages.
    ///
    /// Extraction needs detection results, so it only runs when both are
    /// enabled. Returns the errors of every phase that ran.
    pub async fn run(&mut self, progress: &dyn Progress) -> Vec<ScanError> {
        self.setup().await;

        let mut errors = Vec::new();
        if self.settings.detect_pii {
            errors.extend(self.perform_detections(progress).await);

            if self.settings.find_pii {
                errors.extend(self.perform_matches(progress).await);
            }
        } else if self.settings.find_pii {
            warn!("Extraction requested without detection, skipping");
        }

        self.calc_averages();
        errors
    }

    /// Snapshot the settings, rules, averages and every file's results.
    #[must_use]
    pub fn report(&self) -> ScanReport {
        ScanReport {
            detect_pii: self.settings.detect_pii,
            find_pii: self.settings.find_pii,
            metric: self.metric.clone(),
            rules: self.rules.iter().map(RuleSummary::from).collect(),
            files: self.files.iter().map(|file| file.report()).collect(),
        }
    }
}

fn collect_errors(
    joined: std::result::Result<Vec<ScanError>, JoinError>,
    errors: &mut Vec<ScanError>,
) {
    match joined {
        Ok(file_errors) => errors.extend(file_errors),
        Err(e) => {
            warn!("Scan worker failed: {}", e);
            errors.push(ScanError::Join(e));
        }
    }
}

/// Boxed so the recursion has a known size; depth decrements per level.
fn collect_files(
    dir: &Path,
    max_depth: usize,
) -> Pin<Box<dyn Future<Output = Vec<PathBuf>> + Send + '_>> {
    Box::pin(async move {
        if max_depth == 0 {
            debug!(dir = %dir.display(), "Max depth reached, skipping");
            return Vec::new();
        }

        let mut files = Vec::new();
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), "Failed to read directory: {}", e);
                return files;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();

            let file_type = match entry.file_type().await {
                Ok(t) => t,
                Err(e) => {
                    debug!(path = %path.display(), "Failed to read file type: {}", e);
                    continue;
                }
            };

            if file_type.is_symlink() {
                debug!(path = %path.display(), "Skipping symlink");
                continue;
            }

            if file_type.is_dir() {
                files.append(&mut collect_files(&path, max_depth - 1).await);
            } else if file_type.is_file() {
                files.push(path);
            }
        }

        files
    })
}
