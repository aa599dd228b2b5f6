// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Pipeline driver: scan, analyze, persist, confirm, execute
//!
//! Analysis and execution only meet through the ledger. The snapshot is
//! written before anyone is asked to confirm, so a cancelled or crashed move
//! phase never loses the analysis.

use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::classifier::ClassificationClient;
use crate::config::AppConfig;
use crate::extractors::{or_sentinel, ExtractorRegistry, PreviewOutcome};
use crate::ledger::Ledger;
use crate::organizer::{MovePlan, MoveReport, Organizer};
use crate::scanner::scan;
use crate::Result;

/// Counters collected during the analysis phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Regular files found by the scan
    pub discovered: usize,
    /// Files without a preview handler
    pub unsupported: usize,
    /// Files whose preview could not be read
    pub extraction_failed: usize,
    /// Files with a record in the ledger
    pub classified: usize,
    /// Files the classifier failed on
    pub classification_failed: usize,
    /// Files resolving to a path already in the ledger, such as symlinked copies
    pub duplicate: usize,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Nothing was classified, so nobody was asked to confirm
    NothingAnalyzed,
    /// Confirmation declined; the filesystem was not touched
    Cancelled,
    Completed(MoveReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub stats: AnalysisStats,
    pub plan: MovePlan,
    pub outcome: RunOutcome,
}

/// Orchestrates one organizer run
pub struct Pipeline {
    config: AppConfig,
    registry: ExtractorRegistry,
    client: ClassificationClient,
}

impl Pipeline {
    pub fn new(config: AppConfig, client: ClassificationClient) -> Self {
        let registry = ExtractorRegistry::new(&config.preview);
        Self { config, registry, client }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Scan `root` and classify every supported file, in traversal order.
    ///
    /// Per-file failures are logged and counted, never returned.
    pub async fn analyze(&self, root: &Path) -> (Ledger, AnalysisStats) {
        let mut ledger = Ledger::new();
        let mut stats = AnalysisStats::default();

        for candidate in scan(root, &self.config.organize.excluded_dirs) {
            stats.discovered += 1;

            if ledger.contains_path(&candidate.full_path()) {
                info!("Skipping {}: already analyzed as {}", candidate.name, candidate.full_path());
                stats.duplicate += 1;
                continue;
            }

            let preview = match self.registry.extract(&candidate.path) {
                PreviewOutcome::Text(text) => or_sentinel(text),
                PreviewOutcome::Unsupported => {
                    debug!("No preview handler for {:?}", candidate.path);
                    stats.unsupported += 1;
                    continue;
                }
                PreviewOutcome::Failed(e) => {
                    warn!("Skipping {}: could not read preview: {}", candidate.name, e);
                    stats.extraction_failed += 1;
                    continue;
                }
            };

            info!("Analyzing: {}...", candidate.name);
            let request = self.client.request(&candidate, preview);

            match self.client.classify(&candidate, &request).await {
                Ok(record) => {
                    info!("  -> Category: {}", record.category);
                    info!("  -> Subfolder: {}", record.subfolder);
                    if ledger.append(record) {
                        stats.classified += 1;
                    } else {
                        stats.duplicate += 1;
                    }
                }
                Err(e) => {
                    stats.classification_failed += 1;
                    match e.raw_output() {
                        Some(raw) => {
                            error!(
                                "Failed to parse classifier output for {}: {}",
                                candidate.name, e
                            );
                            error!("  Raw output: {}", raw);
                        }
                        None => error!("Classifier error for {}: {}", candidate.name, e),
                    }
                }
            }
        }

        info!("Processing complete. Analyzed {} files.", ledger.len());
        (ledger, stats)
    }

    /// Write the ledger snapshot to the configured location
    pub fn persist(&self, ledger: &Ledger) -> Result<()> {
        ledger.save(&self.config.organize.snapshot_path)
    }

    /// Organizer rooted at `root` using the configured threshold
    pub fn organizer(&self, root: &Path) -> Organizer {
        Organizer::new(root, self.config.organize.min_confidence)
    }

    /// Full run: analyze, persist, then the confirm/execute phase
    pub async fn run<F>(&self, root: &Path, confirm: F) -> Result<RunSummary>
    where
        F: FnOnce(&MovePlan) -> Result<bool>,
    {
        let (ledger, stats) = self.analyze(root).await;
        self.persist(&ledger)?;

        let (plan, outcome) = confirm_and_execute(&ledger, &self.organizer(root), confirm)?;
        Ok(RunSummary { stats, plan, outcome })
    }
}

/// Preview the ledger, ask for confirmation, and move files if confirmed.
///
/// An empty ledger ends the run without calling `confirm`.
pub fn confirm_and_execute<F>(
    ledger: &Ledger,
    organizer: &Organizer,
    confirm: F,
) -> Result<(MovePlan, RunOutcome)>
where
    F: FnOnce(&MovePlan) -> Result<bool>,
{
    let plan = organizer.plan(ledger);

    if ledger.is_empty() {
        info!("No files were analyzed. Nothing to move.");
        return Ok((plan, RunOutcome::NothingAnalyzed));
    }

    if !confirm(&plan)? {
        info!("Operation cancelled. No files were moved.");
        return Ok((plan, RunOutcome::Cancelled));
    }

    info!("Moving files...");
    let report = organizer.execute(ledger);
    info!(
        "Complete: {} moved, {} skipped, {} errors",
        report.moved, report.skipped, report.errors
    );
    Ok((plan, RunOutcome::Completed(report)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::organizer::MoveOutcome;
    use crate::{DocsortError, Result};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Answers by file name, remembering every prompt it was sent
    struct ScriptedClassifier {
        script: Vec<(&'static str, &'static str)>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Classifier for ScriptedClassifier {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.script
                .iter()
                .find(|(name, _)| prompt.contains(&format!("Filename: {}\n", name)))
                .map(|(_, answer)| answer.to_string())
                .ok_or_else(|| DocsortError::Classifier("service unavailable".to_string()))
        }
    }

    struct Fixture {
        root: TempDir,
        work: TempDir,
        prompts: Arc<Mutex<Vec<String>>>,
        pipeline: Pipeline,
    }

    impl Fixture {
        fn new(script: Vec<(&'static str, &'static str)>) -> Self {
            let root = TempDir::new().unwrap();
            let work = TempDir::new().unwrap();
            let prompts = Arc::new(Mutex::new(Vec::new()));

            let mut config = AppConfig::default();
            config.organize.snapshot_path = work.path().join("analysis_results.json");

            let backend = ScriptedClassifier { script, prompts: Arc::clone(&prompts) };
            let categories = config.categories.clone();
            let client = ClassificationClient::new(Box::new(backend), categories, false);
            let pipeline = Pipeline::new(config, client);

            Self { root, work, prompts, pipeline }
        }

        fn write(&self, relative: &str, contents: &str) -> std::path::PathBuf {
            let path = self.root.path().join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, contents).unwrap();
            path
        }

        fn snapshot(&self) -> Ledger {
            Ledger::load(&self.work.path().join("analysis_results.json")).unwrap()
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    fn standard_script() -> Vec<(&'static str, &'static str)> {
        vec![
            (
                "Resume.txt",
                r#"{"category": "Career", "subfolder": "Job Search",
                    "summary": "A resume", "confidence": 0.92}"#,
            ),
            (
                "notes.txt",
                r#"{"category": "Education", "subfolder": "College Notes",
                    "summary": "Notes", "confidence": 0.4}"#,
            ),
            ("weird.md", "I think this is a poem."),
        ]
    }

    #[tokio::test]
    async fn test_full_run_moves_confident_files() {
        let fx = Fixture::new(standard_script());
        let resume = fx.write("inbox/Resume.txt", "Software engineer with ten years");
        let notes = fx.write("notes.txt", "lecture three thermodynamics");
        let weird = fx.write("weird.md", "# roses are red");
        fx.write("photo.jpg", "binary");

        let summary = fx
            .pipeline
            .run(fx.root.path(), |plan| {
                assert_eq!(plan.ready_count(), 1);
                Ok(true)
            })
            .await
            .unwrap();

        assert_eq!(summary.stats, AnalysisStats {
            discovered: 4,
            unsupported: 1,
            extraction_failed: 0,
            classified: 2,
            classification_failed: 1,
            duplicate: 0,
        });

        let RunOutcome::Completed(report) = summary.outcome else {
            panic!("Expected completed run");
        };
        assert_eq!((report.moved, report.skipped, report.errors), (1, 1, 0));

        assert!(!resume.exists());
        assert!(fx.root.path().join("Career/Job Search/Resume.txt").exists());
        assert!(notes.exists());
        assert!(weird.exists());

        let snapshot = fx.snapshot();
        let names: Vec<_> = snapshot.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["Resume.txt", "notes.txt"]);

        assert!(fx.prompts().iter().all(|p| !p.contains("photo.jpg")));
    }

    #[tokio::test]
    async fn test_declined_confirmation_touches_nothing() {
        let fx = Fixture::new(standard_script());
        let resume = fx.write("Resume.txt", "engineer");

        let summary = fx.pipeline.run(fx.root.path(), |_| Ok(false)).await.unwrap();

        assert_eq!(summary.outcome, RunOutcome::Cancelled);
        assert!(resume.exists());
        assert!(!fx.root.path().join("Career").exists());
        assert_eq!(fx.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_ledger_skips_confirmation() {
        let fx = Fixture::new(standard_script());
        fx.write("weird.md", "unparseable answer coming");
        fx.write("image.png", "png");

        let summary = fx
            .pipeline
            .run(fx.root.path(), |_| panic!("confirmation must not be requested"))
            .await
            .unwrap();

        assert_eq!(summary.outcome, RunOutcome::NothingAnalyzed);
        assert!(fx.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_empty_preview_uses_sentinel() {
        let fx = Fixture::new(standard_script());
        fx.write("notes.txt", "   \n\t ");

        let (ledger, _) = fx.pipeline.analyze(fx.root.path()).await;

        assert_eq!(ledger.len(), 1);
        assert!(fx.prompts()[0].contains("Text Preview:\nNo text content found.\n"));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_not_classified() {
        let fx = Fixture::new(standard_script());
        fx.write("contract.docx", "not really a zip archive");
        fx.write("notes.txt", "fine");

        let (ledger, stats) = fx.pipeline.analyze(fx.root.path()).await;

        assert_eq!(stats.extraction_failed, 1);
        assert_eq!(ledger.len(), 1);
        assert_eq!(fx.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_excluded_from_ledger() {
        let fx = Fixture::new(standard_script());
        fx.write("unscripted.txt", "the classifier has no answer for this");

        let (ledger, stats) = fx.pipeline.analyze(fx.root.path()).await;

        assert!(ledger.is_empty());
        assert_eq!(stats.classification_failed, 1);
    }

    #[tokio::test]
    async fn test_excluded_directories_never_reach_classifier() {
        let fx = Fixture::new(standard_script());
        fx.write(".git/notes.txt", "packed refs");
        fx.write("project/venv/notes.txt", "site packages");

        let (ledger, stats) = fx.pipeline.analyze(fx.root.path()).await;

        assert!(ledger.is_empty());
        assert_eq!(stats.discovered, 0);
        assert!(fx.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_reexecuting_snapshot_reports_not_found() {
        let fx = Fixture::new(standard_script());
        fx.write("Resume.txt", "engineer");
        fx.pipeline.run(fx.root.path(), |_| Ok(true)).await.unwrap();

        let snapshot = fx.snapshot();
        let organizer = fx.pipeline.organizer(fx.root.path());
        let (_, outcome) = confirm_and_execute(&snapshot, &organizer, |_| Ok(true)).unwrap();

        let RunOutcome::Completed(report) = outcome else {
            panic!("Expected completed run");
        };
        assert_eq!(report.moved, 0);
        assert_eq!(report.outcomes[0].1, MoveOutcome::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_copy_counted_as_duplicate() {
        let fx = Fixture::new(standard_script());
        let original = fx.write("a/notes.txt", "lecture three thermodynamics");
        std::fs::create_dir_all(fx.root.path().join("b")).unwrap();
        std::os::unix::fs::symlink(&original, fx.root.path().join("b/notes.txt")).unwrap();

        let (ledger, stats) = fx.pipeline.analyze(fx.root.path()).await;

        assert_eq!(ledger.len(), 1);
        assert_eq!(stats.discovered, 2);
        assert_eq!(stats.classified, 1);
        assert_eq!(stats.duplicate, 1);
        assert_eq!(stats.classification_failed, 0);
        assert_eq!(fx.prompts().len(), 1);
    }
}
