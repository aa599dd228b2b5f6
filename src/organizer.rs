// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Move planning and execution
//!
//! Moves are strictly sequential: destination folders are created and
//! checked for an existing file of the same name just before each rename,
//! so nothing is ever overwritten.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::classifier::ClassificationRecord;
use crate::ledger::Ledger;
use crate::Result;

/// Files below this confidence are left where they are
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// One line of the dry-run preview
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntry {
    pub file_name: String,
    pub destination: String,
    pub confidence: f64,
    pub ready: bool,
}

impl fmt::Display for PlanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.ready { "[ready]" } else { "[low confidence, will be skipped]" };
        write!(
            f,
            "{} {} -> {} (confidence: {})",
            status, self.file_name, self.destination, self.confidence
        )
    }
}

/// Preview of what execution would do
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovePlan {
    pub entries: Vec<PlanEntry>,
}

impl MovePlan {
    pub fn from_ledger(ledger: &Ledger, threshold: f64) -> Self {
        let entries = ledger
            .iter()
            .map(|record| PlanEntry {
                file_name: record.file_name.clone(),
                destination: record.destination_label(),
                confidence: record.confidence,
                ready: record.confidence >= threshold,
            })
            .collect();
        Self { entries }
    }

    /// Number of files that would actually move
    pub fn ready_count(&self) -> usize {
        self.entries.iter().filter(|e| e.ready).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for MovePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// What happened to one record during execution
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved { destination: PathBuf },
    SkippedLowConfidence,
    SkippedDuplicate { destination: PathBuf },
    NotFound,
    Failed(String),
}

impl MoveOutcome {
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::SkippedLowConfidence | Self::SkippedDuplicate { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::NotFound | Self::Failed(_))
    }
}

/// Aggregate result of an execution pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveReport {
    pub moved: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Per-record outcomes in ledger order
    pub outcomes: Vec<(String, MoveOutcome)>,
}

impl MoveReport {
    fn record(&mut self, file_name: &str, outcome: MoveOutcome) {
        if outcome.is_skip() {
            self.skipped += 1;
        } else if outcome.is_error() {
            self.errors += 1;
        } else {
            self.moved += 1;
        }
        self.outcomes.push((file_name.to_string(), outcome));
    }
}

/// Executes moves under a single root directory
pub struct Organizer {
    root: PathBuf,
    threshold: f64,
}

impl Organizer {
    pub fn new(root: impl Into<PathBuf>, threshold: f64) -> Self {
        Self { root: root.into(), threshold }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Dry-run preview of `ledger` against this organizer's threshold
    pub fn plan(&self, ledger: &Ledger) -> MovePlan {
        MovePlan::from_ledger(ledger, self.threshold)
    }

    /// Run every record through the confidence gate and move eligible files.
    ///
    /// A failing record never stops the batch.
    pub fn execute(&self, ledger: &Ledger) -> MoveReport {
        let mut report = MoveReport::default();
        for record in ledger {
            let outcome = self.move_record(record);
            report.record(&record.file_name, outcome);
        }
        report
    }

    /// Move a single record's file, reporting the outcome
    pub fn move_record(&self, record: &ClassificationRecord) -> MoveOutcome {
        let source = record.source_path();

        if record.confidence < self.threshold {
            info!("Skipping low confidence: {}", record.file_name);
            return MoveOutcome::SkippedLowConfidence;
        }

        if !source.exists() {
            warn!("File not found (maybe moved?): {}", record.file_name);
            return MoveOutcome::NotFound;
        }

        match self.relocate(record, &source) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to move {}: {}", record.file_name, e);
                MoveOutcome::Failed(e.to_string())
            }
        }
    }

    fn relocate(&self, record: &ClassificationRecord, source: &Path) -> Result<MoveOutcome> {
        let folder = self.destination_folder(record);
        std::fs::create_dir_all(&folder)?;

        let file_name = source
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new(&record.file_name));
        let destination = folder.join(file_name);

        if destination.exists() {
            warn!("Skipping duplicate: {} already exists in {:?}", record.file_name, folder);
            return Ok(MoveOutcome::SkippedDuplicate { destination });
        }

        std::fs::rename(source, &destination)?;
        info!("Moved: {} -> {:?}", record.file_name, folder);
        Ok(MoveOutcome::Moved { destination })
    }

    /// `<root>/<category>/<subfolder>`, taken verbatim from the record
    pub fn destination_folder(&self, record: &ClassificationRecord) -> PathBuf {
        self.root.join(&record.category).join(&record.subfolder)
    }
}
