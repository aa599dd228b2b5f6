// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Ordered ledger of classification records and its JSON snapshot

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::classifier::ClassificationRecord;
use crate::Result;

/// Append-only, traversal-ordered list of classification records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: Vec<ClassificationRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    ///
    /// Returns `false`, leaving the ledger untouched, if a record for the
    /// same resolved path is already present.
    pub fn append(&mut self, record: ClassificationRecord) -> bool {
        if self.contains_path(&record.full_path) {
            warn!("Ignoring second record for {}", record.full_path);
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn contains_path(&self, full_path: &str) -> bool {
        self.records.iter().any(|r| r.full_path == full_path)
    }

    pub fn records(&self) -> &[ClassificationRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the ledger as a pretty JSON array, replacing any previous snapshot
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!("Saved {} record(s) to {:?}", self.records.len(), path);
        Ok(())
    }

    /// Read a snapshot written by [`Ledger::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let records: Vec<ClassificationRecord> = serde_json::from_reader(BufReader::new(file))?;

        let mut ledger = Self::new();
        for record in records {
            ledger.append(record);
        }
        Ok(ledger)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a ClassificationRecord;
    type IntoIter = std::slice::Iter<'a, ClassificationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
