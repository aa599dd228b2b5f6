// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! docsort: AI-assisted document organizer
//!
//! Scans a directory tree, previews each supported document, asks a semantic
//! classifier where it belongs and, once confirmed, moves confidently
//! classified files into `<category>/<subfolder>` folders.

pub mod classifier;
pub mod config;
pub mod error;
pub mod extractors;
pub mod ledger;
pub mod organizer;
pub mod pipeline;
pub mod scanner;

pub use config::AppConfig;
pub use error::{DocsortError, Result};
