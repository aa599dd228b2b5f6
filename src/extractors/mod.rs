// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Preview extractors for the supported document formats
//!
//! Each handler turns a file into a short, bounded text preview. Dispatch is
//! by lower-cased extension; anything without a handler is left out of the
//! run entirely.

pub mod docx;
pub mod markdown;
pub mod pdf;
pub mod text;

use std::path::Path;
use tracing::debug;

use crate::config::PreviewConfig;
use crate::{DocsortError, Result};

/// Preview substituted when a handler succeeds but finds no text
pub const NO_CONTENT: &str = "No text content found.";

/// Outcome of asking the registry for a preview
#[derive(Debug)]
pub enum PreviewOutcome {
    /// Bounded preview text, possibly empty
    Text(String),
    /// No handler for this extension
    Unsupported,
    /// The handler could not read the file
    Failed(DocsortError),
}

/// Trait for preview handlers
pub trait PreviewHandler: Send + Sync {
    /// Name of this handler
    fn name(&self) -> &'static str;

    /// File extensions this handler reads
    fn supported_extensions(&self) -> &[&str];

    /// Check if this handler can read a file
    fn can_handle(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            self.supported_extensions().iter().any(|e| e.eq_ignore_ascii_case(ext))
        } else {
            false
        }
    }

    /// Extract a bounded preview of the document's leading text
    fn extract(&self, path: &Path) -> Result<String>;

    /// Priority (higher = preferred when multiple handlers match)
    fn priority(&self) -> u8 {
        50
    }
}

/// Registry of preview handlers keyed by extension
pub struct ExtractorRegistry {
    handlers: Vec<Box<dyn PreviewHandler>>,
}

impl ExtractorRegistry {
    /// Create a registry with the built-in handlers
    pub fn new(config: &PreviewConfig) -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(text::TextHandler::new(config.text_tokens)));
        registry.register(Box::new(markdown::MarkdownHandler::new(config.text_tokens)));
        registry.register(Box::new(pdf::PdfHandler::new(config.pdf_tokens)));
        registry.register(Box::new(docx::DocxHandler::new(config.text_tokens)));
        registry
    }

    /// Create a registry with no handlers
    pub fn empty() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Register a new handler
    pub fn register(&mut self, handler: Box<dyn PreviewHandler>) {
        self.handlers.push(handler);
        self.handlers.sort_by_key(|h| std::cmp::Reverse(h.priority()));
    }

    /// Find the best handler for a file
    pub fn find_handler(&self, path: &Path) -> Option<&dyn PreviewHandler> {
        self.handlers.iter()
            .find(|h| h.can_handle(path))
            .map(|h| h.as_ref())
    }

    /// Whether any handler accepts this file
    pub fn supports(&self, path: &Path) -> bool {
        self.find_handler(path).is_some()
    }

    /// Extract a preview, never propagating per-file failures
    pub fn extract(&self, path: &Path) -> PreviewOutcome {
        let Some(handler) = self.find_handler(path) else {
            return PreviewOutcome::Unsupported;
        };

        debug!("Extracting preview with {} handler: {:?}", handler.name(), path);
        match handler.extract(path) {
            Ok(text) => PreviewOutcome::Text(text),
            Err(e) => PreviewOutcome::Failed(e),
        }
    }

    /// Get number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Get handler names
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }
}

/// Keep the first `budget` whitespace-separated tokens, joined by single spaces
pub fn take_tokens(text: &str, budget: usize) -> String {
    text.split_whitespace()
        .take(budget)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `text` already holds at least `budget` tokens
pub(crate) fn budget_reached(text: &str, budget: usize) -> bool {
    if budget == 0 {
        return true;
    }
    text.split_whitespace().nth(budget - 1).is_some()
}

/// Replace an empty preview with the [`NO_CONTENT`] sentinel
pub fn or_sentinel(preview: String) -> String {
    if preview.trim().is_empty() {
        NO_CONTENT.to_string()
    } else {
        preview
    }
}
