// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! PDF preview handler

use std::path::Path;
use tracing::debug;

use super::{budget_reached, take_tokens, PreviewHandler};
use crate::{DocsortError, Result};

/// Handler for PDF files
pub struct PdfHandler {
    budget: usize,
}

impl PdfHandler {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }
}

impl PreviewHandler for PdfHandler {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn priority(&self) -> u8 {
        90
    }

    /// Pages are decoded one at a time and reading stops at the token budget.
    fn extract(&self, path: &Path) -> Result<String> {
        let doc = lopdf::Document::load(path)
            .map_err(|e| DocsortError::Pdf(format!("Failed to load PDF: {}", e)))?;

        let pages = doc.get_pages().into_keys();
        let text = read_pages(pages, self.budget, |page_number| {
            doc.extract_text(&[page_number]).map_err(|e| {
                DocsortError::Pdf(format!("Text extraction failed on page {}: {}", page_number, e))
            })
        })?;
        debug!("Extracted PDF preview: {:?}", path);

        Ok(take_tokens(&text, self.budget))
    }
}

/// Accumulate page text in order, never touching pages past the budget.
fn read_pages<I, F>(pages: I, budget: usize, mut extract: F) -> Result<String>
where
    I: IntoIterator<Item = u32>,
    F: FnMut(u32) -> Result<String>,
{
    let mut text = String::new();
    for (index, page_number) in pages.into_iter().enumerate() {
        if budget_reached(&text, budget) {
            debug!("Preview budget reached after {} page(s)", index);
            break;
        }
        text.push_str(&extract(page_number)?);
        text.push(' ');
    }
    Ok(text)
}
