// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Markdown preview handler

use std::path::Path;

use super::text::read_prefix;
use super::PreviewHandler;
use crate::Result;

/// Handler for Markdown files
pub struct MarkdownHandler {
    budget: usize,
}

impl MarkdownHandler {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }
}

impl PreviewHandler for MarkdownHandler {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["md"]
    }

    fn extract(&self, path: &Path) -> Result<String> {
        let text = read_prefix(path)?;
        Ok(text
            .lines()
            .filter(|line| !is_fence_or_rule(line))
            .flat_map(|line| strip_heading_marker(line).split_whitespace())
            .take(self.budget)
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// Code fence delimiters and thematic breaks (`---`, `***`, `___`)
fn is_fence_or_rule(line: &str) -> bool {
    let line = line.trim();
    if line.starts_with("```") || line.starts_with("~~~") {
        return true;
    }
    let marks: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    marks.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|m| marks.chars().all(|c| c == *m))
}

/// Drop the leading `#` run of an ATX heading, keeping the heading text
fn strip_heading_marker(line: &str) -> &str {
    let trimmed = line.trim_start();
    let rest = trimmed.trim_start_matches('#');
    if rest.len() < trimmed.len() && (rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        rest
    } else {
        line
    }
}
