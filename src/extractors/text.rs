// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Plain text preview handler

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{take_tokens, PreviewHandler};
use crate::Result;

/// Only this much of a text file is read when building a preview
pub const PREFIX_BYTES: u64 = 64 * 1024;

/// Handler for `.txt` files
pub struct TextHandler {
    budget: usize,
}

impl TextHandler {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }
}

impl PreviewHandler for TextHandler {
    fn name(&self) -> &'static str {
        "text"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn extract(&self, path: &Path) -> Result<String> {
        let text = read_prefix(path)?;
        Ok(take_tokens(&text, self.budget))
    }
}

/// Read the leading bytes of a file, dropping invalid UTF-8
pub fn read_prefix(path: &Path) -> Result<String> {
    let mut bytes = Vec::new();
    File::open(path)?.take(PREFIX_BYTES).read_to_end(&mut bytes)?;
    Ok(decode_dropping_invalid(&bytes))
}

fn decode_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                text.push_str(valid);
                return text;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                // Validated just above
                text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(len) => bytes = &rest[len..],
                    // Sequence cut off by the prefix limit
                    None => return text,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_preview_is_bounded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("long.txt");
        let words: Vec<String> = (0..100).map(|i| format!("w{}", i)).collect();
        std::fs::write(&path, words.join("\n")).unwrap();

        let preview = TextHandler::new(40).extract(&path).unwrap();
        assert_eq!(preview.split(' ').count(), 40);
        assert!(preview.starts_with("w0 w1 w2"));
        assert!(preview.ends_with("w39"));
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"caf\xe9 menu prices").unwrap();

        let preview = TextHandler::new(40).extract(&path).unwrap();
        assert_eq!(preview, "caf menu prices");
        assert!(!preview.contains('\u{FFFD}'));
    }

    #[test]
    fn test_truncated_sequence_dropped() {
        assert_eq!(decode_dropping_invalid("résumé".as_bytes()), "résumé");
        assert_eq!(decode_dropping_invalid(b"na\xc3"), "na");
        assert_eq!(decode_dropping_invalid(b"\xff\xfeplan"), "plan");
    }

    #[test]
    fn test_empty_file_yields_empty_preview() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        assert_eq!(TextHandler::new(40).extract(&path).unwrap(), "");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(TextHandler::new(40).extract(&dir.path().join("gone.txt")).is_err());
    }
}
