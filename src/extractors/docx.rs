// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Word (DOCX) preview handler

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::BufReader;
use std::path::Path;

use super::{budget_reached, take_tokens, PreviewHandler};
use crate::Result;

/// Handler for DOCX files
pub struct DocxHandler {
    budget: usize,
}

impl DocxHandler {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }
}

impl PreviewHandler for DocxHandler {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    /// Streams `word/document.xml`: runs inside a paragraph are concatenated,
    /// paragraphs are separated by a space.
    fn extract(&self, path: &Path) -> Result<String> {
        let file = std::fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        let document_xml = archive.by_name("word/document.xml")?;

        let mut reader = Reader::from_reader(BufReader::new(document_xml));
        let mut buf = Vec::new();
        let mut text = String::new();
        let mut in_text = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
                Event::Text(t) if in_text => text.push_str(&t.unescape()?),
                Event::End(e) => match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:p" => {
                        text.push(' ');
                        if budget_reached(&text, self.budget) {
                            break;
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(take_tokens(&text, self.budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_docx(path: &Path, document_xml: &str) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    fn paragraphs(paras: &[&[&str]]) -> String {
        let mut body = String::new();
        for runs in paras {
            body.push_str("<w:p>");
            for run in *runs {
                body.push_str(&format!("<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>", run));
            }
            body.push_str("</w:p>");
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        )
    }

    #[test]
    fn test_runs_join_and_paragraphs_split() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("letter.docx");
        write_docx(&path, &paragraphs(&[&["Cover ", "Let", "ter"], &["Dear Hiring &amp; Team"]]));

        let preview = DocxHandler::new(40).extract(&path).unwrap();
        assert_eq!(preview, "Cover Letter Dear Hiring & Team");
    }

    #[test]
    fn test_budget_applies() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("long.docx");
        write_docx(&path, &paragraphs(&[&["one two"], &["three four"], &["five"]]));

        assert_eq!(DocxHandler::new(3).extract(&path).unwrap(), "one two three");
    }

    #[test]
    fn test_not_a_zip_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, "plain text pretending").unwrap();

        assert!(DocxHandler::new(40).extract(&path).is_err());
    }

    #[test]
    fn test_missing_document_part_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("docProps/app.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"<Properties/>").unwrap();
        zip.finish().unwrap();

        assert!(DocxHandler::new(40).extract(&path).is_err());
    }
}
