// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Classification client
//!
//! Builds a request from a file candidate and its preview, hands the prompt
//! to a [`Classifier`] backend and turns the (untrusted) answer into a
//! [`ClassificationRecord`]. Missing fields fall back to fixed defaults;
//! anything that is not a JSON object is rejected.

pub mod gemini;
pub mod ollama;
pub mod prompt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::config::{AppConfig, Provider};
use crate::scanner::FileCandidate;
use crate::{DocsortError, Result};

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;

pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_SUBFOLDER: &str = "Misc";
pub const DEFAULT_SUMMARY: &str = "No summary";

/// Everything the classifier is told about one file
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRequest {
    pub file_name: String,
    pub extension: String,
    pub parent_folder: String,
    pub preview: String,
    pub categories: Vec<String>,
}

impl ClassificationRequest {
    pub fn new(candidate: &FileCandidate, preview: String, categories: &[String]) -> Self {
        Self {
            file_name: candidate.name.clone(),
            extension: candidate.extension.clone(),
            parent_folder: candidate.parent_folder(),
            preview,
            categories: categories.to_vec(),
        }
    }
}

/// Parsed classifier answer, before it is tied to a file
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    pub subfolder: String,
    pub summary: String,
    pub confidence: f64,
}

/// Durable per-file result stored in the ledger and snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub file_name: String,
    pub full_path: String,
    pub category: String,
    pub subfolder: String,
    pub summary: String,
    pub confidence: f64,
}

impl ClassificationRecord {
    pub fn new(file_name: String, full_path: String, classification: Classification) -> Self {
        Self {
            file_name,
            full_path,
            category: classification.category,
            subfolder: classification.subfolder,
            summary: classification.summary,
            confidence: classification.confidence,
        }
    }

    /// Where the file lived when it was analyzed
    pub fn source_path(&self) -> PathBuf {
        PathBuf::from(&self.full_path)
    }

    /// `category/subfolder` as shown in previews
    pub fn destination_label(&self) -> String {
        format!("{}/{}", self.category, self.subfolder)
    }
}

/// A semantic classifier service
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Name of this backend
    fn name(&self) -> &str;

    /// Send a system instruction and prompt, returning the raw text answer
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Classification client bound to a backend and a category list
pub struct ClassificationClient {
    backend: Box<dyn Classifier>,
    categories: Vec<String>,
    strict_categories: bool,
}

impl ClassificationClient {
    pub fn new(
        backend: Box<dyn Classifier>,
        categories: Vec<String>,
        strict_categories: bool,
    ) -> Self {
        Self { backend, categories, strict_categories }
    }

    /// Create a client from configuration.
    ///
    /// Fails with [`DocsortError::MissingCredentials`] when the provider needs
    /// an API key and none is set.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.classifier.timeout_secs);
        let url = config.classifier.url.as_deref();

        let backend: Box<dyn Classifier> = match config.classifier.provider {
            Provider::Gemini => Box::new(GeminiClient::new(
                url.unwrap_or(gemini::DEFAULT_BASE_URL),
                &config.classifier.model,
                config.api_key()?,
                timeout,
            )?),
            Provider::Ollama => Box::new(OllamaClient::new(
                url.unwrap_or(ollama::DEFAULT_BASE_URL),
                &config.classifier.model,
                timeout,
            )?),
        };

        let strict = config.classifier.strict_categories;
        Ok(Self::new(backend, config.categories.clone(), strict))
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Build the request for a candidate
    pub fn request(&self, candidate: &FileCandidate, preview: String) -> ClassificationRequest {
        ClassificationRequest::new(candidate, preview, &self.categories)
    }

    /// Classify one file. A single attempt; any failure is final for this run.
    pub async fn classify(
        &self,
        candidate: &FileCandidate,
        request: &ClassificationRequest,
    ) -> Result<ClassificationRecord> {
        let prompt = prompt::build_prompt(request);
        let raw = self.backend.complete(prompt::SYSTEM_INSTRUCTION, &prompt).await?;
        debug!("Raw classifier output for {}: {}", candidate.name, raw);

        let classification = parse_response(&raw)?;
        let known = self.categories.iter().any(|c| *c == classification.category);
        if self.strict_categories && !known {
            return Err(DocsortError::UnknownCategory(classification.category));
        }

        Ok(ClassificationRecord::new(
            candidate.name.clone(),
            candidate.full_path(),
            classification,
        ))
    }
}

/// Remove markdown code fences wrapped around a response
pub fn strip_code_fences(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains("```") {
        raw.replace("```json", "").replace("```", "").trim().to_string()
    } else {
        raw.to_string()
    }
}

/// Parse a classifier answer, defaulting missing or null fields
pub fn parse_response(raw: &str) -> Result<Classification> {
    let cleaned = strip_code_fences(raw);
    let malformed = |source: serde_json::Error| DocsortError::MalformedResponse {
        raw: cleaned.clone(),
        source,
    };

    let mut object: Map<String, Value> = serde_json::from_str(&cleaned).map_err(malformed)?;

    Ok(Classification {
        category: take_field(&mut object, "category")
            .map_err(malformed)?
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        subfolder: take_field(&mut object, "subfolder")
            .map_err(malformed)?
            .unwrap_or_else(|| DEFAULT_SUBFOLDER.to_string()),
        summary: take_field(&mut object, "summary")
            .map_err(malformed)?
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        confidence: take_field(&mut object, "confidence")
            .map_err(malformed)?
            .unwrap_or(0.0),
    })
}

fn take_field<T: DeserializeOwned>(
    object: &mut Map<String, Value>,
    key: &str,
) -> serde_json::Result<Option<T>> {
    match object.remove(key) {
        Some(value) => serde_json::from_value(value),
        None => Ok(None),
    }
}
