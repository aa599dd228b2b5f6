// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for docsort

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{DocsortError, Result};

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Classifier backend configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Closed set of categories the classifier may choose from
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Preview extraction budgets
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Move planning and snapshot settings
    #[serde(default)]
    pub organize: OrganizeConfig,
}

/// Which classifier service to talk to
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Ollama,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_provider")]
    pub provider: Provider,
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL override; each provider has its own default
    #[serde(default)]
    pub url: Option<String>,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Reject responses whose category is outside `categories`
    #[serde(default)]
    pub strict_categories: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PreviewConfig {
    /// Token budget for plain text, markdown and docx previews
    #[serde(default = "default_text_tokens")]
    pub text_tokens: usize,
    /// Token budget for PDF previews
    #[serde(default = "default_pdf_tokens")]
    pub pdf_tokens: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OrganizeConfig {
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Directory names pruned from the scan at any depth
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
}

// Default value functions
fn default_provider() -> Provider { Provider::Gemini }
fn default_model() -> String { "gemini-2.5-flash-lite".to_string() }
fn default_api_key_env() -> String { "GOOGLE_API_KEY".to_string() }
fn default_timeout() -> u64 { 120 }
fn default_text_tokens() -> usize { 40 }
fn default_pdf_tokens() -> usize { 30 }
fn default_min_confidence() -> f64 { crate::organizer::DEFAULT_CONFIDENCE_THRESHOLD }
fn default_snapshot_path() -> PathBuf { PathBuf::from("analysis_results.json") }

fn default_categories() -> Vec<String> {
    ["Career", "Education", "Finance", "Projects", "Personal"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_excluded_dirs() -> Vec<String> {
    [".git", "venv", "__pycache__"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            categories: default_categories(),
            preview: PreviewConfig::default(),
            organize: OrganizeConfig::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            url: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout(),
            strict_categories: false,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            text_tokens: default_text_tokens(),
            pdf_tokens: default_pdf_tokens(),
        }
    }
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            snapshot_path: default_snapshot_path(),
            excluded_dirs: default_excluded_dirs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| DocsortError::Config(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(DocsortError::Config("At least one category is required".to_string()));
        }
        if self.preview.text_tokens == 0 || self.preview.pdf_tokens == 0 {
            return Err(DocsortError::Config("Preview token budgets must be positive".to_string()));
        }
        if !self.organize.min_confidence.is_finite() {
            return Err(DocsortError::Config("min_confidence must be a finite number".to_string()));
        }
        Ok(())
    }

    /// Read the classifier API key from the environment.
    ///
    /// Blank values count as missing.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.classifier.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(DocsortError::MissingCredentials(format!(
                "{} not found",
                self.classifier.api_key_env
            ))),
        }
    }
}
