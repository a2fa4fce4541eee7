//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RcptError, Result};

/// Placeholder key shipped in sample configs; treated as "not configured".
pub const PLACEHOLDER_API_KEY: &str = "YOUR_OPENAI_API_KEY_HERE";

/// Main configuration for the rcpt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Local extraction configuration.
    pub extraction: ExtractionConfig,

    /// Remote refinement configuration.
    pub refinement: RefinementConfig,
}

/// Local (heuristic) extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Populate the tax field from tax/VAT lines.
    pub extract_tax: bool,

    /// Populate the currency field from symbols and ISO codes.
    pub detect_currency: bool,

    /// Currency used when detection is enabled but finds nothing.
    pub default_currency: Option<String>,

    /// Transcripts with fewer non-whitespace-trimmed characters are
    /// treated as "no text found".
    pub min_transcript_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            extract_tax: false,
            detect_currency: false,
            default_currency: None,
            min_transcript_chars: 10,
        }
    }
}

/// Remote refinement (chat-completions service) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    /// API credential. Refinement is skipped when absent.
    pub api_key: Option<String>,

    /// Chat-completions endpoint URL.
    pub endpoint: String,

    /// Model name sent with each request.
    pub model: String,

    /// Sampling temperature (0.0 for repeatable output).
    pub temperature: f32,

    /// Response token limit.
    pub max_tokens: u32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.0,
            max_tokens: 300, // 200 truncates the JSON object occasionally
            timeout_secs: 60,
        }
    }
}

impl RefinementConfig {
    /// Whether a usable API key is present.
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// The API key, if it is non-empty and not the placeholder.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    /// Override the API key (e.g. from a CLI flag or environment variable).
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if api_key.is_some() {
            self.api_key = api_key;
        }
        self
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RcptError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
