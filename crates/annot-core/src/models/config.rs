//! Configuration structures for the extraction engine and CLI defaults.

use serde::{Deserialize, Serialize};

/// Main configuration for annot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotConfig {
    /// Extraction engine configuration.
    pub extraction: ExtractionConfig,

    /// Output defaults for the CLI.
    pub output: OutputConfig,
}

impl Default for AnnotConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Extraction engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum candidates kept in interactive previews. Commit extraction
    /// always runs over the full candidate list.
    pub max_preview_candidates: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_preview_candidates: 100,
        }
    }
}

/// Output defaults for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (json, csv, text).
    pub default_format: String,

    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "json".to_string(),
            pretty_json: true,
        }
    }
}

impl AnnotConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
