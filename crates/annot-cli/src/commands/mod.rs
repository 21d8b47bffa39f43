//! Subcommand implementations.

pub mod batch;
pub mod extract;
pub mod live;
pub mod typedef;

use std::path::{Path, PathBuf};

use annot_core::AnnotConfig;

/// Load configuration from an explicit path, the default location, or
/// built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AnnotConfig> {
    if let Some(path) = config_path {
        return Ok(AnnotConfig::from_file(Path::new(path))?);
    }

    let default = default_config_path();
    if default.exists() {
        return Ok(AnnotConfig::from_file(&default)?);
    }

    Ok(AnnotConfig::default())
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("annot")
        .join("config.json")
}
