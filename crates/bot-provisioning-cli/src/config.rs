//! CLI settings, read from `config.toml`.
//!
//! Lookup order: `--config <path>`, then
//! `<config dir>/bot-provisioning/config.toml`. A missing default file means
//! defaults; a file that exists but cannot be parsed is an error.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use bot_provisioning_core::loan_classification::compliance::DEFAULT_RATE_TOLERANCE;

use crate::OutputFormat;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Output format when `--output` is not given.
    pub output: OutputFormat,
    /// Provision rate tolerance for `check-compliance`.
    pub compliance_tolerance: Decimal,
    /// Reject malformed loan batches before classifying.
    pub validate_input: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: OutputFormat::Json,
            compliance_tolerance: DEFAULT_RATE_TOLERANCE,
            validate_input: true,
        }
    }
}

impl Settings {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bot-provisioning")
            .join("config.toml")
    }

    pub fn load(explicit: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        match explicit {
            Some(path) => Self::from_file(Path::new(path)),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    log::debug!("no settings at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings '{}': {}", path.display(), e))?;
        let settings = Self::parse(&contents)
            .map_err(|e| format!("Failed to parse settings '{}': {}", path.display(), e))?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        let settings: Settings = toml::from_str(contents)?;
        Ok(settings)
    }
}
