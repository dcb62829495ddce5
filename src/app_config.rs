use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::negotiation::FormatClasses;
use crate::script::ParsePolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// High-bit-depth video format identifiers, in class order
    #[serde(default = "default_high_depth_formats")]
    pub high_depth_formats: Vec<String>,

    /// Standard-bit-depth video format identifiers, in fallback offer order
    #[serde(default = "default_standard_depth_formats")]
    pub standard_depth_formats: Vec<String>,

    /// Recovery policy for script parsing
    #[serde(default)]
    pub parse_policy: ParsePolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_high_depth_formats() -> Vec<String> {
    ["P010", "P016", "P210", "P216", "Y410", "Y416"]
        .map(String::from)
        .to_vec()
}

fn default_standard_depth_formats() -> Vec<String> {
    ["NV12", "YV12", "YUY2", "AYUV", "RGB32"]
        .map(String::from)
        .to_vec()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration after loading
    pub fn validate(&self) -> Result<()> {
        if self.high_depth_formats.is_empty() {
            return Err(anyhow!("high_depth_formats must not be empty"));
        }
        if self.standard_depth_formats.is_empty() {
            return Err(anyhow!("standard_depth_formats must not be empty"));
        }

        // A format identifier cannot belong to both depth classes
        for id in &self.high_depth_formats {
            if self.standard_depth_formats.contains(id) {
                return Err(anyhow!("Format {:?} appears in both depth classes", id));
            }
        }

        Ok(())
    }

    /// Format classes for the negotiation protocol
    pub fn format_classes(&self) -> FormatClasses {
        FormatClasses::new(
            self.high_depth_formats.clone(),
            self.standard_depth_formats.clone(),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            high_depth_formats: default_high_depth_formats(),
            standard_depth_formats: default_standard_depth_formats(),
            parse_policy: ParsePolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}
