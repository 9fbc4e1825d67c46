//! Configuration management for vrpsetup
//!
//! Config stored at: ~/.config/vrpsetup/config.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use vrpsetup_types::{ConfigError, OutputFormat, Result};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding service endpoint
    #[serde(default)]
    pub geocode_url: Option<String>,

    /// Routing (VRP) service endpoint
    #[serde(default)]
    pub routing_url: Option<String>,

    /// Stack identifier sent with geocode jobs
    #[serde(default = "default_stack_id")]
    pub stack_id: i64,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Columns every zip code row must carry
    #[serde(default = "default_geocode_fields")]
    pub geocode_required_fields: Vec<String>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_stack_id() -> i64 {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_geocode_fields() -> Vec<String> {
    vec!["zip".to_string()]
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocode_url: None,
            routing_url: None,
            stack_id: default_stack_id(),
            request_timeout_secs: default_timeout_secs(),
            geocode_required_fields: default_geocode_fields(),
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("vrpsetup");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "vrpsetup Configuration")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Geocode URL:     {}",
            self.geocode_url.as_deref().unwrap_or("(not set)")
        )?;
        writeln!(
            f,
            "Routing URL:     {}",
            self.routing_url.as_deref().unwrap_or("(not set)")
        )?;
        writeln!(f, "Stack id:        {}", self.stack_id)?;
        writeln!(f, "Timeout:         {}s", self.request_timeout_secs)?;
        writeln!(
            f,
            "Geocode fields:  {}",
            self.geocode_required_fields.join(", ")
        )?;
        writeln!(f, "Output format:   {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:     {}", path.display())?;
        }

        Ok(())
    }
}
