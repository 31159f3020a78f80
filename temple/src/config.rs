//! Temple configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TempleError;
use crate::reloader::ReloaderConfig;

/// Main Temple configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TempleConfig {
    /// Root directory of the template tree
    pub root: PathBuf,

    /// Filesystem naming conventions
    pub layout: LayoutConfig,

    /// File watcher settings
    pub reloader: ReloaderConfig,
}

impl Default for TempleConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("templates"),
            layout: LayoutConfig::default(),
            reloader: ReloaderConfig::default(),
        }
    }
}

impl TempleConfig {
    /// Validate configuration before use
    pub fn validate(&self) -> std::result::Result<(), TempleError> {
        self.layout.validate()?;
        if self.reloader.channel_capacity == 0 {
            return Err(TempleError::Config("reloader.channel-capacity must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .temple.yml
        let local_config = PathBuf::from(".temple.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/temple/temple.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("temple").join("temple.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Naming conventions of the template tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Token a file name must contain to be a fragment; the text before it is the fragment name
    pub marker: String,

    /// Prefix marking a directory as a partials directory
    #[serde(rename = "partial-prefix")]
    pub partial_prefix: String,

    /// Ceiling on the number of directories a composition may climb
    #[serde(rename = "max-depth")]
    pub max_depth: usize,

    /// Treat missing data fields as render errors
    #[serde(rename = "strict-mode")]
    pub strict_mode: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            marker: ".temple".to_string(),
            partial_prefix: "_".to_string(),
            max_depth: 64,
            strict_mode: true,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> std::result::Result<(), TempleError> {
        if self.marker.is_empty() {
            return Err(TempleError::Config("layout.marker must not be empty".to_string()));
        }
        if self.partial_prefix.is_empty() {
            return Err(TempleError::Config("layout.partial-prefix must not be empty".to_string()));
        }
        if self.max_depth == 0 {
            return Err(TempleError::Config("layout.max-depth must be at least 1".to_string()));
        }
        Ok(())
    }
}
