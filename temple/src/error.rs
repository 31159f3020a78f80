//! Temple error types

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, TempleError>;

/// Errors that can occur while building, reloading, rendering or watching templates
#[derive(Debug, Error)]
pub enum TempleError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse fragment '{name}' from {path}: {source}")]
    Parse {
        name: String,
        path: PathBuf,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("Template has no entry fragment to render")]
    NoEntry,

    #[error("Failed to render entry fragment '{entry}': {source}")]
    Render {
        entry: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("Failed to watch {path:?}: {source}")]
    Watch {
        path: Option<PathBuf>,
        #[source]
        source: notify::Error,
    },

    #[error("Directory {path} is not under template root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Climbing from {path} exceeded the maximum depth of {max_depth}")]
    ClimbTooDeep { path: PathBuf, max_depth: usize },

    #[error("Template hook failed: {0}")]
    Hook(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TempleError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TempleError::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error came from reading the filesystem
    pub fn is_io(&self) -> bool {
        matches!(self, TempleError::Io { .. })
    }

    /// Check if this error came from malformed fragment text
    pub fn is_parse(&self) -> bool {
        matches!(self, TempleError::Parse { .. })
    }

    /// Check if this error happened while rendering
    pub fn is_render(&self) -> bool {
        matches!(self, TempleError::NoEntry | TempleError::Render { .. })
    }
}
