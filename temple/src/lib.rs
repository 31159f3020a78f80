//! Temple - hierarchical template registry
//!
//! Temple turns a directory tree of handlebars fragments into a registry of
//! composed templates, one per directory, and can keep that registry current
//! while a long-running process serves it.
//!
//! # Core Concepts
//!
//! - **Fragments**: files whose name contains the marker (`.temple`); the
//!   lower-cased text before the marker is the fragment name
//! - **Climbing**: a directory's template also sees every ancestor's fragments
//!   up to the root, and the closest definition of a name wins
//! - **Partials**: fragments under `_`-prefixed directories are shared with the
//!   enclosing scope without becoming templates of their own
//! - **Entry**: the first fragment found renders by default, `base` always wins
//!
//! # Modules
//!
//! - [`naming`] - Fragment and scope naming rules
//! - [`template`] - Composed templates and the composition algorithm
//! - [`registry`] - Tree walking and the reloadable [`Temple`] registry
//! - [`reloader`] - File watcher that reloads a registry on change
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod naming;
pub mod registry;
pub mod reloader;
pub mod template;

// Re-export commonly used types
pub use config::{LayoutConfig, TempleConfig};
pub use error::{Result, TempleError};
pub use registry::{Temple, TemplateSet};
pub use reloader::{Reloader, ReloaderConfig, ResyncReport};
pub use template::{HelperFactory, OnTemplate, Template, TempleOptions, compose};
