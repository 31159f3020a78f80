//! Reloader module for live template updates
//!
//! The Reloader watches every file that contributed to a [`Temple`](crate::Temple)
//! and rebuilds the registry when one of them is written.

mod config;
mod file_reloader;

pub use config::ReloaderConfig;
pub use file_reloader::{Reloader, ResyncReport, is_write_event};
