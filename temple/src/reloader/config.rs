//! Reloader configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Reloader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloaderConfig {
    /// Capacity of the channel between the file watcher and the reload loop
    #[serde(rename = "channel-capacity", default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    100
}

impl Default for ReloaderConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}
