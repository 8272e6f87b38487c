use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize)]
pub struct MpdConfig {
    /// host:port, or a path to mpd's unix socket
    #[serde(default = "MpdConfig::default_address")]
    pub address: String,
    /// Pause before reconnecting the change subscription
    #[serde(default = "MpdConfig::default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl MpdConfig {
    fn default_address() -> String {
        "localhost:6600".to_string()
    }
    fn default_reconnect_delay_ms() -> u64 {
        3000
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for MpdConfig {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            reconnect_delay_ms: Self::default_reconnect_delay_ms(),
        }
    }
}
