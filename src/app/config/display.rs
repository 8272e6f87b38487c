use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Characters per row
    #[serde(default = "DisplayConfig::default_width")]
    pub width: usize,
    /// Delay between animation frames in milliseconds
    #[serde(default = "DisplayConfig::default_frame_delay_ms")]
    pub frame_delay_ms: u64,
    /// How long the boot banner stays up before the greeting
    #[serde(default = "DisplayConfig::default_boot_hold_ms")]
    pub boot_hold_ms: u64,
    /// How long the farewell stays up before the display is cleared
    #[serde(default = "DisplayConfig::default_farewell_hold_ms")]
    pub farewell_hold_ms: u64,
}

impl DisplayConfig {
    fn default_width() -> usize {
        16
    }
    fn default_frame_delay_ms() -> u64 {
        50
    }
    fn default_boot_hold_ms() -> u64 {
        1000
    }
    fn default_farewell_hold_ms() -> u64 {
        1000
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    pub fn boot_hold(&self) -> Duration {
        Duration::from_millis(self.boot_hold_ms)
    }

    pub fn farewell_hold(&self) -> Duration {
        Duration::from_millis(self.farewell_hold_ms)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            frame_delay_ms: Self::default_frame_delay_ms(),
            boot_hold_ms: Self::default_boot_hold_ms(),
            farewell_hold_ms: Self::default_farewell_hold_ms(),
        }
    }
}
