use serde::{Deserialize, Serialize};

/// Fixed texts shown by the supervisor. Each is centered on its row.
#[derive(Debug, Deserialize, Serialize)]
pub struct MessagesConfig {
    #[serde(default = "MessagesConfig::default_boot_line1")]
    pub boot_line1: String,
    #[serde(default = "MessagesConfig::default_boot_line2")]
    pub boot_line2: String,
    /// Shown on line 1 once the banner has been up for `boot_hold_ms`
    #[serde(default = "MessagesConfig::default_greeting")]
    pub greeting: String,
    #[serde(default = "MessagesConfig::default_farewell")]
    pub farewell: String,
    /// Line 1 while an error message is on line 2
    #[serde(default = "MessagesConfig::default_error_title")]
    pub error_title: String,
}

impl MessagesConfig {
    fn default_boot_line1() -> String {
        "Radio booting".to_string()
    }
    fn default_boot_line2() -> String {
        "¯\\(°_o)/¯".to_string()
    }
    fn default_greeting() -> String {
        "Hey".to_string()
    }
    fn default_farewell() -> String {
        "Bye Bye".to_string()
    }
    fn default_error_title() -> String {
        "Error".to_string()
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            boot_line1: Self::default_boot_line1(),
            boot_line2: Self::default_boot_line2(),
            greeting: Self::default_greeting(),
            farewell: Self::default_farewell(),
            error_title: Self::default_error_title(),
        }
    }
}
