pub mod config;
pub mod display;
pub mod logging;
pub mod messages;
pub mod mpd;

pub use config::Config;
pub use logging::LoggingConfig;
