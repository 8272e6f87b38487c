pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod mpd;
pub mod now_playing;
