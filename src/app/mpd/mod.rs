//! Glue around the `mpd_client` crate: connecting, the change subscription
//! and the per-event status queries.

pub mod connection;
pub mod query;
pub mod watcher;

pub use connection::connect_to_mpd;
pub use query::{MpdQuery, PlayerQuery};
pub use watcher::Subscription;

/// Failures talking to the daemon.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DaemonError {
    #[error("cannot reach mpd at {address}: {reason}")]
    Connection { address: String, reason: String },
    #[error("mpd query failed: {0}")]
    Query(String),
    #[error("mpd connection lost: {0}")]
    Subscription(String),
}
