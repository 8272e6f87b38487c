use std::time::Duration;

use mpd_client::client::ConnectionEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{DaemonError, connect_to_mpd};
use crate::app::logging::log_mpd_connection;

const CHANNEL_CAPACITY: usize = 16;

/// The daemon's change notifications and its error stream.
///
/// Aborting `task` closes both channels.
pub struct Subscription {
    pub events: mpsc::Receiver<String>,
    pub errors: mpsc::Receiver<DaemonError>,
    pub task: JoinHandle<()>,
}

impl Subscription {
    /// Start watching the daemon at `address`, reconnecting after
    /// `reconnect_delay` whenever the connection drops.
    pub fn start(address: String, reconnect_delay: Duration) -> Self {
        let (events_tx, events) = mpsc::channel(CHANNEL_CAPACITY);
        let (errors_tx, errors) = mpsc::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(watch(address, reconnect_delay, events_tx, errors_tx));

        Self {
            events,
            errors,
            task,
        }
    }
}

async fn watch(
    address: String,
    reconnect_delay: Duration,
    events: mpsc::Sender<String>,
    errors: mpsc::Sender<DaemonError>,
) {
    loop {
        log::info!("Attempting to connect to MPD at: {}", address);

        let error = match connect_to_mpd(&address).await {
            Ok((client, mut state_changes)) => {
                log_mpd_connection(&address, true, None);

                // The idle loop lives as long as the client does.
                let _client = client;
                let mut lost = DaemonError::Subscription("connection closed".to_string());

                while let Some(event) = state_changes.next().await {
                    match event {
                        ConnectionEvent::SubsystemChange(subsystem) => {
                            let name = format!("{:?}", subsystem).to_lowercase();
                            log::debug!("MPD subsystem change: {}", name);
                            if events.send(name).await.is_err() {
                                return;
                            }
                        }
                        ConnectionEvent::ConnectionClosed(err) => {
                            log::error!("MPD connection closed: {:?}", err);
                            lost = DaemonError::Subscription(format!("{:?}", err));
                            break;
                        }
                    }
                }
                lost
            }
            Err(e) => {
                log_mpd_connection(&address, false, Some(&e.to_string()));
                e
            }
        };

        if errors.send(error).await.is_err() {
            return;
        }

        log::debug!("Reconnecting to MPD in {:?}", reconnect_delay);
        tokio::time::sleep(reconnect_delay).await;
    }
}
