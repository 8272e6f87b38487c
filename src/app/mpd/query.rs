use std::future::Future;

use mpd_client::commands;

use super::{DaemonError, connect_to_mpd};
use crate::player::PlayerState;

/// Source of player snapshots for the now-playing pipeline.
pub trait PlayerQuery: Send + Sync + 'static {
    fn player_state(&self) -> impl Future<Output = Result<PlayerState, DaemonError>> + Send;
}

/// Queries status and current song over a fresh control connection per call.
pub struct MpdQuery {
    address: String,
}

impl MpdQuery {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl PlayerQuery for MpdQuery {
    async fn player_state(&self) -> Result<PlayerState, DaemonError> {
        let (client, _events) = connect_to_mpd(&self.address).await?;

        let (status, current_song) = tokio::try_join!(
            client.command(commands::Status),
            client.command(commands::CurrentSong)
        )
        .map_err(|e| DaemonError::Query(e.to_string()))?;

        log::debug!(
            "Status {:?}, current song {:?}",
            status.state,
            current_song.as_ref().map(|s| s.song.file_path())
        );

        Ok(PlayerState::from_mpd(
            &status,
            current_song.as_ref().map(|s| &s.song),
        ))
    }
}
