use mpd_client::responses::{PlayState, Song, Status};

/// Playback state as reported by the daemon.
///
/// mpd only reports `play`, `pause` and `stop`, and `PlayState` has no
/// variant beyond those, so there is no catch-all here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
}

impl PlaybackState {
    /// The daemon's own word for the state, shown when not playing.
    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Playing => "play",
            PlaybackState::Paused => "pause",
            PlaybackState::Stopped => "stop",
        }
    }
}

impl From<PlayState> for PlaybackState {
    fn from(state: PlayState) -> Self {
        match state {
            PlayState::Playing => PlaybackState::Playing,
            PlayState::Paused => PlaybackState::Paused,
            PlayState::Stopped => PlaybackState::Stopped,
        }
    }
}

/// Snapshot of what the daemon is doing, rebuilt on every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    pub playback: PlaybackState,
    /// First artist tag, empty if absent
    pub artist: String,
    /// Title tag, empty if absent
    pub title: String,
}

impl PlayerState {
    pub fn new(playback: PlaybackState, artist: &str, title: &str) -> Self {
        Self {
            playback,
            artist: artist.to_string(),
            title: title.to_string(),
        }
    }

    pub fn from_mpd(status: &Status, song: Option<&Song>) -> Self {
        let artist = song
            .and_then(|song| song.artists().first())
            .cloned()
            .unwrap_or_default();
        let title = song
            .and_then(|song| song.title())
            .map(str::to_string)
            .unwrap_or_default();

        Self::new(status.state.into(), &artist, &title)
    }
}
