//! Now-playing pipeline: turns daemon change notifications into display
//! updates, skipping rows whose visible text would not change.

use std::fmt::Display;

use tokio::sync::mpsc;

use crate::animation::slide_in_from_right;
use crate::app::mpd::{DaemonError, PlayerQuery};
use crate::display::{DisplayController, DisplayLine};
use crate::player::{PlaybackState, PlayerState};
use crate::text::{center, derive_lines};

/// What the pipeline last put on each row. Only updated once the matching
/// write or animation has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayedState {
    pub line1: String,
    pub line2: String,
}

impl DisplayedState {
    pub fn get(&self, line: DisplayLine) -> &str {
        match line {
            DisplayLine::Line1 => &self.line1,
            DisplayLine::Line2 => &self.line2,
        }
    }

    fn set(&mut self, line: DisplayLine, text: String) {
        match line {
            DisplayLine::Line1 => self.line1 = text,
            DisplayLine::Line2 => self.line2 = text,
        }
    }
}

pub struct NowPlaying<Q> {
    controller: DisplayController,
    query: Q,
    width: usize,
    error_title: String,
    displayed: DisplayedState,
}

impl<Q: PlayerQuery> NowPlaying<Q> {
    pub fn new(controller: DisplayController, query: Q, width: usize, error_title: &str) -> Self {
        Self {
            controller,
            query,
            width,
            error_title: error_title.to_string(),
            displayed: DisplayedState::default(),
        }
    }

    pub fn displayed(&self) -> &DisplayedState {
        &self.displayed
    }

    /// Refresh on every notification until the event source closes.
    ///
    /// Nothing is drawn before the first notification arrives.
    pub async fn run(mut self, mut events: mpsc::Receiver<String>) {
        log::info!("Now-playing pipeline started, waiting for changes");

        while let Some(subsystem) = events.recv().await {
            log::debug!("Changed subsystem: {}", subsystem);
            self.refresh().await;
        }

        log::info!("Event source closed, now-playing pipeline stopped");
    }

    /// Query the daemon once and bring the display up to date.
    pub async fn refresh(&mut self) {
        match self.query.player_state().await {
            Ok(state) => self.show(state).await,
            Err(e) => {
                log::error!("Player query failed: {}", e);
                report_error(&self.controller, &self.error_title, &e, self.width).await;
            }
        }
    }

    async fn show(&mut self, state: PlayerState) {
        log::debug!("Player state: {:?}", state);

        if state.playback != PlaybackState::Playing {
            let status = center(state.playback.label(), self.width);
            match self.controller.write_lines("", status.clone()).await {
                Ok(()) => {
                    self.displayed = DisplayedState {
                        line1: String::new(),
                        line2: status,
                    }
                }
                Err(e) => log::warn!("Could not show playback state: {}", e),
            }
            return;
        }

        let (line1, line2) = derive_lines(&state.title, &state.artist);
        for (line, text) in [(DisplayLine::Line1, line1), (DisplayLine::Line2, line2)] {
            let text = center(&text, self.width);
            if self.displayed.get(line) == text {
                continue;
            }

            let frames = slide_in_from_right(&text, self.width);
            match self.controller.animate(frames, line).await {
                Ok(()) => self.displayed.set(line, text),
                Err(e) => log::warn!("Could not update {}: {}", line, e),
            }
        }
    }
}

/// Put an error on the display: the title on line 1, the message on line 2.
pub async fn report_error(
    controller: &DisplayController,
    title: &str,
    error: &impl Display,
    width: usize,
) {
    let message = center(&error.to_string(), width);
    if let Err(e) = controller.write_lines(center(title, width), message).await {
        log::warn!("Could not show error on display: {}", e);
    }
}

/// Surface every error from the daemon subscription until the stream closes.
/// Does not touch the pipeline's displayed state.
pub async fn report_errors(
    controller: DisplayController,
    mut errors: mpsc::Receiver<DaemonError>,
    title: String,
    width: usize,
) {
    while let Some(error) = errors.recv().await {
        log::error!("Error: {}", error);
        report_error(&controller, &title, &error, width).await;
    }
}
