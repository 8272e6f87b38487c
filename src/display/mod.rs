//! Character display contract and the serialized controller that owns it.
//!
//! The physical device is only ever touched by the display worker spawned
//! from [`DisplayController::spawn`]; everything else talks to the worker
//! through the controller handle.

pub mod controller;
#[cfg(test)]
pub mod mock;
pub mod terminal;

pub use controller::DisplayController;
pub use terminal::TerminalDisplay;

use std::fmt;

/// One of the two fixed-width rows of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayLine {
    Line1,
    Line2,
}

impl DisplayLine {
    pub const ALL: [DisplayLine; 2] = [DisplayLine::Line1, DisplayLine::Line2];

    /// Zero-based row index
    pub fn index(self) -> usize {
        match self {
            DisplayLine::Line1 => 0,
            DisplayLine::Line2 => 1,
        }
    }
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayLine::Line1 => write!(f, "line 1"),
            DisplayLine::Line2 => write!(f, "line 2"),
        }
    }
}

/// A single atomic write to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub line: DisplayLine,
    pub text: String,
}

impl Frame {
    pub fn new(line: DisplayLine, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

/// Failures reported by a display driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("display initialization failed: {0}")]
    Init(String),
    #[error("write to {line} failed: {reason}")]
    Write { line: DisplayLine, reason: String },
    #[error("display is closed")]
    Closed,
}

/// Driver for a two-line character display.
///
/// Implementations are not reentrant; the controller guarantees that at most
/// one of these methods runs at any time. Text passed to [`write_line`] has
/// already been fitted to the display width.
///
/// [`write_line`]: CharacterDisplay::write_line
pub trait CharacterDisplay: Send + 'static {
    /// Powers on and resets the device.
    fn init(&mut self) -> Result<(), DeviceError>;

    /// Replaces the contents of one row.
    fn write_line(&mut self, line: DisplayLine, text: &str) -> Result<(), DeviceError>;

    /// Blanks both rows.
    fn clear(&mut self);

    /// Releases the device.
    fn close(&mut self);
}
