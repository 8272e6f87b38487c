//! Recording display for tests.
//!
//! Clones share one call log, so a test keeps a clone as a probe and hands
//! another to the controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{CharacterDisplay, DeviceError, DisplayLine, Frame};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Init,
    Write(DisplayLine, String),
    Clear,
    Close,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    calls: Arc<Mutex<Vec<DeviceCall>>>,
    busy: Arc<AtomicBool>,
    fail_init: bool,
    fail_text: Option<String>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Make every write of exactly `text` fail.
    pub fn with_failing_text(mut self, text: &str) -> Self {
        self.fail_text = Some(text.to_string());
        self
    }

    /// Successful device calls in the order they happened.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Frame> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeviceCall::Write(line, text) => Some(Frame::new(line, text)),
                _ => None,
            })
            .collect()
    }

    /// Texts written to one line, in order.
    pub fn texts(&self, line: DisplayLine) -> Vec<String> {
        self.writes()
            .into_iter()
            .filter(|frame| frame.line == line)
            .map(|frame| frame.text)
            .collect()
    }

    pub fn count(&self, call: &DeviceCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    fn record<T>(&self, call: impl FnOnce() -> Result<DeviceCall, T>) -> Result<(), T> {
        assert!(
            !self.busy.swap(true, Ordering::SeqCst),
            "overlapping device calls"
        );
        let result = call().map(|call| self.calls.lock().unwrap().push(call));
        self.busy.store(false, Ordering::SeqCst);
        result
    }
}

impl CharacterDisplay for RecordingDisplay {
    fn init(&mut self) -> Result<(), DeviceError> {
        let fail = self.fail_init;
        self.record(|| {
            if fail {
                Err(DeviceError::Init("no device attached".to_string()))
            } else {
                Ok(DeviceCall::Init)
            }
        })
    }

    fn write_line(&mut self, line: DisplayLine, text: &str) -> Result<(), DeviceError> {
        let fail = self.fail_text.as_deref() == Some(text);
        self.record(|| {
            if fail {
                Err(DeviceError::Write {
                    line,
                    reason: "bus error".to_string(),
                })
            } else {
                Ok(DeviceCall::Write(line, text.to_string()))
            }
        })
    }

    fn clear(&mut self) {
        let _ = self.record(|| Ok::<_, ()>(DeviceCall::Clear));
    }

    fn close(&mut self) {
        let _ = self.record(|| Ok::<_, ()>(DeviceCall::Close));
    }
}
