//! Serialized display controller.
//!
//! A single worker task owns the [`CharacterDisplay`] and drains one ordered
//! queue of requests. Callers get a [`Completion`] back for every request and
//! may await it or drop it.
//!
//! Scheduling rules:
//! - requests are applied in submission order, one device call at a time
//! - a one-shot operation (write, clear, close, init) waits until every
//!   in-flight animation has drained
//! - animations on different lines advance frame by frame in lockstep, so
//!   they interleave between frames
//! - a new animation for a line supersedes the one already queued or running
//!   there; the old one stops before its next frame

use std::collections::VecDeque;
use std::future::Future;
use std::iter::Peekable;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{CharacterDisplay, DeviceError, DisplayLine, Frame};

/// Outcome of a failed controller request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplayError {
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("animation on {line} was superseded")]
    Superseded { line: DisplayLine },
    #[error("display worker has stopped")]
    Stopped,
}

type Reply = oneshot::Sender<Result<(), DisplayError>>;
type Frames = Box<dyn Iterator<Item = Frame> + Send>;

/// Per-line generation counters. Submitting an animation bumps the counter of
/// its line; a queued or running animation whose captured generation is no
/// longer current has been superseded.
type Generations = Arc<[AtomicU64; 2]>;

enum DeviceOp {
    Initialize,
    WriteLines(String, String),
    Clear,
    Close,
}

impl DeviceOp {
    fn name(&self) -> &'static str {
        match self {
            DeviceOp::Initialize => "initialize",
            DeviceOp::WriteLines(..) => "write lines",
            DeviceOp::Clear => "clear",
            DeviceOp::Close => "close",
        }
    }
}

struct AnimationRequest {
    line: DisplayLine,
    generation: u64,
    frames: Frames,
    reply: Reply,
}

enum Command {
    Apply { op: DeviceOp, reply: Reply },
    Animate(AnimationRequest),
}

/// Resolves once the display worker has finished with a request.
///
/// Dropping a `Completion` does not cancel the request.
pub struct Completion {
    rx: oneshot::Receiver<Result<(), DisplayError>>,
}

impl Future for Completion {
    type Output = Result<(), DisplayError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(Err(DisplayError::Stopped)))
    }
}

/// Cloneable handle to the display worker.
#[derive(Clone)]
pub struct DisplayController {
    tx: mpsc::UnboundedSender<Command>,
    generations: Generations,
}

impl DisplayController {
    /// Move `device` into a new worker task and return a handle to it.
    ///
    /// The worker runs until every handle is dropped and its queue is empty.
    pub fn spawn<D: CharacterDisplay>(device: D, frame_delay: Duration) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let generations: Generations = Arc::new([AtomicU64::new(0), AtomicU64::new(0)]);

        let worker = DisplayWorker {
            device,
            rx,
            inbox_open: true,
            pending: VecDeque::new(),
            active: [None, None],
            generations: Arc::clone(&generations),
            frame_delay,
            closed: false,
        };
        let handle = tokio::spawn(worker.run());

        (Self { tx, generations }, handle)
    }

    /// Power on and reset the device.
    pub fn initialize(&self) -> Completion {
        self.apply(DeviceOp::Initialize)
    }

    /// Write both lines in one step.
    pub fn write_lines(&self, line1: impl Into<String>, line2: impl Into<String>) -> Completion {
        self.apply(DeviceOp::WriteLines(line1.into(), line2.into()))
    }

    /// Play `frames` on `line`, superseding any animation already queued or
    /// running on that line. Resolves after the final frame is written.
    pub fn animate<I>(&self, frames: I, line: DisplayLine) -> Completion
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
    {
        let generation = self.generations[line.index()].fetch_add(1, Ordering::SeqCst) + 1;
        let frames: Frames = Box::new(frames.into_iter().map(move |text| Frame::new(line, text)));
        self.submit(move |reply| {
            Command::Animate(AnimationRequest {
                line,
                generation,
                frames,
                reply,
            })
        })
    }

    pub fn clear(&self) -> Completion {
        self.apply(DeviceOp::Clear)
    }

    /// Release the device. Repeated calls are no-ops.
    pub fn close(&self) -> Completion {
        self.apply(DeviceOp::Close)
    }

    fn apply(&self, op: DeviceOp) -> Completion {
        self.submit(move |reply| Command::Apply { op, reply })
    }

    fn submit(&self, build: impl FnOnce(Reply) -> Command) -> Completion {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(build(reply)).is_err() {
            log::warn!("Display worker has stopped, request dropped");
        }
        Completion { rx }
    }
}

struct ActiveAnimation {
    generation: u64,
    frames: Peekable<Frames>,
    reply: Reply,
}

struct DisplayWorker<D> {
    device: D,
    rx: mpsc::UnboundedReceiver<Command>,
    inbox_open: bool,
    pending: VecDeque<Command>,
    active: [Option<ActiveAnimation>; 2],
    generations: Generations,
    frame_delay: Duration,
    closed: bool,
}

impl<D: CharacterDisplay> DisplayWorker<D> {
    async fn run(mut self) {
        log::debug!("Display worker started");

        loop {
            self.admit_pending();

            if self.has_active() {
                self.step_animations();
                if self.has_active() {
                    self.pace(Instant::now() + self.frame_delay).await;
                }
                continue;
            }

            // Nothing running, so admit_pending has emptied the queue.
            if !self.inbox_open {
                break;
            }
            match self.rx.recv().await {
                Some(command) => {
                    self.pending.push_back(command);
                    self.drain_inbox();
                }
                None => self.inbox_open = false,
            }
        }

        if !self.closed {
            log::debug!("Display worker stopping, releasing device");
            self.device.close();
        }
        log::debug!("Display worker stopped");
    }

    /// Queue everything that has already been submitted.
    fn drain_inbox(&mut self) {
        while let Ok(command) = self.rx.try_recv() {
            self.pending.push_back(command);
        }
    }

    fn has_active(&self) -> bool {
        self.active.iter().any(Option::is_some)
    }

    fn is_stale(&self, line: DisplayLine, generation: u64) -> bool {
        self.generations[line.index()].load(Ordering::SeqCst) != generation
    }

    /// Start or apply queued requests in order until one has to wait.
    fn admit_pending(&mut self) {
        while let Some(command) = self.pending.pop_front() {
            match command {
                Command::Animate(request) => self.start_animation(request),
                Command::Apply { op, reply } => {
                    if self.has_active() {
                        self.pending.push_front(Command::Apply { op, reply });
                        return;
                    }
                    let result = self.apply(op);
                    let _ = reply.send(result);
                }
            }
        }
    }

    fn start_animation(&mut self, request: AnimationRequest) {
        let AnimationRequest {
            line,
            generation,
            frames,
            reply,
        } = request;

        if self.is_stale(line, generation) {
            log::debug!("Dropping queued animation on {}, superseded", line);
            let _ = reply.send(Err(DisplayError::Superseded { line }));
            return;
        }

        if let Some(previous) = self.active[line.index()].take() {
            log::debug!("Animation on {} superseded mid-flight", line);
            let _ = previous.reply.send(Err(DisplayError::Superseded { line }));
        }

        if self.closed {
            let _ = reply.send(Err(DeviceError::Closed.into()));
            return;
        }

        let mut frames = frames.peekable();
        if frames.peek().is_none() {
            let _ = reply.send(Ok(()));
            return;
        }

        self.active[line.index()] = Some(ActiveAnimation {
            generation,
            frames,
            reply,
        });
    }

    /// Write the next frame of every running animation, line 1 first.
    fn step_animations(&mut self) {
        for line in DisplayLine::ALL {
            let Some(mut animation) = self.active[line.index()].take() else {
                continue;
            };

            if self.is_stale(line, animation.generation) {
                log::debug!("Abandoning superseded animation on {}", line);
                let _ = animation.reply.send(Err(DisplayError::Superseded { line }));
                continue;
            }

            let Some(frame) = animation.frames.next() else {
                let _ = animation.reply.send(Ok(()));
                continue;
            };

            match self.device.write_line(frame.line, &frame.text) {
                Ok(()) if animation.frames.peek().is_none() => {
                    let _ = animation.reply.send(Ok(()));
                }
                Ok(()) => self.active[line.index()] = Some(animation),
                Err(e) => {
                    log::warn!("Animation on {} aborted: {}", line, e);
                    let _ = animation.reply.send(Err(e.into()));
                }
            }
        }
    }

    /// Wait out the inter-frame delay while still accepting new requests.
    async fn pace(&mut self, deadline: Instant) {
        let sleep = tokio::time::sleep_until(deadline);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return,
                command = self.rx.recv(), if self.inbox_open => match command {
                    Some(command) => self.pending.push_back(command),
                    None => self.inbox_open = false,
                },
            }
        }
    }

    fn apply(&mut self, op: DeviceOp) -> Result<(), DisplayError> {
        let name = op.name();
        let result = match op {
            DeviceOp::Initialize => {
                let result = self.device.init();
                if result.is_ok() {
                    self.closed = false;
                }
                result
            }
            DeviceOp::WriteLines(line1, line2) if !self.closed => self
                .device
                .write_line(DisplayLine::Line1, &line1)
                .and_then(|()| self.device.write_line(DisplayLine::Line2, &line2)),
            DeviceOp::WriteLines(..) => Err(DeviceError::Closed),
            DeviceOp::Clear => {
                if !self.closed {
                    self.device.clear();
                }
                Ok(())
            }
            DeviceOp::Close => {
                if !self.closed {
                    self.device.close();
                    self.closed = true;
                    log::info!("Display closed");
                }
                Ok(())
            }
        };

        result.map_err(|e| {
            log::warn!("Display {} failed: {}", name, e);
            DisplayError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::mock::{DeviceCall, RecordingDisplay};

    const DELAY: Duration = Duration::from_millis(10);

    fn frames(prefix: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn spawn(display: &RecordingDisplay) -> (DisplayController, JoinHandle<()>) {
        DisplayController::spawn(display.clone(), DELAY)
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_lines_writes_both_rows() {
        let display = RecordingDisplay::new();
        let (controller, _worker) = spawn(&display);

        controller.initialize().await.unwrap();
        controller.write_lines("top", "bottom").await.unwrap();

        assert_eq!(
            display.calls(),
            vec![
                DeviceCall::Init,
                DeviceCall::Write(DisplayLine::Line1, "top".to_string()),
                DeviceCall::Write(DisplayLine::Line2, "bottom".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_init_is_reported() {
        let display = RecordingDisplay::new().with_failing_init();
        let (controller, _worker) = spawn(&display);

        let result = controller.initialize().await;
        assert!(matches!(
            result,
            Err(DisplayError::Device(DeviceError::Init(_)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_animation_plays_every_frame_with_pacing() {
        let display = RecordingDisplay::new();
        let (controller, _worker) = spawn(&display);

        let started = Instant::now();
        controller
            .animate(frames("f", 5), DisplayLine::Line2)
            .await
            .unwrap();

        assert_eq!(display.texts(DisplayLine::Line2), frames("f", 5));
        // Four gaps between five frames, none after the last.
        assert_eq!(started.elapsed(), DELAY * 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_animation_completes_immediately() {
        let display = RecordingDisplay::new();
        let (controller, _worker) = spawn(&display);

        controller
            .animate(Vec::<String>::new(), DisplayLine::Line1)
            .await
            .unwrap();
        assert!(display.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_animation_supersedes_running_one() {
        let display = RecordingDisplay::new();
        let (controller, _worker) = spawn(&display);

        let first = controller.animate(frames("a", 10), DisplayLine::Line1);
        tokio::time::sleep(DELAY * 3 + DELAY / 2).await;
        let second = controller.animate(frames("b", 4), DisplayLine::Line1);

        assert_eq!(
            first.await,
            Err(DisplayError::Superseded {
                line: DisplayLine::Line1
            })
        );
        second.await.unwrap();

        let written = display.texts(DisplayLine::Line1);
        let last_a = written.iter().rposition(|t| t.starts_with('a')).unwrap();
        let first_b = written.iter().position(|t| t.starts_with('b')).unwrap();
        assert!(last_a < first_b);
        assert!(last_a + 1 < 10, "superseded animation ran to the end");
        assert_eq!(written[first_b..], frames("b", 4)[..]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_animation_superseded_before_start() {
        let display = RecordingDisplay::new();
        let (controller, _worker) = spawn(&display);

        // Held back by the barrier write behind the running animation.
        let running = controller.animate(frames("r", 3), DisplayLine::Line2);
        let write = controller.write_lines("x", "y");
        let stale = controller.animate(frames("s", 3), DisplayLine::Line1);
        let fresh = controller.animate(frames("t", 2), DisplayLine::Line1);

        running.await.unwrap();
        write.await.unwrap();
        assert_eq!(
            stale.await,
            Err(DisplayError::Superseded {
                line: DisplayLine::Line1
            })
        );
        fresh.await.unwrap();

        assert!(!display.texts(DisplayLine::Line1).iter().any(|t| t.starts_with('s')));
        assert_eq!(
            display.texts(DisplayLine::Line1),
            vec!["x".to_string(), "t0".to_string(), "t1".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_animations_on_different_lines_interleave() {
        let display = RecordingDisplay::new();
        let (controller, _worker) = spawn(&display);

        let top = controller.animate(frames("t", 3), DisplayLine::Line1);
        let bottom = controller.animate(frames("b", 3), DisplayLine::Line2);
        top.await.unwrap();
        bottom.await.unwrap();

        let order: Vec<String> = display.writes().into_iter().map(|f| f.text).collect();
        assert_eq!(order, vec!["t0", "b0", "t1", "b1", "t2", "b2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_waits_for_running_animation() {
        let display = RecordingDisplay::new();
        let (controller, _worker) = spawn(&display);

        let animation = controller.animate(frames("a", 6), DisplayLine::Line1);
        tokio::time::sleep(DELAY * 2).await;
        controller.write_lines("bye", "").await.unwrap();
        animation.await.unwrap();

        let order: Vec<String> = display.writes().into_iter().map(|f| f.text).collect();
        let mut expected = frames("a", 6);
        expected.extend(["bye".to_string(), String::new()]);
        assert_eq!(order, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_write_does_not_wedge_queue() {
        let display = RecordingDisplay::new().with_failing_text("boom");
        let (controller, _worker) = spawn(&display);

        let failed = controller.write_lines("boom", "never");
        let broken_animation = controller.animate(
            vec!["a0".to_string(), "boom".to_string(), "a2".to_string()],
            DisplayLine::Line2,
        );
        let after = controller.write_lines("still", "alive");

        assert!(matches!(
            failed.await,
            Err(DisplayError::Device(DeviceError::Write { .. }))
        ));
        assert!(matches!(
            broken_animation.await,
            Err(DisplayError::Device(DeviceError::Write { .. }))
        ));
        after.await.unwrap();

        let order: Vec<String> = display.writes().into_iter().map(|f| f.text).collect();
        assert_eq!(order, vec!["a0", "still", "alive"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_is_idempotent() {
        let display = RecordingDisplay::new();
        let (controller, worker) = spawn(&display);

        controller.clear().await.unwrap();
        controller.close().await.unwrap();
        controller.close().await.unwrap();
        controller.clear().await.unwrap();
        assert_eq!(
            controller.write_lines("late", "").await,
            Err(DisplayError::Device(DeviceError::Closed))
        );
        assert_eq!(
            controller.animate(frames("z", 2), DisplayLine::Line1).await,
            Err(DisplayError::Device(DeviceError::Closed))
        );

        drop(controller);
        worker.await.unwrap();
        assert_eq!(display.calls(), vec![DeviceCall::Clear, DeviceCall::Close]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_worker_releases_device_when_handles_drop() {
        let display = RecordingDisplay::new();
        let (controller, worker) = spawn(&display);

        let pending = controller.animate(frames("a", 3), DisplayLine::Line1);
        drop(controller);
        pending.await.unwrap();
        worker.await.unwrap();

        assert_eq!(display.count(&DeviceCall::Close), 1);
        assert_eq!(display.texts(DisplayLine::Line1), frames("a", 3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_after_worker_exit_report_stopped() {
        let display = RecordingDisplay::new();
        let (controller, worker) = spawn(&display);
        worker.abort();
        let _ = worker.await;

        assert_eq!(
            controller.write_lines("a", "b").await,
            Err(DisplayError::Stopped)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_are_serialized() {
        let display = RecordingDisplay::new();
        let (controller, _worker) = spawn(&display);

        let mut tasks = Vec::new();
        for caller in 0..8 {
            let controller = controller.clone();
            tasks.push(tokio::spawn(async move {
                for round in 0..4 {
                    let top = format!("c{}r{}", caller, round);
                    let bottom = format!("c{}r{}", caller, round);
                    controller.write_lines(top, bottom).await.unwrap();
                    let line = if caller % 2 == 0 {
                        DisplayLine::Line1
                    } else {
                        DisplayLine::Line2
                    };
                    let _ = controller.animate(frames("x", 3), line).await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // RecordingDisplay panics on overlapping calls; a write_lines pair
        // always lands on adjacent device calls.
        let writes = display.writes();
        for (i, frame) in writes.iter().enumerate() {
            if frame.text.starts_with('c') && frame.line == DisplayLine::Line1 {
                assert_eq!(writes[i + 1], Frame::new(DisplayLine::Line2, frame.text.clone()));
            }
        }
    }
}
