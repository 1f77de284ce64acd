//! Host side of the frame loop: terminal input on a reader thread, and a
//! frame clock that keeps animation frames on schedule while keys arrive.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub enum WheelEvent {
    Key(KeyEvent),
    Resize,
    /// A frame is due: advance animations and redraw.
    Frame,
    /// Input is gone for good. The loop should stop.
    Closed,
}

/// Where key and resize events come from.
pub trait InputSource: Send + 'static {
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread. The thread exits on a read
/// error, which the runner then reports as [`WheelEvent::Closed`].
pub struct TerminalInput {
    rx: Receiver<WheelEvent>,
}

impl TerminalInput {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let event = match event::read() {
                // Windows reports releases too; only presses drive the wheel.
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => WheelEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => WheelEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "terminal input failed");
                    break;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl InputSource for TerminalInput {
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Input fed from a channel, for driving the app without a terminal.
pub struct ChannelInput {
    rx: Receiver<WheelEvent>,
}

impl ChannelInput {
    pub fn new(rx: Receiver<WheelEvent>) -> Self {
        Self { rx }
    }
}

impl InputSource for ChannelInput {
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Deadline of the next animation frame.
///
/// Frames are due every `interval` measured from a fixed schedule, not from the
/// last event, so a burst of key presses cannot hold back a spin. A host that
/// falls behind skips the missed frames instead of replaying them.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    interval: Duration,
    next: Instant,
}

impl FrameClock {
    pub fn new(interval: Duration, now: Instant) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            next: now + interval,
        }
    }

    pub fn until_due(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Consumes the due frame and schedules the following one.
    fn advance(&mut self, now: Instant) {
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
    }
}

/// Merges input with the frame clock. This is the only place the app waits.
pub struct Runner<I: InputSource> {
    input: I,
    clock: FrameClock,
}

impl<I: InputSource> Runner<I> {
    pub fn new(input: I, frame_interval: Duration) -> Self {
        Self {
            input,
            clock: FrameClock::new(frame_interval, Instant::now()),
        }
    }

    /// Next input event, or `Frame` once the frame deadline passes.
    pub fn step(&mut self) -> WheelEvent {
        let now = Instant::now();
        let wait = self.clock.until_due(now);
        if wait.is_zero() {
            self.clock.advance(now);
            return WheelEvent::Frame;
        }

        match self.input.recv_timeout(wait) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                self.clock.advance(Instant::now());
                WheelEvent::Frame
            }
            Err(RecvTimeoutError::Disconnected) => {
                debug!("input closed");
                WheelEvent::Closed
            }
        }
    }
}
