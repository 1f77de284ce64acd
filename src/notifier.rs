use std::io::{self, Write};

use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::picker;

/// Frames the pointer stays highlighted after a tick.
const FLASH_FRAMES: u8 = 3;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("failed to emit tick feedback: {0}")]
    Io(#[from] io::Error),
    #[error("notifier failed: {0}")]
    Other(String),
}

/// Receives the side effects of a spin.
///
/// Both methods run inside the frame step, so they should only schedule work.
pub trait SpinNotifier {
    /// A stripe boundary crossed the centerline.
    fn on_tick(&mut self) -> Result<(), NotifierError> {
        Ok(())
    }

    /// The spin finished on `label`. Called once per spin, before the label is
    /// removed from the wheel.
    fn on_settled(&mut self, _label: &str) -> Result<(), NotifierError> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl SpinNotifier for NoopNotifier {}

/// How a tick is presented in the terminal.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum TickSound {
    /// Terminal bell.
    Bell,
    /// Briefly highlight the pointer.
    Flash,
    Silent,
    /// Bell or flash, chosen per spin.
    Random,
}

const RANDOM_CHOICES: [TickSound; 2] = [TickSound::Bell, TickSound::Flash];

/// Notifier used by the terminal UI.
pub struct TerminalNotifier {
    sound: TickSound,
    active: TickSound,
    out: Box<dyn Write + Send>,
    flash_frames: u8,
    ticks: u64,
    settled: Option<String>,
}

impl TerminalNotifier {
    pub fn new(sound: TickSound) -> Self {
        Self::with_writer(sound, Box::new(io::stdout()))
    }

    pub fn with_writer(sound: TickSound, out: Box<dyn Write + Send>) -> Self {
        Self {
            sound,
            active: sound,
            out,
            flash_frames: 0,
            ticks: 0,
            settled: None,
        }
    }

    /// Resolves the tick presentation for the spin about to start.
    pub fn begin_spin<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.active = match self.sound {
            TickSound::Random => *picker::pick(&RANDOM_CHOICES, rng).unwrap_or(&TickSound::Flash),
            other => other,
        };
        self.ticks = 0;
        self.settled = None;
    }

    pub fn set_sound(&mut self, sound: TickSound) {
        self.sound = sound;
        self.active = sound;
    }

    pub fn sound(&self) -> TickSound {
        self.sound
    }

    /// Presentation in effect for the current spin.
    pub fn active_sound(&self) -> TickSound {
        self.active
    }

    /// Call once per frame.
    pub fn decay(&mut self) {
        self.flash_frames = self.flash_frames.saturating_sub(1);
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_frames > 0
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn take_settled(&mut self) -> Option<String> {
        self.settled.take()
    }
}

impl std::fmt::Debug for TerminalNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalNotifier")
            .field("sound", &self.sound)
            .field("active", &self.active)
            .field("flash_frames", &self.flash_frames)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl SpinNotifier for TerminalNotifier {
    fn on_tick(&mut self) -> Result<(), NotifierError> {
        self.ticks += 1;
        match self.active {
            TickSound::Bell => {
                self.out.write_all(b"\x07")?;
                self.out.flush()?;
            }
            TickSound::Flash | TickSound::Random => self.flash_frames = FLASH_FRAMES,
            TickSound::Silent => {}
        }
        Ok(())
    }

    fn on_settled(&mut self, label: &str) -> Result<(), NotifierError> {
        self.settled = Some(label.to_string());
        self.flash_frames = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_bell_writes_bel_byte_per_tick() {
        let buf = SharedBuf::default();
        let mut n = TerminalNotifier::with_writer(TickSound::Bell, Box::new(buf.clone()));
        n.on_tick().unwrap();
        n.on_tick().unwrap();
        assert_eq!(*buf.0.lock().unwrap(), b"\x07\x07".to_vec());
        assert_eq!(n.ticks(), 2);
        assert!(!n.is_flashing());
    }

    #[test]
    fn test_flash_decays_after_frames() {
        let buf = SharedBuf::default();
        let mut n = TerminalNotifier::with_writer(TickSound::Flash, Box::new(buf.clone()));
        n.on_tick().unwrap();
        assert!(n.is_flashing());
        for _ in 0..FLASH_FRAMES {
            n.decay();
        }
        assert!(!n.is_flashing());
        assert!(buf.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_silent_has_no_side_effects() {
        let buf = SharedBuf::default();
        let mut n = TerminalNotifier::with_writer(TickSound::Silent, Box::new(buf.clone()));
        n.on_tick().unwrap();
        assert!(!n.is_flashing());
        assert!(buf.0.lock().unwrap().is_empty());
        assert_eq!(n.ticks(), 1);
    }

    #[test]
    fn test_random_resolves_to_bell_or_flash() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut n = TerminalNotifier::with_writer(TickSound::Random, Box::new(io::sink()));
        for _ in 0..20 {
            n.begin_spin(&mut rng);
            assert!(RANDOM_CHOICES.contains(&n.active_sound()));
            assert_eq!(n.sound(), TickSound::Random);
        }
    }

    #[test]
    fn test_settled_label_is_taken_once() {
        let mut n = TerminalNotifier::with_writer(TickSound::Silent, Box::new(io::sink()));
        n.on_settled("Ada").unwrap();
        assert_eq!(n.take_settled().as_deref(), Some("Ada"));
        assert_eq!(n.take_settled(), None);
    }

    #[test]
    fn test_noop_notifier_accepts_everything() {
        let mut n = NoopNotifier;
        assert!(n.on_tick().is_ok());
        assert!(n.on_settled("x").is_ok());
    }
}
