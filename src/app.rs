use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};

use crate::{
    celebration::Celebration,
    config::Config,
    geometry::WheelGeometry,
    history::{HistoryDb, HistoryEntry},
    notifier::TerminalNotifier,
    util::parse_names,
    wheel::{Phase, StepOutcome, WheelError, WheelState, Winner},
};

/// How many past winners the history screen loads.
const HISTORY_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Entering the names that will go on the wheel.
    Editing,
    Wheel,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

#[derive(Debug, Default)]
pub struct HistoryView {
    pub scroll_offset: usize,
    pub entries: Vec<HistoryEntry>,
    pub tally: Vec<(String, i64)>,
}

#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub config: Config,
    pub wheel: WheelState,
    /// Names the next wheel is generated from.
    pub names: Vec<String>,
    pub input: String,
    pub notifier: TerminalNotifier,
    pub celebration: Celebration,
    pub history: Option<HistoryDb>,
    pub history_view: HistoryView,
    pub viewport: (u16, u16),
    spin_started: Option<Instant>,
    rng: StdRng,
}

impl App {
    pub fn new(
        config: Config,
        names: Vec<String>,
        notifier: TerminalNotifier,
        history: Option<HistoryDb>,
    ) -> Self {
        let wheel = WheelState::new(WheelGeometry::default(), config.spin_settings());
        Self {
            state: AppState::Editing,
            config,
            wheel,
            names,
            input: String::new(),
            notifier,
            celebration: Celebration::new(),
            history,
            history_view: HistoryView::default(),
            viewport: (80, 24),
            spin_started: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the randomness source, for reproducible runs.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Builds the wheel from the current names and shows it.
    pub fn build_wheel(&mut self) -> Result<(), WheelError> {
        if self.wheel.is_spinning() {
            self.wheel.cancel_spin();
            self.spin_started = None;
        }
        self.wheel.generate(&self.names, &mut self.rng)?;
        self.celebration.stop();
        self.state = AppState::Wheel;
        info!(count = self.names.len(), "wheel built");
        Ok(())
    }

    /// Adds the names typed so far. An empty line builds the wheel instead.
    pub fn submit_input(&mut self) -> Result<(), WheelError> {
        let parsed = parse_names(&self.input);
        self.input.clear();
        if !parsed.is_empty() {
            self.names.extend(parsed);
            return Ok(());
        }
        if self.names.is_empty() {
            return Ok(());
        }
        self.build_wheel()
    }

    pub fn request_spin(&mut self, now: Instant) -> bool {
        if !self.wheel.spin(&mut self.rng) {
            return false;
        }
        self.notifier.begin_spin(&mut self.rng);
        self.celebration.stop();
        self.spin_started = Some(now);
        true
    }

    /// Restores the generated order, abandoning a running spin first.
    pub fn reset(&mut self) -> Result<(), WheelError> {
        if self.wheel.cancel_spin() {
            self.spin_started = None;
        }
        self.celebration.stop();
        self.wheel.reset()
    }

    /// Advances animations by one frame.
    pub fn on_frame(&mut self, now: Instant) {
        self.notifier.decay();
        self.celebration.update();

        let Some(started) = self.spin_started else {
            return;
        };
        match self.wheel.step(now.saturating_duration_since(started), &mut self.notifier) {
            Ok(StepOutcome::Settled(Winner {
                label, remaining, ..
            })) => {
                self.notifier.take_settled();
                self.on_settled(&label, remaining);
            }
            Ok(StepOutcome::Pending) => {}
            Ok(StepOutcome::Inactive) => self.spin_started = None,
            Err(e) => {
                warn!(error = %e, "spin frame reported an error");
                // The wheel finishes its transition even when the notifier
                // fails, so the spin may have settled on this frame.
                if !self.wheel.is_spinning() {
                    self.spin_started = None;
                    if let Some(label) = self.notifier.take_settled() {
                        let remaining = self.wheel.items().len();
                        self.on_settled(&label, remaining);
                    }
                }
            }
        }
    }

    fn on_settled(&mut self, label: &str, remaining: usize) {
        self.spin_started = None;
        info!(%label, remaining, "winner drawn");
        if let Some(db) = &self.history {
            if let Err(e) = db.record(label, remaining) {
                warn!(error = %e, "failed to record winner");
            }
        }
        let (width, height) = self.viewport;
        self.celebration.start(label, width, height, &mut self.rng);
    }

    pub fn show_history(&mut self) {
        self.history_view = HistoryView::default();
        if let Some(db) = &self.history {
            match (db.recent(HISTORY_LIMIT), db.tally()) {
                (Ok(entries), Ok(tally)) => {
                    self.history_view.entries = entries;
                    self.history_view.tally = tally;
                }
                (Err(e), _) | (_, Err(e)) => warn!(error = %e, "failed to load history"),
            }
        }
        self.state = AppState::History;
    }

    pub fn is_spinning(&self) -> bool {
        self.wheel.phase() == Phase::Spinning
    }

    /// Something on screen changes from frame to frame.
    pub fn is_animating(&self) -> bool {
        self.is_spinning() || self.celebration.is_active() || self.notifier.is_flashing()
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> AppAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppAction::Quit;
        }

        let result = match self.state {
            AppState::Editing => self.handle_editing_key(key),
            AppState::Wheel => self.handle_wheel_key(key, now),
            AppState::History => {
                self.handle_history_key(key);
                Ok(AppAction::Continue)
            }
        };

        result.unwrap_or_else(|e| {
            warn!(error = %e, "key rejected");
            AppAction::Continue
        })
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Result<AppAction, WheelError> {
        match key.code {
            KeyCode::Esc => return Ok(AppAction::Quit),
            KeyCode::Enter => self.submit_input()?,
            KeyCode::Tab if !self.names.is_empty() => self.build_wheel()?,
            KeyCode::Backspace => {
                if self.input.pop().is_none() {
                    self.names.pop();
                }
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
        Ok(AppAction::Continue)
    }

    fn handle_wheel_key(&mut self, key: KeyEvent, now: Instant) -> Result<AppAction, WheelError> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(AppAction::Quit),
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.request_spin(now);
            }
            KeyCode::Char('r') => self.reset()?,
            KeyCode::Char('n') => self.build_wheel()?,
            KeyCode::Char('e') => {
                if self.wheel.cancel_spin() {
                    self.spin_started = None;
                }
                self.celebration.stop();
                self.state = AppState::Editing;
            }
            KeyCode::Char('h') => self.show_history(),
            _ => {}
        }
        Ok(AppAction::Continue)
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.state = AppState::Wheel;
            }
            KeyCode::Up => {
                self.history_view.scroll_offset = self.history_view.scroll_offset.saturating_sub(1);
            }
            KeyCode::Down => {
                let max = self.history_view.entries.len().saturating_sub(1);
                self.history_view.scroll_offset = (self.history_view.scroll_offset + 1).min(max);
            }
            KeyCode::Home => self.history_view.scroll_offset = 0,
            KeyCode::Char('c') => {
                if let Some(db) = &self.history {
                    if let Err(e) = db.clear() {
                        warn!(error = %e, "failed to clear history");
                    }
                }
                self.show_history();
            }
            _ => {}
        }
    }
}
