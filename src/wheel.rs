use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    animation::{SpinAnimation, DEFAULT_SPIN_DURATION},
    geometry::WheelGeometry,
    notifier::{NotifierError, SpinNotifier},
    picker,
    planner::{self, SpinPlan, DEFAULT_ROTATIONS},
};

#[derive(Debug, Error)]
pub enum WheelError {
    #[error("operation rejected: a spin is in progress")]
    SpinInProgress,
    #[error(transparent)]
    Notifier(#[from] NotifierError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Spinning,
    /// Winner chosen, not yet removed. Only observable while `on_settled` runs.
    Settled,
    /// Every item has been drawn.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinSettings {
    pub duration: Duration,
    pub rotations: u32,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            duration: DEFAULT_SPIN_DURATION,
            rotations: DEFAULT_ROTATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub label: String,
    /// Position the winner held before it was removed.
    pub index: usize,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// No spin is running.
    Inactive,
    Pending,
    Settled(Winner),
}

#[derive(Debug, Clone)]
struct ActiveSpin {
    plan: SpinPlan,
    animation: SpinAnimation,
    resume_offset: f64,
}

/// The live wheel: its items, displacement and spin lifecycle.
///
/// `WheelState` never touches a clock or a scheduler. The host calls
/// [`WheelState::step`] once per frame with the time elapsed since the spin
/// started, and side effects go through the [`SpinNotifier`] it passes in.
#[derive(Debug, Clone)]
pub struct WheelState {
    items: Vec<String>,
    original: Option<Vec<String>>,
    offset: f64,
    phase: Phase,
    selected_index: Option<usize>,
    last_winner: Option<String>,
    geometry: WheelGeometry,
    settings: SpinSettings,
    spin: Option<ActiveSpin>,
}

impl WheelState {
    pub fn new(geometry: WheelGeometry, settings: SpinSettings) -> Self {
        Self {
            items: Vec::new(),
            original: None,
            offset: 0.0,
            phase: Phase::Idle,
            selected_index: None,
            last_winner: None,
            geometry,
            settings,
            spin: None,
        }
    }

    /// Replaces the items with a shuffled copy of `raw` and remembers that
    /// order for [`WheelState::reset`]. An empty list clears the wheel.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        raw: &[String],
        rng: &mut R,
    ) -> Result<(), WheelError> {
        if self.phase == Phase::Spinning {
            return Err(WheelError::SpinInProgress);
        }

        let items = picker::shuffled(raw, rng);
        debug!(count = items.len(), "generated wheel");
        self.original = if items.is_empty() {
            None
        } else {
            Some(items.clone())
        };
        self.items = items;
        self.rest();
        self.last_winner = None;
        Ok(())
    }

    /// Restores the order captured by the last `generate`. No-op when nothing
    /// was generated.
    pub fn reset(&mut self) -> Result<(), WheelError> {
        if self.phase == Phase::Spinning {
            return Err(WheelError::SpinInProgress);
        }
        let Some(original) = &self.original else {
            return Ok(());
        };

        self.items = original.clone();
        self.rest();
        self.last_winner = None;
        debug!(count = self.items.len(), "wheel reset");
        Ok(())
    }

    /// Starts a spin towards a uniformly random item. Returns false, changing
    /// nothing, when a spin is already running or there is nothing to draw.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if !self.can_spin() {
            return false;
        }
        match picker::pick_index(self.items.len(), rng) {
            Some(index) => self.spin_to(index),
            None => false,
        }
    }

    /// Starts a spin that will settle on `winning_index`.
    pub fn spin_to(&mut self, winning_index: usize) -> bool {
        if !self.can_spin() || winning_index >= self.items.len() {
            return false;
        }

        let plan = planner::plan(
            &self.geometry,
            self.offset,
            self.items.len(),
            winning_index,
            self.settings.rotations,
        );
        let animation =
            SpinAnimation::new(self.geometry, self.items.len(), &plan, self.settings.duration);
        debug!(
            winning_index,
            items = self.items.len(),
            distance = plan.distance(),
            "spin started"
        );

        self.spin = Some(ActiveSpin {
            plan,
            animation,
            resume_offset: self.offset,
        });
        self.phase = Phase::Spinning;
        self.selected_index = None;
        true
    }

    /// Advances the running spin to `elapsed` since it started.
    ///
    /// A notifier error does not interrupt the frame: the wheel finishes its own
    /// transition first and reports the error afterwards.
    pub fn step<N: SpinNotifier + ?Sized>(
        &mut self,
        elapsed: Duration,
        notifier: &mut N,
    ) -> Result<StepOutcome, WheelError> {
        let Some(active) = self.spin.as_mut() else {
            return Ok(StepOutcome::Inactive);
        };

        let frame = active.animation.step(elapsed);
        let planned = active.plan.winning_index;
        self.offset = frame.offset;

        let mut failure = None;
        if frame.crossed {
            if let Err(e) = notifier.on_tick() {
                failure.get_or_insert(e);
            }
        }

        let outcome = if frame.complete {
            self.spin = None;
            let (winner, settle_failure) = self.settle(planned, notifier);
            if let Some(e) = settle_failure {
                failure.get_or_insert(e);
            }
            StepOutcome::Settled(winner)
        } else {
            StepOutcome::Pending
        };

        match failure {
            Some(e) => Err(e.into()),
            None => Ok(outcome),
        }
    }

    /// Abandons the running spin without drawing anyone. Returns false when no
    /// spin was running.
    pub fn cancel_spin(&mut self) -> bool {
        let Some(active) = self.spin.take() else {
            return false;
        };
        self.offset = active.resume_offset;
        self.phase = Phase::Idle;
        debug!("spin cancelled");
        true
    }

    fn settle<N: SpinNotifier + ?Sized>(
        &mut self,
        planned: usize,
        notifier: &mut N,
    ) -> (Winner, Option<NotifierError>) {
        let count = self.items.len();
        self.offset = self.geometry.normalize(self.offset);
        let index = self.geometry.index_at_centre(count, self.offset);
        if index != planned {
            warn!(index, planned, offset = self.offset, "settled off the planned item");
        }

        self.phase = Phase::Settled;
        self.selected_index = Some(index);
        let label = self.items[index].clone();
        let failure = notifier.on_settled(&label).err();

        self.items.remove(index);
        self.selected_index = None;
        self.offset = 0.0;
        self.phase = if self.items.is_empty() {
            Phase::Exhausted
        } else {
            Phase::Idle
        };
        self.last_winner = Some(label.clone());
        debug!(%label, index, remaining = self.items.len(), "spin settled");

        (
            Winner {
                label,
                index,
                remaining: self.items.len(),
            },
            failure,
        )
    }

    fn rest(&mut self) {
        self.spin = None;
        self.offset = 0.0;
        self.selected_index = None;
        self.phase = Phase::Idle;
    }

    fn can_spin(&self) -> bool {
        self.phase == Phase::Idle && !self.items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn original(&self) -> Option<&[String]> {
        self.original.as_deref()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == Phase::Spinning
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn last_winner(&self) -> Option<&str> {
        self.last_winner.as_deref()
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    pub fn settings(&self) -> SpinSettings {
        self.settings
    }

    /// Index on the centerline right now, if there are items.
    pub fn index_at_centre(&self) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.geometry.index_at_centre(self.items.len(), self.offset))
        }
    }

    /// Winner of the running spin, if any.
    pub fn planned_winner(&self) -> Option<usize> {
        self.spin.as_ref().map(|s| s.plan.winning_index)
    }
}

impl Default for WheelState {
    fn default() -> Self {
        Self::new(WheelGeometry::default(), SpinSettings::default())
    }
}
