use std::time::Duration;

use crate::{geometry::WheelGeometry, planner::SpinPlan};

/// Default wall-clock length of one spin.
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(4000);

/// Cubic ease-out: fast start, gentle stop. `progress` is clamped to `[0, 1]`.
pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Result of advancing the animation to a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    pub offset: f64,
    pub progress: f64,
    /// Stripe on the centerline at `offset`.
    pub index: usize,
    /// True when `index` differs from the previous frame's index.
    pub crossed: bool,
    pub complete: bool,
}

/// Interpolates one spin from its start offset to its target offset.
///
/// The animation owns no clock: the host passes the time elapsed since the
/// spin started, once per frame. A boundary crossing is reported only when
/// the centred index changes, so a slow frame that skips several stripes still
/// produces a single crossing and an idle frame produces none.
#[derive(Debug, Clone)]
pub struct SpinAnimation {
    geometry: WheelGeometry,
    item_count: usize,
    start_offset: f64,
    distance: f64,
    duration: Duration,
    last_index: usize,
    ticks: u64,
    finished: bool,
}

impl SpinAnimation {
    pub fn new(
        geometry: WheelGeometry,
        item_count: usize,
        plan: &SpinPlan,
        duration: Duration,
    ) -> Self {
        Self {
            geometry,
            item_count,
            start_offset: plan.start_offset,
            distance: plan.distance(),
            duration,
            last_index: geometry.index_at_centre(item_count, plan.start_offset),
            ticks: 0,
            finished: false,
        }
    }

    pub fn progress_at(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn offset_at(&self, elapsed: Duration) -> f64 {
        self.start_offset + self.distance * ease_out_cubic(self.progress_at(elapsed))
    }

    /// Advances to `elapsed` since the spin started.
    pub fn step(&mut self, elapsed: Duration) -> FrameStep {
        let progress = self.progress_at(elapsed);
        let offset = self.offset_at(elapsed);
        let index = self.geometry.index_at_centre(self.item_count, offset);

        let crossed = index != self.last_index;
        if crossed {
            self.last_index = index;
            self.ticks += 1;
        }
        self.finished = progress >= 1.0;

        FrameStep {
            offset,
            progress,
            index,
            crossed,
            complete: self.finished,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of crossings reported so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::plan;

    fn animation(count: usize, winner: usize, duration_ms: u64) -> SpinAnimation {
        let g = WheelGeometry::default();
        let p = plan(&g, 0.0, count, winner, 3);
        SpinAnimation::new(g, count, &p, Duration::from_millis(duration_ms))
    }

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
    }

    #[test]
    fn test_ease_out_cubic_clamps() {
        assert_eq!(ease_out_cubic(-3.0), 0.0);
        assert_eq!(ease_out_cubic(7.0), 1.0);
    }

    #[test]
    fn test_ease_out_cubic_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_out_cubic(f64::from(i) / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_first_frame_does_not_tick() {
        let mut anim = animation(5, 2, 4000);
        let step = anim.step(Duration::ZERO);
        assert!(!step.crossed);
        assert!(!step.complete);
        assert_eq!(anim.ticks(), 0);
    }

    #[test]
    fn test_repeated_frame_at_same_time_does_not_tick() {
        let mut anim = animation(5, 2, 4000);
        anim.step(Duration::from_millis(100));
        let before = anim.ticks();
        let again = anim.step(Duration::from_millis(100));
        assert!(!again.crossed);
        assert_eq!(anim.ticks(), before);
    }

    #[test]
    fn test_completes_on_target_with_winner_centred() {
        let mut anim = animation(6, 4, 4000);
        let step = anim.step(Duration::from_millis(4000));
        assert!(step.complete);
        assert_eq!(step.progress, 1.0);
        assert_eq!(step.index, 4);
        assert!(anim.is_finished());
    }

    #[test]
    fn test_overshooting_elapsed_is_clamped() {
        let mut anim = animation(6, 4, 4000);
        let a = anim.step(Duration::from_millis(9000));
        assert!(a.complete);
        assert_eq!(a.offset, anim.offset_at(Duration::from_millis(4000)));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut anim = animation(3, 0, 0);
        let step = anim.step(Duration::ZERO);
        assert!(step.complete);
        assert_eq!(step.index, 0);
    }

    #[test]
    fn test_single_item_never_ticks() {
        let mut anim = animation(1, 0, 1000);
        for ms in (0..=1000).step_by(16) {
            anim.step(Duration::from_millis(ms));
        }
        anim.step(Duration::from_millis(1000));
        assert_eq!(anim.ticks(), 0);
    }

    #[test]
    fn test_ticks_match_index_changes_at_any_frame_rate() {
        let g = WheelGeometry::default();
        for frame_ms in [1u64, 7, 16, 33, 250, 1500] {
            let mut anim = animation(8, 3, 4000);
            let mut prev = g.index_at_centre(8, anim.start_offset());
            let mut expected = 0;
            let mut elapsed = 0;
            loop {
                let step = anim.step(Duration::from_millis(elapsed));
                if step.index != prev {
                    expected += 1;
                    prev = step.index;
                }
                if step.complete {
                    break;
                }
                elapsed += frame_ms;
            }
            assert_eq!(anim.ticks(), expected, "frame_ms={frame_ms}");
        }
    }

    #[test]
    fn test_dense_frames_tick_once_per_boundary() {
        // Stripe 4 starts centred; one step reaches stripe 3, then three full
        // rotations of eight stripes follow.
        let mut anim = animation(8, 3, 4000);
        for ms in 0..=4000 {
            anim.step(Duration::from_millis(ms));
        }
        assert_eq!(anim.ticks(), 1 + 3 * 8);
    }
}
