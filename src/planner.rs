use crate::geometry::{wrap, WheelGeometry};

/// Full rotations swept before the wheel settles.
pub const DEFAULT_ROTATIONS: u32 = 3;

/// Start and end of one spin's trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub winning_index: usize,
    /// Where the animation begins, normalized into `[0, extent)`.
    pub start_offset: f64,
    /// Offset within one extent that puts the winner on the centerline.
    pub final_offset: f64,
    /// `final_offset` plus the extra rotations; the animation ends here.
    pub target_offset: f64,
}

impl SpinPlan {
    pub fn distance(&self) -> f64 {
        self.target_offset - self.start_offset
    }
}

/// Plans a spin from `current_offset` that stops with `winning_index` centred.
///
/// The wheel always moves towards positive offsets. Because the start is
/// normalized first and at least one rotation is added, the distance is
/// strictly positive.
pub fn plan(
    geometry: &WheelGeometry,
    current_offset: f64,
    item_count: usize,
    winning_index: usize,
    rotations: u32,
) -> SpinPlan {
    debug_assert!(winning_index < item_count.max(1));
    let seg = geometry.segment_extent(item_count);
    let centre_from_start = geometry.centre() - geometry.base_start();
    let final_offset = wrap(
        centre_from_start - (winning_index as f64 + 0.5) * seg,
        geometry.extent(),
    );

    SpinPlan {
        winning_index,
        start_offset: geometry.normalize(current_offset),
        final_offset,
        target_offset: final_offset + f64::from(rotations.max(1)) * geometry.extent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_offset_lands_on_winner() {
        let g = WheelGeometry::default();
        for count in 1..=40 {
            for winner in 0..count {
                let p = plan(&g, 0.0, count, winner, DEFAULT_ROTATIONS);
                assert_eq!(
                    g.index_at_centre(count, p.final_offset),
                    winner,
                    "count={count} winner={winner}"
                );
                assert!(p.final_offset >= 0.0 && p.final_offset < g.extent());
            }
        }
    }

    #[test]
    fn test_target_offset_lands_on_winner() {
        let g = WheelGeometry::default();
        for count in [1, 2, 3, 7, 13] {
            for winner in 0..count {
                let p = plan(&g, 0.0, count, winner, DEFAULT_ROTATIONS);
                assert_eq!(g.index_at_centre(count, p.target_offset), winner);
            }
        }
    }

    #[test]
    fn test_target_adds_full_rotations() {
        let g = WheelGeometry::default();
        let p = plan(&g, 0.0, 4, 1, 3);
        assert_eq!(p.target_offset, p.final_offset + 3.0 * g.extent());
        assert!(p.distance() >= 3.0 * g.extent());
    }

    #[test]
    fn test_zero_rotations_is_clamped_to_one() {
        let g = WheelGeometry::default();
        let p = plan(&g, 0.0, 4, 1, 0);
        assert_eq!(p.target_offset, p.final_offset + g.extent());
    }

    #[test]
    fn test_distance_positive_from_any_start() {
        let g = WheelGeometry::default();
        for start in [-900.0, -1.0, 0.0, 123.4, 399.0, 2000.0] {
            let p = plan(&g, start, 6, 5, 1);
            assert!(p.distance() > 0.0, "start={start}");
            assert!(p.start_offset >= 0.0 && p.start_offset < g.extent());
        }
    }

    #[test]
    fn test_four_items_known_offsets() {
        let g = WheelGeometry::default();
        // Centre is 200 into the wheel, stripes are 100 tall.
        assert_eq!(plan(&g, 0.0, 4, 2, 1).final_offset, 350.0);
        assert_eq!(plan(&g, 0.0, 4, 1, 1).final_offset, 50.0);
        assert_eq!(plan(&g, 0.0, 4, 0, 1).final_offset, 150.0);
    }
}
