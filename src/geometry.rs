/// Canvas height the default layout is expressed in.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 500.0;

/// Share of the canvas occupied by one full cycle of segments.
const WHEEL_EXTENT_RATIO: f64 = 0.8;

/// Non-negative remainder of `value / modulus`, for any sign of `value`.
pub fn wrap(value: f64, modulus: f64) -> f64 {
    ((value % modulus) + modulus) % modulus
}

/// Layout of the vertical wheel: where the stripes begin and how much space one
/// full cycle of stripes spans. Positive offsets move stripes downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    base_start: f64,
    extent: f64,
}

impl WheelGeometry {
    pub fn new(base_start: f64, extent: f64) -> Self {
        debug_assert!(extent > 0.0, "wheel extent must be positive");
        Self { base_start, extent }
    }

    /// Wheel centred on a canvas, taking up 80% of its height.
    pub fn from_canvas_height(height: f64) -> Self {
        let extent = height * WHEEL_EXTENT_RATIO;
        Self::new((height - extent) / 2.0, extent)
    }

    pub fn base_start(&self) -> f64 {
        self.base_start
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// The fixed reference position the selected stripe is read at.
    pub fn centre(&self) -> f64 {
        self.base_start + self.extent / 2.0
    }

    pub fn segment_extent(&self, item_count: usize) -> f64 {
        self.extent / guard_count(item_count) as f64
    }

    /// Top edge of stripe `index` once the wheel has been displaced by `offset`.
    pub fn segment_start(&self, item_count: usize, index: usize, offset: f64) -> f64 {
        let seg = self.segment_extent(item_count);
        self.base_start + wrap(index as f64 * seg + offset, self.extent)
    }

    pub fn segment_centre(&self, item_count: usize, index: usize, offset: f64) -> f64 {
        let seg = self.segment_extent(item_count);
        self.base_start + wrap(index as f64 * seg + seg / 2.0 + offset, self.extent)
    }

    /// Index of the stripe covering `position` at the given offset.
    ///
    /// Valid for offsets of any sign and magnitude; the result is always in
    /// `0..item_count`.
    pub fn index_at(&self, item_count: usize, offset: f64, position: f64) -> usize {
        let count = guard_count(item_count);
        let seg = self.segment_extent(count);
        let relative = wrap(position - self.base_start - offset, self.extent);
        // `relative / seg` can round up to `count` right at the wrap point.
        ((relative / seg).floor() as usize) % count
    }

    /// Index of the stripe sitting on the centerline.
    pub fn index_at_centre(&self, item_count: usize, offset: f64) -> usize {
        self.index_at(item_count, offset, self.centre())
    }

    /// Brings an offset back into `[0, extent)`.
    pub fn normalize(&self, offset: f64) -> f64 {
        wrap(offset, self.extent)
    }
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self::from_canvas_height(DEFAULT_CANVAS_HEIGHT)
    }
}

fn guard_count(item_count: usize) -> usize {
    debug_assert!(item_count > 0, "geometry queried for an empty wheel");
    item_count.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_handles_negative_values() {
        assert_eq!(wrap(-10.0, 400.0), 390.0);
        assert_eq!(wrap(-400.0, 400.0), 0.0);
        assert_eq!(wrap(-1210.0, 400.0), 390.0);
    }

    #[test]
    fn test_wrap_handles_multiple_rotations() {
        assert_eq!(wrap(1250.0, 400.0), 50.0);
        assert_eq!(wrap(400.0, 400.0), 0.0);
        assert_eq!(wrap(0.0, 400.0), 0.0);
    }

    #[test]
    fn test_default_layout() {
        let g = WheelGeometry::default();
        assert_eq!(g.base_start(), 50.0);
        assert_eq!(g.extent(), 400.0);
        assert_eq!(g.centre(), 250.0);
    }

    #[test]
    fn test_segment_start_without_offset() {
        let g = WheelGeometry::default();
        assert_eq!(g.segment_extent(4), 100.0);
        assert_eq!(g.segment_start(4, 0, 0.0), 50.0);
        assert_eq!(g.segment_start(4, 3, 0.0), 350.0);
    }

    #[test]
    fn test_segment_start_wraps_past_bottom() {
        let g = WheelGeometry::default();
        // Stripe 3 pushed down by 150 wraps to the top of the wheel.
        assert_eq!(g.segment_start(4, 3, 150.0), 100.0);
        assert_eq!(g.segment_start(4, 0, -50.0), 400.0);
    }

    #[test]
    fn test_index_at_centre_at_rest() {
        let g = WheelGeometry::default();
        // Centre is 200 units into the wheel: third stripe of four.
        assert_eq!(g.index_at_centre(4, 0.0), 2);
        assert_eq!(g.index_at_centre(1, 0.0), 0);
        assert_eq!(g.index_at_centre(3, 0.0), 1);
    }

    #[test]
    fn test_index_at_centre_follows_offset_direction() {
        let g = WheelGeometry::default();
        // Moving stripes down by one stripe brings the previous one to the centre.
        assert_eq!(g.index_at_centre(4, 100.0), 1);
        assert_eq!(g.index_at_centre(4, -100.0), 3);
    }

    #[test]
    fn test_index_at_centre_in_range_for_any_offset() {
        let g = WheelGeometry::default();
        for count in 1..=12 {
            let mut offset = -5000.0;
            while offset < 5000.0 {
                let idx = g.index_at_centre(count, offset);
                assert!(idx < count, "index {idx} out of range for {count} items");
                offset += 7.3;
            }
        }
    }

    #[test]
    fn test_index_at_is_periodic_in_extent() {
        let g = WheelGeometry::default();
        for offset in [-730.0, -12.5, 0.0, 33.0, 399.9] {
            let base = g.index_at_centre(7, offset);
            assert_eq!(g.index_at_centre(7, offset + 3.0 * g.extent()), base);
            assert_eq!(g.index_at_centre(7, offset - 2.0 * g.extent()), base);
        }
    }

    #[test]
    fn test_segment_centre_is_read_back_by_index_at() {
        let g = WheelGeometry::default();
        for offset in [-321.0, 0.0, 87.5, 1234.0] {
            for i in 0..5 {
                let centre = g.segment_centre(5, i, offset);
                assert_eq!(g.index_at(5, offset, centre), i);
            }
        }
    }

    #[test]
    fn test_normalize() {
        let g = WheelGeometry::default();
        assert_eq!(g.normalize(1250.0), 50.0);
        assert_eq!(g.normalize(-50.0), 350.0);
    }
}
