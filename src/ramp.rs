//! Piecewise-linear color ramps.
//!
//! A [`ColorRamp`] maps a scalar in [0, 1] onto a color by interpolating
//! between ordered control points. The fire ramp approximates a blackbody
//! emission gradient with a two-segment dark-red → orange → pale-yellow
//! curve; the smoke ramp is a plain dark-to-light gray slope indexed by
//! height rather than density.

use glam::Vec3;

/// An ordered sequence of `(threshold, color)` control points with linear
/// interpolation between consecutive points.
///
/// # Example
///
/// ```
/// use glam::Vec3;
/// use hearth::ramp::ColorRamp;
///
/// let ramp = ColorRamp::new(vec![
///     (0.0, Vec3::ZERO),
///     (1.0, Vec3::ONE),
/// ]);
/// assert_eq!(ramp.sample(0.5), Vec3::splat(0.5));
/// ```
#[derive(Clone, Debug)]
pub struct ColorRamp {
    stops: Vec<(f32, Vec3)>,
}

impl ColorRamp {
    /// Build a ramp from control points.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two stops are given, if any threshold lies
    /// outside [0, 1], or if thresholds are not strictly increasing.
    pub fn new(stops: Vec<(f32, Vec3)>) -> Self {
        assert!(stops.len() >= 2, "a color ramp needs at least two stops");
        for pair in stops.windows(2) {
            assert!(
                pair[0].0 < pair[1].0,
                "ramp thresholds must be strictly increasing"
            );
        }
        assert!(
            stops.first().unwrap().0 >= 0.0 && stops.last().unwrap().0 <= 1.0,
            "ramp thresholds must lie in [0, 1]"
        );
        Self { stops }
    }

    /// The reference fire ramp: near-black red through orange to pale
    /// yellow, with the orange knee at 0.45.
    pub fn fire() -> Self {
        Self::new(vec![
            (0.0, Vec3::new(0.08, 0.0, 0.0)),
            (0.45, Vec3::new(1.0, 0.32, 0.04)),
            (1.0, Vec3::new(1.0, 0.92, 0.45)),
        ])
    }

    /// The reference smoke ramp: dark gray at the base to light gray at the
    /// top of the column.
    pub fn smoke() -> Self {
        Self::new(vec![(0.0, Vec3::splat(0.2)), (1.0, Vec3::splat(0.55))])
    }

    /// Sample the ramp at `t`, clamped to [0, 1].
    ///
    /// Values below the first stop return the first color; values above the
    /// last stop return the last color.
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let (first_t, first_c) = self.stops[0];
        if t <= first_t {
            return first_c;
        }
        for pair in self.stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                return c0.lerp(c1, (t - t0) / (t1 - t0));
            }
        }
        self.stops.last().unwrap().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_hits_stops() {
        let ramp = ColorRamp::fire();
        assert_eq!(ramp.sample(0.0), Vec3::new(0.08, 0.0, 0.0));
        assert_eq!(ramp.sample(0.45), Vec3::new(1.0, 0.32, 0.04));
        assert_eq!(ramp.sample(1.0), Vec3::new(1.0, 0.92, 0.45));
    }

    #[test]
    fn test_sample_interpolates() {
        let ramp = ColorRamp::new(vec![(0.0, Vec3::ZERO), (1.0, Vec3::new(1.0, 0.5, 0.0))]);
        let mid = ramp.sample(0.5);
        assert!((mid.x - 0.5).abs() < 1e-6);
        assert!((mid.y - 0.25).abs() < 1e-6);
        assert_eq!(mid.z, 0.0);
    }

    #[test]
    fn test_sample_clamps_input() {
        let ramp = ColorRamp::smoke();
        assert_eq!(ramp.sample(-3.0), ramp.sample(0.0));
        assert_eq!(ramp.sample(42.0), ramp.sample(1.0));
    }

    #[test]
    fn test_fire_ramp_warms_upward() {
        // Red saturates early; green keeps climbing past the knee.
        let ramp = ColorRamp::fire();
        let low = ramp.sample(0.2);
        let high = ramp.sample(0.8);
        assert!(high.y > low.y);
        assert!(low.x < 1.0);
    }

    #[test]
    #[should_panic(expected = "at least two stops")]
    fn test_rejects_single_stop() {
        ColorRamp::new(vec![(0.0, Vec3::ZERO)]);
    }

    #[test]
    #[should_panic(expected = "strictly increasing")]
    fn test_rejects_unsorted_stops() {
        ColorRamp::new(vec![(0.5, Vec3::ZERO), (0.5, Vec3::ONE)]);
    }
}
