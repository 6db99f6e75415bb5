//! The fire pass evaluator.
//!
//! Shapes a tapered, round-tipped flame silhouette out of analytic masks,
//! advects a sample coordinate through the noise volume over time, and maps
//! the sampled density through a blackbody-style color ramp. Everything here
//! is a pure function of (surface point, time, volume, params); no state
//! survives between evaluations.
//!
//! The masks are built exclusively from smooth steps of distances, never
//! from per-side branches, so the silhouette has no seam or dark line at
//! the vertical centerline.

use glam::{Vec2, Vec3};

use crate::composite::ShadedPoint;
use crate::math::{mix, smoothstep};
use crate::ramp::ColorRamp;
use crate::volume::NoiseVolume;

/// Tunables for the fire pass. `Default` reproduces the reference flame.
#[derive(Clone, Debug)]
pub struct FireParams {
    /// Spatial frequency multiplier applied before the noise lookup.
    pub scale: f32,
    /// Depth-axis advection rate in tile units per second.
    pub speed: f32,
    /// Width of the mask's soft transition band.
    pub soft_edge: f32,
    /// Global brightness multiplier. Additive compositing turns this
    /// directly into glow, so it is not bounded by 1.
    pub intensity: f32,
    /// Silhouette half-width at the base.
    pub half_width_bottom: f32,
    /// Silhouette half-width at the tip.
    pub half_width_top: f32,
    /// Exponent on the vertical coordinate in the taper; slightly above 1
    /// makes the narrowing accelerate toward the tip.
    pub taper_exponent: f32,
    /// Radius of the rounding cap.
    pub cap_radius: f32,
    /// Horizontal squash of the cap circle into an ellipse.
    pub cap_aspect: f32,
    /// Vertical position of the cap center, slightly above the quad top.
    pub cap_height: f32,
    /// Spatial frequency of the horizontal wobble.
    pub wobble_frequency: f32,
    /// Temporal frequency of the horizontal wobble.
    pub wobble_speed: f32,
    /// Amplitude of the horizontal wobble.
    pub wobble_amplitude: f32,
    /// Density-to-color ramp.
    pub ramp: ColorRamp,
}

impl Default for FireParams {
    fn default() -> Self {
        Self {
            scale: 3.2,
            speed: 0.75,
            soft_edge: 0.25,
            intensity: 2.0,
            half_width_bottom: 0.46,
            half_width_top: 0.02,
            taper_exponent: 1.15,
            cap_radius: 0.22,
            cap_aspect: 0.55,
            cap_height: 1.04,
            wobble_frequency: 12.0,
            wobble_speed: 7.0,
            wobble_amplitude: 0.01,
            ramp: ColorRamp::fire(),
        }
    }
}

impl FireParams {
    /// Set the noise sampling scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the animation speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the soft-edge width.
    pub fn with_soft_edge(mut self, soft_edge: f32) -> Self {
        self.soft_edge = soft_edge;
        self
    }

    /// Set the glow intensity.
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Replace the color ramp.
    pub fn with_ramp(mut self, ramp: ColorRamp) -> Self {
        self.ramp = ramp;
        self
    }

    /// Silhouette half-width at vertical coordinate `y`.
    ///
    /// Monotonically non-increasing in `y`: the flame narrows toward the
    /// tip and never widens again.
    #[inline]
    pub fn half_width(&self, y: f32) -> f32 {
        mix(
            self.half_width_bottom,
            self.half_width_top,
            y.max(0.0).powf(self.taper_exponent),
        )
    }

    /// Shape mask at `uv`: 1 inside the flame, 0 outside, smooth in the
    /// soft-edge band.
    ///
    /// The tapered-cone term and the rounding-cap term are combined with
    /// `min`, a softened AND, so the silhouette ends in a rounded tip
    /// rather than a point.
    pub fn mask(&self, uv: Vec2) -> f32 {
        let edge = self.soft_edge * 0.55;
        let half_w = self.half_width(uv.y);
        let dx = (uv.x - 0.5).abs();
        let taper = 1.0 - smoothstep(half_w - edge, half_w, dx);

        // Everything outside an ellipse centered above the quad top is kept;
        // the flame is what survives both terms.
        let cap_p = Vec2::new((uv.x - 0.5) / self.cap_aspect, uv.y - self.cap_height);
        let cap = smoothstep(self.cap_radius - edge, self.cap_radius, cap_p.length());

        taper.min(cap).clamp(0.0, 1.0)
    }

    /// Evaluate the fire pass at one surface point.
    ///
    /// `uv` is the billboard coordinate (x across, y base-to-tip), `time`
    /// is seconds since start. The returned color is intensity-scaled and
    /// unbounded; the opacity is in [0, 1].
    pub fn shade(&self, uv: Vec2, time: f32, volume: &NoiseVolume) -> ShadedPoint {
        let mask = self.mask(uv);

        // Flicker: scroll the volume along depth and sway the sample column
        // sideways, more near the tip than the base.
        let wobble = (uv.y * self.wobble_frequency + time * self.wobble_speed).sin()
            * self.wobble_amplitude;
        let p = Vec3::new(
            (uv.x + wobble) * self.scale,
            uv.y * self.scale,
            time * self.speed,
        );
        let density = volume.sample(p);

        // Bias the bottom of the flame toward the hot end of the ramp.
        let base_boost = smoothstep(0.0, 0.28, 1.0 - uv.y);
        let heat = (density * 1.18 + base_boost * 0.32).clamp(0.0, 1.0);

        let color = self.ramp.sample(heat) * (self.intensity * (0.45 + 0.75 * heat));
        let alpha = (mask * (0.28 + 0.72 * heat)).clamp(0.0, 1.0);
        ShadedPoint { color, alpha }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::VolumeParams;

    fn test_volume() -> NoiseVolume {
        NoiseVolume::generate(&VolumeParams::new(16).with_octaves(3))
    }

    #[test]
    fn test_mask_has_no_centerline_seam() {
        let params = FireParams::default();
        for y in [0.0, 0.25, 0.5, 0.75, 0.95] {
            for eps in [1e-4, 1e-3, 1e-2] {
                let left = params.mask(Vec2::new(0.5 - eps, y));
                let right = params.mask(Vec2::new(0.5 + eps, y));
                assert!(
                    (left - right).abs() < 1e-5,
                    "asymmetric mask at y={}, eps={}",
                    y,
                    eps
                );
            }
            // And the centerline itself is the interior, not a gap.
            let center = params.mask(Vec2::new(0.5, y));
            assert!(center >= params.mask(Vec2::new(0.5 + 1e-3, y)) - 1e-5);
        }
    }

    #[test]
    fn test_mask_continuous_across_center() {
        let params = FireParams::default();
        let a = params.mask(Vec2::new(0.5 - 1e-5, 0.3));
        let b = params.mask(Vec2::new(0.5, 0.3));
        let c = params.mask(Vec2::new(0.5 + 1e-5, 0.3));
        assert!((a - b).abs() < 1e-4);
        assert!((c - b).abs() < 1e-4);
    }

    #[test]
    fn test_taper_monotone() {
        let params = FireParams::default();
        let mut prev = params.half_width(0.0);
        for i in 1..=100 {
            let w = params.half_width(i as f32 / 100.0);
            assert!(w <= prev, "flame widened moving upward");
            prev = w;
        }
        assert_eq!(params.half_width(0.0), params.half_width_bottom);
    }

    #[test]
    fn test_cap_contains_flame() {
        // Anything beyond the cap center plus its radius is fully masked.
        let params = FireParams::default();
        let beyond = params.cap_height + params.cap_radius + 0.01;
        for x in [0.3, 0.5, 0.7] {
            assert_eq!(params.mask(Vec2::new(x, beyond)), 0.0);
        }
    }

    #[test]
    fn test_bottom_center_fully_inside() {
        // End-to-end scenario: the base of the flame at its widest.
        let params = FireParams::default();
        let volume = test_volume();
        assert!((params.mask(Vec2::new(0.5, 0.0)) - 1.0).abs() < 1e-6);

        let shaded = params.shade(Vec2::new(0.5, 0.0), 0.0, &volume);
        // Base whitening pushes the color toward the warm end: red-dominant.
        assert!(shaded.color.x > shaded.color.z);
        assert!(shaded.alpha > 0.3);
    }

    #[test]
    fn test_far_above_cap_transparent() {
        // End-to-end scenario: y = 1.3 sits past the rounded tip.
        let params = FireParams::default();
        let volume = test_volume();
        let shaded = params.shade(Vec2::new(0.5, 1.3), 0.0, &volume);
        assert!(shaded.alpha.abs() < 1e-6);
    }

    #[test]
    fn test_alpha_bounded() {
        let params = FireParams::default()
            .with_intensity(50.0)
            .with_soft_edge(2.0);
        let volume = test_volume();
        for i in 0..50 {
            let uv = Vec2::new((i % 10) as f32 / 9.0, (i / 10) as f32 / 4.0);
            let shaded = params.shade(uv, 3.7, &volume);
            assert!((0.0..=1.0).contains(&shaded.alpha));
        }
    }

    #[test]
    fn test_shade_is_pure() {
        let params = FireParams::default();
        let volume = test_volume();
        let uv = Vec2::new(0.45, 0.3);
        let a = params.shade(uv, 2.0, &volume);
        let b = params.shade(uv, 2.0, &volume);
        assert_eq!(a, b);
    }

    #[test]
    fn test_time_animates_output() {
        let params = FireParams::default();
        let volume = test_volume();
        let uv = Vec2::new(0.5, 0.4);
        let a = params.shade(uv, 0.0, &volume);
        let b = params.shade(uv, 1.0, &volume);
        assert_ne!(a.color, b.color);
    }
}
