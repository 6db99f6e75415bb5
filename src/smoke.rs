//! The smoke pass evaluator.
//!
//! A wavy, semi-transparent column: two sinusoids of different spatial
//! frequency and phase speed displace the centerline, a seam-free smooth
//! step masks the column width, and the sampled noise density thins and
//! lightens with height. Composited with alpha blending, after the fire
//! pass (see [`crate::composite`] for the ordering contract).

use glam::{Vec2, Vec3};

use crate::composite::ShadedPoint;
use crate::math::smoothstep;
use crate::ramp::ColorRamp;
use crate::volume::NoiseVolume;

/// Tunables for the smoke pass. `Default` reproduces the reference column.
#[derive(Clone, Debug)]
pub struct SmokeParams {
    /// Spatial frequency multiplier applied before the noise lookup.
    pub scale: f32,
    /// Depth-axis advection rate in tile units per second. Slower than the
    /// fire pass for a lazier roil.
    pub speed: f32,
    /// Width of the mask's soft transition band.
    pub soft_edge: f32,
    /// Global alpha multiplier in [0, 1].
    pub opacity: f32,
    /// Column half-width around the waving centerline.
    pub half_width: f32,
    /// Primary wave: spatial frequency, phase speed, amplitude.
    pub wave_primary: (f32, f32, f32),
    /// Secondary wave: spatial frequency, phase speed, amplitude.
    pub wave_secondary: (f32, f32, f32),
    /// Height-to-color ramp (dark at the base, light at the top).
    pub ramp: ColorRamp,
}

impl Default for SmokeParams {
    fn default() -> Self {
        Self {
            scale: 2.2,
            speed: 0.18,
            soft_edge: 0.35,
            opacity: 0.55,
            half_width: 0.35,
            wave_primary: (8.0, 0.8, 0.1),
            wave_secondary: (3.5, 0.4, 0.05),
            ramp: ColorRamp::smoke(),
        }
    }
}

impl SmokeParams {
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

    /// Set the global opacity multiplier (clamped to [0, 1]).
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Replace the color ramp.
    pub fn with_ramp(mut self, ramp: ColorRamp) -> Self {
        self.ramp = ramp;
        self
    }

    /// Horizontal displacement of the column centerline at height `y` and
    /// `time` seconds: the sum of the two sinusoids.
    #[inline]
    pub fn wave(&self, y: f32, time: f32) -> f32 {
        let (f1, s1, a1) = self.wave_primary;
        let (f2, s2, a2) = self.wave_secondary;
        (y * f1 + time * s1).sin() * a1 + (y * f2 + time * s2).sin() * a2
    }

    /// Column mask at `uv`: smooth step of distance from the waving
    /// centerline, identical seam-free construction to the fire mask.
    pub fn mask(&self, uv: Vec2, time: f32) -> f32 {
        let edge = self.soft_edge * 0.8;
        let dx = (uv.x - 0.5 - self.wave(uv.y, time)).abs();
        (1.0 - smoothstep(self.half_width - edge, self.half_width, dx)).clamp(0.0, 1.0)
    }

    /// Smoke density from a raw noise value at height `y`.
    ///
    /// Shifts and scales the noise, then adds a base thickening that fades
    /// out with height: denser near the flame, thinner toward the top.
    #[inline]
    pub fn density(&self, noise: f32, y: f32) -> f32 {
        let fade_up = smoothstep(0.0, 1.0, y);
        (noise * 1.2 - 0.25 + (1.0 - fade_up) * 0.15).clamp(0.0, 1.0)
    }

    /// Evaluate the smoke pass at one surface point.
    ///
    /// Color stays in [0, 1] (alpha compositing); opacity is
    /// `mask * density * opacity`, in [0, 1].
    pub fn shade(&self, uv: Vec2, time: f32, volume: &NoiseVolume) -> ShadedPoint {
        let wave = self.wave(uv.y, time);
        let mask = self.mask(uv, time);

        let p = Vec3::new(
            uv.x * self.scale + wave,
            uv.y * self.scale,
            time * self.speed,
        );
        let density = self.density(volume.sample(p), uv.y);

        let fade_up = smoothstep(0.0, 1.0, uv.y);
        let color: Vec3 = self.ramp.sample(fade_up) * density;
        let alpha = (mask * density * self.opacity).clamp(0.0, 1.0);
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
    fn test_mask_seam_free_about_centerline() {
        // Symmetric about the *waving* centerline, continuous through it.
        let params = SmokeParams::default();
        let time = 2.3;
        for y in [0.1, 0.5, 0.9] {
            let center = 0.5 + params.wave(y, time);
            for eps in [1e-4, 1e-2] {
                let left = params.mask(Vec2::new(center - eps, y), time);
                let right = params.mask(Vec2::new(center + eps, y), time);
                assert!((left - right).abs() < 1e-5);
            }
            assert!((params.mask(Vec2::new(center, y), time) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_density_fades_with_height() {
        // End-to-end scenario: holding the noise value fixed, smoke near
        // the top is never denser than smoke near the base.
        let params = SmokeParams::default();
        for noise in [0.0, 0.3, 0.5, 0.8, 1.0] {
            assert!(params.density(noise, 0.9) <= params.density(noise, 0.1));
        }
    }

    #[test]
    fn test_density_bounded() {
        let params = SmokeParams::default();
        for i in 0..=20 {
            let n = i as f32 / 20.0;
            for y in [0.0, 0.5, 1.0] {
                let d = params.density(n, y);
                assert!((0.0..=1.0).contains(&d));
            }
        }
    }

    #[test]
    fn test_alpha_bounded_at_extremes() {
        let volume = test_volume();
        let params = SmokeParams::default()
            .with_opacity(1.0)
            .with_soft_edge(3.0);
        for i in 0..60 {
            let uv = Vec2::new((i % 10) as f32 / 9.0, (i / 10) as f32 / 5.0);
            let shaded = params.shade(uv, 5.1, &volume);
            assert!((0.0..=1.0).contains(&shaded.alpha));
            assert!(shaded.color.max_element() <= 1.0);
            assert!(shaded.color.min_element() >= 0.0);
        }
    }

    #[test]
    fn test_column_lightens_with_height() {
        let params = SmokeParams::default();
        let low = params.ramp.sample(smoothstep(0.0, 1.0, 0.1));
        let high = params.ramp.sample(smoothstep(0.0, 1.0, 0.9));
        assert!(high.x > low.x);
    }

    #[test]
    fn test_wave_displaces_centerline() {
        let params = SmokeParams::default();
        let a = params.wave(0.2, 0.0);
        let b = params.wave(0.2, 2.0);
        assert_ne!(a, b);
        // Bounded by the summed amplitudes.
        let (_, _, a1) = params.wave_primary;
        let (_, _, a2) = params.wave_secondary;
        for i in 0..100 {
            let w = params.wave(i as f32 * 0.01, i as f32 * 0.13);
            assert!(w.abs() <= a1 + a2 + 1e-6);
        }
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let volume = test_volume();
        let uv = Vec2::new(0.5, 0.2);
        let dense = SmokeParams::default().with_opacity(1.0);
        let faint = SmokeParams::default().with_opacity(0.25);
        let a = dense.shade(uv, 1.0, &volume).alpha;
        let b = faint.shade(uv, 1.0, &volume).alpha;
        assert!((b - a * 0.25).abs() < 1e-6);
    }
}
