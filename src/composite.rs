//! Blend modes and the CPU compositor.
//!
//! The two evaluator passes meet the frame buffer here. Fire is composited
//! additively (order-independent glow), smoke with standard alpha blending.
//! The pass order is a correctness contract, not a preference: smoke must be
//! drawn after fire so the translucent column partially obscures the flame
//! already in the buffer. The wgpu renderer encodes the same order; this
//! module is the reference implementation and powers offline snapshots.

use glam::{Vec2, Vec3};
use image::RgbaImage;

use crate::fire::FireParams;
use crate::smoke::SmokeParams;
use crate::volume::NoiseVolume;

/// Evaluator output for one surface point: linear RGB plus opacity.
///
/// Fire colors may exceed 1.0 (additive compositing turns magnitude into
/// glow); smoke colors stay in [0, 1]. Opacity is always in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadedPoint {
    pub color: Vec3,
    pub alpha: f32,
}

impl ShadedPoint {
    /// A fully transparent point.
    pub const TRANSPARENT: Self = Self {
        color: Vec3::ZERO,
        alpha: 0.0,
    };
}

/// How a pass combines with the colors already in the frame buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// `dst + src.color * src.alpha` — emissive glow, order-independent.
    Additive,
    /// `src.color * src.alpha + dst * (1 - src.alpha)` — classic "over",
    /// order-dependent.
    Alpha,
}

impl BlendMode {
    /// Composite `src` onto `dst`.
    #[inline]
    pub fn blend(self, dst: Vec3, src: ShadedPoint) -> Vec3 {
        let a = src.alpha.clamp(0.0, 1.0);
        match self {
            BlendMode::Additive => dst + src.color * a,
            BlendMode::Alpha => src.color * a + dst * (1.0 - a),
        }
    }
}

/// Placement of a billboard quad on screen, in the NDC-ish units of the
/// reference demo: the quad is bottom-anchored at `offset`, `height` spans
/// half the screen per unit, and `width` is divided by the aspect ratio so
/// billboards keep their proportions on any window.
#[derive(Clone, Copy, Debug)]
pub struct Billboard {
    pub width: f32,
    pub height: f32,
    pub offset: Vec2,
}

impl Billboard {
    /// Placement of the flame quad in the reference demo.
    pub fn fire() -> Self {
        Self {
            width: 0.52,
            height: 0.55,
            offset: Vec2::new(0.0, 0.05),
        }
    }

    /// Placement of the smoke quad in the reference demo.
    pub fn smoke() -> Self {
        Self {
            width: 0.9,
            height: 1.8,
            offset: Vec2::new(0.0, 0.05),
        }
    }

    /// Map an NDC position to this billboard's surface coordinate.
    ///
    /// Returns `None` when the point falls outside the quad. The result has
    /// x across the billboard and y from base (0) to tip (1).
    pub fn uv(&self, ndc: Vec2, aspect: f32) -> Option<Vec2> {
        let u = (ndc.x - self.offset.x) * aspect / self.width + 0.5;
        let v = ((ndc.y + 1.0) * 0.5 - self.offset.y) / self.height;
        if (0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v) {
            Some(Vec2::new(u, v))
        } else {
            None
        }
    }
}

/// CPU frame compositor: evaluates both passes per pixel and writes an
/// RGBA image, fire first (additive), smoke second (alpha).
///
/// # Example
///
/// ```no_run
/// use hearth::composite::Compositor;
/// use hearth::volume::{NoiseVolume, VolumeParams};
///
/// let volume = NoiseVolume::generate(&VolumeParams::new(32));
/// let frame = Compositor::new(180, 240).render(&volume, 1.5);
/// frame.save("flame.png").unwrap();
/// ```
pub struct Compositor {
    width: u32,
    height: u32,
    background: Vec3,
    fire: FireParams,
    fire_board: Billboard,
    smoke: SmokeParams,
    smoke_board: Billboard,
}

impl Compositor {
    /// Create a compositor for a `width` x `height` frame with the
    /// reference parameters and placement.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "frame dimensions must be positive");
        Self {
            width,
            height,
            background: Vec3::new(0.02, 0.02, 0.03),
            fire: FireParams::default(),
            fire_board: Billboard::fire(),
            smoke: SmokeParams::default(),
            smoke_board: Billboard::smoke(),
        }
    }

    /// Replace the fire pass parameters.
    pub fn with_fire(mut self, params: FireParams) -> Self {
        self.fire = params;
        self
    }

    /// Replace the smoke pass parameters.
    pub fn with_smoke(mut self, params: SmokeParams) -> Self {
        self.smoke = params;
        self
    }

    /// Set the background clear color.
    pub fn with_background(mut self, color: Vec3) -> Self {
        self.background = color;
        self
    }

    /// Render one frame at `time` seconds.
    ///
    /// Every pixel is independent; the only ordering requirement is that
    /// the fire contribution lands in the accumulator before the smoke
    /// contribution.
    pub fn render(&self, volume: &NoiseVolume, time: f32) -> RgbaImage {
        let aspect = self.width as f32 / self.height as f32;
        let mut frame = RgbaImage::new(self.width, self.height);

        for (px, py, pixel) in frame.enumerate_pixels_mut() {
            let sx = (px as f32 + 0.5) / self.width as f32;
            let sy = 1.0 - (py as f32 + 0.5) / self.height as f32;
            let ndc = Vec2::new(sx * 2.0 - 1.0, sy * 2.0 - 1.0);

            let mut color = self.background;
            if let Some(uv) = self.fire_board.uv(ndc, aspect) {
                color = BlendMode::Additive.blend(color, self.fire.shade(uv, time, volume));
            }
            if let Some(uv) = self.smoke_board.uv(ndc, aspect) {
                color = BlendMode::Alpha.blend(color, self.smoke.shade(uv, time, volume));
            }

            let clamped = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
            *pixel = image::Rgba([
                clamped.x.round() as u8,
                clamped.y.round() as u8,
                clamped.z.round() as u8,
                255,
            ]);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::VolumeParams;

    #[test]
    fn test_additive_blend() {
        let src = ShadedPoint {
            color: Vec3::new(1.0, 0.5, 0.0),
            alpha: 0.5,
        };
        let out = BlendMode::Additive.blend(Vec3::splat(0.1), src);
        assert!((out.x - 0.6).abs() < 1e-6);
        assert!((out.y - 0.35).abs() < 1e-6);
        assert!((out.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_blend() {
        let src = ShadedPoint {
            color: Vec3::ONE,
            alpha: 0.25,
        };
        let out = BlendMode::Alpha.blend(Vec3::ZERO, src);
        assert!((out.x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_transparent_source_is_identity() {
        let dst = Vec3::new(0.3, 0.2, 0.1);
        assert_eq!(BlendMode::Additive.blend(dst, ShadedPoint::TRANSPARENT), dst);
        assert_eq!(BlendMode::Alpha.blend(dst, ShadedPoint::TRANSPARENT), dst);
    }

    #[test]
    fn test_blend_clamps_alpha() {
        let src = ShadedPoint {
            color: Vec3::ONE,
            alpha: 4.0,
        };
        let out = BlendMode::Alpha.blend(Vec3::splat(0.5), src);
        assert_eq!(out, Vec3::ONE);
    }

    #[test]
    fn test_pass_order_matters() {
        // Additive fire then smoke-over differs from the reverse whenever
        // both passes cover a point: alpha blending attenuates what is
        // already in the buffer.
        let fire = ShadedPoint {
            color: Vec3::new(2.0, 0.6, 0.1),
            alpha: 0.8,
        };
        let smoke = ShadedPoint {
            color: Vec3::splat(0.3),
            alpha: 0.5,
        };
        let bg = Vec3::splat(0.02);

        let correct = BlendMode::Alpha.blend(BlendMode::Additive.blend(bg, fire), smoke);
        let reversed = BlendMode::Additive.blend(BlendMode::Alpha.blend(bg, smoke), fire);
        assert!((correct - reversed).length() > 0.1);
    }

    #[test]
    fn test_billboard_uv_mapping() {
        let board = Billboard::fire();
        // Bottom center of the quad.
        let uv = board.uv(Vec2::new(0.0, -0.9), 1.0).unwrap();
        assert!((uv.x - 0.5).abs() < 1e-6);
        assert!(uv.y < 0.1);
        // Far outside.
        assert!(board.uv(Vec2::new(0.9, 0.9), 1.0).is_none());
    }

    #[test]
    fn test_render_frame() {
        let volume = NoiseVolume::generate(&VolumeParams::new(16).with_octaves(3));
        let frame = Compositor::new(48, 64).render(&volume, 1.0);
        assert_eq!(frame.dimensions(), (48, 64));

        // Top corners lie outside both billboards and keep the background.
        let bg = *frame.get_pixel(0, 0);
        assert_eq!(bg, *frame.get_pixel(47, 0));
        assert_eq!(bg.0[0], 5); // 0.02 * 255, rounded

        // A pixel near the flame base should be warm: red over blue.
        let base = *frame.get_pixel(24, 60);
        assert!(base.0[0] >= base.0[2]);
    }
}
