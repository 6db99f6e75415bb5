//! Precomputed fractal noise volumes.
//!
//! A [`NoiseVolume`] is a cubic lattice of 8-bit density values generated
//! once at startup by summing octaves of [`Perlin3`](crate::noise::Perlin3)
//! gradient noise (fBm). After generation the volume is immutable; both the
//! CPU evaluators and the GPU renderer treat it as a continuous, trilinearly
//! interpolated field that tiles periodically in all three axes.
//!
//! # Example
//!
//! ```
//! use hearth::volume::{NoiseVolume, VolumeParams};
//!
//! let volume = NoiseVolume::generate(&VolumeParams::new(32).with_seed(7));
//! let d = volume.sample(glam::Vec3::new(0.4, 0.9, 1.7));
//! assert!((0.0..=1.0).contains(&d));
//! ```

use glam::Vec3;

use crate::math::mix;
use crate::noise::Perlin3;

/// Parameters for fractal volume generation.
///
/// Identical parameters always reproduce a byte-identical volume. The
/// defaults match the reference fire effect; see [`VolumeParams::new`].
#[derive(Clone, Debug)]
pub struct VolumeParams {
    /// Lattice dimension per axis (the volume has `size³` cells).
    pub size: u32,
    /// Seed for the permutation-table shuffle.
    pub seed: u32,
    /// Number of noise octaves to sum.
    pub octaves: u32,
    /// Per-octave frequency multiplier. Must exceed 1.
    pub lacunarity: f32,
    /// Per-octave amplitude multiplier. Must lie in (0, 1).
    pub gain: f32,
    /// Frequency scale of the first octave; 8.0 gives the first octave
    /// several full noise periods across the volume.
    pub base_frequency: f32,
    /// Divisor applied to the fractal sum before mapping into [0, 1].
    ///
    /// Empirically tuned for the default octave/gain/lacunarity combination.
    /// When changing those, re-tune this (or derive it from the geometric
    /// amplitude series) to avoid clipping or a washed-out field.
    pub normalization: f32,
}

impl VolumeParams {
    /// Create parameters with the reference defaults:
    /// seed 42, 5 octaves, lacunarity 2.01, gain 0.52, base frequency 8.0,
    /// normalization 1.5.
    ///
    /// # Panics
    ///
    /// Panics if `size` is less than 2 or greater than 256. A misconfigured
    /// dimension is a programming error, not a runtime condition.
    pub fn new(size: u32) -> Self {
        assert!(size >= 2, "volume size must be at least 2");
        assert!(size <= 256, "volume size must be at most 256");
        Self {
            size,
            seed: 42,
            octaves: 5,
            lacunarity: 2.01,
            gain: 0.52,
            base_frequency: 8.0,
            normalization: 1.5,
        }
    }

    /// Set the generation seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Set the octave count.
    ///
    /// # Panics
    ///
    /// Panics if `octaves` is zero.
    pub fn with_octaves(mut self, octaves: u32) -> Self {
        assert!(octaves >= 1, "octave count must be positive");
        self.octaves = octaves;
        self
    }

    /// Set the per-octave frequency multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `lacunarity` is not greater than 1.
    pub fn with_lacunarity(mut self, lacunarity: f32) -> Self {
        assert!(lacunarity > 1.0, "lacunarity must exceed 1");
        self.lacunarity = lacunarity;
        self
    }

    /// Set the per-octave amplitude multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `gain` is outside (0, 1).
    pub fn with_gain(mut self, gain: f32) -> Self {
        assert!(gain > 0.0 && gain < 1.0, "gain must lie in (0, 1)");
        self.gain = gain;
        self
    }

    /// Set the first-octave frequency scale.
    ///
    /// # Panics
    ///
    /// Panics if `frequency` is not positive.
    pub fn with_base_frequency(mut self, frequency: f32) -> Self {
        assert!(frequency > 0.0, "base frequency must be positive");
        self.base_frequency = frequency;
        self
    }

    /// Set the fractal-sum normalization divisor.
    ///
    /// # Panics
    ///
    /// Panics if `normalization` is not positive.
    pub fn with_normalization(mut self, normalization: f32) -> Self {
        assert!(normalization > 0.0, "normalization must be positive");
        self.normalization = normalization;
        self
    }

    /// Total number of lattice cells.
    pub fn total_cells(&self) -> usize {
        (self.size as usize).pow(3)
    }
}

impl Default for VolumeParams {
    fn default() -> Self {
        Self::new(96)
    }
}

/// An immutable cubic lattice of 8-bit density values in [0, 255].
///
/// Indexing wraps modulo the lattice dimension on every axis, so sampling
/// never sees a boundary: `cell(x + n, y, z) == cell(x, y, z)`.
pub struct NoiseVolume {
    size: u32,
    data: Vec<u8>,
}

impl NoiseVolume {
    /// Generate a volume from `params`.
    ///
    /// One-time batch computation over every cell; each cell normalizes its
    /// coordinate to [0, 1), accumulates the fractal octave sum, and maps
    /// the signed result into [0, 1] via
    /// `clamp((sum / normalization + 1) / 2, 0, 1)` before 8-bit
    /// quantization.
    pub fn generate(params: &VolumeParams) -> Self {
        let noise = Perlin3::new(params.seed);
        let n = params.size as usize;
        let inv = 1.0 / params.size as f32;

        let mut data = vec![0u8; params.total_cells()];
        for z in 0..n {
            for y in 0..n {
                for x in 0..n {
                    let fx = x as f32 * inv;
                    let fy = y as f32 * inv;
                    let fz = z as f32 * inv;

                    let mut sum = 0.0;
                    let mut amp = 1.0;
                    let mut freq = params.base_frequency;
                    for _ in 0..params.octaves {
                        sum += amp * noise.sample(fx * freq, fy * freq, fz * freq);
                        freq *= params.lacunarity;
                        amp *= params.gain;
                    }

                    let value = ((sum / params.normalization + 1.0) * 0.5).clamp(0.0, 1.0);
                    data[(z * n + y) * n + x] = (value * 255.0).round() as u8;
                }
            }
        }

        Self {
            size: params.size,
            data,
        }
    }

    /// Lattice dimension per axis.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Raw density bytes in x-fastest, z-slowest order, for 3D texture
    /// upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Fetch a single lattice cell with periodic (wrapping) addressing.
    ///
    /// Any integer coordinate is valid; negatives and overflows wrap modulo
    /// the lattice dimension.
    #[inline]
    pub fn cell(&self, x: i32, y: i32, z: i32) -> u8 {
        let n = self.size as i32;
        let xi = x.rem_euclid(n) as usize;
        let yi = y.rem_euclid(n) as usize;
        let zi = z.rem_euclid(n) as usize;
        let n = n as usize;
        self.data[(zi * n + yi) * n + xi]
    }

    /// Sample the volume as a continuous field.
    ///
    /// `p` is in tile coordinates: the volume occupies [0, 1) per axis and
    /// repeats periodically outside it, exactly like a GPU 3D texture with
    /// repeat addressing and linear filtering. Returns a density in [0, 1].
    pub fn sample(&self, p: Vec3) -> f32 {
        let scaled = p * self.size as f32;
        let base = scaled.floor();
        let f = scaled - base;

        let x = base.x as i32;
        let y = base.y as i32;
        let z = base.z as i32;

        let c = |dx: i32, dy: i32, dz: i32| self.cell(x + dx, y + dy, z + dz) as f32 / 255.0;

        let v00 = mix(c(0, 0, 0), c(1, 0, 0), f.x);
        let v10 = mix(c(0, 1, 0), c(1, 1, 0), f.x);
        let v01 = mix(c(0, 0, 1), c(1, 0, 1), f.x);
        let v11 = mix(c(0, 1, 1), c(1, 1, 1), f.x);
        mix(mix(v00, v10, f.y), mix(v01, v11, f.y), f.z)
    }
}
