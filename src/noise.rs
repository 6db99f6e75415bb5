//! Seeded 3D gradient noise.
//!
//! This is the classic permutation-table Perlin construction: pseudo-random
//! gradient vectors live at the integer lattice points, and a sample
//! interpolates the dot products of the eight surrounding corners with a
//! quintic fade curve. The table is built once from a seed and never
//! mutated, so two generators with the same seed produce identical noise
//! on any machine.
//!
//! A single sample lands approximately in [-1, 1] and is exactly zero at
//! integer lattice coordinates. Fractal summation over octaves lives in
//! [`crate::volume`]; this module is only the single-octave primitive.

use crate::math::mix;

/// Quintic fade `6t^5 - 15t^4 + 10t^3`, the interpolation weight curve.
///
/// Zero first and second derivatives at t = 0 and t = 1, which is what keeps
/// cell boundaries invisible in the interpolated field.
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Dot product of the sample offset with one of 12 gradient directions,
/// selected by the low four bits of the lattice hash.
#[inline]
fn grad(hash: u8, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

/// Seeded 3D gradient noise generator.
///
/// Construction shuffles a 256-entry permutation of `0..=255` with a linear
/// congruential generator driving Fisher-Yates swaps, then doubles the table
/// to 512 entries so corner hashing never needs a modulo.
///
/// # Example
///
/// ```
/// use hearth::noise::Perlin3;
///
/// let noise = Perlin3::new(42);
/// let n = noise.sample(1.3, 0.7, 2.2);
/// assert!(n >= -1.5 && n <= 1.5);
/// ```
pub struct Perlin3 {
    perm: [u8; 512],
}

impl Perlin3 {
    /// Build the permutation table from `seed`.
    ///
    /// The same seed always yields the same table; there is no global
    /// random state involved.
    pub fn new(seed: u32) -> Self {
        let mut table: [u8; 256] = [0; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }

        // LCG-driven Fisher-Yates. Statistical quality is irrelevant here;
        // determinism and visual decorrelation are the requirements.
        let mut state = seed;
        for i in (1..256usize).rev() {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let j = (state as usize) % (i + 1);
            table.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for i in 0..512 {
            perm[i] = table[i & 255];
        }
        Self { perm }
    }

    /// Sample the noise field at an arbitrary 3D point.
    ///
    /// Returns a signed value, approximately in [-1, 1]. The underlying
    /// lattice repeats every 256 units in each axis.
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let xi = (x.floor() as i32 & 255) as usize;
        let yi = (y.floor() as i32 & 255) as usize;
        let zi = (z.floor() as i32 & 255) as usize;

        let xf = x - x.floor();
        let yf = y - y.floor();
        let zf = z - z.floor();

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        mix(
            mix(
                mix(grad(p[aa], xf, yf, zf), grad(p[ba], xf - 1.0, yf, zf), u),
                mix(
                    grad(p[ab], xf, yf - 1.0, zf),
                    grad(p[bb], xf - 1.0, yf - 1.0, zf),
                    u,
                ),
                v,
            ),
            mix(
                mix(
                    grad(p[aa + 1], xf, yf, zf - 1.0),
                    grad(p[ba + 1], xf - 1.0, yf, zf - 1.0),
                    u,
                ),
                mix(
                    grad(p[ab + 1], xf, yf - 1.0, zf - 1.0),
                    grad(p[bb + 1], xf - 1.0, yf - 1.0, zf - 1.0),
                    u,
                ),
                v,
            ),
            w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_noise() {
        let a = Perlin3::new(1337);
        let b = Perlin3::new(1337);
        for i in 0..64 {
            let t = i as f32 * 0.173;
            assert_eq!(a.sample(t, t * 0.5, t * 2.0), b.sample(t, t * 0.5, t * 2.0));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Perlin3::new(1);
        let b = Perlin3::new(2);
        let differs = (0..64).any(|i| {
            let t = i as f32 * 0.31 + 0.11;
            a.sample(t, t, t) != b.sample(t, t, t)
        });
        assert!(differs);
    }

    #[test]
    fn test_zero_at_lattice_points() {
        // Gradient noise is exactly zero wherever all offsets are zero.
        let noise = Perlin3::new(7);
        for x in 0..8 {
            for y in 0..8 {
                assert_eq!(noise.sample(x as f32, y as f32, 3.0), 0.0);
            }
        }
    }

    #[test]
    fn test_output_bounded() {
        let noise = Perlin3::new(99);
        for i in 0..1000 {
            let t = i as f32 * 0.0137;
            let n = noise.sample(t * 3.0, t * 5.0 + 0.3, t * 7.0 + 0.7);
            assert!(n.abs() <= 1.5, "sample out of range: {}", n);
        }
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-6);
    }
}
