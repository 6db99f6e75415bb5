//! Small interpolation helpers shared by the noise generator and the
//! shading evaluators.
//!
//! These mirror the GLSL built-ins of the same names so the CPU evaluators
//! and the WGSL shaders stay numerically interchangeable.

/// Linear interpolation between `a` and `b` by `t`.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smooth step: 0 below `edge0`, 1 above `edge1`, smooth in between.
///
/// Matches the GLSL/WGSL `smoothstep` contract, including the degenerate
/// `edge0 == edge1` case (hard step).
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints() {
        assert_eq!(mix(2.0, 6.0, 0.0), 2.0);
        assert_eq!(mix(2.0, 6.0, 1.0), 6.0);
        assert_eq!(mix(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn test_smoothstep_clamps() {
        assert_eq!(smoothstep(0.2, 0.8, 0.0), 0.0);
        assert_eq!(smoothstep(0.2, 0.8, 1.0), 1.0);
    }

    #[test]
    fn test_smoothstep_midpoint() {
        let v = smoothstep(0.0, 1.0, 0.5);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_monotone() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = smoothstep(0.1, 0.9, i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_smoothstep_degenerate_edges() {
        assert_eq!(smoothstep(0.5, 0.5, 0.4), 0.0);
        assert_eq!(smoothstep(0.5, 0.5, 0.6), 1.0);
    }
}
