//! WGSL sources and uniform layout for the wgpu renderer.
//!
//! The fragment shaders are line-for-line ports of the CPU evaluators in
//! [`crate::fire`] and [`crate::smoke`]; the noise volume reaches the GPU as
//! an `r8unorm` 3D texture with repeat addressing and linear filtering, which
//! matches [`NoiseVolume::sample`](crate::volume::NoiseVolume::sample)
//! exactly. Keep the two in sync: the CPU side is the reference and is what
//! the tests exercise.

use bytemuck::{Pod, Zeroable};

/// Per-pass uniforms. Layout mirrors the WGSL `Uniforms` struct.
///
/// `strength` is the fire pass's intensity or the smoke pass's opacity;
/// `width`/`height`/`offset` place the billboard quad (see
/// [`Billboard`](crate::composite::Billboard)).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PassUniforms {
    pub time: f32,
    pub scale: f32,
    pub speed: f32,
    pub soft_edge: f32,
    pub strength: f32,
    pub aspect: f32,
    pub width: f32,
    pub height: f32,
    pub offset: [f32; 2],
    pub _pad: [f32; 2],
}

/// Shared preamble: uniforms, noise texture bindings, and the billboard
/// vertex stage (bottom-anchored quad, aspect-corrected width).
const COMMON: &str = r#"
struct Uniforms {
    time: f32,
    scale: f32,
    speed: f32,
    soft_edge: f32,
    strength: f32,
    aspect: f32,
    width: f32,
    height: f32,
    offset: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
@group(0) @binding(1) var noise_tex: texture_3d<f32>;
@group(0) @binding(2) var noise_samp: sampler;

struct VsOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> VsOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-0.5, 0.0),
        vec2<f32>(0.5, 0.0),
        vec2<f32>(0.5, 1.0),
        vec2<f32>(-0.5, 0.0),
        vec2<f32>(0.5, 1.0),
        vec2<f32>(-0.5, 1.0),
    );
    let corner = corners[vi];

    let pos = vec2<f32>(
        corner.x * uniforms.width / uniforms.aspect,
        corner.y * uniforms.height,
    ) + uniforms.offset;

    var out: VsOut;
    out.clip_position = vec4<f32>(pos.x, -1.0 + pos.y * 2.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x + 0.5, corner.y);
    return out;
}
"#;

/// Fire fragment stage: tapered cone with rounded cap, depth-scrolled and
/// wobbled noise lookup, two-segment blackbody ramp. Composited additively.
const FIRE_FRAGMENT: &str = r#"
fn fire_color(t: f32) -> vec3<f32> {
    let tt = clamp(t, 0.0, 1.0);
    if tt < 0.45 {
        return mix(vec3<f32>(0.08, 0.0, 0.0), vec3<f32>(1.0, 0.32, 0.04), tt / 0.45);
    }
    return mix(vec3<f32>(1.0, 0.32, 0.04), vec3<f32>(1.0, 0.92, 0.45), (tt - 0.45) / 0.55);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let uv = in.uv;
    let edge = uniforms.soft_edge * 0.55;

    // Taper: wide base to narrow tip, no discontinuity at the centerline.
    let half_w = mix(0.46, 0.02, pow(uv.y, 1.15));
    let dx = abs(uv.x - 0.5);
    let taper = 1.0 - smoothstep(half_w - edge, half_w, dx);

    // Rounded tip: keep only what lies outside an ellipse above the quad.
    let cap_p = vec2<f32>((uv.x - 0.5) / 0.55, uv.y - 1.04);
    let cap = smoothstep(0.22 - edge, 0.22, length(cap_p));
    let mask = min(taper, cap);

    let wobble = sin(uv.y * 12.0 + uniforms.time * 7.0) * 0.01;
    let p = vec3<f32>(
        (uv.x + wobble) * uniforms.scale,
        uv.y * uniforms.scale,
        uniforms.time * uniforms.speed,
    );
    let n = textureSample(noise_tex, noise_samp, p).r;

    let boost = smoothstep(0.0, 0.28, 1.0 - uv.y);
    let heat = clamp(n * 1.18 + boost * 0.32, 0.0, 1.0);

    let color = fire_color(heat) * (uniforms.strength * (0.45 + 0.75 * heat));
    let alpha = clamp(mask * (0.28 + 0.72 * heat), 0.0, 1.0);
    return vec4<f32>(color, alpha);
}
"#;

/// Smoke fragment stage: double-sine waving column, slow depth scroll,
/// height-faded density and gray ramp. Composited with alpha blending.
const SMOKE_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let uv = in.uv;

    let wave = sin(uv.y * 8.0 + uniforms.time * 0.8) * 0.1
        + sin(uv.y * 3.5 + uniforms.time * 0.4) * 0.05;

    let dx = abs(uv.x - 0.5 - wave);
    let edge = uniforms.soft_edge * 0.8;
    let mask = 1.0 - smoothstep(0.35 - edge, 0.35, dx);

    let p = vec3<f32>(
        uv.x * uniforms.scale + wave,
        uv.y * uniforms.scale,
        uniforms.time * uniforms.speed,
    );
    let n = textureSample(noise_tex, noise_samp, p).r;

    let fade_up = smoothstep(0.0, 1.0, uv.y);
    let density = clamp(n * 1.2 - 0.25 + (1.0 - fade_up) * 0.15, 0.0, 1.0);

    let alpha = mask * density * uniforms.strength;
    let color = mix(vec3<f32>(0.2), vec3<f32>(0.55), fade_up) * density;
    return vec4<f32>(color, alpha);
}
"#;

/// Complete WGSL module for the fire pass.
pub fn fire_source() -> String {
    format!("{COMMON}\n{FIRE_FRAGMENT}")
}

/// Complete WGSL module for the smoke pass.
pub fn smoke_source() -> String {
    format!("{COMMON}\n{SMOKE_FRAGMENT}")
}
