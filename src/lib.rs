//! # hearth
//!
//! Procedural fire and smoke billboards from a single seeded 3D noise
//! volume.
//!
//! The pipeline has three layers:
//!
//! - **Volume** ([`volume`], [`noise`]): a cube of fractal Perlin noise,
//!   generated once from a seed and sampled with wraparound so animation
//!   through it never hits a seam.
//! - **Evaluators** ([`fire`], [`smoke`], [`ramp`]): pure functions from a
//!   billboard point and a time to a color and an opacity. These are the
//!   reference semantics; the WGSL in [`shader`] mirrors them on the GPU.
//! - **Compositing** ([`composite`], [`render`]): fire blended additively,
//!   then smoke blended with alpha, over a dark background. Either a CPU
//!   snapshot to a PNG or a live wgpu window.
//!
//! ## Quick start
//!
//! ```no_run
//! use glam::Vec2;
//! use hearth::fire::FireParams;
//! use hearth::volume::{NoiseVolume, VolumeParams};
//!
//! let volume = NoiseVolume::generate(&VolumeParams::default());
//! let fire = FireParams::default();
//! let point = fire.shade(Vec2::new(0.5, 0.2), 1.5, &volume);
//! println!("color {:?} alpha {}", point.color, point.alpha);
//! ```
//!
//! Offline rendering goes through [`composite::Compositor`]:
//!
//! ```no_run
//! use hearth::composite::Compositor;
//! use hearth::volume::{NoiseVolume, VolumeParams};
//!
//! let volume = NoiseVolume::generate(&VolumeParams::default());
//! let frame = Compositor::new(450, 600).render(&volume, 1.5);
//! frame.save("flame.png").unwrap();
//! ```

pub mod composite;
pub mod error;
pub mod fire;
pub mod math;
pub mod noise;
pub mod ramp;
pub mod render;
pub mod shader;
pub mod smoke;
pub mod time;
pub mod volume;

pub use glam::{Vec2, Vec3};

/// Commonly used types in one import.
pub mod prelude {
    pub use crate::composite::{BlendMode, Billboard, Compositor, ShadedPoint};
    pub use crate::fire::FireParams;
    pub use crate::noise::Perlin3;
    pub use crate::ramp::ColorRamp;
    pub use crate::smoke::SmokeParams;
    pub use crate::volume::{NoiseVolume, VolumeParams};
    pub use glam::{Vec2, Vec3};
}
