//! Benchmarks for noise evaluation and volume generation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;

use hearth::fire::FireParams;
use hearth::noise::Perlin3;
use hearth::volume::{NoiseVolume, VolumeParams};

fn bench_perlin_sample(c: &mut Criterion) {
    let perlin = Perlin3::new(42);
    c.bench_function("perlin_sample", |b| {
        b.iter(|| black_box(perlin.sample(black_box(1.37), black_box(4.21), black_box(0.58))))
    });
}

fn bench_volume_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("volume_generate");
    group.sample_size(10);

    for size in [32u32, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let params = VolumeParams::new(size);
            b.iter(|| black_box(NoiseVolume::generate(&params)))
        });
    }

    group.finish();
}

fn bench_volume_sample(c: &mut Criterion) {
    let volume = NoiseVolume::generate(&VolumeParams::new(32));
    c.bench_function("volume_sample", |b| {
        b.iter(|| black_box(volume.sample(black_box(Vec3::new(0.73, 1.91, 12.4)))))
    });
}

fn bench_fire_shade(c: &mut Criterion) {
    let volume = NoiseVolume::generate(&VolumeParams::new(32));
    let fire = FireParams::default();
    c.bench_function("fire_shade", |b| {
        b.iter(|| black_box(fire.shade(black_box(glam::Vec2::new(0.45, 0.3)), 1.5, &volume)))
    });
}

criterion_group!(
    benches,
    bench_perlin_sample,
    bench_volume_generate,
    bench_volume_sample,
    bench_fire_shade
);
criterion_main!(benches);
