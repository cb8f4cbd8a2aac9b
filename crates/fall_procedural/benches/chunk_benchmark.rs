//! Benchmark for chunk generation performance.
//!
//! TARGET: a 25x25 streaming window (radius 12) in well under a second
//!
//! Run with: cargo bench --package fall_procedural --bench chunk_benchmark

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fall_core::Collidable;
use fall_procedural::{ChunkCoord, ChunkGenerator, NoiseTerrain};
use glam::Vec3;

fn benchmark_single_chunk(c: &mut Criterion) {
    let terrain = NoiseTerrain::new(42);
    let generator = ChunkGenerator::new(8).unwrap();

    c.bench_function("single_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            black_box(generator.generate(ChunkCoord::new(coord, coord / 2), &terrain))
        });
    });
}

fn benchmark_streaming_window(c: &mut Criterion) {
    let terrain = NoiseTerrain::new(42);
    let generator = ChunkGenerator::new(8).unwrap();

    let mut group = c.benchmark_group("streaming_window");
    group.sample_size(10);
    group.throughput(Throughput::Elements(25 * 25));
    group.bench_function("radius_12", |b| {
        b.iter(|| {
            for z in -12..=12 {
                for x in -12..=12 {
                    black_box(generator.generate(ChunkCoord::new(x, z), &terrain));
                }
            }
        });
    });
    group.finish();
}

fn benchmark_terrain_ray(c: &mut Criterion) {
    let terrain = NoiseTerrain::new(42);
    let generator = ChunkGenerator::new(8).unwrap();
    let chunk = generator.generate(ChunkCoord::new(0, 0), &terrain);

    c.bench_function("terrain_ray_128_tris", |b| {
        b.iter(|| {
            black_box(chunk.ray_collides(
                Vec3::ZERO,
                black_box(Vec3::new(3.3, 200.0, 9.1)),
                Vec3::new(0.1, -1.0, 0.05),
            ))
        });
    });
}

criterion_group!(benches, benchmark_single_chunk, benchmark_streaming_window, benchmark_terrain_ray);
criterion_main!(benches);
