//! Throughput benchmarks for oxifax-lzw
//!
//! Compression and decompression speed over strip-sized buffers of
//! different redundancy, plus predictor reconstruction.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxifax_lzw::{
    SampleLayout, apply_horizontal_differencing, compress, decompress,
    reverse_horizontal_differencing,
};
use std::hint::black_box;

type PatternGenerator = fn(usize) -> Vec<u8>;

mod patterns {
    /// Uniform bytes (best case)
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    /// Random bytes (worst case)
    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x1234_5678_9ABC_DEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    /// Smooth 8-bit gray ramp, typical of scanned photographs
    pub fn gradient(size: usize) -> Vec<u8> {
        (0..size).map(|i| ((i % 512) / 2) as u8).collect()
    }
}

const SIZES: [usize; 2] = [8 * 1024, 256 * 1024];

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    let cases: [(&str, PatternGenerator); 3] = [
        ("uniform", patterns::uniform),
        ("random", patterns::random),
        ("gradient", patterns::gradient),
    ];
    for (name, generate) in cases {
        for size in SIZES {
            let data = generate(size);
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(name, size),
                &data,
                |b, data| b.iter(|| compress(black_box(data)).unwrap()),
            );
        }
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    let cases: [(&str, PatternGenerator); 3] = [
        ("uniform", patterns::uniform),
        ("random", patterns::random),
        ("gradient", patterns::gradient),
    ];
    for (name, generate) in cases {
        for size in SIZES {
            let compressed = compress(&generate(size)).unwrap();
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(name, size),
                &compressed,
                |b, compressed| b.iter(|| decompress(black_box(compressed), size).unwrap()),
            );
        }
    }
    group.finish();
}

fn bench_predictor(c: &mut Criterion) {
    let mut group = c.benchmark_group("predictor");
    let layout = SampleLayout::new(1024, 3);
    let mut data = patterns::gradient(layout.stride() * 64);
    apply_horizontal_differencing(&mut data, layout).unwrap();
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("reverse_rgb8", |b| {
        b.iter(|| {
            let mut rows = data.clone();
            reverse_horizontal_differencing(black_box(&mut rows), layout).unwrap();
            rows
        });
    });
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress, bench_predictor);
criterion_main!(benches);
