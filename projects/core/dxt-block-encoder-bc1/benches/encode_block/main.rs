use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dxt_block_encoder_bc1::{Bc1Compressor, Bc1EncodeParams, Bc1Quality};
use dxt_block_encoder_common::color_8888::Color8888;
use dxt_block_encoder_common::decoded_4x4_block::Decoded4x4Block;

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
use pprof::criterion::{Output, PProfProfiler};

/// Gradients with a little noise on top, the typical content of texture blocks.
fn generate_blocks(count: usize) -> Vec<Decoded4x4Block> {
    let mut state = 0x2545_F491u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    (0..count)
        .map(|_| {
            let start = next().to_le_bytes();
            let end = next().to_le_bytes();
            let mut block = Decoded4x4Block::new(Color8888::default());
            for y in 0..4 {
                for x in 0..4 {
                    let t = (x + y) as u32;
                    let noise = (next() & 7) as u8;
                    let lerp = |s: u8, e: u8| {
                        ((s as u32 * (6 - t) + e as u32 * t) / 6) as u8 ^ noise
                    };
                    let pixel = Color8888::new(
                        lerp(start[0], end[0]),
                        lerp(start[1], end[1]),
                        lerp(start[2], end[2]),
                        255,
                    );
                    block.set_pixel(x, y, pixel);
                }
            }
            block
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("BC1 Encode Blocks");

    let blocks = generate_blocks(1024);
    group.throughput(criterion::Throughput::Elements(blocks.len() as u64));

    for quality in Bc1Quality::all_values() {
        let params = Bc1EncodeParams {
            quality: *quality,
            ..Default::default()
        };
        group.bench_with_input(
            BenchmarkId::new("encode_block", format!("{quality:?}")),
            &params,
            |b, params| {
                // No cache, so every iteration does the full search.
                let mut compressor = Bc1Compressor::with_cache_capacity(0);
                b.iter(|| {
                    for block in &blocks {
                        let bytes = compressor.encode_block(params, block).unwrap();
                        criterion::black_box(bytes);
                    }
                })
            },
        );
    }

    group.finish();
}

#[cfg(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
))]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}

#[cfg(not(all(
    any(target_os = "linux", target_os = "macos"),
    any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
)))]
criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
