//! Common test imports and utilities for BC1 encoder tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.

// External crates commonly used in tests
pub use rstest::rstest;

// Core functionality from this crate
pub use crate::util::decode_bc1_block;
pub use crate::{
    Bc1Compressor, Bc1EncodeError, Bc1EncodeParams, Bc1EncodeResults, Bc1Quality, DistanceFn,
    Palette, TRANSPARENT_SELECTOR,
};

// Common types from dxt_block_encoder_common
pub use dxt_block_encoder_common::color_565::Color565;
pub use dxt_block_encoder_common::color_8888::Color8888;

/// Deterministic pseudo-random blocks covering the shapes the encoder special-cases:
/// solid, two-colour, few-colour, gradients, noise and near-black mixes.
pub(crate) fn block_corpus() -> Vec<[Color8888; 16]> {
    let mut state = 0x2545_F491_u32;
    let mut next = move || {
        // xorshift32
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    let mut corpus = Vec::new();
    for _ in 0..6 {
        let v = next();
        corpus.push([rgb(v as u8, (v >> 8) as u8, (v >> 16) as u8); 16]);
    }
    for _ in 0..6 {
        let (a, b) = (next(), next());
        let ca = rgb(a as u8, (a >> 8) as u8, (a >> 16) as u8);
        let cb = rgb(b as u8, (b >> 8) as u8, (b >> 16) as u8);
        corpus.push(core::array::from_fn(|i| if (i + i / 4) % 2 == 0 { ca } else { cb }));
    }
    for _ in 0..6 {
        let palette: [Color8888; 3] = core::array::from_fn(|_| {
            let v = next();
            rgb(v as u8, (v >> 8) as u8, (v >> 16) as u8)
        });
        corpus.push(core::array::from_fn(|_| palette[(next() % 3) as usize]));
    }
    for _ in 0..6 {
        let (a, b) = (next(), next());
        let start = [a as u8, (a >> 8) as u8, (a >> 16) as u8];
        let end = [b as u8, (b >> 8) as u8, (b >> 16) as u8];
        corpus.push(core::array::from_fn(|i| {
            let lerp = |s: u8, e: u8| ((s as u32 * (15 - i as u32) + e as u32 * i as u32) / 15) as u8;
            rgb(lerp(start[0], end[0]), lerp(start[1], end[1]), lerp(start[2], end[2]))
        }));
    }
    for _ in 0..6 {
        corpus.push(core::array::from_fn(|_| {
            let v = next();
            rgb(v as u8, (v >> 8) as u8, (v >> 16) as u8)
        }));
    }
    for _ in 0..4 {
        corpus.push(core::array::from_fn(|_| {
            let v = next();
            if v % 3 == 0 {
                rgb((v >> 8) as u8 % 4, (v >> 12) as u8 % 4, (v >> 16) as u8 % 4)
            } else {
                rgb(200 + (v >> 8) as u8 % 40, 90 + (v >> 16) as u8 % 30, 30)
            }
        }));
    }
    corpus
}

/// An opaque pixel.
pub(crate) const fn rgb(r: u8, g: u8, b: u8) -> Color8888 {
    Color8888::new(r, g, b, 255)
}

/// Encodes `pixels` with a fresh compressor, returning the results and selectors.
pub(crate) fn encode(params: &Bc1EncodeParams, pixels: &[Color8888]) -> (Bc1EncodeResults, Vec<u8>) {
    let mut selectors = vec![0u8; pixels.len()];
    let results = Bc1Compressor::new()
        .compute(params, pixels, &mut selectors)
        .unwrap();
    (results, selectors)
}

/// Recomputes the error of an encoding from the decoder's palette: every pixel that is
/// opaque under `params` is compared with the entry its selector picks.
pub(crate) fn decoded_error(
    params: &Bc1EncodeParams,
    pixels: &[Color8888],
    results: &Bc1EncodeResults,
    selectors: &[u8],
) -> u64 {
    let palette = Palette::from_endpoints(
        Color565::from_raw(results.low_color),
        Color565::from_raw(results.high_color),
    );
    assert_eq!(palette.alpha_block, results.alpha_block);

    let metric = DistanceFn::from_params(params);
    pixels
        .iter()
        .zip(selectors)
        .filter(|(pixel, _)| !(params.pixels_have_alpha && pixel.a < params.alpha_threshold))
        .map(|(pixel, &selector)| metric.distance(pixel.rgb(), palette.colors[selector as usize]) as u64)
        .sum()
}
