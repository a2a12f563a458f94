#![no_main]

// Encodes arbitrary blocks with arbitrary parameters, then checks that the bytes decode to
// exactly the reported error and that the highest tier never loses to the lowest.

use dxt_block_encoder_bc1::util::decode_bc1_block;
use dxt_block_encoder_bc1::{Bc1Compressor, Bc1EncodeParams, Bc1Quality, DistanceFn};
use dxt_block_encoder_common::color_8888::Color8888;
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct EncodeInput {
    pub pixels: [[u8; 4]; 16],
    pub alpha_threshold: u8,
    pub flags: u8,
}

impl EncodeInput {
    fn params(&self, quality: Bc1Quality) -> Bc1EncodeParams {
        let flag = |bit: u8| self.flags & (1 << bit) != 0;
        Bc1EncodeParams {
            quality,
            alpha_threshold: self.alpha_threshold,
            pixels_have_alpha: flag(0),
            use_alpha_blocks: flag(1),
            force_alpha_blocks: flag(2),
            perceptual: flag(3),
            grayscale_sampling: flag(4),
            use_transparent_indices_for_black: flag(5),
            endpoint_caching: false,
        }
    }
}

fuzz_target!(|input: EncodeInput| {
    let pixels = input.pixels.map(|[r, g, b, a]| Color8888::new(r, g, b, a));
    let mut compressor = Bc1Compressor::with_cache_capacity(0);

    let mut errors = Vec::new();
    for quality in [Bc1Quality::Fastest, Bc1Quality::Uber] {
        let params = input.params(quality);
        let mut selectors = [0u8; 16];
        let results = compressor
            .compute(&params, &pixels, &mut selectors)
            .expect("a full block always encodes");
        let bytes = results
            .to_block_bytes(&selectors)
            .expect("16 selectors always pack");
        let decoded = decode_bc1_block(&bytes).expect("8 bytes always decode");

        let metric = DistanceFn::from_params(&params);
        let mut error = 0u64;
        for (source, out) in pixels.iter().zip(decoded.pixels) {
            if params.pixels_have_alpha && source.a < params.alpha_threshold {
                assert_eq!(out.a, 0, "transparent pixel decoded as opaque");
                continue;
            }
            error += metric.distance(source.rgb(), out.rgb()) as u64;
        }
        assert_eq!(error, results.error, "reported error differs from decoded error");
        errors.push(error);
    }

    assert!(errors[1] <= errors[0], "Uber lost to Fastest: {errors:?}");
});
