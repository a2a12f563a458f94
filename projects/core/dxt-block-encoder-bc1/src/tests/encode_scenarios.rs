//! Specific blocks with known best encodings.

use crate::test_prelude::*;
use dxt_block_encoder_common::color_565::{expand_component, COMPONENT_MAX};

fn uber() -> Bc1EncodeParams {
    Bc1EncodeParams {
        quality: Bc1Quality::Uber,
        ..Default::default()
    }
}

#[test]
fn pure_red_block_is_exact() {
    let block = [rgb(255, 0, 0); 16];
    let (results, selectors) = encode(&uber(), &block);

    assert_eq!(results.error, 0);
    assert!(!results.alpha_block);
    assert!(selectors.iter().all(|&s| s == selectors[0]));

    let palette = Palette::from_endpoints(
        Color565::from_raw(results.low_color),
        Color565::from_raw(results.high_color),
    );
    assert_eq!(palette.colors[selectors[0] as usize], [255, 0, 0]);
}

#[rstest]
#[case(rgb(132, 130, 8), rgb(24, 65, 198))]
#[case(rgb(255, 0, 0), rgb(0, 0, 255))]
#[case(rgb(0, 0, 0), rgb(255, 255, 255))]
fn checkerboard_of_exact_colours(#[case] a: Color8888, #[case] b: Color8888) {
    let block: [Color8888; 16] = core::array::from_fn(|i| if (i + i / 4) % 2 == 0 { a } else { b });

    for quality in Bc1Quality::all_values() {
        let params = Bc1EncodeParams {
            quality: *quality,
            ..Default::default()
        };
        let (results, selectors) = encode(&params, &block);
        assert_eq!(results.error, 0, "{quality:?}");

        let mut used: Vec<u8> = selectors.clone();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used.len(), 2, "{quality:?}");

        let mut endpoints = [results.low_color, results.high_color];
        endpoints.sort_unstable();
        let mut expected = [a.to_color_565().raw_value(), b.to_color_565().raw_value()];
        expected.sort_unstable();
        assert_eq!(endpoints, expected, "{quality:?}");
    }
}

/// Best error a single palette entry can reach for `rgb` with the uniform metric:
/// per channel the closest truncated 1/3 mix in 4-colour mode, or 1/2 mix in 3-colour mode.
fn best_solid_error(rgb: [u8; 3], allow_three_color: bool) -> u64 {
    let channel_best = |channel: usize, half: bool| {
        let max = COMPONENT_MAX[channel];
        let v = rgb[channel] as i64;
        let mut best = i64::MAX;
        for a in 0..=max {
            for b in 0..=max {
                let ea = expand_component(channel, a) as i64;
                let eb = expand_component(channel, b) as i64;
                let mixed = if half { (ea + eb) / 2 } else { (2 * ea + eb) / 3 };
                best = best.min((mixed - v) * (mixed - v));
            }
        }
        best as u64
    };
    let thirds: u64 = (0..3).map(|c| channel_best(c, false)).sum();
    if !allow_three_color {
        return thirds;
    }
    let half: u64 = (0..3).map(|c| channel_best(c, true)).sum();
    thirds.min(half)
}

#[test]
fn solid_blocks_reach_the_best_single_entry() {
    let mut colors: Vec<[u8; 3]> = (0..=255u8).step_by(5).map(|v| [v, v, v]).collect();
    colors.extend([[255, 0, 0], [128, 128, 128], [1, 254, 77], [200, 3, 130], [45, 45, 250]]);

    for use_alpha_blocks in [true, false] {
        let params = Bc1EncodeParams {
            use_alpha_blocks,
            ..uber()
        };
        for rgb_value in &colors {
            let [r, g, b] = *rgb_value;
            let (results, _) = encode(&params, &[rgb(r, g, b); 16]);
            assert_eq!(
                results.error,
                16 * best_solid_error(*rgb_value, use_alpha_blocks),
                "{rgb_value:?}, alpha blocks {use_alpha_blocks}"
            );
        }
    }
}

#[test]
fn transparent_pixels_get_the_transparent_selector() {
    let mut block: [Color8888; 16] = core::array::from_fn(|i| {
        rgb((i * 16) as u8, 255 - (i * 16) as u8, 40)
    });
    let transparent = [1usize, 6, 7, 12, 15];
    for &i in &transparent {
        block[i].a = 10;
    }
    let params = Bc1EncodeParams {
        pixels_have_alpha: true,
        ..uber()
    };
    let (results, selectors) = encode(&params, &block);
    assert!(results.alpha_block);
    for (i, &selector) in selectors.iter().enumerate() {
        assert_eq!(selector == TRANSPARENT_SELECTOR, transparent.contains(&i), "pixel {i}");
    }

    // The colours of transparent pixels have no influence.
    let mut recoloured = block;
    for &i in &transparent {
        recoloured[i] = Color8888::new(7, 200, 99, 0);
    }
    let (recoloured_results, recoloured_selectors) = encode(&params, &recoloured);
    assert_eq!(recoloured_results, results);
    assert_eq!(recoloured_selectors, selectors);
}

#[rstest]
#[case(0)]
#[case(127)]
fn fully_transparent_block(#[case] alpha: u8) {
    let block = [Color8888::new(90, 20, 200, alpha); 16];
    let params = Bc1EncodeParams {
        pixels_have_alpha: true,
        ..Default::default()
    };
    let (results, selectors) = encode(&params, &block);
    assert_eq!(
        results,
        Bc1EncodeResults {
            low_color: 0xFFFF,
            high_color: 0xFFFF,
            alpha_block: true,
            error: 0,
        }
    );
    assert!(selectors.iter().all(|&s| s == TRANSPARENT_SELECTOR));

    let bytes = results.to_block_bytes(&selectors).unwrap();
    assert_eq!(decode_bc1_block(&bytes).unwrap().count_below_alpha(1), 16);
}

#[test]
fn alpha_is_ignored_unless_requested() {
    let block = [Color8888::new(255, 0, 0, 0); 16];
    let (results, _) = encode(&uber(), &block);
    assert_eq!(results.error, 0);
    assert!(!results.alpha_block);
}

#[test]
fn near_black_pixels_can_use_transparent_black() {
    // Black, red and green are not on one line, so no palette holds all three exactly.
    let block: [Color8888; 16] = core::array::from_fn(|i| match i % 4 {
        0 | 1 => rgb(0, 0, 0),
        2 => rgb(255, 0, 0),
        _ => rgb(0, 255, 0),
    });

    let (plain, _) = encode(&uber(), &block);
    assert!(plain.error > 0);

    let params = Bc1EncodeParams {
        use_transparent_indices_for_black: true,
        ..uber()
    };
    let (results, selectors) = encode(&params, &block);
    assert_eq!(results.error, 0);
    assert!(results.alpha_block);
    for (i, &selector) in selectors.iter().enumerate() {
        assert_eq!(selector == TRANSPARENT_SELECTOR, i % 4 < 2, "pixel {i}");
    }
    assert_eq!(decoded_error(&params, &block, &results, &selectors), 0);
}

#[test]
fn near_black_pass_needs_a_mix_of_pixels() {
    let params = Bc1EncodeParams {
        use_transparent_indices_for_black: true,
        ..uber()
    };
    for block in [[rgb(3, 1, 4); 16], [rgb(90, 100, 110); 16]] {
        // Entirely near-black, or no near-black at all: encoded as plain colour.
        assert_eq!(encode(&params, &block), encode(&uber(), &block));
    }
}

#[test]
fn partial_blocks_can_be_encoded() {
    let pixels = [rgb(255, 0, 0), rgb(0, 255, 0), rgb(0, 0, 255), rgb(10, 10, 10), rgb(99, 99, 99)];
    let (results, selectors) = encode(&uber(), &pixels);
    assert_eq!(selectors.len(), pixels.len());
    assert_eq!(decoded_error(&uber(), &pixels, &results, &selectors), results.error);
}
