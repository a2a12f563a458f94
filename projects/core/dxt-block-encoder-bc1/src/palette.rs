//! Palette derivation and colour distance.
//!
//! The palette rule here is the one GPUs apply when sampling BC1 (the D3D9 "ideal"
//! rule with truncating division), and is shared by the encoder's evaluator and the
//! reference decoder in [`crate::util`], so reported errors always match decoded output.

use crate::params::Bc1EncodeParams;
use dxt_block_encoder_common::color_565::Color565;

/// Selector of the transparent black entry of a 3-colour palette.
pub const TRANSPARENT_SELECTOR: u8 = 3;

/// The four colours a pair of endpoint words decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// RGB of each selector. Entry 3 of a 3-colour palette is black.
    pub colors: [[u8; 3]; 4],
    /// `true` when the palette is in 3-colour mode (`color0 <= color1`).
    pub alpha_block: bool,
}

impl Palette {
    /// Derives the palette a decoder produces for the given endpoint words.
    ///
    /// # Examples
    ///
    /// ```
    /// use dxt_block_encoder_bc1::Palette;
    /// use dxt_block_encoder_common::color_565::Color565;
    ///
    /// let palette = Palette::from_endpoints(Color565::WHITE, Color565::BLACK);
    /// assert!(!palette.alpha_block);
    /// assert_eq!(palette.colors[2], [170, 170, 170]);
    /// assert_eq!(palette.colors[3], [85, 85, 85]);
    /// ```
    #[inline]
    pub fn from_endpoints(color0: Color565, color1: Color565) -> Self {
        let e0 = color0.to_rgb();
        let e1 = color1.to_rgb();
        if color0.greater_than(&color1) {
            Self {
                colors: [e0, e1, third(e0, e1), third(e1, e0)],
                alpha_block: false,
            }
        } else {
            Self {
                colors: [e0, e1, half(e0, e1), [0, 0, 0]],
                alpha_block: true,
            }
        }
    }

    /// Number of entries an opaque pixel may select.
    #[inline]
    pub(crate) fn opaque_entries(&self) -> usize {
        if self.alpha_block {
            3
        } else {
            4
        }
    }
}

/// `(2a + b) / 3` per channel.
#[inline]
fn third(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    [
        ((2 * a[0] as u32 + b[0] as u32) / 3) as u8,
        ((2 * a[1] as u32 + b[1] as u32) / 3) as u8,
        ((2 * a[2] as u32 + b[2] as u32) / 3) as u8,
    ]
}

/// `(a + b) / 2` per channel.
#[inline]
fn half(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    [
        ((a[0] as u32 + b[0] as u32) / 2) as u8,
        ((a[1] as u32 + b[1] as u32) / 2) as u8,
        ((a[2] as u32 + b[2] as u32) / 2) as u8,
    ]
}

/// Interpolated channel value of `selector` for raw-expanded endpoint channels `e0`, `e1`.
#[inline]
pub(crate) fn channel_entry(e0: u32, e1: u32, selector: usize, alpha_block: bool) -> u32 {
    match (selector, alpha_block) {
        (0, _) => e0,
        (1, _) => e1,
        (2, false) => (2 * e0 + e1) / 3,
        (3, false) => (e0 + 2 * e1) / 3,
        (2, true) => (e0 + e1) / 2,
        _ => 0,
    }
}

/// Per-channel weights of the perceptual metric, red, green, blue.
pub const PERCEPTUAL_WEIGHTS: [u32; 3] = [3, 6, 1];

/// How the difference between a source colour and a palette entry is measured.
///
/// Chosen once per block; the evaluator monomorphises its inner loop over [`ColorMetric`]
/// so the choice is not re-made for every pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceFn {
    /// `dr² + dg² + db²`
    Uniform,
    /// `3·dr² + 6·dg² + db²`
    Perceptual,
    /// Squared difference of integer luma.
    Grayscale,
}

impl DistanceFn {
    /// The metric selected by a set of encode parameters.
    #[inline]
    pub fn from_params(params: &Bc1EncodeParams) -> Self {
        if params.grayscale_sampling {
            Self::Grayscale
        } else if params.perceptual {
            Self::Perceptual
        } else {
            Self::Uniform
        }
    }

    /// Distance between two RGB colours.
    #[inline]
    pub fn distance(self, a: [u8; 3], b: [u8; 3]) -> u32 {
        match self {
            Self::Uniform => UniformMetric::distance(a, b),
            Self::Perceptual => PerceptualMetric::distance(a, b),
            Self::Grayscale => GrayscaleMetric::distance(a, b),
        }
    }

    /// Per-channel weights when the metric is a weighted sum of squared channel
    /// differences. [`None`] for metrics that do not separate by channel.
    #[inline]
    pub fn channel_weights(self) -> Option<[u32; 3]> {
        match self {
            Self::Uniform => Some([1, 1, 1]),
            Self::Perceptual => Some(PERCEPTUAL_WEIGHTS),
            Self::Grayscale => None,
        }
    }
}

/// A colour distance known at compile time.
pub(crate) trait ColorMetric {
    fn distance(a: [u8; 3], b: [u8; 3]) -> u32;
}

pub(crate) struct UniformMetric;
pub(crate) struct PerceptualMetric;
pub(crate) struct GrayscaleMetric;

#[inline(always)]
fn channel_deltas(a: [u8; 3], b: [u8; 3]) -> [i32; 3] {
    [
        a[0] as i32 - b[0] as i32,
        a[1] as i32 - b[1] as i32,
        a[2] as i32 - b[2] as i32,
    ]
}

impl ColorMetric for UniformMetric {
    #[inline(always)]
    fn distance(a: [u8; 3], b: [u8; 3]) -> u32 {
        let [dr, dg, db] = channel_deltas(a, b);
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl ColorMetric for PerceptualMetric {
    #[inline(always)]
    fn distance(a: [u8; 3], b: [u8; 3]) -> u32 {
        let [dr, dg, db] = channel_deltas(a, b);
        let [wr, wg, wb] = PERCEPTUAL_WEIGHTS;
        (dr * dr) as u32 * wr + (dg * dg) as u32 * wg + (db * db) as u32 * wb
    }
}

impl ColorMetric for GrayscaleMetric {
    #[inline(always)]
    fn distance(a: [u8; 3], b: [u8; 3]) -> u32 {
        let d = luma(a) - luma(b);
        (d * d) as u32
    }
}

/// Rec. 709 luma in 8.8 fixed point, rounded to 8 bits.
#[inline(always)]
pub(crate) fn luma(c: [u8; 3]) -> i32 {
    (54 * c[0] as i32 + 183 * c[1] as i32 + 19 * c[2] as i32 + 128) >> 8
}
