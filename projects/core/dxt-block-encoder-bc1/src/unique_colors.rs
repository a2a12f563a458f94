//! Deduplication of a block's pixels into weighted unique colours.

use dxt_block_encoder_common::color_8888::Color8888;
use fxhash::FxHashMap;

/// `pixel_index` value for a pixel excluded as transparent.
pub(crate) const TRANSPARENT_PIXEL: u8 = u8::MAX;

/// A distinct opaque colour of a block and how many pixels carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueColor {
    /// The colour, alpha forced to 255.
    pub color: Color8888,
    /// Number of pixels with this exact RGB.
    pub weight: u32,
}

/// The distinct opaque colours of one block.
///
/// Storage is kept between blocks; [`build`](Self::build) overwrites it.
#[derive(Debug, Default)]
pub(crate) struct UniqueColorTable {
    pub colors: Vec<UniqueColor>,
    /// Unique colour index of every input pixel, or [`TRANSPARENT_PIXEL`].
    pub pixel_index: Vec<u8>,
    pub total_weight: u32,
    pub has_transparent: bool,
    lookup: FxHashMap<u32, u8>,
}

impl UniqueColorTable {
    /// Rebuilds the table from `pixels`.
    ///
    /// With `alpha_threshold` set, pixels whose alpha is below it are transparent and do
    /// not contribute a colour.
    pub fn build(&mut self, pixels: &[Color8888], alpha_threshold: Option<u8>) {
        self.colors.clear();
        self.pixel_index.clear();
        self.lookup.clear();
        self.total_weight = 0;
        self.has_transparent = false;

        for pixel in pixels {
            if alpha_threshold.is_some_and(|threshold| pixel.a < threshold) {
                self.has_transparent = true;
                self.pixel_index.push(TRANSPARENT_PIXEL);
                continue;
            }

            self.total_weight += 1;
            let next = self.colors.len() as u8;
            let index = *self.lookup.entry(pixel.without_alpha()).or_insert(next);
            if index == next {
                self.colors.push(UniqueColor {
                    color: pixel.opaque(),
                    weight: 1,
                });
            } else {
                self.colors[index as usize].weight += 1;
            }
            self.pixel_index.push(index);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Weighted average colour in 8-bit space, rounded.
    pub fn average(&self) -> [u8; 3] {
        if self.total_weight == 0 {
            return [0; 3];
        }
        let mut sum = [0u32; 3];
        for unique in &self.colors {
            for (total, value) in sum.iter_mut().zip(unique.color.rgb()) {
                *total += value as u32 * unique.weight;
            }
        }
        let half = self.total_weight / 2;
        sum.map(|total| ((total + half) / self.total_weight) as u8)
    }
}
