//! The public encoder entry point.

use crate::cache::{PreviousResults, DEFAULT_CACHE_CAPACITY};
use crate::error::Bc1EncodeError;
use crate::evaluate::Evaluator;
use crate::palette::{DistanceFn, TRANSPARENT_SELECTOR};
use crate::params::Bc1EncodeParams;
use crate::search;
use crate::solid;
use crate::unique_colors::TRANSPARENT_PIXEL;
use dxt_block_encoder_common::color_565::Color565;
use dxt_block_encoder_common::color_8888::Color8888;
use dxt_block_encoder_common::decoded_4x4_block::Decoded4x4Block;
use log::{debug, trace};

/// Largest number of pixels [`Bc1Compressor::compute`] accepts for one block.
pub const MAX_BLOCK_PIXELS: usize = 255;

/// Channels at or below this are near-black for
/// [`use_transparent_indices_for_black`](Bc1EncodeParams::use_transparent_indices_for_black).
const NEAR_BLACK_MAX: u8 = 4;

/// The encoding of one block, minus its selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bc1EncodeResults {
    /// `color0` of the block, packed 5:6:5.
    pub low_color: u16,
    /// `color1` of the block, packed 5:6:5.
    pub high_color: u16,
    /// The block decodes with the 3-colour + transparent black palette
    /// (`low_color <= high_color`).
    pub alpha_block: bool,
    /// Sum over opaque pixels of the squared distance between source and decoded colour,
    /// under the metric selected by the parameters.
    pub error: u64,
}

impl Bc1EncodeResults {
    /// The result for a block without any opaque pixel.
    const TRANSPARENT: Self = Self {
        low_color: Color565::WHITE.raw_value(),
        high_color: Color565::WHITE.raw_value(),
        alpha_block: true,
        error: 0,
    };

    /// Packs the result and the selectors of a 16 pixel block into BC1 wire format:
    /// `color0` and `color1` little endian, followed by the selectors 2 bits each with
    /// pixel 0 in the lowest bits.
    ///
    /// # Errors
    ///
    /// [`Bc1EncodeError::NotAFullBlock`] if `selectors` does not hold exactly 16 entries.
    pub fn to_block_bytes(&self, selectors: &[u8]) -> Result<[u8; 8], Bc1EncodeError> {
        if selectors.len() != 16 {
            return Err(Bc1EncodeError::NotAFullBlock(selectors.len()));
        }

        let indices = selectors
            .iter()
            .enumerate()
            .fold(0u32, |acc, (pixel, &selector)| {
                acc | ((selector as u32 & 0x3) << (pixel * 2))
            });

        let mut block = [0u8; 8];
        block[0..2].copy_from_slice(&self.low_color.to_le_bytes());
        block[2..4].copy_from_slice(&self.high_color.to_le_bytes());
        block[4..8].copy_from_slice(&indices.to_le_bytes());
        Ok(block)
    }
}

/// A BC1 block encoder.
///
/// Holds scratch buffers reused from block to block and a small ring of recent results
/// (see [`endpoint_caching`](Bc1EncodeParams::endpoint_caching)). It has no internal
/// synchronisation: to encode in parallel, use one compressor per thread. Which
/// compressor encodes a block never changes the result.
#[derive(Debug)]
pub struct Bc1Compressor {
    evaluator: Evaluator,
    previous: PreviousResults,
    trial_pixels: Vec<Color8888>,
    trial_selectors: Vec<u8>,
}

impl Default for Bc1Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Bc1Compressor {
    /// Creates a compressor remembering the results of the last 8 blocks.
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a compressor remembering the results of the last `capacity` blocks.
    /// A capacity of 0 disables the cache.
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            evaluator: Evaluator::default(),
            previous: PreviousResults::with_capacity(capacity),
            trial_pixels: Vec::new(),
            trial_selectors: Vec::new(),
        }
    }

    /// Forgets all remembered results.
    pub fn reset(&mut self) {
        self.previous.clear();
    }

    /// Encodes one block.
    ///
    /// # Parameters
    ///
    /// - `params`: Encoder configuration.
    /// - `pixels`: The block's pixels; canonically the 16 pixels of a 4x4 tile, row-major.
    /// - `selectors`: Receives one selector per pixel. Transparent pixels get selector 3.
    ///
    /// # Errors
    ///
    /// - [`Bc1EncodeError::EmptyBlock`] if `pixels` is empty.
    /// - [`Bc1EncodeError::TooManyPixels`] if `pixels` is longer than [`MAX_BLOCK_PIXELS`].
    /// - [`Bc1EncodeError::SelectorBufferTooSmall`] if `selectors` is shorter than `pixels`.
    ///
    /// No state is touched when an error is returned.
    pub fn compute(
        &mut self,
        params: &Bc1EncodeParams,
        pixels: &[Color8888],
        selectors: &mut [u8],
    ) -> Result<Bc1EncodeResults, Bc1EncodeError> {
        if pixels.is_empty() {
            return Err(Bc1EncodeError::EmptyBlock);
        }
        if pixels.len() > MAX_BLOCK_PIXELS {
            return Err(Bc1EncodeError::TooManyPixels {
                max: MAX_BLOCK_PIXELS,
                actual: pixels.len(),
            });
        }
        if selectors.len() < pixels.len() {
            return Err(Bc1EncodeError::SelectorBufferTooSmall {
                needed: pixels.len(),
                actual: selectors.len(),
            });
        }
        let selectors = &mut selectors[..pixels.len()];

        let mut results = self.compute_internal(params, pixels, selectors);
        let unique_colors = self.evaluator.table.len();

        if params.use_transparent_indices_for_black && !self.evaluator.table.has_transparent {
            results = self.alpha_as_black(params, pixels, selectors, results);
        }

        trace!(
            "BC1 block: {} pixels, {} unique colours, endpoints {:04X}/{:04X}, alpha block {}, error {}",
            pixels.len(),
            unique_colors,
            results.low_color,
            results.high_color,
            results.alpha_block,
            results.error
        );
        Ok(results)
    }

    /// Encodes a 4x4 block straight to BC1 bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use dxt_block_encoder_bc1::{Bc1Compressor, Bc1EncodeParams};
    /// use dxt_block_encoder_common::color_8888::Color8888;
    /// use dxt_block_encoder_common::decoded_4x4_block::Decoded4x4Block;
    ///
    /// let block = Decoded4x4Block::new(Color8888::new(0, 0, 0, 255));
    /// let bytes = Bc1Compressor::new()
    ///     .encode_block(&Bc1EncodeParams::default(), &block)
    ///     .unwrap();
    /// assert_eq!(bytes.len(), 8);
    /// ```
    pub fn encode_block(
        &mut self,
        params: &Bc1EncodeParams,
        block: &Decoded4x4Block,
    ) -> Result<[u8; 8], Bc1EncodeError> {
        let mut selectors = [0u8; 16];
        let results = self.compute(params, &block.pixels, &mut selectors)?;
        results.to_block_bytes(&selectors)
    }

    /// Encodes `pixels` with the block's own colours, writing `selectors`.
    fn compute_internal(
        &mut self,
        params: &Bc1EncodeParams,
        pixels: &[Color8888],
        selectors: &mut [u8],
    ) -> Bc1EncodeResults {
        let ev = &mut self.evaluator;
        ev.prepare(params, pixels);

        if ev.table.is_empty() {
            selectors.fill(TRANSPARENT_SELECTOR);
            return Bc1EncodeResults::TRANSPARENT;
        }

        let cached = if params.endpoint_caching {
            self.previous
                .find(params, &ev.table.colors, ev.table.has_transparent)
        } else {
            None
        };

        match cached {
            Some(solution) => {
                debug!(
                    "Reusing cached BC1 endpoints {:04X}/{:04X} for {} unique colours",
                    solution.coords.low.raw_value(),
                    solution.coords.high.raw_value(),
                    ev.table.len()
                );
                ev.best.clone_from(solution);
            }
            None => {
                ev.prepare_search();
                if ev.table.len() == 1 {
                    solid::encode_single(ev);
                } else {
                    search::run(ev, params.quality);
                }
                if params.endpoint_caching {
                    self.previous
                        .push(params, &ev.table.colors, ev.table.has_transparent, &ev.best);
                }
            }
        }

        for (out, &index) in selectors.iter_mut().zip(&ev.table.pixel_index) {
            *out = if index == TRANSPARENT_PIXEL {
                TRANSPARENT_SELECTOR
            } else {
                ev.best.selectors[index as usize]
            };
        }

        Bc1EncodeResults {
            low_color: ev.best.coords.low.raw_value(),
            high_color: ev.best.coords.high.raw_value(),
            alpha_block: ev.best.alpha_block,
            error: ev.best.error,
        }
    }

    /// Re-encodes the block with its near-black pixels made transparent, so they decode
    /// to the black entry of a 3-colour palette, and keeps whichever encoding is better.
    fn alpha_as_black(
        &mut self,
        params: &Bc1EncodeParams,
        pixels: &[Color8888],
        selectors: &mut [u8],
        primary: Bc1EncodeResults,
    ) -> Bc1EncodeResults {
        let is_near_black = |p: &Color8888| {
            p.r <= NEAR_BLACK_MAX && p.g <= NEAR_BLACK_MAX && p.b <= NEAR_BLACK_MAX
        };
        let near_black = pixels.iter().filter(|p| is_near_black(p)).count();
        if near_black == 0 || near_black == pixels.len() {
            return primary;
        }

        let mut trial_pixels = core::mem::take(&mut self.trial_pixels);
        let mut trial_selectors = core::mem::take(&mut self.trial_selectors);
        trial_pixels.clear();
        trial_pixels.extend(pixels.iter().map(|p| {
            let alpha = if is_near_black(p) { 0 } else { 255 };
            Color8888::new(p.r, p.g, p.b, alpha)
        }));
        trial_selectors.clear();
        trial_selectors.resize(pixels.len(), 0);

        let inner = Bc1EncodeParams {
            pixels_have_alpha: true,
            alpha_threshold: 128,
            use_transparent_indices_for_black: false,
            ..*params
        };
        let trial = self.compute_internal(&inner, &trial_pixels, &mut trial_selectors);

        let metric = DistanceFn::from_params(params);
        let black_error: u64 = pixels
            .iter()
            .filter(|p| is_near_black(p))
            .map(|p| metric.distance(p.rgb(), [0, 0, 0]) as u64)
            .sum();
        let total = trial.error + black_error;

        let result = if trial.alpha_block && total < primary.error {
            debug!(
                "Near-black pixels as transparent: error {} -> {}",
                primary.error, total
            );
            selectors.copy_from_slice(&trial_selectors);
            Bc1EncodeResults {
                error: total,
                ..trial
            }
        } else {
            primary
        };

        self.trial_pixels = trial_pixels;
        self.trial_selectors = trial_selectors;
        result
    }
}
