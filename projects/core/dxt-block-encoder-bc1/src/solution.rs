//! Candidate and winning endpoint pairs.

use dxt_block_encoder_common::color_565::Color565;

/// A pair of endpoints.
///
/// As a search candidate the order is irrelevant; the evaluator derives the order each
/// palette mode needs. Stored in a [`Solution`] the pair is canonical: `low` is `color0`
/// and `high` is `color1` of the encoded block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SolutionCoordinates {
    /// First endpoint word (`color0` once canonical).
    pub low: Color565,
    /// Second endpoint word (`color1` once canonical).
    pub high: Color565,
}

impl SolutionCoordinates {
    /// Creates a new pair.
    #[inline]
    pub const fn new(low: Color565, high: Color565) -> Self {
        Self { low, high }
    }

    /// Order-independent 32-bit key of the pair.
    #[inline]
    pub fn key(&self) -> u32 {
        let a = self.low.raw_value() as u32;
        let b = self.high.raw_value() as u32;
        (a.max(b) << 16) | a.min(b)
    }
}

/// The best encoding found so far for a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Solution {
    pub coords: SolutionCoordinates,
    /// Selector of every unique colour, in table order.
    pub selectors: Vec<u8>,
    pub error: u64,
    pub alpha_block: bool,
    /// The endpoints came from the floor-biased quantization of a least-squares fit.
    pub alternate_rounding: bool,
    /// Set when the pair was widened from a single colour; every opaque pixel uses this
    /// selector.
    pub enforce_selector: Option<u8>,
}

impl Default for Solution {
    fn default() -> Self {
        Self {
            coords: SolutionCoordinates::default(),
            selectors: Vec::new(),
            error: u64::MAX,
            alpha_block: false,
            alternate_rounding: false,
            enforce_selector: None,
        }
    }
}

impl Solution {
    /// Forgets the previous block and sizes the selectors for `unique_colors` entries.
    pub fn reset(&mut self, unique_colors: usize) {
        self.coords = SolutionCoordinates::default();
        self.selectors.clear();
        self.selectors.resize(unique_colors, 0);
        self.error = u64::MAX;
        self.alpha_block = false;
        self.alternate_rounding = false;
        self.enforce_selector = None;
    }

    /// All unique colours share one selector.
    #[inline]
    pub fn has_uniform_selectors(&self) -> bool {
        self.selectors.windows(2).all(|pair| pair[0] == pair[1])
    }
}
