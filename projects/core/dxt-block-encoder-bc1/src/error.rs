//! Error types for BC1 encode operations.

use thiserror::Error;

/// Errors that can occur when encoding a BC1 block.
///
/// These are all caller contract violations; a block that simply cannot be represented
/// losslessly is not an error and is reported through the result's `error` field instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Bc1EncodeError {
    /// No pixels were supplied.
    #[error("Cannot encode an empty block: at least one pixel is required.")]
    EmptyBlock,

    /// More pixels were supplied than one block may hold.
    #[error("Block has {actual} pixels, but at most {max} are supported.")]
    TooManyPixels {
        /// The largest supported pixel count
        max: usize,
        /// The number of pixels supplied
        actual: usize,
    },

    /// The selector output buffer cannot hold one selector per pixel.
    #[error("Selector buffer too small: need {needed} entries, but only {actual} available.")]
    SelectorBufferTooSmall {
        /// The required number of selectors
        needed: usize,
        /// The actual size of the buffer
        actual: usize,
    },

    /// Wire packing was requested for a block that does not have exactly 16 pixels.
    #[error("Only 4x4 blocks can be packed into BC1 bytes, but the block has {0} pixels.")]
    NotAFullBlock(usize),
}
