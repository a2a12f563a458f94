#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

mod cache;
mod channel_stats;
mod compressor;
mod evaluate;
mod palette;
mod principal_axis;
mod quantize;
mod search;
mod solid;
mod solution;
mod unique_colors;

pub mod error;
pub mod params;
pub mod util;

pub use cache::DEFAULT_CACHE_CAPACITY;
pub use compressor::{Bc1Compressor, Bc1EncodeResults, MAX_BLOCK_PIXELS};
pub use error::Bc1EncodeError;
pub use palette::{DistanceFn, Palette, PERCEPTUAL_WEIGHTS, TRANSPARENT_SELECTOR};
pub use params::{Bc1EncodeParams, Bc1Quality};
pub use solution::SolutionCoordinates;
pub use unique_colors::UniqueColor;

#[cfg(test)]
pub(crate) mod test_prelude;

#[cfg(test)]
mod tests;
