//! Utilities for working with BC1 blocks outside the encoder.

mod bc1_decode;
pub use bc1_decode::*;
