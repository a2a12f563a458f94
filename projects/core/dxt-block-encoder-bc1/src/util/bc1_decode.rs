//! BC1 (DXT1) decoding; based on etcpak
//! <https://github.com/wolfpld/etcpak> and MSDN
//! <https://learn.microsoft.com/en-us/windows/win32/direct3d9/opaque-and-1-bit-alpha-textures>
//!
//! Uses the 'ideal' rounding/computing method described in the DX9 docs, as opposed to DX10, AMD or Nvidia
//! method. This is the palette the encoder measures its error against.

use crate::palette::{Palette, TRANSPARENT_SELECTOR};
use dxt_block_encoder_common::{
    color_565::Color565, color_8888::Color8888, decoded_4x4_block::Decoded4x4Block,
};

/// Decodes a BC1 block into a structured representation of pixels
///
/// # Returns
///
/// A [`Decoded4x4Block`] containing all 16 decoded pixels, else [`None`] if the slice
/// is shorter than 8 bytes.
///
/// # Example
///
/// ```
/// use dxt_block_encoder_bc1::util::decode_bc1_block;
/// use dxt_block_encoder_common::color_8888::Color8888;
///
/// // c0 = c1 = pure red, every pixel index 0
/// let bc1_block = [0x00, 0xF8, 0x00, 0xF8, 0x00, 0x00, 0x00, 0x00];
///
/// let decoded = decode_bc1_block(&bc1_block).unwrap();
/// assert_eq!(decoded.get_pixel(0, 0), Color8888::new(255, 0, 0, 255));
/// ```
#[inline]
pub fn decode_bc1_block(src: &[u8]) -> Option<Decoded4x4Block> {
    let src: &[u8; 8] = src.get(..8)?.try_into().ok()?;

    // Extract color endpoints and index data
    let c0 = Color565::from_raw(u16::from_le_bytes([src[0], src[1]]));
    let c1 = Color565::from_raw(u16::from_le_bytes([src[2], src[3]]));
    let idx: u32 = u32::from_le_bytes([src[4], src[5], src[6], src[7]]);

    let palette = Palette::from_endpoints(c0, c1);
    let mut dict = palette
        .colors
        .map(|[r, g, b]| Color8888::new(r, g, b, 255));
    if palette.alpha_block {
        // Transparent black
        dict[TRANSPARENT_SELECTOR as usize] = Color8888::new(0, 0, 0, 0);
    }

    let mut result = Decoded4x4Block::new(Color8888::new(0, 0, 0, 0));
    for (pixel, out) in result.pixels.iter_mut().enumerate() {
        *out = dict[((idx >> (pixel * 2)) & 0x3) as usize];
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_decode_bc1_block() {
        // Test case: Simple red color
        let bc1_block = [
            0x00, 0xF8, // c0 = R:31 G:0 B:0
            0x00, 0xF8, // c1 = R:31 G:0 B:0 (identical to create solid color)
            0x00, 0x00, 0x00, 0x00, // All pixels use index 0
        ];

        let decoded = decode_bc1_block(&bc1_block).unwrap();
        assert!(decoded.has_identical_pixels());
        assert_eq!(decoded.get_pixel(3, 3), Color8888::new(255, 0, 0, 255));
    }

    #[test]
    fn can_decode_bc1_block_with_transparency() {
        // Test case with transparency (c1 > c0 for 3-color mode)
        let bc1_block = [
            0x00, 0xF0, // c0 = R:30 G:0 B:0 (intentionally less than c1)
            0x00, 0xF8, // c1 = R:31 G:0 B:0
            0xFF, 0xFF, 0xFF, 0xFF, // All pixels use index 3 (transparent)
        ];

        let decoded = decode_bc1_block(&bc1_block).unwrap();
        assert_eq!(decoded.count_below_alpha(1), 16);
        assert_eq!(decoded.get_pixel(1, 2), Color8888::new(0, 0, 0, 0));
    }

    #[test]
    fn can_decode_four_color_indices() {
        // c0 = white, c1 = black; pixel n uses index n % 4
        let bc1_block = [0xFF, 0xFF, 0x00, 0x00, 0xE4, 0xE4, 0xE4, 0xE4];
        let decoded = decode_bc1_block(&bc1_block).unwrap();
        let expected = [
            Color8888::new(255, 255, 255, 255),
            Color8888::new(0, 0, 0, 255),
            Color8888::new(170, 170, 170, 255),
            Color8888::new(85, 85, 85, 255),
        ];
        for (pixel, color) in decoded.pixels.iter().enumerate() {
            assert_eq!(*color, expected[pixel % 4]);
        }
    }

    #[test]
    fn short_slice_is_rejected() {
        assert!(decode_bc1_block(&[0u8; 7]).is_none());
    }
}
