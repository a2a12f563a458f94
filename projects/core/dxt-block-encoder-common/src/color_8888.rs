//! # RGBA8888 Pixels
//!
//! [`Color8888`] is one 8-bit-per-channel pixel, laid out `r, g, b, a` in memory so a
//! slice of pixels can be read as tightly packed RGBA bytes.

use crate::color_565::Color565;

/// Represents a single RGBA8888 pixel, either a source pixel fed to an encoder
/// or a pixel of a decoded block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Color8888 {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255)
    pub a: u8,
}

impl Color8888 {
    /// Constructs a new [`Color8888`] from the specified red, green, blue, and alpha components.
    ///
    /// # Examples
    ///
    /// ```
    /// use dxt_block_encoder_common::color_8888::Color8888;
    ///
    /// let pixel = Color8888::new(255, 0, 0, 255);
    /// assert_eq!((pixel.r, pixel.g, pixel.b, pixel.a), (255, 0, 0, 255));
    /// ```
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Red, green and blue as an array.
    #[inline]
    pub const fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Packs red, green and blue into the low 24 bits of a `u32`, ignoring alpha.
    /// Two pixels with the same visible colour produce the same key.
    #[inline]
    pub const fn without_alpha(&self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16)
    }

    /// Returns a copy of this pixel with alpha forced to 255.
    #[inline]
    pub const fn opaque(&self) -> Self {
        Self::new(self.r, self.g, self.b, 255)
    }

    /// Truncates this pixel to [`Color565`], dropping alpha.
    #[inline]
    pub const fn to_color_565(&self) -> Color565 {
        Color565::from_rgb(self.r, self.g, self.b)
    }
}
