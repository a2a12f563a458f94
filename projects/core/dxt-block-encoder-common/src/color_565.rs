//! # RGB565 Endpoint Colours
//!
//! A BC1 endpoint is a 16-bit word holding 5 bits of red, 6 bits of green and 5 bits of blue:
//!
//! ```text
//! bit: 15    11 10     5 4     0
//!      +-------+--------+-------+
//!      |   R   |   G    |   B   |
//!      +-------+--------+-------+
//! ```
//!
//! The set of all such words is the endpoint *lattice*. Encoders search this lattice one
//! component at a time, so besides the usual packing and expansion this module exposes the
//! raw per-channel components (`0..=31` / `0..=63` / `0..=31`) and clamped lattice steps.

use crate::color_8888::Color8888;

/// Largest raw value of each channel, indexed red, green, blue.
pub const COMPONENT_MAX: [u8; 3] = [31, 63, 31];

/// Represents a 16-bit RGB565 color (5 bits red, 6 bits green, 5 bits blue)
/// As encountered in many of the BC1 formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Color565 {
    /// The underlying 16-bit RGB565 value
    value: u16,
}

impl Color565 {
    /// Black; the smallest packed value.
    pub const BLACK: Self = Self { value: 0 };

    /// White; the largest packed value.
    pub const WHITE: Self = Self { value: 0xFFFF };

    /// Creates a new [`Color565`] from the raw 16-bit value
    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// Creates a new [`Color565`] from 8-bit RGB components by truncating the low bits.
    ///
    /// This does not pick the *nearest* lattice point; encoders should quantize through
    /// their nearest-level tables instead.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        // Same single expression as etcpak's to565.
        Self {
            value: ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3),
        }
    }

    /// Creates a new [`Color565`] from raw lattice components.
    ///
    /// # Parameters
    ///
    /// - `r5`: The red component (0-31)
    /// - `g6`: The green component (0-63)
    /// - `b5`: The blue component (0-31)
    ///
    /// Out of range inputs are masked to their channel width.
    #[inline]
    pub const fn from_components(r5: u8, g6: u8, b5: u8) -> Self {
        Self {
            value: ((r5 as u16 & 0x1F) << 11) | ((g6 as u16 & 0x3F) << 5) | (b5 as u16 & 0x1F),
        }
    }

    /// Returns the raw 16-bit value
    #[inline]
    pub const fn raw_value(&self) -> u16 {
        self.value
    }

    /// Raw 5-bit red component.
    #[inline]
    pub const fn r5(&self) -> u8 {
        (self.value >> 11) as u8
    }

    /// Raw 6-bit green component.
    #[inline]
    pub const fn g6(&self) -> u8 {
        ((self.value >> 5) & 0x3F) as u8
    }

    /// Raw 5-bit blue component.
    #[inline]
    pub const fn b5(&self) -> u8 {
        (self.value & 0x1F) as u8
    }

    /// Raw component for `channel` (0 = red, 1 = green, 2 = blue).
    #[inline]
    pub fn component(&self, channel: usize) -> u8 {
        match channel {
            0 => self.r5(),
            1 => self.g6(),
            _ => self.b5(),
        }
    }

    /// Returns a copy with the raw component for `channel` replaced.
    #[inline]
    pub fn with_component(&self, channel: usize, value: u8) -> Self {
        match channel {
            0 => Self::from_components(value, self.g6(), self.b5()),
            1 => Self::from_components(self.r5(), value, self.b5()),
            _ => Self::from_components(self.r5(), self.g6(), value),
        }
    }

    /// Moves the colour by the given number of lattice steps per channel, clamping each
    /// channel to its valid range.
    #[inline]
    pub fn offset(&self, dr: i32, dg: i32, db: i32) -> Self {
        let step = |v: u8, d: i32, max: u8| (v as i32 + d).clamp(0, max as i32) as u8;
        Self::from_components(
            step(self.r5(), dr, COMPONENT_MAX[0]),
            step(self.g6(), dg, COMPONENT_MAX[1]),
            step(self.b5(), db, COMPONENT_MAX[2]),
        )
    }

    // NOTE: https://fgiesen.wordpress.com/2021/10/04/gpu-bcn-decoding/
    // BC1 as written in the D3D11 functional spec first expands the endpoint values from 5 or 6 bits
    // to 8 bits by replicating the top bits; all three vendors appear to do this or something equivalent.

    /// Extracts the expanded 8-bit red component
    #[inline]
    pub const fn red(&self) -> u8 {
        expand5(self.r5())
    }

    /// Extracts the expanded 8-bit green component
    #[inline]
    pub const fn green(&self) -> u8 {
        expand6(self.g6())
    }

    /// Extracts the expanded 8-bit blue component
    #[inline]
    pub const fn blue(&self) -> u8 {
        expand5(self.b5())
    }

    /// Expanded 8-bit value of `channel` (0 = red, 1 = green, 2 = blue).
    #[inline]
    pub fn expanded(&self, channel: usize) -> u8 {
        match channel {
            0 => self.red(),
            1 => self.green(),
            _ => self.blue(),
        }
    }

    /// Expanded 8-bit red, green and blue.
    #[inline]
    pub const fn to_rgb(&self) -> [u8; 3] {
        [self.red(), self.green(), self.blue()]
    }

    /// Compares two [`Color565`] values
    ///
    /// A BC1 decoder runs in four colour mode exactly when `color0.greater_than(&color1)`.
    #[inline]
    pub const fn greater_than(&self, other: &Self) -> bool {
        self.value > other.value
    }

    /// Converts this [`Color565`] to a [`Color8888`] with full opacity (alpha=255)
    ///
    /// # Examples
    ///
    /// ```
    /// use dxt_block_encoder_common::color_565::Color565;
    ///
    /// let rgba8888 = Color565::from_rgb(255, 0, 0).to_color_8888();
    /// assert_eq!((rgba8888.r, rgba8888.g, rgba8888.b, rgba8888.a), (255, 0, 0, 255));
    /// ```
    #[inline]
    pub fn to_color_8888(&self) -> Color8888 {
        Color8888::new(self.red(), self.green(), self.blue(), 255)
    }
}

/// Expands a 5-bit channel to 8 bits by replicating the top bits.
#[inline]
pub const fn expand5(v: u8) -> u8 {
    (v << 3) | (v >> 2)
}

/// Expands a 6-bit channel to 8 bits by replicating the top bits.
#[inline]
pub const fn expand6(v: u8) -> u8 {
    (v << 2) | (v >> 4)
}

/// Expands a raw component of `channel` (0 = red, 1 = green, 2 = blue) to 8 bits.
#[inline]
pub const fn expand_component(channel: usize, v: u8) -> u8 {
    if channel == 1 {
        expand6(v)
    } else {
        expand5(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 0)]
    #[case(31, 63, 31)]
    #[case(17, 40, 3)]
    #[case(1, 0, 30)]
    fn components_round_trip(#[case] r: u8, #[case] g: u8, #[case] b: u8) {
        let color = Color565::from_components(r, g, b);
        assert_eq!((color.r5(), color.g6(), color.b5()), (r, g, b));
        for channel in 0..3 {
            assert_eq!(
                color.expanded(channel),
                expand_component(channel, color.component(channel))
            );
        }
    }

    #[test]
    fn offset_clamps_to_lattice() {
        let white = Color565::WHITE;
        assert_eq!(white.offset(1, 1, 1), white);
        assert_eq!(Color565::BLACK.offset(-1, -3, -1), Color565::BLACK);
        assert_eq!(
            Color565::from_components(10, 10, 10).offset(1, -2, 0),
            Color565::from_components(11, 8, 10)
        );
    }

    #[test]
    fn with_component_replaces_single_channel() {
        let color = Color565::from_components(3, 4, 5);
        assert_eq!(color.with_component(0, 31), Color565::from_components(31, 4, 5));
        assert_eq!(color.with_component(1, 63), Color565::from_components(3, 63, 5));
        assert_eq!(color.with_component(2, 0), Color565::from_components(3, 4, 0));
    }

    #[test]
    fn expansion_hits_extremes() {
        assert_eq!(expand5(0), 0);
        assert_eq!(expand5(31), 255);
        assert_eq!(expand6(0), 0);
        assert_eq!(expand6(63), 255);
        assert_eq!(Color565::WHITE.to_rgb(), [255, 255, 255]);
    }
}
