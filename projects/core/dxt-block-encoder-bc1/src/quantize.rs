//! Mapping 8-bit colours onto the 5:6:5 endpoint lattice.
//!
//! Two families of tables are built once per process:
//!
//! - *nearest* tables give the 5 or 6-bit level whose expansion is closest to an 8-bit value;
//! - *solid* tables give, for every 8-bit value, the endpoint pair whose interpolated entry
//!   (`(2·e0 + e1) / 3` or `(e0 + e1) / 2`, truncating) lands closest to it.
//!
//! The solid tables are what make single-colour blocks exact far more often than plain
//! endpoint quantization: a value that is not a bit-replicated 5-bit level may still be hit
//! by an interpolated entry.

use dxt_block_encoder_common::color_565::{expand5, expand6, Color565, COMPONENT_MAX};
use glam::Vec3;
use std::sync::OnceLock;

/// Which interpolated entry a solid colour is encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SolidMix {
    /// `(2·e0 + e1) / 3`, available in 4-colour mode.
    Thirds,
    /// `(e0 + e1) / 2`, available in 3-colour mode.
    Half,
}

struct Tables {
    nearest5: [u8; 256],
    nearest6: [u8; 256],
    thirds5: [[u8; 2]; 256],
    thirds6: [[u8; 2]; 256],
    half5: [[u8; 2]; 256],
    half6: [[u8; 2]; 256],
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| Tables {
        nearest5: build_nearest(31, expand5),
        nearest6: build_nearest(63, expand6),
        thirds5: build_solid(31, expand5, SolidMix::Thirds),
        thirds6: build_solid(63, expand6, SolidMix::Thirds),
        half5: build_solid(31, expand5, SolidMix::Half),
        half6: build_solid(63, expand6, SolidMix::Half),
    })
}

fn build_nearest(max: u8, expand: fn(u8) -> u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (value, entry) in table.iter_mut().enumerate() {
        let mut best_err = u32::MAX;
        for level in 0..=max {
            let err = (expand(level) as i32 - value as i32).unsigned_abs();
            if err < best_err {
                best_err = err;
                *entry = level;
            }
        }
    }
    table
}

fn build_solid(max: u8, expand: fn(u8) -> u8, mix: SolidMix) -> [[u8; 2]; 256] {
    let mut table = [[0u8; 2]; 256];
    for (value, entry) in table.iter_mut().enumerate() {
        let mut best_err = u32::MAX;
        for a in 0..=max {
            for b in 0..=max {
                let e0 = expand(a) as i32;
                let e1 = expand(b) as i32;
                let mixed = match mix {
                    SolidMix::Thirds => (2 * e0 + e1) / 3,
                    SolidMix::Half => (e0 + e1) / 2,
                };
                let err = (mixed - value as i32).unsigned_abs();
                if err < best_err {
                    best_err = err;
                    *entry = [a, b];
                }
            }
        }
    }
    table
}

/// Nearest lattice point to an 8-bit colour, per channel.
#[inline]
pub(crate) fn quantize(rgb: [u8; 3]) -> Color565 {
    let t = tables();
    Color565::from_components(
        t.nearest5[rgb[0] as usize],
        t.nearest6[rgb[1] as usize],
        t.nearest5[rgb[2] as usize],
    )
}

/// Quantizes a colour in 8-bit space.
///
/// With `alternate` unset this is [`quantize`] of the rounded colour. With it set, each
/// channel is floored on the lattice instead, which lands on the other side of the
/// rounding boundary for roughly half of all inputs.
#[inline]
pub(crate) fn quantize_f32(rgb: Vec3, alternate: bool) -> Color565 {
    let rgb = rgb.clamp(Vec3::ZERO, Vec3::splat(255.0));
    if alternate {
        let max = lattice_max();
        let level = (rgb / 255.0 * max).floor().min(max);
        Color565::from_components(level.x as u8, level.y as u8, level.z as u8)
    } else {
        let rounded = rgb.round();
        quantize([rounded.x as u8, rounded.y as u8, rounded.z as u8])
    }
}

/// The endpoint pair whose `mix` entry is closest to `rgb`, returned as `(color0, color1)`.
#[inline]
pub(crate) fn solid_pair(rgb: [u8; 3], mix: SolidMix) -> (Color565, Color565) {
    let t = tables();
    let (table5, table6) = match mix {
        SolidMix::Thirds => (&t.thirds5, &t.thirds6),
        SolidMix::Half => (&t.half5, &t.half6),
    };
    let [r0, r1] = table5[rgb[0] as usize];
    let [g0, g1] = table6[rgb[1] as usize];
    let [b0, b1] = table5[rgb[2] as usize];
    (
        Color565::from_components(r0, g0, b0),
        Color565::from_components(r1, g1, b1),
    )
}

/// Largest lattice coordinate per channel.
#[inline]
pub(crate) fn lattice_max() -> Vec3 {
    Vec3::new(
        COMPONENT_MAX[0] as f32,
        COMPONENT_MAX[1] as f32,
        COMPONENT_MAX[2] as f32,
    )
}

/// Lattice coordinates of an endpoint.
#[inline]
pub(crate) fn to_lattice(color: Color565) -> Vec3 {
    Vec3::new(color.r5() as f32, color.g6() as f32, color.b5() as f32)
}

/// Nearest lattice point to a point in lattice coordinates, clamped to the lattice.
#[inline]
pub(crate) fn from_lattice(point: Vec3) -> Color565 {
    let p = point.round().clamp(Vec3::ZERO, lattice_max());
    Color565::from_components(p.x as u8, p.y as u8, p.z as u8)
}
