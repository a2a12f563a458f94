//! Dominant direction of colour variation within a block.

use crate::palette::PERCEPTUAL_WEIGHTS;
use crate::unique_colors::UniqueColor;
use glam::{Mat3, Vec3};

const POWER_ITERATIONS: usize = 8;
const POWER_SEED: Vec3 = Vec3::new(0.9, 1.0, 0.7);
const CONVERGENCE_EPSILON: f32 = 1e-8;
const DEGENERATE_EPSILON: f32 = 1e-10;

/// A perceptual axis with a component above this is re-solved with weaker weighting.
const SATURATED_AXIS: f32 = 0.8;

/// Used when the block has no measurable spread; runs from black to white.
pub(crate) const DEFAULT_AXIS: Vec3 = Vec3::splat(0.577_350_26);

/// Weighted mean and principal axis of a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PrincipalAxis {
    /// Mean colour, 8-bit scale.
    pub mean: Vec3,
    /// Unit direction in RGB. The component of largest magnitude is positive.
    pub axis: Vec3,
}

impl PrincipalAxis {
    /// Signed distance of `rgb` from the mean along the axis.
    #[inline]
    pub fn project(&self, rgb: [u8; 3]) -> f32 {
        (Vec3::from(rgb.map(f32::from)) - self.mean).dot(self.axis)
    }

    /// The smallest and largest projection over `colors`.
    pub fn extent(&self, colors: &[UniqueColor]) -> (f32, f32) {
        colors.iter().fold((0.0f32, 0.0f32), |(lo, hi), unique| {
            let t = self.project(unique.color.rgb());
            (lo.min(t), hi.max(t))
        })
    }
}

/// Per-channel scale applied before the covariance is built.
pub(crate) fn channel_scale(perceptual: bool) -> Vec3 {
    if !perceptual {
        return Vec3::ONE;
    }
    let [r, g, b] = PERCEPTUAL_WEIGHTS;
    let max = r.max(g).max(b) as f32;
    Vec3::new(
        (r as f32 / max).sqrt(),
        (g as f32 / max).sqrt(),
        (b as f32 / max).sqrt(),
    )
}

/// Computes the weighted mean and dominant eigenvector of `colors`.
pub(crate) fn analyze(colors: &[UniqueColor], perceptual: bool) -> PrincipalAxis {
    let scale = channel_scale(perceptual);
    let mut result = solve(colors, scale);

    // Heavily weighted green can pull a saturated block's axis onto a single channel.
    if perceptual && result.axis.abs().max_element() > SATURATED_AXIS {
        result = solve(colors, scale.lerp(Vec3::ONE, 0.5));
    }
    result
}

fn solve(colors: &[UniqueColor], scale: Vec3) -> PrincipalAxis {
    let total: f32 = colors.iter().map(|c| c.weight as f32).sum();
    if total <= 0.0 {
        return PrincipalAxis {
            mean: Vec3::ZERO,
            axis: DEFAULT_AXIS,
        };
    }

    let point = |unique: &UniqueColor| Vec3::from(unique.color.rgb().map(f32::from)) / 255.0 * scale;

    let mean = colors
        .iter()
        .fold(Vec3::ZERO, |acc, c| acc + point(c) * c.weight as f32)
        / total;

    let mut covariance = Mat3::ZERO;
    for unique in colors {
        let d = point(unique) - mean;
        let w = unique.weight as f32;
        covariance += Mat3::from_cols(d * d.x, d * d.y, d * d.z) * w;
    }

    let mean_rgb = mean / scale * 255.0;
    let axis = match power_iterate(&covariance) {
        Some(v) => canonical_direction(v / scale),
        None => DEFAULT_AXIS,
    };
    PrincipalAxis {
        mean: mean_rgb,
        axis,
    }
}

fn power_iterate(covariance: &Mat3) -> Option<Vec3> {
    let trace = covariance.x_axis.x + covariance.y_axis.y + covariance.z_axis.z;
    if trace < DEGENERATE_EPSILON {
        return None;
    }

    let mut v = POWER_SEED;
    for _ in 0..POWER_ITERATIONS {
        let next = *covariance * v;
        let magnitude = next.abs().max_element();
        if magnitude < DEGENERATE_EPSILON {
            return None;
        }
        let next = next / magnitude;
        let converged = (next - v).length_squared() < CONVERGENCE_EPSILON;
        v = next;
        if converged {
            break;
        }
    }
    Some(v)
}

fn canonical_direction(v: Vec3) -> Vec3 {
    let v = v.normalize_or_zero();
    if v == Vec3::ZERO {
        return DEFAULT_AXIS;
    }
    let largest = if v.x.abs() >= v.y.abs() && v.x.abs() >= v.z.abs() {
        v.x
    } else if v.y.abs() >= v.z.abs() {
        v.y
    } else {
        v.z
    };
    if largest < 0.0 {
        -v
    } else {
        v
    }
}
