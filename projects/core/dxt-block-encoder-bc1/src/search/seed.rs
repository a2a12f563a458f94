use super::least_squares;
use crate::evaluate::Evaluator;
use crate::principal_axis::{channel_scale, PrincipalAxis};
use crate::quantize::{quantize, quantize_f32};
use crate::solution::SolutionCoordinates;
use crate::unique_colors::UniqueColor;
use glam::Vec3;

const KMEANS_ITERATIONS: usize = 8;

/// Scores the pair spanning the block's extent along the principal axis.
pub(super) fn project_extent(ev: &mut Evaluator, axis: &PrincipalAxis) {
    let (lo, hi) = axis.extent(&ev.table.colors);
    let low = quantize_f32(axis.mean + axis.axis * lo, false);
    let high = quantize_f32(axis.mean + axis.axis * hi, false);
    ev.evaluate(SolutionCoordinates::new(low, high), false);
}

/// Seeds from the colours themselves (up to four) or from four cluster means.
pub(super) fn quad_median(ev: &mut Evaluator, axis: &PrincipalAxis) {
    let n = ev.table.len();
    if n <= 4 {
        let mut quantized = [Default::default(); 4];
        for (slot, unique) in quantized.iter_mut().zip(&ev.table.colors) {
            *slot = quantize(unique.color.rgb());
        }
        for i in 0..n {
            for j in i + 1..n {
                ev.evaluate(SolutionCoordinates::new(quantized[i], quantized[j]), false);
            }
        }
    } else {
        let means = four_means(&ev.table.colors, axis, ev.perceptual).map(|m| quantize_f32(m, false));
        for i in 0..4 {
            for j in i + 1..4 {
                ev.evaluate(SolutionCoordinates::new(means[i], means[j]), false);
            }
        }
    }

    least_squares::refine(ev, 1, false);
}

/// Weighted Lloyd iteration to four means, seeded evenly along the principal axis.
/// Distances are measured in the same scaled space the axis was solved in.
fn four_means(colors: &[UniqueColor], axis: &PrincipalAxis, perceptual: bool) -> [Vec3; 4] {
    let scale = channel_scale(perceptual) / 255.0;
    let (lo, hi) = axis.extent(colors);
    let mut means = [0.0f32, 1.0 / 3.0, 2.0 / 3.0, 1.0]
        .map(|f| (axis.mean + axis.axis * (lo + (hi - lo) * f)) * scale);

    let points: Vec<Vec3> = colors
        .iter()
        .map(|unique| Vec3::from(unique.color.rgb().map(f32::from)) * scale)
        .collect();
    let mut cluster = vec![usize::MAX; colors.len()];

    for _ in 0..KMEANS_ITERATIONS {
        let mut changed = false;
        for (point, assigned) in points.iter().zip(cluster.iter_mut()) {
            let nearest = (0..4)
                .min_by(|&a, &b| {
                    point
                        .distance_squared(means[a])
                        .total_cmp(&point.distance_squared(means[b]))
                })
                .unwrap_or(0);
            if *assigned != nearest {
                *assigned = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = [Vec3::ZERO; 4];
        let mut weights = [0.0f32; 4];
        for ((point, &k), unique) in points.iter().zip(&cluster).zip(colors) {
            sums[k] += *point * unique.weight as f32;
            weights[k] += unique.weight as f32;
        }
        for k in 0..4 {
            // An empty cluster keeps its previous mean.
            if weights[k] > 0.0 {
                means[k] = sums[k] / weights[k];
            }
        }
    }

    means.map(|m| m / scale)
}
