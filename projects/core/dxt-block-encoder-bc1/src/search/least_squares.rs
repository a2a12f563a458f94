use super::evaluate_neighbours;
use crate::evaluate::Evaluator;
use crate::quantize::quantize_f32;
use crate::solution::SolutionCoordinates;
use glam::Vec3;

const MIN_DETERMINANT: f32 = 1e-6;

/// Refits both endpoints to the current selectors, repeating while the refit improves.
///
/// Every fit is quantized both to the nearest lattice point and floor-biased; the latter is
/// scored as the alternate rounding pass. With `lattice_search` the neighbours of the
/// nearest quantization are scored as well.
pub(super) fn refine(ev: &mut Evaluator, iterations: u8, lattice_search: bool) {
    for _ in 0..iterations {
        if ev.best.error == 0 || ev.best.enforce_selector.is_some() {
            break;
        }
        let before = ev.best.error;
        let Some((e0, e1)) = fit(ev) else {
            break;
        };

        let nearest = SolutionCoordinates::new(quantize_f32(e0, false), quantize_f32(e1, false));
        ev.evaluate(nearest, false);
        let floored = SolutionCoordinates::new(quantize_f32(e0, true), quantize_f32(e1, true));
        ev.evaluate(floored, true);

        if lattice_search {
            evaluate_neighbours(ev, nearest.low, nearest.high, false);
            evaluate_neighbours(ev, nearest.high, nearest.low, false);
        }

        if ev.best.error >= before {
            break;
        }
    }
}

/// Position of a selector's entry between `color0` (0) and `color1` (1).
#[inline]
fn interpolation_weight(selector: u8, alpha_block: bool) -> f32 {
    match (selector, alpha_block) {
        (1, _) => 1.0,
        (2, false) => 1.0 / 3.0,
        (3, false) => 2.0 / 3.0,
        (2, true) => 0.5,
        _ => 0.0,
    }
}

/// Least-squares endpoints, in 8-bit space, for the best solution's selectors.
/// [`None`] when the selectors do not determine both endpoints.
fn fit(ev: &Evaluator) -> Option<(Vec3, Vec3)> {
    let alpha_block = ev.best.alpha_block;
    let (mut aa, mut ab, mut bb) = (0.0f32, 0.0f32, 0.0f32);
    let (mut ax, mut bx) = (Vec3::ZERO, Vec3::ZERO);

    for (unique, &selector) in ev.table.colors.iter().zip(&ev.best.selectors) {
        let t = interpolation_weight(selector, alpha_block);
        let s = 1.0 - t;
        let w = unique.weight as f32;
        let x = Vec3::from(unique.color.rgb().map(f32::from)) * w;
        aa += w * s * s;
        ab += w * s * t;
        bb += w * t * t;
        ax += x * s;
        bx += x * t;
    }

    let det = aa * bb - ab * ab;
    if det.abs() < MIN_DETERMINANT {
        return None;
    }
    let e0 = (ax * bb - bx * ab) / det;
    let e1 = (bx * aa - ax * ab) / det;
    Some((e0, e1))
}
