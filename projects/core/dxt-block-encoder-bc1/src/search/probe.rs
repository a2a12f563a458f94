use super::{evaluate_neighbours, push_unique};
use crate::evaluate::Evaluator;
use crate::principal_axis::PrincipalAxis;
use crate::quantize::{from_lattice, lattice_max, to_lattice};
use crate::solution::SolutionCoordinates;
use dxt_block_encoder_common::color_565::Color565;

/// Probes pairs of lattice points along the principal axis.
///
/// The first pass spreads `offsets` to both sides of the mean; each further pass spreads
/// them around the two current best endpoints, for as long as the pass before improved.
pub(super) fn axis_probe(ev: &mut Evaluator, axis: &PrincipalAxis, offsets: &[u8], passes: u8) {
    let to_levels = lattice_max() / 255.0;
    let mut direction = axis.axis * to_levels;
    let longest = direction.abs().max_element();
    if longest > 0.0 {
        direction /= longest;
    }
    let center = axis.mean * to_levels;

    let mut lows = Vec::with_capacity(offsets.len() * 2);
    let mut highs = Vec::with_capacity(offsets.len() * 2);
    for &k in offsets {
        let step = direction * k as f32;
        push_unique(&mut lows, from_lattice(center - step));
        push_unique(&mut highs, from_lattice(center + step));
    }

    let before = ev.best.error;
    evaluate_grid(ev, &lows, &highs);
    let mut improved = ev.best.error < before;

    for _ in 1..passes {
        if !improved || ev.best.error == 0 {
            break;
        }
        let before = ev.best.error;
        let first = to_lattice(ev.best.coords.low);
        let second = to_lattice(ev.best.coords.high);

        lows.clear();
        highs.clear();
        for &k in offsets {
            let step = direction * k as f32;
            for sign in [1.0f32, -1.0] {
                push_unique(&mut lows, from_lattice(first + step * sign));
                push_unique(&mut highs, from_lattice(second + step * sign));
            }
        }
        evaluate_grid(ev, &lows, &highs);
        improved = ev.best.error < before;
    }
}

fn evaluate_grid(ev: &mut Evaluator, lows: &[Color565], highs: &[Color565]) {
    for &low in lows {
        for &high in highs {
            ev.evaluate(SolutionCoordinates::new(low, high), false);
        }
    }
}

/// Moves each endpoint to its best lattice neighbour, repeating while that helps.
pub(super) fn lattice_refine(ev: &mut Evaluator, coarse: bool, max_iterations: u8) {
    for _ in 0..max_iterations {
        if ev.best.error == 0 {
            break;
        }
        let before = ev.best.error;
        let SolutionCoordinates { low, high } = ev.best.coords;
        evaluate_neighbours(ev, low, high, coarse);
        evaluate_neighbours(ev, high, low, coarse);
        if ev.best.error >= before {
            break;
        }
    }
}
