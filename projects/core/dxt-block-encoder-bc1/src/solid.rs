//! Single-colour encodings.

use crate::evaluate::Evaluator;
use crate::quantize::{quantize, solid_pair, SolidMix};
use crate::solution::SolutionCoordinates;

/// Scores the endpoint pairs whose interpolated entries best reproduce `rgb`: the 1/3 entry
/// in 4-colour mode and the 1/2 entry in 3-colour mode, as the block's modes allow.
pub(crate) fn try_solid(ev: &mut Evaluator, rgb: [u8; 3]) {
    if ev.modes.four_color {
        let (color0, color1) = solid_pair(rgb, SolidMix::Thirds);
        ev.evaluate(SolutionCoordinates::new(color0, color1), false);
    }
    if ev.modes.three_color {
        let (color0, color1) = solid_pair(rgb, SolidMix::Half);
        ev.evaluate(SolutionCoordinates::new(color0, color1), false);
    }
}

/// Encodes a block with a single unique colour without searching.
///
/// For the separable metrics this is optimal: per channel the tables reach the nearest
/// value any palette entry can take.
pub(crate) fn encode_single(ev: &mut Evaluator) {
    let Some(unique) = ev.table.colors.first() else {
        return;
    };
    let rgb = unique.color.rgb();
    try_solid(ev, rgb);

    let nearest = quantize(rgb);
    ev.evaluate(SolutionCoordinates::new(nearest, nearest), false);
}

/// When all colours share one selector the block is effectively solid; tries a
/// single-colour encoding of the average, and with `all_colors` of every colour.
pub(crate) fn check(ev: &mut Evaluator, all_colors: bool) {
    if ev.best.error == 0 || !ev.best.has_uniform_selectors() {
        return;
    }
    try_solid(ev, ev.table.average());

    if all_colors {
        for index in 0..ev.table.len() {
            let rgb = ev.table.colors[index].color.rgb();
            try_solid(ev, rgb);
        }
    }
}
