//! Endpoint search.
//!
//! A block's search is a fixed list of [`SearchStage`]s chosen by its [`Bc1Quality`]. Every
//! stage proposes candidate pairs to the [`Evaluator`], which keeps the best one. Each tier's
//! list starts with the complete list of the tier below it, so for the same block a higher
//! tier passes through the exact state the lower tier finishes in and can only improve on it.

mod combinatorial;
mod component;
mod least_squares;
mod probe;
mod seed;

use crate::evaluate::Evaluator;
use crate::params::Bc1Quality;
use crate::principal_axis;
use crate::solid;
use crate::solution::SolutionCoordinates;
use dxt_block_encoder_common::color_565::Color565;

/// Offsets, in lattice steps along the principal axis, probed around the mean.
const PROBE_FASTEST: &[u8] = &[0, 2, 6, 15, 27];
const PROBE_FAST: &[u8] = &[0, 1, 3, 5, 9, 15, 27];
const PROBE_NORMAL: &[u8] = &[0, 1, 2, 3, 5, 9, 15, 27, 43];
const PROBE_BETTER: &[u8] = &[0, 1, 2, 3, 5, 9, 15, 19, 27, 43];
const PROBE_UBER: &[u8] = &[0, 1, 2, 3, 4, 5, 7, 9, 12, 15, 19, 23, 27, 35, 43];

/// One step of a search schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchStage {
    /// Candidate pairs from the unique colours themselves or from a 4-means clustering,
    /// then one least-squares pass.
    QuadMedianSeed,
    /// Pairs of points along the principal axis. Later passes re-centre on the best pair
    /// and only run while the previous pass improved.
    AxisProbe { offsets: &'static [u8], passes: u8 },
    /// Lattice neighbours of each endpoint with the other endpoint held.
    LatticeRefine { coarse: bool, max_iterations: u8 },
    /// Closed-form endpoint fit for the current selectors.
    LeastSquares { iterations: u8, lattice_search: bool },
    /// Exhaustive per-channel endpoint search for the current selectors.
    ComponentRefine,
    /// Endpoints reconstructed from interpolated colours, for blocks of two to four colours.
    CombinatorialRecovery,
    /// Single-colour encodings when every colour shares a selector.
    SolidCheck { all_colors: bool },
}

use SearchStage::*;

const FASTEST: &[SearchStage] = &[
    QuadMedianSeed,
    AxisProbe { offsets: PROBE_FASTEST, passes: 1 },
    SolidCheck { all_colors: false },
];

const FAST: &[SearchStage] = &[
    QuadMedianSeed,
    AxisProbe { offsets: PROBE_FASTEST, passes: 1 },
    SolidCheck { all_colors: false },
    AxisProbe { offsets: PROBE_FAST, passes: 2 },
    LatticeRefine { coarse: false, max_iterations: 1 },
];

const NORMAL: &[SearchStage] = &[
    QuadMedianSeed,
    AxisProbe { offsets: PROBE_FASTEST, passes: 1 },
    SolidCheck { all_colors: false },
    AxisProbe { offsets: PROBE_FAST, passes: 2 },
    LatticeRefine { coarse: false, max_iterations: 1 },
    LeastSquares { iterations: 1, lattice_search: false },
    AxisProbe { offsets: PROBE_NORMAL, passes: 2 },
    LatticeRefine { coarse: false, max_iterations: 2 },
];

const BETTER: &[SearchStage] = &[
    QuadMedianSeed,
    AxisProbe { offsets: PROBE_FASTEST, passes: 1 },
    SolidCheck { all_colors: false },
    AxisProbe { offsets: PROBE_FAST, passes: 2 },
    LatticeRefine { coarse: false, max_iterations: 1 },
    LeastSquares { iterations: 1, lattice_search: false },
    AxisProbe { offsets: PROBE_NORMAL, passes: 2 },
    LatticeRefine { coarse: false, max_iterations: 2 },
    AxisProbe { offsets: PROBE_BETTER, passes: 3 },
    LeastSquares { iterations: 2, lattice_search: true },
    ComponentRefine,
    LatticeRefine { coarse: false, max_iterations: 2 },
];

const UBER: &[SearchStage] = &[
    QuadMedianSeed,
    AxisProbe { offsets: PROBE_FASTEST, passes: 1 },
    SolidCheck { all_colors: false },
    AxisProbe { offsets: PROBE_FAST, passes: 2 },
    LatticeRefine { coarse: false, max_iterations: 1 },
    LeastSquares { iterations: 1, lattice_search: false },
    AxisProbe { offsets: PROBE_NORMAL, passes: 2 },
    LatticeRefine { coarse: false, max_iterations: 2 },
    AxisProbe { offsets: PROBE_BETTER, passes: 3 },
    LeastSquares { iterations: 2, lattice_search: true },
    ComponentRefine,
    LatticeRefine { coarse: false, max_iterations: 2 },
    AxisProbe { offsets: PROBE_UBER, passes: 4 },
    LatticeRefine { coarse: true, max_iterations: 4 },
    LeastSquares { iterations: 4, lattice_search: true },
    ComponentRefine,
    CombinatorialRecovery,
    SolidCheck { all_colors: true },
];

/// The stages run for `quality`, in order.
pub(crate) fn schedule(quality: Bc1Quality) -> &'static [SearchStage] {
    match quality {
        Bc1Quality::Fastest => FASTEST,
        Bc1Quality::Fast => FAST,
        Bc1Quality::Normal => NORMAL,
        Bc1Quality::Better => BETTER,
        Bc1Quality::Uber => UBER,
    }
}

/// Searches endpoints for the block loaded into `ev`, which must hold at least two unique
/// colours. The result is left in `ev.best`.
pub(crate) fn run(ev: &mut Evaluator, quality: Bc1Quality) {
    let axis = principal_axis::analyze(&ev.table.colors, ev.perceptual);
    seed::project_extent(ev, &axis);

    for stage in schedule(quality) {
        if ev.best.error == 0 {
            break;
        }
        match *stage {
            QuadMedianSeed => seed::quad_median(ev, &axis),
            AxisProbe { offsets, passes } => probe::axis_probe(ev, &axis, offsets, passes),
            LatticeRefine {
                coarse,
                max_iterations,
            } => probe::lattice_refine(ev, coarse, max_iterations),
            LeastSquares {
                iterations,
                lattice_search,
            } => least_squares::refine(ev, iterations, lattice_search),
            ComponentRefine => component::refine(ev),
            CombinatorialRecovery => combinatorial::recover(ev),
            SolidCheck { all_colors } => solid::check(ev, all_colors),
        }
    }
}

/// Scores `moving` against `fixed` for each of its 26 neighbours, plus the two-step moves
/// along each channel when `coarse`.
pub(crate) fn evaluate_neighbours(
    ev: &mut Evaluator,
    moving: Color565,
    fixed: Color565,
    coarse: bool,
) {
    for dr in -1..=1 {
        for dg in -1..=1 {
            for db in -1..=1 {
                if dr == 0 && dg == 0 && db == 0 {
                    continue;
                }
                let candidate = moving.offset(dr, dg, db);
                ev.evaluate(SolutionCoordinates::new(candidate, fixed), false);
            }
        }
    }

    if coarse {
        for step in [-2, 2] {
            ev.evaluate(SolutionCoordinates::new(moving.offset(step, 0, 0), fixed), false);
            ev.evaluate(SolutionCoordinates::new(moving.offset(0, step, 0), fixed), false);
            ev.evaluate(SolutionCoordinates::new(moving.offset(0, 0, step), fixed), false);
        }
    }
}

/// Appends `color` unless already present.
#[inline]
pub(crate) fn push_unique(colors: &mut Vec<Color565>, color: Color565) {
    if !colors.contains(&color) {
        colors.push(color);
    }
}
