//! Scoring candidate endpoint pairs.

use crate::cache::SolutionsTried;
use crate::channel_stats::ChannelStats;
use crate::palette::{
    ColorMetric, DistanceFn, GrayscaleMetric, Palette, PerceptualMetric, UniformMetric,
};
use crate::params::{Bc1EncodeParams, BlockModes};
use crate::solution::{Solution, SolutionCoordinates};
use crate::unique_colors::UniqueColorTable;
use dxt_block_encoder_common::color_565::{Color565, COMPONENT_MAX};
use dxt_block_encoder_common::color_8888::Color8888;
use likely_stable::unlikely;

/// Per-block search state: the block's colours, the bound tables and the best solution.
///
/// Owned by the compressor so its buffers are reused from block to block.
#[derive(Debug)]
pub(crate) struct Evaluator {
    pub table: UniqueColorTable,
    pub stats: ChannelStats,
    pub best: Solution,
    pub metric: DistanceFn,
    pub modes: BlockModes,
    pub perceptual: bool,
    /// Unique colour indices, costliest first.
    order: Vec<u8>,
    tried: SolutionsTried,
    trial: Solution,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            table: UniqueColorTable::default(),
            stats: ChannelStats::default(),
            best: Solution::default(),
            metric: DistanceFn::Uniform,
            modes: BlockModes {
                four_color: true,
                three_color: true,
            },
            perceptual: false,
            order: Vec::new(),
            tried: SolutionsTried::default(),
            trial: Solution::default(),
        }
    }
}

impl Evaluator {
    /// Loads a new block. Everything learned about the previous block is discarded.
    pub fn prepare(&mut self, params: &Bc1EncodeParams, pixels: &[Color8888]) {
        self.table
            .build(pixels, params.effective_alpha_threshold());
        self.metric = DistanceFn::from_params(params);
        self.perceptual = params.perceptual;
        self.modes = BlockModes::new(params, self.table.has_transparent);
        self.tried.reset();
        self.best.reset(self.table.len());
        self.trial.reset(self.table.len());
    }

    /// Builds the bound tables and the evaluation order. Only needed when searching.
    pub fn prepare_search(&mut self) {
        self.stats
            .build(&self.table.colors, self.metric.channel_weights());

        let average = self.table.average();
        let metric = self.metric;
        let colors = &self.table.colors;
        self.order.clear();
        self.order.extend(0..colors.len() as u8);
        self.order.sort_by_key(|&i| {
            let unique = &colors[i as usize];
            let cost = metric.distance(unique.color.rgb(), average) as u64 * unique.weight as u64;
            (core::cmp::Reverse(cost), i)
        });
    }

    /// Scores `coords` in every allowed palette mode and keeps the result if it beats the
    /// best solution. Returns `true` if the best solution changed.
    ///
    /// Pairs already scored for this block are skipped, except in the alternate rounding
    /// pass.
    pub fn evaluate(&mut self, coords: SolutionCoordinates, alternate_rounding: bool) -> bool {
        if unlikely(self.stats.lower_bound(coords.low, coords.high) >= self.best.error) {
            return false;
        }
        if !self.tried.insert(coords) && !alternate_rounding {
            return false;
        }

        let mut improved = false;
        if self.modes.four_color {
            improved |= self.evaluate_mode(coords, false, alternate_rounding);
        }
        if self.modes.three_color {
            improved |= self.evaluate_mode(coords, true, alternate_rounding);
        }
        improved
    }

    fn evaluate_mode(
        &mut self,
        coords: SolutionCoordinates,
        alpha_block: bool,
        alternate_rounding: bool,
    ) -> bool {
        let (low, high) = (coords.low, coords.high);
        let mut enforce_selector = None;

        let (color0, color1) = if alpha_block {
            (low.min(high), low.max(high))
        } else if low == high {
            // Four-colour mode needs color0 > color1. Nudge blue by one step and pin every
            // pixel to the entry that still holds the original colour.
            let partner = if low.b5() < COMPONENT_MAX[2] {
                low.offset(0, 0, 1)
            } else {
                low.offset(0, 0, -1)
            };
            let (color0, color1) = (low.max(partner), low.min(partner));
            enforce_selector = Some(if color0 == low { 0 } else { 1 });
            (color0, color1)
        } else {
            (low.max(high), low.min(high))
        };

        let limit = self.best.error;
        let error = match enforce_selector {
            Some(selector) => self.assign_fixed(low, selector, limit),
            None => {
                let palette = Palette::from_endpoints(color0, color1);
                match self.metric {
                    DistanceFn::Uniform => self.assign::<UniformMetric>(&palette, limit),
                    DistanceFn::Perceptual => self.assign::<PerceptualMetric>(&palette, limit),
                    DistanceFn::Grayscale => self.assign::<GrayscaleMetric>(&palette, limit),
                }
            }
        };

        let Some(error) = error else {
            return false;
        };

        self.trial.coords = SolutionCoordinates::new(color0, color1);
        self.trial.error = error;
        self.trial.alpha_block = alpha_block;
        self.trial.alternate_rounding = alternate_rounding;
        self.trial.enforce_selector = enforce_selector;
        core::mem::swap(&mut self.best, &mut self.trial);
        true
    }

    /// Assigns every colour its nearest palette entry into the trial solution.
    /// [`None`] as soon as the running error reaches `limit`.
    #[inline]
    fn assign<M: ColorMetric>(&mut self, palette: &Palette, limit: u64) -> Option<u64> {
        let entries = &palette.colors[..palette.opaque_entries()];
        let mut total = 0u64;
        for &index in &self.order {
            let unique = &self.table.colors[index as usize];
            let rgb = unique.color.rgb();

            let mut best_distance = M::distance(rgb, entries[0]);
            let mut selector = 0u8;
            for (candidate, &entry) in entries.iter().enumerate().skip(1) {
                let distance = M::distance(rgb, entry);
                if distance < best_distance {
                    best_distance = distance;
                    selector = candidate as u8;
                }
            }

            total += best_distance as u64 * unique.weight as u64;
            if unlikely(total >= limit) {
                return None;
            }
            self.trial.selectors[index as usize] = selector;
        }
        Some(total)
    }

    /// Error of mapping every colour to `color`, with all selectors set to `selector`.
    fn assign_fixed(&mut self, color: Color565, selector: u8, limit: u64) -> Option<u64> {
        let target = color.to_rgb();
        let mut total = 0u64;
        for &index in &self.order {
            let unique = &self.table.colors[index as usize];
            total += self.metric.distance(unique.color.rgb(), target) as u64 * unique.weight as u64;
            if unlikely(total >= limit) {
                return None;
            }
        }
        self.trial.selectors.fill(selector);
        Some(total)
    }

    /// Error of the current best solution recomputed from its palette and selectors.
    #[cfg(test)]
    pub fn recompute_best_error(&self) -> u64 {
        let palette = Palette::from_endpoints(self.best.coords.low, self.best.coords.high);
        self.table
            .colors
            .iter()
            .zip(&self.best.selectors)
            .map(|(unique, &selector)| {
                self.metric
                    .distance(unique.color.rgb(), palette.colors[selector as usize])
                    as u64
                    * unique.weight as u64
            })
            .sum()
    }
}
