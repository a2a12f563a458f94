use crate::evaluate::Evaluator;
use crate::palette::channel_entry;
use crate::solution::SolutionCoordinates;
use dxt_block_encoder_common::color_565::{expand_component, COMPONENT_MAX};

/// With the best selectors and palette mode held, finds the best raw value pair of every
/// channel on its own. Each single-channel change is scored, then all of them together.
pub(super) fn refine(ev: &mut Evaluator) {
    if ev.best.error == 0 {
        return;
    }
    let SolutionCoordinates { low, high } = ev.best.coords;
    let alpha_block = ev.best.alpha_block;

    let mut combined = (low, high);
    let mut changed = 0;
    for channel in 0..3 {
        let (a, b) = best_channel_pair(ev, channel, alpha_block);
        if a == low.component(channel) && b == high.component(channel) {
            continue;
        }
        ev.evaluate(
            SolutionCoordinates::new(low.with_component(channel, a), high.with_component(channel, b)),
            false,
        );
        combined = (
            combined.0.with_component(channel, a),
            combined.1.with_component(channel, b),
        );
        changed += 1;
    }

    if changed > 1 {
        ev.evaluate(SolutionCoordinates::new(combined.0, combined.1), false);
    }
}

/// The raw `(color0, color1)` values of `channel` that minimise that channel's error.
///
/// Only the first pair found wins a tie; a separable metric scales all pairs of one
/// channel alike, so channel weights do not affect the choice.
fn best_channel_pair(ev: &Evaluator, channel: usize, alpha_block: bool) -> (u8, u8) {
    // Weight, sum and sum of squares of the channel per selector.
    let mut moments = [[0u64; 3]; 4];
    for (unique, &selector) in ev.table.colors.iter().zip(&ev.best.selectors) {
        let v = unique.color.rgb()[channel] as u64;
        let w = unique.weight as u64;
        let m = &mut moments[selector as usize & 3];
        m[0] += w;
        m[1] += w * v;
        m[2] += w * v * v;
    }

    let max = COMPONENT_MAX[channel];
    let mut best = (u64::MAX, 0u8, 0u8);
    for a in 0..=max {
        let ea = expand_component(channel, a) as u32;
        for b in 0..=max {
            let eb = expand_component(channel, b) as u32;
            let mut error = 0u64;
            for (selector, &[w, s1, s2]) in moments.iter().enumerate() {
                if w == 0 {
                    continue;
                }
                let p = channel_entry(ea, eb, selector, alpha_block) as u64;
                error += w * p * p + s2 - 2 * p * s1;
            }
            if error < best.0 {
                best = (error, a, b);
            }
        }
    }
    (best.1, best.2)
}
