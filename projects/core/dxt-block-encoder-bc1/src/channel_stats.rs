//! Per-channel error bounds.
//!
//! For an opaque colour `v` and a pair of endpoints with low and high channel value
//! `lo <= hi`, every palette entry an opaque pixel may pick lies in `[lo, hi]` on that
//! channel (the black entry of 3-colour mode is never picked by opaque pixels). The pixel
//! therefore costs at least `(lo - v)²` when `v < lo` and `(v - hi)²` when `v > hi`.
//! Summed over the block and the channels this bounds the error of any candidate from below
//! with two table lookups per channel.

use crate::unique_colors::UniqueColor;
use dxt_block_encoder_common::color_565::{expand_component, Color565, COMPONENT_MAX};

/// Error contributions of one channel, indexed by raw lattice level.
#[derive(Debug, Clone)]
struct ChannelBound {
    /// `Σ w·(t - v)²` over colours with `v < t`, where `t` is the expanded level.
    below: [u64; 64],
    /// `Σ w·(v - t)²` over colours with `v > t`.
    above: [u64; 64],
}

impl Default for ChannelBound {
    fn default() -> Self {
        Self {
            below: [0; 64],
            above: [0; 64],
        }
    }
}

/// Lower bound tables for red, green and blue.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChannelStats {
    channels: [ChannelBound; 3],
    enabled: bool,
}

impl ChannelStats {
    /// Rebuilds the tables for `colors`.
    ///
    /// `weights` are the metric's per-channel weights; [`None`] means the metric is not a
    /// per-channel sum and no bound can be given, so [`lower_bound`](Self::lower_bound)
    /// returns 0.
    pub fn build(&mut self, colors: &[UniqueColor], weights: Option<[u32; 3]>) {
        let Some(weights) = weights else {
            self.enabled = false;
            return;
        };
        self.enabled = true;

        for (channel, bound) in self.channels.iter_mut().enumerate() {
            // Weighted histogram over 8-bit values, then running sums of w, w·v and w·v².
            let mut histogram = [0u64; 256];
            for unique in colors {
                histogram[unique.color.rgb()[channel] as usize] += unique.weight as u64;
            }

            let mut count = [0u64; 257];
            let mut sum = [0u64; 257];
            let mut sum_sq = [0u64; 257];
            for value in 0..256 {
                let w = histogram[value];
                let v = value as u64;
                count[value + 1] = count[value] + w;
                sum[value + 1] = sum[value] + w * v;
                sum_sq[value + 1] = sum_sq[value] + w * v * v;
            }

            let weight = weights[channel] as u64;
            for level in 0..=COMPONENT_MAX[channel] {
                let t = expand_component(channel, level) as usize;
                let tt = t as u64;

                // Colours with v < t: Σ w(t - v)² = t²·W - 2t·S + Q over [0, t).
                let (w, s, q) = (count[t], sum[t], sum_sq[t]);
                let below = tt * tt * w + q - 2 * tt * s;

                // Colours with v > t: Σ w(v - t)² over (t, 255].
                let w = count[256] - count[t + 1];
                let s = sum[256] - sum[t + 1];
                let q = sum_sq[256] - sum_sq[t + 1];
                let above = q + tt * tt * w - 2 * tt * s;

                bound.below[level as usize] = below * weight;
                bound.above[level as usize] = above * weight;
            }
        }
    }

    /// A value no greater than the error of any opaque assignment of the block's colours to
    /// the palette of `a` and `b`, in either order and either palette mode.
    #[inline]
    pub fn lower_bound(&self, a: Color565, b: Color565) -> u64 {
        if !self.enabled {
            return 0;
        }
        let mut total = 0;
        for (channel, bound) in self.channels.iter().enumerate() {
            let x = a.component(channel);
            let y = b.component(channel);
            total += bound.below[x.min(y) as usize] + bound.above[x.max(y) as usize];
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{DistanceFn, Palette};
    use dxt_block_encoder_common::color_8888::Color8888;

    fn colors() -> Vec<UniqueColor> {
        [
            ([12u8, 200u8, 40u8], 3u32),
            ([250, 3, 99], 1),
            ([128, 128, 128], 5),
            ([0, 64, 255], 2),
        ]
        .into_iter()
        .map(|(rgb, weight)| UniqueColor {
            color: Color8888::new(rgb[0], rgb[1], rgb[2], 255),
            weight,
        })
        .collect()
    }

    fn exact_error(colors: &[UniqueColor], a: Color565, b: Color565, metric: DistanceFn) -> u64 {
        let palette = Palette::from_endpoints(a, b);
        colors
            .iter()
            .map(|unique| {
                let best = palette.colors[..palette.opaque_entries()]
                    .iter()
                    .map(|&entry| metric.distance(unique.color.rgb(), entry))
                    .min()
                    .unwrap();
                best as u64 * unique.weight as u64
            })
            .sum()
    }

    #[test]
    fn bound_never_exceeds_exact_error() {
        let colors = colors();
        for metric in [DistanceFn::Uniform, DistanceFn::Perceptual] {
            let mut stats = ChannelStats::default();
            stats.build(&colors, metric.channel_weights());

            for seed in 0..400u32 {
                let a = Color565::from_raw((seed.wrapping_mul(2654435761) >> 7) as u16);
                let b = Color565::from_raw((seed.wrapping_mul(40503) ^ 0x5a5a) as u16);
                let bound = stats.lower_bound(a, b);
                assert!(bound <= exact_error(&colors, a, b, metric));
                assert!(bound <= exact_error(&colors, b, a, metric));
                assert_eq!(bound, stats.lower_bound(b, a));
            }
        }
    }

    #[test]
    fn bound_is_exact_for_matching_endpoints() {
        // A single colour that sits exactly on an endpoint costs nothing.
        let colors = vec![UniqueColor {
            color: Color8888::new(255, 0, 0, 255),
            weight: 16,
        }];
        let mut stats = ChannelStats::default();
        stats.build(&colors, Some([1, 1, 1]));
        let red = Color565::from_components(31, 0, 0);
        assert_eq!(stats.lower_bound(red, red), 0);

        let dark = Color565::from_components(30, 0, 0);
        // 255 - 247 = 8
        assert_eq!(stats.lower_bound(dark, dark), 16 * 64);
    }

    #[test]
    fn disabled_without_channel_weights() {
        let mut stats = ChannelStats::default();
        stats.build(&colors(), None);
        assert_eq!(stats.lower_bound(Color565::BLACK, Color565::BLACK), 0);
    }
}
