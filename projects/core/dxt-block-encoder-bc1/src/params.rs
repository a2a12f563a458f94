//! Encoder configuration.

/// How thoroughly the endpoint lattice is searched.
///
/// Tiers are ordered: every tier runs the full search schedule of the tier below it and then
/// adds its own stages, so a higher tier never returns a larger error for the same block.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_enum_all_values::AllValues,
)]
pub enum Bc1Quality {
    /// Principal axis probe with a short offset table. A single pass.
    Fastest,
    /// Adds a second probe pass and a lattice neighbourhood sweep.
    Fast,
    /// Adds least-squares endpoint refinement.
    Normal,
    /// Adds lattice-searched least squares and per-component refinement.
    Better,
    /// Exhaustive: coarse lattice steps, endpoint recovery for few-colour blocks and
    /// solid checks against every colour in the block.
    Uber,
}

impl Default for Bc1Quality {
    fn default() -> Self {
        Self::Normal
    }
}

/// Parameters for encoding one block.
///
/// The defaults describe an opaque, uniformly weighted block at [`Bc1Quality::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bc1EncodeParams {
    /// Search thoroughness.
    pub quality: Bc1Quality,

    /// Pixels with alpha below this value are transparent. Only used when
    /// [`pixels_have_alpha`](Self::pixels_have_alpha) is set.
    pub alpha_threshold: u8,

    /// Whether the alpha channel of the input is meaningful. When unset every pixel is
    /// treated as opaque.
    pub pixels_have_alpha: bool,

    /// Allow the 3-colour palette for blocks without transparent pixels when it yields a
    /// lower error than the 4-colour palette.
    pub use_alpha_blocks: bool,

    /// Always use the 3-colour palette.
    pub force_alpha_blocks: bool,

    /// Weight channel errors 3:6:1 (red:green:blue) instead of uniformly.
    pub perceptual: bool,

    /// Measure error on luma only. For textures that will be sampled as greyscale.
    /// Takes precedence over [`perceptual`](Self::perceptual).
    pub grayscale_sampling: bool,

    /// Allow near-black pixels to use the implicit black entry of the 3-colour palette.
    pub use_transparent_indices_for_black: bool,

    /// Remember recent results on the compressor and reuse them for identical blocks.
    pub endpoint_caching: bool,
}

impl Default for Bc1EncodeParams {
    fn default() -> Self {
        Self {
            quality: Bc1Quality::default(),
            alpha_threshold: 128,
            pixels_have_alpha: false,
            use_alpha_blocks: true,
            force_alpha_blocks: false,
            perceptual: false,
            grayscale_sampling: false,
            use_transparent_indices_for_black: false,
            endpoint_caching: false,
        }
    }
}

impl Bc1EncodeParams {
    /// Alpha threshold to apply to the input, if alpha is meaningful at all.
    #[inline]
    pub(crate) fn effective_alpha_threshold(&self) -> Option<u8> {
        self.pixels_have_alpha.then_some(self.alpha_threshold)
    }
}

/// Which palette layouts a block may be evaluated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockModes {
    /// `color0 > color1`: four opaque colours.
    pub four_color: bool,
    /// `color0 <= color1`: three opaque colours plus transparent black.
    pub three_color: bool,
}

impl BlockModes {
    pub(crate) fn new(params: &Bc1EncodeParams, has_transparent: bool) -> Self {
        if has_transparent || params.force_alpha_blocks {
            Self {
                four_color: false,
                three_color: true,
            }
        } else {
            Self {
                four_color: true,
                three_color: params.use_alpha_blocks,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn quality_tiers_are_ordered() {
        let all = Bc1Quality::all_values();
        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(all[0], Bc1Quality::Fastest);
        assert_eq!(all[4], Bc1Quality::Uber);
    }

    #[rstest]
    #[case(false, false, false, true, true)]
    #[case(false, true, false, true, false)]
    #[case(true, false, false, false, true)]
    #[case(false, false, true, false, true)]
    fn block_modes_follow_flags(
        #[case] has_transparent: bool,
        #[case] disable_alpha_blocks: bool,
        #[case] force_alpha_blocks: bool,
        #[case] four_color: bool,
        #[case] three_color: bool,
    ) {
        let params = Bc1EncodeParams {
            use_alpha_blocks: !disable_alpha_blocks,
            force_alpha_blocks,
            ..Default::default()
        };
        let modes = BlockModes::new(&params, has_transparent);
        assert_eq!(modes.four_color, four_color);
        assert_eq!(modes.three_color, three_color);
    }

    #[test]
    fn alpha_threshold_only_applies_with_alpha() {
        let mut params = Bc1EncodeParams::default();
        assert_eq!(params.effective_alpha_threshold(), None);
        params.pixels_have_alpha = true;
        assert_eq!(params.effective_alpha_threshold(), Some(128));
    }
}
