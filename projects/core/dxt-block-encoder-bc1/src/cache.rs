//! Caches kept by a compressor.
//!
//! [`SolutionsTried`] lives for one block. [`PreviousResults`] is the only state carried
//! between blocks.

use crate::params::Bc1EncodeParams;
use crate::solution::{Solution, SolutionCoordinates};
use crate::unique_colors::UniqueColor;
use fxhash::FxHashSet;

/// Past this many slots the set is reallocated rather than cleared.
const TRIED_RETAIN_LIMIT: usize = 4096;

/// Default number of blocks remembered by [`PreviousResults`].
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Endpoint pairs already evaluated for the current block.
#[derive(Debug, Default)]
pub(crate) struct SolutionsTried {
    keys: FxHashSet<u32>,
}

impl SolutionsTried {
    pub fn reset(&mut self) {
        if self.keys.capacity() > TRIED_RETAIN_LIMIT {
            self.keys = FxHashSet::default();
        } else {
            self.keys.clear();
        }
    }

    /// Records `coords`; `false` if the pair was already recorded.
    #[inline]
    pub fn insert(&mut self, coords: SolutionCoordinates) -> bool {
        self.keys.insert(coords.key())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

#[derive(Debug, Clone)]
struct PreviousResult {
    params: Bc1EncodeParams,
    colors: Vec<UniqueColor>,
    has_transparent: bool,
    solution: Solution,
}

/// The winning solutions of the most recently encoded blocks.
///
/// A stored solution is reused only for a block with the same parameters and the same
/// unique colour table, so a hit returns exactly what a full search would.
#[derive(Debug)]
pub(crate) struct PreviousResults {
    entries: Vec<PreviousResult>,
    capacity: usize,
    next: usize,
}

impl Default for PreviousResults {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl PreviousResults {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            next: 0,
        }
    }

    pub fn find(
        &self,
        params: &Bc1EncodeParams,
        colors: &[UniqueColor],
        has_transparent: bool,
    ) -> Option<&Solution> {
        self.entries
            .iter()
            .find(|entry| {
                entry.has_transparent == has_transparent
                    && entry.params == *params
                    && entry.colors == colors
            })
            .map(|entry| &entry.solution)
    }

    /// Stores a result, overwriting the oldest once full.
    pub fn push(
        &mut self,
        params: &Bc1EncodeParams,
        colors: &[UniqueColor],
        has_transparent: bool,
        solution: &Solution,
    ) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.len() < self.capacity {
            self.entries.push(PreviousResult {
                params: *params,
                colors: colors.to_vec(),
                has_transparent,
                solution: solution.clone(),
            });
        } else {
            let entry = &mut self.entries[self.next];
            entry.params = *params;
            entry.colors.clear();
            entry.colors.extend_from_slice(colors);
            entry.has_transparent = has_transparent;
            entry.solution.clone_from(solution);
        }
        self.next = (self.next + 1) % self.capacity;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next = 0;
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
