//! Draw-without-replacement pool of animation indices
//!
//! Indices move from `drawable` to `drawn` when used. Once `drawable` runs
//! empty the two sets swap, so every animation runs once before any repeats.

use heapless::Vec;
use rand_core::RngCore;

use crate::animation::random_below;
use crate::config::MAX_ANIMATIONS;

#[derive(Debug, Clone)]
pub struct AnimationPool {
    drawable: Vec<u8, MAX_ANIMATIONS>,
    drawn: Vec<u8, MAX_ANIMATIONS>,
}

impl AnimationPool {
    /// Pool over the indices `0..len`, capped at [`MAX_ANIMATIONS`]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(len: usize) -> Self {
        let mut drawable = Vec::new();
        for index in 0..len.min(MAX_ANIMATIONS) {
            // Capacity checked by the range bound
            let _ = drawable.push(index as u8);
        }
        Self {
            drawable,
            drawn: Vec::new(),
        }
    }

    /// Total number of indices
    pub fn len(&self) -> usize {
        self.drawable.len() + self.drawn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indices not yet used in the current cycle
    pub fn drawable(&self) -> &[u8] {
        &self.drawable
    }

    /// Indices already used in the current cycle
    pub fn drawn(&self) -> &[u8] {
        &self.drawn
    }

    /// Draw a random index other than `exclude` and mark it used
    ///
    /// Candidates come from `drawable`; only when the excluded index is the
    /// sole drawable one does the draw fall back to `drawn`. Returns `None`
    /// when no other index exists.
    #[allow(clippy::cast_possible_truncation)]
    pub fn draw<R: RngCore>(&mut self, exclude: Option<usize>, rng: &mut R) -> Option<usize> {
        let exclude = exclude.map(|index| index as u8);
        let mut candidates = filtered(&self.drawable, exclude);
        if candidates.is_empty() {
            candidates = filtered(&self.drawn, exclude);
        }
        if candidates.is_empty() {
            return None;
        }

        let index = usize::from(candidates[random_below(rng, candidates.len())]);
        self.mark_used(index);
        Some(index)
    }

    /// Record that `index` was activated
    ///
    /// Moves it from `drawable` to `drawn` if it was still drawable; an index
    /// already drawn in this cycle leaves the pool unchanged.
    #[allow(clippy::cast_possible_truncation)]
    pub fn mark_used(&mut self, index: usize) {
        let index = index as u8;
        let Some(position) = self.drawable.iter().position(|&i| i == index) else {
            return;
        };
        self.drawable.swap_remove(position);
        // Both sets share one capacity, the push cannot fail
        let _ = self.drawn.push(index);
        if self.drawable.is_empty() {
            core::mem::swap(&mut self.drawable, &mut self.drawn);
        }
    }
}

fn filtered(set: &[u8], exclude: Option<u8>) -> Vec<u8, MAX_ANIMATIONS> {
    set.iter()
        .copied()
        .filter(|&index| Some(index) != exclude)
        .collect()
}
