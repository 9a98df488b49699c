//! Change detection for render scheduling.
//!
//! The session hands the scheduler a [`Dependencies`] snapshot after every
//! mutation. A snapshot that differs from the last one observed starts a new
//! render generation. Only the newest generation may commit to the surface;
//! older passes still in flight end up discarded.

use crate::models::{EffectParameters, ImageId};

/// Everything a render pass reads besides the image bytes
#[derive(Debug, Clone, PartialEq)]
pub struct Dependencies {
    pub selected: Option<ImageId>,
    pub params: EffectParameters,
    pub seed: u64,
}

#[derive(Debug, Default)]
pub struct ReactiveScheduler {
    generation: u64,
    last: Option<Dependencies>,
}

impl ReactiveScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `deps`; returns the new generation when they changed.
    ///
    /// Every change gets its own generation, there is no coalescing.
    pub fn observe(&mut self, deps: Dependencies) -> Option<u64> {
        if self.last.as_ref() == Some(&deps) {
            return None;
        }
        self.last = Some(deps);
        self.generation += 1;
        Some(self.generation)
    }

    /// Newest generation issued (0 before the first change)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}
