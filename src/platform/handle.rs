//! Platform Handles
//!
//! A handle names one platform inside one [`Scene`](super::Scene). It
//! pairs a storage index with a generation counter: the scene bumps a
//! slot's generation whenever the platform in it is removed, so a handle
//! held across frames (a controller's current floor, a grabbed ledge)
//! goes stale instead of silently pointing at whatever platform reuses
//! the slot. Lookups with a stale handle return `None`, and the
//! controller reacts by leaving the corresponding support mode.

use serde::{Serialize, Deserialize};

/// Identifier of a platform within one scene.
///
/// Compared as a whole: two handles naming the same slot but carrying
/// different generations are different platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformHandle {
    index: u32,
    generation: u32,
}

impl PlatformHandle {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot position in the scene's platform storage.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Version of that slot this handle refers to.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_slot_different_generation_is_a_different_platform() {
        let first = PlatformHandle::new(4, 0);
        let second = PlatformHandle::new(4, 1);
        assert_eq!(first.index(), second.index());
        assert_ne!(first, second);
    }
}
