//! Platform Registry
//!
//! The registry is the set of platforms currently taking part in collision
//! resolution for one scene. It is pure bookkeeping: sparse storage indexed
//! by handle slot, giving O(1) add/remove/contains and unordered iteration.
//!
//! The full handle (not just the index) is stored in each slot so that a
//! stale handle from a reused slot never matches.

use super::handle::PlatformHandle;

/// Membership set of active platforms for one scene.
pub struct PlatformRegistry {
    /// Sparse array indexed by handle.index()
    slots: Vec<Option<PlatformHandle>>,
    /// Number of occupied slots
    count: usize,
}

impl PlatformRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            count: 0,
        }
    }

    /// Ensure storage can hold a slot at the given index.
    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
    }

    /// Add a platform to the registry. No-op if it is already present.
    pub fn add(&mut self, handle: PlatformHandle) {
        let idx = handle.index() as usize;
        self.ensure_capacity(idx);
        if self.slots[idx] != Some(handle) {
            if self.slots[idx].is_none() {
                self.count += 1;
            }
            self.slots[idx] = Some(handle);
        }
    }

    /// Remove a platform from the registry. No-op if it is absent.
    pub fn remove(&mut self, handle: PlatformHandle) {
        let idx = handle.index() as usize;
        if idx < self.slots.len() && self.slots[idx] == Some(handle) {
            self.slots[idx] = None;
            self.count -= 1;
        }
    }

    /// Check if a platform is registered.
    pub fn contains(&self, handle: PlatformHandle) -> bool {
        let idx = handle.index() as usize;
        idx < self.slots.len() && self.slots[idx] == Some(handle)
    }

    /// Iterate over all registered platforms. No ordering guarantee.
    pub fn iter(&self) -> impl Iterator<Item = PlatformHandle> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    /// Number of registered platforms.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut registry = PlatformRegistry::new();
        let h = PlatformHandle::new(3, 0);

        registry.add(h);
        assert!(registry.contains(h));
        assert_eq!(registry.len(), 1);

        registry.remove(h);
        assert!(!registry.contains(h));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut registry = PlatformRegistry::new();
        let h = PlatformHandle::new(0, 0);

        registry.add(h);
        registry.add(h);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut registry = PlatformRegistry::new();
        registry.remove(PlatformHandle::new(7, 0));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_stale_generation_does_not_match() {
        let mut registry = PlatformRegistry::new();
        let old = PlatformHandle::new(2, 0);
        let new = PlatformHandle::new(2, 1);

        registry.add(new);
        assert!(!registry.contains(old));
        // Removing with the stale handle must not evict the live one
        registry.remove(old);
        assert!(registry.contains(new));
    }

    #[test]
    fn test_iteration_is_full_set() {
        let mut registry = PlatformRegistry::new();
        let a = PlatformHandle::new(0, 0);
        let b = PlatformHandle::new(5, 0);
        registry.add(a);
        registry.add(b);

        let all: Vec<_> = registry.iter().collect();
        assert_eq!(all.len(), 2);
        assert!(all.contains(&a));
        assert!(all.contains(&b));
    }
}
