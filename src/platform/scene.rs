//! Simulation Scene
//!
//! The scene is the simulation context: it owns the platform storage and
//! the registry of active platforms. One scene exists per running
//! simulation (game, preview, ...), created at context start and destroyed
//! at teardown. There is no global scene lookup - controllers and hosts are
//! handed a `&Scene` explicitly.
//!
//! Platforms live in generational slots: removing a platform bumps its
//! slot's generation, so every outstanding [`PlatformHandle`] to it goes
//! stale even after the slot is reused. Freed slots are recycled through a
//! free list.
//!
//! Activation is a two-state machine per platform: Inactive -> Active
//! registers the platform, Active -> Inactive unregisters it. Both
//! transitions are idempotent, so a host can call `set_platform_active`
//! every frame without churning the registry.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::math::Aabb;
use super::handle::PlatformHandle;
use super::platform::{Platform, PlatformKind};
use super::registry::PlatformRegistry;

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a scene instance. Unique for the lifetime of the process,
/// never reused, so a controller can detect that it was transplanted to a
/// different scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

/// One storage slot: the platform currently occupying it (if any) and the
/// slot's version. The generation only moves forward, on removal.
struct PlatformSlot {
    generation: u32,
    platform: Option<Platform>,
}

/// Owner of all platforms for one simulation context.
pub struct Scene {
    id: SceneId,
    slots: Vec<PlatformSlot>,
    /// Indices of vacated slots, recycled before the storage grows
    free: Vec<u32>,
    registry: PlatformRegistry,
}

impl Scene {
    /// Create a new empty scene with a fresh identity.
    pub fn new() -> Self {
        Self {
            id: SceneId(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed)),
            slots: Vec::new(),
            free: Vec::new(),
            registry: PlatformRegistry::new(),
        }
    }

    /// This scene's identity.
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Add a platform to the scene. Active platforms are registered
    /// immediately.
    pub fn add_platform(&mut self, platform: Platform) -> PlatformHandle {
        let handle = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.platform = Some(platform);
            PlatformHandle::new(index, slot.generation)
        } else {
            self.slots.push(PlatformSlot { generation: 0, platform: Some(platform) });
            PlatformHandle::new(self.slots.len() as u32 - 1, 0)
        };
        if platform.active {
            self.registry.add(handle);
        }
        handle
    }

    /// Remove a platform, unregistering it and invalidating the handle.
    /// Returns the removed platform if the handle was current.
    pub fn remove_platform(&mut self, handle: PlatformHandle) -> Option<Platform> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() || slot.platform.is_none() {
            return None;
        }
        // Stale out every outstanding handle to this slot
        slot.generation += 1;
        let platform = slot.platform.take();
        self.free.push(handle.index());
        self.registry.remove(handle);
        platform
    }

    /// Get a platform by handle. `None` for stale or unknown handles.
    pub fn platform(&self, handle: PlatformHandle) -> Option<&Platform> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.platform.as_ref())
    }

    fn platform_mut(&mut self, handle: PlatformHandle) -> Option<&mut Platform> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.platform.as_mut())
    }

    /// Activate or deactivate a platform, keeping the registry in sync.
    /// Idempotent: at most one registry mutation per real state change.
    pub fn set_platform_active(&mut self, handle: PlatformHandle, active: bool) {
        let Some(platform) = self.platform_mut(handle) else { return };
        if platform.active == active {
            return;
        }
        platform.active = active;
        if active {
            self.registry.add(handle);
        } else {
            self.registry.remove(handle);
        }
    }

    /// Change a platform's classification.
    pub fn set_platform_kind(&mut self, handle: PlatformHandle, kind: PlatformKind) {
        if let Some(platform) = self.platform_mut(handle) {
            platform.kind = kind;
        }
    }

    /// Change a platform's classification from a persisted type name.
    /// Unknown names fall back to `Normal`.
    pub fn set_platform_kind_by_name(&mut self, handle: PlatformHandle, name: &str) {
        self.set_platform_kind(handle, PlatformKind::from_name(name));
    }

    /// Move or resize a platform. Controllers standing on it will follow
    /// the movement on their next step.
    pub fn set_platform_aabb(&mut self, handle: PlatformHandle, aabb: Aabb) {
        if let Some(platform) = self.platform_mut(handle) {
            platform.aabb = aabb;
        }
    }

    pub fn set_platform_grabbable(&mut self, handle: PlatformHandle, can_be_grabbed: bool) {
        if let Some(platform) = self.platform_mut(handle) {
            platform.can_be_grabbed = can_be_grabbed;
        }
    }

    pub fn set_platform_grab_offset(&mut self, handle: PlatformHandle, y_grab_offset: f32) {
        if let Some(platform) = self.platform_mut(handle) {
            platform.y_grab_offset = y_grab_offset;
        }
    }

    /// The registry of active platforms.
    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// Iterate over all active platforms with their handles.
    pub fn active_platforms(&self) -> impl Iterator<Item = (PlatformHandle, &Platform)> + '_ {
        self.registry
            .iter()
            .filter_map(move |handle| self.platform(handle).map(|platform| (handle, platform)))
    }

    /// Number of platforms in the scene (active or not).
    pub fn platform_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.platform.is_some()).count()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_platform() -> Platform {
        Platform::normal(Aabb::new(0.0, 100.0, 200.0, 20.0))
    }

    #[test]
    fn test_scene_ids_are_unique() {
        let a = Scene::new();
        let b = Scene::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_add_registers_active_platform() {
        let mut scene = Scene::new();
        let h = scene.add_platform(some_platform());
        assert!(scene.registry().contains(h));
        assert_eq!(scene.registry().len(), 1);
        assert_eq!(scene.platform_count(), 1);
    }

    #[test]
    fn test_inactive_platform_is_not_registered() {
        let mut scene = Scene::new();
        let mut platform = some_platform();
        platform.active = false;
        let h = scene.add_platform(platform);
        assert!(!scene.registry().contains(h));

        scene.set_platform_active(h, true);
        assert!(scene.registry().contains(h));
    }

    #[test]
    fn test_activation_toggle_is_idempotent() {
        let mut scene = Scene::new();
        let h = scene.add_platform(some_platform());

        scene.set_platform_active(h, true);
        scene.set_platform_active(h, true);
        assert_eq!(scene.registry().len(), 1);

        scene.set_platform_active(h, false);
        scene.set_platform_active(h, false);
        assert_eq!(scene.registry().len(), 0);
    }

    #[test]
    fn test_remove_unregisters_and_invalidates() {
        let mut scene = Scene::new();
        let h = scene.add_platform(some_platform());

        let removed = scene.remove_platform(h);
        assert!(removed.is_some());
        assert!(!scene.registry().contains(h));
        assert!(scene.platform(h).is_none());

        // The slot may be reused, but the old handle stays dead
        let h2 = scene.add_platform(some_platform());
        assert_eq!(h2.index(), h.index());
        assert_ne!(h2, h);
        assert!(scene.platform(h).is_none());
        assert!(scene.platform(h2).is_some());
    }

    #[test]
    fn test_double_remove_is_a_noop() {
        let mut scene = Scene::new();
        let h = scene.add_platform(some_platform());

        assert!(scene.remove_platform(h).is_some());
        assert!(scene.remove_platform(h).is_none());
        assert_eq!(scene.platform_count(), 0);
        assert_eq!(scene.registry().len(), 0);
    }

    #[test]
    fn test_stale_handle_mutators_are_noops() {
        let mut scene = Scene::new();
        let stale = scene.add_platform(some_platform());
        scene.remove_platform(stale);
        let live = scene.add_platform(some_platform());

        // Mutating through the dead handle must not touch the reused slot
        scene.set_platform_kind(stale, PlatformKind::Ladder);
        scene.set_platform_active(stale, false);
        assert_eq!(scene.platform(live).unwrap().kind, PlatformKind::Normal);
        assert!(scene.registry().contains(live));
    }

    #[test]
    fn test_kind_change_by_name() {
        let mut scene = Scene::new();
        let h = scene.add_platform(some_platform());

        scene.set_platform_kind_by_name(h, "Ladder");
        assert_eq!(scene.platform(h).unwrap().kind, PlatformKind::Ladder);

        scene.set_platform_kind_by_name(h, "definitely not a kind");
        assert_eq!(scene.platform(h).unwrap().kind, PlatformKind::Normal);
    }
}
