//! Platform Geometry Components
//!
//! A platform is any object tagged as collidable ground/ceiling/wall
//! geometry. Platforms are plain data - all movement logic lives in the
//! controller.

use serde::{Serialize, Deserialize};
use crate::math::Aabb;

/// The closed set of platform classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Solid geometry: blocks movement on every side.
    #[default]
    Normal,
    /// Passable from below, solid when landed on from above.
    Jumpthru,
    /// Climbable: never blocks movement, enables vertical climbing.
    Ladder,
}

impl PlatformKind {
    /// Map a persisted type name to a kind. Unknown names silently fall
    /// back to `Normal` - a misspelled type in a project file must not
    /// break the simulation.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Ladder" => PlatformKind::Ladder,
            "Jumpthru" => PlatformKind::Jumpthru,
            _ => PlatformKind::Normal,
        }
    }

    /// The persisted type name.
    pub fn name(&self) -> &'static str {
        match self {
            PlatformKind::Normal => "Normal",
            PlatformKind::Jumpthru => "Jumpthru",
            PlatformKind::Ladder => "Ladder",
        }
    }
}

/// A platform component: classification plus the owning object's bounds.
///
/// `can_be_grabbed` and `y_grab_offset` are only meaningful for `Normal`
/// platforms; ladders and jumpthrus are never grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Classification of this geometry
    pub kind: PlatformKind,
    /// Bounds of the owning object, in world pixels
    pub aabb: Aabb,
    /// Can an airborne character grab the edge of this platform?
    pub can_be_grabbed: bool,
    /// Vertical offset (relative to the platform top-left) of the grab
    /// anchor line
    pub y_grab_offset: f32,
    /// Whether this platform currently takes part in collision resolution
    pub active: bool,
}

impl Platform {
    /// Create an active platform of the given kind.
    pub fn new(kind: PlatformKind, aabb: Aabb) -> Self {
        Self {
            kind,
            aabb,
            can_be_grabbed: true,
            y_grab_offset: 0.0,
            active: true,
        }
    }

    /// Create a solid platform.
    pub fn normal(aabb: Aabb) -> Self {
        Self::new(PlatformKind::Normal, aabb)
    }

    /// Create a jump-through platform.
    pub fn jumpthru(aabb: Aabb) -> Self {
        Self::new(PlatformKind::Jumpthru, aabb)
    }

    /// Create a ladder.
    pub fn ladder(aabb: Aabb) -> Self {
        Self::new(PlatformKind::Ladder, aabb)
    }

    pub fn with_grab_offset(mut self, y_grab_offset: f32) -> Self {
        self.y_grab_offset = y_grab_offset;
        self
    }

    pub fn not_grabbable(mut self) -> Self {
        self.can_be_grabbed = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(PlatformKind::from_name("Ladder"), PlatformKind::Ladder);
        assert_eq!(PlatformKind::from_name("Jumpthru"), PlatformKind::Jumpthru);
        assert_eq!(PlatformKind::from_name("Normal"), PlatformKind::Normal);
        // Unknown names default silently
        assert_eq!(PlatformKind::from_name("Conveyor"), PlatformKind::Normal);
        assert_eq!(PlatformKind::from_name(""), PlatformKind::Normal);
    }

    #[test]
    fn test_kind_name_round_trip() {
        for kind in [PlatformKind::Normal, PlatformKind::Jumpthru, PlatformKind::Ladder] {
            assert_eq!(PlatformKind::from_name(kind.name()), kind);
        }
    }
}
