//! Controlled Object Abstraction
//!
//! The controller moves "something with a position and a size" - it does
//! not own the object it drives. Hosts implement [`ControlledObject`] for
//! their own entity type; [`CharacterBody`] is a ready-made implementation
//! for simple hosts and for tests.

use serde::{Serialize, Deserialize};
use crate::math::{Aabb, Vec2};

/// The narrow interface the controller needs from the object it drives.
///
/// Positions are the top-left corner of the collision box, in pixels,
/// Y growing downward.
pub trait ControlledObject {
    fn x(&self) -> f32;
    fn y(&self) -> f32;
    fn set_x(&mut self, x: f32);
    fn set_y(&mut self, y: f32);
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// The collision box at the current position.
    fn aabb(&self) -> Aabb {
        Aabb::new(self.x(), self.y(), self.width(), self.height())
    }
}

/// A plain axis-aligned body.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterBody {
    pub position: Vec2,
    pub size: Vec2,
}

impl CharacterBody {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }
}

impl ControlledObject for CharacterBody {
    fn x(&self) -> f32 {
        self.position.x
    }

    fn y(&self) -> f32 {
        self.position.y
    }

    fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    fn set_y(&mut self, y: f32) {
        self.position.y = y;
    }

    fn width(&self) -> f32 {
        self.size.x
    }

    fn height(&self) -> f32 {
        self.size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_tracks_position() {
        let mut body = CharacterBody::new(10.0, 20.0, 32.0, 48.0);
        assert_eq!(body.aabb(), Aabb::new(10.0, 20.0, 32.0, 48.0));

        body.set_x(15.0);
        body.set_y(25.0);
        assert_eq!(body.aabb(), Aabb::new(15.0, 25.0, 32.0, 48.0));
    }
}
