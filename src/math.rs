//! 2D Math Primitives
//!
//! Screen-space conventions throughout the crate: X grows to the right,
//! Y grows downward, so "falling" means increasing Y and "jumping" means
//! decreasing Y. Positions are in pixels.

use serde::{Serialize, Deserialize};

/// A 2D vector / point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        (*self - other).length()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// An axis-aligned bounding box. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Radius of the smallest circle containing this box, for broad-phase
    /// bounding-circle tests.
    pub fn bounding_radius(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt() / 2.0
    }

    /// Strict overlap test: boxes that merely share an edge do not overlap.
    /// Collision resolution relies on this so that a body resting exactly
    /// on top of a platform is "touching", not "colliding".
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Aabb {
        Aabb::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Minimal translation that moves `self` out of `other`, or `None` if
    /// the boxes do not overlap. The push is along a single axis, whichever
    /// penetration is smaller.
    pub fn separation_from(&self, other: &Aabb) -> Option<Vec2> {
        if !self.overlaps(other) {
            return None;
        }

        // Penetration depths on each side
        let push_left = self.right() - other.left();
        let push_right = other.right() - self.left();
        let push_up = self.bottom() - other.top();
        let push_down = other.bottom() - self.top();

        let push_x = if push_left < push_right { -push_left } else { push_right };
        let push_y = if push_up < push_down { -push_up } else { push_down };

        if push_x.abs() < push_y.abs() {
            Some(Vec2::new(push_x, 0.0))
        } else {
            Some(Vec2::new(0.0, push_y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0); // Shares the x=10 edge
        let c = Aabb::new(0.0, 10.0, 10.0, 10.0); // Shares the y=10 edge
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&Aabb::new(9.0, 9.0, 10.0, 10.0)));
    }

    #[test]
    fn test_separation_picks_minimal_axis() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 20.0);

        // Body sunk 3 pixels into the platform top: shortest way out is up.
        let body = Aabb::new(50.0, 63.0, 20.0, 40.0);
        let push = body.separation_from(&platform).unwrap();
        assert_eq!(push, Vec2::new(0.0, -3.0));

        // Body poking 2 pixels into the platform's left edge.
        let body = Aabb::new(-18.0, 95.0, 20.0, 20.0);
        let push = body.separation_from(&platform).unwrap();
        assert_eq!(push, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_separation_none_when_apart() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(50.0, 50.0, 10.0, 10.0);
        assert!(a.separation_from(&b).is_none());
    }

    #[test]
    fn test_bounding_radius() {
        let a = Aabb::new(0.0, 0.0, 6.0, 8.0);
        assert!((a.bounding_radius() - 5.0).abs() < 1e-6);
    }
}
