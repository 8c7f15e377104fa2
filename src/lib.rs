//! Strider - kinematic character movement for 2D platformers
//!
//! A per-frame movement and collision core: platforms are plain
//! axis-aligned geometry registered in a per-scene registry, and each
//! character runs a deterministic per-tick state machine over them
//! (walking, jumping with sustain, ladders, jump-through platforms,
//! ledge grabbing, slope following, moving platforms).
//!
//! The crate owns no game loop and polls no devices: the host calls
//! [`MovementController::step`] once per frame with the scene, the body
//! to move and an [`InputSnapshot`] of this frame's intents.
//!
//! ```no_run
//! use strider::{
//!     Aabb, CharacterBody, InputSnapshot, MovementController, Platform, Scene,
//! };
//!
//! let mut scene = Scene::new();
//! scene.add_platform(Platform::normal(Aabb::new(0.0, 300.0, 640.0, 40.0)));
//!
//! let mut body = CharacterBody::new(100.0, 260.0, 20.0, 40.0);
//! let mut controller = MovementController::new();
//!
//! // Once per frame:
//! let input = InputSnapshot::right().with_jump();
//! controller.step(&mut body, &scene, &input, 1.0 / 60.0);
//! ```

pub mod control;
pub mod math;
pub mod platform;

pub use control::{
    CharacterBody, ConfigError, ControlledObject, ControllerConfig, InputSnapshot,
    MovementController, Support, LADDER_CLIMB_SPEED,
};
pub use math::{Aabb, Vec2};
pub use platform::{Platform, PlatformHandle, PlatformKind, PlatformRegistry, Scene, SceneId};
