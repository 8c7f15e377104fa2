//! Movement Control Module
//!
//! The per-character half of the simulation: input snapshots, tunables,
//! the controlled-object abstraction and the movement controller itself.
//!
//! Key concepts:
//! - InputSnapshot: explicit per-step intent flags, no device polling
//! - ControllerConfig: tunables, persisted as RON
//! - ControlledObject: the narrow interface the controller drives
//! - MovementController: the per-tick kinematic state machine

pub mod body;
pub mod config;
pub mod controller;
pub mod input;

pub use body::{CharacterBody, ControlledObject};
pub use config::{ConfigError, ControllerConfig, LADDER_CLIMB_SPEED};
pub use controller::{MovementController, Support};
pub use input::InputSnapshot;
