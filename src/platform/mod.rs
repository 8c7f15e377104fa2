//! Platform Geometry Module
//!
//! Everything the controller collides with: platform components, the
//! per-scene registry of active platforms, and the generational handles
//! used to reference platforms safely across frames.
//!
//! Key concepts:
//! - PlatformHandle: generational index for safe platform references
//! - Platform: plain data describing one piece of collidable geometry
//! - PlatformRegistry: the set of platforms active in one scene
//! - Scene: the simulation context owning storage and registry

pub mod handle;
pub mod platform;
pub mod registry;
pub mod scene;

pub use handle::PlatformHandle;
pub use platform::{Platform, PlatformKind};
pub use registry::PlatformRegistry;
pub use scene::{Scene, SceneId};
