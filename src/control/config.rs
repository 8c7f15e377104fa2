//! Controller Configuration
//!
//! All tunables of the movement controller, persisted as human-readable
//! RON. Every field is a plain value except the slope angle, which is
//! validated at the setter boundary: the climbing factor derived from it
//! bounds every stepping loop in the controller, so an out-of-range angle
//! would break termination guarantees.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

/// Fixed climbing speed on ladders, in pixels per second.
pub const LADDER_CLIMB_SPEED: f32 = 150.0;

/// Error type for configuration handling.
#[derive(Debug)]
pub enum ConfigError {
    /// The slope angle must be >= 0 and < 90 degrees.
    SlopeAngleOutOfRange(f32),
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SlopeAngleOutOfRange(angle) => {
                write!(f, "slope max angle {} out of range (must be >= 0 and < 90 degrees)", angle)
            }
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Movement tunables for one controller.
///
/// All speeds are in pixels per second, accelerations in pixels per second
/// squared, times in seconds, distances in pixels, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Round coordinates when resolving collisions. Integer positions make
    /// the simulation frame-stable; turn off only for sub-pixel rendering.
    pub round_coordinates: bool,
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Cap on the fall speed
    pub max_falling_speed: f32,
    /// Horizontal acceleration while a direction is held
    pub acceleration: f32,
    /// Horizontal deceleration when no direction is held
    pub deceleration: f32,
    /// Cap on the horizontal speed
    pub max_speed: f32,
    /// Initial upward speed when a jump starts
    pub jump_speed: f32,
    /// While the jump intent stays held within this window, the jump speed
    /// does not decay, allowing variable jump heights
    pub jump_sustain_time: f32,
    /// Ignore the host-polled input snapshot, moving only on simulated
    /// intents
    pub ignore_default_controls: bool,
    /// Steepest floor slope the controller will walk on, in degrees.
    /// Private: mutate through `set_slope_max_angle`.
    slope_max_angle: f32,
    /// Allow grabbing the edges of grabbable platforms while airborne
    pub can_grab_platforms: bool,
    /// Vertical offset of the controller's grab anchor, relative to its top
    pub y_grab_offset: f32,
    /// How far ahead (in pixels) to probe for a grabbable edge
    pub x_grab_tolerance: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            round_coordinates: true,
            gravity: 1000.0,
            max_falling_speed: 700.0,
            acceleration: 1500.0,
            deceleration: 1500.0,
            max_speed: 250.0,
            jump_speed: 600.0,
            jump_sustain_time: 0.2,
            ignore_default_controls: false,
            slope_max_angle: 60.0,
            can_grab_platforms: false,
            y_grab_offset: 0.0,
            x_grab_tolerance: 10.0,
        }
    }
}

impl ControllerConfig {
    /// Steepest walkable slope, in degrees.
    pub fn slope_max_angle(&self) -> f32 {
        self.slope_max_angle
    }

    /// Set the steepest walkable slope. Rejects angles outside [0, 90)
    /// degrees, leaving the previous value intact.
    pub fn set_slope_max_angle(&mut self, angle: f32) -> Result<(), ConfigError> {
        if !(0.0..90.0).contains(&angle) {
            log::warn!("rejected slope max angle {} (must be >= 0 and < 90 degrees)", angle);
            return Err(ConfigError::SlopeAngleOutOfRange(angle));
        }
        self.slope_max_angle = angle;
        Ok(())
    }

    /// Maximum vertical-to-horizontal ratio the floor-following logic will
    /// absorb per pixel of horizontal movement. Derived from the slope
    /// angle; 45 degrees is pinned to exactly 1 so the most common setting
    /// is free of trigonometric rounding noise.
    pub fn slope_climbing_factor(&self) -> f32 {
        if self.slope_max_angle == 45.0 {
            1.0
        } else {
            self.slope_max_angle.to_radians().tan()
        }
    }

    /// Serialize to a RON string.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Parse from a RON string. A persisted slope angle that is out of
    /// range falls back to the default angle.
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let mut config: Self = ron::from_str(s)?;
        if !(0.0..90.0).contains(&config.slope_max_angle) {
            log::warn!(
                "persisted slope max angle {} out of range, using default",
                config.slope_max_angle
            );
            config.slope_max_angle = Self::default().slope_max_angle;
        }
        Ok(config)
    }

    /// Save to a RON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Load from a RON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_ron_str(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slope_angle_boundaries() {
        let mut config = ControllerConfig::default();
        let before = config.slope_max_angle();

        assert!(config.set_slope_max_angle(90.0).is_err());
        assert_eq!(config.slope_max_angle(), before);

        assert!(config.set_slope_max_angle(-1.0).is_err());
        assert_eq!(config.slope_max_angle(), before);

        assert!(config.set_slope_max_angle(0.0).is_ok());
        assert_eq!(config.slope_max_angle(), 0.0);
        assert_eq!(config.slope_climbing_factor(), 0.0);
    }

    #[test]
    fn test_climbing_factor_at_45_degrees_is_exactly_one() {
        let mut config = ControllerConfig::default();
        config.set_slope_max_angle(45.0).unwrap();
        assert_eq!(config.slope_climbing_factor(), 1.0);
    }

    #[test]
    fn test_climbing_factor_is_tangent() {
        let mut config = ControllerConfig::default();
        config.set_slope_max_angle(30.0).unwrap();
        let expected = 30.0f32.to_radians().tan();
        assert!((config.slope_climbing_factor() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = ControllerConfig::default();
        config.gravity = 1234.0;
        config.max_speed = 321.0;
        config.can_grab_platforms = true;
        config.set_slope_max_angle(45.0).unwrap();

        let text = config.to_ron_string().unwrap();
        let restored = ControllerConfig::from_ron_str(&text).unwrap();
        assert_eq!(restored, config);
        // The derived factor is recomputed consistently
        assert_eq!(restored.slope_climbing_factor(), 1.0);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controller.ron");

        let mut config = ControllerConfig::default();
        config.jump_speed = 750.0;
        config.save_to_file(&path).unwrap();

        let restored = ControllerConfig::load_from_file(&path).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ControllerConfig::from_ron_str("(gravity: 500.0)").unwrap();
        assert_eq!(config.gravity, 500.0);
        assert_eq!(config.max_speed, ControllerConfig::default().max_speed);
    }
}
