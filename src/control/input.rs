//! Per-Step Input Snapshot
//!
//! The controller never polls devices itself. The host samples whatever
//! input sources it has (keyboard, gamepad, replay, network) into an
//! `InputSnapshot` and passes it to every step. This keeps the core free
//! of hidden global state and makes every step directly testable.
//!
//! Scripted one-shot intents (`MovementController::simulate_*`) are merged
//! on top of the snapshot inside the controller.

/// Intent flags for one controller step.
///
/// `up` doubles as the ladder-mount intent, matching the traditional
/// default key mapping; `ladder` exists for hosts that bind mounting to a
/// dedicated control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Dedicated ladder-mount intent
    pub ladder: bool,
    pub jump: bool,
    /// Let go of a grabbed platform edge
    pub release_platform: bool,
}

impl InputSnapshot {
    /// No intent at all.
    pub const NONE: InputSnapshot = InputSnapshot {
        left: false,
        right: false,
        up: false,
        down: false,
        ladder: false,
        jump: false,
        release_platform: false,
    };

    pub fn left() -> Self {
        Self { left: true, ..Self::NONE }
    }

    pub fn right() -> Self {
        Self { right: true, ..Self::NONE }
    }

    pub fn up() -> Self {
        Self { up: true, ..Self::NONE }
    }

    pub fn down() -> Self {
        Self { down: true, ..Self::NONE }
    }

    pub fn jump() -> Self {
        Self { jump: true, ..Self::NONE }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    /// Union of two snapshots: an intent is held if either source holds it.
    pub fn merged(self, other: InputSnapshot) -> InputSnapshot {
        InputSnapshot {
            left: self.left || other.left,
            right: self.right || other.right,
            up: self.up || other.up,
            down: self.down || other.down,
            ladder: self.ladder || other.ladder,
            jump: self.jump || other.jump,
            release_platform: self.release_platform || other.release_platform,
        }
    }
}
