//! Movement Controller
//!
//! The per-character state machine. Each step gathers nearby platforms
//! from the scene registry, integrates motion, resolves collisions and
//! updates the floor/ladder/grab/jump state for one controlled object.
//!
//! The step is a single synchronous pass with a fixed phase order, so the
//! same inputs always produce the same output. There are no recoverable
//! errors inside a step: an impossible move resolves by policy (revert the
//! axis, zero the speed, leave the mode), never by failing.
//!
//! Collision backoff works in whole pixels: positions are first rounded
//! opportunistically, then stepped one pixel at a time against the
//! direction of travel. Every stepping loop is bounded, either by the
//! original position or by the slope climbing budget.

use log::debug;

use crate::math::{Aabb, Vec2};
use crate::platform::{Platform, PlatformHandle, PlatformKind, Scene, SceneId};
use super::body::ControlledObject;
use super::config::{ControllerConfig, LADDER_CLIMB_SPEED};
use super::input::InputSnapshot;

/// What is currently holding the character up.
///
/// Exactly one mode holds at a time; a handle kept here is re-validated
/// against the candidate set every step and the mode is left when the
/// platform disappears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Support {
    /// In the air: gravity applies.
    Airborne,
    /// Standing on this platform.
    Floor(PlatformHandle),
    /// Climbing a ladder: gravity suspended, vertical movement direct.
    Ladder,
    /// Hanging from the edge of this platform: gravity suspended.
    Grab(PlatformHandle),
}

/// A platform retained by the broad phase for this step.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    handle: PlatformHandle,
    platform: Platform,
}

/// Kinematic movement controller for one character.
pub struct MovementController {
    config: ControllerConfig,

    // Dynamic state
    support: Support,
    current_speed: f32,
    current_fall_speed: f32,
    current_jump_speed: f32,
    jumping: bool,
    can_jump: bool,
    time_since_jump_start: f32,

    /// Floor platform position at the end of the last step, for
    /// co-movement compensation
    floor_last_pos: Vec2,
    /// Grabbed platform position at the end of the last step
    grabbed_last_pos: Vec2,
    /// Body height at the end of the last step, to keep the bottom edge
    /// stuck to the floor when the body is resized
    last_height: f32,

    /// One-shot intents queued by `simulate_*`, cleared at tick close
    simulated: InputSnapshot,
    /// Scene this controller is currently bound to
    bound_scene: Option<SceneId>,
    /// Did the last step move the object at least one pixel horizontally?
    moved_horizontally: bool,
}

impl MovementController {
    /// Create a controller with default tunables.
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    /// Create a controller with the given tunables.
    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            config,
            support: Support::Airborne,
            current_speed: 0.0,
            current_fall_speed: 0.0,
            current_jump_speed: 0.0,
            jumping: false,
            can_jump: false,
            time_since_jump_start: 0.0,
            floor_last_pos: Vec2::ZERO,
            grabbed_last_pos: Vec2::ZERO,
            last_height: 0.0,
            simulated: InputSnapshot::NONE,
            bound_scene: None,
            moved_horizontally: false,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Mutable access to the tunables. The slope angle keeps its validated
    /// setter; every other tunable is a plain field.
    pub fn config_mut(&mut self) -> &mut ControllerConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: ControllerConfig) {
        self.config = config;
    }

    // =========================================================================
    // State queries
    // =========================================================================

    pub fn is_on_floor(&self) -> bool {
        matches!(self.support, Support::Floor(_))
    }

    pub fn is_on_ladder(&self) -> bool {
        self.support == Support::Ladder
    }

    pub fn is_grabbing_platform(&self) -> bool {
        matches!(self.support, Support::Grab(_))
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    /// Airborne and heading downward (or rising slower than falling).
    pub fn is_falling(&self) -> bool {
        self.support == Support::Airborne
            && (!self.jumping || self.current_fall_speed > self.current_jump_speed)
    }

    /// Did the last step produce any real movement?
    pub fn is_moving(&self) -> bool {
        (self.moved_horizontally && self.current_speed != 0.0)
            || self.current_jump_speed > 0.0
            || self.current_fall_speed > 0.0
    }

    pub fn support(&self) -> Support {
        self.support
    }

    pub fn floor_platform(&self) -> Option<PlatformHandle> {
        match self.support {
            Support::Floor(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn grabbed_platform(&self) -> Option<PlatformHandle> {
        match self.support {
            Support::Grab(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    pub fn current_fall_speed(&self) -> f32 {
        self.current_fall_speed
    }

    pub fn current_jump_speed(&self) -> f32 {
        self.current_jump_speed
    }

    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    /// Allow or forbid the next jump, regardless of support state.
    pub fn set_can_jump(&mut self, can_jump: bool) {
        self.can_jump = can_jump;
    }

    /// Cut the current jump short, as if its impulse were spent.
    pub fn abort_jump(&mut self) {
        self.jumping = false;
        self.current_jump_speed = 0.0;
    }

    // =========================================================================
    // Scripted controls
    // =========================================================================

    pub fn simulate_left(&mut self) {
        self.simulated.left = true;
    }

    pub fn simulate_right(&mut self) {
        self.simulated.right = true;
    }

    pub fn simulate_up(&mut self) {
        self.simulated.up = true;
    }

    pub fn simulate_down(&mut self) {
        self.simulated.down = true;
    }

    pub fn simulate_ladder(&mut self) {
        self.simulated.ladder = true;
    }

    pub fn simulate_jump(&mut self) {
        self.simulated.jump = true;
    }

    pub fn simulate_release_platform(&mut self) {
        self.simulated.release_platform = true;
    }

    /// Move only on simulated intents, ignoring the host-polled snapshot.
    pub fn set_ignore_default_controls(&mut self, ignore: bool) {
        self.config.ignore_default_controls = ignore;
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Re-check the scene binding without moving. The surrounding loop
    /// calls this after game logic ran, so a character transplanted to a
    /// different scene drops its references before the next full step.
    pub fn rebind(&mut self, scene: &Scene) {
        self.ensure_bound(scene);
    }

    fn ensure_bound(&mut self, scene: &Scene) {
        if self.bound_scene == Some(scene.id()) {
            return;
        }
        if self.bound_scene.is_some() {
            debug!("movement controller rebinding to scene {:?}", scene.id());
            // Handles from the old scene are meaningless here
            self.support = Support::Airborne;
        }
        self.bound_scene = Some(scene.id());
    }

    /// Run one tick of movement for `object` against the platforms of
    /// `scene`. `controls` is the host-polled input; simulated intents are
    /// merged on top. A step with `dt <= 0` changes nothing.
    pub fn step(
        &mut self,
        object: &mut impl ControlledObject,
        scene: &Scene,
        controls: &InputSnapshot,
        dt: f32,
    ) {
        if dt <= 0.0 {
            return;
        }
        self.ensure_bound(scene);

        let cfg = self.config;
        let input = if cfg.ignore_default_controls {
            self.simulated
        } else {
            self.simulated.merged(*controls)
        };

        // ---- Broad phase: platforms reachable this tick ----
        let max_displacement = cfg
            .max_speed
            .max(cfg.max_falling_speed)
            .max(cfg.jump_speed)
            .max(LADDER_CLIMB_SPEED)
            * dt
            + cfg.x_grab_tolerance;
        let candidates = gather_candidates(object, scene, max_displacement);

        // A remembered platform outside the candidate set is gone: leave
        // the mode silently.
        match self.support {
            Support::Floor(handle) if find_candidate(&candidates, handle).is_none() => {
                self.support = Support::Airborne;
            }
            Support::Grab(handle) if find_candidate(&candidates, handle).is_none() => {
                self.support = Support::Airborne;
            }
            _ => {}
        }

        // Jumpthrus overlapped before moving stay passable for the whole
        // tick ("land on top" semantics).
        let start_aabb = object.aabb();
        let overlapped_jumpthru: Vec<PlatformHandle> = candidates
            .iter()
            .filter(|c| c.platform.kind == PlatformKind::Jumpthru && start_aabb.overlaps(&c.platform.aabb))
            .map(|c| c.handle)
            .collect();

        // ---- Size-change tracking: keep the bottom edge on the floor ----
        if self.is_on_floor() && self.last_height > 0.0 && object.height() != self.last_height {
            object.set_y(object.y() + self.last_height - object.height());
        }
        self.last_height = object.height();

        // ---- Horizontal intent ----
        let mut requested_dx = 0.0_f32;
        let mut requested_dy = 0.0_f32;

        if input.left {
            self.current_speed -= cfg.acceleration * dt;
        }
        if input.right {
            self.current_speed += cfg.acceleration * dt;
        }
        if !input.left && !input.right && self.current_speed != 0.0 {
            // Decelerate toward zero without overshooting
            let decel = cfg.deceleration * dt;
            if self.current_speed > 0.0 {
                self.current_speed = (self.current_speed - decel).max(0.0);
            } else {
                self.current_speed = (self.current_speed + decel).min(0.0);
            }
        }
        self.current_speed = self.current_speed.clamp(-cfg.max_speed, cfg.max_speed);
        requested_dx += self.current_speed * dt;

        // Follow the movement of the floor or grabbed platform
        if let Support::Floor(handle) = self.support {
            if let Some(platform) = find_candidate(&candidates, handle) {
                requested_dx += platform.aabb.x - self.floor_last_pos.x;
                requested_dy += platform.aabb.y - self.floor_last_pos.y;
            }
        }
        if let Support::Grab(handle) = self.support {
            if let Some(platform) = find_candidate(&candidates, handle) {
                requested_dx += platform.aabb.x - self.grabbed_last_pos.x;
                requested_dy += platform.aabb.y - self.grabbed_last_pos.y;
            }
        }

        // ---- Unstick pass: push out of solids before integrating ----
        if separate_from_platforms(object, &candidates) {
            // Freed from a solid: the character may jump again
            self.can_jump = true;
        }

        // ---- X-axis resolution ----
        let old_x = object.x();
        if requested_dx != 0.0 {
            object.set_x(old_x + requested_dx);
            let mut try_rounding = cfg.round_coordinates;
            // Jumpthrus and ladders never block horizontal movement.
            while collides_with_platforms(&object.aabb(), &candidates, true, &[]) {
                if (requested_dx > 0.0 && object.x() <= old_x)
                    || (requested_dx < 0.0 && object.x() >= old_x)
                {
                    object.set_x(old_x); // No free position on this axis
                    break;
                }
                // On a floor, a one-pixel lift clears slightly misaligned
                // surfaces and one-pixel stair steps.
                if self.is_on_floor() {
                    object.set_y(object.y() - 1.0);
                    if !collides_with_platforms(&object.aabb(), &candidates, true, &[]) {
                        break;
                    }
                    object.set_y(object.y() + 1.0);
                }
                if try_rounding {
                    object.set_x(object.x().round());
                    try_rounding = false;
                } else {
                    object.set_x(object.x().round() + if requested_dx > 0.0 { -1.0 } else { 1.0 });
                }
                self.current_speed = 0.0; // Hit a wall
            }
        }

        // ---- Ladder entry, climbing, exit ----
        if (input.up || input.ladder) && overlaps_ladder(&object.aabb(), &candidates) {
            self.support = Support::Ladder;
            self.can_jump = true;
            self.jumping = false;
            self.current_jump_speed = 0.0;
            self.current_fall_speed = 0.0;
        }
        if self.support == Support::Ladder {
            if input.up {
                requested_dy -= LADDER_CLIMB_SPEED * dt;
            }
            if input.down {
                requested_dy += LADDER_CLIMB_SPEED * dt;
            }
            if !overlaps_ladder(&object.aabb(), &candidates) {
                self.support = Support::Airborne;
            }
        }

        // ---- Free fall ----
        if self.support == Support::Airborne {
            self.current_fall_speed =
                (self.current_fall_speed + cfg.gravity * dt).min(cfg.max_falling_speed);
            requested_dy += self.current_fall_speed * dt;
            requested_dy = requested_dy.min(cfg.max_falling_speed * dt);
        }

        // ---- Ledge grab ----
        if cfg.can_grab_platforms && requested_dx != 0.0 && self.support == Support::Airborne {
            let probe_dx = if requested_dx > 0.0 { cfg.x_grab_tolerance } else { -cfg.x_grab_tolerance };
            let probe = object.aabb().translated(probe_dx, 0.0);

            // A platform is grabbable when its grab line sits between the
            // anchor's current height and where this tick's fall would
            // take it.
            let grabbed = candidates.iter().find(|c| {
                c.platform.kind == PlatformKind::Normal
                    && c.platform.can_be_grabbed
                    && probe.overlaps(&c.platform.aabb)
                    && {
                        let relative = (object.y() + cfg.y_grab_offset)
                            - (c.platform.aabb.y + c.platform.y_grab_offset);
                        relative <= 0.0 && relative + requested_dy >= 0.0
                    }
            });

            if let Some(candidate) = grabbed.copied() {
                let old_y = object.y();
                object.set_y(
                    candidate.platform.aabb.y + candidate.platform.y_grab_offset - cfg.y_grab_offset,
                );
                // Only grab if the snapped position is collision-free
                if !collides_with_platforms(&object.aabb(), &candidates, true, &[]) {
                    self.support = Support::Grab(candidate.handle);
                    self.grabbed_last_pos =
                        Vec2::new(candidate.platform.aabb.x, candidate.platform.aabb.y);
                    requested_dy = 0.0;
                    self.can_jump = true;
                    self.jumping = false;
                    self.current_jump_speed = 0.0;
                    self.current_fall_speed = 0.0;
                } else {
                    object.set_y(old_y);
                }
            }
        }
        if self.is_grabbing_platform() && (input.release_platform || input.down) {
            self.support = Support::Airborne;
        }

        // ---- Jump ----
        if self.can_jump && input.jump {
            self.jumping = true;
            self.can_jump = false;
            self.support = Support::Airborne;
            self.current_jump_speed = cfg.jump_speed;
            self.current_fall_speed = 0.0;
            self.time_since_jump_start = 0.0;
        }
        if self.jumping {
            self.time_since_jump_start += dt;
            requested_dy -= self.current_jump_speed * dt;
            // Holding the jump intent within the sustain window keeps the
            // impulse alive, allowing variable jump heights.
            let sustained = input.jump && self.time_since_jump_start < cfg.jump_sustain_time;
            if !sustained {
                self.current_jump_speed -= cfg.gravity * dt;
            }
            if self.current_jump_speed <= 0.0 {
                self.current_jump_speed = 0.0;
                self.jumping = false;
            }
        }

        // ---- Floor following ----
        if let Support::Floor(floor_handle) = self.support {
            if let Some(floor) = find_candidate(&candidates, floor_handle) {
                let factor = cfg.slope_climbing_factor();
                if object.aabb().overlaps(&floor.aabb) {
                    // The floor rose into the body: climb it, within the
                    // slope budget.
                    let budget = (requested_dx.abs() * factor).floor();
                    let old_y = object.y();
                    let mut steps = 0.0_f32;
                    let mut too_steep = false;
                    loop {
                        if steps >= budget {
                            too_steep = true;
                            break;
                        }
                        object.set_y(object.y() - 1.0);
                        steps += 1.0;
                        if !collides_with_platforms(
                            &object.aabb(),
                            &candidates,
                            false,
                            &overlapped_jumpthru,
                        ) {
                            break;
                        }
                    }
                    if too_steep {
                        // Slope too steep: revert the whole tick's shift
                        object.set_y(old_y);
                        object.set_x(old_x);
                    }
                } else {
                    // Flat or descending floor: probe downward to keep
                    // contact, within the same budget.
                    let budget = requested_dx.abs() * factor;
                    let old_y = object.y();
                    object.set_y(object.y() + 1.0);
                    let mut steps = 0.0_f32;
                    let mut lost = false;
                    while !collides_with_platforms(
                        &object.aabb(),
                        &candidates,
                        false,
                        &overlapped_jumpthru,
                    ) {
                        if steps > budget {
                            lost = true;
                            break;
                        }
                        object.set_y(object.y() + 1.0);
                        steps += 1.0;
                    }
                    if lost {
                        // The floor dropped away faster than the slope
                        // budget allows: give up contact for this tick.
                        object.set_y(old_y);
                    } else {
                        object.set_y(object.y() - 1.0); // Back on top
                    }
                }
            }
        }

        // ---- Y-axis resolution ----
        if requested_dy != 0.0 {
            let old_y = object.y();
            object.set_y(old_y + requested_dy);
            loop {
                // Upward motion always passes through jumpthrus; downward
                // motion passes only through those overlapped at tick
                // start.
                let blocked = if requested_dy < 0.0 {
                    collides_with_platforms(&object.aabb(), &candidates, true, &[])
                } else {
                    collides_with_platforms(&object.aabb(), &candidates, false, &overlapped_jumpthru)
                };
                if !blocked {
                    break;
                }
                self.jumping = false;
                self.current_jump_speed = 0.0;
                if (requested_dy > 0.0 && object.y() <= old_y)
                    || (requested_dy < 0.0 && object.y() >= old_y)
                {
                    object.set_y(old_y); // No free position on this axis
                    break;
                }
                object.set_y(object.y().floor() + if requested_dy > 0.0 { -1.0 } else { 1.0 });
            }
        }

        // ---- Floor re-acquisition ----
        {
            // Jumpthrus intersected at the resolved position are being
            // passed through, not stood on: "newly touching" is judged
            // against where the body ended up, not where it started.
            let resolved_aabb = object.aabb();
            let passing_jumpthru: Vec<PlatformHandle> = candidates
                .iter()
                .filter(|c| {
                    c.platform.kind == PlatformKind::Jumpthru
                        && resolved_aabb.overlaps(&c.platform.aabb)
                })
                .map(|c| c.handle)
                .collect();

            let old_y = object.y();
            object.set_y(old_y + 1.0);
            let probe = object.aabb();

            let mut still_on_floor = false;
            if let Support::Floor(handle) = self.support {
                if let Some(floor) = find_candidate(&candidates, handle) {
                    if probe.overlaps(&floor.aabb) {
                        still_on_floor = true;
                        self.floor_last_pos = Vec2::new(floor.aabb.x, floor.aabb.y);
                    }
                }
            }

            if !still_on_floor {
                // Landing: any newly touched non-ladder platform becomes
                // the floor.
                let landed = candidates.iter().find(|c| {
                    let passable = match c.platform.kind {
                        PlatformKind::Ladder => true,
                        PlatformKind::Jumpthru => passing_jumpthru.contains(&c.handle),
                        PlatformKind::Normal => false,
                    };
                    !passable && probe.overlaps(&c.platform.aabb)
                });

                if let Some(floor) = landed {
                    self.support = Support::Floor(floor.handle);
                    self.can_jump = true;
                    self.jumping = false;
                    self.current_jump_speed = 0.0;
                    self.current_fall_speed = 0.0;
                    self.floor_last_pos = Vec2::new(floor.platform.aabb.x, floor.platform.aabb.y);
                } else {
                    match self.support {
                        Support::Grab(_) => {}
                        Support::Ladder => self.can_jump = false,
                        _ => {
                            self.can_jump = false;
                            self.support = Support::Airborne;
                        }
                    }
                }
            }
            object.set_y(old_y);
        }

        // Track the grabbed platform for next tick's co-movement
        if let Support::Grab(handle) = self.support {
            if let Some(platform) = find_candidate(&candidates, handle) {
                self.grabbed_last_pos = Vec2::new(platform.aabb.x, platform.aabb.y);
            }
        }

        // ---- Tick close ----
        self.simulated = InputSnapshot::NONE;
        self.moved_horizontally = (object.x() - old_x).abs() >= 1.0;
    }
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Collision helpers
// =============================================================================

/// Broad phase: keep platforms whose bounding circle could intersect the
/// object's bounding circle after the largest possible displacement.
fn gather_candidates(
    object: &impl ControlledObject,
    scene: &Scene,
    max_displacement: f32,
) -> Vec<Candidate> {
    let aabb = object.aabb();
    let center = aabb.center();
    let reach = aabb.bounding_radius() + max_displacement;

    scene
        .active_platforms()
        .filter(|(_, platform)| {
            center.distance(platform.aabb.center()) <= reach + platform.aabb.bounding_radius()
        })
        .map(|(handle, platform)| Candidate { handle, platform: *platform })
        .collect()
}

fn find_candidate(candidates: &[Candidate], handle: PlatformHandle) -> Option<&Platform> {
    candidates.iter().find(|c| c.handle == handle).map(|c| &c.platform)
}

/// Obstacle test. Ladders never block. Jumpthrus block unless
/// `exclude_jumpthrus` is set or they are listed in `pass_through`.
fn collides_with_platforms(
    aabb: &Aabb,
    candidates: &[Candidate],
    exclude_jumpthrus: bool,
    pass_through: &[PlatformHandle],
) -> bool {
    candidates.iter().any(|c| {
        match c.platform.kind {
            PlatformKind::Ladder => return false,
            PlatformKind::Jumpthru => {
                if exclude_jumpthrus || pass_through.contains(&c.handle) {
                    return false;
                }
            }
            PlatformKind::Normal => {}
        }
        aabb.overlaps(&c.platform.aabb)
    })
}

fn overlaps_ladder(aabb: &Aabb, candidates: &[Candidate]) -> bool {
    candidates
        .iter()
        .any(|c| c.platform.kind == PlatformKind::Ladder && aabb.overlaps(&c.platform.aabb))
}

/// Push the object out of any solid platform it penetrates, along the
/// minimal separating axis. Returns true if any separation happened.
fn separate_from_platforms(object: &mut impl ControlledObject, candidates: &[Candidate]) -> bool {
    let mut separated = false;
    for c in candidates {
        if c.platform.kind != PlatformKind::Normal {
            continue;
        }
        if let Some(push) = object.aabb().separation_from(&c.platform.aabb) {
            object.set_x(object.x() + push.x);
            object.set_y(object.y() + push.y);
            separated = true;
        }
    }
    separated
}
