//! Marble Run - split-screen 3D marble platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (platform motion, ball physics, collisions, scoring)
//! - `settings`: Match setup and physics tuning supplied by the host
//! - `highscores`: Session records exposed for an external persistence layer
//!
//! Windowing, input polling, rendering and file I/O live outside this crate.
//! The host feeds one `TickInput` per frame and draws the returned snapshot.

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{GameMode, PhysicsTuning, Settings};

use glam::{Vec2, Vec3};

/// Default gameplay constants
pub mod consts {
    /// Gravity (world units/s², negative is down)
    pub const GRAVITY: f32 = -15.0;
    /// Horizontal acceleration from full movement intent
    pub const ACCELERATION: f32 = 18.0;
    /// Horizontal speed cap
    pub const MAX_SPEED: f32 = 10.0;
    /// Vertical launch speed of a jump
    pub const JUMP_FORCE: f32 = 8.0;
    /// Per-frame horizontal velocity retention while grounded (at the reference rate)
    pub const GROUND_FRICTION: f32 = 0.85;
    /// Per-frame horizontal velocity retention while airborne (at the reference rate)
    pub const AIR_FRICTION: f32 = 0.98;
    /// Frame rate the friction factors were tuned at
    pub const FRICTION_REFERENCE_HZ: f32 = 60.0;
    /// Fraction of platform velocity carried over to a rider
    pub const COUPLING_FACTOR: f32 = 0.8;

    pub const BALL_RADIUS: f32 = 0.5;
    /// Below this height a ball with no support has fallen off the course
    pub const FAIL_THRESHOLD: f32 = -20.0;
    /// Largest integration step accepted from the host (frame hitch guard)
    pub const MAX_DT: f32 = 1.0 / 20.0;
    /// Tolerance for grounded/airborne comparisons
    pub const CONTACT_EPSILON: f32 = 1e-3;
    /// Spawn height above the start platform's surface contact point
    pub const SPAWN_DROP: f32 = 0.25;

    /// Points per platform are `(id + 1) * PLATFORM_POINTS`
    pub const PLATFORM_POINTS: u64 = 100;
    /// Flat bonus for reaching the final platform
    pub const COMPLETION_BONUS: u64 = 1000;
    /// A falling versus player still wins with a lead larger than this
    pub const VERSUS_LEAD_MARGIN: u64 = 100;

    /// Platforms after the start platform in a solo course
    pub const SOLO_COURSE_LENGTH: usize = 30;
    /// Platforms after the start platform in a versus course
    pub const VERSUS_COURSE_LENGTH: usize = 20;
}

/// Horizontal (x, z) part of a world vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Replace the horizontal (x, z) part of a world vector, keeping y
#[inline]
pub fn with_horizontal(v: Vec3, xz: Vec2) -> Vec3 {
    Vec3::new(xz.x, v.y, xz.y)
}
