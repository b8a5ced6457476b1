//! Match settings and physics tuning
//!
//! Supplied by the host at match start. The host owns storage; this module only
//! converts to and from JSON strings.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Number of simulated players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// One player, full-length course
    #[default]
    Solo,
    /// Two players on a shared course, split screen
    Versus,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Solo => "Solo",
            GameMode::Versus => "Versus",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "solo" | "single" | "1" => Some(GameMode::Solo),
            "versus" | "vs" | "multi" | "2" => Some(GameMode::Versus),
            _ => None,
        }
    }

    /// Active player slots for this mode
    pub fn player_count(&self) -> usize {
        match self {
            GameMode::Solo => 1,
            GameMode::Versus => 2,
        }
    }

    /// Platforms after the start platform in the generated course
    pub fn course_length(&self) -> usize {
        match self {
            GameMode::Solo => SOLO_COURSE_LENGTH,
            GameMode::Versus => VERSUS_COURSE_LENGTH,
        }
    }
}

/// Physics tuning constants
///
/// None of these are derived from first principles; they were tuned by feel and
/// can be changed without touching the algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub acceleration: f32,
    pub max_speed: f32,
    pub jump_force: f32,
    pub ground_friction: f32,
    pub air_friction: f32,
    pub friction_reference_hz: f32,
    pub coupling_factor: f32,
    pub ball_radius: f32,
    pub fail_threshold: f32,
    pub max_dt: f32,
    pub contact_epsilon: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            acceleration: ACCELERATION,
            max_speed: MAX_SPEED,
            jump_force: JUMP_FORCE,
            ground_friction: GROUND_FRICTION,
            air_friction: AIR_FRICTION,
            friction_reference_hz: FRICTION_REFERENCE_HZ,
            coupling_factor: COUPLING_FACTOR,
            ball_radius: BALL_RADIUS,
            fail_threshold: FAIL_THRESHOLD,
            max_dt: MAX_DT,
            contact_epsilon: CONTACT_EPSILON,
        }
    }
}

impl PhysicsTuning {
    /// Velocity retention for a step of `dt` seconds
    ///
    /// The factors are per-frame at `friction_reference_hz`, so they are
    /// raised to the number of reference frames the step covers.
    pub fn friction_for(&self, grounded: bool, dt: f32) -> f32 {
        let factor = if grounded {
            self.ground_friction
        } else {
            self.air_friction
        };
        factor.powf(dt * self.friction_reference_hz)
    }

    /// Clamp a host-measured frame delta into a safe integration step
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }
}

/// Match settings handed over by the menu layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub mode: GameMode,
    /// Override the mode's course length (platforms after the start platform)
    pub course_length: Option<usize>,
    /// Seed for a randomized course variant (`None` = the standard course)
    pub course_seed: Option<u64>,
    pub tuning: PhysicsTuning,
}

impl Settings {
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Course length after applying any override
    pub fn effective_course_length(&self) -> usize {
        self.course_length.unwrap_or_else(|| self.mode.course_length())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
