//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Platform poses are closed-form functions of the match clock
//! - Seeded RNG only (course variants)
//! - Stable iteration order (Player 1 before Player 2, platforms by id)
//! - No rendering, input or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod course;
pub mod platform;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{ContactResult, find_support, resolve};
pub use course::{build_course, seeded_course, standard_course};
pub use platform::{Archetype, Oscillation, Platform, PlatformPose};
pub use scoring::{Award, on_contact};
pub use state::{
    FrameSnapshot, GameEvent, MatchState, PlayerSlot, PlayerSnapshot, PlayerState, RunPhase,
    SetupError, VersusOutcome, VersusReason,
};
pub use tick::{MovementIntent, TickInput, step_player, tick};
