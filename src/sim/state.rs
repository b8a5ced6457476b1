//! Match state and core simulation types
//!
//! Platforms live in an indexed vector built once at match start; players live
//! in two fixed slots. Everything refers to platforms by index.

use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::course;
use super::platform::{Platform, PlatformPose};
use crate::consts::SPAWN_DROP;
use crate::highscores::HighScores;
use crate::settings::{GameMode, PhysicsTuning, Settings};

/// Player slot (Player 1 is always simulated before Player 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

/// Stepping order
static SLOT_ORDER: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

impl PlayerSlot {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// Lifecycle of a player slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Spawned, not yet stepped
    Ready,
    /// Being simulated
    Active,
    /// Fell off the course; frozen until restart
    GameOver,
    /// Reached the final platform; frozen until restart
    Completed,
}

/// Mutable per-player simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub slot: PlayerSlot,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Set only by a resolved downward collision in the latest step
    pub is_grounded: bool,
    /// Supporting platform (lookup only, recomputed every step)
    pub current_platform_id: Option<usize>,
    pub score: u64,
    /// Platforms already credited
    pub platforms_reached: BTreeSet<usize>,
    /// Seconds since this run went active
    pub elapsed_time: f32,
    /// Fastest completion this session (survives restarts)
    pub best_time: Option<f32>,
    /// Highest score this session (survives restarts)
    pub best_score: u64,
    pub phase: RunPhase,
    spawn: Vec3,
}

impl PlayerState {
    pub fn new(slot: PlayerSlot, spawn: Vec3) -> Self {
        Self {
            slot,
            position: spawn,
            velocity: Vec3::ZERO,
            is_grounded: false,
            current_platform_id: None,
            score: 0,
            platforms_reached: BTreeSet::new(),
            elapsed_time: 0.0,
            best_time: None,
            best_score: 0,
            phase: RunPhase::Ready,
            spawn,
        }
    }

    /// Reset transient run state, keeping session records
    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.velocity = Vec3::ZERO;
        self.is_grounded = false;
        self.current_platform_id = None;
        self.score = 0;
        self.platforms_reached.clear();
        self.elapsed_time = 0.0;
        self.phase = RunPhase::Ready;
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.phase == RunPhase::Completed
    }

    /// Still integrating (not frozen in a terminal phase)
    #[inline]
    pub fn is_simulated(&self) -> bool {
        matches!(self.phase, RunPhase::Ready | RunPhase::Active)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            slot: self.slot,
            position: self.position,
            velocity: self.velocity,
            score: self.score,
            elapsed_time: self.elapsed_time,
            best_time: self.best_time,
            best_score: self.best_score,
            platforms_reached: self.platforms_reached.len(),
            is_game_over: self.is_game_over(),
            is_completed: self.is_completed(),
            is_grounded: self.is_grounded,
        }
    }
}

/// Read-only copy of a player for the renderer/HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub slot: PlayerSlot,
    pub position: Vec3,
    pub velocity: Vec3,
    pub score: u64,
    pub elapsed_time: f32,
    pub best_time: Option<f32>,
    pub best_score: u64,
    pub platforms_reached: usize,
    pub is_game_over: bool,
    pub is_completed: bool,
    pub is_grounded: bool,
}

/// Why a versus match was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersusReason {
    /// Winner reached the final platform first
    Completed,
    /// Opponent fell without a winning lead
    OpponentFell { lead: u64 },
    /// Winner fell, but with more than the required lead
    FellWithLead { lead: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersusOutcome {
    pub winner: PlayerSlot,
    pub reason: VersusReason,
}

/// Gameplay events emitted during a tick (for audio/effects on the host side)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { slot: PlayerSlot },
    Landed { slot: PlayerSlot, platform_id: usize },
    Scored { slot: PlayerSlot, platform_id: usize, points: u64 },
    Completed { slot: PlayerSlot, time: f32 },
    Fell { slot: PlayerSlot },
    VersusDecided(VersusOutcome),
    Restarted,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub clock: f64,
    pub players: Vec<PlayerSnapshot>,
    pub platforms: Vec<PlatformPose>,
    pub outcome: Option<VersusOutcome>,
    pub events: Vec<GameEvent>,
}

/// Rejected match setup
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SetupError {
    #[error("course has no platforms")]
    EmptyCourse,
    #[error("platform at index {index} has id {id}; ids must match their index")]
    PlatformIdMismatch { index: usize, id: usize },
    #[error("platform {id} has a non-positive or non-finite extent")]
    InvalidExtents { id: usize },
    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),
}

/// Complete match state, owned by the host and advanced by [`super::tick`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub mode: GameMode,
    pub tuning: PhysicsTuning,
    /// Course platforms, index == id
    pub platforms: Vec<Platform>,
    /// Both slots always exist; only `mode.player_count()` are simulated
    pub players: [PlayerState; 2],
    /// Simulation time in seconds since match start/restart
    pub clock: f64,
    pub frame: u64,
    pub outcome: Option<VersusOutcome>,
    /// Effective fall-death height (always below the lowest platform)
    pub fail_threshold: f32,
    pub high_scores: HighScores,
    /// Events from the latest tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl MatchState {
    /// Build a match with the course described by `settings`
    pub fn new(settings: &Settings) -> Result<Self, SetupError> {
        let platforms = course::build_course(settings);
        Self::with_course(settings.mode, settings.tuning, platforms)
    }

    /// Build a match on a host-supplied course
    pub fn with_course(
        mode: GameMode,
        tuning: PhysicsTuning,
        mut platforms: Vec<Platform>,
    ) -> Result<Self, SetupError> {
        validate_tuning(&tuning)?;
        if platforms.is_empty() {
            return Err(SetupError::EmptyCourse);
        }
        for (index, platform) in platforms.iter().enumerate() {
            if platform.id != index {
                return Err(SetupError::PlatformIdMismatch {
                    index,
                    id: platform.id,
                });
            }
            let e = platform.extents;
            if !e.is_finite() || e.min_element() <= 0.0 || !platform.base_position.is_finite() {
                return Err(SetupError::InvalidExtents { id: platform.id });
            }
        }

        for platform in &mut platforms {
            platform.advance(0.0);
        }

        let lowest = platforms
            .iter()
            .map(Platform::bottom)
            .fold(f32::INFINITY, f32::min);
        let fail_threshold = if tuning.fail_threshold < lowest {
            tuning.fail_threshold
        } else {
            let lowered = lowest - 2.0 * tuning.ball_radius;
            log::warn!(
                "Fail threshold {} is not below the lowest platform ({}); using {}",
                tuning.fail_threshold,
                lowest,
                lowered
            );
            lowered
        };

        let start = &platforms[0];
        let spawn = Vec3::new(
            start.position.x,
            start.top() + tuning.ball_radius + SPAWN_DROP,
            start.position.z,
        );

        log::info!(
            "Match created: {} mode, {} platforms, spawn {:?}",
            mode.as_str(),
            platforms.len(),
            spawn
        );

        Ok(Self {
            mode,
            tuning,
            platforms,
            players: [
                PlayerState::new(PlayerSlot::One, spawn),
                PlayerState::new(PlayerSlot::Two, spawn),
            ],
            clock: 0.0,
            frame: 0,
            outcome: None,
            fail_threshold,
            high_scores: HighScores::new(),
            events: Vec::new(),
        })
    }

    /// Slots simulated in this mode, in stepping order
    pub fn active_slots(&self) -> &'static [PlayerSlot] {
        &SLOT_ORDER[..self.mode.player_count()]
    }

    pub fn player(&self, slot: PlayerSlot) -> &PlayerState {
        &self.players[slot.index()]
    }

    pub fn player_mut(&mut self, slot: PlayerSlot) -> &mut PlayerState {
        &mut self.players[slot.index()]
    }

    /// All simulated players are frozen in a terminal phase
    pub fn is_finished(&self) -> bool {
        self.active_slots()
            .iter()
            .all(|&slot| !self.player(slot).is_simulated())
    }

    /// Restart the run for every slot; session records are kept
    pub fn restart(&mut self) {
        self.clock = 0.0;
        self.frame = 0;
        self.outcome = None;
        for platform in &mut self.platforms {
            platform.advance(0.0);
        }
        for player in &mut self.players {
            player.reset();
        }
        self.events.push(GameEvent::Restarted);
        log::info!("Match restarted");
    }

    /// Restore a saved match
    ///
    /// Platform poses are not stored; they are recomputed from the saved clock.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut state: Self = serde_json::from_str(json)?;
        let t = state.clock as f32;
        for platform in &mut state.platforms {
            platform.advance(t);
        }
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn platform_poses(&self) -> Vec<PlatformPose> {
        self.platforms.iter().map(Platform::pose).collect()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.frame,
            clock: self.clock,
            players: self
                .active_slots()
                .iter()
                .map(|&slot| self.player(slot).snapshot())
                .collect(),
            platforms: self.platform_poses(),
            outcome: self.outcome,
            events: self.events.clone(),
        }
    }
}

fn validate_tuning(tuning: &PhysicsTuning) -> Result<(), SetupError> {
    if !(tuning.ball_radius > 0.0) {
        return Err(SetupError::InvalidTuning("ball_radius must be positive"));
    }
    if !(tuning.max_dt > 0.0) {
        return Err(SetupError::InvalidTuning("max_dt must be positive"));
    }
    if !(tuning.contact_epsilon >= 0.0) {
        return Err(SetupError::InvalidTuning("contact_epsilon must not be negative"));
    }
    if !(tuning.max_speed > 0.0) {
        return Err(SetupError::InvalidTuning("max_speed must be positive"));
    }
    Ok(())
}
