//! Simulation step
//!
//! One call per rendered frame advances the shared platforms once, then each
//! active player in slot order. Players never read each other's state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision;
use super::platform::Platform;
use super::scoring;
use super::state::{
    FrameSnapshot, GameEvent, MatchState, PlayerSlot, PlayerState, RunPhase, VersusOutcome,
    VersusReason,
};
use crate::consts::VERSUS_LEAD_MARGIN;
use crate::highscores::RunRecord;
use crate::settings::PhysicsTuning;
use crate::{horizontal, with_horizontal};

/// Movement intent for one player for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementIntent {
    /// +1 = away from the camera (-z), -1 = toward it
    pub forward: f32,
    /// +1 = right (+x), -1 = left
    pub strafe: f32,
    pub jump: bool,
}

impl MovementIntent {
    /// Desired horizontal direction in world (x, z), at most unit length
    pub fn direction(&self) -> Vec2 {
        let dir = Vec2::new(self.strafe, -self.forward);
        if !dir.is_finite() {
            return Vec2::ZERO;
        }
        if dir.length_squared() > 1.0 {
            dir.normalize()
        } else {
            dir
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed by slot; slots not in play are ignored
    pub intents: [MovementIntent; 2],
    /// Restart both players before stepping
    pub restart: bool,
}

impl TickInput {
    pub fn intent(&self, slot: PlayerSlot) -> MovementIntent {
        self.intents[slot.index()]
    }

    pub fn with_intent(mut self, slot: PlayerSlot, intent: MovementIntent) -> Self {
        self.intents[slot.index()] = intent;
        self
    }
}

/// Advance the match by one frame and return what to draw
///
/// `dt` is the measured frame delta; it is clamped to `tuning.max_dt` so a hitch
/// cannot produce a step large enough to destabilize the integration.
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) -> FrameSnapshot {
    state.events.clear();

    if input.restart {
        state.restart();
    }

    let step = state.tuning.clamp_dt(dt);
    if step != dt {
        log::debug!("Frame delta {} clamped to {}", dt, step);
    }

    state.clock += step as f64;
    state.frame += 1;

    let t = state.clock as f32;
    for platform in &mut state.platforms {
        platform.advance(t);
    }

    for &slot in state.active_slots() {
        let player = &mut state.players[slot.index()];
        step_player(
            player,
            &state.platforms,
            &state.tuning,
            state.fail_threshold,
            input.intent(slot),
            step,
            &mut state.events,
        );
    }

    record_finished_runs(state);

    if state.active_slots().len() == 2 && state.outcome.is_none() {
        decide_versus(state);
    }

    state.snapshot()
}

/// Integrate one player through one step
pub fn step_player(
    player: &mut PlayerState,
    platforms: &[Platform],
    tuning: &PhysicsTuning,
    fail_threshold: f32,
    intent: MovementIntent,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    if !player.is_simulated() {
        return;
    }
    if player.phase == RunPhase::Ready {
        player.phase = RunPhase::Active;
    }

    // A support reference that no longer names a platform is dropped; contact
    // is recomputed below.
    if let Some(id) = player.current_platform_id {
        if id >= platforms.len() {
            log::warn!("{:?} referenced missing platform {}; clearing", player.slot, id);
            player.current_platform_id = None;
            player.is_grounded = false;
        }
    }

    player.elapsed_time += dt;

    // Horizontal: accelerate toward intent, apply friction, cap speed
    let mut planar = horizontal(player.velocity) + intent.direction() * tuning.acceleration * dt;
    planar *= tuning.friction_for(player.is_grounded, dt);
    planar = planar.clamp_length_max(tuning.max_speed);
    player.velocity = with_horizontal(player.velocity, planar);

    if intent.jump && player.is_grounded {
        player.velocity.y = tuning.jump_force;
        player.is_grounded = false;
        player.current_platform_id = None;
        events.push(GameEvent::Jumped { slot: player.slot });
    }

    player.velocity.y += tuning.gravity * dt;

    let previous_support = player.current_platform_id;
    let contact = collision::resolve(player, platforms, tuning, dt);

    match contact.platform_id {
        Some(platform_id) => {
            if previous_support != Some(platform_id) {
                events.push(GameEvent::Landed {
                    slot: player.slot,
                    platform_id,
                });
            }
            if let Some(award) = scoring::on_contact(player, platform_id, platforms.len()) {
                log::debug!(
                    "{:?} reached platform {} (+{})",
                    player.slot,
                    award.platform_id,
                    award.points
                );
                events.push(GameEvent::Scored {
                    slot: player.slot,
                    platform_id,
                    points: award.points,
                });
                if award.completed {
                    events.push(GameEvent::Completed {
                        slot: player.slot,
                        time: player.elapsed_time,
                    });
                }
            }
        }
        None if player.position.y < fail_threshold => {
            player.phase = RunPhase::GameOver;
            log::info!(
                "{:?} fell off the course with {} points after {:.2}s",
                player.slot,
                player.score,
                player.elapsed_time
            );
            events.push(GameEvent::Fell { slot: player.slot });
        }
        None => {}
    }
}

/// Push runs that ended this tick into the session leaderboard
fn record_finished_runs(state: &mut MatchState) {
    let finished: Vec<(PlayerSlot, bool)> = state
        .events
        .iter()
        .filter_map(|event| match *event {
            GameEvent::Completed { slot, .. } => Some((slot, true)),
            GameEvent::Fell { slot } => Some((slot, false)),
            _ => None,
        })
        .collect();

    for (slot, completed) in finished {
        let player = &state.players[slot.index()];
        let record = RunRecord {
            score: player.score,
            mode: state.mode,
            slot,
            time: player.elapsed_time,
            completed,
        };
        if let Some(rank) = state.high_scores.add_run(record) {
            log::info!("{:?} placed #{} on the leaderboard", slot, rank);
        }
    }
}

/// Settle a two-player match on the first run to end
///
/// Finishing the course wins outright. A player who falls loses unless they
/// were ahead by more than `VERSUS_LEAD_MARGIN` points.
fn decide_versus(state: &mut MatchState) {
    let decided = state.events.iter().find_map(|event| match *event {
        GameEvent::Completed { slot, .. } => Some(VersusOutcome {
            winner: slot,
            reason: VersusReason::Completed,
        }),
        GameEvent::Fell { slot } => {
            let fallen = state.players[slot.index()].score;
            let rival = state.players[slot.other().index()].score;
            let outcome = if fallen > rival && fallen - rival > VERSUS_LEAD_MARGIN {
                VersusOutcome {
                    winner: slot,
                    reason: VersusReason::FellWithLead {
                        lead: fallen - rival,
                    },
                }
            } else {
                VersusOutcome {
                    winner: slot.other(),
                    reason: VersusReason::OpponentFell {
                        lead: rival.saturating_sub(fallen),
                    },
                }
            };
            Some(outcome)
        }
        _ => None,
    });

    if let Some(outcome) = decided {
        log::info!("Versus decided: {:?} wins ({:?})", outcome.winner, outcome.reason);
        state.outcome = Some(outcome);
        state.events.push(GameEvent::VersusDecided(outcome));
    }
}
