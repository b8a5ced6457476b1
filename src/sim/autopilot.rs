//! Demo/idle driver
//!
//! Produces the intent a simple player would: roll toward the next platform in
//! order and jump when the ball is about to leave the current one.

use glam::Vec2;

use super::state::{MatchState, PlayerSlot};
use super::tick::MovementIntent;
use crate::horizontal;

/// Distance from a platform edge at which the autopilot jumps
const EDGE_MARGIN: f32 = 0.9;
/// Jump early when the target surface is this much higher
const STEP_UP: f32 = 0.3;

/// Intent for `slot` given the current match state
pub fn drive(state: &MatchState, slot: PlayerSlot) -> MovementIntent {
    let player = state.player(slot);
    if !player.is_simulated() || state.platforms.is_empty() {
        return MovementIntent::default();
    }

    let last = state.platforms.len() - 1;
    let target_id = player
        .platforms_reached
        .iter()
        .next_back()
        .map_or(0, |&reached| (reached + 1).min(last));
    let target = &state.platforms[target_id];

    let to_target = horizontal(target.position) - horizontal(player.position);
    let dir = to_target.normalize_or_zero();

    let current = player
        .current_platform_id
        .filter(|&id| player.is_grounded && id != target_id)
        .and_then(|id| state.platforms.get(id));
    let jump = match current {
        Some(current) => {
            let (width, depth) = (current.extents.x, current.extents.z);
            near_edge(width, depth, horizontal(current.position), horizontal(player.position))
                || target.top() > current.top() + STEP_UP
        }
        _ => false,
    };

    MovementIntent {
        forward: -dir.y,
        strafe: dir.x,
        jump,
    }
}

fn near_edge(width: f32, depth: f32, center: Vec2, point: Vec2) -> bool {
    let offset = (point - center).abs();
    offset.x > width / 2.0 - EDGE_MARGIN || offset.y > depth / 2.0 - EDGE_MARGIN
}
