//! Platform scoring and run completion
//!
//! Each platform pays out once per run, so the total for a set of reached
//! platforms does not depend on the order or number of contacts.

use super::state::{PlayerState, RunPhase};
use crate::consts::{COMPLETION_BONUS, PLATFORM_POINTS};

/// Points credited for a first contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub platform_id: usize,
    pub points: u64,
    /// This contact reached the final platform
    pub completed: bool,
}

/// Base value of a platform
#[inline]
pub fn platform_points(platform_id: usize) -> u64 {
    (platform_id as u64 + 1) * PLATFORM_POINTS
}

/// Credit a platform contact
///
/// Returns `None` when the platform was already credited (or the id is not part
/// of the course). Reaching the last platform adds the completion bonus, stops
/// the run timer and updates the session best time.
pub fn on_contact(player: &mut PlayerState, platform_id: usize, platform_count: usize) -> Option<Award> {
    if platform_id >= platform_count {
        return None;
    }
    if !player.platforms_reached.insert(platform_id) {
        return None;
    }

    let completed = platform_id + 1 == platform_count;
    let mut points = platform_points(platform_id);
    if completed {
        points += COMPLETION_BONUS;
    }

    player.score += points;
    player.best_score = player.best_score.max(player.score);

    if completed {
        complete_run(player);
    }

    Some(Award {
        platform_id,
        points,
        completed,
    })
}

fn complete_run(player: &mut PlayerState) {
    player.phase = RunPhase::Completed;
    let time = player.elapsed_time;
    if player.best_time.is_none_or(|best| time < best) {
        player.best_time = Some(time);
    }
    log::info!(
        "{:?} completed the course in {:.2}s with {} points",
        player.slot,
        time,
        player.score
    );
}
