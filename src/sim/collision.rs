//! Ball vs platform collision
//!
//! Platforms are axis-aligned boxes and only their flat top faces collide. The
//! ball's footprint is its center point projected onto the ground plane. Contact
//! is a swept test on the ball's lower bound between the start and end of the
//! step, so a fast fall cannot skip over a thin platform.

use glam::{Vec2, Vec3};

use super::platform::Platform;
use super::state::PlayerState;
use crate::settings::PhysicsTuning;
use crate::{horizontal, with_horizontal};

/// Result of resolving one step of ball motion against the course
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactResult {
    /// Ball ended the step resting on a platform
    pub grounded: bool,
    /// Supporting platform, if any
    pub platform_id: Option<usize>,
    /// Correction applied to the predicted position
    pub penetration: Vec3,
}

impl ContactResult {
    pub fn airborne() -> Self {
        Self {
            grounded: false,
            platform_id: None,
            penetration: Vec3::ZERO,
        }
    }
}

/// Find the platform that catches a ball moving from `prev_bottom` to `next_bottom`
///
/// A candidate must cover the footprint and its top must lie between the two
/// heights. Overlapping candidates resolve to the highest top, then the lowest id.
pub fn find_support<'a>(
    platforms: &'a [Platform],
    footprint: Vec2,
    prev_bottom: f32,
    next_bottom: f32,
    epsilon: f32,
) -> Option<&'a Platform> {
    let mut best: Option<&Platform> = None;
    for platform in platforms {
        let top = platform.top();
        let crossed = prev_bottom >= top - epsilon && next_bottom <= top + epsilon;
        if !crossed || !platform.covers(footprint, epsilon) {
            continue;
        }
        if best.is_none_or(|b| top > b.top() + epsilon) {
            best = Some(platform);
        }
    }
    best
}

/// Move the player through one step and resolve platform contact
///
/// Expects the player's velocity to already include this step's input, jump and
/// gravity. Writes the final position, grounded flag and supporting platform.
/// A rider is carried by `coupling_factor` of the platform's horizontal velocity.
pub fn resolve(
    player: &mut PlayerState,
    platforms: &[Platform],
    tuning: &PhysicsTuning,
    dt: f32,
) -> ContactResult {
    let radius = tuning.ball_radius;
    let epsilon = tuning.contact_epsilon;

    let predicted = player.position + player.velocity * dt;
    let prev_bottom = player.position.y - radius;
    let next_bottom = predicted.y - radius;

    // Rising balls pass up through platforms
    let support = if player.velocity.y <= 0.0 {
        find_support(platforms, horizontal(predicted), prev_bottom, next_bottom, epsilon)
    } else {
        None
    };

    let Some(platform) = support else {
        player.position = predicted;
        player.is_grounded = false;
        player.current_platform_id = None;
        return ContactResult::airborne();
    };

    let resting_y = platform.top() + radius;
    let carry = horizontal(platform.velocity) * tuning.coupling_factor * dt;
    let landed = Vec3::new(predicted.x, resting_y, predicted.z);

    player.position = with_horizontal(landed, horizontal(landed) + carry);
    player.velocity.y = 0.0;
    player.is_grounded = true;
    player.current_platform_id = Some(platform.id);

    ContactResult {
        grounded: true,
        platform_id: Some(platform.id),
        penetration: Vec3::new(0.0, resting_y - predicted.y, 0.0),
    }
}
