//! Platform kinematics
//!
//! Every platform pose is a closed-form function of simulation time. Nothing is
//! integrated, so recomputing a pose for the same `t` always gives the same
//! answer and a restarted match replays exactly.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Sinusoidal motion parameters: `amplitude * sin(angular_speed * t + phase)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub amplitude: f32,
    /// Radians per second
    pub angular_speed: f32,
    /// Radians
    pub phase: f32,
}

impl Oscillation {
    pub fn new(amplitude: f32, angular_speed: f32, phase: f32) -> Self {
        Self {
            amplitude,
            angular_speed,
            phase,
        }
    }

    /// Oscillation whose rate is zero at `t = 0`
    ///
    /// Starts at the negative extreme, so a match never launches a rider with
    /// a velocity discontinuity.
    pub fn resting(amplitude: f32, angular_speed: f32) -> Self {
        Self::new(amplitude, angular_speed, -std::f32::consts::FRAC_PI_2)
    }

    #[inline]
    pub fn value(&self, t: f32) -> f32 {
        self.amplitude * (self.angular_speed * t + self.phase).sin()
    }

    /// Analytic time derivative of [`Self::value`]
    #[inline]
    pub fn rate(&self, t: f32) -> f32 {
        self.amplitude * self.angular_speed * (self.angular_speed * t + self.phase).cos()
    }
}

/// Movement behavior of a platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Archetype {
    Static,
    /// Slides along x around the base position
    HorizontalSlide(Oscillation),
    /// Slides along z around the base position
    ForwardBackSlide(Oscillation),
    /// Rocks about the x axis in place
    Tilt(Oscillation),
    /// Rocks about x like `Tilt`, plus a roll about z at `secondary_ratio` times the speed
    RotatingTilt {
        tilt: Oscillation,
        secondary_ratio: f32,
    },
}

impl Archetype {
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Static => "static",
            Archetype::HorizontalSlide(_) => "horizontal",
            Archetype::ForwardBackSlide(_) => "forward_back",
            Archetype::Tilt(_) => "tilt",
            Archetype::RotatingTilt { .. } => "rotate_tilt",
        }
    }

    /// Offset from the base position at time `t`
    fn offset(&self, t: f32) -> Vec3 {
        match self {
            Archetype::HorizontalSlide(osc) => Vec3::new(osc.value(t), 0.0, 0.0),
            Archetype::ForwardBackSlide(osc) => Vec3::new(0.0, 0.0, osc.value(t)),
            Archetype::Static | Archetype::Tilt(_) | Archetype::RotatingTilt { .. } => Vec3::ZERO,
        }
    }

    /// Linear velocity at time `t`
    fn velocity(&self, t: f32) -> Vec3 {
        match self {
            Archetype::HorizontalSlide(osc) => Vec3::new(osc.rate(t), 0.0, 0.0),
            Archetype::ForwardBackSlide(osc) => Vec3::new(0.0, 0.0, osc.rate(t)),
            Archetype::Static | Archetype::Tilt(_) | Archetype::RotatingTilt { .. } => Vec3::ZERO,
        }
    }

    /// (tilt about x, roll about z) in radians at time `t`
    fn angles(&self, t: f32) -> (f32, f32) {
        match self {
            Archetype::Tilt(osc) => (osc.value(t), 0.0),
            Archetype::RotatingTilt {
                tilt,
                secondary_ratio,
            } => {
                let roll = tilt.amplitude
                    * (tilt.angular_speed * secondary_ratio * t + tilt.phase).cos();
                (tilt.value(t), roll)
            }
            _ => (0.0, 0.0),
        }
    }
}

/// Read-only platform pose handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformPose {
    pub id: usize,
    pub position: Vec3,
    pub extents: Vec3,
    /// Rotation about the x axis (radians)
    pub tilt_angle: f32,
    /// Rotation about the z axis (radians)
    pub roll_angle: f32,
}

/// A platform in the course
///
/// `id` doubles as progression order. The current pose fields are written once
/// per frame by [`Platform::advance`] and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: usize,
    pub archetype: Archetype,
    /// Rest/center position
    pub base_position: Vec3,
    /// Bounding box size (width, height, depth)
    pub extents: Vec3,
    #[serde(skip)]
    pub position: Vec3,
    #[serde(skip)]
    pub velocity: Vec3,
    #[serde(skip)]
    pub tilt_angle: f32,
    #[serde(skip)]
    pub roll_angle: f32,
}

impl Platform {
    pub fn new(id: usize, archetype: Archetype, base_position: Vec3, extents: Vec3) -> Self {
        let mut platform = Self {
            id,
            archetype,
            base_position,
            extents,
            position: base_position,
            velocity: Vec3::ZERO,
            tilt_angle: 0.0,
            roll_angle: 0.0,
        };
        platform.advance(0.0);
        platform
    }

    /// Pose at simulation time `t`
    pub fn pose_at(&self, t: f32) -> PlatformPose {
        let (tilt_angle, roll_angle) = self.archetype.angles(t);
        PlatformPose {
            id: self.id,
            position: self.base_position + self.archetype.offset(t),
            extents: self.extents,
            tilt_angle,
            roll_angle,
        }
    }

    /// Linear velocity at simulation time `t`
    pub fn velocity_at(&self, t: f32) -> Vec3 {
        self.archetype.velocity(t)
    }

    /// Recompute the current pose and velocity for time `t`
    pub fn advance(&mut self, t: f32) {
        let pose = self.pose_at(t);
        self.position = pose.position;
        self.tilt_angle = pose.tilt_angle;
        self.roll_angle = pose.roll_angle;
        self.velocity = self.velocity_at(t);
    }

    /// Current pose
    pub fn pose(&self) -> PlatformPose {
        PlatformPose {
            id: self.id,
            position: self.position,
            extents: self.extents,
            tilt_angle: self.tilt_angle,
            roll_angle: self.roll_angle,
        }
    }

    /// Height of the collision surface
    ///
    /// Tilt is visual only: the surface stays a flat plane at the top of the box.
    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y + self.extents.y / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y - self.extents.y / 2.0
    }

    /// Whether a horizontal point lies over the platform's footprint (grown by `margin`)
    pub fn covers(&self, point: Vec2, margin: f32) -> bool {
        let half_w = self.extents.x / 2.0 + margin;
        let half_d = self.extents.z / 2.0 + margin;
        (point.x - self.position.x).abs() <= half_w && (point.y - self.position.z).abs() <= half_d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn slide(amplitude: f32, speed: f32, phase: f32) -> Platform {
        Platform::new(
            1,
            Archetype::HorizontalSlide(Oscillation::new(amplitude, speed, phase)),
            Vec3::new(2.0, 0.5, -6.0),
            Vec3::new(6.0, 0.5, 6.0),
        )
    }

    fn all_archetypes(osc: Oscillation) -> [Archetype; 5] {
        [
            Archetype::Static,
            Archetype::HorizontalSlide(osc),
            Archetype::ForwardBackSlide(osc),
            Archetype::Tilt(osc),
            Archetype::RotatingTilt {
                tilt: osc,
                secondary_ratio: 0.7,
            },
        ]
    }

    #[test]
    fn test_static_never_moves() {
        let platform = Platform::new(0, Archetype::Static, Vec3::ZERO, Vec3::new(8.0, 0.5, 8.0));
        for t in [0.0, 1.5, 100.0] {
            assert_eq!(platform.pose_at(t).position, Vec3::ZERO);
            assert_eq!(platform.velocity_at(t), Vec3::ZERO);
        }
        assert_eq!(platform.top(), 0.25);
    }

    #[test]
    fn test_horizontal_slide_formula() {
        let platform = slide(3.0, 1.0, 0.0);
        let t = std::f32::consts::FRAC_PI_2;
        let pose = platform.pose_at(t);
        assert!((pose.position.x - 5.0).abs() < 1e-5);
        assert_eq!(pose.position.y, 0.5);
        assert_eq!(pose.position.z, -6.0);
    }

    #[test]
    fn test_forward_back_moves_z_only() {
        let platform = Platform::new(
            3,
            Archetype::ForwardBackSlide(Oscillation::new(2.0, 1.0, 0.0)),
            Vec3::new(1.0, 0.0, -18.0),
            Vec3::splat(1.0),
        );
        let pose = platform.pose_at(std::f32::consts::FRAC_PI_2);
        assert_eq!(pose.position.x, 1.0);
        assert!((pose.position.z - -16.0).abs() < 1e-5);
    }

    #[test]
    fn test_tilt_keeps_position_and_surface() {
        let platform = Platform::new(
            2,
            Archetype::Tilt(Oscillation::new(0.3, 1.5, 0.0)),
            Vec3::new(0.0, 1.0, -12.0),
            Vec3::new(6.0, 0.5, 6.0),
        );
        let pose = platform.pose_at(1.0);
        assert_eq!(pose.position, Vec3::new(0.0, 1.0, -12.0));
        assert!((pose.tilt_angle - 0.3 * 1.5f32.sin()).abs() < 1e-6);
        assert_eq!(platform.velocity_at(1.0), Vec3::ZERO);
        assert_eq!(platform.top(), 1.25);
    }

    #[test]
    fn test_resting_oscillation_starts_still() {
        let osc = Oscillation::resting(3.4, 1.2);
        for archetype in all_archetypes(osc) {
            let platform = Platform::new(4, archetype, Vec3::ZERO, Vec3::ONE);
            assert!(platform.velocity_at(0.0).length() < 1e-5, "{}", archetype.name());
        }
    }

    #[test]
    fn test_advance_is_idempotent() {
        let mut platform = slide(3.0, 1.3, 0.4);
        platform.advance(7.25);
        let first = platform.pose();
        platform.advance(2.0);
        platform.advance(7.25);
        assert_eq!(platform.pose(), first);
        assert_eq!(platform.velocity, platform.velocity_at(7.25));
    }

    #[test]
    fn test_covers_footprint() {
        let platform = Platform::new(0, Archetype::Static, Vec3::ZERO, Vec3::new(4.0, 0.5, 2.0));
        assert!(platform.covers(Vec2::new(1.9, 0.9), 0.0));
        assert!(!platform.covers(Vec2::new(2.1, 0.0), 0.0));
        assert!(platform.covers(Vec2::new(2.0005, 0.0), 1e-3));
        assert!(!platform.covers(Vec2::new(0.0, -1.2), 0.0));
    }

    proptest! {
        #[test]
        fn velocity_matches_central_difference(
            t in 0.1f32..60.0,
            amplitude in 0.5f32..5.0,
            speed in 0.5f32..2.5,
            phase in -3.0f32..3.0,
        ) {
            let eps = 1e-2;
            let osc = Oscillation::new(amplitude, speed, phase);
            for archetype in all_archetypes(osc) {
                let platform = Platform::new(1, archetype, Vec3::new(-2.0, 0.5, -6.0), Vec3::ONE);
                let numeric = (platform.pose_at(t + eps).position - platform.pose_at(t - eps).position)
                    / (2.0 * eps);
                let analytic = platform.velocity_at(t);
                prop_assert!(
                    (numeric - analytic).length() < 0.05,
                    "{}: numeric {:?} analytic {:?}", archetype.name(), numeric, analytic
                );
            }
        }
    }
}
