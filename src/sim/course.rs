//! Course generation
//!
//! The standard course zig-zags away from the start platform along -z, rising
//! every third platform and shrinking as it goes. A seeded variant shuffles the
//! moving archetypes and jitters heights; the same seed always yields the same
//! course.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::platform::{Archetype, Oscillation, Platform};
use crate::settings::Settings;

/// Distance between consecutive platforms along -z
pub const PLATFORM_SPACING: f32 = 6.0;
/// Height gained every third platform
pub const RISE_PER_STEP: f32 = 0.5;
pub const PLATFORM_HEIGHT: f32 = 0.5;
/// Start platform footprint
pub const START_SIZE: f32 = 8.0;
/// Vertical jitter range for seeded courses
pub const SEEDED_Y_JITTER: f32 = 0.5;

const TILT_AMPLITUDE: f32 = 0.3;
const ROTATE_TILT_AMPLITUDE: f32 = 0.2;
const ROTATE_SECONDARY_RATIO: f32 = 0.7;

/// Moving archetypes in standard-course order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MovingKind {
    Horizontal,
    Tilt,
    ForwardBack,
    RotateTilt,
}

const CYCLE: [MovingKind; 4] = [
    MovingKind::Horizontal,
    MovingKind::Tilt,
    MovingKind::ForwardBack,
    MovingKind::RotateTilt,
];

/// Course for the given settings
pub fn build_course(settings: &Settings) -> Vec<Platform> {
    let length = settings.effective_course_length();
    match settings.course_seed {
        Some(seed) => seeded_course(length, seed),
        None => standard_course(length),
    }
}

/// Start platform plus `length` moving platforms
pub fn standard_course(length: usize) -> Vec<Platform> {
    let mut platforms = Vec::with_capacity(length + 1);
    platforms.push(start_platform());
    for i in 1..=length {
        let kind = CYCLE[(i - 1) % CYCLE.len()];
        platforms.push(course_platform(i, kind, 0.0));
    }
    platforms
}

/// Standard course shape with random archetypes and height jitter
pub fn seeded_course(length: usize, seed: u64) -> Vec<Platform> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut platforms = Vec::with_capacity(length + 1);
    platforms.push(start_platform());
    for i in 1..=length {
        let kind = CYCLE[rng.random_range(0..CYCLE.len())];
        let jitter = rng.random_range(-SEEDED_Y_JITTER..=SEEDED_Y_JITTER);
        platforms.push(course_platform(i, kind, jitter));
    }
    log::debug!("Generated seeded course: seed={}, platforms={}", seed, platforms.len());
    platforms
}

fn start_platform() -> Platform {
    Platform::new(
        0,
        Archetype::Static,
        Vec3::ZERO,
        Vec3::new(START_SIZE, PLATFORM_HEIGHT, START_SIZE),
    )
}

/// Footprint shrinks with distance from the start
fn footprint(i: usize) -> f32 {
    match i {
        0..=5 => 6.0,
        6..=15 => 5.0,
        _ => 4.0,
    }
}

fn course_platform(i: usize, kind: MovingKind, y_jitter: f32) -> Platform {
    let step = i as f32;
    let side = if i % 2 == 0 { 1.0 } else { -1.0 };
    let x = side * (i % 3) as f32 * 2.0;
    let y = (i / 3) as f32 * RISE_PER_STEP + y_jitter;
    let z = -PLATFORM_SPACING * step;

    let slide = Oscillation::resting(3.0 + step * 0.1, 1.0 + step * 0.05);
    let tilt_speed = 1.5 + step * 0.05;
    let archetype = match kind {
        MovingKind::Horizontal => Archetype::HorizontalSlide(slide),
        MovingKind::ForwardBack => Archetype::ForwardBackSlide(slide),
        MovingKind::Tilt => Archetype::Tilt(Oscillation::resting(TILT_AMPLITUDE, tilt_speed)),
        MovingKind::RotateTilt => Archetype::RotatingTilt {
            tilt: Oscillation::resting(ROTATE_TILT_AMPLITUDE, tilt_speed),
            secondary_ratio: ROTATE_SECONDARY_RATIO,
        },
    };

    let size = footprint(i);
    Platform::new(
        i,
        archetype,
        Vec3::new(x, y, z),
        Vec3::new(size, PLATFORM_HEIGHT, size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameMode;

    #[test]
    fn test_standard_course_shape() {
        let course = standard_course(30);
        assert_eq!(course.len(), 31);
        assert_eq!(course[0].archetype, Archetype::Static);
        assert_eq!(course[0].extents, Vec3::new(8.0, 0.5, 8.0));
        for (index, platform) in course.iter().enumerate() {
            assert_eq!(platform.id, index);
        }

        // Zig-zag: x = (-1)^i * (i mod 3) * 2, rising every third platform
        assert_eq!(course[1].base_position, Vec3::new(-2.0, 0.0, -6.0));
        assert_eq!(course[2].base_position, Vec3::new(4.0, 0.0, -12.0));
        assert_eq!(course[3].base_position, Vec3::new(0.0, 0.5, -18.0));
        assert_eq!(course[4].base_position, Vec3::new(2.0, 0.5, -24.0));

        assert!(matches!(course[1].archetype, Archetype::HorizontalSlide(_)));
        assert!(matches!(course[2].archetype, Archetype::Tilt(_)));
        assert!(matches!(course[3].archetype, Archetype::ForwardBackSlide(_)));
        assert!(matches!(course[4].archetype, Archetype::RotatingTilt { .. }));
        assert!(matches!(course[5].archetype, Archetype::HorizontalSlide(_)));

        assert_eq!(course[5].extents.x, 6.0);
        assert_eq!(course[6].extents.x, 5.0);
        assert_eq!(course[16].extents.x, 4.0);
    }

    #[test]
    fn test_course_starts_at_rest() {
        for platform in standard_course(30) {
            assert!(platform.velocity_at(0.0).length() < 1e-4, "platform {}", platform.id);
        }
    }

    #[test]
    fn test_mode_course_lengths() {
        assert_eq!(build_course(&Settings::for_mode(GameMode::Solo)).len(), 31);
        assert_eq!(build_course(&Settings::for_mode(GameMode::Versus)).len(), 21);
        let short = Settings {
            course_length: Some(4),
            ..Settings::default()
        };
        assert_eq!(build_course(&short).len(), 5);
    }

    #[test]
    fn test_seeded_course_is_deterministic() {
        let a = seeded_course(20, 1234);
        let b = seeded_course(20, 1234);
        let c = seeded_course(20, 4321);
        assert_eq!(a, b);
        assert_ne!(a, c);
        for platform in &a[1..] {
            let standard_y = (platform.id / 3) as f32 * RISE_PER_STEP;
            assert!((platform.base_position.y - standard_y).abs() <= SEEDED_Y_JITTER + 1e-6);
        }
    }
}
