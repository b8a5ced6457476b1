//! End-to-end match scenarios driven through the public API.

use glam::Vec3;
use marble_run::sim::{
    Archetype, GameEvent, MatchState, MovementIntent, Platform, PlayerSlot, RunPhase, TickInput,
    VersusReason, tick,
};
use marble_run::{GameMode, PhysicsTuning};

const DT: f32 = 1.0 / 60.0;

/// Five flat platforms in a straight line along -z, edge to edge
fn corridor() -> Vec<Platform> {
    (0..5)
        .map(|i| {
            Platform::new(
                i,
                Archetype::Static,
                Vec3::new(0.0, 0.0, -4.0 * i as f32),
                Vec3::new(4.0, 0.5, 4.0),
            )
        })
        .collect()
}

fn forward() -> MovementIntent {
    MovementIntent {
        forward: 1.0,
        ..Default::default()
    }
}

#[test]
fn ball_dropped_from_height_lands_on_start_platform() {
    let tuning = PhysicsTuning {
        gravity: -15.0,
        ..PhysicsTuning::default()
    };
    // A distant second platform keeps the start from being the finish
    let course = vec![
        Platform::new(0, Archetype::Static, Vec3::ZERO, Vec3::new(8.0, 0.5, 8.0)),
        Platform::new(
            1,
            Archetype::Static,
            Vec3::new(0.0, 0.0, -20.0),
            Vec3::new(4.0, 0.5, 4.0),
        ),
    ];
    let mut state = MatchState::with_course(GameMode::Solo, tuning, course).expect("valid course");
    state.player_mut(PlayerSlot::One).position = Vec3::new(0.0, 5.0, 0.0);

    let mut landed_at = None;
    for frame in 0..240 {
        let snapshot = tick(&mut state, &TickInput::default(), DT);
        if snapshot.players[0].is_grounded {
            landed_at = Some(frame);
            break;
        }
    }
    // Free fall of 4.25 units takes about 0.75 s
    let frame = landed_at.expect("ball should land");
    assert!((40..=50).contains(&frame), "landed on frame {}", frame);

    let player = state.player(PlayerSlot::One);
    let platform_top = state.platforms[0].top();
    assert!((player.position.y - tuning.ball_radius - platform_top).abs() < 1e-5);
    assert_eq!(player.velocity.y, 0.0);

    // Stays put while idle
    for _ in 0..120 {
        tick(&mut state, &TickInput::default(), DT);
    }
    let player = state.player(PlayerSlot::One);
    assert!(player.is_grounded);
    assert_eq!(player.phase, RunPhase::Active);
    assert_eq!(player.score, 100);
    assert!((player.position.y - tuning.ball_radius - platform_top).abs() < 1e-5);
}

#[test]
fn rolling_down_the_corridor_completes_the_run() {
    let mut state = MatchState::with_course(GameMode::Solo, PhysicsTuning::default(), corridor())
        .expect("valid course");
    let input = TickInput::default().with_intent(PlayerSlot::One, forward());

    let mut completed_event = None;
    for _ in 0..1800 {
        let snapshot = tick(&mut state, &input, DT);
        completed_event = snapshot
            .events
            .iter()
            .find_map(|e| match e {
                GameEvent::Completed { time, .. } => Some(*time),
                _ => None,
            })
            .or(completed_event);
        if state.is_finished() {
            break;
        }
    }

    let player = state.player(PlayerSlot::One);
    assert_eq!(player.phase, RunPhase::Completed);
    assert_eq!(player.score, 100 + 200 + 300 + 400 + 500 + 1000);
    let time = completed_event.expect("completion event");
    assert_eq!(player.best_time, Some(time));
    assert_eq!(state.high_scores.top_score(), Some(2500));
    assert_eq!(state.high_scores.best_time(GameMode::Solo), Some(time));

    // Frozen after completion
    let resting = player.position;
    tick(&mut state, &input, DT);
    assert_eq!(state.player(PlayerSlot::One).position, resting);
}

#[test]
fn restart_after_completion_keeps_best_time() {
    let mut state = MatchState::with_course(GameMode::Solo, PhysicsTuning::default(), corridor())
        .expect("valid course");
    let input = TickInput::default().with_intent(PlayerSlot::One, forward());
    for _ in 0..1800 {
        tick(&mut state, &input, DT);
        if state.is_finished() {
            break;
        }
    }
    let best = state.player(PlayerSlot::One).best_time;
    assert!(best.is_some());

    let restart = TickInput {
        restart: true,
        ..Default::default()
    };
    let snapshot = tick(&mut state, &restart, DT);
    let p1 = &snapshot.players[0];
    assert_eq!(p1.score, 0);
    assert_eq!(p1.platforms_reached, 0);
    assert!(!p1.is_game_over);
    assert!(!p1.is_completed);
    assert_eq!(p1.best_time, best);
    assert_eq!(p1.best_score, 2500);
}

#[test]
fn versus_first_finisher_wins_and_rival_keeps_playing() {
    let mut state = MatchState::with_course(GameMode::Versus, PhysicsTuning::default(), corridor())
        .expect("valid course");
    let input = TickInput::default().with_intent(PlayerSlot::One, forward());

    for _ in 0..1800 {
        tick(&mut state, &input, DT);
        if state.player(PlayerSlot::One).is_completed() {
            break;
        }
    }

    let outcome = state.outcome.expect("decided");
    assert_eq!(outcome.winner, PlayerSlot::One);
    assert_eq!(outcome.reason, VersusReason::Completed);

    let p2 = state.player(PlayerSlot::Two);
    assert_eq!(p2.phase, RunPhase::Active);
    assert_eq!(p2.score, 100);
    assert!(p2.is_grounded);
    assert!(p2.position.z.abs() < 1e-6);
}

#[test]
fn same_inputs_replay_identically() {
    let settings = marble_run::Settings {
        mode: GameMode::Versus,
        course_seed: Some(77),
        ..Default::default()
    };
    let mut a = MatchState::new(&settings).expect("valid settings");
    let mut b = MatchState::new(&settings).expect("valid settings");

    let script = [
        TickInput::default().with_intent(PlayerSlot::One, forward()),
        TickInput::default().with_intent(
            PlayerSlot::Two,
            MovementIntent {
                strafe: -1.0,
                jump: true,
                ..Default::default()
            },
        ),
        TickInput::default(),
    ];

    for i in 0..600 {
        let input = &script[i % script.len()];
        // Uneven frame times exercise the variable-dt path
        let dt = if i % 7 == 0 { 1.0 / 30.0 } else { DT };
        let sa = tick(&mut a, input, dt);
        let sb = tick(&mut b, input, dt);
        assert_eq!(sa.players, sb.players);
        assert_eq!(sa.platforms, sb.platforms);
    }
}
