//! Marble Run headless runner
//!
//! Plays a match with autopilot inputs at a fixed 60 Hz and logs what happens.
//! Usage: `marble-run [solo|versus] [course-seed]`

use marble_run::sim::{GameEvent, MatchState, RunPhase, TickInput, autopilot, tick};
use marble_run::{GameMode, Settings};

/// Frame delta fed to the simulation
const FRAME_DT: f32 = 1.0 / 60.0;
/// Stop after this many simulated seconds
const MAX_SECONDS: f32 = 180.0;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let mode = args
        .next()
        .and_then(|arg| GameMode::from_str(&arg))
        .unwrap_or_default();
    let course_seed = args.next().and_then(|arg| arg.parse().ok());

    let settings = Settings {
        mode,
        course_seed,
        ..Settings::default()
    };

    let mut state = match MatchState::new(&settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Could not start match: {}", e);
            std::process::exit(1);
        }
    };

    let max_frames = (MAX_SECONDS / FRAME_DT) as u64;
    while state.frame < max_frames && !state.is_finished() {
        let mut input = TickInput::default();
        for &slot in state.active_slots() {
            input = input.with_intent(slot, autopilot::drive(&state, slot));
        }

        let snapshot = tick(&mut state, &input, FRAME_DT);
        for event in &snapshot.events {
            match event {
                GameEvent::Landed { slot, platform_id } => {
                    log::debug!("{:?} landed on platform {}", slot, platform_id)
                }
                GameEvent::VersusDecided(outcome) => {
                    log::info!("Winner: {:?}", outcome.winner)
                }
                _ => {}
            }
        }
    }

    for &slot in state.active_slots() {
        let player = state.player(slot);
        log::info!(
            "{:?}: score {}, {} platforms, {:.1}s, {}",
            slot,
            player.score,
            player.platforms_reached.len(),
            player.elapsed_time,
            match player.phase {
                RunPhase::Completed => "completed",
                RunPhase::GameOver => "fell",
                _ => "timed out",
            }
        );
    }
    if state.mode == GameMode::Versus && state.outcome.is_none() {
        log::info!("No winner: both players still on the course");
    }

    if let Some(best) = state.high_scores.top_score_for(state.mode) {
        log::info!("Best {} score this session: {}", state.mode.as_str(), best);
    }

    match state.high_scores.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not encode high scores: {}", e),
    }
}
