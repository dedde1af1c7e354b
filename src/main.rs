//! Roid Blaster entry point
//!
//! Headless demo: runs the autopilot through one session at the nominal
//! frame rate and logs the outcome. Usage: `roid-blaster [tuning.json] [seed]`

use roid_blaster::consts::{FPS, FRAME_MS};
use roid_blaster::sim::{GameEvent, TickInput};
use roid_blaster::{App, Screen, Tuning};

/// Safety cap on the demo run (five minutes of simulated play)
const MAX_FRAMES: u64 = 5 * 60 * FPS as u64;

fn main() {
    env_logger::init();
    log::info!("Roid Blaster (headless demo) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load(path),
        None => Tuning::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);

    let mut app = App::new(seed, tuning);
    app.start();

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut frames = 0;
    let mut shots = 0;
    let mut hits = 0;
    while app.screen == Screen::Playing && frames < MAX_FRAMES {
        for event in app.frame(&input, FRAME_MS) {
            match event {
                GameEvent::ProjectileFired { .. } => shots += 1,
                GameEvent::DebrisDestroyed { .. } => hits += 1,
                GameEvent::ShipHit { lives } => log::info!("Ship hit, {} lives left", lives),
                _ => {}
            }
        }
        frames += 1;
    }

    match app.screen {
        Screen::GameOver { score, rank } => {
            log::info!("Run over after {} frames", frames);
            println!("Score: {}", score);
            if let Some(rank) = rank {
                println!("Leaderboard rank: {}", rank);
            }
            if let Some(best) = app.high_scores.top_score() {
                println!("Best on board: {}", best);
            }
        }
        _ => println!("Demo stopped after {} frames, score {}", frames, app.session.score),
    }
    println!("Shots fired: {}, asteroids destroyed: {}", shots, hits);
}
