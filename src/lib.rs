//! Roid Blaster - A top-down asteroid shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, session)
//! - `shell`: Menu/pause/game-over state machine wrapped around the session
//! - `highscores`: Leaderboard fed with finished session scores
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod shell;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use shell::{App, Screen};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (y grows downward)
    pub const WIDTH: i32 = 375;
    pub const HEIGHT: i32 = 600;

    /// Nominal frame rate of the host loop
    pub const FPS: u32 = 30;
    /// Wall-clock milliseconds per frame at `FPS`
    pub const FRAME_MS: u32 = 1000 / FPS;

    /// Ship defaults
    pub const SHIP_WIDTH: i32 = 75;
    pub const SHIP_HEIGHT: i32 = 35;
    pub const SHIP_START_X: i32 = 150;
    pub const SHIP_START_Y: i32 = 553; // bottom edge at 588
    pub const SHIP_SPEED: i32 = 15; // pixels per frame
    pub const START_LIVES: u8 = 3;
    /// Frames between shots
    pub const FIRE_COOLDOWN_FRAMES: u32 = 3;
    /// Death animation length before the session ends
    pub const SHIP_EXPLODE_MS: u64 = 150;

    /// Bolt defaults
    pub const PROJECTILE_WIDTH: i32 = 10;
    pub const PROJECTILE_HEIGHT: i32 = 30;
    pub const PROJECTILE_SPEED: i32 = 25; // pixels per frame, upward
    /// Muzzle position relative to the ship's center-x / top edge
    pub const MUZZLE_OFFSET_X: i32 = 18;
    pub const MUZZLE_OFFSET_Y: i32 = 25;

    /// Asteroid defaults
    pub const DEBRIS_SIZE: i32 = 25;
    /// Spawn lanes along the top edge: x in {0, 25, ..., 350}
    pub const DEBRIS_LANES: i32 = 15;
    pub const DEBRIS_EXPLODE_MS: u64 = 50;
    pub const DEBRIS_SCORE: u32 = 5;

    /// Spawn cadence
    pub const SPAWN_BASE_INTERVAL_MS: u32 = 1000;
    pub const SPAWN_MIN_INTERVAL_MS: u32 = 250;

    /// Initial velocity envelope
    pub const START_MAX_VX: i32 = 5;
    pub const START_MIN_VY: i32 = 2;
    pub const START_MAX_VY: i32 = 8;
    /// Score steps for the difficulty ratchets
    pub const MAX_SPEED_STEP_SCORE: u32 = 150;
    pub const MIN_SPEED_STEP_SCORE: u32 = 300;
}
