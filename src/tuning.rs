//! Data-driven game balance
//!
//! Every knob defaults to the value in `consts`, so a tuning file only needs
//! the fields it wants to override.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance knobs for a play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lives at the start of a fresh session
    pub start_lives: u8,
    /// Ship horizontal speed (pixels per frame)
    pub ship_speed: i32,
    /// Frames between shots
    pub fire_cooldown_frames: u32,
    /// Ship death animation length (ms)
    pub ship_explode_ms: u64,
    /// Asteroid explosion length (ms)
    pub debris_explode_ms: u64,
    /// Points per asteroid shot down
    pub debris_score: u32,

    // === Spawning ===
    /// Interval at score 0 (ms)
    pub spawn_base_interval_ms: u32,
    /// Interval floor (ms)
    pub spawn_min_interval_ms: u32,
    /// Initial |vx| bound
    pub start_max_vx: i32,
    /// Initial vy lower bound
    pub start_min_vy: i32,
    /// Initial vy upper bound
    pub start_max_vy: i32,
    /// Score step that raises `max_vx` and `max_vy`
    pub max_speed_step_score: u32,
    /// Score step that raises `min_vy`
    pub min_speed_step_score: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_lives: START_LIVES,
            ship_speed: SHIP_SPEED,
            fire_cooldown_frames: FIRE_COOLDOWN_FRAMES,
            ship_explode_ms: SHIP_EXPLODE_MS,
            debris_explode_ms: DEBRIS_EXPLODE_MS,
            debris_score: DEBRIS_SCORE,

            spawn_base_interval_ms: SPAWN_BASE_INTERVAL_MS,
            spawn_min_interval_ms: SPAWN_MIN_INTERVAL_MS,
            start_max_vx: START_MAX_VX,
            start_min_vy: START_MIN_VY,
            start_max_vy: START_MAX_VY,
            max_speed_step_score: MAX_SPEED_STEP_SCORE,
            min_speed_step_score: MIN_SPEED_STEP_SCORE,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, falling back to defaults on bad input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(err) => {
                log::warn!("Invalid tuning JSON ({}), using defaults", err);
                Self::default()
            }
        }
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded tuning from {}", path.display());
                Self::from_json(&json)
            }
            Err(err) => {
                log::warn!("Could not read {} ({}), using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Repair values the simulation cannot run with
    pub(crate) fn sanitized(mut self) -> Self {
        self.spawn_min_interval_ms = self.spawn_min_interval_ms.max(1);
        self.spawn_base_interval_ms = self.spawn_base_interval_ms.max(self.spawn_min_interval_ms);
        self.start_max_vx = self.start_max_vx.abs();
        if self.start_min_vy > self.start_max_vy {
            std::mem::swap(&mut self.start_min_vy, &mut self.start_max_vy);
        }
        self.max_speed_step_score = self.max_speed_step_score.max(1);
        self.min_speed_step_score = self.min_speed_step_score.max(1);
        self
    }
}
