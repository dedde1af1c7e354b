//! Asteroid spawn cadence and difficulty curve
//!
//! The spawner owns the countdown, the current interval and the velocity
//! envelope. All of it resets when a fresh session starts.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{DEBRIS_LANES, DEBRIS_SIZE};
use crate::tuning::Tuning;

/// Bounds new asteroids draw their velocity from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnEnvelope {
    /// vx is drawn from `[-max_vx, max_vx]`
    pub max_vx: i32,
    /// vy is drawn from `[min_vy, max_vy]`
    pub min_vy: i32,
    pub max_vy: i32,
}

impl SpawnEnvelope {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            max_vx: tuning.start_max_vx,
            min_vy: tuning.start_min_vy,
            max_vy: tuning.start_max_vy,
        }
    }
}

/// Where and how fast a new asteroid enters play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebrisSpec {
    /// Left edge, one of the lane columns
    pub x: i32,
    pub vel: IVec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Milliseconds until the next asteroid
    pub countdown_ms: u32,
    /// Milliseconds between asteroids at the current score
    pub interval_ms: u32,
    pub envelope: SpawnEnvelope,
    /// Debug spawn-rate divisor (1, 2 or 4)
    pub debug_divisor: u32,
    /// Ratchet steps already applied
    max_speed_steps: u32,
    min_speed_steps: u32,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            countdown_ms: 0,
            interval_ms: tuning.spawn_base_interval_ms,
            envelope: SpawnEnvelope::from_tuning(tuning),
            debug_divisor: 1,
            max_speed_steps: 0,
            min_speed_steps: 0,
        }
    }

    /// Roll a new asteroid if the countdown has run out, re-arming it
    pub fn maybe_spawn(&mut self, rng: &mut impl Rng) -> Option<DebrisSpec> {
        if self.countdown_ms > 0 {
            return None;
        }

        let lane = rng.random_range(0..DEBRIS_LANES);
        let env = self.envelope;
        let vx = rng.random_range(-env.max_vx..=env.max_vx);
        let vy = rng.random_range(env.min_vy..=env.max_vy);

        self.countdown_ms = (self.interval_ms / self.debug_divisor).max(1);

        Some(DebrisSpec {
            x: lane * DEBRIS_SIZE,
            vel: IVec2::new(vx, vy),
        })
    }

    /// Run the countdown down by the frame's wall-clock delta
    pub fn decay(&mut self, elapsed_ms: u32) {
        self.countdown_ms = self.countdown_ms.saturating_sub(elapsed_ms);
    }

    /// Recompute the interval and ratchet the envelope for the current score.
    /// Returns true when the envelope widened.
    pub fn update_difficulty(&mut self, score: u32, tuning: &Tuning) -> bool {
        self.interval_ms = spawn_interval_for_score(score, tuning);

        let mut widened = false;

        let max_steps = score / tuning.max_speed_step_score;
        while self.max_speed_steps < max_steps {
            self.envelope.max_vx += 1;
            self.envelope.max_vy += 1;
            self.max_speed_steps += 1;
            widened = true;
        }

        let min_steps = score / tuning.min_speed_step_score;
        while self.min_speed_steps < min_steps {
            // The floor never overtakes the ceiling
            self.envelope.min_vy = (self.envelope.min_vy + 1).min(self.envelope.max_vy);
            self.min_speed_steps += 1;
            widened = true;
        }

        if widened {
            log::debug!(
                "Difficulty up at score {}: vx ±{}, vy {}..={}",
                score,
                self.envelope.max_vx,
                self.envelope.min_vy,
                self.envelope.max_vy
            );
        }
        widened
    }

    /// Cycle the debug spawn-rate divisor 1 -> 2 -> 4 -> 1
    pub fn cycle_debug_rate(&mut self) -> u32 {
        self.debug_divisor = match self.debug_divisor {
            1 => 2,
            2 => 4,
            _ => 1,
        };
        self.debug_divisor
    }
}

/// Spawn interval for a score: linear ramp from the base interval, floored
pub fn spawn_interval_for_score(score: u32, tuning: &Tuning) -> u32 {
    tuning
        .spawn_base_interval_ms
        .saturating_sub(score)
        .max(tuning.spawn_min_interval_ms)
}
