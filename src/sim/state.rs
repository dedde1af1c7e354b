//! Session state and core simulation types
//!
//! The session owns the ship and the typed entity collections. Nothing else
//! holds references into them.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::spawn::{DebrisSpec, Spawner};
use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Not entered yet, or back at the menu
    Inactive,
    /// Active gameplay, `tick` advances the simulation
    Active,
    /// Frozen, entities retained
    Paused,
    /// Run ended
    GameOver,
}

/// Where the shell is coming from when it enters the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterFrom {
    Menu,
    Paused,
    GameOver,
}

/// Where the shell is going when it leaves the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveTo {
    Paused,
    GameOver,
    Menu,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Lives ran out and the death animation finished
    ShipDestroyed,
    /// An asteroid got past the bottom of the field
    DebrisMissed,
}

/// Notifications for the shell, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    DebrisSpawned { id: u32 },
    ProjectileFired { id: u32 },
    DebrisDestroyed { id: u32, score: u32 },
    ShipHit { lives: u8 },
    ShipDestroyed,
    PauseRequested,
    DebugRateChanged { divisor: u32 },
    GameOver { reason: GameOverReason },
}

/// Ship status after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipStatus {
    Flying,
    Exploding,
    /// Death animation finished
    Destroyed,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub rect: Rect,
    pub lives: u8,
    /// Frames until the next shot is allowed
    pub fire_cooldown: u32,
    /// Session time (ms) the death animation started
    pub explode_at: Option<u64>,
}

impl Ship {
    pub fn new(lives: u8) -> Self {
        Self {
            rect: Rect::new(SHIP_START_X, SHIP_START_Y, SHIP_WIDTH, SHIP_HEIGHT),
            lives,
            fire_cooldown: 0,
            explode_at: None,
        }
    }

    pub fn is_exploding(&self) -> bool {
        self.explode_at.is_some()
    }

    /// Slide horizontally; the center stays on the field
    pub fn move_by(&mut self, dx: i32) {
        self.rect.move_by(dx, 0);
        self.rect.clamp_center_x(0, WIDTH);
    }

    /// Bounds of a new bolt, or None while the gun is cooling down
    pub fn fire(&mut self, cooldown_frames: u32) -> Option<Rect> {
        if self.fire_cooldown > 0 {
            return None;
        }
        self.fire_cooldown = cooldown_frames;
        Some(Rect::new(
            self.rect.center_x() - MUZZLE_OFFSET_X,
            self.rect.top() - MUZZLE_OFFSET_Y,
            PROJECTILE_WIDTH,
            PROJECTILE_HEIGHT,
        ))
    }

    pub fn tick(&mut self, now: u64, explode_ms: u64) -> ShipStatus {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        match self.explode_at {
            None => ShipStatus::Flying,
            Some(start) if now.saturating_sub(start) > explode_ms => ShipStatus::Destroyed,
            Some(_) => ShipStatus::Exploding,
        }
    }
}

/// A bolt fired by the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub rect: Rect,
}

impl Projectile {
    pub fn new(id: u32, rect: Rect) -> Self {
        Self { id, rect }
    }

    /// Move up; returns false once fully above the field
    pub fn tick(&mut self) -> bool {
        self.rect.move_by(0, -PROJECTILE_SPEED);
        self.rect.bottom() > 0
    }
}

/// Asteroid status after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebrisStatus {
    Alive,
    /// Explosion finished (or it drifted off while exploding)
    Exploded,
    /// Fell past the bottom edge intact
    Escaped,
}

/// A falling asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debris {
    pub id: u32,
    pub rect: Rect,
    pub vel: IVec2,
    /// Session time (ms) the explosion started
    pub explode_at: Option<u64>,
}

impl Debris {
    /// New asteroid just above the top edge
    pub fn new(id: u32, spec: DebrisSpec) -> Self {
        Self {
            id,
            rect: Rect::new(spec.x, -DEBRIS_SIZE, DEBRIS_SIZE, DEBRIS_SIZE),
            vel: spec.vel,
            explode_at: None,
        }
    }

    pub fn is_exploding(&self) -> bool {
        self.explode_at.is_some()
    }

    /// Start the explosion. Returns false if it was already exploding.
    pub fn explode(&mut self, now: u64) -> bool {
        if self.is_exploding() {
            return false;
        }
        self.explode_at = Some(now);
        true
    }

    pub fn tick(&mut self, now: u64, explode_ms: u64) -> DebrisStatus {
        self.rect.move_by(self.vel.x, self.vel.y);

        // Side walls bounce
        if self.rect.left() < 0 {
            self.rect.set_left(0);
            self.vel.x = -self.vel.x;
        }
        if self.rect.right() > WIDTH {
            self.rect.set_right(WIDTH);
            self.vel.x = -self.vel.x;
        }

        let off_bottom = self.rect.top() > HEIGHT;
        match self.explode_at {
            Some(start) if off_bottom || now.saturating_sub(start) > explode_ms => {
                DebrisStatus::Exploded
            }
            Some(_) => DebrisStatus::Alive,
            None if off_bottom => DebrisStatus::Escaped,
            None => DebrisStatus::Alive,
        }
    }
}

/// One play session (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub phase: SessionPhase,
    /// Session clock, sum of tick deltas (ms)
    pub time_ms: u64,
    /// Simulated frames since the last fresh entry
    pub frame: u64,
    pub score: u32,
    pub ship: Ship,
    /// Live bolts (insertion order)
    pub projectiles: Vec<Projectile>,
    /// Live asteroids (insertion order)
    pub debris: Vec<Debris>,
    pub spawner: Spawner,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl Session {
    /// Create an inactive session with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ship: Ship::new(tuning.start_lives),
            spawner: Spawner::new(&tuning),
            tuning,
            phase: SessionPhase::Inactive,
            time_ms: 0,
            frame: 0,
            score: 0,
            projectiles: Vec::new(),
            debris: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Activate the session. A fresh start (from menu or game over) resets
    /// ship, score, difficulty and entities; resuming from pause keeps them.
    pub fn enter(&mut self, from: EnterFrom) {
        let resume = from == EnterFrom::Paused && self.phase == SessionPhase::Paused;
        if from == EnterFrom::Paused && !resume {
            log::warn!("Resume requested from {:?}, starting fresh", self.phase);
        }

        if !resume {
            self.ship = Ship::new(self.tuning.start_lives);
            self.score = 0;
            self.frame = 0;
            self.spawner = Spawner::new(&self.tuning);
            self.projectiles.clear();
            self.debris.clear();
            self.events.clear();
        }

        self.spawner.countdown_ms = 0;
        self.phase = SessionPhase::Active;
        log::info!(
            "Session entered from {:?} (lives {}, score {})",
            from,
            self.ship.lives,
            self.score
        );
    }

    /// Deactivate the session. Entities survive a pause only.
    pub fn leave(&mut self, to: LeaveTo) {
        self.phase = match to {
            LeaveTo::Paused => SessionPhase::Paused,
            LeaveTo::GameOver => SessionPhase::GameOver,
            LeaveTo::Menu => SessionPhase::Inactive,
        };
        if to != LeaveTo::Paused {
            self.projectiles.clear();
            self.debris.clear();
        }
        log::info!("Session left to {:?} at score {}", to, self.score);
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    /// End the run. Only the first call while active has any effect.
    pub fn end_session(&mut self, reason: GameOverReason) {
        if self.phase != SessionPhase::Active {
            return;
        }
        self.phase = SessionPhase::GameOver;
        self.push_event(GameEvent::GameOver { reason });
        log::info!(
            "Game over ({:?}) at score {} after {} ms",
            reason,
            self.score,
            self.time_ms
        );
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Roll the spawner and add an asteroid if one is due
    pub fn try_spawn(&mut self) -> Option<u32> {
        let spec = self.spawner.maybe_spawn(&mut self.rng)?;
        Some(self.spawn_debris(spec))
    }

    pub fn spawn_debris(&mut self, spec: DebrisSpec) -> u32 {
        let id = self.next_entity_id();
        self.debris.push(Debris::new(id, spec));
        self.push_event(GameEvent::DebrisSpawned { id });
        log::debug!("Spawned debris {} at x={} vel={}", id, spec.x, spec.vel);
        id
    }

    /// Fire if the gun is ready
    pub fn fire_projectile(&mut self) -> Option<u32> {
        let rect = self.ship.fire(self.tuning.fire_cooldown_frames)?;
        let id = self.next_entity_id();
        self.projectiles.push(Projectile::new(id, rect));
        self.push_event(GameEvent::ProjectileFired { id });
        Some(id)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events raised since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
