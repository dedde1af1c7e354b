//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-stepped only, time comes from the caller
//! - Seeded RNG only
//! - Stable iteration order (insertion order, ids ascending)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{debris_pair_bounce, resolve_collisions};
pub use rect::Rect;
pub use spawn::{DebrisSpec, SpawnEnvelope, Spawner};
pub use state::{
    Debris, DebrisStatus, EnterFrom, GameEvent, GameOverReason, LeaveTo, Projectile, Session,
    SessionPhase, Ship, ShipStatus,
};
pub use tick::{TickInput, tick};
