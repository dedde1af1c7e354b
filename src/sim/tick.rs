//! Frame-stepped simulation tick
//!
//! Core game loop that advances a session by one frame.

use super::collision::resolve_collisions;
use super::state::{DebrisStatus, GameEvent, GameOverReason, LeaveTo, Session, ShipStatus};
use crate::consts::{MUZZLE_OFFSET_X, MUZZLE_OFFSET_Y, PROJECTILE_SPEED, PROJECTILE_WIDTH, WIDTH};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held: steer left
    pub left: bool,
    /// Held: steer right
    pub right: bool,
    /// Held: fire (rate limited by the ship's cooldown)
    pub fire: bool,
    /// Key-down: pause request
    pub pause: bool,
    /// Key-down: cycle the debug spawn-rate divisor
    pub debug_rate: bool,
    /// Idle/demo mode - autopilot flies the ship
    pub idle_mode: bool,
}

/// Advance an active session by one frame.
///
/// `elapsed_ms` is the wall-clock delta since the previous tick. It drives
/// the spawn countdown and the session clock that explosion timers read.
pub fn tick(state: &mut Session, input: &TickInput, elapsed_ms: u32) {
    if !state.is_active() {
        return;
    }

    state.time_ms += u64::from(elapsed_ms);
    state.frame += 1;
    let now = state.time_ms;

    // 1. Spawn check
    state.try_spawn();

    // 2. Discrete key-downs
    if input.pause {
        state.push_event(GameEvent::PauseRequested);
        state.leave(LeaveTo::Paused);
        return;
    }
    if input.debug_rate {
        let divisor = state.spawner.cycle_debug_rate();
        log::debug!("Debug spawn rate x{}", divisor);
        state.push_event(GameEvent::DebugRateChanged { divisor });
    }

    // 3. Continuous movement and fire
    let input = if input.idle_mode {
        autopilot(state)
    } else {
        input.clone()
    };
    if !state.ship.is_exploding() {
        let speed = state.tuning.ship_speed;
        if input.left {
            state.ship.move_by(-speed);
        }
        if input.right {
            state.ship.move_by(speed);
        }
        if input.fire {
            state.fire_projectile();
        }
    }

    // 4. Collisions
    resolve_collisions(state);

    // 5. Advance and prune bolts and asteroids
    state.projectiles.retain_mut(|bolt| bolt.tick());

    let explode_ms = state.tuning.debris_explode_ms;
    let mut missed = false;
    state.debris.retain_mut(|debris| match debris.tick(now, explode_ms) {
        DebrisStatus::Alive => true,
        DebrisStatus::Exploded => false,
        DebrisStatus::Escaped => {
            log::debug!("Debris {} escaped at x={}", debris.id, debris.rect.x);
            missed = true;
            false
        }
    });
    if missed {
        state.end_session(GameOverReason::DebrisMissed);
    }

    // 6. Ship
    let ship_status = state.ship.tick(now, state.tuning.ship_explode_ms);

    // 7. Difficulty envelope and spawn countdown
    state.spawner.update_difficulty(state.score, &state.tuning);
    state.spawner.decay(elapsed_ms);

    // 8. Out of lives
    if state.ship.lives == 0 {
        if !state.ship.is_exploding() {
            state.ship.explode_at = Some(now);
            state.push_event(GameEvent::ShipDestroyed);
        } else if ship_status == ShipStatus::Destroyed {
            state.end_session(GameOverReason::ShipDestroyed);
        }
    }
}

/// Demo-mode input: chase the lowest live asteroid and fire when lined up
fn autopilot(state: &Session) -> TickInput {
    let ship = &state.ship;
    let muzzle_x = ship.rect.center_x() - MUZZLE_OFFSET_X + PROJECTILE_WIDTH / 2;
    let muzzle_y = ship.rect.top() - MUZZLE_OFFSET_Y;

    let target = state
        .debris
        .iter()
        .filter(|d| !d.is_exploding() && d.rect.bottom() > 0)
        .max_by_key(|d| d.rect.bottom());

    let Some(target) = target else {
        // Nothing to shoot, drift back toward the middle
        let to_center = WIDTH / 2 - ship.rect.center_x();
        let dead_zone = state.tuning.ship_speed;
        return TickInput {
            left: to_center < -dead_zone,
            right: to_center > dead_zone,
            idle_mode: true,
            ..Default::default()
        };
    };

    // Lead the target by the frames a bolt needs to close the gap
    let gap = (muzzle_y - target.rect.bottom()).max(0);
    let flight_frames = gap / (PROJECTILE_SPEED + target.vel.y.max(0));
    let aim_x = (target.rect.center_x() + target.vel.x * flight_frames).clamp(0, WIDTH);
    let delta = aim_x - muzzle_x;
    let dead_zone = state.tuning.ship_speed / 2;

    TickInput {
        left: delta < -dead_zone,
        right: delta > dead_zone,
        fire: delta.abs() <= target.rect.w / 2 + PROJECTILE_WIDTH / 2,
        idle_mode: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::rect::Rect;
    use crate::sim::spawn::DebrisSpec;
    use crate::sim::state::{EnterFrom, Projectile, SessionPhase};
    use crate::tuning::Tuning;
    use glam::IVec2;

    /// Active session whose spawner stays quiet for a while
    fn quiet_session() -> Session {
        let mut state = Session::new(12345, Tuning::default());
        state.enter(EnterFrom::Menu);
        state.spawner.countdown_ms = 60_000;
        state
    }

    fn count_game_overs(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count()
    }

    #[test]
    fn test_inactive_session_does_not_tick() {
        let mut state = Session::new(1, Tuning::default());
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.frame, 0);
        assert!(state.debris.is_empty());
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut state = Session::new(1, Tuning::default());
        state.enter(EnterFrom::Menu);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.debris.len(), 1);
        assert_eq!(state.spawner.countdown_ms, 1000 - FRAME_MS);
    }

    #[test]
    fn test_wall_bounce_left() {
        let mut state = quiet_session();
        state.spawn_debris(DebrisSpec { x: 0, vel: IVec2::new(-3, 5) });

        tick(&mut state, &TickInput::default(), FRAME_MS);

        let debris = &state.debris[0];
        assert_eq!(debris.vel.x, 3);
        assert_eq!(debris.rect.left(), 0);
        assert_eq!(debris.rect.top(), -20);
    }

    #[test]
    fn test_projectile_above_top_pruned() {
        let mut state = quiet_session();
        let id = state.next_entity_id();
        state.projectiles.push(Projectile::new(id, Rect::new(100, -5, 10, 30)));

        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_fire_rate_cap() {
        let mut state = quiet_session();
        let fire = TickInput { fire: true, ..Default::default() };

        let mut fired_on = Vec::new();
        for frame in 0..12 {
            tick(&mut state, &fire, FRAME_MS);
            let events = state.drain_events();
            if events.iter().any(|e| matches!(e, GameEvent::ProjectileFired { .. })) {
                fired_on.push(frame);
            }
        }
        assert_eq!(fired_on, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_movement_input() {
        let mut state = quiet_session();
        let start = state.ship.rect.x;

        tick(&mut state, &TickInput { left: true, ..Default::default() }, FRAME_MS);
        assert_eq!(state.ship.rect.x, start - SHIP_SPEED);

        tick(&mut state, &TickInput { left: true, right: true, ..Default::default() }, FRAME_MS);
        assert_eq!(state.ship.rect.x, start - SHIP_SPEED);
    }

    #[test]
    fn test_ship_hit_through_tick() {
        let mut state = quiet_session();
        state.spawn_debris(DebrisSpec { x: 160, vel: IVec2::new(0, 6) });
        state.debris[0].rect.y = 540;

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert_eq!(state.ship.lives, 2);
        assert!(state.debris[0].is_exploding());
        assert_eq!(state.debris[0].vel.y, 0);
        assert_eq!(state.debris[0].rect.y, 540);
        assert!(state.is_active());
    }

    #[test]
    fn test_last_life_ends_session_once() {
        let mut state = quiet_session();
        state.ship.lives = 1;
        state.spawn_debris(DebrisSpec { x: 160, vel: IVec2::new(0, 6) });
        state.debris[0].rect.y = 540;

        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.ship.lives, 0);
        assert!(state.ship.is_exploding());
        assert!(state.is_active());
        let mut game_overs = count_game_overs(&state.drain_events());

        // Next tick is past the death animation
        tick(&mut state, &TickInput::default(), 200);
        let events = state.drain_events();
        game_overs += count_game_overs(&events);
        assert!(events.contains(&GameEvent::GameOver {
            reason: GameOverReason::ShipDestroyed
        }));
        assert_eq!(state.phase, SessionPhase::GameOver);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), FRAME_MS);
            game_overs += count_game_overs(&state.drain_events());
        }
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_game_over_waits_for_ship_explosion_at_frame_rate() {
        let mut state = quiet_session();
        state.ship.lives = 1;
        state.spawn_debris(DebrisSpec { x: 160, vel: IVec2::new(0, 6) });
        state.debris[0].rect.y = 540;

        // Tick 1: last life lost, explosion starts at 33 ms
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.ship.explode_at, Some(u64::from(FRAME_MS)));
        state.drain_events();

        // 150 ms must fully elapse: 5 * 33 = 165 is the first frame past it
        let mut game_over_tick = None;
        for n in 2..=10 {
            tick(&mut state, &TickInput::default(), FRAME_MS);
            if count_game_overs(&state.drain_events()) > 0 {
                assert!(game_over_tick.is_none());
                game_over_tick = Some(n);
            } else if game_over_tick.is_none() {
                assert!(state.is_active(), "ended early on tick {}", n);
            }
        }
        assert_eq!(game_over_tick, Some(6));
        assert_eq!(state.phase, SessionPhase::GameOver);
    }

    #[test]
    fn test_session_repairs_unusable_tuning() {
        let tuning = Tuning {
            start_min_vy: 9,
            start_max_vy: 3,
            max_speed_step_score: 0,
            min_speed_step_score: 0,
            spawn_min_interval_ms: 0,
            ..Default::default()
        };
        let mut state = Session::new(99, tuning);
        state.enter(EnterFrom::Menu);
        state.score = 40;

        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), FRAME_MS);
        }

        assert_eq!(state.tuning.start_min_vy, 3);
        assert_eq!(state.tuning.start_max_vy, 9);
        assert!(state.tuning.max_speed_step_score >= 1);
        assert!(state.tuning.min_speed_step_score >= 1);
        let env = state.spawner.envelope;
        assert!(env.min_vy <= env.max_vy);
        assert!(state.frame > 0);
    }

    #[test]
    fn test_zero_lives_without_hit_starts_explosion() {
        let mut state = quiet_session();
        state.ship.lives = 0;

        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(state.ship.is_exploding());
        assert!(state.is_active());

        tick(&mut state, &TickInput::default(), 151);
        assert_eq!(state.phase, SessionPhase::GameOver);
    }

    #[test]
    fn test_missed_debris_ends_session() {
        let mut state = quiet_session();
        state.spawn_debris(DebrisSpec { x: 0, vel: IVec2::new(0, 5) });
        state.debris[0].rect.y = HEIGHT - 2;

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert!(state.debris.is_empty());
        assert_eq!(state.phase, SessionPhase::GameOver);
        assert_eq!(
            count_game_overs(&state.drain_events()),
            1,
            "missed asteroid should end the run exactly once"
        );
    }

    #[test]
    fn test_pause_key() {
        let mut state = quiet_session();
        tick(&mut state, &TickInput { pause: true, ..Default::default() }, FRAME_MS);
        assert_eq!(state.phase, SessionPhase::Paused);
        assert!(state.events().contains(&GameEvent::PauseRequested));

        let frame = state.frame;
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.frame, frame);

        state.enter(EnterFrom::Paused);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.frame, frame + 1);
    }

    #[test]
    fn test_debug_rate_key() {
        let mut state = quiet_session();
        tick(&mut state, &TickInput { debug_rate: true, ..Default::default() }, FRAME_MS);
        assert_eq!(state.spawner.debug_divisor, 2);
        assert!(state.events().contains(&GameEvent::DebugRateChanged { divisor: 2 }));
    }

    #[test]
    fn test_difficulty_follows_score() {
        let mut state = quiet_session();
        state.score = 300;
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.spawner.interval_ms, 700);
        assert_eq!(state.spawner.envelope.max_vx, 7);
        assert_eq!(state.spawner.envelope.min_vy, 3);

        state.score = 800;
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.spawner.interval_ms, 250);
    }

    #[test]
    fn test_bolt_scores_through_tick() {
        let mut state = quiet_session();
        state.spawn_debris(DebrisSpec { x: 150, vel: IVec2::new(0, 2) });
        state.debris[0].rect.y = 510;

        // Bolt spawns at (center-18, top-25) = (169, 528), overlapping the asteroid
        tick(&mut state, &TickInput { fire: true, ..Default::default() }, FRAME_MS);
        assert_eq!(state.score, 5);
        assert!(state.projectiles.is_empty());

        // Explosion runs out and the asteroid is removed
        tick(&mut state, &TickInput::default(), 60);
        assert!(state.debris.is_empty());
        assert_eq!(state.score, 5);
    }

    #[test]
    fn test_autopilot_scores() {
        let mut state = Session::new(7, Tuning::default());
        state.enter(EnterFrom::Menu);
        let input = TickInput { idle_mode: true, ..Default::default() };
        for _ in 0..600 {
            tick(&mut state, &input, FRAME_MS);
            if !state.is_active() {
                break;
            }
        }
        assert!(state.score > 0);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed produce identical runs
        let mut state1 = Session::new(99999, Tuning::default());
        let mut state2 = Session::new(99999, Tuning::default());
        state1.enter(EnterFrom::Menu);
        state2.enter(EnterFrom::Menu);

        let inputs = [
            TickInput { left: true, fire: true, ..Default::default() },
            TickInput { idle_mode: true, ..Default::default() },
            TickInput { right: true, ..Default::default() },
            TickInput::default(),
        ];

        for i in 0..400 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, FRAME_MS);
            tick(&mut state2, input, FRAME_MS);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.ship.rect, state2.ship.rect);
        let rects1: Vec<_> = state1.debris.iter().map(|d| d.rect).collect();
        let rects2: Vec<_> = state2.debris.iter().map(|d| d.rect).collect();
        assert_eq!(rects1, rects2);
    }
}
