//! Collision detection and response between ship, bolts and asteroids
//!
//! Three typed collections, one pairwise routine per interaction. Per
//! asteroid the order is ship, then bolts, then other asteroids. Bolts hit
//! during the scan are only marked; the collection is compacted afterwards
//! so the scan never skips or revisits an entry.

use super::state::{Debris, GameEvent, Projectile, Session, Ship};

/// Run the per-frame collision pass over every live asteroid
pub fn resolve_collisions(session: &mut Session) {
    let now = session.time_ms;
    let debris_score = session.tuning.debris_score;
    let mut spent = vec![false; session.projectiles.len()];
    let mut events = Vec::new();

    for i in 0..session.debris.len() {
        // --- Ship ---
        if debris_hits_ship(&session.debris[i], &session.ship) {
            let lives = session.ship.lives.saturating_sub(1);
            session.ship.lives = lives;

            let debris = &mut session.debris[i];
            debris.explode(now);
            // Stops falling and lingers while it burns
            debris.vel.y = 0;

            events.push(GameEvent::ShipHit { lives });
            if lives == 0 {
                session.ship.explode_at = Some(now);
                events.push(GameEvent::ShipDestroyed);
            }
        }

        // --- Bolts ---
        // An exploding asteroid no longer absorbs bolts, so at most one
        // bolt is consumed per asteroid per frame.
        for (j, bolt) in session.projectiles.iter().enumerate() {
            if spent[j] {
                continue;
            }
            if projectile_hits_debris(bolt, &session.debris[i]) {
                spent[j] = true;
                session.debris[i].explode(now);
                session.score += debris_score;
                events.push(GameEvent::DebrisDestroyed {
                    id: session.debris[i].id,
                    score: session.score,
                });
                break;
            }
        }

        // --- Other asteroids (each unordered pair once) ---
        for j in (i + 1)..session.debris.len() {
            let (a, b) = pair_mut(&mut session.debris, i, j);
            debris_pair_bounce(a, b);
        }
    }

    let mut idx = 0;
    session.projectiles.retain(|_| {
        let keep = !spent[idx];
        idx += 1;
        keep
    });

    for event in events {
        session.push_event(event);
    }
}

/// Live asteroid overlapping the ship from above
pub fn debris_hits_ship(debris: &Debris, ship: &Ship) -> bool {
    !debris.is_exploding()
        && !ship.is_exploding()
        && debris.rect.bottom() > ship.rect.top()
        && debris.rect.intersects(&ship.rect)
}

/// Bolt overlapping an asteroid that can still be destroyed
pub fn projectile_hits_debris(bolt: &Projectile, debris: &Debris) -> bool {
    !debris.is_exploding() && bolt.rect.intersects(&debris.rect)
}

/// Approximate elastic bounce between two asteroids.
///
/// Both reverse their horizontal velocity and are pushed apart along x by
/// half their center-to-center offset. Returns true on contact.
pub fn debris_pair_bounce(a: &mut Debris, b: &mut Debris) -> bool {
    if a.is_exploding() || b.is_exploding() || !a.rect.intersects(&b.rect) {
        return false;
    }

    a.vel.x = -a.vel.x;
    b.vel.x = -b.vel.x;

    let offset = b.rect.center_x() - a.rect.center_x();
    let push = offset.abs() / 2;
    let dir = if offset != 0 {
        offset.signum()
    } else if b.vel.x != a.vel.x {
        (b.vel.x - a.vel.x).signum()
    } else {
        1
    };

    a.rect.move_by(-dir * push, 0);
    b.rect.move_by(dir * push, 0);
    true
}

fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}
