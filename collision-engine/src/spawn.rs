use std::f32::consts::TAU;

use rand::Rng;
use tracing::warn;

use crate::{ Body, BodyColor, BodyId, Bounds, SpawnConfig, Vector2 };

/// Generates a fresh population of non overlapping bodies
///
/// Expects a config already validated against `bounds`. A body whose
/// placement keeps failing after `max_placement_attempts` tries is dropped,
/// so the returned population can be smaller than requested.
pub fn spawn_bodies<R: Rng + ?Sized>(spawn: &SpawnConfig, bounds: &Bounds, rng: &mut R) -> Vec<Body> {
    let mut bodies: Vec<Body> = Vec::with_capacity(spawn.body_count);
    let mut failed = 0;

    for _ in 0..spawn.body_count {
        let placed = (0..spawn.max_placement_attempts.max(1)).find_map(|_| {
            let radius = rng.random_range(spawn.radius_range.min..=spawn.radius_range.max);
            let lower = bounds.lower(radius);
            let upper = bounds.upper(radius);
            let position = Vector2::new(
                rng.random_range(lower.x..=upper.x),
                rng.random_range(lower.y..=upper.y),
            );

            let speed = rng.random_range(spawn.speed_range.min..=spawn.speed_range.max);
            let angle = rng.random_range(0. ..TAU);
            let velocity = Vector2::from_angle(angle) * speed;

            let clear = bodies.iter()
                .all(|other| position.distance(other.position) >= radius + other.radius + spawn.min_gap);
            clear.then_some((position, velocity, radius))
        });

        let Some((position, velocity, radius)) = placed
        else {
            failed += 1;
            continue;
        };

        let color = BodyColor::PALETTE[rng.random_range(0..BodyColor::PALETTE.len())];
        bodies.push(Body {
            id: BodyId(bodies.len()),
            position,
            velocity,
            radius,
            mass: spawn.mass_for(radius),
            color,
        });
    }

    if failed > 0 {
        warn!(failed, requested = spawn.body_count, "could not place every body without overlap");
    }

    bodies
}
