use itertools::Itertools;
use tracing::trace;

use crate::{ try_normalize_eps, Body, BodyId, Vector2, FALLBACK_NORMAL };

/// Result of the narrow phase for one overlapping pair
///
/// The data is captured once at detection time and never refreshed while the
/// frame's pairs are resolved, so resolving one pair does not change the
/// penetration or normal recorded for another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPair {
    pub a: BodyId,
    pub b: BodyId,
    /// Overlap of the two circles, always > 0
    pub penetration: f32,
    /// Unit vector pointing from `a` toward `b`
    pub normal: Vector2,
    /// The centers coincided and `normal` is [FALLBACK_NORMAL]
    pub degenerate: bool,
}

impl CollisionPair {
    /// Narrow phase test between two bodies of the slice
    pub fn between(bodies: &[Body], a: BodyId, b: BodyId) -> Option<Self> {
        let body_a = bodies.get(a.index())?;
        let body_b = bodies.get(b.index())?;

        let delta = body_b.position - body_a.position;
        let distance = delta.length();
        let penetration = (body_a.radius + body_b.radius) - distance;
        if !(penetration > 0.) {
            return None;
        }

        let (normal, degenerate) = match try_normalize_eps(delta) {
            Ok(normal) => (normal, false),
            Err(err) => {
                trace!(%a, %b, %err, "coincident centers, using fallback normal");
                (FALLBACK_NORMAL, true)
            }
        };

        Some(Self { a, b, penetration, normal, degenerate })
    }

    /// Relative velocity of `b` with respect to `a` projected on the normal.
    /// Negative when the bodies are moving toward each other, None when one
    /// of the ids is not in `bodies`.
    pub fn closing_speed(&self, bodies: &[Body]) -> Option<f32> {
        let a = bodies.get(self.a.index())?;
        let b = bodies.get(self.b.index())?;
        Some((b.velocity - a.velocity).dot(self.normal))
    }

    /// Applies an equal and opposite impulse along the normal
    ///
    /// Returns false and leaves the velocities untouched when the bodies are
    /// already separating.
    pub fn resolve_impulse(&self, bodies: &mut [Body], restitution: f32) -> bool {
        let Some((a, b)) = pair_mut(bodies, self.a, self.b)
        else { return false };

        let closing = (b.velocity - a.velocity).dot(self.normal);
        if !(closing < 0.) {
            return false;
        }

        let inv_mass_sum = a.inv_mass() + b.inv_mass();
        let j = -(1. + restitution) * closing / inv_mass_sum;

        a.velocity -= self.normal * (j * a.inv_mass());
        b.velocity += self.normal * (j * b.inv_mass());
        true
    }

    /// Pushes the bodies apart along the normal, each by its share of the
    /// inverse mass. Velocities are not touched.
    pub fn correct_positions(&self, bodies: &mut [Body], percent_correction: f32, slop: f32) {
        if !(self.penetration > slop) {
            return;
        }
        let Some((a, b)) = pair_mut(bodies, self.a, self.b)
        else { return };

        let inv_mass_sum = a.inv_mass() + b.inv_mass();
        let correction = percent_correction * (self.penetration - slop);

        a.position -= self.normal * (correction * a.inv_mass() / inv_mass_sum);
        b.position += self.normal * (correction * b.inv_mass() / inv_mass_sum);
    }
}

/// Broad phase over every unordered pair `(i, j)` with `i < j`, in that order,
/// followed by the narrow phase on each of them
pub fn detect_collisions(bodies: &[Body]) -> Vec<CollisionPair> {
    (0..bodies.len()).array_combinations::<2>()
        .filter_map(|[i, j]| CollisionPair::between(bodies, BodyId(i), BodyId(j)))
        .collect_vec()
}

/// Mutable access to two distinct bodies, in the requested order
fn pair_mut(bodies: &mut [Body], a: BodyId, b: BodyId) -> Option<(&mut Body, &mut Body)> {
    let (i, j) = (a.index(), b.index());
    if i == j || i.max(j) >= bodies.len() {
        return None;
    }

    let (low, high) = bodies.split_at_mut(i.max(j));
    let first = &mut low[i.min(j)];
    let second = &mut high[0];
    if i < j { Some((first, second)) } else { Some((second, first)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(pos: (f32, f32), vel: (f32, f32), radius: f32, mass: f32) -> Body {
        Body::new(Vector2::new(pos.0, pos.1), Vector2::new(vel.0, vel.1), radius, mass).unwrap()
    }

    fn pair_momentum(bodies: &[Body]) -> Vector2 {
        bodies.iter().map(Body::momentum).sum()
    }

    fn pair_energy(bodies: &[Body]) -> f32 {
        bodies.iter().map(Body::kinetic_energy).sum()
    }

    fn assert_vec_close(a: Vector2, b: Vector2, tol: f32) {
        let scale = a.length().max(b.length()).max(1.);
        assert!((a - b).length() <= tol * scale, "{a} != {b}");
    }

    #[test]
    fn test_no_contact() {
        let bodies = [body((0., 0.), (0., 0.), 1., 1.), body((3., 0.), (0., 0.), 1., 1.)];
        assert!(detect_collisions(&bodies).is_empty());
    }

    #[test]
    fn test_touching_is_not_a_collision() {
        let bodies = [body((0., 0.), (0., 0.), 1., 1.), body((2., 0.), (0., 0.), 1., 1.)];
        assert!(detect_collisions(&bodies).is_empty());
    }

    #[test]
    fn test_overlap_and_normal() {
        let bodies = [body((0., 0.), (0., 0.), 2., 1.), body((0., 3.), (0., 0.), 2., 1.)];
        let pairs = detect_collisions(&bodies);
        assert_eq!(pairs.len(), 1);
        let pair = pairs[0];
        assert_eq!((pair.a, pair.b), (BodyId(0), BodyId(1)));
        assert!((pair.penetration - 1.).abs() < 1e-6);
        assert_vec_close(pair.normal, Vector2::Y, 1e-6);
        assert!(!pair.degenerate);
    }

    #[test]
    fn test_coincident_centers_use_fallback_normal() {
        let bodies = [body((5., 5.), (1., 0.), 1., 1.), body((5., 5.), (0., 0.), 1.5, 1.)];
        let pairs = detect_collisions(&bodies);
        assert_eq!(pairs.len(), 1);
        let pair = pairs[0];
        assert!(pair.degenerate);
        assert_eq!(pair.normal, FALLBACK_NORMAL);
        assert_eq!(pair.penetration, 2.5);
    }

    #[test]
    fn test_each_pair_detected_once_in_order() {
        let bodies = [
            body((0., 0.), (0., 0.), 2., 1.),
            body((1., 0.), (0., 0.), 2., 1.),
            body((0., 1.), (0., 0.), 2., 1.),
        ];
        let ids = detect_collisions(&bodies).iter()
            .map(|pair| (pair.a.index(), pair.b.index()))
            .collect_vec();
        assert_eq!(ids, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_momentum_conserved_for_any_restitution() {
        for e in [0., 0.2, 0.5, 0.8, 1.] {
            for (ma, mb) in [(1., 1.), (2., 5.), (400., 1225.), (0.1, 30.)] {
                let mut bodies = [
                    body((0., 0.), (3., 1.), 1., ma),
                    body((1.5, 0.5), (-2., 0.5), 1., mb),
                ];
                let before = pair_momentum(&bodies);
                let pair = detect_collisions(&bodies)[0];
                assert!(pair.resolve_impulse(&mut bodies, e));
                assert_vec_close(pair_momentum(&bodies), before, 1e-5);
            }
        }
    }

    #[test]
    fn test_energy_never_increases() {
        for e in [0., 0.2, 0.5, 0.8] {
            let mut bodies = [
                body((0., 0.), (3., 1.), 1., 2.),
                body((1.5, 0.5), (-2., 0.5), 1., 5.),
            ];
            let before = pair_energy(&bodies);
            let pair = detect_collisions(&bodies)[0];
            assert!(pair.resolve_impulse(&mut bodies, e));
            assert!(pair_energy(&bodies) < before, "energy grew at e={e}");
        }

        let mut bodies = [
            body((0., 0.), (3., 1.), 1., 2.),
            body((1.5, 0.5), (-2., 0.5), 1., 5.),
        ];
        let before = pair_energy(&bodies);
        let pair = detect_collisions(&bodies)[0];
        assert!(pair.resolve_impulse(&mut bodies, 1.));
        assert!((pair_energy(&bodies) - before).abs() <= 1e-5 * before);
    }

    #[test]
    fn test_tangential_velocity_untouched() {
        let mut bodies = [
            body((0., 0.), (1., 7.), 1., 1.),
            body((1., 0.), (-1., -3.), 1., 1.),
        ];
        let pair = detect_collisions(&bodies)[0];
        assert!(pair.resolve_impulse(&mut bodies, 0.5));
        assert_eq!(bodies[0].velocity.y, 7.);
        assert_eq!(bodies[1].velocity.y, -3.);
    }

    #[test]
    fn test_separating_pair_gets_no_impulse() {
        let mut bodies = [
            body((0., 0.), (-1., 0.), 1., 1.),
            body((1., 0.), (1., 0.), 1., 1.),
        ];
        let before = bodies.clone();
        let pair = detect_collisions(&bodies)[0];
        assert!(pair.closing_speed(&bodies).unwrap() > 0.);
        assert!(!pair.resolve_impulse(&mut bodies, 1.));
        assert_eq!(bodies, before);

        // Resting contact: zero closing speed
        let mut bodies = [
            body((0., 0.), (2., 2.), 1., 1.),
            body((1., 0.), (2., 2.), 1., 1.),
        ];
        let pair = detect_collisions(&bodies)[0];
        assert!(!pair.resolve_impulse(&mut bodies, 1.));
        assert_eq!(bodies[0].velocity, Vector2::new(2., 2.));
    }

    #[test]
    fn test_correction_splits_by_inverse_mass() {
        let mut bodies = [
            body((0., 0.), (5., 0.), 1., 1.),
            body((1., 0.), (0., 0.), 1., 3.),
        ];
        let pair = detect_collisions(&bodies)[0];
        pair.correct_positions(&mut bodies, 0.8, 0.);

        // c = 0.8 * 1, light body takes 3/4 of it
        assert!((bodies[0].position.x + 0.6).abs() < 1e-6);
        assert!((bodies[1].position.x - 1.2).abs() < 1e-6);
        assert_eq!(bodies[0].velocity, Vector2::new(5., 0.));
        assert_eq!(bodies[1].velocity, Vector2::ZERO);
    }

    #[test]
    fn test_correction_ignores_overlap_within_slop() {
        let mut bodies = [
            body((0., 0.), (0., 0.), 1., 1.),
            body((1.995, 0.), (0., 0.), 1., 1.),
        ];
        let before = bodies.clone();
        let pair = detect_collisions(&bodies)[0];
        pair.correct_positions(&mut bodies, 0.8, 0.01);
        assert_eq!(bodies, before);
    }

    #[test]
    fn test_degenerate_pair_resolves_finitely() {
        let mut bodies = [
            body((5., 5.), (1., 0.), 1., 1.),
            body((5., 5.), (0., 0.), 1., 1.),
        ];
        let pair = detect_collisions(&bodies)[0];
        assert!(pair.resolve_impulse(&mut bodies, 1.));
        pair.correct_positions(&mut bodies, 0.8, 0.01);

        assert!(bodies.iter().all(|b| b.position.is_finite() && b.velocity.is_finite()));
        assert!(bodies[0].position.x < bodies[1].position.x);
        assert_vec_close(bodies[1].velocity, Vector2::X, 1e-6);
    }

    #[test]
    fn test_closing_speed_with_missing_body() {
        let bodies = [
            body((0., 0.), (1., 0.), 1., 1.),
            body((1., 0.), (-1., 0.), 1., 1.),
        ];
        let pair = detect_collisions(&bodies)[0];
        assert_eq!(pair.closing_speed(&bodies), Some(-2.));
        assert_eq!(pair.closing_speed(&bodies[..1]), None);
    }

    #[test]
    fn test_pair_mut_rejects_same_or_missing_body() {
        let mut bodies = [body((0., 0.), (0., 0.), 1., 1.)];
        assert!(pair_mut(&mut bodies, BodyId(0), BodyId(0)).is_none());
        assert!(pair_mut(&mut bodies, BodyId(0), BodyId(1)).is_none());
    }
}
