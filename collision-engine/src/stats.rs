use crate::{ Body, Vector2 };

/// Aggregate quantities of one frame, always computed from scratch
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub total_momentum: Vector2,
    pub total_kinetic_energy: f32,
    pub average_speed: f32,
    /// Body-body impulses applied during the frame
    pub collisions: usize,
    /// Velocity reflections against the walls during the frame
    pub wall_bounces: usize,
    pub body_count: usize,
}

impl StatsSnapshot {
    pub fn compute(bodies: &[Body], collisions: usize, wall_bounces: usize) -> Self {
        let (total_momentum, total_kinetic_energy, speed_sum) = bodies.iter()
            .fold((Vector2::ZERO, 0., 0.), |(p, ke, speed), body| (
                p + body.momentum(),
                ke + body.kinetic_energy(),
                speed + body.speed(),
            ));

        let average_speed = if bodies.is_empty() {
            0.
        } else {
            speed_sum / bodies.len() as f32
        };

        Self {
            total_momentum,
            total_kinetic_energy,
            average_speed,
            collisions,
            wall_bounces,
            body_count: bodies.len(),
        }
    }

    pub fn momentum_magnitude(&self) -> f32 {
        self.total_momentum.length()
    }

    pub fn is_finite(&self) -> bool {
        self.total_momentum.is_finite()
            && self.total_kinetic_energy.is_finite()
            && self.average_speed.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_population() {
        let stats = StatsSnapshot::compute(&[], 0, 0);
        assert_eq!(stats, StatsSnapshot::default());
    }

    #[test]
    fn test_sums_and_average() {
        let bodies = [
            Body::new(Vector2::ZERO, Vector2::new(3., 4.), 1., 2.).unwrap(),
            Body::new(Vector2::ONE, Vector2::new(-1., 0.), 1., 4.).unwrap(),
        ];
        let stats = StatsSnapshot::compute(&bodies, 2, 1);
        assert_eq!(stats.total_momentum, Vector2::new(2., 8.));
        assert_eq!(stats.total_kinetic_energy, 25. + 2.);
        assert_eq!(stats.average_speed, 3.);
        assert_eq!(stats.collisions, 2);
        assert_eq!(stats.wall_bounces, 1);
        assert_eq!(stats.body_count, 2);
        assert!((stats.momentum_magnitude() - 68f32.sqrt()).abs() < 1e-5);
        assert!(stats.is_finite());
    }
}
