use rand::{ rngs::SmallRng, Rng, SeedableRng };
use tracing::{ debug, trace, warn };
use typed_floats::Positive;

use crate::{
    default, detect_collisions, spawn_bodies, validate_restitution, Body, BodyId, Bounds,
    ConfigError, SimConfig, SpawnConfig, StatsSnapshot, WorldConfig,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

impl RunState {
    pub fn is_paused(self) -> bool {
        self == Self::Paused
    }
}

/// Owns the population and advances it one fixed step at a time
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    bodies: Vec<Body>,
    state: RunState,
    stats: StatsSnapshot,
    frame: u64,
}

impl World {
    /// Creates an empty, running world
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            bodies: default(),
            state: default(),
            stats: default(),
            frame: 0,
        })
    }

    /// Creates a world and populates it from the spawn section of `config`
    pub fn from_config(config: &SimConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut world = Self::new(config.world)?;
        world.reset(&config.spawn, seed)?;
        Ok(world)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds {
        &self.config.bounds
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    /// Snapshot of the last completed step (or reset)
    pub fn stats(&self) -> &StatsSnapshot {
        &self.stats
    }

    /// Number of steps simulated since the last reset
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn pause(&mut self) {
        self.state = RunState::Paused;
    }

    pub fn resume(&mut self) {
        self.state = RunState::Running;
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        };
    }

    pub fn restitution(&self) -> f32 {
        self.config.restitution
    }

    pub fn set_restitution(&mut self, restitution: f32) -> Result<(), ConfigError> {
        self.config.restitution = validate_restitution(restitution)?;
        debug!(restitution, "restitution changed");
        Ok(())
    }

    /// Replaces the whole population with one generated from `seed`
    pub fn reset(&mut self, spawn: &SpawnConfig, seed: u64) -> Result<(), ConfigError> {
        debug!(seed, count = spawn.body_count, "resetting world");
        self.reset_with_rng(spawn, &mut SmallRng::seed_from_u64(seed))
    }

    /// Same as [World::reset] with a caller provided random source
    pub fn reset_with_rng<R: Rng + ?Sized>(&mut self, spawn: &SpawnConfig, rng: &mut R) -> Result<(), ConfigError> {
        spawn.validate(&self.config.bounds)?;
        self.bodies = spawn_bodies(spawn, &self.config.bounds, rng);
        self.frame = 0;
        self.stats = StatsSnapshot::compute(&self.bodies, 0, 0);
        Ok(())
    }

    /// Adds a hand built body, its id becomes its index in the population.
    /// The body must already lie inside the walls.
    pub fn push_body(&mut self, mut body: Body) -> Result<BodyId, ConfigError> {
        self.config.bounds.ensure_fits(body.radius)?;
        if !self.config.bounds.contains(&body) {
            return Err(ConfigError::BodyOutsideBounds {
                x: body.position.x,
                y: body.position.y,
                radius: body.radius,
            });
        }
        let id = BodyId(self.bodies.len());
        body.id = id;
        self.bodies.push(body);
        self.stats = StatsSnapshot::compute(&self.bodies, 0, 0);
        Ok(id)
    }

    /// Advances the simulation by `dt` seconds and returns the new snapshot
    ///
    /// Does nothing while paused. A zero step changes nothing and reports no
    /// collisions, a negative or NaN one is ignored. Steps longer than
    /// `max_dt` are clamped.
    pub fn step(&mut self, dt: f32) -> &StatsSnapshot {
        if self.state.is_paused() {
            return &self.stats;
        }
        if dt == 0. {
            self.stats = StatsSnapshot::compute(&self.bodies, 0, 0);
            return &self.stats;
        }
        let Ok(dt) = Positive::<f32>::new(dt)
        else {
            warn!(dt, "ignoring invalid time step");
            return &self.stats;
        };
        let dt = dt.get().min(self.config.max_dt);

        self.integrate(dt);
        let wall_bounces = self.resolve_walls();

        let pairs = detect_collisions(&self.bodies);
        let mut collisions = 0;
        for pair in &pairs {
            if pair.resolve_impulse(&mut self.bodies, self.config.restitution) {
                collisions += 1;
            }
        }
        for pair in &pairs {
            pair.correct_positions(&mut self.bodies, self.config.percent_correction, self.config.slop);
        }
        self.clamp_to_walls();

        self.frame += 1;
        self.stats = StatsSnapshot::compute(&self.bodies, collisions, wall_bounces);
        trace!(
            frame = self.frame,
            contacts = pairs.len(),
            collisions,
            wall_bounces,
            "step"
        );
        &self.stats
    }

    fn integrate(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.position += body.velocity * dt;
        }
    }

    /// Per axis clamp and reflection against the four walls, returns how
    /// many velocity components were reflected
    fn resolve_walls(&mut self) -> usize {
        let bounds = self.config.bounds;
        let restitution = self.config.restitution;
        let mut bounces = 0;

        for body in &mut self.bodies {
            let lower = bounds.lower(body.radius);
            let upper = bounds.upper(body.radius);
            for axis in 0..2 {
                if body.position[axis] < lower[axis] {
                    body.position[axis] = lower[axis];
                    if body.velocity[axis] < 0. {
                        body.velocity[axis] *= -restitution;
                        bounces += 1;
                    }
                }
                else if body.position[axis] > upper[axis] {
                    body.position[axis] = upper[axis];
                    if body.velocity[axis] > 0. {
                        body.velocity[axis] *= -restitution;
                        bounces += 1;
                    }
                }
            }
        }

        bounces
    }

    /// Positional correction can push a body back into a wall, keep every
    /// center inside without touching velocities
    fn clamp_to_walls(&mut self) {
        let bounds = self.config.bounds;
        for body in &mut self.bodies {
            body.position = body.position.clamp(bounds.lower(body.radius), bounds.upper(body.radius));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector2;

    fn world(width: f32, height: f32, restitution: f32) -> World {
        World::new(WorldConfig {
            bounds: Bounds::new(width, height),
            restitution,
            ..default()
        }).unwrap()
    }

    fn push(world: &mut World, pos: (f32, f32), vel: (f32, f32), radius: f32) -> BodyId {
        let body = Body::new(Vector2::new(pos.0, pos.1), Vector2::new(vel.0, vel.1), radius, radius * radius).unwrap();
        world.push_body(body).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = WorldConfig { restitution: 2., ..default() };
        assert!(matches!(World::new(config), Err(ConfigError::InvalidRestitution(_))));
    }

    #[test]
    fn test_integration_is_explicit_euler() {
        let mut world = world(1000., 1000., 1.);
        let id = push(&mut world, (500., 500.), (60., -30.), 10.);
        world.step(0.05);
        let body = world.body(id).unwrap();
        assert!((body.position - Vector2::new(503., 498.5)).length() < 1e-3);
        assert_eq!(body.velocity, Vector2::new(60., -30.));
        assert_eq!(world.frame(), 1);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut world = world(1000., 1000., 1.);
        let id = push(&mut world, (500., 500.), (100., 0.), 10.);
        world.step(10.);
        let expected = 500. + 100. * world.config().max_dt;
        assert!((world.body(id).unwrap().position.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        let mut world = world(1000., 1000., 1.);
        push(&mut world, (500., 500.), (100., 0.), 10.);
        let before = world.bodies().to_vec();
        world.step(-0.1);
        world.step(f32::NAN);
        assert_eq!(world.bodies(), &before[..]);
        assert_eq!(world.frame(), 0);
    }

    #[test]
    fn test_wall_reflection_both_sides() {
        let mut world = world(100., 100., 0.5);
        let left = push(&mut world, (10.5, 50.), (-60., 0.), 10.);
        let top = push(&mut world, (50., 89.5), (0., 60.), 10.);
        let stats = *world.step(1. / 60.);

        assert_eq!(world.body(left).unwrap().position.x, 10.);
        assert_eq!(world.body(left).unwrap().velocity, Vector2::new(30., 0.));
        assert_eq!(world.body(top).unwrap().position.y, 90.);
        assert_eq!(world.body(top).unwrap().velocity, Vector2::new(0., -30.));
        assert_eq!(stats.wall_bounces, 2);
        assert_eq!(stats.collisions, 0);
    }

    #[test]
    fn test_sliding_along_wall_is_not_a_bounce() {
        let mut world = world(100., 100., 1.);
        let id = push(&mut world, (10., 50.), (0., 30.), 10.);
        let stats = *world.step(1. / 60.);
        let body = world.body(id).unwrap();
        assert_eq!(body.position.x, 10.);
        assert_eq!(body.velocity, Vector2::new(0., 30.));
        assert_eq!(stats.wall_bounces, 0);
    }

    #[test]
    fn test_push_body_rejects_center_outside_walls() {
        let mut world = world(100., 100., 1.);
        for pos in [(2., 50.), (50., 95.), (90.5, 10.)] {
            let body = Body::new(Vector2::new(pos.0, pos.1), Vector2::ZERO, 10., 1.).unwrap();
            assert!(matches!(world.push_body(body), Err(ConfigError::BodyOutsideBounds { .. })));
        }
        assert!(world.bodies().is_empty());
    }

    #[test]
    fn test_pushed_bodies_stay_contained_on_zero_step() {
        let mut world = World::new(WorldConfig {
            bounds: Bounds { width: 100., height: 100., wall_margin: 5. },
            ..default()
        }).unwrap();
        push(&mut world, (15., 85.), (-40., 40.), 10.);
        push(&mut world, (50., 50.), (10., 0.), 10.);
        world.step(0.);
        for body in world.bodies() {
            assert!(world.bounds().contains(body), "{body:?} escaped");
        }
    }

    #[test]
    fn test_correction_never_pushes_through_wall() {
        let mut world = world(100., 100., 1.);
        let a = push(&mut world, (10., 50.), (0., 0.), 10.);
        let b = push(&mut world, (12., 50.), (0., 0.), 10.);
        world.step(1. / 60.);
        for id in [a, b] {
            assert!(world.bounds().contains(world.body(id).unwrap()));
        }
    }

    #[test]
    fn test_pause_and_resume() {
        let mut world = world(1000., 1000., 1.);
        let id = push(&mut world, (500., 500.), (100., 0.), 10.);

        world.pause();
        assert_eq!(world.state(), RunState::Paused);
        world.step(0.01);
        assert_eq!(world.body(id).unwrap().position.x, 500.);

        world.toggle_pause();
        assert!(!world.is_paused());
        world.step(0.01);
        assert!(world.body(id).unwrap().position.x > 500.);
    }

    #[test]
    fn test_set_restitution() {
        let mut world = world(100., 100., 1.);
        world.set_restitution(0.2).unwrap();
        assert_eq!(world.restitution(), 0.2);
        for bad in [-0.01, 1.01, f32::NAN] {
            assert!(world.set_restitution(bad).is_err());
            assert_eq!(world.restitution(), 0.2);
        }
    }

    #[test]
    fn test_push_body_assigns_ids_and_checks_fit() {
        let mut world = world(100., 100., 1.);
        assert_eq!(push(&mut world, (50., 50.), (0., 0.), 5.), BodyId(0));
        assert_eq!(push(&mut world, (20., 20.), (0., 0.), 5.), BodyId(1));
        let huge = Body::new(Vector2::splat(50.), Vector2::ZERO, 60., 1.).unwrap();
        assert!(matches!(world.push_body(huge), Err(ConfigError::BodyDoesNotFit { .. })));
        assert_eq!(world.bodies().len(), 2);
        assert_eq!(world.stats().body_count, 2);
    }

    #[test]
    fn test_reset_is_seeded_and_atomic() {
        let mut world = world(800., 600., 1.);
        let spawn = SpawnConfig { body_count: 5, ..default() };
        world.reset(&spawn, 42).unwrap();
        let first = world.bodies().to_vec();
        world.step(1. / 60.);
        world.reset(&spawn, 42).unwrap();
        assert_eq!(world.bodies(), &first[..]);
        assert_eq!(world.frame(), 0);
        assert_eq!(world.stats().collisions, 0);

        let bad = SpawnConfig { body_count: 0, ..default() };
        assert!(world.reset(&bad, 1).is_err());
        assert_eq!(world.bodies(), &first[..]);
    }

    #[test]
    fn test_reset_keeps_run_state() {
        let mut world = world(800., 600., 1.);
        world.pause();
        world.reset(&SpawnConfig::default(), 3).unwrap();
        assert!(world.is_paused());
    }
}
