use collision_engine as ce;
use collision_engine::Vector2;

/// A way of populating a fresh world, selectable at runtime
pub trait Scene {
    fn name(&self) -> &'static str;
    fn create_world(&self, config: &ce::SimConfig, seed: u64) -> Result<ce::World, ce::ConfigError>;
}

/// Random non overlapping population drawn from the spawn config
pub struct RandomScene;

impl Scene for RandomScene {
    fn name(&self) -> &'static str {
        "Random bodies"
    }

    fn create_world(&self, config: &ce::SimConfig, seed: u64) -> Result<ce::World, ce::ConfigError> {
        ce::World::from_config(config, seed)
    }
}

/// Two equal bodies meeting head on in the middle of the area
pub struct HeadOnScene;

impl Scene for HeadOnScene {
    fn name(&self) -> &'static str {
        "Head-on, equal mass"
    }

    fn create_world(&self, config: &ce::SimConfig, _seed: u64) -> Result<ce::World, ce::ConfigError> {
        let mut world = ce::World::new(config.world)?;
        let center = world.bounds().size() / 2.;
        let colors = ce::BodyColor::PALETTE;
        for (offset, vel, color) in [(-150., 100., colors[0]), (150., -100., colors[1])] {
            world.push_body(
                ce::Body::new(center + Vector2::new(offset, 0.), Vector2::new(vel, 0.), 25., 625.)?
                    .with_color(color),
            )?;
        }
        Ok(world)
    }
}

/// A row of touching-distance bodies hit by a single fast one
pub struct CradleScene {
    count: usize,
}

impl Scene for CradleScene {
    fn name(&self) -> &'static str {
        "Cradle"
    }

    fn create_world(&self, config: &ce::SimConfig, _seed: u64) -> Result<ce::World, ce::ConfigError> {
        let mut world = ce::World::new(config.world)?;
        let radius = 20.;
        let center = world.bounds().size() / 2.;
        let start = center.x - (self.count as f32) * (radius * 2. + 1.) / 2.;
        for idx in 0..self.count {
            let pos = Vector2::new(start + idx as f32 * (radius * 2. + 1.), center.y);
            world.push_body(
                ce::Body::new(pos, Vector2::ZERO, radius, radius * radius)?
                    .with_color(ce::BodyColor::PALETTE[1]),
            )?;
        }
        let striker = Vector2::new(world.bounds().lower(radius).x + 10., center.y);
        world.push_body(
            ce::Body::new(striker, Vector2::new(250., 0.), radius, radius * radius)?
                .with_color(ce::BodyColor::PALETTE[0]),
        )?;
        Ok(world)
    }
}

pub fn get_all_scenes() -> Vec<Box<dyn Scene>> {
    vec![
        Box::new(RandomScene),
        Box::new(HeadOnScene),
        Box::new(CradleScene { count: 5 }),
    ]
}
