//! Plain-data configuration of the simulation, loadable from RON.
//!
//! Every struct is `#[serde(default)]` so a file only needs to mention the
//! values it overrides.

use std::{ fs, path::Path };

use serde::{ Deserialize, Serialize };

use crate::{ body::ensure_mass, error::ensure_finite, Body, ConfigError, Vector2 };

/// Restitution values the driver cycles through, from elastic to very
/// inelastic
pub const RESTITUTION_PRESETS: [f32; 4] = [1.0, 0.8, 0.5, 0.2];

/// Axis aligned simulation area `[0, width] x [0, height]`, with walls
/// `wall_margin` inside its edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub wall_margin: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 730.,
            height: 550.,
            wall_margin: 12.,
        }
    }
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, wall_margin: 0. }
    }

    pub fn size(&self) -> Vector2 {
        Vector2::new(self.width, self.height)
    }

    /// Smallest allowed center coordinates for a body of this radius
    pub fn lower(&self, radius: f32) -> Vector2 {
        Vector2::splat(self.wall_margin + radius)
    }

    /// Largest allowed center coordinates for a body of this radius
    pub fn upper(&self, radius: f32) -> Vector2 {
        self.size() - Vector2::splat(self.wall_margin + radius)
    }

    pub fn fits(&self, radius: f32) -> bool {
        self.lower(radius).cmple(self.upper(radius)).all()
    }

    pub fn contains(&self, body: &Body) -> bool {
        let pos = body.position;
        pos.cmpge(self.lower(body.radius)).all() && pos.cmple(self.upper(body.radius)).all()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("bounds.width", self.width)?;
        ensure_finite("bounds.height", self.height)?;
        ensure_finite("bounds.wall_margin", self.wall_margin)?;
        if !(self.width > 0. && self.height > 0.) {
            return Err(ConfigError::InvalidBounds { width: self.width, height: self.height });
        }
        if self.wall_margin < 0. {
            return Err(ConfigError::NegativeMargin(self.wall_margin));
        }
        Ok(())
    }

    pub(crate) fn ensure_fits(&self, radius: f32) -> Result<(), ConfigError> {
        if self.fits(radius) {
            Ok(())
        } else {
            Err(ConfigError::BodyDoesNotFit {
                radius,
                margin: self.wall_margin,
                width: self.width,
                height: self.height,
            })
        }
    }
}

pub fn validate_restitution(restitution: f32) -> Result<f32, ConfigError> {
    if (0. ..=1.).contains(&restitution) {
        Ok(restitution)
    } else {
        Err(ConfigError::InvalidRestitution(restitution))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub bounds: Bounds,
    /// Coefficient of restitution shared by wall and body-body collisions
    pub restitution: f32,
    /// Fraction of the penetration (beyond `slop`) removed each frame
    pub percent_correction: f32,
    /// Penetration left uncorrected
    pub slop: f32,
    /// Longest time step integrated in one call, larger ones are clamped
    pub max_dt: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            restitution: 1.,
            percent_correction: 0.8,
            slop: 0.01,
            max_dt: 1. / 20.,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate()?;
        validate_restitution(self.restitution)?;
        let percent = ensure_finite("percent_correction", self.percent_correction)?;
        if !(percent > 0. && percent <= 1.) {
            return Err(ConfigError::InvalidPercentCorrection(percent));
        }
        if ensure_finite("slop", self.slop)? < 0. {
            return Err(ConfigError::NegativeSlop(self.slop));
        }
        if !(ensure_finite("max_dt", self.max_dt)? > 0.) {
            return Err(ConfigError::InvalidMaxDt(self.max_dt));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}

impl<T> SpawnRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl SpawnRange<f32> {
    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        ensure_finite(field, self.min)?;
        ensure_finite(field, self.max)?;
        if self.min > self.max {
            return Err(ConfigError::InvertedRange { field, min: self.min, max: self.max });
        }
        Ok(())
    }
}

/// How a new population is generated on reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub body_count: usize,
    pub radius_range: SpawnRange<f32>,
    /// Initial speed, the direction is uniformly random
    pub speed_range: SpawnRange<f32>,
    /// `mass = mass_scale * radius²` when set, `uniform_mass` otherwise
    pub mass_from_radius: bool,
    pub mass_scale: f32,
    pub uniform_mass: f32,
    /// Extra clearance kept between spawned bodies
    pub min_gap: f32,
    pub max_placement_attempts: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            body_count: 3,
            radius_range: SpawnRange::new(20., 35.),
            speed_range: SpawnRange::new(60., 180.),
            mass_from_radius: true,
            mass_scale: 1.,
            uniform_mass: 1.,
            min_gap: 2.,
            max_placement_attempts: 2000,
        }
    }
}

impl SpawnConfig {
    pub fn mass_for(&self, radius: f32) -> f32 {
        if self.mass_from_radius {
            self.mass_scale * radius * radius
        } else {
            self.uniform_mass
        }
    }

    pub fn validate(&self, bounds: &Bounds) -> Result<(), ConfigError> {
        if self.body_count == 0 {
            return Err(ConfigError::ZeroBodyCount);
        }
        self.radius_range.validate("radius_range")?;
        if !(self.radius_range.min > 0.) {
            return Err(ConfigError::InvalidRadius(self.radius_range.min));
        }
        self.speed_range.validate("speed_range")?;
        if self.speed_range.min < 0. {
            return Err(ConfigError::NegativeSpeed(self.speed_range.min));
        }
        for mass in [self.mass_scale, self.uniform_mass] {
            ensure_mass(mass)?;
        }
        ensure_mass(self.mass_for(self.radius_range.min))?;
        ensure_mass(self.mass_for(self.radius_range.max))?;
        if !(ensure_finite("min_gap", self.min_gap)? >= 0.) {
            return Err(ConfigError::NegativeGap(self.min_gap));
        }
        bounds.ensure_fits(self.radius_range.max)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub spawn: SpawnConfig,
}

impl SimConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_ron_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Falls back to the defaults when the file is missing or invalid,
    /// returning the reason alongside
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<ConfigError>) {
        match Self::load_from_file(path) {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.spawn.validate(&self.world.bounds)
    }
}
