use std::fmt::Display;

use crate::{ error::ensure_finite, ConfigError, Vector2 };

/// Index of a body in its world's population, stable until the next reset
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub usize);

impl BodyId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cosmetic color handed to renderers, the physics never reads it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyColor(pub [u8; 3]);

impl BodyColor {
    pub const PALETTE: [BodyColor; 7] = [
        BodyColor([235, 99, 132]),  // pink
        BodyColor([108, 163, 255]), // blue
        BodyColor([255, 187, 99]),  // orange
        BodyColor([116, 222, 163]), // green
        BodyColor([210, 127, 255]), // purple
        BodyColor([255, 122, 122]), // red
        BodyColor([129, 236, 255]), // cyan
    ];

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }
}

impl Default for BodyColor {
    fn default() -> Self {
        Self::PALETTE[0]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub(crate) id: BodyId,
    pub position: Vector2,
    pub velocity: Vector2,
    pub(crate) radius: f32,
    pub(crate) mass: f32,
    pub color: BodyColor,
}

/// Mass must be positive with a finite inverse, subnormal masses would
/// turn impulses into NaN
pub(crate) fn ensure_mass(mass: f32) -> Result<f32, ConfigError> {
    if ensure_finite("mass", mass)? > 0. && mass.recip().is_finite() {
        Ok(mass)
    } else {
        Err(ConfigError::InvalidMass(mass))
    }
}

impl Body {
    pub fn new(position: Vector2, velocity: Vector2, radius: f32, mass: f32) -> Result<Self, ConfigError> {
        ensure_finite("position.x", position.x)?;
        ensure_finite("position.y", position.y)?;
        ensure_finite("velocity.x", velocity.x)?;
        ensure_finite("velocity.y", velocity.y)?;
        if !(ensure_finite("radius", radius)? > 0.) {
            return Err(ConfigError::InvalidRadius(radius));
        }
        ensure_mass(mass)?;

        Ok(Self {
            id: BodyId::default(),
            position,
            velocity,
            radius,
            mass,
            color: BodyColor::default(),
        })
    }

    pub fn with_color(mut self, color: BodyColor) -> Self {
        self.color = color;
        self
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        1. / self.mass
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn momentum(&self) -> Vector2 {
        self.mass * self.velocity
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}
