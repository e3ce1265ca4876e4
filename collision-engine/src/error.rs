use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("cannot normalize a vector of length {length}")]
pub struct DegenerateVectorError {
    pub length: f32,
}

/// Rejection of a configuration or reset request. The world is never
/// partially updated when one of these is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("bounds must be strictly positive, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },
    #[error("wall margin {0} must not be negative")]
    NegativeMargin(f32),
    #[error("restitution {0} outside [0, 1]")]
    InvalidRestitution(f32),
    #[error("percent correction {0} outside (0, 1]")]
    InvalidPercentCorrection(f32),
    #[error("slop {0} must not be negative")]
    NegativeSlop(f32),
    #[error("max dt {0} must be strictly positive")]
    InvalidMaxDt(f32),
    #[error("body count must be at least 1")]
    ZeroBodyCount,
    #[error("radius {0} must be strictly positive")]
    InvalidRadius(f32),
    #[error("mass {0} must be strictly positive")]
    InvalidMass(f32),
    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange { field: &'static str, min: f32, max: f32 },
    #[error("spawn gap {0} must not be negative")]
    NegativeGap(f32),
    #[error("speed {0} must not be negative")]
    NegativeSpeed(f32),
    #[error("a body of radius {radius} with margin {margin} does not fit in {width}x{height}")]
    BodyDoesNotFit { radius: f32, margin: f32, width: f32, height: f32 },
    #[error("body of radius {radius} at ({x}, {y}) lies outside the walls")]
    BodyOutsideBounds { x: f32, y: f32, radius: f32 },
    #[error("{path:?}: read error: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path:?}: parse error: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

pub(crate) fn ensure_finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}
