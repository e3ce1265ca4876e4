pub use glam::f32::Vec2 as Vector2;

use crate::DegenerateVectorError;

/// Below this length a vector has no usable direction
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// Normal used when two centers coincide and the real contact normal is
/// undefined
pub const FALLBACK_NORMAL: Vector2 = Vector2::X;

/// Normalizes `v`, refusing vectors shorter than [NORMALIZE_EPSILON]
///
/// Unlike [Vector2::try_normalize] this also rejects tiny but non-zero
/// vectors whose direction is dominated by rounding noise.
pub fn try_normalize_eps(v: Vector2) -> Result<Vector2, DegenerateVectorError> {
    let length = v.length();
    if !length.is_finite() || length < NORMALIZE_EPSILON {
        return Err(DegenerateVectorError { length });
    }
    Ok(v / length)
}
