//! Safe-zone geometry
//!
//! A square map of side `l` km is covered by the circle through its corners:
//! diameter `sqrt(2 * l^2)`, radius half of that, area `π * r^2`.

use std::f64::consts::PI;

use super::error::{ensure_finite, Result, ZoneError};

fn ensure_length(side: f64) -> Result<f64> {
    let side = ensure_finite(side)?;
    if side < 0.0 {
        return Err(ZoneError::NegativeLength(side));
    }
    Ok(side)
}

/// Zone diameter for a square map side (the square's diagonal)
pub fn diameter(side: f64) -> Result<f64> {
    let side = ensure_length(side)?;
    Ok((2.0 * (side * side)).sqrt())
}

/// Zone radius for a square map side
pub fn radius(side: f64) -> Result<f64> {
    Ok(diameter(side)? / 2.0)
}

/// Zone area in km² for a square map side
pub fn area(side: f64) -> Result<f64> {
    let r = radius(side)?;
    Ok(PI * r * r)
}

/// Inverse of [`area`]: the square side whose zone covers `area`
pub fn side_for_area(area: f64) -> Result<f64> {
    let area = ensure_finite(area)?;
    if area < 0.0 {
        return Err(ZoneError::NegativeArea(area));
    }
    let diameter = (area / PI).sqrt() * 2.0;
    Ok((diameter * diameter / 2.0).sqrt())
}
