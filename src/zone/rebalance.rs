//! Shrink rebalancing for changed player counts
//!
//! Finds the shrink multiplier that keeps the zone area per player of a
//! reference point equal to the original map's. Multipliers are always
//! expressed relative to the full, unshrunk map size.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{Catalog, Map};
use super::constants::km2_to_m2;
use super::error::{Result, ZoneError};
use super::geometry::{area, side_for_area};

/// Which zone size the area per player is measured at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferencePoint {
    /// Raw map size, before any shrink. Used for a newly prepended phase.
    #[serde(rename = "phase0")]
    MapStart,
    /// Size after the first phase's shrink. Used when the first phase's
    /// delay and wait are dropped and its shrink is derived again.
    #[serde(rename = "phase1")]
    FirstPhase,
}

impl ReferencePoint {
    pub const ALL: [ReferencePoint; 2] = [ReferencePoint::FirstPhase, ReferencePoint::MapStart];

    /// Zone size (square side, km) at this reference point
    pub fn reference_size(&self, map: &Map) -> Result<f64> {
        match self {
            ReferencePoint::MapStart => Ok(map.map_size),
            ReferencePoint::FirstPhase => map
                .phases
                .first()
                .map(|phase| map.map_size * phase.shrink)
                .ok_or_else(|| ZoneError::NoPhases(map.name.clone())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferencePoint::MapStart => "phase0",
            ReferencePoint::FirstPhase => "phase1",
        }
    }
}

impl fmt::Display for ReferencePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferencePoint {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "phase0" | "map_start" | "start" => Ok(ReferencePoint::MapStart),
            "phase1" | "first_phase" => Ok(ReferencePoint::FirstPhase),
            other => Err(format!("unknown reference point '{}' (expected phase0 or phase1)", other)),
        }
    }
}

/// Shrink multiplier, relative to `map.map_size`, whose zone gives
/// `new_player_count` players the same area each as `map.num_players`
/// had at `reference_size`.
pub fn required_shrink(map: &Map, new_player_count: u32, reference_size: f64) -> Result<f64> {
    if map.num_players == 0 {
        return Err(ZoneError::InvalidPlayerCount(map.num_players));
    }
    if !map.map_size.is_finite() || map.map_size <= 0.0 {
        return Err(ZoneError::InvalidMap {
            name: map.name.clone(),
            reason: format!("map_size must be positive, got {}", map.map_size),
        });
    }

    let original_area = area(reference_size)?;
    // Area scales linearly with players at constant area per player
    let required_area = original_area / f64::from(map.num_players) * f64::from(new_player_count);
    let required_size = side_for_area(required_area)?;

    Ok(required_size / map.map_size)
}

/// [`required_shrink`] measured at `reference`
pub fn required_shrink_at(map: &Map, new_player_count: u32, reference: ReferencePoint) -> Result<f64> {
    let reference_size = reference.reference_size(map)?;
    required_shrink(map, new_player_count, reference_size)
}

/// Shrink for the existing first phase, applied from match start, so the
/// area per player after that phase is unchanged
pub fn required_shrink_phase1(catalog: &Catalog, map_name: &str, new_player_count: u32) -> Result<f64> {
    required_shrink_at(catalog.find(map_name)?, new_player_count, ReferencePoint::FirstPhase)
}

/// Shrink for a new zero-length phase prepended at match start so the area
/// per player is unchanged
pub fn required_shrink_phase0(catalog: &Catalog, map_name: &str, new_player_count: u32) -> Result<f64> {
    required_shrink_at(catalog.find(map_name)?, new_player_count, ReferencePoint::MapStart)
}

/// A rebalanced shrink and the quantities it was derived from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rebalance {
    pub map: String,
    pub original_players: u32,
    pub new_players: u32,
    pub reference: ReferencePoint,
    /// Zone size at the reference point in km
    pub reference_size: f64,
    /// Area per player (m²) held constant
    pub area_per_player_m2: f64,
    pub required_shrink: f64,
}

impl Rebalance {
    pub fn compute(map: &Map, new_player_count: u32, reference: ReferencePoint) -> Result<Self> {
        let reference_size = reference.reference_size(map)?;
        let required_shrink = required_shrink(map, new_player_count, reference_size)?;
        let area_per_player_m2 = km2_to_m2(area(reference_size)? / f64::from(map.num_players));

        debug!(
            "Rebalanced {} ({}) {} -> {} players: shrink {:.6}",
            map.name, reference, map.num_players, new_player_count, required_shrink
        );

        Ok(Self {
            map: map.name.clone(),
            original_players: map.num_players,
            new_players: new_player_count,
            reference,
            reference_size,
            area_per_player_m2,
            required_shrink,
        })
    }
}
