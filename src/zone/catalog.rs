//! Map catalog
//!
//! Maps and their shrink phases are read-only configuration. A [`Catalog`]
//! is constructed once (built-in or loaded from JSON), validated, and then
//! passed by reference to the timeline builder and the rebalancer.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::constants::shrink;
use super::error::{Result, ZoneError};

/// One stage of zone shrinkage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Seconds until the next safe zone is shown
    pub delay: f64,
    /// Seconds the zone holds still once the next circle is shown
    pub wait: f64,
    /// Seconds the zone takes to move to the next circle
    #[serde(rename = "move")]
    pub movement: f64,
    /// Size of the next zone relative to the current one
    pub shrink: f64,
}

impl Phase {
    pub const fn new(delay: f64, wait: f64, movement: f64, shrink: f64) -> Self {
        Self {
            delay,
            wait,
            movement,
            shrink,
        }
    }

    /// Seconds from phase start until the zone starts moving
    #[inline]
    pub fn hold_time(&self) -> f64 {
        self.delay + self.wait
    }

    /// Total phase length in seconds
    #[inline]
    pub fn duration(&self) -> f64 {
        self.delay + self.wait + self.movement
    }

    /// Check durations are finite and non-negative and shrink is in (0, 1].
    /// `map` and `index` locate the phase in the error.
    pub fn validate(&self, map: &str, index: usize) -> Result<()> {
        self.check().map_err(|reason| ZoneError::InvalidPhase {
            map: map.to_string(),
            index,
            reason,
        })
    }

    fn check(&self) -> std::result::Result<(), String> {
        for (label, value) in [
            ("delay", self.delay),
            ("wait", self.wait),
            ("move", self.movement),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", label, value));
            }
        }
        if !(shrink::MIN..=shrink::MAX).contains(&self.shrink) {
            return Err(format!("shrink must be in (0, 1], got {}", self.shrink));
        }
        Ok(())
    }
}

/// A playable map and its zone schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub name: String,
    /// Side length of the square map in km
    pub map_size: f64,
    /// Player count the phases were tuned for
    pub num_players: u32,
    /// Background image handed to the presentation layer
    #[serde(default, alias = "bgimg", skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

impl Map {
    /// Check the map invariants: positive size and player count, valid phases.
    /// An empty phase list is accepted.
    pub fn validate(&self) -> Result<()> {
        if !self.map_size.is_finite() || self.map_size <= 0.0 {
            return Err(ZoneError::InvalidMap {
                name: self.name.clone(),
                reason: format!("map_size must be positive, got {}", self.map_size),
            });
        }
        if self.num_players == 0 {
            return Err(ZoneError::InvalidMap {
                name: self.name.clone(),
                reason: "num_players must be at least 1".to_string(),
            });
        }
        for (index, phase) in self.phases.iter().enumerate() {
            phase.validate(&self.name, index)?;
        }
        Ok(())
    }

    /// Sum of every phase's delay, wait and move
    pub fn total_time(&self) -> f64 {
        self.phases.iter().map(Phase::duration).sum()
    }

    /// Zone size after every phase has shrunk it
    pub fn final_size(&self) -> f64 {
        self.phases
            .iter()
            .fold(self.map_size, |size, phase| size * phase.shrink)
    }
}

/// Immutable set of maps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    maps: Vec<Map>,
}

impl Catalog {
    /// Build a catalog, validating every map
    pub fn new(maps: Vec<Map>) -> Result<Self> {
        let catalog = Self { maps };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Karakin and Erangel with their standard schedules
    pub fn builtin() -> Self {
        Self {
            maps: vec![karakin(), erangel()],
        }
    }

    /// Parse a catalog from JSON: either `{"maps": [...]}` or a bare array
    pub fn from_json_str(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct CatalogFile {
            maps: Vec<Map>,
        }

        let maps = if json.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Map>>(json)?
        } else {
            serde_json::from_str::<CatalogFile>(json)?.maps
        };
        Self::new(maps)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ZoneError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        info!("Loaded {} maps from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Validate every map in the catalog
    pub fn validate(&self) -> Result<()> {
        for map in &self.maps {
            map.validate()?;
            debug!(
                "Map {}: {} km, {} players, {} phases",
                map.name,
                map.map_size,
                map.num_players,
                map.phases.len()
            );
        }
        Ok(())
    }

    /// Look a map up by exact name
    pub fn find(&self, name: &str) -> Result<&Map> {
        self.maps
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ZoneError::UnknownMap(name.to_string()))
    }

    pub fn maps(&self) -> &[Map] {
        &self.maps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Map> {
        self.maps.iter()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Longest schedule across all maps in seconds
    pub fn max_total_time(&self) -> f64 {
        self.maps.iter().map(Map::total_time).fold(0.0, f64::max)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Map;
    type IntoIter = std::slice::Iter<'a, Map>;

    fn into_iter(self) -> Self::IntoIter {
        self.maps.iter()
    }
}

fn karakin() -> Map {
    Map {
        name: "Karakin".to_string(),
        map_size: 2.0,
        num_players: 64,
        background: Some("karakin_map.png".to_string()),
        phases: vec![
            Phase::new(60.0, 120.0, 120.0, 0.55),
            Phase::new(0.0, 120.0, 90.0, 0.70),
            Phase::new(0.0, 90.0, 90.0, 0.60),
            Phase::new(0.0, 60.0, 60.0, 0.60),
            Phase::new(0.0, 60.0, 60.0, 0.60),
            Phase::new(0.0, 30.0, 60.0, 0.50),
            Phase::new(0.0, 30.0, 30.0, 0.50),
            Phase::new(0.0, 30.0, 30.0, 0.50),
            Phase::new(0.0, 30.0, 30.0, shrink::FINAL_COLLAPSE),
        ],
    }
}

fn erangel() -> Map {
    Map {
        name: "Erangel".to_string(),
        map_size: 8.0,
        num_players: 100,
        background: Some("erangel_map.jpg".to_string()),
        phases: vec![
            Phase::new(120.0, 270.0, 300.0, 0.35),
            Phase::new(0.0, 180.0, 120.0, 0.60),
            Phase::new(0.0, 130.0, 90.0, 0.55),
            Phase::new(0.0, 120.0, 60.0, 0.55),
            Phase::new(0.0, 100.0, 60.0, 0.50),
            Phase::new(0.0, 90.0, 30.0, 0.50),
            Phase::new(0.0, 70.0, 30.0, 0.50),
            Phase::new(0.0, 60.0, 30.0, 0.50),
            Phase::new(30.0, 30.0, 30.0, shrink::FINAL_COLLAPSE),
        ],
    }
}
