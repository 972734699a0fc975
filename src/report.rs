//! Chart data for the presentation layer
//!
//! Samples every selected map on one shared time axis and converts the
//! sizes into the two series the charts draw: zone radius over time and
//! zone area per player over time. Rendering is left to the consumer.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::zone::constants::{km2_to_m2, sampling};
use crate::zone::error::{ensure_finite, Result, ZoneError};
use crate::zone::geometry::{area, radius};
use crate::zone::{Map, Timeline};

/// What to include in a report
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Time axis spacing in seconds
    pub step: f64,
    /// Emit per-map radius series
    pub include_zones: bool,
    /// Emit per-map area-per-player series
    pub include_area_per_player: bool,
    /// Batch size at which sampling goes parallel
    pub parallel_threshold: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            step: sampling::DEFAULT_STEP,
            include_zones: true,
            include_area_per_player: true,
            parallel_threshold: sampling::PARALLEL_THRESHOLD,
        }
    }
}

/// Zone radius over time for one map
#[derive(Debug, Clone, Serialize)]
pub struct ZoneSeries {
    pub name: String,
    pub num_players: u32,
    /// Square map side in km (the chart spans ±map_size/2)
    pub map_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub total_time: f64,
    /// Zone radius in km at each axis time
    pub radius: Vec<f64>,
}

/// Zone area per player over time for one map
#[derive(Debug, Clone, Serialize)]
pub struct AreaPerPlayerSeries {
    pub name: String,
    pub num_players: u32,
    /// Area per player in m² at each axis time
    pub area_per_player_m2: Vec<f64>,
}

/// Everything the charts need
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Longest schedule among the selected maps
    pub max_time: f64,
    /// Shared time axis in seconds
    pub times: Vec<f64>,
    pub zones: Vec<ZoneSeries>,
    pub area_per_player: Vec<AreaPerPlayerSeries>,
}

/// One-line overview of a map
#[derive(Debug, Clone, Serialize)]
pub struct MapSummary {
    pub name: String,
    pub map_size: f64,
    pub num_players: u32,
    pub phases: usize,
    pub total_time: f64,
    pub final_size: f64,
    pub initial_radius: f64,
    pub initial_area_per_player_m2: f64,
}

impl MapSummary {
    pub fn for_map(map: &Map) -> Result<Self> {
        let timeline = Timeline::for_map(map)?;
        Ok(Self {
            name: map.name.clone(),
            map_size: map.map_size,
            num_players: map.num_players,
            phases: map.phases.len(),
            total_time: timeline.total_time(),
            final_size: timeline.final_size(),
            initial_radius: radius(map.map_size)?,
            initial_area_per_player_m2: area_per_player_m2(map.map_size, map.num_players)?,
        })
    }
}

/// Zone area per player in m² for a zone of side `size` km
pub fn area_per_player_m2(size: f64, num_players: u32) -> Result<f64> {
    if num_players == 0 {
        return Err(ZoneError::InvalidPlayerCount(num_players));
    }
    Ok(km2_to_m2(area(size)? / f64::from(num_players)))
}

/// Times `0, step, 2*step, ...` strictly below `max_time`.
///
/// `step` must be at least `sampling::MIN_STEP` and the axis may hold at
/// most `sampling::MAX_AXIS_SAMPLES` entries.
pub fn time_axis(max_time: f64, step: f64) -> Result<Vec<f64>> {
    let max_time = ensure_finite(max_time)?;
    let step = ensure_finite(step)?;
    if step < sampling::MIN_STEP {
        return Err(ZoneError::InvalidTimeAxis(format!(
            "step must be at least {} seconds, got {}",
            sampling::MIN_STEP,
            step
        )));
    }
    if max_time <= 0.0 {
        return Ok(Vec::new());
    }

    let count = (max_time / step).ceil();
    if count > sampling::MAX_AXIS_SAMPLES as f64 {
        return Err(ZoneError::InvalidTimeAxis(format!(
            "{:.0}s at {}s steps needs {} samples, limit is {}",
            max_time,
            step,
            count,
            sampling::MAX_AXIS_SAMPLES
        )));
    }

    let mut times: Vec<f64> = (0..count as usize).map(|i| i as f64 * step).collect();
    while times.last().is_some_and(|&t| t >= max_time) {
        times.pop();
    }
    Ok(times)
}

/// Sample `maps` on a shared time axis and build the chart series
pub fn build(maps: &[Map], options: &ReportOptions) -> Result<Report> {
    let max_time = maps.iter().map(Map::total_time).fold(0.0, f64::max);
    let times = time_axis(max_time, options.step)?;
    info!(
        "Building report for {} maps: {} samples over {:.0}s",
        maps.len(),
        times.len(),
        max_time
    );

    #[cfg(feature = "parallel")]
    let sampled: Vec<(ZoneSeries, AreaPerPlayerSeries)> = maps
        .par_iter()
        .map(|map| sample_map(map, &times, options))
        .collect::<Result<_>>()?;
    #[cfg(not(feature = "parallel"))]
    let sampled: Vec<(ZoneSeries, AreaPerPlayerSeries)> = maps
        .iter()
        .map(|map| sample_map(map, &times, options))
        .collect::<Result<_>>()?;

    let (zones, area_per_player): (Vec<_>, Vec<_>) = sampled.into_iter().unzip();

    Ok(Report {
        max_time,
        times,
        zones: if options.include_zones { zones } else { Vec::new() },
        area_per_player: if options.include_area_per_player {
            area_per_player
        } else {
            Vec::new()
        },
    })
}

fn sample_map(
    map: &Map,
    times: &[f64],
    options: &ReportOptions,
) -> Result<(ZoneSeries, AreaPerPlayerSeries)> {
    map.validate()?;
    let timeline = Timeline::for_map(map)?;
    let sizes = timeline.sample_many_with_threshold(times, options.parallel_threshold);

    let radius = if options.include_zones {
        sizes.iter().map(|&s| radius(s)).collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };
    let area_per_player_m2 = if options.include_area_per_player {
        sizes
            .iter()
            .map(|&s| area_per_player_m2(s, map.num_players))
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };
    debug!("Sampled {} at {} times", map.name, sizes.len());

    Ok((
        ZoneSeries {
            name: map.name.clone(),
            num_players: map.num_players,
            map_size: map.map_size,
            background: map.background.clone(),
            total_time: timeline.total_time(),
            radius,
        },
        AreaPerPlayerSeries {
            name: map.name.clone(),
            num_players: map.num_players,
            area_per_player_m2,
        },
    ))
}
