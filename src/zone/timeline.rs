//! Zone timeline
//!
//! Turns a map's phase schedule into a piecewise-linear size-over-time
//! function and samples it.
//!
//! Each phase contributes two breakpoints: one when the hold (delay + wait)
//! ends, at unchanged size, and one when the move ends, at the shrunk size.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{Map, Phase};
use super::constants::sampling::PARALLEL_THRESHOLD;
use super::error::{ensure_finite, Result, ZoneError};

/// A `(time, size)` corner of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Seconds since match start
    pub time: f64,
    /// Zone size as a square side length in km
    pub size: f64,
}

impl Breakpoint {
    #[inline]
    pub const fn new(time: f64, size: f64) -> Self {
        Self { time, size }
    }
}

/// Breakpoint sequence of one map, built once and read-only afterwards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    breakpoints: Vec<Breakpoint>,
}

impl Timeline {
    /// Build the breakpoint sequence for `phases` starting at `initial_size`.
    ///
    /// The result always has `2 * phases.len() + 1` breakpoints; an empty
    /// schedule yields the single breakpoint `(0, initial_size)`. Invalid
    /// phases are rejected, so times never decrease and sizes stay
    /// non-negative.
    pub fn build(initial_size: f64, phases: &[Phase]) -> Result<Self> {
        Self::build_named("timeline", initial_size, phases)
    }

    fn build_named(name: &str, initial_size: f64, phases: &[Phase]) -> Result<Self> {
        let initial_size = ensure_finite(initial_size)?;
        if initial_size < 0.0 {
            return Err(ZoneError::NegativeLength(initial_size));
        }
        for (index, phase) in phases.iter().enumerate() {
            phase.validate(name, index)?;
        }

        let mut breakpoints = Vec::with_capacity(2 * phases.len() + 1);
        let mut time = 0.0;
        let mut size = initial_size;
        breakpoints.push(Breakpoint::new(time, size));

        for phase in phases {
            // Zone is static while the next circle is announced
            time += phase.hold_time();
            breakpoints.push(Breakpoint::new(time, size));

            time += phase.movement;
            size *= phase.shrink;
            breakpoints.push(Breakpoint::new(time, size));
        }

        Ok(Self { breakpoints })
    }

    /// Build the timeline of a catalog map
    pub fn for_map(map: &Map) -> Result<Self> {
        let timeline = Self::build_named(&map.name, map.map_size, &map.phases)?;
        debug!(
            "Timeline for {}: {} breakpoints over {:.0}s",
            map.name,
            timeline.len(),
            timeline.total_time()
        );
        Ok(timeline)
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    /// Never true: a timeline holds at least its starting breakpoint
    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    /// Time of the last breakpoint (sum of all phase durations)
    pub fn total_time(&self) -> f64 {
        self.last().time
    }

    pub fn initial_size(&self) -> f64 {
        self.first().size
    }

    pub fn final_size(&self) -> f64 {
        self.last().size
    }

    fn first(&self) -> &Breakpoint {
        &self.breakpoints[0]
    }

    fn last(&self) -> &Breakpoint {
        &self.breakpoints[self.breakpoints.len() - 1]
    }

    /// Zone size at time `t`, held flat outside the timeline
    pub fn sample(&self, t: f64) -> f64 {
        sample(&self.breakpoints, t)
    }

    /// Zone sizes at every time in `times`, in input order
    pub fn sample_many(&self, times: &[f64]) -> Vec<f64> {
        self.sample_many_with_threshold(times, PARALLEL_THRESHOLD)
    }

    /// [`Timeline::sample_many`] with an explicit batch size at which
    /// sampling moves onto the rayon pool
    pub fn sample_many_with_threshold(&self, times: &[f64], parallel_threshold: usize) -> Vec<f64> {
        #[cfg(feature = "parallel")]
        {
            if times.len() >= parallel_threshold {
                return times.par_iter().map(|&t| self.sample(t)).collect();
            }
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel_threshold;

        times.iter().map(|&t| self.sample(t)).collect()
    }
}

/// Total schedule length of a map in seconds
pub fn total_time(map: &Map) -> f64 {
    map.total_time()
}

/// Piecewise-linear interpolation over `breakpoints` with flat extrapolation.
///
/// Breakpoints must be non-decreasing in time. Where two breakpoints share a
/// time the later one wins at exactly that time. NaN queries yield NaN and an
/// empty slice yields NaN.
pub fn sample(breakpoints: &[Breakpoint], t: f64) -> f64 {
    let (Some(first), Some(last)) = (breakpoints.first(), breakpoints.last()) else {
        return f64::NAN;
    };
    if t.is_nan() {
        return f64::NAN;
    }
    if t < first.time {
        return first.size;
    }
    if t >= last.time {
        return last.size;
    }

    // first.time <= t < last.time, so 1 <= upper < len
    let upper = breakpoints.partition_point(|b| b.time <= t);
    let left = breakpoints[upper - 1];
    let right = breakpoints[upper];

    // right.time > t >= left.time, the segment has positive length
    let fraction = (t - left.time) / (right.time - left.time);
    left.size + (right.size - left.size) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::catalog::Catalog;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn two_phase() -> Vec<Phase> {
        vec![
            Phase::new(10.0, 20.0, 30.0, 0.5),
            Phase::new(0.0, 10.0, 10.0, 0.5),
        ]
    }

    #[test]
    fn test_breakpoints_layout() {
        let timeline = Timeline::build(4.0, &two_phase()).unwrap();
        assert_eq!(
            timeline.breakpoints(),
            &[
                Breakpoint::new(0.0, 4.0),
                Breakpoint::new(30.0, 4.0),
                Breakpoint::new(60.0, 2.0),
                Breakpoint::new(70.0, 2.0),
                Breakpoint::new(80.0, 1.0),
            ]
        );
        assert_eq!(timeline.total_time(), 80.0);
        assert_eq!(timeline.final_size(), 1.0);
    }

    #[test]
    fn test_catalog_timelines_monotonic() {
        for map in &Catalog::builtin() {
            let timeline = Timeline::for_map(map).unwrap();
            assert_eq!(timeline.len(), 2 * map.phases.len() + 1);
            for pair in timeline.breakpoints().windows(2) {
                assert!(pair[0].time <= pair[1].time, "{}: times decrease", map.name);
                assert!(pair[0].size >= pair[1].size, "{}: size grows", map.name);
            }
            assert_eq!(timeline.total_time(), total_time(map));
        }
    }

    #[test]
    fn test_endpoints() {
        for map in &Catalog::builtin() {
            let timeline = Timeline::for_map(map).unwrap();
            assert_eq!(timeline.sample(0.0), map.map_size);

            let expected = map
                .phases
                .iter()
                .fold(map.map_size, |size, phase| size * phase.shrink);
            assert_eq!(timeline.sample(total_time(map)), expected);
        }
    }

    #[test]
    fn test_clamped_extrapolation() {
        let timeline = Timeline::build(4.0, &two_phase()).unwrap();
        assert_eq!(timeline.sample(-5.0), timeline.sample(0.0));
        assert_eq!(timeline.sample(-1e9), 4.0);
        assert_eq!(timeline.sample(80.5), 1.0);
        assert_eq!(timeline.sample(1e9), timeline.final_size());
    }

    #[test]
    fn test_linear_interpolation() {
        let timeline = Timeline::build(4.0, &two_phase()).unwrap();
        // Hold segment
        assert_eq!(timeline.sample(15.0), 4.0);
        // Move segment 30..60 goes 4 -> 2
        assert_close(timeline.sample(45.0), 3.0);
        assert_close(timeline.sample(36.0), 3.6);
        // Second move 70..80 goes 2 -> 1
        assert_close(timeline.sample(75.0), 1.5);
    }

    #[test]
    fn test_karakin_first_move() {
        let catalog = Catalog::builtin();
        let timeline = Timeline::for_map(catalog.find("Karakin").unwrap()).unwrap();
        // Hold until 180s, then 2.0 -> 1.1 over 120s
        assert_eq!(timeline.sample(180.0), 2.0);
        assert_close(timeline.sample(240.0), 1.55);
        assert_close(timeline.sample(300.0), 1.1);
    }

    #[test]
    fn test_empty_schedule() {
        let timeline = Timeline::build(3.0, &[]).unwrap();
        assert_eq!(timeline.breakpoints(), &[Breakpoint::new(0.0, 3.0)]);
        assert_eq!(timeline.total_time(), 0.0);
        for t in [-10.0, 0.0, 0.5, 1e6] {
            assert_eq!(timeline.sample(t), 3.0);
        }
    }

    #[test]
    fn test_zero_duration_phase() {
        let phases = [
            Phase::new(0.0, 0.0, 0.0, 0.5),
            Phase::new(0.0, 10.0, 10.0, 0.5),
        ];
        let timeline = Timeline::build(4.0, &phases).unwrap();
        assert_eq!(timeline.len(), 5);
        // Instant shrink at t=0: the later breakpoint holds from there on
        assert_eq!(timeline.sample(0.0), 2.0);
        assert_eq!(timeline.sample(-1.0), 4.0);
        assert_close(timeline.sample(15.0), 1.5);
    }

    #[test]
    fn test_collapse_to_tiny_size() {
        let phases = [Phase::new(0.0, 10.0, 10.0, f64::MIN_POSITIVE)];
        let timeline = Timeline::build(2.0, &phases).unwrap();
        let end = timeline.final_size();
        assert!(end > 0.0 && end < 1e-300);
        // Halfway through the move the zone is half its starting size
        assert_close(timeline.sample(15.0), 1.0 + end / 2.0);
        assert_eq!(timeline.sample(20.0), end);
    }

    #[test]
    fn test_interpolates_to_zero_size() {
        let breakpoints = [
            Breakpoint::new(0.0, 2.0),
            Breakpoint::new(10.0, 0.0),
            Breakpoint::new(20.0, 0.0),
        ];
        assert_close(sample(&breakpoints, 5.0), 1.0);
        assert_eq!(sample(&breakpoints, 10.0), 0.0);
        assert_eq!(sample(&breakpoints, 15.0), 0.0);
    }

    #[test]
    fn test_sample_edge_inputs() {
        assert!(sample(&[], 1.0).is_nan());
        let timeline = Timeline::build(4.0, &two_phase()).unwrap();
        assert!(timeline.sample(f64::NAN).is_nan());
    }

    #[test]
    fn test_build_rejects_negative_size() {
        assert!(matches!(
            Timeline::build(-1.0, &two_phase()),
            Err(ZoneError::NegativeLength(_))
        ));
        assert!(matches!(
            Timeline::build(f64::INFINITY, &two_phase()),
            Err(ZoneError::NonFinite(_))
        ));
    }

    #[test]
    fn test_build_rejects_negative_duration() {
        for phase in [
            Phase::new(0.0, 10.0, -20.0, 0.5),
            Phase::new(-1.0, 10.0, 10.0, 0.5),
            Phase::new(0.0, f64::NAN, 10.0, 0.5),
        ] {
            assert!(
                matches!(
                    Timeline::build(2.0, &[Phase::new(0.0, 10.0, 10.0, 0.5), phase]),
                    Err(ZoneError::InvalidPhase { index: 1, .. })
                ),
                "{:?} should be rejected",
                phase
            );
        }
    }

    #[test]
    fn test_build_rejects_shrink_out_of_range() {
        for shrink in [-3.0, 0.0, 1.5] {
            assert!(
                matches!(
                    Timeline::build(2.0, &[Phase::new(0.0, 10.0, 10.0, shrink)]),
                    Err(ZoneError::InvalidPhase { index: 0, .. })
                ),
                "shrink {} should be rejected",
                shrink
            );
        }
    }

    #[test]
    fn test_for_map_names_invalid_phase() {
        let map = Map {
            name: "Broken".to_string(),
            map_size: 2.0,
            num_players: 10,
            background: None,
            phases: vec![Phase::new(0.0, 10.0, 10.0, -3.0)],
        };
        assert!(matches!(
            Timeline::for_map(&map),
            Err(ZoneError::InvalidPhase { ref map, .. }) if map == "Broken"
        ));
    }

    #[test]
    fn test_sample_many_preserves_order() {
        let timeline = Timeline::build(4.0, &two_phase()).unwrap();
        let times = [80.0, -1.0, 45.0, 0.0, 75.0];
        let sizes = timeline.sample_many(&times);
        assert_eq!(sizes.len(), times.len());
        for (t, size) in times.iter().zip(&sizes) {
            assert_eq!(*size, timeline.sample(*t));
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        let catalog = Catalog::builtin();
        let timeline = Timeline::for_map(catalog.find("Erangel").unwrap()).unwrap();
        let times: Vec<f64> = (0..50_000).map(|i| i as f64 * 0.05 - 100.0).collect();

        let serial = timeline.sample_many_with_threshold(&times, usize::MAX);
        let parallel = timeline.sample_many_with_threshold(&times, 0);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let catalog = Catalog::builtin();
        let timeline = Timeline::for_map(catalog.find("Karakin").unwrap()).unwrap();
        let times: Vec<f64> = (0..1300).map(f64::from).collect();
        assert_eq!(timeline.sample_many(&times), timeline.sample_many(&times));
    }
}
