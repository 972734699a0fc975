/// Geometry and unit constants
pub mod geometry {
    /// Square kilometres to square metres (area-per-player is reported in m²)
    pub const M2_PER_KM2: f64 = 1_000_000.0;
}

/// Shrink multiplier bounds
pub mod shrink {
    /// Smallest accepted shrink multiplier (near-total collapse)
    pub const MIN: f64 = f64::MIN_POSITIVE;
    /// Largest accepted shrink multiplier (zone keeps its size)
    pub const MAX: f64 = 1.0;
    /// Final-phase collapse used by the built-in maps
    pub const FINAL_COLLAPSE: f64 = 0.001;
}

/// Timeline sampling constants
pub mod sampling {
    /// Default spacing of the report time axis in seconds
    pub const DEFAULT_STEP: f64 = 0.05;
    /// Smallest accepted time axis step (keeps the axis bounded)
    pub const MIN_STEP: f64 = 0.001;
    /// Query batches at or above this size are sampled on the rayon pool
    pub const PARALLEL_THRESHOLD: usize = 4096;
    /// Largest time axis a report may allocate
    pub const MAX_AXIS_SAMPLES: usize = 50_000_000;
}

/// Convert an area in km² to m²
#[inline]
pub fn km2_to_m2(area_km2: f64) -> f64 {
    area_km2 * geometry::M2_PER_KM2
}
