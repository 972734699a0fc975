//! Errors raised by the zone model
//!
//! Every variant is a deterministic function of its input: domain violations
//! are reported at the point they occur and never clamped away.

use std::path::PathBuf;

/// Result alias for zone operations
pub type Result<T> = std::result::Result<T, ZoneError>;

#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("Length must be non-negative, got {0}")]
    NegativeLength(f64),
    #[error("Area must be non-negative, got {0}")]
    NegativeArea(f64),
    #[error("Value must be finite, got {0}")]
    NonFinite(f64),
    #[error("Player count must be positive, got {0}")]
    InvalidPlayerCount(u32),
    #[error("Invalid map '{name}': {reason}")]
    InvalidMap { name: String, reason: String },
    #[error("Invalid phase {index} on map '{map}': {reason}")]
    InvalidPhase {
        map: String,
        index: usize,
        reason: String,
    },
    #[error("Invalid time axis: {0}")]
    InvalidTimeAxis(String),
    #[error("Unknown map: {0}")]
    UnknownMap(String),
    #[error("Map '{0}' has no phases")]
    NoPhases(String),
    #[error("Failed to read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),
}

/// Reject NaN and infinities
pub(crate) fn ensure_finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ZoneError::NonFinite(value))
    }
}
