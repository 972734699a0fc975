use std::path::PathBuf;

use crate::zone::constants::sampling;

/// Planner configuration
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// JSON catalog to load instead of the built-in maps
    pub catalog_path: Option<PathBuf>,
    /// Spacing of the report time axis in seconds
    pub sample_step: f64,
    /// Query batches at or above this size are sampled in parallel
    pub parallel_threshold: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            sample_step: sampling::DEFAULT_STEP,
            parallel_threshold: sampling::PARALLEL_THRESHOLD,
        }
    }
}

impl PlannerConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("BLUEZONE_CATALOG") {
            if !path.trim().is_empty() {
                config.catalog_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(step) = std::env::var("BLUEZONE_SAMPLE_STEP") {
            if let Ok(parsed) = step.parse::<f64>() {
                if parsed.is_finite() && parsed >= sampling::MIN_STEP {
                    config.sample_step = parsed;
                } else {
                    tracing::warn!(
                        "BLUEZONE_SAMPLE_STEP must be >= {}, using default",
                        sampling::MIN_STEP
                    );
                }
            } else {
                tracing::warn!("Invalid BLUEZONE_SAMPLE_STEP '{}', using default", step);
            }
        }

        if let Ok(threshold) = std::env::var("BLUEZONE_PARALLEL_THRESHOLD") {
            if let Ok(parsed) = threshold.parse::<usize>() {
                config.parallel_threshold = parsed;
            } else {
                tracing::warn!(
                    "Invalid BLUEZONE_PARALLEL_THRESHOLD '{}', using default",
                    threshold
                );
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if !self.sample_step.is_finite() || self.sample_step < sampling::MIN_STEP {
            return Err(format!(
                "sample_step must be at least {} seconds, got {}",
                sampling::MIN_STEP,
                self.sample_step
            ));
        }
        if let Some(path) = &self.catalog_path {
            if path.as_os_str().is_empty() {
                return Err("catalog_path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}
