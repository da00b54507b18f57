//! Configuration for grid reading and writing.

use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};

/// Default minimum cell size at which a 1x1 grid is read as a constant grid.
pub const DEFAULT_CONSTANT_THRESHOLD: f64 = 1_000_000.0;

/// Configuration for the raster engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Defer loading cell values until they are first accessed.
    pub lazy_load: bool,

    /// 1x1 grids whose cell sizes are at or above this value are
    /// promoted to constant grids on read.
    pub constant_cell_size_threshold: f64,

    /// Reject writes where a value lies outside the recomputed min/max.
    pub verify_min_max_on_write: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lazy_load: false,
            constant_cell_size_threshold: DEFAULT_CONSTANT_THRESHOLD,
            verify_min_max_on_write: true,
        }
    }
}

impl GridConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RASTER_LAZY_LOAD") {
            config.lazy_load = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("RASTER_CONSTANT_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.constant_cell_size_threshold = threshold;
            }
        }

        if let Ok(val) = std::env::var("RASTER_VERIFY_MIN_MAX") {
            config.verify_min_max_on_write = parse_flag(&val);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.constant_cell_size_threshold.is_finite() || self.constant_cell_size_threshold <= 0.0 {
            return Err(RasterError::Config(
                "constant_cell_size_threshold must be a positive finite number".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_flag(val: &str) -> bool {
    val.eq_ignore_ascii_case("true") || val == "1"
}
