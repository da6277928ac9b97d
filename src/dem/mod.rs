//! Differential emission measure (DEM)
//!
//! The DEM describes how much emitting plasma sits at each temperature. A
//! zero-dimensional loop has no temperature profile of its own, so the DEM is
//! reconstructed each step from the averaged quantities: a coronal part
//! around the average temperature and a transition-region part below it.
//!
//! The driver talks to the DEM only through [`DemAccumulator`]: one call per
//! recorded step, one call at the end to write the files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoopError, LoopResult};

pub mod two_region;

pub use two_region::TwoRegionDem;

// =================================================================================================
// Accumulator interface
// =================================================================================================

/// Per-step DEM collection
pub trait DemAccumulator {
    /// Record the DEM of step `step` from the electron pressure, the density,
    /// the electron heat flux and C1 of that step
    fn accumulate(
        &mut self,
        step: usize,
        pressure_e: f64,
        density: f64,
        flux_e: f64,
        c1: f64,
    ) -> LoopResult<()>;

    /// Write the accumulated DEM next to `base_path`, dropping the last
    /// `excess` (never filled) rows
    fn write_output(&self, base_path: &Path, excess: usize) -> LoopResult<()>;
}

// =================================================================================================
// Temperature grid
// =================================================================================================

/// Uniform grid in log10(T)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemConfig {
    /// Lowest grid temperature, log10(T \[K\])
    pub log_temperature_min: f64,

    /// Highest grid temperature, log10(T \[K\])
    pub log_temperature_max: f64,

    /// Grid spacing in log10(T)
    pub log_temperature_delta: f64,
}

impl Default for DemConfig {
    fn default() -> Self {
        Self {
            log_temperature_min: 4.0,
            log_temperature_max: 8.5,
            log_temperature_delta: 0.01,
        }
    }
}

impl DemConfig {
    pub fn validate(&self) -> LoopResult<()> {
        if !(self.log_temperature_delta.is_finite() && self.log_temperature_delta > 0.0) {
            return Err(LoopError::Config(format!(
                "dem log_temperature_delta must be > 0, got {}",
                self.log_temperature_delta
            )));
        }
        if !(self.log_temperature_min.is_finite()
            && self.log_temperature_max.is_finite()
            && self.log_temperature_max > self.log_temperature_min)
        {
            return Err(LoopError::Config(format!(
                "dem temperature range is empty: [{}, {}]",
                self.log_temperature_min, self.log_temperature_max
            )));
        }
        Ok(())
    }

    /// Grid points from min to max (inclusive, rounded to whole steps)
    pub fn grid(&self) -> Vec<f64> {
        let span = self.log_temperature_max - self.log_temperature_min;
        let count = (span / self.log_temperature_delta).round() as usize + 1;

        (0..count)
            .map(|k| self.log_temperature_min + k as f64 * self.log_temperature_delta)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_includes_both_ends() {
        let config = DemConfig {
            log_temperature_min: 5.0,
            log_temperature_max: 6.0,
            log_temperature_delta: 0.25,
        };
        let grid = config.grid();

        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], 5.0);
        assert_eq!(grid[4], 6.0);
    }

    #[test]
    fn test_default_grid_is_valid() {
        let config = DemConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid().len(), 451);
    }

    #[test]
    fn test_invalid_grids() {
        let reversed = DemConfig {
            log_temperature_min: 7.0,
            log_temperature_max: 6.0,
            ..DemConfig::default()
        };
        assert!(reversed.validate().is_err());

        let flat = DemConfig {
            log_temperature_delta: 0.0,
            ..DemConfig::default()
        };
        assert!(flat.validate().is_err());
    }
}
