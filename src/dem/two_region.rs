//! Two-region DEM reconstruction
//!
//! With T̄ the electron temperature of the step, the corona spans
//! `T_0 = c3·T̄ ≤ T ≤ T_a = T̄/c2` and is taken as isothermal-in-distribution:
//!
//! ```text
//! DEM_corona(T) = 2 · L · n² / (T_a - T_0)
//! ```
//!
//! Below `T_0` the transition region is conduction dominated. Its shape
//!
//! ```text
//! DEM_tr(T) ∝ (p_e / k_B)² · κ_e · T^(1/2) / |f_e|
//! ```
//!
//! is scaled so that the power it radiates equals C1 times the power radiated
//! by the corona, matching the loss partition used by the loop equations.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, s};

use crate::dem::{DemAccumulator, DemConfig};
use crate::error::{LoopError, LoopResult};
use crate::models::radiation::{RadiationModel, RadiativeLoss};
use crate::output::export::tsv::{TsvConfig, write_row};
use crate::physics::closure::Closure;
use crate::physics::constants::{BOLTZMANN_CONSTANT, SPITZER_ELECTRON_CONDUCTIVITY};

/// Extension of the coronal DEM file
pub const CORONA_EXTENSION: &str = "dem_corona";

/// Extension of the transition-region DEM file
pub const TRANSITION_REGION_EXTENSION: &str = "dem_tr";

/// Coronal and transition-region DEM, one row per step
#[derive(Debug, Clone)]
pub struct TwoRegionDem {
    log_temperature: Array1<f64>,
    temperature: Array1<f64>,
    bin_width: Array1<f64>,
    radiative_loss: Array1<f64>,
    loop_length: f64,
    corona: Array2<f64>,
    transition_region: Array2<f64>,
}

impl TwoRegionDem {
    /// Grid from `config`, rows pre-sized to `capacity` steps
    ///
    /// Λ(T) is tabulated once on the grid.
    pub fn new(
        config: &DemConfig,
        loop_length: f64,
        radiation: &RadiationModel,
        capacity: usize,
    ) -> LoopResult<Self> {
        config.validate()?;

        let log_temperature = Array1::from(config.grid());
        let temperature = log_temperature.mapv(|x| 10f64.powf(x));
        let bin_width =
            temperature.mapv(|t| t * std::f64::consts::LN_10 * config.log_temperature_delta);
        let radiative_loss = log_temperature.mapv(|x| radiation.loss(x));
        let bins = log_temperature.len();

        Ok(Self {
            log_temperature,
            temperature,
            bin_width,
            radiative_loss,
            loop_length,
            corona: Array2::zeros((capacity, bins)),
            transition_region: Array2::zeros((capacity, bins)),
        })
    }

    /// log10(T) grid
    pub fn log_temperature(&self) -> &Array1<f64> {
        &self.log_temperature
    }

    /// Coronal DEM rows \[cm⁻⁵ K⁻¹\]
    pub fn corona(&self) -> &Array2<f64> {
        &self.corona
    }

    /// Transition-region DEM rows \[cm⁻⁵ K⁻¹\]
    pub fn transition_region(&self) -> &Array2<f64> {
        &self.transition_region
    }

    /// Radiated power of a DEM row, ∫ DEM · Λ dT
    fn radiated_power(&self, row: &Array1<f64>) -> f64 {
        (row * &self.radiative_loss * &self.bin_width).sum()
    }

    fn rows(&self, pressure_e: f64, density: f64, flux_e: f64, c1: f64) -> (Array1<f64>, Array1<f64>) {
        let temperature_avg = pressure_e / (BOLTZMANN_CONSTANT * density);
        let temperature_base = Closure::c3() * temperature_avg;
        let temperature_apex = temperature_avg / Closure::c2();

        let corona_value = 2.0 * self.loop_length * density.powi(2) / (temperature_apex - temperature_base);
        let corona = self.temperature.mapv(|t| {
            if t >= temperature_base && t <= temperature_apex {
                corona_value
            } else {
                0.0
            }
        });

        let shape_prefactor = (pressure_e / BOLTZMANN_CONSTANT).powi(2) * SPITZER_ELECTRON_CONDUCTIVITY
            / flux_e.abs();
        let shape = self.temperature.mapv(|t| {
            if t < temperature_base {
                shape_prefactor * t.sqrt()
            } else {
                0.0
            }
        });

        let shape_power = self.radiated_power(&shape);
        let transition_region = if shape_power > 0.0 && shape_power.is_finite() {
            let scale = c1 * self.radiated_power(&corona) / shape_power;
            shape * scale
        } else {
            Array1::zeros(self.temperature.len())
        };

        (corona, transition_region)
    }

    fn write_matrix(&self, path: &Path, rows: &Array2<f64>, excess: usize) -> LoopResult<()> {
        let config = TsvConfig::default();
        let keep = rows.nrows().saturating_sub(excess);
        let mut writer = BufWriter::new(File::create(path)?);

        write_row(&mut writer, self.log_temperature.iter().copied(), &config)?;
        for row in rows.slice(s![..keep, ..]).rows() {
            write_row(&mut writer, row.iter().copied(), &config)?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl DemAccumulator for TwoRegionDem {
    fn accumulate(
        &mut self,
        step: usize,
        pressure_e: f64,
        density: f64,
        flux_e: f64,
        c1: f64,
    ) -> LoopResult<()> {
        let (corona, transition_region) = self.rows(pressure_e, density, flux_e, c1);

        if step < self.corona.nrows() {
            self.corona.row_mut(step).assign(&corona);
            self.transition_region.row_mut(step).assign(&transition_region);
            return Ok(());
        }

        if step != self.corona.nrows() {
            return Err(LoopError::Lifecycle(format!(
                "DEM step {step} recorded out of order (expected {})",
                self.corona.nrows()
            )));
        }

        self.corona
            .push_row(corona.view())
            .map_err(|e| LoopError::Numerical(format!("DEM row shape: {e}")))?;
        self.transition_region
            .push_row(transition_region.view())
            .map_err(|e| LoopError::Numerical(format!("DEM row shape: {e}")))?;

        Ok(())
    }

    fn write_output(&self, base_path: &Path, excess: usize) -> LoopResult<()> {
        self.write_matrix(&with_extension(base_path, CORONA_EXTENSION), &self.corona, excess)?;
        self.write_matrix(
            &with_extension(base_path, TRANSITION_REGION_EXTENSION),
            &self.transition_region,
            excess,
        )
    }
}

/// `base_path` with `.extension` appended (existing extensions are kept)
pub fn with_extension(base_path: &Path, extension: &str) -> PathBuf {
    let mut name = base_path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    const LOOP_LENGTH: f64 = 1.0e9;

    fn dem(capacity: usize) -> TwoRegionDem {
        TwoRegionDem::new(&DemConfig::default(), LOOP_LENGTH, &RadiationModel::PowerLaw, capacity)
            .unwrap()
    }

    fn state(temperature: f64, density: f64) -> (f64, f64) {
        (BOLTZMANN_CONSTANT * density * temperature, density)
    }

    #[test]
    fn test_corona_confined_to_its_temperature_band() {
        let mut dem = dem(1);
        let (pressure_e, density) = state(2.0e6, 1.0e9);
        dem.accumulate(0, pressure_e, density, -1.0e6, 2.0).unwrap();

        let row = dem.corona().row(0);
        for (value, log_t) in row.iter().zip(dem.log_temperature().iter()) {
            let t = 10f64.powf(*log_t);
            if t < 0.6 * 2.0e6 || t > 2.0e6 / 0.9 {
                assert_eq!(*value, 0.0);
            } else {
                assert_relative_eq!(
                    *value,
                    2.0 * LOOP_LENGTH * 1.0e18 / (2.0e6 / 0.9 - 1.2e6),
                    max_relative = 1e-12
                );
            }
        }
        assert!(row.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_transition_region_power_matches_c1() {
        let mut dem = dem(1);
        let (pressure_e, density) = state(3.0e6, 2.0e9);
        let c1 = 1.7;
        dem.accumulate(0, pressure_e, density, -5.0e6, c1).unwrap();

        let corona = dem.corona().row(0).to_owned();
        let transition_region = dem.transition_region().row(0).to_owned();

        assert_relative_eq!(
            dem.radiated_power(&transition_region),
            c1 * dem.radiated_power(&corona),
            max_relative = 1e-9
        );
        // Transition region lies strictly below the corona
        let base = 0.6 * 3.0e6;
        for (value, t) in transition_region.iter().zip(dem.temperature.iter()) {
            if *t >= base {
                assert_eq!(*value, 0.0);
            }
        }
    }

    #[test]
    fn test_zero_flux_gives_empty_transition_region() {
        let mut dem = dem(1);
        let (pressure_e, density) = state(1.0e6, 1.0e9);
        dem.accumulate(0, pressure_e, density, 0.0, 2.0).unwrap();

        assert!(dem.transition_region().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rows_overwrite_then_append() {
        let mut dem = dem(2);
        let (pressure_e, density) = state(1.0e6, 1.0e9);

        for step in 0..4 {
            dem.accumulate(step, pressure_e, density, -1.0e5, 2.0).unwrap();
        }
        assert_eq!(dem.corona().nrows(), 4);
        assert_eq!(dem.transition_region().nrows(), 4);

        let error = dem.accumulate(6, pressure_e, density, -1.0e5, 2.0).unwrap_err();
        assert!(matches!(error, LoopError::Lifecycle(_)));
    }

    #[test]
    fn test_write_output_trims_excess_rows() {
        let directory = tempdir().unwrap();
        let base = directory.path().join("run.tsv");

        let mut dem = dem(5);
        let (pressure_e, density) = state(1.0e6, 1.0e9);
        for step in 0..3 {
            dem.accumulate(step, pressure_e, density, -1.0e5, 2.0).unwrap();
        }
        dem.write_output(&base, 2).unwrap();

        for extension in [CORONA_EXTENSION, TRANSITION_REGION_EXTENSION] {
            let contents = std::fs::read_to_string(with_extension(&base, extension)).unwrap();
            let lines: Vec<&str> = contents.lines().collect();

            // Grid row plus three steps
            assert_eq!(lines.len(), 4);
            assert_eq!(lines[0].split('\t').count(), dem.log_temperature().len());
        }
    }

    #[test]
    fn test_with_extension_keeps_existing_extension() {
        let path = with_extension(Path::new("/tmp/loop.tsv"), CORONA_EXTENSION);
        assert_eq!(path, PathBuf::from("/tmp/loop.tsv.dem_corona"));
    }
}
