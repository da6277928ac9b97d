//! Run configuration
//!
//! [`LoopConfig`] is the serializable, user-facing description of a run. It is
//! loaded from JSON, validated once, and turned into the immutable
//! [`LoopParameters`] the driver works with. The helium abundance corrections
//! are derived at that point and never recomputed.
//!
//! # Example
//!
//! ```rust
//! use coronal_rs::config::{LoopConfig, LoopParameters};
//! use coronal_rs::solver::SolverType;
//!
//! let config = LoopConfig::from_json(r#"{
//!     "total_time": 1000.0,
//!     "tau": 1.0,
//!     "solver": "rk4",
//!     "heating": { "background": 1e-3, "partition": 0.5 }
//! }"#).unwrap();
//!
//! let parameters = LoopParameters::from_config(&config).unwrap();
//! assert_eq!(parameters.solver, SolverType::Rk4);
//! assert_eq!(parameters.step_capacity(), 1000);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dem::DemConfig;
use crate::error::{LoopError, LoopResult};
use crate::models::heating::Heater;
use crate::models::radiation::RadiationTable;
use crate::physics::closure::AbundanceCorrection;
use crate::solver::SolverType;

/// Upper bound on result slots allocated before a run starts
///
/// For the adaptive solver `tau` is only the first trial step, so N can be
/// far larger than the number of steps actually taken. Buffers grow past
/// this bound on demand.
pub const MAX_PRESIZED_SLOTS: usize = 4096;

// =================================================================================================
// Loop configuration
// =================================================================================================

/// User-facing run configuration
///
/// Every field has a default, so a JSON document only needs to name what it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Total simulated time \[s\]
    pub total_time: f64,

    /// Time step \[s\]; initial trial step for the adaptive solver
    pub tau: f64,

    /// Loop half-length \[cm\]
    pub loop_length: f64,

    /// Relative error tolerance of the adaptive solver
    pub rka_error: f64,

    /// Flux limiter coefficient
    pub saturation_limit: f64,

    /// C1 in the conduction-dominated limit
    pub c1_cond0: f64,

    /// C1 in the radiation-dominated limit
    pub c1_rad0: f64,

    /// Helium-to-hydrogen number ratio
    pub helium_to_hydrogen_ratio: f64,

    /// Apply the radiative-loss-shape correction to C1
    pub use_c1_loss_correction: bool,

    /// Apply the gravitational stratification correction to C1
    pub use_c1_grav_correction: bool,

    /// Use the piecewise power-law loss function instead of a table
    pub use_power_law_radiative_losses: bool,

    /// Classical Spitzer conduction without flux limiting
    pub use_spitzer_conductivity: bool,

    /// Accumulate the differential emission measure
    pub calculate_dem: bool,

    /// Time integrator
    pub solver: SolverType,

    /// Results file; DEM files share its name with extra extensions
    pub output_filename: PathBuf,

    /// Heating function
    pub heating: Heater,

    /// Radiative loss table, required when power-law losses are disabled
    pub radiation_table: Option<RadiationTable>,

    /// DEM temperature grid, required when `calculate_dem` is set
    pub dem: Option<DemConfig>,

    /// Upper bound on the number of steps (unbounded when absent)
    pub max_steps: Option<usize>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            total_time: 5000.0,
            tau: 1.0,
            loop_length: 4.0e9,
            rka_error: 1.0e-6,
            saturation_limit: 1.0 / 6.0,
            c1_cond0: 6.0,
            c1_rad0: 0.6,
            helium_to_hydrogen_ratio: 0.075,
            use_c1_loss_correction: true,
            use_c1_grav_correction: true,
            use_power_law_radiative_losses: true,
            use_spitzer_conductivity: false,
            calculate_dem: false,
            solver: SolverType::Rk4,
            output_filename: PathBuf::from("coronal_loop.tsv"),
            heating: Heater::new(1.0e-3, 0.5),
            radiation_table: None,
            dem: None,
            max_steps: None,
        }
    }
}

impl LoopConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> LoopResult<()> {
        let positive = [
            ("total_time", self.total_time),
            ("tau", self.tau),
            ("loop_length", self.loop_length),
            ("rka_error", self.rka_error),
            ("saturation_limit", self.saturation_limit),
            ("c1_cond0", self.c1_cond0),
            ("c1_rad0", self.c1_rad0),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LoopError::Config(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }

        if !(self.helium_to_hydrogen_ratio.is_finite() && self.helium_to_hydrogen_ratio >= 0.0) {
            return Err(LoopError::Config(format!(
                "helium_to_hydrogen_ratio must be >= 0, got {}",
                self.helium_to_hydrogen_ratio
            )));
        }

        self.heating.validate()?;

        match (&self.radiation_table, self.use_power_law_radiative_losses) {
            (Some(table), _) => table.validate()?,
            (None, false) => {
                return Err(LoopError::Config(
                    "radiation_table is required when use_power_law_radiative_losses is false"
                        .to_string(),
                ));
            }
            (None, true) => {}
        }

        match (&self.dem, self.calculate_dem) {
            (Some(dem), _) => dem.validate()?,
            (None, true) => {
                return Err(LoopError::Config(
                    "dem grid is required when calculate_dem is true".to_string(),
                ));
            }
            (None, false) => {}
        }

        if self.max_steps == Some(0) {
            return Err(LoopError::Config("max_steps must be >= 1".to_string()));
        }

        Ok(())
    }

    /// Load from JSON string
    pub fn from_json(json: &str) -> LoopResult<Self> {
        serde_json::from_str(json).map_err(|e| LoopError::Config(format!("JSON parse error: {e}")))
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> LoopResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> LoopResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LoopError::Config(format!("JSON serialization error: {e}")))
    }
}

// =================================================================================================
// Loop parameters
// =================================================================================================

/// Validated, immutable parameters of one run
#[derive(Debug, Clone, PartialEq)]
pub struct LoopParameters {
    pub total_time: f64,
    pub tau: f64,
    pub loop_length: f64,
    pub rka_error: f64,
    pub saturation_limit: f64,
    pub c1_cond0: f64,
    pub c1_rad0: f64,
    pub use_c1_loss_correction: bool,
    pub use_c1_grav_correction: bool,
    pub use_power_law_radiative_losses: bool,
    pub use_spitzer_conductivity: bool,
    pub calculate_dem: bool,
    pub solver: SolverType,
    pub output_filename: PathBuf,
    pub max_steps: Option<usize>,

    /// Helium corrections, derived once from `helium_to_hydrogen_ratio`
    pub abundance: AbundanceCorrection,
}

impl LoopParameters {
    /// Validate `config` and derive the abundance corrections
    pub fn from_config(config: &LoopConfig) -> LoopResult<Self> {
        config.validate()?;

        Ok(Self {
            total_time: config.total_time,
            tau: config.tau,
            loop_length: config.loop_length,
            rka_error: config.rka_error,
            saturation_limit: config.saturation_limit,
            c1_cond0: config.c1_cond0,
            c1_rad0: config.c1_rad0,
            use_c1_loss_correction: config.use_c1_loss_correction,
            use_c1_grav_correction: config.use_c1_grav_correction,
            use_power_law_radiative_losses: config.use_power_law_radiative_losses,
            use_spitzer_conductivity: config.use_spitzer_conductivity,
            calculate_dem: config.calculate_dem,
            solver: config.solver,
            output_filename: config.output_filename.clone(),
            max_steps: config.max_steps,
            abundance: AbundanceCorrection::from_helium_ratio(config.helium_to_hydrogen_ratio),
        })
    }

    /// Number of pre-allocated result slots, `ceil(total_time / tau)`
    ///
    /// Saturates at `usize::MAX` for extreme ratios.
    pub fn step_capacity(&self) -> usize {
        (self.total_time / self.tau).ceil() as usize
    }

    /// Result slots allocated up front, N capped at [`MAX_PRESIZED_SLOTS`]
    pub fn presized_slots(&self) -> usize {
        self.step_capacity().min(MAX_PRESIZED_SLOTS)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
