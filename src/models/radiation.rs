//! Optically thin radiative losses
//!
//! The loop model only needs the loss function Λ(T) \[erg·cm³/s\], evaluated
//! at `log10(T)`. Two variants are available and selected once, when the loop
//! is built:
//!
//! - **PowerLaw**: piecewise power-law fit over seven temperature ranges
//! - **Tabulated**: user-supplied table, interpolated linearly in log-log space
//!
//! # Example
//!
//! ```rust
//! use coronal_rs::models::{RadiationModel, RadiativeLoss};
//!
//! let radiation = RadiationModel::PowerLaw;
//! // Coronal temperatures: Λ ≈ 1.9e-22 erg cm³/s
//! assert!((radiation.loss(6.0) - 1.90e-22).abs() < 1e-30);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LoopError, LoopResult};

// =================================================================================================
// Capability
// =================================================================================================

/// Capability interface for radiative loss functions
pub trait RadiativeLoss {
    /// Radiative loss function Λ(T) \[erg·cm³/s\] at `log10(T)`
    fn loss(&self, log_temperature: f64) -> f64;
}

// =================================================================================================
// Tabulated losses
// =================================================================================================

/// Tabulated loss function
///
/// Both columns are base-10 logarithms. `log_temperature` must be strictly
/// increasing. Outside the table the end values are held constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiationTable {
    /// log10(T \[K\])
    pub log_temperature: Vec<f64>,

    /// log10(Λ \[erg·cm³/s\])
    pub log_loss: Vec<f64>,
}

impl RadiationTable {
    /// Build and validate a table
    pub fn new(log_temperature: Vec<f64>, log_loss: Vec<f64>) -> LoopResult<Self> {
        let table = Self {
            log_temperature,
            log_loss,
        };
        table.validate()?;
        Ok(table)
    }

    /// Check table shape and ordering
    pub fn validate(&self) -> LoopResult<()> {
        if self.log_temperature.len() != self.log_loss.len() {
            return Err(LoopError::Config(format!(
                "radiation table columns differ in length: {} temperatures, {} losses",
                self.log_temperature.len(),
                self.log_loss.len()
            )));
        }
        if self.log_temperature.len() < 2 {
            return Err(LoopError::Config(
                "radiation table needs at least two rows".to_string(),
            ));
        }
        if self.log_temperature.windows(2).any(|w| w[1] <= w[0]) {
            return Err(LoopError::Config(
                "radiation table temperatures must be strictly increasing".to_string(),
            ));
        }
        if self
            .log_temperature
            .iter()
            .chain(self.log_loss.iter())
            .any(|x| !x.is_finite())
        {
            return Err(LoopError::Config(
                "radiation table contains non-finite values".to_string(),
            ));
        }
        Ok(())
    }

    fn interpolate(&self, log_temperature: f64) -> f64 {
        let x = &self.log_temperature;
        let y = &self.log_loss;
        let last = x.len() - 1;

        if log_temperature <= x[0] {
            return y[0];
        }
        if log_temperature >= x[last] {
            return y[last];
        }

        // First index with x > log_temperature; in 1..=last here
        let upper = x.partition_point(|&xi| xi <= log_temperature);
        let lower = upper - 1;
        let weight = (log_temperature - x[lower]) / (x[upper] - x[lower]);

        y[lower] + weight * (y[upper] - y[lower])
    }
}

// =================================================================================================
// Radiation model
// =================================================================================================

/// Radiative loss model selected at construction time
#[derive(Debug, Clone, PartialEq)]
pub enum RadiationModel {
    /// Piecewise power-law fit
    PowerLaw,

    /// Interpolated table
    Tabulated(RadiationTable),
}

impl RadiationModel {
    /// Piecewise power law Λ(T) = χ · T^α
    ///
    /// | log10 T range   | χ         | α    |
    /// |-----------------|-----------|------|
    /// | ≤ 4.97          | 1.09e-31  | 2    |
    /// | (4.97, 5.67]    | 8.87e-17  | -1   |
    /// | (5.67, 6.18]    | 1.90e-22  | 0    |
    /// | (6.18, 6.55]    | 3.53e-13  | -3/2 |
    /// | (6.55, 6.90]    | 3.46e-25  | 1/3  |
    /// | (6.90, 7.63]    | 5.49e-16  | -1   |
    /// | > 7.63          | 1.96e-27  | 1/2  |
    pub fn power_law(log_temperature: f64) -> f64 {
        let temperature = 10f64.powf(log_temperature);

        let (chi, alpha) = if log_temperature <= 4.97 {
            (1.09e-31, 2.0)
        } else if log_temperature <= 5.67 {
            (8.87e-17, -1.0)
        } else if log_temperature <= 6.18 {
            (1.90e-22, 0.0)
        } else if log_temperature <= 6.55 {
            (3.53e-13, -1.5)
        } else if log_temperature <= 6.90 {
            (3.46e-25, 1.0 / 3.0)
        } else if log_temperature <= 7.63 {
            (5.49e-16, -1.0)
        } else {
            (1.96e-27, 0.5)
        };

        chi * temperature.powf(alpha)
    }

    /// Name of the active variant
    pub fn name(&self) -> &'static str {
        match self {
            RadiationModel::PowerLaw => "power law",
            RadiationModel::Tabulated(_) => "tabulated",
        }
    }
}

impl RadiativeLoss for RadiationModel {
    fn loss(&self, log_temperature: f64) -> f64 {
        match self {
            RadiationModel::PowerLaw => Self::power_law(log_temperature),
            RadiationModel::Tabulated(table) => 10f64.powf(table.interpolate(log_temperature)),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
