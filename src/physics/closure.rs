//! Closure relations of the zero-dimensional loop model
//!
//! A single control volume cannot resolve temperature gradients, so the heat
//! flux, the collisional coupling between the two fluids and the partition of
//! radiative losses between corona and transition region are all expressed as
//! closed-form functions of the averaged coronal quantities.
//!
//! # Relations
//!
//! | Function                 | Quantity                                        |
//! |--------------------------|-------------------------------------------------|
//! | `thermal_conduction`     | Spitzer flux, optionally blended with saturation|
//! | `collision_frequency`    | Electron-ion Coulomb collision frequency        |
//! | `c1`                     | Transition-region / coronal radiative loss ratio|
//! | `c2`, `c3`               | Average-to-apex and base-to-average temperatures|
//! | `scale_height`           | Gravitational pressure scale height             |
//!
//! `AbundanceCorrection` folds the helium population into two scalar factors
//! that enter the ion mass and the ion equation of state.

use crate::config::LoopParameters;
use crate::models::radiation::RadiativeLoss;
use crate::physics::constants::{
    BOLTZMANN_CONSTANT, ELECTRON_CHARGE_POWER_4, ELECTRON_MASS, PI, PROTON_MASS,
    SOLAR_SURFACE_GRAVITY, SPITZER_ELECTRON_CONDUCTIVITY, SPITZER_ION_CONDUCTIVITY,
};
use crate::physics::traits::Species;

/// Equilibrium value of C1 when conduction and radiation balance exactly
const C1_EQUILIBRIUM: f64 = 2.0;

// =================================================================================================
// Abundance correction
// =================================================================================================

/// Helium abundance corrections
///
/// With a helium-to-hydrogen number ratio `r`, the average ionic charge is
///
/// ```text
/// z_avg = (1 + 2r) / (1 + r)
/// ```
///
/// giving
///
/// ```text
/// boltzmann_correction = (1 + 1/z_avg) / 2
/// ion_mass_correction  = (1 + 4r) / (2 + 3r) · 2 · boltzmann_correction
/// ```
///
/// Both are exactly 1 for a pure hydrogen plasma.
///
/// # Example
/// ```
/// use coronal_rs::physics::AbundanceCorrection;
///
/// let hydrogen = AbundanceCorrection::from_helium_ratio(0.0);
/// assert_eq!(hydrogen.boltzmann_correction, 1.0);
/// assert_eq!(hydrogen.ion_mass_correction, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbundanceCorrection {
    /// Ratio of the ion to electron equation-of-state coefficient
    pub boltzmann_correction: f64,

    /// Average ion mass in units of the proton mass
    pub ion_mass_correction: f64,
}

impl AbundanceCorrection {
    /// Compute both factors from the helium-to-hydrogen number ratio
    pub fn from_helium_ratio(helium_to_hydrogen_ratio: f64) -> Self {
        let r = helium_to_hydrogen_ratio;
        let z_avg = (1.0 + 2.0 * r) / (1.0 + r);
        let boltzmann_correction = (1.0 + 1.0 / z_avg) / 2.0;
        let ion_mass_correction = (1.0 + 4.0 * r) / (2.0 + 3.0 * r) * 2.0 * boltzmann_correction;

        Self {
            boltzmann_correction,
            ion_mass_correction,
        }
    }
}

// =================================================================================================
// Per-species coefficients
// =================================================================================================

/// Transport coefficients of one species
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesCoefficients {
    /// Spitzer conductivity coefficient κ
    pub conductivity: f64,

    /// Particle mass \[g\]
    pub mass: f64,

    /// Effective Boltzmann constant \[erg/K\]
    pub boltzmann: f64,
}

// =================================================================================================
// Closure
// =================================================================================================

/// Closure calculator
///
/// Holds the subset of [`LoopParameters`] the closure relations depend on.
/// Every method is a pure function of its arguments and these fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Closure {
    /// Loop half-length L \[cm\]
    pub loop_length: f64,

    /// Flux limiter coefficient for the saturated heat flux
    pub saturation_limit: f64,

    /// C1 calibration in the conduction-dominated (under-dense) regime
    pub c1_cond0: f64,

    /// C1 calibration in the radiation-dominated (over-dense) regime
    pub c1_rad0: f64,

    /// Apply the radiative-loss-shape correction to C1
    pub use_c1_loss_correction: bool,

    /// Apply the gravitational stratification correction to C1
    pub use_c1_grav_correction: bool,

    /// Use the classical Spitzer flux without saturation
    pub use_spitzer_conductivity: bool,

    /// Helium corrections (computed once from the configuration)
    pub abundance: AbundanceCorrection,
}

impl Closure {
    /// Extract the closure parameters from the loop parameters
    pub fn from_parameters(parameters: &LoopParameters) -> Self {
        Self {
            loop_length: parameters.loop_length,
            saturation_limit: parameters.saturation_limit,
            c1_cond0: parameters.c1_cond0,
            c1_rad0: parameters.c1_rad0,
            use_c1_loss_correction: parameters.use_c1_loss_correction,
            use_c1_grav_correction: parameters.use_c1_grav_correction,
            use_spitzer_conductivity: parameters.use_spitzer_conductivity,
            abundance: parameters.abundance,
        }
    }

    /// Conductivity, mass and effective Boltzmann constant of a species
    pub fn species_coefficients(&self, species: Species) -> SpeciesCoefficients {
        match species {
            Species::Electron => SpeciesCoefficients {
                conductivity: SPITZER_ELECTRON_CONDUCTIVITY,
                mass: ELECTRON_MASS,
                boltzmann: BOLTZMANN_CONSTANT,
            },
            Species::Ion => SpeciesCoefficients {
                conductivity: SPITZER_ION_CONDUCTIVITY,
                mass: self.abundance.ion_mass_correction * PROTON_MASS,
                boltzmann: self.abundance.boltzmann_correction * BOLTZMANN_CONSTANT,
            },
        }
    }

    /// Thermal conduction flux of one species \[erg/(cm²·s)\]
    ///
    /// Classical Spitzer flux:
    ///
    /// ```text
    /// f_c = -(2/7) · κ · (T / C2)^3.5 / L
    /// ```
    ///
    /// Unless Spitzer-only conduction is requested, `f_c` is limited by the
    /// free-streaming flux
    ///
    /// ```text
    /// f_s = -saturation_limit · 1.5 / sqrt(m) · n · (k_B · T)^1.5
    /// f   = -f_c · f_s / sqrt(f_c² + f_s²)
    /// ```
    ///
    /// which keeps |f| ≤ min(|f_c|, |f_s|).
    pub fn thermal_conduction(&self, temperature: f64, density: f64, species: Species) -> f64 {
        let coefficients = self.species_coefficients(species);

        let f_c = -2.0 / 7.0 * coefficients.conductivity * (temperature / Self::c2()).powf(3.5)
            / self.loop_length;

        if self.use_spitzer_conductivity {
            return f_c;
        }

        let f_s = -self.saturation_limit * 1.5 / coefficients.mass.sqrt()
            * density
            * (coefficients.boltzmann * temperature).powf(1.5);

        -f_c * f_s / (f_c.powi(2) + f_s.powi(2)).sqrt()
    }

    /// Electron-ion collision frequency \[s⁻¹\]
    ///
    /// The Coulomb logarithm formula is kept as calibrated; it has not been
    /// checked against a textbook expression.
    pub fn collision_frequency(&self, temperature_e: f64, density: f64) -> f64 {
        let coulomb_logarithm = 23.0
            - ((density / 1.0e13).sqrt()
                * (BOLTZMANN_CONSTANT * temperature_e / 1.602e-9).powf(-1.5))
            .ln();

        16.0 * PI.sqrt() / 3.0 * ELECTRON_CHARGE_POWER_4
            / (self.abundance.ion_mass_correction * PROTON_MASS * ELECTRON_MASS)
            * (2.0 * BOLTZMANN_CONSTANT * temperature_e / ELECTRON_MASS).powf(-1.5)
            * density
            * coulomb_logarithm
    }

    /// Multiplicative corrections applied to C1: (loss, gravity)
    ///
    /// Each is 1 unless its feature flag is set.
    pub fn c1_corrections(
        &self,
        temperature_e: f64,
        temperature_i: f64,
        radiative_loss: f64,
    ) -> (f64, f64) {
        let loss_correction = if self.use_c1_loss_correction {
            1.95e-18 * temperature_e.powf(-2.0 / 3.0) / radiative_loss
        } else {
            1.0
        };

        let grav_correction = if self.use_c1_grav_correction {
            let scale_height = self.scale_height(temperature_e, temperature_i);
            (4.0 * (PI / 5.0).sin() * self.loop_length / (PI * scale_height)).exp()
        } else {
            1.0
        };

        (loss_correction, grav_correction)
    }

    /// Squared density at which conduction and radiation balance for T_e
    pub fn equilibrium_density_squared(
        &self,
        temperature_e: f64,
        temperature_i: f64,
        radiation: &dyn RadiativeLoss,
    ) -> f64 {
        let radiative_loss = radiation.loss(temperature_e.log10());
        let (loss_correction, grav_correction) =
            self.c1_corrections(temperature_e, temperature_i, radiative_loss);

        (SPITZER_ELECTRON_CONDUCTIVITY + SPITZER_ION_CONDUCTIVITY)
            * (temperature_e / Self::c2()).powf(3.5)
            / (3.5
                * self.loop_length.powi(2)
                * C1_EQUILIBRIUM
                * loss_correction
                * grav_correction
                * radiative_loss)
    }

    /// Ratio of transition-region to coronal radiative losses
    ///
    /// The actual density is compared to the conduction/radiation equilibrium
    /// density through `r = n² / n_eqm²`:
    ///
    /// ```text
    /// r <  1:  c1 = (2·c1_eqm0 + c1_cond0·(1/r - 1)) / (1 + 1/r)
    /// r >= 1:  c1 = (2·c1_eqm0 + c1_rad0·(r - 1))   / (1 + r)
    /// ```
    ///
    /// Both branches equal `c1_eqm0` at `r = 1`. The result is multiplied by
    /// the enabled corrections.
    pub fn c1(
        &self,
        temperature_e: f64,
        temperature_i: f64,
        density: f64,
        radiation: &dyn RadiativeLoss,
    ) -> f64 {
        let radiative_loss = radiation.loss(temperature_e.log10());
        let (loss_correction, grav_correction) =
            self.c1_corrections(temperature_e, temperature_i, radiative_loss);

        let density_eqm_2 = self.equilibrium_density_squared(temperature_e, temperature_i, radiation);
        let density_ratio = density.powi(2) / density_eqm_2;

        self.uncorrected_c1(density_ratio) * loss_correction * grav_correction
    }

    /// C1 before corrections, from `r = n² / n_eqm²`
    ///
    /// `r = 1` belongs to the over-dense branch.
    fn uncorrected_c1(&self, density_ratio: f64) -> f64 {
        if density_ratio < 1.0 {
            (2.0 * C1_EQUILIBRIUM + self.c1_cond0 * (1.0 / density_ratio - 1.0))
                / (1.0 + 1.0 / density_ratio)
        } else {
            (2.0 * C1_EQUILIBRIUM + self.c1_rad0 * (density_ratio - 1.0)) / (1.0 + density_ratio)
        }
    }

    /// Ratio of average to apex temperature
    pub fn c2() -> f64 {
        0.9
    }

    /// Ratio of transition-region base temperature to average temperature
    pub fn c3() -> f64 {
        0.6
    }

    /// Pressure scale height \[cm\]
    pub fn scale_height(&self, temperature_e: f64, temperature_i: f64) -> f64 {
        BOLTZMANN_CONSTANT * (temperature_e + self.abundance.boltzmann_correction * temperature_i)
            / (self.abundance.ion_mass_correction * PROTON_MASS)
            / SOLAR_SURFACE_GRAVITY
    }
}

// =================================================================================================
// Tests
// =================================================================================================
