//! Two-fluid zero-dimensional coronal loop
//!
//! Right-hand side of the coupled equations for electron pressure, ion
//! pressure and density, averaged over the coronal part of a loop of
//! half-length L:
//!
//! ```text
//! ξ    = p_e / p_i
//! ψ_c  = L / (γ-1) · ν · (p_i - p_e)
//! R_c  = n² · Λ(T_e) · L
//! ψ_tr = (f_e + c1·R_c - ξ·f_i) / (1 + ξ)
//!
//! dp_e/dt =  (γ-1)/L · (ψ_tr + ψ_c - R_c·(1 + c1)) + (γ-1) · Q(t) · partition
//! dp_i/dt = -(γ-1)/L · (ψ_tr + ψ_c)                + (γ-1) · Q(t) · (1 - partition)
//! dn/dt   = c2·(γ-1) / (c3·L·γ·k_B·T_e) · (-f_e - c1·R_c + ψ_tr)
//! ```
//!
//! The closure quantities (f_e, f_i, ν, c1, c2, c3) come from
//! [`Closure`](crate::physics::Closure); Λ from the radiation model; Q from the
//! heating source.
//!
//! # Example
//!
//! ```rust
//! use coronal_rs::models::{CoronalLoopModel, Heater, RadiationModel};
//! use coronal_rs::physics::{AbundanceCorrection, Closure, LoopState, PhysicalModel};
//!
//! let closure = Closure {
//!     loop_length: 1.0e9,
//!     saturation_limit: 1.0 / 6.0,
//!     c1_cond0: 6.0,
//!     c1_rad0: 0.6,
//!     use_c1_loss_correction: false,
//!     use_c1_grav_correction: false,
//!     use_spitzer_conductivity: true,
//!     abundance: AbundanceCorrection::from_helium_ratio(0.0),
//! };
//! let model = CoronalLoopModel::new(
//!     closure,
//!     RadiationModel::PowerLaw,
//!     Box::new(Heater::new(1.0e-3, 0.5)),
//! );
//!
//! let state = LoopState::new(0.2, 0.2, 1.0e9);
//! let derivative = model.compute_physics(&state, 0.0);
//! assert!(derivative.is_finite());
//! ```

use log::warn;

use crate::models::heating::HeatingSource;
use crate::models::radiation::{RadiationModel, RadiativeLoss};
use crate::physics::closure::Closure;
use crate::physics::constants::{
    BOLTZMANN_CONSTANT, GAMMA, GAMMA_MINUS_ONE, SPITZER_ELECTRON_CONDUCTIVITY,
    SPITZER_ION_CONDUCTIVITY,
};
use crate::physics::traits::{LoopState, PhysicalModel, Species};

/// Maximum number of fixed-point iterations for the initial conditions
pub const MAX_INITIAL_ITERATIONS: usize = 100;

/// Relative tolerance on temperature and density for the initial conditions
pub const INITIAL_TOLERANCE: f64 = 1.0e-2;

// =================================================================================================
// Diagnostics
// =================================================================================================

/// Closure quantities evaluated at one state
///
/// Everything the right-hand side computes on the way to the derivatives.
/// Also consumed by the DEM accumulator, which needs f_e and c1 of each new
/// state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopDiagnostics {
    /// Electron temperature \[K\]
    pub temperature_e: f64,

    /// Ion temperature \[K\]
    pub temperature_i: f64,

    /// Electron heat flux \[erg/(cm²·s)\]
    pub flux_e: f64,

    /// Ion heat flux \[erg/(cm²·s)\]
    pub flux_i: f64,

    /// Radiative loss function Λ(T_e) \[erg·cm³/s\]
    pub radiative_loss: f64,

    /// Transition-region to coronal radiative loss ratio
    pub c1: f64,

    /// Electron-ion collision frequency \[s⁻¹\]
    pub collision_frequency: f64,
}

/// Result of the initial-conditions fixed point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialConditions {
    /// Equilibrium state at t = 0
    pub state: LoopState,

    /// Common electron and ion temperature \[K\]
    pub temperature: f64,

    /// Iterations performed
    pub iterations: usize,

    /// Whether both T and n met the relative tolerance
    pub converged: bool,
}

// =================================================================================================
// Model
// =================================================================================================

/// Two-fluid coronal loop model
///
/// Radiation is a closed enum selected once; heating is any
/// [`HeatingSource`].
pub struct CoronalLoopModel {
    closure: Closure,
    radiation: RadiationModel,
    heating: Box<dyn HeatingSource>,
}

impl CoronalLoopModel {
    /// Assemble the model from its closure and collaborators
    pub fn new(closure: Closure, radiation: RadiationModel, heating: Box<dyn HeatingSource>) -> Self {
        Self {
            closure,
            radiation,
            heating,
        }
    }

    /// Closure parameters
    pub fn closure(&self) -> &Closure {
        &self.closure
    }

    /// Radiative loss model
    pub fn radiation(&self) -> &RadiationModel {
        &self.radiation
    }

    /// Heating rate Q(t) \[erg/(cm³·s)\]
    pub fn heating_rate(&self, time: f64) -> f64 {
        self.heating.heating_rate(time)
    }

    /// Electron and ion temperatures of a state
    ///
    /// `T_e = p_e / (k_B n)` and `T_i = p_i / (k_B · boltzmann_correction · n)`.
    pub fn temperatures(&self, state: &LoopState) -> (f64, f64) {
        let density = state.density();
        let temperature_e = state.pressure_e() / (BOLTZMANN_CONSTANT * density);
        let temperature_i = state.pressure_i()
            / (BOLTZMANN_CONSTANT * self.closure.abundance.boltzmann_correction * density);
        (temperature_e, temperature_i)
    }

    /// Evaluate all closure quantities at `state`
    pub fn diagnostics(&self, state: &LoopState) -> LoopDiagnostics {
        let density = state.density();
        let (temperature_e, temperature_i) = self.temperatures(state);

        LoopDiagnostics {
            temperature_e,
            temperature_i,
            flux_e: self.closure.thermal_conduction(temperature_e, density, Species::Electron),
            flux_i: self.closure.thermal_conduction(temperature_i, density, Species::Ion),
            radiative_loss: self.radiation.loss(temperature_e.log10()),
            c1: self.closure.c1(temperature_e, temperature_i, density, &self.radiation),
            collision_frequency: self.closure.collision_frequency(temperature_e, density),
        }
    }

    /// Hydrostatic equilibrium consistent with the heating at t = 0
    ///
    /// Fixed-point iteration on the scaling laws
    ///
    /// ```text
    /// T = c2 · (3.5 · c1/(1 + c1) · L² · Q / (κ_e + κ_i))^(2/7)
    /// n = sqrt(Q / (Λ(T) · (1 + c1)))
    /// ```
    ///
    /// starting from `c1 = 2` and re-evaluating c1 from the previous iterate.
    /// Stops when both T and n change by less than [`INITIAL_TOLERANCE`]
    /// (relative) or after [`MAX_INITIAL_ITERATIONS`]. Electrons and ions
    /// start at the same temperature.
    pub fn initial_conditions(&self) -> InitialConditions {
        let heat = self.heating.heating_rate(0.0);
        let loop_length = self.closure.loop_length;
        let conductivity = SPITZER_ELECTRON_CONDUCTIVITY + SPITZER_ION_CONDUCTIVITY;

        let mut temperature = 0.0;
        let mut density = 0.0;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < MAX_INITIAL_ITERATIONS {
            let c1 = if iterations == 0 {
                2.0
            } else {
                self.closure.c1(temperature, temperature, density, &self.radiation)
            };

            let temperature_old = temperature;
            let density_old = density;

            temperature = Closure::c2()
                * (3.5 * c1 / (1.0 + c1) * loop_length.powi(2) * heat / conductivity)
                    .powf(2.0 / 7.0);
            density = (heat / (self.radiation.loss(temperature.log10()) * (1.0 + c1))).sqrt();

            iterations += 1;

            let temperature_change = ((temperature - temperature_old) / temperature).abs();
            let density_change = ((density - density_old) / density).abs();
            if temperature_change < INITIAL_TOLERANCE && density_change < INITIAL_TOLERANCE {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                "Initial conditions did not converge after {} iterations (T = {:.4e} K, n = {:.4e} cm^-3)",
                iterations, temperature, density
            );
        }

        let pressure = BOLTZMANN_CONSTANT * density * temperature;
        let state = LoopState::new(
            pressure,
            self.closure.abundance.boltzmann_correction * pressure,
            density,
        );

        InitialConditions {
            state,
            temperature,
            iterations,
            converged,
        }
    }
}

impl std::fmt::Debug for CoronalLoopModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoronalLoopModel")
            .field("closure", &self.closure)
            .field("radiation", &self.radiation.name())
            .field("partition", &self.heating.partition())
            .finish()
    }
}

impl PhysicalModel for CoronalLoopModel {
    fn compute_physics(&self, state: &LoopState, time: f64) -> LoopState {
        let pressure_e = state.pressure_e();
        let pressure_i = state.pressure_i();
        let density = state.density();
        let loop_length = self.closure.loop_length;

        let diagnostics = self.diagnostics(state);
        let heat = self.heating.heating_rate(time);
        let partition = self.heating.partition();
        let c1 = diagnostics.c1;

        let xi = pressure_e / pressure_i;
        let psi_c = loop_length / GAMMA_MINUS_ONE
            * diagnostics.collision_frequency
            * (pressure_i - pressure_e);
        let radiation_corona = density.powi(2) * diagnostics.radiative_loss * loop_length;
        let psi_tr =
            (diagnostics.flux_e + c1 * radiation_corona - xi * diagnostics.flux_i) / (1.0 + xi);

        let dpe_dt = GAMMA_MINUS_ONE / loop_length
            * (psi_tr + psi_c - radiation_corona * (1.0 + c1))
            + GAMMA_MINUS_ONE * heat * partition;
        let dpi_dt = -GAMMA_MINUS_ONE / loop_length * (psi_tr + psi_c)
            + GAMMA_MINUS_ONE * heat * (1.0 - partition);
        let dn_dt = Closure::c2() * GAMMA_MINUS_ONE
            / (Closure::c3() * loop_length * GAMMA * BOLTZMANN_CONSTANT * diagnostics.temperature_e)
            * (-diagnostics.flux_e - c1 * radiation_corona + psi_tr);

        LoopState::new(dpe_dt, dpi_dt, dn_dt)
    }

    fn name(&self) -> &str {
        "Two-fluid coronal loop"
    }

    fn description(&self) -> Option<&str> {
        Some("Zero-dimensional electron/ion pressure and density evolution")
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::heating::{CustomHeating, Heater};
    use crate::physics::closure::AbundanceCorrection;
    use approx::assert_relative_eq;

    fn closure(helium_ratio: f64) -> Closure {
        Closure {
            loop_length: 1.0e9,
            saturation_limit: 1.0 / 6.0,
            c1_cond0: 6.0,
            c1_rad0: 0.6,
            use_c1_loss_correction: false,
            use_c1_grav_correction: false,
            use_spitzer_conductivity: true,
            abundance: AbundanceCorrection::from_helium_ratio(helium_ratio),
        }
    }

    fn model(background: f64, partition: f64) -> CoronalLoopModel {
        CoronalLoopModel::new(
            closure(0.075),
            RadiationModel::PowerLaw,
            Box::new(Heater::new(background, partition)),
        )
    }

    #[test]
    fn test_temperatures() {
        let model = CoronalLoopModel::new(
            closure(0.0),
            RadiationModel::PowerLaw,
            Box::new(Heater::new(0.0, 1.0)),
        );
        let density = 1.0e9;
        let pressure = BOLTZMANN_CONSTANT * density * 2.0e6;

        let (temperature_e, temperature_i) =
            model.temperatures(&LoopState::new(pressure, pressure, density));

        assert_relative_eq!(temperature_e, 2.0e6, max_relative = 1e-12);
        assert_relative_eq!(temperature_i, 2.0e6, max_relative = 1e-12);
    }

    #[test]
    fn test_derivatives_finite_for_physical_states() {
        let model = model(1.0e-3, 0.5);

        for &temperature in &[5.0e5, 1.0e6, 5.0e6, 2.0e7] {
            for &density in &[1.0e8, 1.0e9, 1.0e10, 1.0e11] {
                let pressure = BOLTZMANN_CONSTANT * density * temperature;
                let state = LoopState::new(pressure, 0.9 * pressure, density);
                let derivative = model.compute_physics(&state, 0.0);
                assert!(
                    derivative.is_finite(),
                    "non-finite derivative at T = {temperature}, n = {density}"
                );
            }
        }
    }

    #[test]
    fn test_total_energy_balance() {
        // Conduction and collisions only move energy between species and
        // regions; the summed pressure derivative sees heating and radiation only
        let model = model(2.0e-3, 0.3);
        let state = LoopState::new(0.3, 0.25, 1.5e9);
        let diagnostics = model.diagnostics(&state);
        let loop_length = model.closure().loop_length;

        let derivative = model.compute_physics(&state, 0.0);
        let radiation_corona = state.density().powi(2) * diagnostics.radiative_loss * loop_length;
        let expected = -GAMMA_MINUS_ONE / loop_length * radiation_corona * (1.0 + diagnostics.c1)
            + GAMMA_MINUS_ONE * 2.0e-3;

        assert_relative_eq!(
            derivative.pressure_e() + derivative.pressure_i(),
            expected,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_heating_partition() {
        let state = LoopState::new(0.2, 0.2, 1.0e9);
        let electrons = model(1.0, 1.0).compute_physics(&state, 0.0);
        let ions = model(1.0, 0.0).compute_physics(&state, 0.0);

        assert_relative_eq!(
            electrons.pressure_e() - ions.pressure_e(),
            GAMMA_MINUS_ONE,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            ions.pressure_i() - electrons.pressure_i(),
            GAMMA_MINUS_ONE,
            max_relative = 1e-9
        );
        assert_eq!(electrons.density(), ions.density());
    }

    #[test]
    fn test_time_dependent_heating_enters_rhs() {
        let model = CoronalLoopModel::new(
            closure(0.075),
            RadiationModel::PowerLaw,
            Box::new(CustomHeating::new(1.0, |t| if t < 10.0 { 0.0 } else { 1.0 })),
        );
        let state = LoopState::new(0.2, 0.2, 1.0e9);

        let before = model.compute_physics(&state, 0.0);
        let after = model.compute_physics(&state, 20.0);

        assert_relative_eq!(after.pressure_e() - before.pressure_e(), GAMMA_MINUS_ONE, max_relative = 1e-9);
    }

    #[test]
    fn test_collisions_drive_temperature_equilibration() {
        // Hot electrons, cold ions, no heating: ion pressure must rise
        let model = model(0.0, 1.0);
        let density = 1.0e10;
        let state = LoopState::new(
            BOLTZMANN_CONSTANT * density * 5.0e6,
            BOLTZMANN_CONSTANT * density * 1.0e5,
            density,
        );

        let derivative = model.compute_physics(&state, 0.0);
        assert!(derivative.pressure_i() > 0.0);
    }

    #[test]
    fn test_initial_conditions_converge() {
        let model = model(1.0e-3, 0.5);
        let initial = model.initial_conditions();

        assert!(initial.converged);
        assert!(initial.iterations <= MAX_INITIAL_ITERATIONS);
        assert!(initial.temperature > 5.0e5 && initial.temperature < 5.0e6);
        assert!(initial.state.density() > 1.0e8 && initial.state.density() < 1.0e11);

        let (temperature_e, temperature_i) = model.temperatures(&initial.state);
        assert_relative_eq!(temperature_e, initial.temperature, max_relative = 1e-12);
        assert_relative_eq!(temperature_i, initial.temperature, max_relative = 1e-12);
    }

    #[test]
    fn test_initial_conditions_scale_with_heating() {
        let weak = model(1.0e-4, 0.5).initial_conditions();
        let strong = model(1.0e-2, 0.5).initial_conditions();

        assert!(strong.temperature > weak.temperature);
        assert!(strong.state.density() > weak.state.density());
    }
}
