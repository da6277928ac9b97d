//! Loop driver
//!
//! Owns one run from configuration to output files:
//!
//! ```text
//! Loop::new(config)            Uninitialized
//!   .initialize_state()?       InitialConditionsSet   slot 0 at t = 0
//!   .evolve()?                 Evolving               slots 1.. until total_time
//!   .write_results()?          Finalized              TSV (+ DEM files)
//! ```
//!
//! Calling an operation out of this order is a [`LoopError::Lifecycle`].
//!
//! # Time stepping
//!
//! The loop starts at `time = tau` and calls the integrator with the current
//! trial step. Each new state is recorded at `time`, then `time` advances by
//! the step the integrator proposes next. For the fixed-step methods this is
//! the plain `tau, 2·tau, ...` sequence; with the adaptive method the number
//! of recorded steps differs from the pre-sized `N = ceil(total_time / tau)`
//! and the result buffers grow or are trimmed accordingly.
//!
//! # Example
//!
//! ```rust,no_run
//! use coronal_rs::config::LoopConfig;
//! use coronal_rs::solver::Loop;
//!
//! # fn main() -> coronal_rs::error::LoopResult<()> {
//! let mut run = Loop::new(LoopConfig::default())?;
//! run.initialize_state()?;
//! run.evolve()?;
//! run.write_results()?;
//! # Ok(())
//! # }
//! ```

use log::{info, warn};

use crate::config::{LoopConfig, LoopParameters};
use crate::dem::{DemAccumulator, TwoRegionDem};
use crate::error::{LoopError, LoopResult};
use crate::models::coronal_loop::{CoronalLoopModel, InitialConditions};
use crate::models::heating::HeatingSource;
use crate::models::radiation::RadiationModel;
use crate::output::export::{Exporter, TsvExporter};
use crate::physics::closure::Closure;
use crate::physics::traits::LoopState;
use crate::solver::methods;
use crate::solver::results::{LoopResults, LoopSample};
use crate::solver::{Solver, validate_state};

// =================================================================================================
// Lifecycle
// =================================================================================================

/// Stage of a [`Loop`] run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Constructed, no state yet
    Uninitialized,

    /// Equilibrium state recorded as step 0
    InitialConditionsSet,

    /// Time loop entered (finished or stopped by an error)
    Evolving,

    /// Results written
    Finalized,
}

impl std::fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoopPhase::Uninitialized => "uninitialized",
            LoopPhase::InitialConditionsSet => "initial conditions set",
            LoopPhase::Evolving => "evolving",
            LoopPhase::Finalized => "finalized",
        };
        write!(f, "{name}")
    }
}

// =================================================================================================
// Driver
// =================================================================================================

/// One coronal loop run
pub struct Loop {
    parameters: LoopParameters,
    model: CoronalLoopModel,
    solver: Box<dyn Solver>,
    results: LoopResults,
    dem: Option<TwoRegionDem>,
    state: LoopState,
    phase: LoopPhase,
    recorded: usize,
    excess: usize,
    unconverged_steps: usize,
}

impl Loop {
    /// Build a run from `config`, heated by `config.heating`
    pub fn new(config: LoopConfig) -> LoopResult<Self> {
        let heating = Box::new(config.heating.clone());
        Self::with_heating(config, heating)
    }

    /// Build a run from `config` with a caller-supplied heating source
    ///
    /// `config.heating` is still validated but otherwise ignored.
    pub fn with_heating(config: LoopConfig, heating: Box<dyn HeatingSource>) -> LoopResult<Self> {
        let parameters = LoopParameters::from_config(&config)?;

        let radiation = match (parameters.use_power_law_radiative_losses, config.radiation_table) {
            (true, _) => RadiationModel::PowerLaw,
            (false, Some(table)) => RadiationModel::Tabulated(table),
            (false, None) => {
                return Err(LoopError::Config(
                    "radiation_table is required when use_power_law_radiative_losses is false"
                        .to_string(),
                ));
            }
        };

        let slots = parameters.presized_slots();

        let dem = match (parameters.calculate_dem, &config.dem) {
            (true, Some(grid)) => Some(TwoRegionDem::new(
                grid,
                parameters.loop_length,
                &radiation,
                slots,
            )?),
            (true, None) => {
                return Err(LoopError::Config(
                    "dem grid is required when calculate_dem is true".to_string(),
                ));
            }
            (false, _) => None,
        };

        let solver = methods::for_type(parameters.solver, parameters.rka_error);
        let model = CoronalLoopModel::new(Closure::from_parameters(&parameters), radiation, heating);

        info!(
            "Loop created: L = {:.3e} cm, total_time = {} s, tau = {} s, solver = {}, radiation = {}, DEM = {}",
            parameters.loop_length,
            parameters.total_time,
            parameters.tau,
            solver.name(),
            model.radiation().name(),
            dem.is_some()
        );

        Ok(Self {
            results: LoopResults::with_slots(slots),
            parameters,
            model,
            solver,
            dem,
            state: LoopState::zeros(),
            phase: LoopPhase::Uninitialized,
            recorded: 0,
            excess: 0,
            unconverged_steps: 0,
        })
    }

    // ============================================ Accessors ============================================

    pub fn parameters(&self) -> &LoopParameters {
        &self.parameters
    }

    pub fn model(&self) -> &CoronalLoopModel {
        &self.model
    }

    pub fn results(&self) -> &LoopResults {
        &self.results
    }

    pub fn dem(&self) -> Option<&TwoRegionDem> {
        self.dem.as_ref()
    }

    /// Most recent state
    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Slots of the N = ceil(total_time / tau) estimate the run did not fill
    ///
    /// Zero until [`evolve`](Self::evolve) has run.
    pub fn excess(&self) -> usize {
        self.excess
    }

    /// Steps the adaptive integrator had to accept above its tolerance
    pub fn unconverged_steps(&self) -> usize {
        self.unconverged_steps
    }

    // ============================================ Lifecycle ============================================

    /// Compute the equilibrium state and record it as step 0
    pub fn initialize_state(&mut self) -> LoopResult<InitialConditions> {
        self.require_phase(LoopPhase::Uninitialized, "initialize_state")?;

        let initial = self.model.initial_conditions();
        validate_state(&initial.state, 0)?;

        info!(
            "Initial conditions: T = {:.4e} K, n = {:.4e} cm^-3 after {} iterations (converged: {})",
            initial.temperature,
            initial.state.density(),
            initial.iterations,
            initial.converged
        );

        self.state = initial.state;
        self.accumulate_dem(0)?;
        self.save_results(0, 0.0);
        self.phase = LoopPhase::InitialConditionsSet;

        Ok(initial)
    }

    /// Integrate from `tau` to `total_time`
    ///
    /// On failure the steps recorded so far are kept and can still be
    /// written.
    pub fn evolve(&mut self) -> LoopResult<()> {
        self.require_phase(LoopPhase::InitialConditionsSet, "evolve")?;
        self.phase = LoopPhase::Evolving;

        let outcome = self.run_time_loop();
        self.excess = self.parameters.step_capacity().saturating_sub(self.recorded);

        match &outcome {
            Ok(()) => info!(
                "Evolution finished: {} steps recorded, {} unused slots, {} unconverged steps",
                self.recorded, self.excess, self.unconverged_steps
            ),
            Err(e) => warn!("Evolution stopped after {} steps: {}", self.recorded, e),
        }

        outcome
    }

    /// Record the current state in slot `index` at `time`
    ///
    /// Overwrites the slot when it exists, appends otherwise.
    pub fn save_results(&mut self, index: usize, time: f64) {
        let sample = LoopSample::new(
            time,
            self.model.heating_rate(time),
            &self.state,
            self.model.temperatures(&self.state),
        );
        self.results.save(index, sample);
        self.recorded = self.recorded.max(index + 1);
    }

    /// Trim unused slots and write the TSV file, then the DEM files
    pub fn write_results(&mut self) -> LoopResult<()> {
        self.require_phase(LoopPhase::Evolving, "write_results")?;

        let unfilled = self.unfilled_slots();
        self.results.trim(unfilled);

        let path = &self.parameters.output_filename;
        TsvExporter::default().export(&self.results, None, path)?;
        info!("Wrote {} steps to {}", self.results.len(), path.display());

        if let Some(dem) = &self.dem {
            dem.write_output(path, unfilled)?;
            info!("Wrote DEM next to {}", path.display());
        }

        self.phase = LoopPhase::Finalized;
        Ok(())
    }

    // ============================================ Internals ============================================

    fn run_time_loop(&mut self) -> LoopResult<()> {
        let total_time = self.parameters.total_time;
        let mut tau = self.parameters.tau;
        let mut time = tau;
        let mut index = 1;

        while time < total_time {
            if let Some(limit) = self.parameters.max_steps
                && index > limit
            {
                return Err(LoopError::StepLimit { limit });
            }

            let outcome = self.solver.step(&self.model, &self.state, time, tau);
            validate_state(&outcome.state, index)?;

            if !outcome.converged {
                self.unconverged_steps += 1;
            }

            self.state = outcome.state;
            self.accumulate_dem(index)?;
            self.save_results(index, time);

            tau = outcome.tau_next;
            time += tau;
            index += 1;
        }

        Ok(())
    }

    /// Allocated slots past the last recorded step
    ///
    /// Equals [`excess`](Self::excess) unless N exceeded the preallocation cap.
    fn unfilled_slots(&self) -> usize {
        self.parameters.presized_slots().saturating_sub(self.recorded)
    }

    fn accumulate_dem(&mut self, step: usize) -> LoopResult<()> {
        if let Some(dem) = self.dem.as_mut() {
            let diagnostics = self.model.diagnostics(&self.state);
            dem.accumulate(
                step,
                self.state.pressure_e(),
                self.state.density(),
                diagnostics.flux_e,
                diagnostics.c1,
            )?;
        }
        Ok(())
    }

    fn require_phase(&self, expected: LoopPhase, operation: &str) -> LoopResult<()> {
        if self.phase != expected {
            return Err(LoopError::Lifecycle(format!(
                "{operation} requires phase '{expected}', loop is '{}'",
                self.phase
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Loop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loop")
            .field("phase", &self.phase)
            .field("solver", &self.solver.name())
            .field("model", &self.model)
            .field("recorded", &self.recorded)
            .field("excess", &self.excess)
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
