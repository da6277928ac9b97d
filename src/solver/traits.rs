//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! - `SolverType` names the integrator; it is resolved once, when the
//!   configuration is loaded, so an unknown name never reaches the time loop
//! - `Solver` advances a state by one step and reports what step it took
//! - `StepOutcome` carries the new state together with the step size used and
//!   the step size proposed for the next call
//! - `SimulationResult` is the trajectory produced by [`Solver::integrate`]

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::MAX_PRESIZED_SLOTS;
use crate::error::{LoopError, LoopResult};
use crate::physics::{LoopState, PhysicalModel};
use crate::solver::validate_state;

// =================================================================================================
// Solver Type Enumeration
// =================================================================================================

/// Time integrator selected by the configuration
///
/// Serialized as lowercase names: `"euler"`, `"rk4"`, `"rka4"`.
///
/// # Examples
///
/// ```rust
/// use coronal_rs::solver::SolverType;
///
/// let solver: SolverType = "rka4".parse().unwrap();
/// assert_eq!(solver, SolverType::Rka4);
/// assert!("leapfrog".parse::<SolverType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverType {
    /// Forward Euler, fixed step
    Euler,

    /// Classical fourth-order Runge-Kutta, fixed step
    Rk4,

    /// Fourth-order Runge-Kutta with step doubling error control
    Rka4,
}

impl SolverType {
    /// Configuration name identifier
    pub fn name(&self) -> &'static str {
        match self {
            SolverType::Euler => "euler",
            SolverType::Rk4 => "rk4",
            SolverType::Rka4 => "rka4",
        }
    }

    /// Whether the integrator changes the step size on its own
    pub fn is_adaptive(&self) -> bool {
        matches!(self, SolverType::Rka4)
    }
}

impl std::fmt::Display for SolverType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SolverType {
    type Err = LoopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euler" => Ok(SolverType::Euler),
            "rk4" => Ok(SolverType::Rk4),
            "rka4" => Ok(SolverType::Rka4),
            other => Err(LoopError::Config(format!(
                "unknown solver '{other}', expected one of: euler, rk4, rka4"
            ))),
        }
    }
}

// =================================================================================================
// Step outcome
// =================================================================================================

/// Result of a single integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// State at `time + tau_used`
    pub state: LoopState,

    /// Step size actually taken \[s\]
    pub tau_used: f64,

    /// Step size proposed for the next call \[s\]; equals `tau_used` for
    /// fixed-step methods
    pub tau_next: f64,

    /// False when an adaptive method gave up on its error target and
    /// accepted the step anyway
    pub converged: bool,
}

impl StepOutcome {
    /// Outcome of a fixed-step method
    pub fn fixed(state: LoopState, tau: f64) -> Self {
        Self {
            state,
            tau_used: tau,
            tau_next: tau,
            converged: true,
        }
    }
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Trajectory produced by [`Solver::integrate`]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Time of every stored state, starting at 0
    pub time_points: Vec<f64>,

    /// Stored states, `trajectory[k]` at `time_points[k]`
    pub trajectory: Vec<LoopState>,

    /// Last state of the trajectory
    pub final_state: LoopState,

    /// Steps the adaptive method had to force-accept
    pub unconverged_steps: usize,
}

impl SimulationResult {
    /// Number of stored states (initial state included)
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    /// True when nothing was stored
    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Interface shared by the time integrators
///
/// # Responsibility
///
/// Advances dy/dt = f(y, t) by one step. Does NOT decide how many steps to
/// take or what to record (that's the driver's job).
pub trait Solver {
    /// Advance `state` from `time` by (at most) `tau`
    fn step(
        &self,
        model: &dyn PhysicalModel,
        state: &LoopState,
        time: f64,
        tau: f64,
    ) -> StepOutcome;

    /// Solver name (for display and logging)
    fn name(&self) -> &'static str;

    /// Integrate from t = 0 to exactly `total_time`
    ///
    /// Uses the step size each step proposes, shortening the last one so the
    /// trajectory ends on `total_time`. Stops with
    /// [`LoopError::Numerical`] on the first non-finite state.
    fn integrate(
        &self,
        model: &dyn PhysicalModel,
        initial: LoopState,
        total_time: f64,
        tau: f64,
    ) -> LoopResult<SimulationResult> {
        if !(total_time > 0.0 && tau > 0.0) {
            return Err(LoopError::Config(format!(
                "total_time and tau must be > 0, got {total_time} and {tau}"
            )));
        }

        // For adaptive steps the ratio is only an estimate; the vectors grow as needed
        let capacity = ((total_time / tau).ceil() as usize)
            .saturating_add(1)
            .min(MAX_PRESIZED_SLOTS);
        let mut time_points = Vec::with_capacity(capacity);
        let mut trajectory = Vec::with_capacity(capacity);
        time_points.push(0.0);
        trajectory.push(initial);

        let mut state = initial;
        let mut time = 0.0;
        let mut trial = tau;
        let mut unconverged_steps = 0;
        let mut step = 0;

        while time < total_time {
            let remaining = total_time - time;
            let outcome = self.step(model, &state, time, trial.min(remaining));

            step += 1;
            state = outcome.state;
            validate_state(&state, step)?;

            if !outcome.converged {
                unconverged_steps += 1;
            }

            // Land exactly on the end time to avoid a sliver step
            time = if outcome.tau_used >= remaining {
                total_time
            } else {
                time + outcome.tau_used
            };
            trial = outcome.tau_next;

            time_points.push(time);
            trajectory.push(state);
        }

        Ok(SimulationResult {
            time_points,
            trajectory,
            final_state: state,
            unconverged_steps,
        })
    }
}

// =================================================================================================
// Tests
// =================================================================================================
