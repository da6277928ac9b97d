//! Adaptive Runge-Kutta 4 (RKA4) solver
//!
//! # Step doubling
//!
//! Each attempt takes one RK4 step of size τ ("big") and two RK4 steps of
//! size τ/2 ("small") from the same state. Their difference estimates the
//! local truncation error, scaled per component by the local magnitude:
//!
//! ```text
//! err_k = |small_k - big_k| / (ε · (|small_k| + |big_k|) / 2 + 1e-16)
//! err   = max_k err_k
//! τ'    = max(0.9 · τ · err^(-1/5), τ / 1.1)
//! ```
//!
//! With `err < 1` the small-step state is accepted and the next trial step
//! is `min(τ', 4τ)`. Otherwise the attempt is repeated with τ'. The step is
//! never allowed to shrink by more than a factor 1.1 per attempt nor grow by
//! more than a factor 4 per accepted step.
//!
//! After [`MAX_ATTEMPTS`] rejections the last small-step state is accepted
//! anyway, a warning is logged and the outcome is flagged as not converged.
//!
//! # Example
//!
//! ```rust
//! use coronal_rs::physics::{LoopState, PhysicalModel};
//! use coronal_rs::solver::{AdaptiveRK4Solver, Solver};
//!
//! struct Decay;
//! impl PhysicalModel for Decay {
//!     fn compute_physics(&self, state: &LoopState, _time: f64) -> LoopState {
//!         *state * -1.0
//!     }
//!     fn name(&self) -> &str { "Decay" }
//! }
//!
//! let solver = AdaptiveRK4Solver::new(1.0e-3);
//! let outcome = solver.step(&Decay, &LoopState::new(1.0, 1.0, 1.0), 0.0, 0.1);
//!
//! assert!(outcome.converged);
//! assert_eq!(outcome.tau_used, 0.1);
//! assert!(outcome.tau_next > outcome.tau_used);
//! ```

use log::{debug, warn};

use crate::physics::{LoopState, PhysicalModel};
use crate::solver::methods::rk4::RK4Solver;
use crate::solver::{Solver, StepOutcome};

/// Maximum number of attempts per step
pub const MAX_ATTEMPTS: usize = 100;

/// Shrink factor applied to the optimal step estimate
const SAFETY_SHRINK: f64 = 0.9;

/// Maximum reduction of the step per rejected attempt
const SAFETY_MAX_REDUCTION: f64 = 1.1;

/// Maximum growth of the step per accepted attempt
const SAFETY_MAX_GROWTH: f64 = 4.0;

/// Keeps the error ratio finite when both estimates vanish
const EPSILON: f64 = 1.0e-16;

// =================================================================================================
// Adaptive RK4 Solver
// =================================================================================================

/// Fourth-order Runge-Kutta with step-doubling error control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveRK4Solver {
    error_tolerance: f64,
}

impl AdaptiveRK4Solver {
    /// Create a solver with relative error tolerance `error_tolerance`
    pub fn new(error_tolerance: f64) -> Self {
        Self { error_tolerance }
    }

    /// Relative error tolerance
    pub fn error_tolerance(&self) -> f64 {
        self.error_tolerance
    }

    /// Largest scaled difference between the two estimates
    fn error_ratio(&self, small: &LoopState, big: &LoopState) -> f64 {
        small
            .iter()
            .zip(big.iter())
            .map(|(s, b)| {
                let scale = self.error_tolerance * (s.abs() + b.abs()) / 2.0;
                (s - b).abs() / (scale + EPSILON)
            })
            .fold(0.0, f64::max)
    }
}

impl Solver for AdaptiveRK4Solver {
    fn step(
        &self,
        model: &dyn PhysicalModel,
        state: &LoopState,
        time: f64,
        tau: f64,
    ) -> StepOutcome {
        let mut trial = tau;
        let mut small = *state;
        let mut proposed = tau;

        for attempt in 1..=MAX_ATTEMPTS {
            trial = proposed;
            let half_tau = trial / 2.0;

            let midpoint = RK4Solver::advance(model, state, time, half_tau);
            small = RK4Solver::advance(model, &midpoint, time + half_tau, half_tau);
            let big = RK4Solver::advance(model, state, time, trial);

            let error_ratio = self.error_ratio(&small, &big);
            proposed = (SAFETY_SHRINK * trial * error_ratio.powf(-0.2))
                .max(trial / SAFETY_MAX_REDUCTION);

            if error_ratio < 1.0 {
                return StepOutcome {
                    state: small,
                    tau_used: trial,
                    tau_next: proposed.min(SAFETY_MAX_GROWTH * trial),
                    converged: true,
                };
            }

            debug!(
                "RKA4 attempt {attempt} rejected at t = {time:.6e}: error ratio {error_ratio:.3e}, tau {trial:.3e} -> {proposed:.3e}"
            );
        }

        warn!(
            "RKA4 did not reach the error target after {MAX_ATTEMPTS} attempts at t = {time:.6e}; accepting tau = {trial:.3e}"
        );

        StepOutcome {
            state: small,
            tau_used: trial,
            tau_next: proposed.min(SAFETY_MAX_GROWTH * trial),
            converged: false,
        }
    }

    fn name(&self) -> &'static str {
        "Adaptive Runge-Kutta 4"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
