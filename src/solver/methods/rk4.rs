//! Runge-Kutta 4 (RK4) numerical solver
//!
//! # Mathematical Background
//!
//! The classical fourth-order Runge-Kutta method (RK4) uses a weighted
//! average of four slope estimates:
//!
//! ```text
//! k₁ = f(yₙ, tₙ)
//! k₂ = f(yₙ + dt/2 * k₁, tₙ + dt/2)
//! k₃ = f(yₙ + dt/2 * k₂, tₙ + dt/2)
//! k₄ = f(yₙ + dt * k₃, tₙ + dt)
//!
//! yₙ₊₁ = yₙ + dt/6 * (k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: Fourth-order accurate (global error ~ O(dt⁴))
//! - **Complexity**: 4 function evaluations per step
//! - **Memory**: O(1) - stores only k₁, k₂, k₃, k₄ intermediates
//!
//! # Comparison with Euler
//!
//! | Method | Order | Evals/Step | Error |
//! |--------|-------|------------|-------|
//! | Euler  | 1     | 1          | O(dt) |
//! | RK4    | 4     | 4          | O(dt⁴)|
//!
//! RK4 is also the building block of the adaptive
//! [`AdaptiveRK4Solver`](crate::solver::AdaptiveRK4Solver), which compares one
//! full step with two half steps.

use crate::physics::{LoopState, PhysicalModel};
use crate::solver::{Solver, StepOutcome};

// =================================================================================================
// RK4 Solver
// =================================================================================================

/// Classical fourth-order Runge-Kutta solver, fixed step
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Solver;

impl RK4Solver {
    /// Create a new RK4 solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use coronal_rs::solver::{RK4Solver, Solver};
    ///
    /// let solver = RK4Solver::new();
    /// assert_eq!(solver.name(), "Runge-Kutta 4");
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// One RK4 step of size `tau` from `time`
    pub fn advance(model: &dyn PhysicalModel, state: &LoopState, time: f64, tau: f64) -> LoopState {
        let half_tau = tau / 2.0;

        let k1 = model.compute_physics(state, time);
        let k2 = model.compute_physics(&(*state + k1 * half_tau), time + half_tau);
        let k3 = model.compute_physics(&(*state + k2 * half_tau), time + half_tau);
        let k4 = model.compute_physics(&(*state + k3 * tau), time + tau);

        let weighted_slope = k1 + k2 * 2.0 + k3 * 2.0 + k4;

        *state + weighted_slope * (tau / 6.0)
    }
}

impl Solver for RK4Solver {
    fn step(
        &self,
        model: &dyn PhysicalModel,
        state: &LoopState,
        time: f64,
        tau: f64,
    ) -> StepOutcome {
        StepOutcome::fixed(Self::advance(model, state, time, tau), tau)
    }

    fn name(&self) -> &'static str {
        "Runge-Kutta 4"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ====== Mock Models for Testing ======

    struct ExponentialDecay {
        decay_rate: f64,
    }

    impl PhysicalModel for ExponentialDecay {
        fn compute_physics(&self, state: &LoopState, _time: f64) -> LoopState {
            *state * (-self.decay_rate)
        }

        fn name(&self) -> &str {
            "Exponential Decay"
        }
    }

    /// dy/dt = 3t², solution y = t³ (RK4 integrates cubics exactly)
    struct CubicForcing;

    impl PhysicalModel for CubicForcing {
        fn compute_physics(&self, _state: &LoopState, time: f64) -> LoopState {
            let slope = 3.0 * time * time;
            LoopState::new(slope, slope, slope)
        }

        fn name(&self) -> &str {
            "Cubic Forcing"
        }
    }

    // ====== Solver Creation Tests ======

    #[test]
    fn test_rk4_solver_creation() {
        let solver = RK4Solver::new();
        assert_eq!(solver.name(), "Runge-Kutta 4");
    }

    #[test]
    fn test_rk4_solver_default() {
        let solver = RK4Solver::default();
        assert_eq!(solver.name(), "Runge-Kutta 4");
    }

    // ====== Accuracy Tests ======

    #[test]
    fn test_rk4_single_step() {
        let model = ExponentialDecay { decay_rate: 1.0 };
        let outcome = RK4Solver::new().step(&model, &LoopState::new(1.0, 1.0, 1.0), 0.0, 0.1);

        // Taylor series of exp(-0.1) truncated after the fourth-order term
        let h: f64 = 0.1;
        let expected = 1.0 - h + h.powi(2) / 2.0 - h.powi(3) / 6.0 + h.powi(4) / 24.0;

        assert_relative_eq!(outcome.state.density(), expected, max_relative = 1e-14);
        assert_eq!(outcome.tau_next, 0.1);
    }

    #[test]
    fn test_rk4_exact_on_cubic() {
        let result = RK4Solver::new()
            .integrate(&CubicForcing, LoopState::zeros(), 2.0, 0.25)
            .unwrap();

        assert_relative_eq!(result.final_state.pressure_e(), 8.0, max_relative = 1e-12);
    }

    #[test]
    fn test_rk4_exponential_decay() {
        let model = ExponentialDecay { decay_rate: 0.5 };
        let result = RK4Solver::new()
            .integrate(&model, LoopState::new(2.0, 2.0, 2.0), 4.0, 0.1)
            .unwrap();

        let analytical = 2.0 * (-2.0_f64).exp();
        assert_relative_eq!(result.final_state.pressure_i(), analytical, max_relative = 1e-6);
    }

    #[test]
    fn test_rk4_is_deterministic() {
        let model = ExponentialDecay { decay_rate: 0.7 };
        let state = LoopState::new(3.0, 2.0, 1.0);

        let first = RK4Solver::new().step(&model, &state, 1.0, 0.2);
        let second = RK4Solver::new().step(&model, &state, 1.0, 0.2);

        assert_eq!(first, second);
    }

    #[test]
    fn test_rk4_more_accurate_than_euler() {
        use crate::solver::EulerSolver;

        let model = ExponentialDecay { decay_rate: 1.0 };
        let initial = LoopState::new(1.0, 1.0, 1.0);
        let analytical = (-1.0_f64).exp();

        let rk4 = RK4Solver::new().integrate(&model, initial, 1.0, 0.1).unwrap();
        let euler = EulerSolver::new().integrate(&model, initial, 1.0, 0.1).unwrap();

        let rk4_error = (rk4.final_state.density() - analytical).abs();
        let euler_error = (euler.final_state.density() - analytical).abs();
        assert!(rk4_error < euler_error / 1000.0);
    }
}
