//! Forward Euler numerical solver
//!
//! # Mathematical Background
//!
//! The Forward Euler method is the simplest explicit time-stepping scheme
//! for solving ordinary differential equations (ODEs):
//!
//! ```text
//! dy/dt = f(y, t)
//! ```
//!
//! The scheme approximates the solution at time t_{n+1} = t_n + dt using:
//!
//! ```text
//! y_{n+1} = y_n + dt * f(y_n, t_n)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: First-order accurate (error ~ O(dt))
//! - **Stability**: Conditionally stable (requires small time steps)
//! - **Complexity**: 1 function evaluation per step
//! - **Memory**: O(1) - only stores current state
//!
//! # When to Use
//!
//! - Quick exploratory runs and cross-checks of the other integrators
//! - Slowly evolving loops where accuracy requirements are relaxed
//!
//! # When NOT to Use
//!
//! - Impulsive heating: the conduction timescale collapses during the event
//!   and the step must shrink with it → use RKA4
//!
//! # Example
//!
//! ```rust
//! use coronal_rs::physics::{LoopState, PhysicalModel};
//! use coronal_rs::solver::{EulerSolver, Solver};
//!
//! struct Growth;
//! impl PhysicalModel for Growth {
//!     fn compute_physics(&self, _state: &LoopState, _time: f64) -> LoopState {
//!         LoopState::new(1.0, 2.0, 3.0)
//!     }
//!     fn name(&self) -> &str { "Growth" }
//! }
//!
//! let outcome = EulerSolver::new().step(&Growth, &LoopState::zeros(), 0.0, 0.5);
//! assert_eq!(outcome.state, LoopState::new(0.5, 1.0, 1.5));
//! ```

use crate::physics::{LoopState, PhysicalModel};
use crate::solver::{Solver, StepOutcome};

// =================================================================================================
// Forward Euler Solver
// =================================================================================================

/// Forward Euler time-stepping solver
///
/// # Stability
///
/// The method is **conditionally stable**. For linear problems dy/dt = λy,
/// the stability condition is:
///
/// ```text
/// |1 + λ * dt| ≤ 1
/// ```
///
/// # Error Analysis
///
/// - **Local truncation error**: O(dt²) per step
/// - **Global error**: O(dt) after T/dt steps
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerSolver;

impl EulerSolver {
    /// Create a new Forward Euler solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use coronal_rs::solver::{EulerSolver, Solver};
    ///
    /// let solver = EulerSolver::new();
    /// assert_eq!(solver.name(), "Forward Euler");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Solver for EulerSolver {
    fn step(
        &self,
        model: &dyn PhysicalModel,
        state: &LoopState,
        time: f64,
        tau: f64,
    ) -> StepOutcome {
        let physics = model.compute_physics(state, time);
        StepOutcome::fixed(*state + physics * tau, tau)
    }

    fn name(&self) -> &'static str {
        "Forward Euler"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
