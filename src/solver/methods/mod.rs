//! Numerical methods for advancing the loop state
//!
//! This module contains concrete implementations of the [`Solver`](crate::solver::Solver) trait.
//!
//! # Available Methods
//!
//! - **[`EulerSolver`]**: Forward Euler method
//!   - Order: First-order O(dt)
//!   - Cost: 1 function evaluation per step
//!
//! - **[`RK4Solver`]**: Classical fourth-order Runge-Kutta
//!   - Order: Fourth-order O(dt⁴)
//!   - Cost: 4 function evaluations per step
//!
//! - **[`AdaptiveRK4Solver`]**: RK4 with step-doubling error control
//!   - Cost: 12 function evaluations per attempt (one full step, two half steps)
//!   - Use: impulsive heating, where the conduction timescale varies by orders
//!     of magnitude over a run
//!
//! # Example
//!
//! ```rust
//! use coronal_rs::solver::{methods, Solver, SolverType};
//!
//! let solver = methods::for_type(SolverType::Rka4, 1.0e-6);
//! assert_eq!(solver.name(), "Adaptive Runge-Kutta 4");
//! ```

mod euler;
mod rk4;
mod rka4;

pub use euler::EulerSolver;
pub use rk4::RK4Solver;
pub use rka4::{AdaptiveRK4Solver, MAX_ATTEMPTS};

use crate::solver::{Solver, SolverType};

/// Build the integrator named by `solver_type`
///
/// `error_tolerance` is only used by the adaptive method.
pub fn for_type(solver_type: SolverType, error_tolerance: f64) -> Box<dyn Solver> {
    match solver_type {
        SolverType::Euler => Box::new(EulerSolver::new()),
        SolverType::Rk4 => Box::new(RK4Solver::new()),
        SolverType::Rka4 => Box::new(AdaptiveRK4Solver::new(error_tolerance)),
    }
}
