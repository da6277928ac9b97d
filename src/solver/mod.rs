//! Numerical solvers and the loop driver
//!
//! # The Architecture (WHAT vs HOW)
//!
//! 1. **Model** (`PhysicalModel`) - WHAT to solve
//!    - dp_e/dt, dp_i/dt, dn/dt from the closure relations
//!
//! 2. **Solver** (`Solver` trait) - HOW to advance it
//!    - Euler, RK4 or adaptive RK4
//!    - Independent of physics
//!
//! 3. **Driver** (`Loop`) - WHEN and WHAT to record
//!    - Initial conditions, time loop, result buffers, DEM, output
//!
//! # Module Organization
//!
//! - **`traits`**: `Solver`, `SolverType`, `StepOutcome`, `SimulationResult`
//! - **`methods`**: the three integrators
//! - **`results`**: the seven result buffers of a run
//! - **`evolution`**: the `Loop` driver and its lifecycle
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │   LoopConfig    │  (JSON)
//! └────────┬────────┘
//!          │ validate
//! ┌────────▼────────┐
//! │      Loop       │ ← initialize_state()
//! └────────┬────────┘
//!          │ evolve()
//! ┌────────▼────────┐      ┌─────────────────┐
//! │     Solver      │ ───► │ CoronalLoopModel│
//! │ (Euler, RK4...) │      │  (RHS, closure) │
//! └────────┬────────┘      └─────────────────┘
//!          │
//! ┌────────▼────────┐
//! │   LoopResults   │ ← write_results()
//! │   (+ DEM)       │
//! └─────────────────┘
//! ```

// =================================================================================================
// Module Declarations
// =================================================================================================

mod evolution;
pub mod methods;
mod results;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{SimulationResult, Solver, SolverType, StepOutcome};

pub use methods::{AdaptiveRK4Solver, EulerSolver, RK4Solver};

pub use evolution::{Loop, LoopPhase};
pub use results::{LoopResults, LoopSample};

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::error::{LoopError, LoopResult};
use crate::physics::LoopState;

/// Validate a loop state for numerical issues
///
/// Checks that the state does not contain NaN or Inf values, which would
/// indicate numerical instability or a state that left the physical domain
/// (zero density or ion pressure).
///
/// # Arguments
///
/// * `state` - Loop state to validate
/// * `step` - Current time step (for error reporting)
pub(crate) fn validate_state(state: &LoopState, step: usize) -> LoopResult<()> {
    const NAMES: [&str; 3] = ["electron pressure", "ion pressure", "density"];

    for (name, value) in NAMES.iter().zip(state.iter()) {
        if value.is_nan() {
            return Err(LoopError::Numerical(format!(
                "NaN detected in {name} at step {step}. Try reducing the time step \
                 or switching to the adaptive solver."
            )));
        }
        if value.is_infinite() {
            return Err(LoopError::Numerical(format!(
                "Infinity detected in {name} at step {step}. Try reducing the time step."
            )));
        }
    }

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_finite_state() {
        assert!(validate_state(&LoopState::new(0.1, 0.1, 1.0e9), 1).is_ok());
    }

    #[test]
    fn test_validate_detects_nan() {
        let error = validate_state(&LoopState::new(0.1, f64::NAN, 1.0e9), 7).unwrap_err();
        let message = error.to_string();

        assert!(matches!(error, LoopError::Numerical(_)));
        assert!(message.contains("ion pressure"));
        assert!(message.contains("step 7"));
    }

    #[test]
    fn test_validate_detects_inf() {
        let error = validate_state(&LoopState::new(0.1, 0.1, f64::INFINITY), 3).unwrap_err();
        assert!(error.to_string().contains("Infinity detected in density"));
    }
}
