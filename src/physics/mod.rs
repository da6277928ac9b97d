//! Loop physics
//!
//! This module holds the state representation, the model interface and the
//! closure relations of the zero-dimensional loop.
//!
//! # Core Concepts
//!
//! - **Loop State**: electron pressure, ion pressure and density
//! - **Physical Model**: computes dy/dt = f(y, t) at a given state and time
//! - **Closure**: conduction flux, collision frequency, C1/C2/C3, scale height
//!
//! # Architecture
//!
//! Physical models are **separate from numerical solvers**:
//! - The model provides the **equations** (physics)
//! - The solver provides the **method** to solve them (numerics)
//!
//! # Implementing a New Physical Model
//!
//! ```rust
//! use coronal_rs::physics::{LoopState, PhysicalModel};
//!
//! /// Every component decays at the same rate
//! struct Relaxation {
//!     rate: f64,
//! }
//!
//! impl PhysicalModel for Relaxation {
//!     fn compute_physics(&self, state: &LoopState, _time: f64) -> LoopState {
//!         *state * (-self.rate)
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Relaxation"
//!     }
//! }
//!
//! let model = Relaxation { rate: 0.5 };
//! let derivative = model.compute_physics(&LoopState::new(2.0, 2.0, 2.0), 0.0);
//! assert_eq!(derivative.density(), -1.0);
//! ```

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod closure;
pub mod constants;
pub mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use closure::{AbundanceCorrection, Closure, SpeciesCoefficients};
pub use traits::{LoopState, PhysicalModel, Species};
