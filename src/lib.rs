//! coronal-rs: zero-dimensional two-fluid coronal loop simulation
//!
//! Time evolution of the spatially averaged electron pressure, ion pressure
//! and density of a heated coronal loop. Electrons and ions are heated
//! separately, exchange energy through collisions and lose it through thermal
//! conduction into the transition region and optically thin radiation.
//!
//! # Architecture
//!
//! coronal-rs keeps the same split as any ODE code:
//!
//! 1. **Physics** (what to solve)
//!    - [`physics::Closure`]: conduction, collisions, C1/C2/C3
//!    - [`models::CoronalLoopModel`]: right-hand side d(p_e, p_i, n)/dt
//!
//! 2. **Numerics** (how to solve it)
//!    - [`solver::Solver`]: Euler, RK4, adaptive RK4
//!    - [`solver::Loop`]: initial conditions, time loop, recording, output
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use coronal_rs::prelude::*;
//!
//! # fn main() -> LoopResult<()> {
//! let config = LoopConfig {
//!     total_time: 2000.0,
//!     tau: 1.0,
//!     loop_length: 1.0e9,
//!     heating: Heater::new(1.0e-6, 1.0).with_event(HeatingEvent::triangle(0.0, 200.0, 0.1)),
//!     ..LoopConfig::default()
//! };
//!
//! let mut run = Loop::new(config)?;
//! let initial = run.initialize_state()?;
//! run.evolve()?;
//! run.write_results()?;
//!
//! println!("Started at T = {:.3e} K", initial.temperature);
//! println!("Recorded {} steps", run.results().len());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: JSON run configuration and validated parameters
//! - [`physics`]: state vector, constants, closure relations
//! - [`models`]: loop right-hand side, heating, radiative losses
//! - [`solver`]: integrators and the loop driver
//! - [`dem`]: differential emission measure reconstruction
//! - [`output`]: TSV export and (feature `plotting`) plots
//! - [`error`]: error type shared by the crate
//!
//! # Logging
//!
//! The crate logs through the `log` facade and installs no logger.

pub mod config;
pub mod dem;
pub mod error;
pub mod models;
pub mod output;
pub mod physics;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use coronal_rs::prelude::*;
    //! ```
    pub use crate::config::{LoopConfig, LoopParameters};
    pub use crate::error::{LoopError, LoopResult};
    pub use crate::models::{CoronalLoopModel, Heater, HeatingEvent, HeatingSource, RadiationModel};
    pub use crate::physics::{LoopState, PhysicalModel};
    pub use crate::solver::{
        AdaptiveRK4Solver, EulerSolver, Loop, LoopPhase, LoopResults, RK4Solver, Solver, SolverType,
    };
}
