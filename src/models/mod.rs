//! Physical models and collaborators of the coronal loop
//!
//! [`CoronalLoopModel`] implements the [`PhysicalModel`](crate::physics::PhysicalModel)
//! trait. The solver calls `compute_physics` at each stage of each step; the
//! model is responsible for the physics (conduction, radiation, collisions,
//! heating), the solver for the time integration.
//!
//! # Collaborators
//!
//! ## Radiation
//!
//! [`RadiationModel`] evaluates the optically thin loss function Λ(T) either
//! from a piecewise power law or from a table.
//!
//! ## Heating
//!
//! [`Heater`] defines the volumetric heating rate as a background plus
//! trapezoidal or Gaussian events, together with the fraction delivered to
//! electrons. [`EventTrain`] generates periodic nanoflare sequences.
//! Any other [`HeatingSource`] (for instance [`CustomHeating`]) can be used
//! in its place.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod coronal_loop;
pub mod heating;
pub mod radiation;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use coronal_loop::{CoronalLoopModel, InitialConditions, LoopDiagnostics};
pub use heating::{
    AmplitudeDistribution, CustomHeating, EventTrain, Heater, HeatingEvent, HeatingSource, PulseShape,
};
pub use radiation::{RadiationModel, RadiationTable, RadiativeLoss};
