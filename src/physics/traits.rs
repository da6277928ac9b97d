//! Physical model traits and types
//!
//! This module defines the core API shared by the loop physics and the solvers:
//! - `LoopState`: the three-component thermodynamic state of the loop
//! - `Species`: type-safe identifier for the two fluids
//! - `PhysicalModel`: trait for anything that provides dy/dt = f(y, t)

use nalgebra::Vector3;

// =================================================================================================
// Species (Type-safe Identifiers)
// =================================================================================================

/// Plasma species carried by the two-fluid model
///
/// Replaces string-keyed dispatch: every place that needs per-species
/// coefficients matches on this enum, so adding a species is checked by the
/// compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Electrons
    Electron,

    /// Ions (hydrogen plus helium, folded into averaged corrections)
    Ion,
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Species::Electron => write!(f, "electron"),
            Species::Ion => write!(f, "ion"),
        }
    }
}

// =================================================================================================
// Loop State (Fixed-size State Container)
// =================================================================================================

/// Thermodynamic state of the loop
///
/// Exactly three ordered components, in cgs units:
///
/// | Index | Quantity          | Unit       |
/// |-------|-------------------|------------|
/// | 0     | Electron pressure | erg/cm³    |
/// | 1     | Ion pressure      | erg/cm³    |
/// | 2     | Number density    | cm⁻³       |
///
/// The state is `Copy`: solvers receive it by value and return a new one, it
/// is never aliased.
///
/// # Invariant
///
/// All components of a physical state are strictly positive. The right-hand
/// side divides by density and by ion pressure without guards; a state that
/// reaches zero in one of them produces NaN or Inf derivatives.
///
/// # Example
/// ```
/// use coronal_rs::physics::LoopState;
///
/// let state = LoopState::new(0.1, 0.1, 1.0e9);
/// let doubled = state * 2.0;
/// assert_eq!(doubled.density(), 2.0e9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopState {
    values: Vector3<f64>,
}

impl LoopState {
    /// Create a state from electron pressure, ion pressure and density
    pub fn new(pressure_e: f64, pressure_i: f64, density: f64) -> Self {
        Self {
            values: Vector3::new(pressure_e, pressure_i, density),
        }
    }

    /// Wrap an existing vector (same component order as [`LoopState::new`])
    pub fn from_vector(values: Vector3<f64>) -> Self {
        Self { values }
    }

    /// State with all components at zero
    pub fn zeros() -> Self {
        Self {
            values: Vector3::zeros(),
        }
    }

    /// Electron pressure \[erg/cm³\]
    pub fn pressure_e(&self) -> f64 {
        self.values[0]
    }

    /// Ion pressure \[erg/cm³\]
    pub fn pressure_i(&self) -> f64 {
        self.values[1]
    }

    /// Number density \[cm⁻³\]
    pub fn density(&self) -> f64 {
        self.values[2]
    }

    /// Underlying vector
    pub fn as_vector(&self) -> &Vector3<f64> {
        &self.values
    }

    /// Iterate over the three components in order
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// True when no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|x| x.is_finite())
    }
}

impl std::ops::Index<usize> for LoopState {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

// Operator overloading for numerical operations

impl std::ops::Add for LoopState {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            values: self.values + rhs.values,
        }
    }
}

impl std::ops::Sub for LoopState {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            values: self.values - rhs.values,
        }
    }
}

impl std::ops::Mul<f64> for LoopState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self {
            values: self.values * scalar,
        }
    }
}

// =================================================================================================
// Physical Model Trait
// =================================================================================================

/// Trait for physical models
///
/// # Responsibility
/// Computes the time derivative of the loop state. Does NOT integrate it
/// (that's the Solver's job).
///
/// The model provides the "physics" (equations), the solver provides
/// the "numerics" (method to solve them).
pub trait PhysicalModel {
    /// Right-hand side f(y, t) of dy/dt = f(y, t)
    ///
    /// # Arguments
    /// * `state` - Current loop state
    /// * `time` - Simulation time \[s\]
    ///
    /// # Returns
    /// The derivatives (dp_e/dt, dp_i/dt, dn/dt), packed as a `LoopState`.
    ///
    /// Must be a pure function of its arguments and the model parameters.
    fn compute_physics(&self, state: &LoopState, time: f64) -> LoopState;

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the model (option)
    fn description(&self) -> Option<&str> {
        None
    }
}
