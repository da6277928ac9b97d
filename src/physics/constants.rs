//! Physical constants (cgs units)
//!
//! Process-wide, immutable. Shared by the closure relations, the right-hand
//! side of the loop equations and the initial-conditions solver.

/// Boltzmann constant \[erg/K\]
pub const BOLTZMANN_CONSTANT: f64 = 1.3806488e-16;

/// Proton mass \[g\]
pub const PROTON_MASS: f64 = 1.67262178e-24;

/// Electron mass \[g\]
pub const ELECTRON_MASS: f64 = 9.10938291e-28;

/// Electron charge to the fourth power \[esu⁴\]
pub const ELECTRON_CHARGE_POWER_4: f64 = 5.3e-38;

/// Spitzer conductivity coefficient for electrons \[erg/(s·cm·K^3.5)\]
pub const SPITZER_ELECTRON_CONDUCTIVITY: f64 = 7.8e-7;

/// Spitzer conductivity coefficient for ions \[erg/(s·cm·K^3.5)\]
pub const SPITZER_ION_CONDUCTIVITY: f64 = 3.2e-8;

/// Gravitational acceleration at the solar surface \[cm/s²\]
pub const SOLAR_SURFACE_GRAVITY: f64 = 2.74e4;

/// Adiabatic index of a monatomic ideal gas
pub const GAMMA: f64 = 5.0 / 3.0;

/// γ - 1
pub const GAMMA_MINUS_ONE: f64 = GAMMA - 1.0;

pub use std::f64::consts::PI;
