//! Mock physical models for testing
//!
//! These models have known analytical solutions, making them
//! ideal for validating numerical solver accuracy.

use coronal_rs::physics::{LoopState, PhysicalModel};

// =================================================================================================
// Exponential Decay: dy/dt = -k*y
// =================================================================================================

/// Exponential decay model: dy/dt = -k*y on every component
///
/// Analytical solution: y(t) = y₀ * exp(-k*t)
pub struct ExponentialDecay {
    pub decay_rate: f64,
}

impl ExponentialDecay {
    pub fn new(decay_rate: f64) -> Self {
        Self { decay_rate }
    }

    /// Compute analytical solution at time t
    pub fn analytical_solution(&self, t: f64, y0: f64) -> f64 {
        y0 * (-self.decay_rate * t).exp()
    }
}

impl PhysicalModel for ExponentialDecay {
    fn compute_physics(&self, state: &LoopState, _time: f64) -> LoopState {
        *state * (-self.decay_rate)
    }

    fn name(&self) -> &str {
        "Exponential Decay"
    }
}

// =================================================================================================
// Constant Growth: dy/dt = c
// =================================================================================================

/// Constant growth model: dy/dt = c
///
/// Analytical solution: y(t) = y₀ + c*t. Every method integrates it exactly.
pub struct ConstantGrowth {
    pub rate: f64,
}

impl ConstantGrowth {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn analytical_solution(&self, t: f64, y0: f64) -> f64 {
        y0 + self.rate * t
    }
}

impl PhysicalModel for ConstantGrowth {
    fn compute_physics(&self, _state: &LoopState, _time: f64) -> LoopState {
        LoopState::new(self.rate, self.rate, self.rate)
    }

    fn name(&self) -> &str {
        "Constant Growth"
    }
}
