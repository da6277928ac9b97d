//! Heating profiles for coronal loops
//!
//! Defines how the volumetric heating rate Q(t) \[erg/(cm³·s)\] varies with
//! TIME, and which fraction of it goes to the electrons.
//!
//! # Profiles
//!
//! - **Heater**: constant background plus any number of trapezoidal or
//!   Gaussian events (a triangle is a trapezoid with no plateau)
//! - **EventTrain**: periodic events separated by a wait time, with uniform
//!   or power-law distributed magnitudes
//! - **CustomHeating**: user-defined function of time
//!
//! # Example
//!
//! ```rust
//! use coronal_rs::models::{Heater, HeatingEvent, HeatingSource};
//!
//! // 200 s triangular nanoflare on top of a weak background, all to electrons
//! let heater = Heater::new(1.0e-6, 1.0)
//!     .with_event(HeatingEvent::triangle(0.0, 200.0, 0.1));
//!
//! assert!((heater.heating_rate(100.0) - (0.1 + 1.0e-6)).abs() < 1e-12);
//! assert!((heater.heating_rate(500.0) - 1.0e-6).abs() < 1e-18);
//! ```

use std::sync::Arc;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LoopError, LoopResult};

// =================================================================================================
// Capability
// =================================================================================================

/// Capability interface for heating functions
pub trait HeatingSource {
    /// Volumetric heating rate at `time` \[erg/(cm³·s)\]
    fn heating_rate(&self, time: f64) -> f64;

    /// Fraction of the heating delivered to electrons, in \[0, 1\]
    fn partition(&self) -> f64;
}

// =================================================================================================
// Heating events
// =================================================================================================

/// A single heating event
///
/// Serialized without a tag: the field names select the variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeatingEvent {
    /// Trapezoidal event
    ///
    /// ```text
    ///  magnitude      ┌─────────┐
    ///                /           \
    ///               /             \
    ///  0  ─────────┘               └──────
    ///        rise_start  rise_end  decay_start  decay_end
    /// ```
    ///
    /// Requires `rise_start ≤ rise_end ≤ decay_start ≤ decay_end`. A ramp of
    /// zero width acts as a step.
    Trapezoid {
        /// Start of the linear rise \[s\]
        rise_start: f64,

        /// End of the linear rise \[s\]
        rise_end: f64,

        /// Start of the linear decay \[s\]
        decay_start: f64,

        /// End of the linear decay \[s\]
        decay_end: f64,

        /// Peak heating rate \[erg/(cm³·s)\]
        magnitude: f64,
    },

    /// Gaussian pulse
    ///
    /// ```text
    /// Q(t) = magnitude · exp(-(t - peak_time)² / (2σ²))
    /// ```
    Gaussian {
        /// Time of the maximum \[s\]
        peak_time: f64,

        /// Standard deviation σ \[s\]
        sigma: f64,

        /// Peak heating rate \[erg/(cm³·s)\]
        magnitude: f64,
    },
}

impl HeatingEvent {
    /// Symmetric triangular event starting at `start` and lasting `duration`
    pub fn triangle(start: f64, duration: f64, magnitude: f64) -> Self {
        let peak = start + duration / 2.0;
        Self::Trapezoid {
            rise_start: start,
            rise_end: peak,
            decay_start: peak,
            decay_end: start + duration,
            magnitude,
        }
    }

    /// Square event: instantaneous rise and decay
    pub fn square(start: f64, duration: f64, magnitude: f64) -> Self {
        Self::Trapezoid {
            rise_start: start,
            rise_end: start,
            decay_start: start + duration,
            decay_end: start + duration,
            magnitude,
        }
    }

    /// Gaussian pulse centred on `peak_time` with width `sigma`
    pub fn gaussian(peak_time: f64, sigma: f64, magnitude: f64) -> Self {
        Self::Gaussian {
            peak_time,
            sigma,
            magnitude,
        }
    }

    /// Peak heating rate of the event
    pub fn magnitude(&self) -> f64 {
        match self {
            Self::Trapezoid { magnitude, .. } | Self::Gaussian { magnitude, .. } => *magnitude,
        }
    }

    /// Heating rate contributed by this event at `time`
    pub fn evaluate(&self, time: f64) -> f64 {
        match *self {
            Self::Trapezoid {
                rise_start,
                rise_end,
                decay_start,
                decay_end,
                magnitude,
            } => {
                if time < rise_start || time > decay_end {
                    0.0
                } else if time < rise_end {
                    magnitude * (time - rise_start) / (rise_end - rise_start)
                } else if time <= decay_start {
                    magnitude
                } else {
                    magnitude * (decay_end - time) / (decay_end - decay_start)
                }
            }

            Self::Gaussian {
                peak_time,
                sigma,
                magnitude,
            } => {
                let distance = (time - peak_time) / sigma;
                magnitude * (-distance * distance / 2.0).exp()
            }
        }
    }

    /// Check the event timing and that the magnitude is usable
    pub fn validate(&self) -> LoopResult<()> {
        match *self {
            Self::Trapezoid {
                rise_start,
                rise_end,
                decay_start,
                decay_end,
                ..
            } => {
                let times = [rise_start, rise_end, decay_start, decay_end];
                if times.iter().any(|t| !t.is_finite()) {
                    return Err(LoopError::Config(
                        "heating event times must be finite".to_string(),
                    ));
                }
                if times.windows(2).any(|w| w[1] < w[0]) {
                    return Err(LoopError::Config(format!(
                        "heating event times must satisfy rise_start <= rise_end <= decay_start <= decay_end, got {:?}",
                        times
                    )));
                }
            }

            Self::Gaussian { peak_time, sigma, .. } => {
                if !peak_time.is_finite() {
                    return Err(LoopError::Config(
                        "gaussian heating event peak_time must be finite".to_string(),
                    ));
                }
                if !(sigma.is_finite() && sigma > 0.0) {
                    return Err(LoopError::Config(format!(
                        "gaussian heating event sigma must be > 0, got {sigma}"
                    )));
                }
            }
        }

        let magnitude = self.magnitude();
        if !(magnitude.is_finite() && magnitude >= 0.0) {
            return Err(LoopError::Config(format!(
                "heating event magnitude must be >= 0, got {magnitude}"
            )));
        }
        Ok(())
    }
}

// =================================================================================================
// Heater
// =================================================================================================

/// Background heating plus a sequence of events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heater {
    /// Time-independent heating rate \[erg/(cm³·s)\]
    pub background: f64,

    /// Fraction of the heating delivered to electrons
    pub partition: f64,

    /// Heating events (may overlap; contributions add up)
    #[serde(default)]
    pub events: Vec<HeatingEvent>,
}

impl Heater {
    /// Constant heating with no events
    pub fn new(background: f64, partition: f64) -> Self {
        Self {
            background,
            partition,
            events: Vec::new(),
        }
    }

    /// Builder pattern: add an event
    pub fn with_event(mut self, event: HeatingEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Builder pattern: add several events, e.g. from [`EventTrain::events`]
    pub fn with_events(mut self, events: impl IntoIterator<Item = HeatingEvent>) -> Self {
        self.events.extend(events);
        self
    }

    /// Validate background, partition and every event
    pub fn validate(&self) -> LoopResult<()> {
        if !(self.background.is_finite() && self.background >= 0.0) {
            return Err(LoopError::Config(format!(
                "background heating must be >= 0, got {}",
                self.background
            )));
        }
        if !(0.0..=1.0).contains(&self.partition) {
            return Err(LoopError::Config(format!(
                "heating partition must be in [0, 1], got {}",
                self.partition
            )));
        }
        for event in &self.events {
            event.validate()?;
        }
        Ok(())
    }
}

impl HeatingSource for Heater {
    fn heating_rate(&self, time: f64) -> f64 {
        self.background + self.events.iter().map(|event| event.evaluate(time)).sum::<f64>()
    }

    fn partition(&self) -> f64 {
        self.partition
    }
}

// =================================================================================================
// Event trains
// =================================================================================================

/// Pulse shape of the events in an [`EventTrain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PulseShape {
    Triangle,
    Square,
    Gaussian,
}

impl PulseShape {
    /// Event of this shape in the window `[start, start + duration]`
    ///
    /// A Gaussian pulse peaks mid-window with σ = duration / 2.
    pub fn event(self, start: f64, duration: f64, magnitude: f64) -> HeatingEvent {
        match self {
            Self::Triangle => HeatingEvent::triangle(start, duration, magnitude),
            Self::Square => HeatingEvent::square(start, duration, magnitude),
            Self::Gaussian => HeatingEvent::gaussian(start + duration / 2.0, duration / 2.0, magnitude),
        }
    }

    /// Time integral of a unit-magnitude pulse, in units of its duration
    pub fn area_factor(self) -> f64 {
        match self {
            Self::Triangle => 0.5,
            Self::Square => 1.0,
            Self::Gaussian => 0.5 * (2.0 * std::f64::consts::PI).sqrt(),
        }
    }
}

/// Distribution of event magnitudes in a train
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmplitudeDistribution {
    /// Every event has the same magnitude
    Uniform { magnitude: f64 },

    /// Magnitudes drawn from p(a) ∝ a^alpha on `[min, max]`
    PowerLaw { alpha: f64, min: f64, max: f64 },
}

impl AmplitudeDistribution {
    pub fn validate(&self) -> LoopResult<()> {
        match *self {
            Self::Uniform { magnitude } => {
                if !(magnitude.is_finite() && magnitude >= 0.0) {
                    return Err(LoopError::Config(format!(
                        "uniform event magnitude must be >= 0, got {magnitude}"
                    )));
                }
            }
            Self::PowerLaw { alpha, min, max } => {
                if !alpha.is_finite() || alpha == -1.0 {
                    return Err(LoopError::Config(format!(
                        "power-law index must be finite and != -1, got {alpha}"
                    )));
                }
                if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
                    return Err(LoopError::Config(format!(
                        "power-law bounds must satisfy 0 < min < max, got [{min}, {max}]"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Magnitude at cumulative probability `x` in \[0, 1\]
    ///
    /// For the power law this inverts the CDF:
    ///
    /// ```text
    /// a(x) = ((max^(α+1) - min^(α+1)) · x + min^(α+1))^(1/(α+1))
    /// ```
    pub fn quantile(&self, x: f64) -> f64 {
        match *self {
            Self::Uniform { magnitude } => magnitude,
            Self::PowerLaw { alpha, min, max } => {
                let exponent = alpha + 1.0;
                let low = min.powf(exponent);
                ((max.powf(exponent) - low) * x + low).powf(1.0 / exponent)
            }
        }
    }

    /// Draw one magnitude
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.quantile(rng.random::<f64>())
    }
}

/// Periodic train of heating events
///
/// Events of length `duration` start every `duration + wait_time` seconds
/// from t = 0, as many as needed to cover `total_time`.
///
/// # Example
///
/// ```rust
/// use coronal_rs::models::{AmplitudeDistribution, EventTrain, Heater, PulseShape};
///
/// let train = EventTrain {
///     shape: PulseShape::Triangle,
///     duration: 100.0,
///     wait_time: 400.0,
///     total_time: 2000.0,
///     amplitudes: AmplitudeDistribution::Uniform { magnitude: 0.01 },
/// };
///
/// let events = train.events(&mut rand::rng()).unwrap();
/// assert_eq!(events.len(), 4);
///
/// let heater = Heater::new(1.0e-6, 1.0).with_events(events);
/// assert_eq!(heater.events.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventTrain {
    pub shape: PulseShape,

    /// Length of each event \[s\]
    pub duration: f64,

    /// Quiet time between the end of one event and the start of the next \[s\]
    pub wait_time: f64,

    /// Span covered by the train \[s\]
    pub total_time: f64,

    pub amplitudes: AmplitudeDistribution,
}

impl EventTrain {
    /// Uniform train whose time-averaged heating over `total_time` is `mean_rate`
    pub fn with_mean_heating(
        shape: PulseShape,
        duration: f64,
        wait_time: f64,
        total_time: f64,
        mean_rate: f64,
    ) -> Self {
        let mut train = Self {
            shape,
            duration,
            wait_time,
            total_time,
            amplitudes: AmplitudeDistribution::Uniform { magnitude: 0.0 },
        };
        let energy_per_unit = train.event_count() as f64 * shape.area_factor() * duration;
        train.amplitudes = AmplitudeDistribution::Uniform {
            magnitude: mean_rate * total_time / energy_per_unit,
        };
        train
    }

    pub fn validate(&self) -> LoopResult<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(LoopError::Config(format!(
                "event train duration must be > 0, got {}",
                self.duration
            )));
        }
        if !(self.wait_time.is_finite() && self.wait_time >= 0.0) {
            return Err(LoopError::Config(format!(
                "event train wait_time must be >= 0, got {}",
                self.wait_time
            )));
        }
        if !(self.total_time.is_finite() && self.total_time > 0.0) {
            return Err(LoopError::Config(format!(
                "event train total_time must be > 0, got {}",
                self.total_time
            )));
        }
        self.amplitudes.validate()
    }

    /// Number of events, `ceil(total_time / (duration + wait_time))`
    pub fn event_count(&self) -> usize {
        (self.total_time / (self.duration + self.wait_time)).ceil() as usize
    }

    /// Start time of event `index`
    pub fn start_time(&self, index: usize) -> f64 {
        index as f64 * (self.duration + self.wait_time)
    }

    /// Build the events, drawing one magnitude per event from `rng`
    pub fn events<R: Rng + ?Sized>(&self, rng: &mut R) -> LoopResult<Vec<HeatingEvent>> {
        self.validate()?;

        let events: Vec<HeatingEvent> = (0..self.event_count())
            .map(|index| {
                self.shape
                    .event(self.start_time(index), self.duration, self.amplitudes.sample(rng))
            })
            .collect();

        debug!(
            "Built {} {:?} events (duration {} s, wait {} s)",
            events.len(),
            self.shape,
            self.duration,
            self.wait_time
        );
        Ok(events)
    }
}

// =================================================================================================
// Custom heating
// =================================================================================================

/// Heating defined by an arbitrary function of time
///
/// # Example
///
/// ```rust
/// use coronal_rs::models::{CustomHeating, HeatingSource};
///
/// let heating = CustomHeating::new(0.5, |t| if t < 10.0 { 1.0e-2 } else { 1.0e-3 });
/// assert_eq!(heating.heating_rate(5.0), 1.0e-2);
/// ```
#[derive(Clone)]
pub struct CustomHeating {
    function: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
    partition: f64,
}

impl CustomHeating {
    /// Wrap a heating function with its electron partition
    pub fn new(partition: f64, function: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            function: Arc::new(function),
            partition,
        }
    }
}

impl std::fmt::Debug for CustomHeating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomHeating")
            .field("function", &"<user-defined>")
            .field("partition", &self.partition)
            .finish()
    }
}

impl HeatingSource for CustomHeating {
    fn heating_rate(&self, time: f64) -> f64 {
        (self.function)(time)
    }

    fn partition(&self) -> f64 {
        self.partition
    }
}

// =================================================================================================
// Tests
// =================================================================================================
