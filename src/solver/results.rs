//! Result buffers of a loop run
//!
//! Seven parallel sequences, one entry per recorded step. They are pre-sized
//! to the expected number of steps (bounded by
//! [`MAX_PRESIZED_SLOTS`](crate::config::MAX_PRESIZED_SLOTS)); the adaptive
//! solver may take fewer steps (unused slots are trimmed at the end) or more
//! (entries are appended).

use crate::physics::LoopState;

/// One recorded step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSample {
    pub time: f64,
    pub heat: f64,
    pub pressure_e: f64,
    pub pressure_i: f64,
    pub temperature_e: f64,
    pub temperature_i: f64,
    pub density: f64,
}

impl LoopSample {
    /// Sample from a state, its temperatures and the heating rate
    pub fn new(time: f64, heat: f64, state: &LoopState, temperatures: (f64, f64)) -> Self {
        Self {
            time,
            heat,
            pressure_e: state.pressure_e(),
            pressure_i: state.pressure_i(),
            temperature_e: temperatures.0,
            temperature_i: temperatures.1,
            density: state.density(),
        }
    }
}

/// Time series recorded by the loop driver
///
/// # Invariant
///
/// All seven sequences always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopResults {
    time: Vec<f64>,
    heat: Vec<f64>,
    pressure_e: Vec<f64>,
    pressure_i: Vec<f64>,
    temperature_e: Vec<f64>,
    temperature_i: Vec<f64>,
    density: Vec<f64>,
}

impl LoopResults {
    /// Buffers with `capacity` zero-filled slots
    pub fn with_slots(capacity: usize) -> Self {
        Self {
            time: vec![0.0; capacity],
            heat: vec![0.0; capacity],
            pressure_e: vec![0.0; capacity],
            pressure_i: vec![0.0; capacity],
            temperature_e: vec![0.0; capacity],
            temperature_i: vec![0.0; capacity],
            density: vec![0.0; capacity],
        }
    }

    /// Store `sample` in slot `index`
    ///
    /// Overwrites the slot when it exists, appends otherwise. Recording is
    /// sequential, so `index` never exceeds the current length.
    pub fn save(&mut self, index: usize, sample: LoopSample) {
        let values = [
            sample.time,
            sample.heat,
            sample.pressure_e,
            sample.pressure_i,
            sample.temperature_e,
            sample.temperature_i,
            sample.density,
        ];

        for (buffer, value) in self.buffers_mut().into_iter().zip(values) {
            if index < buffer.len() {
                buffer[index] = value;
            } else {
                buffer.push(value);
            }
        }
    }

    /// Drop the last `excess` entries of every sequence
    pub fn trim(&mut self, excess: usize) {
        let length = self.len().saturating_sub(excess);
        for buffer in self.buffers_mut() {
            buffer.truncate(length);
        }
    }

    /// Number of entries (identical for all sequences)
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Entry `index` as a sample
    pub fn sample(&self, index: usize) -> Option<LoopSample> {
        (index < self.len()).then(|| LoopSample {
            time: self.time[index],
            heat: self.heat[index],
            pressure_e: self.pressure_e[index],
            pressure_i: self.pressure_i[index],
            temperature_e: self.temperature_e[index],
            temperature_i: self.temperature_i[index],
            density: self.density[index],
        })
    }

    /// Iterate over all entries in order
    pub fn samples(&self) -> impl Iterator<Item = LoopSample> + '_ {
        (0..self.len()).filter_map(|index| self.sample(index))
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn heat(&self) -> &[f64] {
        &self.heat
    }

    pub fn pressure_e(&self) -> &[f64] {
        &self.pressure_e
    }

    pub fn pressure_i(&self) -> &[f64] {
        &self.pressure_i
    }

    pub fn temperature_e(&self) -> &[f64] {
        &self.temperature_e
    }

    pub fn temperature_i(&self) -> &[f64] {
        &self.temperature_i
    }

    pub fn density(&self) -> &[f64] {
        &self.density
    }

    /// Lengths of the seven sequences, in declaration order
    pub fn lengths(&self) -> [usize; 7] {
        [
            self.time.len(),
            self.heat.len(),
            self.pressure_e.len(),
            self.pressure_i.len(),
            self.temperature_e.len(),
            self.temperature_i.len(),
            self.density.len(),
        ]
    }

    fn buffers_mut(&mut self) -> [&mut Vec<f64>; 7] {
        [
            &mut self.time,
            &mut self.heat,
            &mut self.pressure_e,
            &mut self.pressure_i,
            &mut self.temperature_e,
            &mut self.temperature_i,
            &mut self.density,
        ]
    }
}

// =================================================================================================
// Tests
// =================================================================================================
