//! Export module for loop results.
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module, so
//! adding a new format means adding a file, without modifying existing code.
//!
//! # Available formats
//!
//! | Format  | Module          |
//! |---------|-----------------|
//! | TSV     | [`tsv`]         |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use coronal_rs::output::export::{Exporter, TsvExporter};
//!
//! let exporter = TsvExporter::default();
//!
//! // Full export (all recorded steps)
//! exporter.export(loop_.results(), None, "loop.tsv".as_ref())?;
//!
//! // Downsampled export to 500 rows
//! exporter.export(loop_.results(), Some(500), "loop_light.tsv".as_ref())?;
//! ```

pub mod tsv;

pub use tsv::{TsvConfig, TsvExporter, TsvMetadata};

use std::path::Path;

use crate::solver::LoopResults;

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type.
///
/// # Parameter `n_points`
///
/// - `None`: exports all recorded steps (default behaviour)
/// - `Some(n)`: uniformly downsamples to `n` rows, always keeping the
///   **first and last** step
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Export one row per step: time, T_e, T_i, n, p_e, p_i, heat.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the path is invalid or the directory does not exist
    /// - `results` contains no data or non-finite values
    fn export(
        &self,
        results: &LoopResults,
        n_points: Option<usize>,
        path: &Path,
    ) -> Result<(), Self::Error>;
}

/// Indices of `n_points` rows spread uniformly over `len` rows
///
/// Always contains `0` and `len - 1` (when `len > 0`).
pub fn downsample_indices(len: usize, n_points: Option<usize>) -> Vec<usize> {
    match n_points {
        Some(n) if n >= 2 && n < len => {
            let last = (len - 1) as f64;
            let mut indices: Vec<usize> = (0..n)
                .map(|k| (k as f64 * last / (n - 1) as f64).round() as usize)
                .collect();
            indices.dedup();
            indices
        }
        Some(1) if len > 1 => vec![0, len - 1],
        _ => (0..len).collect(),
    }
}
