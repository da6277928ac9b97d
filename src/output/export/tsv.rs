//! TSV export of loop results
//!
//! One row per recorded step, tab separated, no header:
//!
//! ```text
//! time  T_e  T_i  n  p_e  p_i  heat
//! ```
//!
//! Values are written in scientific notation since they span many orders of
//! magnitude (densities around 1e9, heating rates around 1e-3).
//!
//! # Quick Example
//!
//! ```rust,ignore
//! use coronal_rs::output::export::{Exporter, TsvConfig, TsvExporter, TsvMetadata};
//!
//! let exporter = TsvExporter::new(
//!     TsvConfig::default().with_metadata(TsvMetadata::from_run("rk4", 5000.0, 1.0, 4.0e9)),
//! );
//! exporter.export(loop_.results(), None, "loop.tsv".as_ref())?;
//! ```
//!
//! **Output** with metadata (`loop.tsv`):
//! ```text
//! # Coronal Loop Simulation Data
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Solver: rk4
//! # Total Time: 5000 s
//! # Tau: 1 s
//! # Loop Half-Length: 4000000000 cm
//! #
//! 0.000000e0	1.216802e6	1.216802e6	1.324532e9	...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{LoopError, LoopResult};
use crate::output::export::{Exporter, downsample_indices};
use crate::solver::LoopResults;

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for TSV export
///
/// # Example
///
/// ```rust
/// use coronal_rs::output::export::TsvConfig;
///
/// let config = TsvConfig::default().precision(10).delimiter(' ');
/// assert_eq!(config.precision, 10);
/// ```
#[derive(Debug, Clone)]
pub struct TsvConfig {
    /// Column delimiter (default: '\t')
    pub delimiter: char,

    /// Digits after the decimal point in scientific notation (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<TsvMetadata>,
}

impl Default for TsvConfig {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            precision: 6,
            include_metadata: false,
            metadata: None,
        }
    }
}

impl TsvConfig {
    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: TsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for header comments
///
/// Only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct TsvMetadata {
    /// Solver name (e.g. "rk4")
    pub solver_name: Option<String>,

    /// Total simulation time \[s\]
    pub total_time: Option<f64>,

    /// Time step \[s\]
    pub tau: Option<f64>,

    /// Loop half-length \[cm\]
    pub loop_length: Option<f64>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl TsvMetadata {
    /// Metadata describing one run
    pub fn from_run(solver: &str, total_time: f64, tau: f64, loop_length: f64) -> Self {
        Self {
            solver_name: Some(solver.to_string()),
            total_time: Some(total_time),
            tau: Some(tau),
            loop_length: Some(loop_length),
            ..Default::default()
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments
fn write_metadata_header<W: Write>(writer: &mut W, metadata: &TsvMetadata) -> std::io::Result<()> {
    writeln!(writer, "# Coronal Loop Simulation Data")?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(solver) = &metadata.solver_name {
        writeln!(writer, "# Solver: {}", solver)?;
    }
    if let Some(total_time) = metadata.total_time {
        writeln!(writer, "# Total Time: {} s", total_time)?;
    }
    if let Some(tau) = metadata.tau {
        writeln!(writer, "# Tau: {} s", tau)?;
    }
    if let Some(loop_length) = metadata.loop_length {
        writeln!(writer, "# Loop Half-Length: {} cm", loop_length)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(writer, "# {}: {}", key, value)?;
    }

    writeln!(writer, "#")
}

/// Format number with configured precision
fn format_number(value: f64, config: &TsvConfig) -> String {
    format!("{:.prec$e}", value, prec = config.precision)
}

/// Write one delimited row of numbers
pub fn write_row<W: Write>(
    writer: &mut W,
    values: impl IntoIterator<Item = f64>,
    config: &TsvConfig,
) -> std::io::Result<()> {
    for (column, value) in values.into_iter().enumerate() {
        if column > 0 {
            write!(writer, "{}", config.delimiter)?;
        }
        write!(writer, "{}", format_number(value, config))?;
    }
    writeln!(writer)
}

// =============================================================================
// Exporter
// =============================================================================

/// TSV exporter for [`LoopResults`]
#[derive(Debug, Clone, Default)]
pub struct TsvExporter {
    config: TsvConfig,
}

impl TsvExporter {
    pub fn new(config: TsvConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TsvConfig {
        &self.config
    }
}

impl Exporter for TsvExporter {
    type Error = LoopError;

    fn export(&self, results: &LoopResults, n_points: Option<usize>, path: &Path) -> LoopResult<()> {
        // ============================= Validation =============================

        if results.is_empty() {
            return Err(LoopError::Numerical(
                "Empty data: no recorded steps to export".to_string(),
            ));
        }

        if let Some(sample) = results.samples().find(|s| {
            ![s.time, s.heat, s.pressure_e, s.pressure_i, s.temperature_e, s.temperature_i, s.density]
                .iter()
                .all(|v| v.is_finite())
        }) {
            return Err(LoopError::Numerical(format!(
                "Invalid data: NaN or Inf detected at t = {}",
                sample.time
            )));
        }

        // ============================= Open File ==============================

        let mut writer = BufWriter::new(File::create(path)?);

        if self.config.include_metadata
            && let Some(metadata) = &self.config.metadata
        {
            write_metadata_header(&mut writer, metadata)?;
        }

        // ============================= Write Data =============================

        for index in downsample_indices(results.len(), n_points) {
            if let Some(s) = results.sample(index) {
                write_row(
                    &mut writer,
                    [s.time, s.temperature_e, s.temperature_i, s.density, s.pressure_e, s.pressure_i, s.heat],
                    &self.config,
                )?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
