//! Output module for loop results
//!
//! - **Export**: TSV data export for external analysis
//! - **Visualization**: PNG/SVG plots using plotters (`plotting` feature)
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! ├── export/             ← Data export
//! │   ├── mod.rs
//! │   └── tsv.rs
//! └── visualization/      ← Plots (feature "plotting")
//!     ├── mod.rs
//!     ├── config.rs
//!     └── time_series.rs
//! ```
//!
//! Export is what the driver writes at the end of a run; visualization is for
//! human inspection and never used by the driver.

pub mod export;

#[cfg(feature = "plotting")]
pub mod visualization;

pub use export::{Exporter, TsvConfig, TsvExporter, TsvMetadata};

#[cfg(feature = "plotting")]
pub use visualization::{PlotConfig, plot_density, plot_temperatures};
