//! Visualization of loop runs
//!
//! Available with the `plotting` feature. Uses the `plotters` library.
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **time_series**: Temperatures and density vs time

pub mod config;
pub mod time_series;

pub use config::{NO_TITLE, PlotConfig};
pub use time_series::{plot_density, plot_temperatures};
