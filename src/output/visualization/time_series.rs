//! Time-series plots of a loop run
//!
//! # Available functions
//!
//! - [`plot_temperatures`]: electron and ion temperature vs time
//! - [`plot_density`]: density vs time
//!
//! The backend is chosen from the file extension: `.svg` writes SVG, anything
//! else a PNG bitmap.
//!
//! # Usage
//!
//! ```rust,ignore
//! use coronal_rs::output::visualization::{plot_density, plot_temperatures};
//!
//! plot_temperatures(loop_.results(), "temperature.png", None)?;
//! plot_density(loop_.results(), "density.svg", None)?;
//! ```

use plotters::prelude::*;
use std::error::Error;

use super::config::{NO_TITLE, PlotConfig};
use crate::solver::LoopResults;

/// A labelled curve in display units
struct Curve<'a> {
    label: &'a str,
    values: Vec<f64>,
    color: RGBColor,
}

/// Plot T_e and T_i (in MK) against time
pub fn plot_temperatures(
    results: &LoopResults,
    output_path: &str,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    let default_config = PlotConfig::temperature(NO_TITLE);
    let config = config.unwrap_or(&default_config);

    let curves = [
        Curve {
            label: "Electrons",
            values: results.temperature_e().iter().map(|t| t / 1.0e6).collect(),
            color: config.electron_color,
        },
        Curve {
            label: "Ions",
            values: results.temperature_i().iter().map(|t| t / 1.0e6).collect(),
            color: config.ion_color,
        },
    ];

    plot_curves(results.time(), &curves, output_path, config)
}

/// Plot n (in units of 1e9 cm⁻³) against time
pub fn plot_density(
    results: &LoopResults,
    output_path: &str,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    let default_config = PlotConfig::density(NO_TITLE);
    let config = config.unwrap_or(&default_config);

    let curves = [Curve {
        label: "Density",
        values: results.density().iter().map(|n| n / 1.0e9).collect(),
        color: config.electron_color,
    }];

    plot_curves(results.time(), &curves, output_path, config)
}

fn plot_curves(
    time_points: &[f64],
    curves: &[Curve<'_>],
    output_path: &str,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    if time_points.is_empty() {
        return Err("No recorded steps to plot".into());
    }

    let max_time = time_points.last().copied().unwrap_or(1.0);
    let max_value = curves
        .iter()
        .flat_map(|c| c.values.iter())
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1e-10);

    let ext = std::path::Path::new(output_path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("png");

    match ext {
        "svg" => {
            let backend = SVGBackend::new(output_path, (config.width, config.height));
            plot_curves_impl(backend, time_points, curves, config, max_time, max_value)
        }
        _ => {
            let backend = BitMapBackend::new(output_path, (config.width, config.height));
            plot_curves_impl(backend, time_points, curves, config, max_time, max_value)
        }
    }
}

fn plot_curves_impl<DB: DrawingBackend>(
    backend: DB,
    time_points: &[f64],
    curves: &[Curve<'_>],
    config: &PlotConfig,
    max_time: f64,
    max_value: f64,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 40).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_time, 0.0..(max_value * 1.1))?;

    if config.show_grid {
        chart
            .configure_mesh()
            .x_desc(&config.xlabel)
            .y_desc(&config.ylabel)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_label_formatter(&|y| format!("{:.2}", y))
            .draw()?;
    }

    for curve in curves {
        let color = curve.color;
        chart
            .draw_series(LineSeries::new(
                time_points.iter().zip(curve.values.iter()).map(|(t, v)| (*t, *v)),
                ShapeStyle::from(&color).stroke_width(config.line_width),
            ))?
            .label(curve.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(config.background.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_results_rejected() {
        let result = plot_density(&LoopResults::default(), "unused.png", None);
        assert!(result.is_err());
    }
}
