//! Example: Impulsive Heating - Electron vs Ion Heating
//!
//! A 4e9 cm loop in weak background equilibrium is hit by a 200 s
//! triangular heating event. The same event is run twice, once depositing
//! all the energy in the electrons and once in the ions.
//!
//! **Heating**:
//! - Background: 1e-5 erg/(cm³·s)
//! - Event: triangle from t = 0 to t = 200 s, peak 0.1 erg/(cm³·s)
//!
//! **Numerics**:
//! - Adaptive RK4, relative tolerance 1e-6, initial step 0.5 s
//! - 5000 s of evolution
//!
//! Writes one TSV file and two plots per run into `impulsive_output/`.

use coronal_rs::{
    config::LoopConfig,
    models::{Heater, HeatingEvent},
    output::{PlotConfig, plot_density, plot_temperatures},
    solver::{Loop, SolverType},
};

use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("═══════════════════════════════════════════════════════");
    println!("  Impulsive Heating - Electron vs Ion Heating");
    println!("═══════════════════════════════════════════════════════\n");

    let output_directory = PathBuf::from("impulsive_output");
    std::fs::create_dir_all(&output_directory)?;

    let runs = [("electron", 1.0), ("ion", 0.0)];

    println!("{:<10} {:>10} {:>14} {:>14} {:>10}", "Heated", "Steps", "Peak T_e (MK)", "Peak T_i (MK)", "Time (s)");
    println!("{:-<62}", "");

    for (label, partition) in runs {
        let config = LoopConfig {
            total_time: 5000.0,
            tau: 0.5,
            loop_length: 4.0e9,
            solver: SolverType::Rka4,
            rka_error: 1.0e-6,
            output_filename: output_directory.join(format!("{label}.tsv")),
            heating: Heater::new(1.0e-5, partition)
                .with_event(HeatingEvent::triangle(0.0, 200.0, 0.1)),
            ..LoopConfig::default()
        };

        let start = Instant::now();

        let mut run = Loop::new(config)?;
        run.initialize_state()?;
        run.evolve()?;
        run.write_results()?;

        let elapsed = start.elapsed().as_secs_f64();

        let results = run.results();
        let peak_e = results.temperature_e().iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let peak_i = results.temperature_i().iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        println!(
            "{:<10} {:>10} {:>14.2} {:>14.2} {:>10.3}",
            label,
            results.len(),
            peak_e / 1.0e6,
            peak_i / 1.0e6,
            elapsed
        );

        let title = format!("{label} heating");
        plot_temperatures(
            results,
            &output_directory.join(format!("{label}_temperature.png")).to_string_lossy(),
            Some(&PlotConfig::temperature(title.as_str())),
        )?;
        plot_density(
            results,
            &output_directory.join(format!("{label}_density.png")).to_string_lossy(),
            Some(&PlotConfig::density(title.as_str())),
        )?;
    }

    println!("\nResults written to {}", output_directory.display());

    Ok(())
}
