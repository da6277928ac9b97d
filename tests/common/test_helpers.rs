//! Helper functions for integration tests

use std::path::Path;

use coronal_rs::config::LoopConfig;
use coronal_rs::models::Heater;
use coronal_rs::solver::SolverType;

/// Relative error |a - b| / |b|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs()
}

/// Constant heating, Spitzer conduction, power-law losses, no C1 corrections
pub fn quiet_loop_config(total_time: f64, tau: f64, solver: SolverType) -> LoopConfig {
    LoopConfig {
        total_time,
        tau,
        loop_length: 1.0e9,
        solver,
        use_c1_loss_correction: false,
        use_c1_grav_correction: false,
        use_power_law_radiative_losses: true,
        use_spitzer_conductivity: true,
        heating: Heater::new(1.0e-3, 0.5),
        ..LoopConfig::default()
    }
}

/// Parse a delimited numeric file, skipping `#` comment lines
pub fn read_tsv(path: &Path) -> Vec<Vec<f64>> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.split('\t').map(|v| v.parse().unwrap()).collect())
        .collect()
}
