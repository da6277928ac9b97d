//! End-to-end tests of the loop driver
//!
//! Full runs from configuration to output files.

use coronal_rs::config::LoopConfig;
use coronal_rs::dem::DemConfig;
use coronal_rs::error::LoopError;
use coronal_rs::models::{
    AmplitudeDistribution, EventTrain, Heater, HeatingEvent, PulseShape, RadiationModel,
    RadiationTable,
};
use coronal_rs::solver::{Loop, LoopPhase, SolverType};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::tempdir;

mod common;
use common::{quiet_loop_config, read_tsv, relative_error};

#[test]
fn test_steady_heating_5000_steps() {
    let directory = tempdir().unwrap();
    let output = directory.path().join("steady.tsv");

    let mut run = Loop::new(LoopConfig {
        output_filename: output.clone(),
        ..quiet_loop_config(5000.0, 1.0, SolverType::Rk4)
    })
    .unwrap();

    let initial = run.initialize_state().unwrap();
    assert!(initial.converged);
    assert!(initial.iterations <= 100);

    run.evolve().unwrap();
    assert_eq!(run.excess(), 0);

    run.write_results().unwrap();
    assert_eq!(run.phase(), LoopPhase::Finalized);

    let results = run.results();
    assert_eq!(results.lengths(), [5000; 7]);
    assert!(results.samples().all(|s| {
        [s.pressure_e, s.pressure_i, s.density, s.temperature_e, s.temperature_i]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }));

    // Constant heating from equilibrium: the loop stays close to its start
    let last = results.sample(4999).unwrap();
    assert!(relative_error(last.temperature_e, initial.temperature) < 0.5);

    let rows = read_tsv(&output);
    assert_eq!(rows.len(), 5000);
    assert!(rows.iter().all(|row| row.len() == 7));
    assert_eq!(rows[0][0], 0.0);
    assert_eq!(rows[4999][0], 4999.0);
    assert_eq!(rows[10][6], 1.0e-3);
}

#[test]
fn test_euler_and_rk4_agree_on_slow_evolution() {
    let mut finals = Vec::new();

    for solver in [SolverType::Euler, SolverType::Rk4] {
        let mut run = Loop::new(quiet_loop_config(1000.0, 1.0, solver)).unwrap();
        run.initialize_state().unwrap();
        run.evolve().unwrap();

        assert_eq!(run.results().len(), 1000);
        finals.push(*run.state());
    }

    assert!(relative_error(finals[0].density(), finals[1].density()) < 1e-2);
    assert!(relative_error(finals[0].pressure_e(), finals[1].pressure_e()) < 1e-2);
}

#[test]
fn test_adaptive_run_trims_unused_slots() {
    let directory = tempdir().unwrap();
    let output = directory.path().join("adaptive.tsv");

    let mut run = Loop::new(LoopConfig {
        output_filename: output.clone(),
        rka_error: 1.0e-6,
        ..quiet_loop_config(1000.0, 1.0, SolverType::Rka4)
    })
    .unwrap();

    run.initialize_state().unwrap();
    run.evolve().unwrap();
    run.write_results().unwrap();

    let recorded = run.results().len();
    assert_eq!(recorded + run.excess(), 1000);
    assert_eq!(run.results().lengths(), [recorded; 7]);

    let times = run.results().time();
    assert!(times.windows(2).all(|pair| pair[1] > pair[0]));
    assert!(*times.last().unwrap() < 1000.0);

    assert_eq!(read_tsv(&output).len(), recorded);
}

#[test]
fn test_adaptive_run_appends_past_estimate() {
    let directory = tempdir().unwrap();
    let output = directory.path().join("appended.tsv");

    // A 10 s first trial step estimates N = 100; resolving the event takes more
    let heating = Heater::new(1.0e-3, 0.5).with_event(HeatingEvent::triangle(0.0, 200.0, 0.05));
    let mut run = Loop::new(LoopConfig {
        output_filename: output.clone(),
        heating,
        rka_error: 1.0e-6,
        ..quiet_loop_config(1000.0, 10.0, SolverType::Rka4)
    })
    .unwrap();

    run.initialize_state().unwrap();
    run.evolve().unwrap();
    run.write_results().unwrap();

    let recorded = run.results().len();
    assert!(recorded > 100, "only {recorded} steps recorded");
    assert_eq!(run.excess(), 0);
    assert_eq!(run.results().lengths(), [recorded; 7]);
    assert_eq!(run.unconverged_steps(), 0);

    let times = run.results().time();
    assert!(times.windows(2).all(|pair| pair[1] > pair[0]));

    let rows = read_tsv(&output);
    assert_eq!(rows.len(), recorded);
    assert!(relative_error(rows[recorded - 1][0], times[recorded - 1]) < 1e-6);
}

#[test]
fn test_impulsive_heating_raises_temperature() {
    let heating = Heater::new(1.0e-5, 1.0).with_event(HeatingEvent::triangle(0.0, 200.0, 0.1));

    let mut run = Loop::new(LoopConfig {
        heating,
        rka_error: 1.0e-6,
        ..quiet_loop_config(1000.0, 0.5, SolverType::Rka4)
    })
    .unwrap();

    let initial = run.initialize_state().unwrap();
    run.evolve().unwrap();

    let results = run.results();
    let peak = results.temperature_e().iter().cloned().fold(f64::MIN, f64::max);
    assert!(peak > 2.0 * initial.temperature, "peak {peak:e}, start {:e}", initial.temperature);

    // All heat goes to electrons: they run hotter than the ions while heated
    let heated = results
        .samples()
        .find(|s| s.time > 50.0)
        .unwrap();
    assert!(heated.temperature_e > heated.temperature_i);

    // Evaporation fills the loop
    let max_density = results.density().iter().cloned().fold(f64::MIN, f64::max);
    assert!(max_density > initial.state.density());
}

#[test]
fn test_power_law_nanoflare_train() {
    let train = EventTrain {
        shape: PulseShape::Triangle,
        duration: 100.0,
        wait_time: 400.0,
        total_time: 2000.0,
        amplitudes: AmplitudeDistribution::PowerLaw {
            alpha: -2.5,
            min: 5.0e-3,
            max: 5.0e-2,
        },
    };
    let events = train.events(&mut StdRng::seed_from_u64(2024)).unwrap();
    assert_eq!(events.len(), 4);

    let mut run = Loop::new(LoopConfig {
        heating: Heater::new(1.0e-3, 0.5).with_events(events),
        rka_error: 1.0e-6,
        ..quiet_loop_config(2000.0, 1.0, SolverType::Rka4)
    })
    .unwrap();

    let initial = run.initialize_state().unwrap();
    run.evolve().unwrap();
    assert_eq!(run.unconverged_steps(), 0);

    let results = run.results();
    assert!(results.samples().all(|s| s.temperature_e.is_finite() && s.density > 0.0));
    assert!(results.heat().iter().all(|&q| q >= 1.0e-3));

    // Even the weakest allowed event heats the loop well above equilibrium
    let peak = results.temperature_e().iter().cloned().fold(f64::MIN, f64::max);
    assert!(peak > 1.2 * initial.temperature, "peak {peak:e}");
}

#[test]
fn test_tabulated_losses_match_power_law() {
    let grid: Vec<f64> = (0..=450).map(|k| 4.0 + 0.01 * k as f64).collect();
    let log_loss = grid.iter().map(|&x| RadiationModel::power_law(x).log10()).collect();
    let table = RadiationTable::new(grid, log_loss).unwrap();

    let mut finals = Vec::new();
    for (power_law, radiation_table) in [(true, None), (false, Some(table))] {
        let mut run = Loop::new(LoopConfig {
            use_power_law_radiative_losses: power_law,
            radiation_table,
            ..quiet_loop_config(200.0, 1.0, SolverType::Rk4)
        })
        .unwrap();

        run.initialize_state().unwrap();
        run.evolve().unwrap();
        finals.push(run.results().sample(199).unwrap());
    }

    assert!(relative_error(finals[1].temperature_e, finals[0].temperature_e) < 1e-2);
    assert!(relative_error(finals[1].density, finals[0].density) < 1e-2);
}

#[test]
fn test_dem_files_match_recorded_steps() {
    let directory = tempdir().unwrap();
    let output = directory.path().join("dem_run.tsv");

    let mut run = Loop::new(LoopConfig {
        output_filename: output.clone(),
        calculate_dem: true,
        dem: Some(DemConfig {
            log_temperature_min: 5.0,
            log_temperature_max: 7.5,
            log_temperature_delta: 0.05,
        }),
        ..quiet_loop_config(100.0, 1.0, SolverType::Rka4)
    })
    .unwrap();

    run.initialize_state().unwrap();
    run.evolve().unwrap();
    run.write_results().unwrap();

    let recorded = run.results().len();
    for extension in ["dem_corona", "dem_tr"] {
        let rows = read_tsv(&directory.path().join(format!("dem_run.tsv.{extension}")));

        // log T grid first, then one row per recorded step
        assert_eq!(rows.len(), recorded + 1);
        assert_eq!(rows[0].len(), 51);
        assert!(rows.iter().all(|row| row.len() == 51));
    }

    let corona = read_tsv(&directory.path().join("dem_run.tsv.dem_corona"));
    assert!(corona[1..].iter().all(|row| row.iter().any(|&v| v > 0.0)));
}

#[test]
fn test_unknown_solver_rejected_at_load() {
    let result = LoopConfig::from_json(r#"{ "solver": "leapfrog", "total_time": 10.0 }"#);
    assert!(matches!(result, Err(LoopError::Config(_))));
}

#[test]
fn test_config_file_round_trip_drives_a_run() {
    let directory = tempdir().unwrap();
    let config_path = directory.path().join("loop.json");
    let output = directory.path().join("from_file.tsv");

    let config = LoopConfig {
        output_filename: output.clone(),
        ..quiet_loop_config(20.0, 1.0, SolverType::Euler)
    };
    std::fs::write(&config_path, config.to_json().unwrap()).unwrap();

    let mut run = Loop::new(LoopConfig::from_file(&config_path).unwrap()).unwrap();
    run.initialize_state().unwrap();
    run.evolve().unwrap();
    run.write_results().unwrap();

    assert_eq!(read_tsv(&output).len(), 20);
}

#[test]
fn test_out_of_order_calls_are_lifecycle_errors() {
    let mut run = Loop::new(quiet_loop_config(5.0, 1.0, SolverType::Rk4)).unwrap();

    assert!(matches!(run.evolve(), Err(LoopError::Lifecycle(_))));
    assert!(matches!(run.write_results(), Err(LoopError::Lifecycle(_))));
    assert_eq!(run.phase(), LoopPhase::Uninitialized);

    run.initialize_state().unwrap();
    run.evolve().unwrap();
    assert!(matches!(run.evolve(), Err(LoopError::Lifecycle(_))));
    assert!(matches!(run.initialize_state(), Err(LoopError::Lifecycle(_))));
}
