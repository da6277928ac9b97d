//! Performance benchmarks for the loop integrators
//!
//! Compares the three integrators on the coronal loop model itself.
//!
//! # What We're Measuring
//!
//! 1. **Right-hand side**: one evaluation of d(p_e, p_i, n)/dt, the unit
//!    of cost for every method
//!
//! 2. **Fixed-step integrators** (Euler, RK4):
//!    - 1 and 4 evaluations per step
//!    - Time ∝ steps
//!
//! 3. **Adaptive RK4**:
//!    - 12 evaluations per attempt
//!    - Number of steps depends on the tolerance and on how fast the loop
//!      evolves (impulsive heating forces small steps)
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all loop benchmarks
//! cargo bench --bench loop_performance
//!
//! # Only the fixed-step comparison
//! cargo bench --bench loop_performance fixed
//! ```

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use coronal_rs::models::{CoronalLoopModel, Heater, HeatingEvent, RadiationModel};
use coronal_rs::physics::{AbundanceCorrection, Closure, PhysicalModel};
use coronal_rs::solver::{AdaptiveRK4Solver, EulerSolver, RK4Solver, Solver};

fn loop_model(heater: Heater) -> CoronalLoopModel {
    let closure = Closure {
        loop_length: 4.0e9,
        saturation_limit: 1.0 / 6.0,
        c1_cond0: 6.0,
        c1_rad0: 0.6,
        use_c1_loss_correction: true,
        use_c1_grav_correction: true,
        use_spitzer_conductivity: false,
        abundance: AbundanceCorrection::from_helium_ratio(0.075),
    };
    CoronalLoopModel::new(closure, RadiationModel::PowerLaw, Box::new(heater))
}

fn benchmark_right_hand_side(c: &mut Criterion) {
    let model = loop_model(Heater::new(1.0e-3, 0.5));
    let state = model.initial_conditions().state;

    c.bench_function("Right-hand side", |b| {
        b.iter(|| model.compute_physics(black_box(&state), black_box(10.0)))
    });
}

fn benchmark_fixed_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fixed step");
    let model = loop_model(Heater::new(1.0e-3, 0.5));
    let initial = model.initial_conditions().state;

    let solvers: [Box<dyn Solver>; 2] = [Box::new(EulerSolver::new()), Box::new(RK4Solver::new())];

    for steps in [100, 1000, 5000] {
        for solver in &solvers {
            group.bench_with_input(
                BenchmarkId::new(solver.name(), steps),
                &steps,
                |b, &steps| {
                    b.iter(|| {
                        solver
                            .integrate(&model, black_box(initial), steps as f64, 1.0)
                            .unwrap()
                    })
                },
            );
        }
    }

    group.finish();
}

fn benchmark_adaptive(c: &mut Criterion) {
    let mut group = c.benchmark_group("Adaptive RK4");
    group.sample_size(20);

    let model = loop_model(
        Heater::new(1.0e-5, 1.0).with_event(HeatingEvent::triangle(0.0, 200.0, 0.1)),
    );
    let initial = model.initial_conditions().state;

    for tolerance in [1.0e-4, 1.0e-6, 1.0e-8] {
        let solver = AdaptiveRK4Solver::new(tolerance);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{tolerance:e}")),
            &tolerance,
            |b, _| b.iter(|| solver.integrate(&model, black_box(initial), 1000.0, 0.5).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_right_hand_side,
    benchmark_fixed_step,
    benchmark_adaptive
);
criterion_main!(benches);
