use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::Vector2;
use spring_mass_lib::numeric::adaptive::{DormandPrince45, SampledOdeSolver, Tolerances};
use spring_mass_lib::{harmonic_rhs, run_euler, run_reference, OscillatorState, StepCount};

fn bench_euler_1period(c: &mut Criterion) {
    c.bench_function("euler_1period_1000_steps", |b| {
        b.iter(|| run_euler(black_box(1000)).unwrap())
    });
}

fn bench_reference_1period(c: &mut Criterion) {
    c.bench_function("reference_1period_1000_samples", |b| {
        b.iter(|| run_reference(black_box(1000)).unwrap())
    });
}

fn bench_dormand_prince_endpoint(c: &mut Criterion) {
    let times = StepCount::new(1).unwrap().time_grid();
    let y0: Vector2<f64> = OscillatorState::INITIAL.into();

    c.bench_function("dormand_prince_1period_tight", |b| {
        b.iter(|| {
            let mut solver = DormandPrince45::new(Tolerances::new(1e-12, 1e-12));
            solver
                .solve_at(harmonic_rhs, black_box(y0), &times)
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_euler_1period,
    bench_reference_1period,
    bench_dormand_prince_endpoint
);
criterion_main!(benches);
