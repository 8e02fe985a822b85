//! Explicit Euler against the adaptive reference solver over one period.
//!
//! Run with:
//!   cargo run -p spring_mass_examples --example oscillator_comparison [params.toml]

use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Result;
use spring_mass::report::{write_comparison_json, write_csv};
use spring_mass::{
    ComparisonReport, EulerIntegrator, OscillatorParameters, ParameterStore, ReferenceIntegrator,
};

fn main() -> Result<()> {
    let param_file = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("spring_mass.toml"));

    let mut store = ParameterStore::new(&param_file, "spring_mass")?;
    let params = OscillatorParameters::from_store(&mut store, OscillatorParameters::default())?;

    let euler = EulerIntegrator::try_from(&params)?.run();
    let (reference, stats) = ReferenceIntegrator::try_from(&params)?.run_with_stats()?;
    let report = ComparisonReport::new(euler, reference)?;
    let summary = report.summary();

    println!("Spring-mass oscillator, {} steps over [0, 2π]", params.step_count);
    println!("  Max |Δposition|:         {:.6e}", summary.max_position_error);
    println!("  Max |Δvelocity|:         {:.6e}", summary.max_velocity_error);
    println!("  Euler energy drift:      {:+.6e}", summary.euler_energy_drift);
    println!("  Reference energy drift:  {:+.6e}", summary.reference_energy_drift);
    println!();
    println!("  Reference accepted steps: {}", stats.accepted_steps);
    println!("  Reference rejected steps: {}", stats.rejected_steps);
    println!("  Reference function evals: {}", stats.fn_evals);

    let out_dir = Path::new("output");
    fs::create_dir_all(out_dir)?;

    let csv_path = out_dir.join("oscillator_comparison.csv");
    write_csv(&mut BufWriter::new(File::create(&csv_path)?), &report)?;
    let json_path = out_dir.join("oscillator_comparison.json");
    write_comparison_json(BufWriter::new(File::create(&json_path)?), &report)?;

    println!();
    println!("Wrote {} and {}", csv_path.display(), json_path.display());

    store.save()?;
    Ok(())
}
