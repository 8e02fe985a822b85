//! Beat frequency, Newton's rings and Wien's displacement law.
//!
//! Run with:
//!   cargo run -p spring_mass_examples --example physics_demos [params.toml]

use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Result;
use spring_mass::beats::{simulate_beat_frequency, BeatParameters};
use spring_mass::newton_rings::{dark_ring_radius, simulate_newton_rings, RingParameters};
use spring_mass::report::{write_csv, write_matrix_csv};
use spring_mass::wien::{calculate_temperature, solve_wien_constant, WienParameters};
use spring_mass::ParameterStore;

fn main() -> Result<()> {
    let param_file = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("physics_demos.toml"));
    let mut store = ParameterStore::new(&param_file, "physics_demos")?;

    let out_dir = Path::new("output");
    fs::create_dir_all(out_dir)?;

    // Beats
    let beat_params = BeatParameters::from_store(&mut store, BeatParameters::default())?;
    let beats = simulate_beat_frequency(&beat_params)?;
    write_csv(&mut BufWriter::new(File::create(out_dir.join("beats.csv"))?), &beats)?;
    println!(
        "Beats: {} Hz + {} Hz -> beat frequency {} Hz",
        beat_params.f1, beat_params.f2, beats.beat_frequency
    );

    // Newton's rings
    let ring_params = RingParameters::from_store(&mut store, RingParameters::default())?;
    let (_, intensity) = simulate_newton_rings(&ring_params)?;
    write_matrix_csv(
        &mut BufWriter::new(File::create(out_dir.join("newton_rings.csv"))?),
        &intensity,
    )?;
    let first_dark = dark_ring_radius(0, ring_params.wavelength, ring_params.lens_radius)?;
    println!(
        "Newton's rings: {}x{} grid, first dark ring at r = {:.4} mm",
        intensity.nrows(),
        intensity.ncols(),
        first_dark * 1e3
    );

    // Wien
    let wien_params = WienParameters::from_store(&mut store, WienParameters::default())?;
    let (x, b) = solve_wien_constant(wien_params.x0)?;
    let temperature = calculate_temperature(wien_params.peak_wavelength, wien_params.x0)?;
    println!("Wien: x0 = {}, root x = {x:.6}, b = {b:.6e} m·K", wien_params.x0);
    println!(
        "  Peak at {:.0} nm -> T = {temperature:.0} K",
        wien_params.peak_wavelength * 1e9
    );

    store.save()?;
    Ok(())
}
