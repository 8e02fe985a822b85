//! Newton's rings: thin-film interference between a plano-convex lens and a flat plate.

use std::f64::consts::TAU;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{numeric::linspace, ParameterStore, ParameterStoreError, Result, SimulationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingParameters {
    /// Light wavelength (m), He-Ne laser by default
    pub wavelength: f64,
    /// Radius of curvature of the lens (m)
    pub lens_radius: f64,
    /// Half side length of the square observation window (m)
    pub half_width: f64,
    /// Samples per axis
    pub resolution: usize,
}

impl Default for RingParameters {
    fn default() -> Self {
        RingParameters {
            wavelength: 632.8e-9,
            lens_radius: 0.1,
            half_width: 1e-3,
            resolution: 1000,
        }
    }
}

impl RingParameters {
    pub fn from_store(
        store: &mut ParameterStore,
        default: RingParameters,
    ) -> Result<Self, ParameterStoreError> {
        store.get_parameters("newton_rings", default)
    }
}

/// Square sampling grid. `r[(row, col)]` is the distance of `(x[col], y[row])` from the center.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub r: DMatrix<f64>,
}

pub fn generate_grid(half_width: f64, resolution: usize) -> Result<RadialGrid> {
    if !(half_width.is_finite() && half_width > 0.0) {
        return Err(SimulationError::invalid_argument(format!(
            "half width must be positive, got {half_width}"
        )));
    }
    if resolution == 0 {
        return Err(SimulationError::invalid_argument(
            "resolution must be at least 1",
        ));
    }

    let x = linspace(-half_width, half_width, resolution);
    let y = x.clone();
    let r = DMatrix::from_fn(resolution, resolution, |row, col| x[col].hypot(y[row]));

    Ok(RadialGrid { x, y, r })
}

fn check_optics(wavelength: f64, lens_radius: f64) -> Result<()> {
    if !(wavelength.is_finite() && wavelength > 0.0) {
        return Err(SimulationError::invalid_argument(format!(
            "wavelength must be positive, got {wavelength}"
        )));
    }
    if !(lens_radius.is_finite() && lens_radius > 0.0) {
        return Err(SimulationError::invalid_argument(format!(
            "lens radius must be positive, got {lens_radius}"
        )));
    }
    Ok(())
}

/// Normalised intensity `I/I0 = (1 + cos φ) / 2`.
///
/// The air gap at radius `r` is `d = r² / 2R`, and light crosses it twice,
/// so `φ = (2π/λ) · 2d`.
pub fn calculate_intensity(
    r: &DMatrix<f64>,
    wavelength: f64,
    lens_radius: f64,
) -> Result<DMatrix<f64>> {
    check_optics(wavelength, lens_radius)?;

    Ok(r.map(|r| {
        let gap = r * r / (2.0 * lens_radius);
        let phase = TAU / wavelength * (2.0 * gap);
        (1.0 + phase.cos()) / 2.0
    }))
}

/// Radius of the `order`-th dark ring (`order = 0` is the innermost), where `φ = (2m + 1)π`.
pub fn dark_ring_radius(order: u32, wavelength: f64, lens_radius: f64) -> Result<f64> {
    check_optics(wavelength, lens_radius)?;
    Ok(((f64::from(order) + 0.5) * wavelength * lens_radius).sqrt())
}

/// Grid and intensity for `params` in one go.
pub fn simulate_newton_rings(params: &RingParameters) -> Result<(RadialGrid, DMatrix<f64>)> {
    let grid = generate_grid(params.half_width, params.resolution)?;
    let intensity = calculate_intensity(&grid.r, params.wavelength, params.lens_radius)?;
    Ok((grid, intensity))
}
