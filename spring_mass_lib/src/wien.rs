//! Wien's displacement law from the peak condition of Planck's law.
//!
//! With `x = hc / (λ k_B T)` the spectral peak satisfies `5 e^{-x} + x - 5 = 0`.
//! The non-trivial root gives the displacement constant `b = hc / (k_B x)`.

use serde::{Deserialize, Serialize};

use crate::{ParameterStore, ParameterStoreError, Result, SimulationError};

/// Planck constant (J s), exact SI value
pub const PLANCK: f64 = 6.626_070_15e-34;
/// Speed of light in vacuum (m/s)
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Boltzmann constant (J/K)
pub const BOLTZMANN: f64 = 1.380_649e-23;

const MAX_ITERATIONS: usize = 100;
const TOLERANCE: f64 = 1e-14;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WienParameters {
    /// Initial guess for the root
    pub x0: f64,
    /// Peak wavelength (m) to convert into a temperature
    pub peak_wavelength: f64,
}

impl Default for WienParameters {
    fn default() -> Self {
        WienParameters {
            x0: 5.0,
            // Solar spectrum
            peak_wavelength: 502e-9,
        }
    }
}

impl WienParameters {
    pub fn from_store(
        store: &mut ParameterStore,
        default: WienParameters,
    ) -> Result<Self, ParameterStoreError> {
        store.get_parameters("wien", default)
    }
}

pub fn wien_equation(x: f64) -> f64 {
    5.0 * (-x).exp() + x - 5.0
}

fn wien_slope(x: f64) -> f64 {
    1.0 - 5.0 * (-x).exp()
}

/// Newton iteration on [`wien_equation`] from `x0`.
///
/// Returns the root `x` and the displacement constant `b` in m·K. Like any
/// local method the result depends on `x0`: guesses below `ln 5` head to the
/// trivial root `x = 0`, which is reported as [`SimulationError::RootNotFound`].
pub fn solve_wien_constant(x0: f64) -> Result<(f64, f64)> {
    if !x0.is_finite() {
        return Err(SimulationError::invalid_argument(format!(
            "initial guess must be finite, got {x0}"
        )));
    }

    let mut x = x0;
    for iteration in 1..=MAX_ITERATIONS {
        let slope = wien_slope(x);
        if slope == 0.0 || !slope.is_finite() {
            break;
        }

        let next = x - wien_equation(x) / slope;
        if !next.is_finite() {
            break;
        }

        let converged = (next - x).abs() <= TOLERANCE * next.abs().max(1.0);
        x = next;
        if converged {
            if x.abs() < 1e-6 {
                return Err(SimulationError::RootNotFound { x0, iterations: iteration });
            }
            let b = PLANCK * SPEED_OF_LIGHT / (BOLTZMANN * x);
            return Ok((x, b));
        }
    }

    Err(SimulationError::RootNotFound {
        x0,
        iterations: MAX_ITERATIONS,
    })
}

/// Black-body temperature (K) whose spectrum peaks at `wavelength` (m): `T = b / λ`.
pub fn calculate_temperature(wavelength: f64, x0: f64) -> Result<f64> {
    if !(wavelength.is_finite() && wavelength > 0.0) {
        return Err(SimulationError::invalid_argument(format!(
            "wavelength must be positive, got {wavelength}"
        )));
    }
    let (_, b) = solve_wien_constant(x0)?;
    Ok(b / wavelength)
}
