use std::f64::consts::TAU;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::{Result, SimulationError};

/// Length of the integration window, one period of the unit oscillator.
pub const PERIOD: f64 = TAU;

/// Instantaneous state of the unit-mass, unit-stiffness oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorState {
    pub position: f64,
    pub velocity: f64,
}

impl OscillatorState {
    pub const INITIAL: OscillatorState = OscillatorState {
        position: 0.0,
        velocity: 1.0,
    };

    pub fn new(position: f64, velocity: f64) -> Self {
        OscillatorState { position, velocity }
    }

    /// `position² + velocity²`, conserved by the exact solution.
    pub fn energy(&self) -> f64 {
        self.position * self.position + self.velocity * self.velocity
    }

    /// Closed-form solution from [`OscillatorState::INITIAL`]: `(sin t, cos t)`.
    pub fn exact(t: f64) -> Self {
        OscillatorState::new(t.sin(), t.cos())
    }
}

impl From<Vector2<f64>> for OscillatorState {
    fn from(v: Vector2<f64>) -> Self {
        OscillatorState::new(v[0], v[1])
    }
}

impl From<OscillatorState> for Vector2<f64> {
    fn from(s: OscillatorState) -> Self {
        Vector2::new(s.position, s.velocity)
    }
}

/// Right-hand side of `x'' = -x` written as a first order system: `(x, v) -> (v, -x)`.
///
/// `t` is unused; it is kept so the function has the shape solvers expect.
pub fn derivative(state: OscillatorState, _t: f64) -> OscillatorState {
    OscillatorState {
        position: state.velocity,
        velocity: -state.position,
    }
}

/// [`derivative`] with the `(t, y)` vector calling convention of the ODE solvers.
pub fn harmonic_rhs(t: f64, y: Vector2<f64>) -> Vector2<f64> {
    derivative(y.into(), t).into()
}

/// Number of fixed steps taken over `[0, PERIOD]`. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepCount(usize);

impl StepCount {
    pub fn new(step_count: i64) -> Result<Self> {
        if step_count <= 0 {
            return Err(SimulationError::invalid_argument(format!(
                "step count must be positive, got {step_count}"
            )));
        }
        let n = usize::try_from(step_count).map_err(|_| {
            SimulationError::invalid_argument(format!("step count {step_count} is too large"))
        })?;
        StepCount::from_steps(n)
    }

    /// The sample count `n + 1` must fit in a `usize`.
    fn from_steps(n: usize) -> Result<Self> {
        if n.checked_add(1).is_none() {
            return Err(SimulationError::invalid_argument(format!(
                "step count {n} is too large"
            )));
        }
        Ok(StepCount(n))
    }

    /// Number of trajectory samples, the initial state included.
    pub fn samples(&self) -> usize {
        self.0 + 1
    }

    pub fn time_step(&self) -> f64 {
        PERIOD / self.0 as f64
    }

    /// `time[i] = i * time_step` for `i` in `0..=step_count`.
    pub fn time_grid(&self) -> Vec<f64> {
        let dt = self.time_step();
        (0..self.samples()).map(|i| i as f64 * dt).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_swaps_and_negates() {
        let d = derivative(OscillatorState::new(2.0, -3.0), 123.0);
        assert_eq!(d, OscillatorState::new(-3.0, -2.0));
    }

    #[test]
    fn derivative_ignores_time() {
        let s = OscillatorState::new(0.7, 0.1);
        assert_eq!(derivative(s, 0.0), derivative(s, -1e9));
    }

    #[test]
    fn vector_form_matches_state_form() {
        let y = Vector2::new(0.3, 0.9);
        let d: OscillatorState = harmonic_rhs(0.0, y).into();
        assert_eq!(d, derivative(y.into(), 0.0));
    }

    #[test]
    fn step_count_rejects_non_positive() {
        for n in [0, -1, -5, i64::MIN] {
            assert!(matches!(
                StepCount::new(n),
                Err(SimulationError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn step_count_leaves_room_for_samples() {
        assert!(matches!(
            StepCount::from_steps(usize::MAX),
            Err(SimulationError::InvalidArgument(_))
        ));
        assert_eq!(StepCount::from_steps(usize::MAX - 1).unwrap().samples(), usize::MAX);
    }

    #[test]
    fn time_grid_shape() {
        let n = StepCount::new(8).unwrap();
        let grid = n.time_grid();
        assert_eq!(grid.len(), 9);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[4], 4.0 * (PERIOD / 8.0));
        assert!((grid[8] - PERIOD).abs() < 1e-12);
    }

    #[test]
    fn initial_energy_is_one() {
        assert_eq!(OscillatorState::INITIAL.energy(), 1.0);
        assert!((OscillatorState::exact(1.234).energy() - 1.0).abs() < 1e-15);
    }
}
