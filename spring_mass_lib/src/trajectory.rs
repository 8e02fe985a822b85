use serde::Serialize;

use crate::{OscillatorState, Result, SimulationError};

/// Time-ordered oscillator samples stored column-wise.
///
/// All three columns always have the same length and `time` is strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    time: Vec<f64>,
    position: Vec<f64>,
    velocity: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Trajectory {
            time: Vec::with_capacity(n),
            position: Vec::with_capacity(n),
            velocity: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, t: f64, state: OscillatorState) {
        debug_assert!(self.time.last().map_or(true, |&last| t > last));
        self.time.push(t);
        self.position.push(state.position);
        self.velocity.push(state.velocity);
    }

    pub fn from_columns(time: Vec<f64>, position: Vec<f64>, velocity: Vec<f64>) -> Result<Self> {
        if time.len() != position.len() || time.len() != velocity.len() {
            return Err(SimulationError::invalid_argument(format!(
                "column lengths differ: time {}, position {}, velocity {}",
                time.len(),
                position.len(),
                velocity.len()
            )));
        }
        if time.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimulationError::invalid_argument(
                "time must be strictly increasing",
            ));
        }
        Ok(Trajectory {
            time,
            position,
            velocity,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    pub fn state(&self, i: usize) -> Option<OscillatorState> {
        Some(OscillatorState::new(*self.position.get(i)?, *self.velocity.get(i)?))
    }

    pub fn initial_state(&self) -> Option<OscillatorState> {
        self.state(0)
    }

    pub fn final_state(&self) -> Option<OscillatorState> {
        self.len().checked_sub(1).and_then(|i| self.state(i))
    }

    pub fn samples(&self) -> impl Iterator<Item = (f64, OscillatorState)> + '_ {
        self.time
            .iter()
            .zip(self.position.iter().zip(self.velocity.iter()))
            .map(|(&t, (&x, &v))| (t, OscillatorState::new(x, v)))
    }

    /// `position² + velocity²` at every sample.
    pub fn energy(&self) -> Vec<f64> {
        self.samples().map(|(_, s)| s.energy()).collect()
    }

    /// Energy at the last sample minus energy at the first.
    pub fn energy_drift(&self) -> f64 {
        match (self.initial_state(), self.final_state()) {
            (Some(first), Some(last)) => last.energy() - first.energy(),
            _ => 0.0,
        }
    }
}
