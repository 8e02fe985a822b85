//! Superposition of two sine waves of nearby frequency.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::{numeric::linspace, ParameterStore, ParameterStoreError, Result, SimulationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatParameters {
    /// Frequency of the first wave (Hz)
    pub f1: f64,
    /// Frequency of the second wave (Hz)
    pub f2: f64,
    pub a1: f64,
    pub a2: f64,
    pub t_start: f64,
    pub t_end: f64,
    pub num_points: usize,
}

impl Default for BeatParameters {
    fn default() -> Self {
        BeatParameters {
            f1: 440.0,
            f2: 444.0,
            a1: 1.0,
            a2: 1.0,
            t_start: 0.0,
            t_end: 1.0,
            num_points: 5000,
        }
    }
}

impl BeatParameters {
    pub fn from_store(
        store: &mut ParameterStore,
        default: BeatParameters,
    ) -> Result<Self, ParameterStoreError> {
        store.get_parameters("beats", default)
    }

    fn validate(&self) -> Result<()> {
        let values = [self.f1, self.f2, self.a1, self.a2, self.t_start, self.t_end];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SimulationError::invalid_argument(
                "beat parameters must be finite",
            ));
        }
        if self.num_points == 0 {
            return Err(SimulationError::invalid_argument(
                "num_points must be at least 1",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatSignal {
    pub time: Vec<f64>,
    pub wave1: Vec<f64>,
    pub wave2: Vec<f64>,
    pub superposed: Vec<f64>,
    /// `|f1 - f2|` in Hz
    pub beat_frequency: f64,
}

pub fn simulate_beat_frequency(params: &BeatParameters) -> Result<BeatSignal> {
    params.validate()?;

    let time = linspace(params.t_start, params.t_end, params.num_points);
    let wave = |a: f64, f: f64| -> Vec<f64> {
        time.iter().map(|t| a * (TAU * f * t).sin()).collect()
    };

    let wave1 = wave(params.a1, params.f1);
    let wave2 = wave(params.a2, params.f2);
    let superposed = wave1.iter().zip(&wave2).map(|(a, b)| a + b).collect();

    Ok(BeatSignal {
        time,
        wave1,
        wave2,
        superposed,
        beat_frequency: (params.f1 - params.f2).abs(),
    })
}
