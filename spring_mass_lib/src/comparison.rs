use serde::Serialize;

use crate::{run_euler, run_reference, OscillatorState, Result, SimulationError, Trajectory};

/// Euler and reference trajectories side by side.
///
/// Both trajectories are sampled on the same grid, so rows are matched by
/// index. Nothing is resampled or interpolated.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    euler: Trajectory,
    reference: Trajectory,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRow {
    pub time: f64,
    pub euler: OscillatorState,
    pub reference: OscillatorState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub samples: usize,
    pub max_position_error: f64,
    pub max_velocity_error: f64,
    pub euler_energy_drift: f64,
    pub reference_energy_drift: f64,
}

impl ComparisonReport {
    pub fn new(euler: Trajectory, reference: Trajectory) -> Result<Self> {
        if euler.len() != reference.len() {
            return Err(SimulationError::invalid_argument(format!(
                "trajectories have different sample counts: euler {}, reference {}",
                euler.len(),
                reference.len()
            )));
        }
        if let Some(i) = euler
            .time()
            .iter()
            .zip(reference.time())
            .position(|(a, b)| a != b)
        {
            return Err(SimulationError::invalid_argument(format!(
                "time grids differ at sample {i}: euler {}, reference {}",
                euler.time()[i],
                reference.time()[i]
            )));
        }
        Ok(ComparisonReport { euler, reference })
    }

    pub fn euler(&self) -> &Trajectory {
        &self.euler
    }

    pub fn reference(&self) -> &Trajectory {
        &self.reference
    }

    pub fn len(&self) -> usize {
        self.euler.len()
    }

    pub fn is_empty(&self) -> bool {
        self.euler.is_empty()
    }

    /// Rows share one timestamp; [`ComparisonReport::new`] only accepts identical grids.
    pub fn rows(&self) -> impl Iterator<Item = ComparisonRow> + '_ {
        self.euler
            .samples()
            .zip(self.reference.samples())
            .map(|((time, euler), (_, reference))| ComparisonRow {
                time,
                euler,
                reference,
            })
    }

    pub fn max_position_error(&self) -> f64 {
        self.rows()
            .map(|r| (r.euler.position - r.reference.position).abs())
            .fold(0.0, f64::max)
    }

    pub fn max_velocity_error(&self) -> f64 {
        self.rows()
            .map(|r| (r.euler.velocity - r.reference.velocity).abs())
            .fold(0.0, f64::max)
    }

    pub fn summary(&self) -> ComparisonSummary {
        ComparisonSummary {
            samples: self.len(),
            max_position_error: self.max_position_error(),
            max_velocity_error: self.max_velocity_error(),
            euler_energy_drift: self.euler.energy_drift(),
            reference_energy_drift: self.reference.energy_drift(),
        }
    }
}

/// Run both integrators with `step_count` steps and pair up the results.
pub fn compare(step_count: i64) -> Result<ComparisonReport> {
    ComparisonReport::new(run_euler(step_count)?, run_reference(step_count)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grids_coincide() {
        let report = compare(64).unwrap();
        assert_eq!(report.len(), 65);
        assert_eq!(report.euler().time(), report.reference().time());
        for row in report.rows() {
            assert!(row.time >= 0.0);
        }
    }

    #[test]
    fn both_start_from_initial_state() {
        let report = compare(3).unwrap();
        let first = report.rows().next().unwrap();
        assert_eq!(first.time, 0.0);
        assert_eq!(first.euler, OscillatorState::INITIAL);
        assert_eq!(first.reference, OscillatorState::INITIAL);
    }

    #[test]
    fn summary_shows_euler_drift() {
        let summary = compare(100).unwrap().summary();
        assert_eq!(summary.samples, 101);
        assert!(summary.euler_energy_drift > 0.4);
        assert!(summary.reference_energy_drift.abs() < 1e-8);
        assert!(summary.max_position_error > 0.1);
    }

    #[test]
    fn finer_grid_shrinks_discrepancy() {
        let coarse = compare(100).unwrap().max_position_error();
        let fine = compare(1000).unwrap().max_position_error();
        assert!(fine < coarse / 5.0, "coarse {coarse}, fine {fine}");
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let err = ComparisonReport::new(run_euler(4).unwrap(), run_reference(5).unwrap());
        assert!(matches!(err, Err(SimulationError::InvalidArgument(_))));
    }

    #[test]
    fn mismatched_time_grids_rejected() {
        let euler = run_euler(4).unwrap();
        let shifted = Trajectory::from_columns(
            vec![0.0, 10.0, 20.0, 30.0, 40.0],
            euler.position().to_vec(),
            euler.velocity().to_vec(),
        )
        .unwrap();

        let err = ComparisonReport::new(euler, shifted);
        assert!(matches!(err, Err(SimulationError::InvalidArgument(_))));
    }
}
