use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::{
    harmonic_rhs,
    numeric::{
        adaptive::{DormandPrince45, SampledOdeSolver, Stats, Tolerances},
        ode::{ForwardEuler, ODESolver},
    },
    OscillatorState, ParameterStore, ParameterStoreError, Result, StepCount, Trajectory,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorParameters {
    pub step_count: i64,
    /// Absolute tolerance of the reference solver
    pub atol: f64,
    /// Relative tolerance of the reference solver
    pub rtol: f64,
}

impl Default for OscillatorParameters {
    fn default() -> Self {
        let tol = Tolerances::default();
        OscillatorParameters {
            step_count: 100,
            atol: tol.atol,
            rtol: tol.rtol,
        }
    }
}

impl OscillatorParameters {
    pub fn from_store(
        store: &mut ParameterStore,
        default: OscillatorParameters,
    ) -> Result<Self, ParameterStoreError> {
        store.get_parameters("oscillator", default)
    }

    pub fn tolerances(&self) -> Tolerances {
        Tolerances::new(self.atol, self.rtol)
    }
}

/// Fixed-step explicit Euler over one period.
///
/// Each step is `x' = x + v dt`, `v' = v - x dt` with both right-hand sides
/// taken at the start of the step. This is the plain, non-symplectic method:
/// the energy `x² + v²` grows by a factor `1 + dt²` every step.
#[derive(Debug, Clone)]
pub struct EulerIntegrator {
    step_count: StepCount,
}

impl EulerIntegrator {
    pub fn new(step_count: i64) -> Result<Self> {
        Ok(EulerIntegrator {
            step_count: StepCount::new(step_count)?,
        })
    }

    pub fn step_count(&self) -> StepCount {
        self.step_count
    }

    pub fn run(&self) -> Trajectory {
        let dt = self.step_count.time_step();
        let time = self.step_count.time_grid();

        let mut trajectory = Trajectory::with_capacity(time.len());
        let mut y: Vector2<f64> = OscillatorState::INITIAL.into();
        trajectory.push(time[0], y.into());

        for w in time.windows(2) {
            y = ForwardEuler::solve(harmonic_rhs, w[0], dt, y);
            trajectory.push(w[1], y.into());
        }

        trajectory
    }
}

/// Adaptive Dormand–Prince reference solution sampled on the same grid as
/// [`EulerIntegrator`].
#[derive(Debug, Clone)]
pub struct ReferenceIntegrator {
    step_count: StepCount,
    tolerances: Tolerances,
}

impl ReferenceIntegrator {
    pub fn new(step_count: i64) -> Result<Self> {
        Ok(ReferenceIntegrator {
            step_count: StepCount::new(step_count)?,
            tolerances: Tolerances::default(),
        })
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn step_count(&self) -> StepCount {
        self.step_count
    }

    pub fn tolerances(&self) -> Tolerances {
        self.tolerances
    }

    pub fn run(&self) -> Result<Trajectory> {
        Ok(self.run_with_stats()?.0)
    }

    /// Like [`ReferenceIntegrator::run`], also returning the solver's step statistics.
    pub fn run_with_stats(&self) -> Result<(Trajectory, Stats)> {
        let time = self.step_count.time_grid();

        let y0: Vector2<f64> = OscillatorState::INITIAL.into();
        let mut solver = DormandPrince45::new(self.tolerances);
        let states = solver.solve_at(harmonic_rhs, y0, &time)?;

        let mut trajectory = Trajectory::with_capacity(time.len());
        for (&t, y) in time.iter().zip(states) {
            trajectory.push(t, y.into());
        }

        Ok((trajectory, solver.stats))
    }
}

impl TryFrom<&OscillatorParameters> for EulerIntegrator {
    type Error = crate::SimulationError;

    fn try_from(params: &OscillatorParameters) -> Result<Self> {
        EulerIntegrator::new(params.step_count)
    }
}

impl TryFrom<&OscillatorParameters> for ReferenceIntegrator {
    type Error = crate::SimulationError;

    fn try_from(params: &OscillatorParameters) -> Result<Self> {
        Ok(ReferenceIntegrator::new(params.step_count)?.with_tolerances(params.tolerances()))
    }
}

/// Explicit Euler trajectory with `step_count + 1` samples over `[0, 2π]`.
pub fn run_euler(step_count: i64) -> Result<Trajectory> {
    Ok(EulerIntegrator::new(step_count)?.run())
}

/// Reference trajectory with `step_count + 1` samples over `[0, 2π]`.
pub fn run_reference(step_count: i64) -> Result<Trajectory> {
    ReferenceIntegrator::new(step_count)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SimulationError, PERIOD};

    #[test]
    fn euler_matches_literal_recurrence_bit_for_bit() {
        let n = 37;
        let dt = PERIOD / n as f64;

        let mut x = vec![0.0; n + 1];
        let mut v = vec![0.0; n + 1];
        v[0] = 1.0;
        for i in 0..n {
            x[i + 1] = x[i] + v[i] * dt;
            v[i + 1] = v[i] - x[i] * dt;
        }

        let tr = run_euler(n as i64).unwrap();
        assert_eq!(tr.position(), &x[..]);
        assert_eq!(tr.velocity(), &v[..]);
    }

    #[test]
    fn euler_four_steps() {
        let tr = run_euler(4).unwrap();
        let half_pi = std::f64::consts::FRAC_PI_2;

        let expected = [
            0.0,
            half_pi,
            2.0 * half_pi,
            0.836_604_395_347_212_6,
            -9.219_953_032_970_322,
        ];
        for (got, want) in tr.position().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} != {want}");
        }
        assert_eq!(tr.velocity()[1], 1.0);
    }

    #[test]
    fn euler_energy_grows_every_step() {
        let tr = run_euler(100).unwrap();
        let dt = PERIOD / 100.0;
        let energy = tr.energy();

        for w in energy.windows(2) {
            assert!(w[1] > w[0]);
            assert!((w[1] / w[0] - (1.0 + dt * dt)).abs() < 1e-12);
        }
        assert!(energy[100] > 1.0);
    }

    #[test]
    fn euler_is_deterministic() {
        assert_eq!(run_euler(50).unwrap(), run_euler(50).unwrap());
    }

    #[test]
    fn invalid_step_counts() {
        for n in [0, -5] {
            assert!(matches!(run_euler(n), Err(SimulationError::InvalidArgument(_))));
            assert!(matches!(
                run_reference(n),
                Err(SimulationError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn reference_tracks_analytic_solution() {
        let tr = run_reference(100).unwrap();
        let last = tr.final_state().unwrap();

        assert!((last.position - PERIOD.sin()).abs() < 1e-6);
        assert!((last.velocity - PERIOD.cos()).abs() < 1e-6);

        for (t, s) in tr.samples() {
            let exact = OscillatorState::exact(t);
            assert!((s.position - exact.position).abs() < 1e-7, "t = {t}");
            assert!((s.velocity - exact.velocity).abs() < 1e-7, "t = {t}");
        }
    }

    #[test]
    fn reference_conserves_energy() {
        let tr = run_reference(100).unwrap();
        assert!(tr.energy().iter().all(|e| (e - 1.0).abs() < 1e-8));
    }

    #[test]
    fn reference_reports_solver_statistics() {
        let (tr, stats) = ReferenceIntegrator::new(10).unwrap().run_with_stats().unwrap();
        assert_eq!(tr.len(), 11);
        assert!(stats.accepted_steps >= 10);
        assert!(stats.fn_evals > 0);
    }

    #[test]
    fn looser_tolerance_is_still_sampled_on_grid() {
        let integ = ReferenceIntegrator::new(20)
            .unwrap()
            .with_tolerances(Tolerances::new(1e-4, 1e-4));
        let tr = integ.run().unwrap();
        assert_eq!(tr.time(), &integ.step_count().time_grid()[..]);
    }

    #[test]
    fn integrators_from_parameters() {
        let params = OscillatorParameters {
            step_count: 12,
            ..Default::default()
        };
        let euler = EulerIntegrator::try_from(&params).unwrap();
        let reference = ReferenceIntegrator::try_from(&params).unwrap();
        assert_eq!(euler.step_count().samples(), 13);
        assert_eq!(reference.tolerances(), params.tolerances());

        let bad = OscillatorParameters {
            step_count: 0,
            ..Default::default()
        };
        assert!(EulerIntegrator::try_from(&bad).is_err());
    }
}
