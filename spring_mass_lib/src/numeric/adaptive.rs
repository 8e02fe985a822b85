//! Dormand–Prince 5(4) embedded Runge–Kutta solver with adaptive step size.
//!
//! The solver advances with its own step-size control and clips steps so that
//! every requested output time is landed on exactly. No interpolation is
//! performed: each returned state is a true integrator state.
//!
//! Reference: Dormand, J.R. & Prince, P.J. (1980). "A family of embedded
//! Runge-Kutta formulae". J. Comp. Appl. Math. 6(1).

use nalgebra::SVector;
use thiserror::Error;

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th order weights (also row 7 of the tableau)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// b - b_hat, where b_hat are the embedded 4th order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

/// Number of right-hand side evaluations per attempted step.
const STAGES: u64 = 7;

/// Sampled initial-value solver: integrate from `times[0]` and report the state
/// at every requested time.
pub trait SampledOdeSolver {
    fn solve_at<const D: usize, F>(
        &mut self,
        f: F,
        y0: SVector<f64, D>,
        times: &[f64],
    ) -> Result<Vec<SVector<f64, D>>, IntegrationError>
    where
        F: Fn(f64, SVector<f64, D>) -> SVector<f64, D>;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Step size {h} too small at t = {t}")]
    StepSizeTooSmall { t: f64, h: f64 },

    #[error("Maximum number of integration steps ({max_steps}) exceeded")]
    MaxStepsExceeded { max_steps: u64 },

    #[error("Non-finite state at t = {t}")]
    NonFiniteState { t: f64 },
}

/// Error is scaled per component by `atol + rtol * max(|y_old|, |y_new|)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub atol: f64,
    pub rtol: f64,
}

impl Tolerances {
    pub fn new(atol: f64, rtol: f64) -> Self {
        Tolerances { atol, rtol }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances::new(1e-10, 1e-10)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub fn_evals: u64,
    pub accepted_steps: u64,
    pub rejected_steps: u64,
}

/// I-controller: `h_new = safety * h * err^(-1/5)`, clamped to `[min_factor, max_factor] * h`.
#[derive(Debug, Clone)]
pub struct StepController {
    pub safety: f64,
    pub max_factor: f64,
    pub min_factor: f64,
    exponent: f64,
}

impl Default for StepController {
    fn default() -> Self {
        StepController {
            safety: 0.9,
            max_factor: 5.0,
            min_factor: 0.2,
            // 1/(q+1) with q = 4, the order of the embedded estimate
            exponent: 1.0 / 5.0,
        }
    }
}

impl StepController {
    pub fn compute_factor(&self, error: f64) -> f64 {
        if error == 0.0 {
            return self.max_factor;
        }

        let factor = self.safety * error.powf(-self.exponent);
        factor.clamp(self.min_factor, self.max_factor)
    }
}

struct StepAttempt<const D: usize> {
    y: SVector<f64, D>,
    h_next: f64,
    accepted: bool,
    /// The error estimate itself was NaN.
    indeterminate: bool,
}

#[derive(Debug, Clone)]
pub struct DormandPrince45 {
    tol: Tolerances,
    controller: StepController,
    pub h_min: f64,
    pub h_max: f64,
    /// Initial step guess. When unset, a hundredth of the first output interval is used.
    pub h_initial: Option<f64>,
    /// Step attempts allowed between two consecutive output times.
    pub max_steps: u64,
    pub stats: Stats,
}

impl DormandPrince45 {
    pub fn new(tol: Tolerances) -> Self {
        DormandPrince45 {
            tol,
            controller: StepController::default(),
            h_min: 1e-14,
            h_max: f64::INFINITY,
            h_initial: None,
            max_steps: 1_000_000,
            stats: Stats::default(),
        }
    }

    #[allow(clippy::needless_range_loop)]
    fn step<const D: usize, F>(
        &mut self,
        f: &F,
        t: f64,
        y: &SVector<f64, D>,
        h: f64,
    ) -> StepAttempt<D>
    where
        F: Fn(f64, SVector<f64, D>) -> SVector<f64, D>,
    {
        let k1 = f(t, *y);
        let k2 = f(t + C2 * h, y + k1 * (A21 * h));
        let k3 = f(t + C3 * h, y + (k1 * A31 + k2 * A32) * h);
        let k4 = f(t + C4 * h, y + (k1 * A41 + k2 * A42 + k3 * A43) * h);
        let k5 = f(
            t + C5 * h,
            y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h,
        );
        let k6 = f(
            t + h,
            y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h,
        );
        let y_new = y + (k1 * B1 + k3 * B3 + k4 * B4 + k5 * B5 + k6 * B6) * h;
        let k7 = f(t + h, y_new);

        let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;

        let mut error: f64 = 0.0;
        let mut indeterminate = false;
        for n in 0..D {
            let scale = self.tol.atol + self.tol.rtol * y[n].abs().max(y_new[n].abs());
            let e = err[n].abs() / scale;
            if e.is_nan() {
                indeterminate = true;
                break;
            }
            error = error.max(e);
        }

        let accepted = !indeterminate && error <= 1.0;
        let h_next = if indeterminate {
            h
        } else {
            (h * self.controller.compute_factor(error)).clamp(self.h_min, self.h_max)
        };

        self.stats.fn_evals += STAGES;
        if accepted {
            self.stats.accepted_steps += 1;
        } else {
            self.stats.rejected_steps += 1;
        }

        StepAttempt {
            y: y_new,
            h_next,
            accepted,
            indeterminate,
        }
    }

    fn validate_inputs<const D: usize>(
        &self,
        y0: &SVector<f64, D>,
        times: &[f64],
    ) -> Result<(), IntegrationError> {
        if let Some(i) = y0.iter().position(|v| !v.is_finite()) {
            return Err(IntegrationError::InvalidInput {
                message: format!("y0[{i}] is not finite"),
            });
        }
        if let Some(i) = times.iter().position(|t| !t.is_finite()) {
            return Err(IntegrationError::InvalidInput {
                message: format!("output time {i} is not finite"),
            });
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(IntegrationError::InvalidInput {
                message: format!("output times must be strictly increasing (index {})", i + 1),
            });
        }
        if let Some(h0) = self.h_initial {
            if !h0.is_finite() || h0 <= 0.0 {
                return Err(IntegrationError::InvalidInput {
                    message: "initial step must be positive and finite".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl SampledOdeSolver for DormandPrince45 {
    fn solve_at<const D: usize, F>(
        &mut self,
        f: F,
        y0: SVector<f64, D>,
        times: &[f64],
    ) -> Result<Vec<SVector<f64, D>>, IntegrationError>
    where
        F: Fn(f64, SVector<f64, D>) -> SVector<f64, D>,
    {
        self.validate_inputs(&y0, times)?;

        let Some((&t0, targets)) = times.split_first() else {
            return Ok(Vec::new());
        };

        let mut out = Vec::with_capacity(times.len());
        out.push(y0);

        let mut t = t0;
        let mut y = y0;
        let mut h = match (self.h_initial, targets.first()) {
            (Some(h0), _) => h0,
            (None, Some(t1)) => 0.01 * (t1 - t0),
            (None, None) => return Ok(out),
        }
        .clamp(self.h_min, self.h_max);

        for &target in targets {
            let mut step_count = 0u64;
            while t < target {
                let remaining = target - t;
                let clipped = h >= remaining;
                let h_try = if clipped { remaining } else { h };

                let attempt = self.step(&f, t, &y, h_try);
                if attempt.indeterminate {
                    return Err(IntegrationError::NonFiniteState { t: t + h_try });
                }

                if attempt.accepted {
                    // Land exactly on the requested time
                    t = if clipped { target } else { t + h_try };
                    y = attempt.y;
                    if !y.iter().all(|v| v.is_finite()) {
                        return Err(IntegrationError::NonFiniteState { t });
                    }
                }

                step_count += 1;
                if step_count > self.max_steps {
                    return Err(IntegrationError::MaxStepsExceeded {
                        max_steps: self.max_steps,
                    });
                }

                if !attempt.accepted && h_try <= self.h_min {
                    return Err(IntegrationError::StepSizeTooSmall {
                        t,
                        h: attempt.h_next,
                    });
                }

                // A clipped, accepted step says nothing about how large the
                // next step may be; keep the unclipped size in that case.
                h = if attempt.accepted && clipped {
                    h.max(attempt.h_next)
                } else {
                    attempt.h_next
                };
            }
            out.push(y);
        }

        Ok(out)
    }
}
