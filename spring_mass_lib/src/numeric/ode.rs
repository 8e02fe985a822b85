use nalgebra::SVector;

/// Single fixed-size step of an explicit one-step method.
pub trait ODESolver<T> {
    fn solve<const D: usize, F>(f: F, t0: T, dt: T, y0: SVector<T, D>) -> SVector<T, D>
    where
        F: Fn(T, SVector<T, D>) -> SVector<T, D>;
}

/// Explicit (forward) Euler: `y1 = y0 + f(t0, y0) * dt`.
///
/// Every component of the derivative is evaluated at the start of the step,
/// so no component ever sees an already-updated value.
pub struct ForwardEuler;

impl ODESolver<f64> for ForwardEuler {
    fn solve<const D: usize, F>(f: F, t0: f64, dt: f64, y0: SVector<f64, D>) -> SVector<f64, D>
    where
        F: Fn(f64, SVector<f64, D>) -> SVector<f64, D>,
    {
        y0 + f(t0, y0) * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    #[test]
    fn forward_euler_uses_start_of_step_derivative() {
        let f = |_t: f64, y: Vector2<f64>| Vector2::new(y[1], -y[0]);
        let y1 = ForwardEuler::solve(f, 0.0, 0.5, Vector2::new(2.0, 1.0));

        assert_eq!(y1[0], 2.0 + 1.0 * 0.5);
        assert_eq!(y1[1], 1.0 - 2.0 * 0.5);
    }

    #[test]
    fn forward_euler_exact_for_constant_rate() {
        let f = |_t: f64, _y: Vector2<f64>| Vector2::new(3.0, -1.0);
        let y1 = ForwardEuler::solve(f, 10.0, 0.25, Vector2::zeros());

        assert_eq!(y1, Vector2::new(0.75, -0.25));
    }
}
