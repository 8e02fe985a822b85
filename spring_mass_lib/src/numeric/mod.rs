pub mod adaptive;
pub mod ode;

/// `n` evenly spaced samples over `[start, end]`, both ends included.
///
/// `n == 1` yields `[start]`; `n == 0` yields an empty vector. The last sample
/// is pinned to `end` so the endpoint never suffers from accumulated rounding.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut v: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            v[n - 1] = end;
            v
        }
    }
}
