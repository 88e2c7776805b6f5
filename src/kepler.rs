use crate::cfg::KeplerOpts;

/// [KeplerSolution] of the eccentric anomaly equation M = E - e sin(E),
/// along with the solver diagnostics.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly (in radians)
    pub eccentric_anomaly_rad: f64,
    /// Number of Newton iterations that were performed
    pub iterations: usize,
    /// Last correction magnitude (in radians)
    pub last_correction_rad: f64,
    /// False when the iteration cap was reached before
    /// the correction fell below tolerance: the solution
    /// is usable, with degraded accuracy.
    pub converged: bool,
}

/// Solves Kepler's equation for the eccentric anomaly by Newton iteration,
/// seeded at E0 = M + e sin(M).
pub fn solve_eccentric_anomaly(
    mean_anomaly_rad: f64,
    eccentricity: f64,
    opts: &KeplerOpts,
) -> KeplerSolution {
    let m = mean_anomaly_rad;
    let e = eccentricity;

    let mut e_k = m + e * m.sin();
    let mut iterations = 0;

    loop {
        let f = m - (e_k - e * e_k.sin());
        let g = 1.0 - e * e_k.cos();
        let delta = f / g;
        e_k += delta;
        iterations += 1;

        if delta.abs() <= opts.tolerance_rad {
            return KeplerSolution {
                eccentric_anomaly_rad: e_k,
                iterations,
                last_correction_rad: delta.abs(),
                converged: true,
            };
        }

        if iterations >= opts.max_iterations {
            return KeplerSolution {
                eccentric_anomaly_rad: e_k,
                iterations,
                last_correction_rad: delta.abs(),
                converged: false,
            };
        }
    }
}
