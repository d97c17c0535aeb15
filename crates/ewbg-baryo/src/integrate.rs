//! Adaptive Runge-Kutta-Fehlberg integration with Cash-Karp coefficients.

use serde::{Deserialize, Serialize};

use ewbg_core::{ErrorInfo, EwbgError};

fn default_rel_tol() -> f64 {
    1e-8
}

fn default_abs_tol() -> f64 {
    1e-12
}

fn default_min_step_fraction() -> f64 {
    1e-9
}

fn default_max_evals() -> usize {
    2_000_000
}

/// Integrator tolerances and budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdeOpts {
    /// Relative error tolerance per step.
    #[serde(default = "default_rel_tol")]
    pub rel_tol: f64,
    /// Absolute error tolerance per step.
    #[serde(default = "default_abs_tol")]
    pub abs_tol: f64,
    /// Step floor as a fraction of the full interval; undershooting it is a
    /// stiffness failure.
    #[serde(default = "default_min_step_fraction")]
    pub min_step_fraction: f64,
    /// Hard cap on right-hand-side evaluations.
    #[serde(default = "default_max_evals")]
    pub max_evals: usize,
}

impl Default for OdeOpts {
    fn default() -> Self {
        Self {
            rel_tol: default_rel_tol(),
            abs_tol: default_abs_tol(),
            min_step_fraction: default_min_step_fraction(),
            max_evals: default_max_evals(),
        }
    }
}

/// Accepted-step trajectory of one integration.
#[derive(Debug, Clone, PartialEq)]
pub struct OdeSolution {
    /// Independent variable at each accepted step, in integration order.
    pub ts: Vec<f64>,
    /// State at each accepted step.
    pub ys: Vec<Vec<f64>>,
    /// Right-hand-side evaluations spent.
    pub evals: usize,
}

impl OdeSolution {
    /// Final state of the trajectory.
    pub fn terminal(&self) -> &[f64] {
        self.ys.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Linear interpolation of the state at `t`, clamped to the trajectory
    /// range. Works for both integration directions.
    pub fn sample(&self, t: f64) -> Vec<f64> {
        if self.ts.is_empty() {
            return Vec::new();
        }
        if self.ts.len() == 1 {
            return self.ys[0].clone();
        }
        let ascending = self.ts[self.ts.len() - 1] >= self.ts[0];
        let mut lo = 0;
        let mut hi = self.ts.len() - 1;
        let t_first = self.ts[lo];
        let t_last = self.ts[hi];
        let clamped = if ascending {
            t.clamp(t_first, t_last)
        } else {
            t.clamp(t_last, t_first)
        };
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            let before = if ascending {
                self.ts[mid] <= clamped
            } else {
                self.ts[mid] >= clamped
            };
            if before {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let span = self.ts[hi] - self.ts[lo];
        let w = if span.abs() < 1e-300 {
            0.0
        } else {
            (clamped - self.ts[lo]) / span
        };
        self.ys[lo]
            .iter()
            .zip(&self.ys[hi])
            .map(|(a, b)| a + w * (b - a))
            .collect()
    }
}

// Cash-Karp embedded 4(5) tableau.
const A2: f64 = 1.0 / 5.0;
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [3.0 / 10.0, -9.0 / 10.0, 6.0 / 5.0];
const A5: [f64; 4] = [-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0];
const A6: [f64; 5] = [
    1631.0 / 55296.0,
    175.0 / 512.0,
    575.0 / 13824.0,
    44275.0 / 110592.0,
    253.0 / 4096.0,
];
const B5: [f64; 6] = [
    37.0 / 378.0,
    0.0,
    250.0 / 621.0,
    125.0 / 594.0,
    0.0,
    512.0 / 1771.0,
];
const B4: [f64; 6] = [
    2825.0 / 27648.0,
    0.0,
    18575.0 / 48384.0,
    13525.0 / 55296.0,
    277.0 / 14336.0,
    1.0 / 4.0,
];

const SAFETY: f64 = 0.9;
const SHRINK_LIMIT: f64 = 0.2;
const GROW_LIMIT: f64 = 5.0;

/// Integrates `dy/dt = f(t, y)` from `t0` to `t1` with adaptive step-size
/// control.
///
/// Divergence (non-finite state), stiffness (step floor) and budget
/// exhaustion are reported as [`EwbgError::Transport`] with codes
/// `transport_divergence`, `transport_stiff` and `transport_budget`; the
/// caller treats all three as point-local failures.
pub fn integrate_adaptive<F>(
    rhs: F,
    t0: f64,
    y0: &[f64],
    t1: f64,
    opts: &OdeOpts,
) -> Result<OdeSolution, EwbgError>
where
    F: Fn(f64, &[f64]) -> Vec<f64>,
{
    let n = y0.len();
    let span = t1 - t0;
    if span == 0.0 || n == 0 {
        return Ok(OdeSolution {
            ts: vec![t0],
            ys: vec![y0.to_vec()],
            evals: 0,
        });
    }
    let direction = span.signum();
    let min_step = opts.min_step_fraction * span.abs();

    let mut t = t0;
    let mut y = y0.to_vec();
    let mut h = direction * (span.abs() / 64.0);
    let mut evals = 0usize;
    let mut ts = vec![t0];
    let mut ys = vec![y.clone()];

    while (t1 - t) * direction > 0.0 {
        if (t + h - t1) * direction > 0.0 {
            h = t1 - t;
        }
        if evals + 6 > opts.max_evals {
            return Err(transport_err(
                "transport_budget",
                "integration evaluation budget exhausted",
                t,
                h,
            ));
        }

        let k1 = rhs(t, &y);
        let y2 = advance(&y, &[(&k1, A2)], h);
        let k2 = rhs(t + A2 * h, &y2);
        let y3 = advance(&y, &[(&k1, A3[0]), (&k2, A3[1])], h);
        let k3 = rhs(t + 3.0 / 10.0 * h, &y3);
        let y4 = advance(&y, &[(&k1, A4[0]), (&k2, A4[1]), (&k3, A4[2])], h);
        let k4 = rhs(t + 3.0 / 5.0 * h, &y4);
        let y5 = advance(
            &y,
            &[(&k1, A5[0]), (&k2, A5[1]), (&k3, A5[2]), (&k4, A5[3])],
            h,
        );
        let k5 = rhs(t + h, &y5);
        let y6 = advance(
            &y,
            &[
                (&k1, A6[0]),
                (&k2, A6[1]),
                (&k3, A6[2]),
                (&k4, A6[3]),
                (&k5, A6[4]),
            ],
            h,
        );
        let k6 = rhs(t + 7.0 / 8.0 * h, &y6);
        evals += 6;

        let stages = [&k1, &k2, &k3, &k4, &k5, &k6];
        let mut next = y.clone();
        let mut err_norm = 0.0_f64;
        for i in 0..n {
            let mut high = 0.0;
            let mut low = 0.0;
            for (stage, (b5, b4)) in stages.iter().zip(B5.iter().zip(B4.iter())) {
                high += b5 * stage[i];
                low += b4 * stage[i];
            }
            next[i] = y[i] + h * high;
            let err = h * (high - low);
            let tol = opts.abs_tol + opts.rel_tol * y[i].abs().max(next[i].abs());
            err_norm = err_norm.max((err / tol).abs());
        }

        if !next.iter().all(|v| v.is_finite()) {
            return Err(transport_err(
                "transport_divergence",
                "integration state became non-finite",
                t,
                h,
            ));
        }

        if err_norm <= 1.0 {
            t += h;
            y = next;
            ts.push(t);
            ys.push(y.clone());
            let grow = if err_norm > 1e-30 {
                SAFETY * err_norm.powf(-0.2)
            } else {
                GROW_LIMIT
            };
            h *= grow.min(GROW_LIMIT);
        } else {
            h *= (SAFETY * err_norm.powf(-0.25)).max(SHRINK_LIMIT);
        }

        if h.abs() < min_step {
            return Err(transport_err(
                "transport_stiff",
                "step size fell below the stiffness floor",
                t,
                h,
            ));
        }
    }

    Ok(OdeSolution { ts, ys, evals })
}

fn advance(y: &[f64], stages: &[(&Vec<f64>, f64)], h: f64) -> Vec<f64> {
    let mut out = y.to_vec();
    for (slot, value) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (stage, weight) in stages {
            acc += weight * stage[slot];
        }
        *value += h * acc;
    }
    out
}

fn transport_err(code: &str, message: &str, t: f64, h: f64) -> EwbgError {
    EwbgError::Transport(
        ErrorInfo::new(code, message)
            .with_context("t", format!("{t:.6e}"))
            .with_context("step", format!("{h:.6e}")),
    )
}
