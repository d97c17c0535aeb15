use serde::{Deserialize, Serialize};

use ewbg_core::FieldPoint;

/// Convergence classification of a minimizer result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MinimizeStatus {
    /// The point satisfies the first-order condition and the Hessian is
    /// positive semi-definite within tolerance.
    Converged,
    /// The iteration or evaluation budget ran out, or backends disagreed.
    NotConverged,
    /// The first-order condition holds but the Hessian has a negative
    /// direction: a saddle or maximum, to be rejected by the caller.
    Degenerate,
}

impl MinimizeStatus {
    /// Short stable label used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            MinimizeStatus::Converged => "converged",
            MinimizeStatus::NotConverged => "not-converged",
            MinimizeStatus::Degenerate => "degenerate",
        }
    }
}

/// Outcome of a single minimization attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizationResult {
    /// Candidate minimum.
    pub point: FieldPoint,
    /// Potential value at the candidate.
    pub value: f64,
    /// Euclidean norm of the gradient at the candidate.
    pub gradient_norm: f64,
    /// Convergence classification.
    pub status: MinimizeStatus,
    /// Number of potential evaluations consumed by the attempt.
    pub evaluations: usize,
}

impl MinimizationResult {
    /// True when the result can be used as a vacuum candidate.
    pub fn is_converged(&self) -> bool {
        self.status == MinimizeStatus::Converged
    }
}

/// Smallest eigenvalue of a symmetric matrix via cyclic Jacobi rotations.
///
/// The matrices here are tiny (one row per scalar field), so the quadratic
/// sweep cost is irrelevant; what matters is that the routine is allocation
/// light and has no external dependency.
pub fn smallest_eigenvalue(matrix: &[Vec<f64>]) -> f64 {
    let n = matrix.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return matrix[0][0];
    }
    let mut a: Vec<Vec<f64>> = matrix.to_vec();

    for _sweep in 0..64 {
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[p][q] * a[p][q];
            }
        }
        if off.sqrt() < 1e-12 * frobenius(&a).max(1.0) {
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q].abs() < 1e-300 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                for k in 0..n {
                    let akp = a[k][p];
                    let akq = a[k][q];
                    a[k][p] = c * akp - s * akq;
                    a[k][q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[p][k];
                    let aqk = a[q][k];
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
            }
        }
    }

    (0..n).map(|i| a[i][i]).fold(f64::INFINITY, f64::min)
}

fn frobenius(a: &[Vec<f64>]) -> f64 {
    a.iter()
        .flat_map(|row| row.iter())
        .map(|x| x * x)
        .sum::<f64>()
        .sqrt()
}
