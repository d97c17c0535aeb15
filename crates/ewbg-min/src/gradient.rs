use ewbg_core::{EwbgError, FieldPoint, PotentialModel};

use crate::backend::{check_inputs, project, LocalBackend, MinimizeOpts};
use crate::result::{MinimizationResult, MinimizeStatus};

/// Quasi-Newton local refiner: BFGS updates with Armijo backtracking.
///
/// The inverse-Hessian estimate keeps the search well conditioned on the
/// nearly flat ridges a thermal potential develops close to degeneracy,
/// where plain steepest descent crawls.
#[derive(Debug, Default, Clone, Copy)]
pub struct GradientDescentBackend;

const ARMIJO_C1: f64 = 1e-4;
const BACKTRACK_SHRINK: f64 = 0.5;
const MAX_BACKTRACKS: usize = 40;

impl LocalBackend for GradientDescentBackend {
    fn name(&self) -> &'static str {
        "bfgs"
    }

    fn refine(
        &self,
        model: &dyn PotentialModel,
        temperature: f64,
        start: &FieldPoint,
        bounds: &[(f64, f64)],
        opts: &MinimizeOpts,
    ) -> Result<MinimizationResult, EwbgError> {
        check_inputs(self.name(), model, start, bounds)?;
        let n = model.n_fields();

        let mut point = start.clone();
        project(&mut point, bounds);
        let mut value = model.v_eff(&point, temperature);
        let mut grad = model.gradient(&point, temperature);
        // Evaluation budget proxy: a finite-difference gradient costs 2n calls.
        let mut evals = 1 + 2 * n;

        let mut inv_hess = identity(n);
        let mut status = MinimizeStatus::NotConverged;

        for _iter in 0..opts.max_iterations {
            let grad_norm = grad.norm();
            if grad_norm <= opts.gradient_tolerance * (1.0 + value.abs()) {
                status = MinimizeStatus::Converged;
                break;
            }
            if evals >= opts.max_evaluations {
                break;
            }

            let mut direction = mat_vec(&inv_hess, grad.coords());
            for slot in direction.iter_mut() {
                *slot = -*slot;
            }
            let mut slope: f64 = direction
                .iter()
                .zip(grad.coords())
                .map(|(d, g)| d * g)
                .sum();
            if !slope.is_finite() || slope >= 0.0 {
                // Curvature estimate broke down; restart from steepest descent.
                inv_hess = identity(n);
                for (slot, g) in direction.iter_mut().zip(grad.coords()) {
                    *slot = -g;
                }
                slope = -grad_norm * grad_norm;
            }

            let mut step = 1.0;
            let mut accepted = None;
            for _bt in 0..MAX_BACKTRACKS {
                let mut trial = point.clone();
                for dir in 0..n {
                    trial[dir] += step * direction[dir];
                }
                project(&mut trial, bounds);
                let trial_value = model.v_eff(&trial, temperature);
                evals += 1;
                if trial_value.is_finite() && trial_value <= value + ARMIJO_C1 * step * slope {
                    accepted = Some((trial, trial_value));
                    break;
                }
                step *= BACKTRACK_SHRINK;
                if evals >= opts.max_evaluations {
                    break;
                }
            }

            let Some((next_point, next_value)) = accepted else {
                // Line search failed along every scale: treat the point as
                // stationary if the value has stalled, otherwise give up.
                if grad_norm <= 10.0 * opts.gradient_tolerance * (1.0 + value.abs()) {
                    status = MinimizeStatus::Converged;
                }
                break;
            };

            let next_grad = model.gradient(&next_point, temperature);
            evals += 2 * n;

            let s: Vec<f64> = (0..n).map(|d| next_point[d] - point[d]).collect();
            let y: Vec<f64> = (0..n).map(|d| next_grad[d] - grad[d]).collect();
            let sy: f64 = s.iter().zip(&y).map(|(a, b)| a * b).sum();
            if sy > 1e-12 * s.iter().map(|x| x * x).sum::<f64>().max(1e-300) {
                bfgs_update(&mut inv_hess, &s, &y, sy);
            }

            let value_shift = (value - next_value).abs();
            point = next_point;
            value = next_value;
            grad = next_grad;

            if value_shift <= opts.value_tolerance * (1.0 + value.abs())
                && grad.norm() <= 10.0 * opts.gradient_tolerance * (1.0 + value.abs())
            {
                status = MinimizeStatus::Converged;
                break;
            }
        }

        let gradient_norm = grad.norm();
        Ok(MinimizationResult {
            point,
            value,
            gradient_norm,
            status,
            evaluations: evals,
        })
    }
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    let mut eye = vec![vec![0.0; n]; n];
    for (row, slot) in eye.iter_mut().enumerate() {
        slot[row] = 1.0;
    }
    eye
}

fn mat_vec(mat: &[Vec<f64>], vec: &[f64]) -> Vec<f64> {
    mat.iter()
        .map(|row| row.iter().zip(vec).map(|(m, v)| m * v).sum())
        .collect()
}

/// Sherman-Morrison form of the inverse BFGS update.
fn bfgs_update(inv_hess: &mut [Vec<f64>], s: &[f64], y: &[f64], sy: f64) {
    let n = s.len();
    let rho = 1.0 / sy;
    let hy = mat_vec(inv_hess, y);
    let yhy: f64 = y.iter().zip(&hy).map(|(a, b)| a * b).sum();

    for row in 0..n {
        for col in 0..n {
            let term1 = -rho * (s[row] * hy[col] + hy[row] * s[col]);
            let term2 = rho * rho * (sy + yhy) * s[row] * s[col];
            inv_hess[row][col] += term1 + term2;
        }
    }
}
