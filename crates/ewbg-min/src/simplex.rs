use ewbg_core::{EwbgError, FieldPoint, PotentialModel};

use crate::backend::{check_inputs, project, LocalBackend, MinimizeOpts};
use crate::result::{MinimizationResult, MinimizeStatus};

/// Derivative-free Nelder-Mead simplex backend.
///
/// Used when the gradient refiner stalls, and as the independent
/// cross-check the driver runs against the winning candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimplexBackend;

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;
const INIT_SPREAD: f64 = 0.05;

impl LocalBackend for SimplexBackend {
    fn name(&self) -> &'static str {
        "nelder-mead"
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
        let mut evals = 0usize;

        let eval = |point: &FieldPoint, evals: &mut usize| -> f64 {
            *evals += 1;
            model.v_eff(point, temperature)
        };

        // Initial simplex: the start plus one displaced vertex per direction.
        let mut vertices: Vec<(FieldPoint, f64)> = Vec::with_capacity(n + 1);
        let mut base = start.clone();
        project(&mut base, bounds);
        let base_value = eval(&base, &mut evals);
        vertices.push((base.clone(), base_value));
        for dir in 0..n {
            let mut vertex = base.clone();
            let spread = INIT_SPREAD * vertex[dir].abs().max(1.0);
            vertex[dir] += spread;
            project(&mut vertex, bounds);
            let value = eval(&vertex, &mut evals);
            vertices.push((vertex, value));
        }

        let mut status = MinimizeStatus::NotConverged;
        for _iter in 0..opts.max_iterations {
            vertices.sort_by(|a, b| a.1.total_cmp(&b.1));
            let best = vertices[0].1;
            let worst = vertices[n].1;
            if (worst - best).abs() <= opts.value_tolerance * (1.0 + best.abs()) {
                status = MinimizeStatus::Converged;
                break;
            }
            if evals >= opts.max_evaluations {
                break;
            }

            // Centroid of all but the worst vertex.
            let mut centroid = vec![0.0; n];
            for (vertex, _) in vertices.iter().take(n) {
                for dir in 0..n {
                    centroid[dir] += vertex[dir] / n as f64;
                }
            }

            let worst_point = vertices[n].0.clone();
            let mut reflected = FieldPoint::zero(n);
            for dir in 0..n {
                reflected[dir] = centroid[dir] + REFLECT * (centroid[dir] - worst_point[dir]);
            }
            project(&mut reflected, bounds);
            let reflected_value = eval(&reflected, &mut evals);

            if reflected_value < vertices[0].1 {
                let mut expanded = FieldPoint::zero(n);
                for dir in 0..n {
                    expanded[dir] = centroid[dir] + EXPAND * (centroid[dir] - worst_point[dir]);
                }
                project(&mut expanded, bounds);
                let expanded_value = eval(&expanded, &mut evals);
                vertices[n] = if expanded_value < reflected_value {
                    (expanded, expanded_value)
                } else {
                    (reflected, reflected_value)
                };
                continue;
            }
            if reflected_value < vertices[n - 1].1 {
                vertices[n] = (reflected, reflected_value);
                continue;
            }

            let mut contracted = FieldPoint::zero(n);
            for dir in 0..n {
                contracted[dir] = centroid[dir] + CONTRACT * (worst_point[dir] - centroid[dir]);
            }
            project(&mut contracted, bounds);
            let contracted_value = eval(&contracted, &mut evals);
            if contracted_value < vertices[n].1 {
                vertices[n] = (contracted, contracted_value);
                continue;
            }

            // Shrink toward the best vertex.
            let best_point = vertices[0].0.clone();
            for entry in vertices.iter_mut().skip(1) {
                for dir in 0..n {
                    entry.0[dir] = best_point[dir] + SHRINK * (entry.0[dir] - best_point[dir]);
                }
                project(&mut entry.0, bounds);
                entry.1 = eval(&entry.0, &mut evals);
            }
        }

        vertices.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (point, value) = vertices.swap_remove(0);
        let gradient_norm = model.gradient(&point, temperature).norm();
        evals += 2 * n;
        Ok(MinimizationResult {
            point,
            value,
            gradient_norm,
            status,
            evaluations: evals,
        })
    }
}
