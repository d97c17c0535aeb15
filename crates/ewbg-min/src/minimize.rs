use ewbg_core::{derive_substream_seed, EwbgError, FieldPoint, PotentialModel, RngHandle};

use crate::backend::{LocalBackend, MinimizeOpts};
use crate::evolve::EvolutionBackend;
use crate::gradient::GradientDescentBackend;
use crate::result::{smallest_eigenvalue, MinimizationResult, MinimizeStatus};
use crate::simplex::SimplexBackend;

/// Perturbs a start point inside the bounds using the given substream.
///
/// Callers retrying a `NotConverged` result feed the previous candidate back
/// through this with a fresh substream index.
pub fn perturbed_start(
    base: &FieldPoint,
    bounds: &[(f64, f64)],
    opts: &MinimizeOpts,
    substream: u64,
) -> FieldPoint {
    let seed = derive_substream_seed(opts.seed, substream);
    let mut rng = RngHandle::from_seed(seed);
    let mut point = base.clone();
    for (dir, (low, high)) in bounds.iter().enumerate() {
        let span = opts.perturbation_scale * point[dir].abs().max(0.05 * (high - low));
        point[dir] = (point[dir] + rng.uniform_in(-span, span)).clamp(*low, *high);
    }
    point
}

/// Finds the lowest local minimum reachable from a set of starting points.
///
/// The start set is the symmetric point, the tree vacuum, every caller
/// supplied start, and substream-perturbed copies up to `opts.starts`. Each
/// start is refined by the gradient backend with a simplex fallback; if
/// nothing converges, one evolutionary sweep over the bounds seeds a final
/// local polish. The winning candidate is cross-checked by an independent
/// backend: a disagreement beyond `agreement_tolerance` at a distinct point
/// downgrades the result to `NotConverged` so the caller can retry with
/// perturbed starts. Saddles (Hessian with a negative direction) are
/// classified `Degenerate` and never win over a true minimum.
pub fn find_minimum(
    model: &dyn PotentialModel,
    temperature: f64,
    extra_starts: &[FieldPoint],
    opts: &MinimizeOpts,
) -> Result<MinimizationResult, EwbgError> {
    let bounds = model.bounds();
    let gradient = GradientDescentBackend;
    let simplex = SimplexBackend;

    let mut starts: Vec<FieldPoint> = vec![model.symmetric_point(), model.tree_minimum()];
    starts.extend(extra_starts.iter().cloned());
    let mut substream = 1u64;
    while starts.len() < opts.starts {
        let base = starts[starts.len() % (2 + extra_starts.len())].clone();
        starts.push(perturbed_start(&base, &bounds, opts, substream));
        substream += 1;
    }

    let mut budget = opts.max_evaluations;
    let mut candidates: Vec<MinimizationResult> = Vec::new();
    for start in &starts {
        if budget == 0 {
            break;
        }
        let local_opts = MinimizeOpts {
            max_evaluations: budget,
            ..opts.clone()
        };
        let mut result = gradient.refine(model, temperature, start, &bounds, &local_opts)?;
        budget = budget.saturating_sub(result.evaluations);
        if result.status != MinimizeStatus::Converged && budget > 0 {
            let retry_opts = MinimizeOpts {
                max_evaluations: budget,
                ..opts.clone()
            };
            let fallback = simplex.refine(model, temperature, start, &bounds, &retry_opts)?;
            budget = budget.saturating_sub(fallback.evaluations);
            if fallback.status == MinimizeStatus::Converged || fallback.value < result.value {
                result = fallback;
            }
        }
        candidates.push(result);
    }

    let mut converged: Vec<MinimizationResult> = candidates
        .iter()
        .filter(|r| r.status == MinimizeStatus::Converged)
        .cloned()
        .collect();

    if converged.is_empty() && budget > 0 {
        // Global rescue pass over the full box.
        let evolve = EvolutionBackend { substream: 9001 };
        let global_opts = MinimizeOpts {
            max_evaluations: budget,
            ..opts.clone()
        };
        let rough = evolve.refine(
            model,
            temperature,
            &model.symmetric_point(),
            &bounds,
            &global_opts,
        )?;
        budget = budget.saturating_sub(rough.evaluations);
        let polish_opts = MinimizeOpts {
            max_evaluations: budget.max(1),
            ..opts.clone()
        };
        let polished = gradient.refine(model, temperature, &rough.point, &bounds, &polish_opts)?;
        budget = budget.saturating_sub(polished.evaluations);
        let winner = if polished.value <= rough.value {
            polished
        } else {
            rough
        };
        if winner.status == MinimizeStatus::Converged {
            converged.push(winner.clone());
        }
        candidates.push(winner);
    }

    let spent = opts.max_evaluations - budget;
    if converged.is_empty() {
        // Budget exhausted or everything stalled: surface the best attempt.
        let mut best = best_by_value(candidates);
        best.status = MinimizeStatus::NotConverged;
        best.evaluations = spent;
        return Ok(best);
    }

    converged.sort_by(|a, b| a.value.total_cmp(&b.value));
    let mut winner = classify(model, temperature, converged.remove(0), opts);

    // Saddle rejection: prefer any converged candidate that survives the
    // Hessian check over a lower-lying degenerate one.
    if winner.status == MinimizeStatus::Degenerate {
        for candidate in converged.drain(..) {
            let checked = classify(model, temperature, candidate, opts);
            if checked.status == MinimizeStatus::Converged {
                winner = checked;
                break;
            }
        }
    }

    if winner.status == MinimizeStatus::Converged && budget > 0 {
        // Independent-backend cross-check from the winning point.
        let check_opts = MinimizeOpts {
            max_evaluations: budget,
            ..opts.clone()
        };
        let check = simplex.refine(model, temperature, &winner.point, &bounds, &check_opts)?;
        let disagreement = winner.value - check.value;
        let distinct = winner.point.distance(&check.point)
            > opts.separation_tolerance * (1.0 + winner.point.norm());
        if disagreement > opts.agreement_tolerance * (1.0 + winner.value.abs()) && distinct {
            winner.status = MinimizeStatus::NotConverged;
        }
    }

    winner.evaluations = opts.max_evaluations - budget;
    Ok(winner)
}

fn best_by_value(candidates: Vec<MinimizationResult>) -> MinimizationResult {
    let mut best: Option<MinimizationResult> = None;
    for candidate in candidates {
        let better = match &best {
            Some(current) => candidate.value < current.value,
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }
    best.unwrap_or(MinimizationResult {
        point: FieldPoint::zero(0),
        value: f64::NAN,
        gradient_norm: f64::NAN,
        status: MinimizeStatus::NotConverged,
        evaluations: 0,
    })
}

/// Applies the positive-semi-definiteness requirement from the result
/// contract: a converged point whose Hessian has a direction of negative
/// curvature beyond tolerance is a saddle, not a vacuum.
fn classify(
    model: &dyn PotentialModel,
    temperature: f64,
    mut result: MinimizationResult,
    opts: &MinimizeOpts,
) -> MinimizationResult {
    let hessian = model.hessian(&result.point, temperature);
    let min_eig = smallest_eigenvalue(&hessian);
    let scale = hessian
        .iter()
        .enumerate()
        .map(|(row, cols)| cols[row].abs())
        .fold(1.0_f64, f64::max);
    if min_eig < -opts.hessian_tolerance * scale {
        result.status = MinimizeStatus::Degenerate;
    }
    result
}
