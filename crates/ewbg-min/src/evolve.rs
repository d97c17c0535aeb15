use ewbg_core::{EwbgError, FieldPoint, PotentialModel, RngHandle};

use crate::backend::{check_inputs, project, LocalBackend, MinimizeOpts};
use crate::result::{MinimizationResult, MinimizeStatus};

/// Differential-evolution global search over the model's bounds.
///
/// The fallback when every local start fails: it ignores the start point
/// except as one population member and explores the whole box. Fully
/// deterministic under the seed carried in [`MinimizeOpts`].
#[derive(Debug, Clone, Copy)]
pub struct EvolutionBackend {
    /// Substream index mixed into the master seed.
    pub substream: u64,
}

impl Default for EvolutionBackend {
    fn default() -> Self {
        Self { substream: 0 }
    }
}

const DIFFERENTIAL_WEIGHT: f64 = 0.8;
const CROSSOVER_RATE: f64 = 0.9;

impl LocalBackend for EvolutionBackend {
    fn name(&self) -> &'static str {
        "differential-evolution"
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
        let pop_size = (10 * n).max(16);
        let seed = ewbg_core::derive_substream_seed(opts.seed, self.substream);
        let mut rng = RngHandle::from_seed(seed);
        let mut evals = 0usize;

        let eval = |point: &FieldPoint, evals: &mut usize| -> f64 {
            *evals += 1;
            let value = model.v_eff(point, temperature);
            if value.is_finite() {
                value
            } else {
                f64::INFINITY
            }
        };

        // Population seeded uniformly over the box, keeping the caller's
        // start as member zero.
        let mut population: Vec<(FieldPoint, f64)> = Vec::with_capacity(pop_size);
        let mut first = start.clone();
        project(&mut first, bounds);
        let first_value = eval(&first, &mut evals);
        population.push((first, first_value));
        for _ in 1..pop_size {
            let mut member = FieldPoint::zero(n);
            for (dir, (low, high)) in bounds.iter().enumerate() {
                member[dir] = rng.uniform_in(*low, *high);
            }
            let value = eval(&member, &mut evals);
            population.push((member, value));
        }

        let generations = opts.max_iterations;
        for _gen in 0..generations {
            if evals + pop_size > opts.max_evaluations {
                break;
            }
            for target in 0..pop_size {
                // rand/1/bin mutation: three distinct partners.
                let mut pick = || loop {
                    let idx = rng.index(pop_size);
                    if idx != target {
                        return idx;
                    }
                };
                let (a, b, c) = (pick(), pick(), pick());
                let forced = rng.index(n);

                let mut trial = population[target].0.clone();
                for dir in 0..n {
                    if dir == forced || rng.uniform() < CROSSOVER_RATE {
                        trial[dir] = population[a].0[dir]
                            + DIFFERENTIAL_WEIGHT
                                * (population[b].0[dir] - population[c].0[dir]);
                    }
                }
                project(&mut trial, bounds);
                let trial_value = eval(&trial, &mut evals);
                if trial_value <= population[target].1 {
                    population[target] = (trial, trial_value);
                }
            }
        }

        let mut best = 0;
        for idx in 1..population.len() {
            if population[idx].1 < population[best].1 {
                best = idx;
            }
        }
        let (point, value) = population.swap_remove(best);
        let gradient_norm = model.gradient(&point, temperature).norm();
        evals += 2 * n;

        // A global sample is never certified as converged on its own; the
        // driver re-polishes the winner with a local backend.
        let status = if gradient_norm <= opts.gradient_tolerance * (1.0 + value.abs()) {
            MinimizeStatus::Converged
        } else {
            MinimizeStatus::NotConverged
        };
        Ok(MinimizationResult {
            point,
            value,
            gradient_norm,
            status,
            evaluations: evals,
        })
    }
}
