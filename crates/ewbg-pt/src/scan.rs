use serde::{Deserialize, Serialize};

use ewbg_core::{derive_substream_seed, ErrorInfo, EwbgError, FieldPoint, PotentialModel};
use ewbg_min::{
    find_minimum, GradientDescentBackend, LocalBackend, MinimizationResult, MinimizeOpts,
    MinimizeStatus, SimplexBackend,
};

use crate::report::{PhaseTransitionPoint, ScanSample, TransitionReport, TransitionStatus};

fn default_t_max() -> f64 {
    300.0
}

fn default_t_min() -> f64 {
    0.0
}

fn default_t_steps() -> usize {
    150
}

fn default_bisection_tolerance() -> f64 {
    1e-3
}

fn default_temperature_tolerance() -> f64 {
    1e-3
}

fn default_max_bisections() -> usize {
    60
}

fn default_vev_threshold() -> f64 {
    1.0
}

fn default_retries() -> u32 {
    3
}

/// Temperature-scan configuration.
///
/// `bisection_tolerance` and `temperature_tolerance` are relative, applied
/// against `1 + |reference|`; `vev_threshold` is the absolute field-space
/// distance above which a minimum counts as a distinct broken vacuum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOpts {
    /// Upper end of the scan range; only the symmetric vacuum should exist
    /// here.
    #[serde(default = "default_t_max")]
    pub t_max: f64,
    /// Lower end of the scan range.
    #[serde(default = "default_t_min")]
    pub t_min: f64,
    /// Number of downward scan steps.
    #[serde(default = "default_t_steps")]
    pub t_steps: usize,
    /// Degeneracy threshold on |V_sym - V_brk| at the refined bracket.
    #[serde(default = "default_bisection_tolerance")]
    pub bisection_tolerance: f64,
    /// Width threshold on the refined temperature bracket.
    #[serde(default = "default_temperature_tolerance")]
    pub temperature_tolerance: f64,
    /// Bisection depth cap.
    #[serde(default = "default_max_bisections")]
    pub max_bisections: usize,
    /// Field-space distance separating the broken vacuum from the symmetric
    /// one.
    #[serde(default = "default_vev_threshold")]
    pub vev_threshold: f64,
    /// Minimizer retry attempts with alternate seeds before giving up.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Minimizer configuration shared by every step.
    #[serde(default)]
    pub minimize: MinimizeOpts,
}

impl Default for ScanOpts {
    fn default() -> Self {
        Self {
            t_max: default_t_max(),
            t_min: default_t_min(),
            t_steps: default_t_steps(),
            bisection_tolerance: default_bisection_tolerance(),
            temperature_tolerance: default_temperature_tolerance(),
            max_bisections: default_max_bisections(),
            vev_threshold: default_vev_threshold(),
            retries: default_retries(),
            minimize: MinimizeOpts::default(),
        }
    }
}

/// Vacuum structure of the potential at one temperature.
struct Survey {
    symmetric: MinimizationResult,
    broken: Option<MinimizationResult>,
    global_broken: bool,
    converged: bool,
}

impl Survey {
    fn delta_v(&self) -> Option<f64> {
        self.broken
            .as_ref()
            .map(|brk| self.symmetric.value - brk.value)
    }
}

/// Locates the critical temperature of a first-order phase transition.
///
/// The scan walks downward from `t_max`, surveying the vacuum structure at
/// each step; the first step whose global minimum is a distinct broken
/// vacuum closes the bracket (the highest-temperature transition wins when
/// several exist, matching the physical nucleation ordering). The bracket is
/// then bisected until both the temperature interval and the vacuum
/// degeneracy gap are below tolerance. Persistent minimizer non-convergence
/// maps to `NotFound` while scanning and `NumericalFailure` inside the
/// bracket; neither is an `Err`.
pub fn find_transition(
    model: &dyn PotentialModel,
    opts: &ScanOpts,
) -> Result<TransitionReport, EwbgError> {
    check_opts(opts)?;
    let dim = model.n_fields();
    let mut samples = Vec::with_capacity(opts.t_steps + 1);
    let step = (opts.t_max - opts.t_min) / opts.t_steps as f64;

    let mut prev_t = opts.t_max;
    let mut broken_seed: Option<FieldPoint> = None;
    let mut bracket: Option<(f64, f64)> = None;

    for k in 0..=opts.t_steps {
        let t = opts.t_max - k as f64 * step;
        let survey = survey_vacua(model, t, broken_seed.as_ref(), opts)?;
        samples.push(sample_of(t, &survey));

        if !survey.converged {
            // Alternate seeds already exhausted by the survey.
            return Ok(TransitionReport {
                point: PhaseTransitionPoint::failed(dim, TransitionStatus::NotFound),
                samples,
                bisections: 0,
            });
        }
        if let Some(brk) = &survey.broken {
            broken_seed = Some(brk.point.clone());
        }
        if survey.global_broken {
            if k == 0 {
                // Already broken at the top of the range: nothing to bracket.
                return Ok(TransitionReport {
                    point: PhaseTransitionPoint::failed(dim, TransitionStatus::NotFound),
                    samples,
                    bisections: 0,
                });
            }
            bracket = Some((t, prev_t));
            break;
        }
        prev_t = t;
    }

    let Some((mut t_lo, mut t_hi)) = bracket else {
        return Ok(TransitionReport {
            point: PhaseTransitionPoint::failed(dim, TransitionStatus::NotFound),
            samples,
            bisections: 0,
        });
    };

    // Refinement: bisect on the global-minimum phase, tracking the broken
    // side survey for the degeneracy check.
    let mut edge = survey_vacua(model, t_lo, broken_seed.as_ref(), opts)?;
    let mut bisections = 0usize;
    while bisections < opts.max_bisections {
        let gap_ok = edge
            .delta_v()
            .map(|dv| dv.abs() <= opts.bisection_tolerance * (1.0 + edge.symmetric.value.abs()))
            .unwrap_or(false);
        let width_ok = (t_hi - t_lo) <= opts.temperature_tolerance * (1.0 + t_lo);
        if gap_ok && width_ok {
            break;
        }

        let t_mid = 0.5 * (t_lo + t_hi);
        let survey = survey_vacua(model, t_mid, broken_seed.as_ref(), opts)?;
        bisections += 1;
        if !survey.converged {
            return Ok(TransitionReport {
                point: PhaseTransitionPoint::failed(dim, TransitionStatus::NumericalFailure),
                samples,
                bisections,
            });
        }
        if let Some(brk) = &survey.broken {
            broken_seed = Some(brk.point.clone());
        }
        if survey.global_broken {
            t_lo = t_mid;
            edge = survey;
        } else {
            t_hi = t_mid;
        }
    }

    let tc = 0.5 * (t_lo + t_hi);
    let Some(broken) = edge.broken else {
        return Ok(TransitionReport {
            point: PhaseTransitionPoint::failed(dim, TransitionStatus::NumericalFailure),
            samples,
            bisections,
        });
    };
    let separation = broken.point.distance(&edge.symmetric.point);
    if separation <= opts.vev_threshold {
        // Degenerate "transition": the two vacua merged during refinement.
        return Ok(TransitionReport {
            point: PhaseTransitionPoint::failed(dim, TransitionStatus::NotFound),
            samples,
            bisections,
        });
    }

    let point = PhaseTransitionPoint {
        tc,
        vc: broken.point.norm(),
        broken_vev: broken.point,
        symmetric_vev: edge.symmetric.point,
        status: TransitionStatus::Found,
    };
    Ok(TransitionReport {
        point,
        samples,
        bisections,
    })
}

fn check_opts(opts: &ScanOpts) -> Result<(), EwbgError> {
    if !(opts.t_max > opts.t_min) {
        return Err(EwbgError::Transition(
            ErrorInfo::new("pt_bad_range", "t_max must exceed t_min")
                .with_context("t_max", opts.t_max.to_string())
                .with_context("t_min", opts.t_min.to_string()),
        ));
    }
    if opts.t_steps == 0 {
        return Err(EwbgError::Transition(ErrorInfo::new(
            "pt_zero_steps",
            "temperature scan needs at least one step",
        )));
    }
    Ok(())
}

/// Surveys the vacuum structure at one temperature: a symmetric-side local
/// refinement, a broken-side seeded global search with seed-rotation
/// retries, and the phase of the global minimum.
fn survey_vacua(
    model: &dyn PotentialModel,
    temperature: f64,
    broken_seed: Option<&FieldPoint>,
    opts: &ScanOpts,
) -> Result<Survey, EwbgError> {
    let bounds = model.bounds();
    let gradient = GradientDescentBackend;
    let simplex = SimplexBackend;

    let mut symmetric = gradient.refine(
        model,
        temperature,
        &model.symmetric_point(),
        &bounds,
        &opts.minimize,
    )?;
    if symmetric.status != MinimizeStatus::Converged {
        let fallback = simplex.refine(
            model,
            temperature,
            &model.symmetric_point(),
            &bounds,
            &opts.minimize,
        )?;
        if fallback.status == MinimizeStatus::Converged {
            symmetric = fallback;
        }
    }

    let seed_point = broken_seed.cloned().unwrap_or_else(|| model.tree_minimum());
    let mut global = None;
    for attempt in 0..=opts.retries {
        let attempt_opts = MinimizeOpts {
            seed: derive_substream_seed(opts.minimize.seed, 1_000 + u64::from(attempt)),
            ..opts.minimize.clone()
        };
        let result = find_minimum(model, temperature, &[seed_point.clone()], &attempt_opts)?;
        let converged = result.status == MinimizeStatus::Converged;
        global = Some(result);
        if converged {
            break;
        }
    }
    let global = global.unwrap_or(MinimizationResult {
        point: model.symmetric_point(),
        value: f64::NAN,
        gradient_norm: f64::NAN,
        status: MinimizeStatus::NotConverged,
        evaluations: 0,
    });
    let converged =
        symmetric.status == MinimizeStatus::Converged && global.status == MinimizeStatus::Converged;

    let global_broken = global.point.distance(&symmetric.point) > opts.vev_threshold;
    let broken = if global_broken {
        Some(global)
    } else {
        // The global minimum is symmetric; look for a metastable broken
        // vacuum from the seed so the trace still records the gap.
        let local = gradient.refine(model, temperature, &seed_point, &bounds, &opts.minimize)?;
        let distinct = local.point.distance(&symmetric.point) > opts.vev_threshold;
        (local.status == MinimizeStatus::Converged && distinct).then_some(local)
    };

    Ok(Survey {
        symmetric,
        broken,
        global_broken,
        converged,
    })
}

fn sample_of(temperature: f64, survey: &Survey) -> ScanSample {
    ScanSample {
        temperature,
        symmetric_value: survey.symmetric.value,
        broken_value: survey.broken.as_ref().map(|b| b.value),
        broken_norm: survey.broken.as_ref().map(|b| b.point.norm()),
        global_broken: survey.global_broken,
    }
}
