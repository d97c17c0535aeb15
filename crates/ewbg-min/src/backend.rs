use serde::{Deserialize, Serialize};

use ewbg_core::{EwbgError, FieldPoint, PotentialModel};

use crate::result::MinimizationResult;

fn default_gradient_tolerance() -> f64 {
    1e-5
}

fn default_value_tolerance() -> f64 {
    1e-6
}

fn default_agreement_tolerance() -> f64 {
    1e-4
}

fn default_max_iterations() -> usize {
    400
}

fn default_max_evaluations() -> usize {
    20_000
}

fn default_starts() -> usize {
    8
}

fn default_seed() -> u64 {
    4242
}

fn default_hessian_tolerance() -> f64 {
    1e-6
}

fn default_perturbation_scale() -> f64 {
    0.35
}

fn default_separation_tolerance() -> f64 {
    1e-2
}

/// Tolerances and budgets governing the minimizer.
///
/// All tolerances are relative: each is applied against `1 + |reference|`
/// with the reference taken from the quantity under test, so the same
/// configuration works for potentials expressed in GeV^4 and for
/// dimensionless toys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizeOpts {
    /// First-order condition threshold on the gradient norm.
    #[serde(default = "default_gradient_tolerance")]
    pub gradient_tolerance: f64,
    /// Stalling threshold on successive potential values.
    #[serde(default = "default_value_tolerance")]
    pub value_tolerance: f64,
    /// Maximum tolerated cross-backend value disagreement.
    #[serde(default = "default_agreement_tolerance")]
    pub agreement_tolerance: f64,
    /// Iteration cap applied per backend invocation.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Potential-evaluation budget shared by a full multi-start call.
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: usize,
    /// Number of starting points tried by the driver.
    #[serde(default = "default_starts")]
    pub starts: usize,
    /// Master seed for start perturbation and the evolutionary backend.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Threshold below which a Hessian eigenvalue counts as negative.
    #[serde(default = "default_hessian_tolerance")]
    pub hessian_tolerance: f64,
    /// Relative amplitude of start-point perturbations.
    #[serde(default = "default_perturbation_scale")]
    pub perturbation_scale: f64,
    /// Distance below which two candidate minima count as the same vacuum.
    #[serde(default = "default_separation_tolerance")]
    pub separation_tolerance: f64,
}

impl Default for MinimizeOpts {
    fn default() -> Self {
        Self {
            gradient_tolerance: default_gradient_tolerance(),
            value_tolerance: default_value_tolerance(),
            agreement_tolerance: default_agreement_tolerance(),
            max_iterations: default_max_iterations(),
            max_evaluations: default_max_evaluations(),
            starts: default_starts(),
            seed: default_seed(),
            hessian_tolerance: default_hessian_tolerance(),
            perturbation_scale: default_perturbation_scale(),
            separation_tolerance: default_separation_tolerance(),
        }
    }
}

/// Capability interface implemented by every minimizer backend.
///
/// Backends are pure with respect to the model: they may evaluate the
/// potential and its derivatives but never mutate shared state, so attempts
/// can run concurrently against one model instance.
pub trait LocalBackend {
    /// Stable backend name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Refines `start` toward a local minimum of the potential at fixed
    /// temperature, staying inside `bounds`.
    ///
    /// Budget exhaustion is reported through the result status, never as an
    /// `Err`; errors are reserved for structural misuse such as a dimension
    /// mismatch.
    fn refine(
        &self,
        model: &dyn PotentialModel,
        temperature: f64,
        start: &FieldPoint,
        bounds: &[(f64, f64)],
        opts: &MinimizeOpts,
    ) -> Result<MinimizationResult, EwbgError>;
}

/// Clamps a point onto the backend search box.
pub(crate) fn project(point: &mut FieldPoint, bounds: &[(f64, f64)]) {
    for (dir, (low, high)) in bounds.iter().enumerate() {
        point[dir] = point[dir].clamp(*low, *high);
    }
}

/// Validates the shared preconditions of every backend.
pub(crate) fn check_inputs(
    backend: &'static str,
    model: &dyn PotentialModel,
    start: &FieldPoint,
    bounds: &[(f64, f64)],
) -> Result<(), EwbgError> {
    use ewbg_core::ErrorInfo;

    if start.dim() != model.n_fields() {
        return Err(EwbgError::Minimize(
            ErrorInfo::new("min_dim_mismatch", "start dimension does not match model")
                .with_context("backend", backend)
                .with_context("start_dim", start.dim().to_string())
                .with_context("model_dim", model.n_fields().to_string()),
        ));
    }
    if bounds.len() != model.n_fields() {
        return Err(EwbgError::Minimize(
            ErrorInfo::new("min_bounds_mismatch", "bounds dimension does not match model")
                .with_context("backend", backend)
                .with_context("bounds_dim", bounds.len().to_string()),
        ));
    }
    if !start.is_finite() {
        return Err(EwbgError::Minimize(
            ErrorInfo::new("min_start_not_finite", "start point contains non-finite values")
                .with_context("backend", backend),
        ));
    }
    Ok(())
}
