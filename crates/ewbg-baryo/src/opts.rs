use serde::{Deserialize, Serialize};

use ewbg_core::SmConstants;

use crate::species::Species;

fn default_rel_tol() -> f64 {
    1e-8
}

fn default_abs_tol() -> f64 {
    1e-12
}

fn default_truncation_factor() -> f64 {
    20.0
}

fn default_truncation_tolerance() -> f64 {
    5e-2
}

fn default_max_truncation_doublings() -> u32 {
    4
}

fn default_strength_threshold() -> f64 {
    1.0
}

fn default_max_step_evals() -> usize {
    2_000_000
}

/// Which fermion species enter the transport system.
///
/// Mirrors the transport-method selection of the run configuration file; the
/// heavy-quark-only variants are cheaper and usually dominate eta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TransportMethod {
    /// Top quark only.
    TopOnly,
    /// Top and bottom quarks.
    TopBottom,
    /// Top, bottom and tau.
    #[default]
    TopBottomTau,
}

impl TransportMethod {
    /// The species participating under this method, heaviest first.
    pub fn species(&self) -> &'static [Species] {
        match self {
            TransportMethod::TopOnly => &[Species::Top],
            TransportMethod::TopBottom => &[Species::Top, Species::Bottom],
            TransportMethod::TopBottomTau => &[Species::Top, Species::Bottom, Species::Tau],
        }
    }
}

/// CP-violating phases per species and phase region, in radians.
///
/// These are model inputs: the complex phase of the fermion mass deep in
/// each phase. The wall profile interpolates between the two values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpPhases {
    /// Top phase in the symmetric phase.
    #[serde(default)]
    pub top_symmetric: f64,
    /// Top phase in the broken phase.
    #[serde(default)]
    pub top_broken: f64,
    /// Bottom phase in the symmetric phase.
    #[serde(default)]
    pub bottom_symmetric: f64,
    /// Bottom phase in the broken phase.
    #[serde(default)]
    pub bottom_broken: f64,
    /// Tau phase in the symmetric phase.
    #[serde(default)]
    pub tau_symmetric: f64,
    /// Tau phase in the broken phase.
    #[serde(default)]
    pub tau_broken: f64,
}

impl Default for CpPhases {
    fn default() -> Self {
        // A common benchmark: maximal phase deep in the symmetric phase,
        // aligned (zero) in the broken phase.
        Self {
            top_symmetric: 0.1,
            top_broken: 0.0,
            bottom_symmetric: 0.1,
            bottom_broken: 0.0,
            tau_symmetric: 0.1,
            tau_broken: 0.0,
        }
    }
}

impl CpPhases {
    /// Phase pair `(symmetric, broken)` for a species.
    pub fn pair(&self, species: Species) -> (f64, f64) {
        match species {
            Species::Top => (self.top_symmetric, self.top_broken),
            Species::Bottom => (self.bottom_symmetric, self.bottom_broken),
            Species::Tau => (self.tau_symmetric, self.tau_broken),
        }
    }
}

/// Transport-engine configuration, read once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOpts {
    /// Species selection.
    #[serde(default)]
    pub method: TransportMethod,
    /// Relative tolerance of the adaptive integrator.
    #[serde(default = "default_rel_tol")]
    pub rel_tol: f64,
    /// Absolute tolerance of the adaptive integrator.
    #[serde(default = "default_abs_tol")]
    pub abs_tol: f64,
    /// Initial truncation distance in wall widths.
    #[serde(default = "default_truncation_factor")]
    pub truncation_factor: f64,
    /// Maximum relative eta change tolerated when the truncation distance is
    /// doubled.
    #[serde(default = "default_truncation_tolerance")]
    pub truncation_tolerance: f64,
    /// Number of truncation doublings tried before giving up.
    #[serde(default = "default_max_truncation_doublings")]
    pub max_truncation_doublings: u32,
    /// Transitions weaker than this `vc / Tc` produce `eta = 0` instead of a
    /// transport solve.
    #[serde(default = "default_strength_threshold")]
    pub strength_threshold: f64,
    /// Hard cap on right-hand-side evaluations per region integration.
    #[serde(default = "default_max_step_evals")]
    pub max_step_evals: usize,
    /// CP-violating phase inputs.
    #[serde(default)]
    pub cp: CpPhases,
    /// Standard Model constants.
    #[serde(default)]
    pub sm: SmConstants,
}

impl Default for TransportOpts {
    fn default() -> Self {
        Self {
            method: TransportMethod::default(),
            rel_tol: default_rel_tol(),
            abs_tol: default_abs_tol(),
            truncation_factor: default_truncation_factor(),
            truncation_tolerance: default_truncation_tolerance(),
            max_truncation_doublings: default_max_truncation_doublings(),
            strength_threshold: default_strength_threshold(),
            max_step_evals: default_max_step_evals(),
            cp: CpPhases::default(),
            sm: SmConstants::default(),
        }
    }
}
