use serde::{Deserialize, Serialize};

use ewbg_core::FieldPoint;

/// Outcome classification of a transition scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionStatus {
    /// A first-order transition point was bracketed and refined.
    Found,
    /// No temperature in the scan range prefers a broken vacuum.
    NotFound,
    /// The minimizer failed to converge inside the bracket.
    NumericalFailure,
}

impl TransitionStatus {
    /// Short stable label used in output rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionStatus::Found => "found",
            TransitionStatus::NotFound => "not-found",
            TransitionStatus::NumericalFailure => "numerical-failure",
        }
    }
}

/// Critical point of the electroweak phase transition.
///
/// When `status` is [`TransitionStatus::Found`] the two vacua are degenerate
/// at `tc` within the scan tolerance and separated by more than the
/// separation tolerance; otherwise the numeric fields are NaN placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransitionPoint {
    /// Critical temperature.
    pub tc: f64,
    /// Norm of the broken vacuum at `tc`.
    pub vc: f64,
    /// Broken-phase vacuum configuration at `tc`.
    pub broken_vev: FieldPoint,
    /// Symmetric-phase vacuum configuration at `tc`.
    pub symmetric_vev: FieldPoint,
    /// Scan outcome.
    pub status: TransitionStatus,
}

impl PhaseTransitionPoint {
    /// Placeholder point carrying only a failure status.
    pub fn failed(dim: usize, status: TransitionStatus) -> Self {
        Self {
            tc: f64::NAN,
            vc: f64::NAN,
            broken_vev: FieldPoint::new(vec![f64::NAN; dim]),
            symmetric_vev: FieldPoint::new(vec![f64::NAN; dim]),
            status,
        }
    }

    /// Transition strength `vc / tc`.
    pub fn strength(&self) -> f64 {
        self.vc / self.tc
    }

    /// True when the point describes a usable transition.
    pub fn is_found(&self) -> bool {
        self.status == TransitionStatus::Found
    }
}

/// Per-temperature trace entry retained for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSample {
    /// Sampled temperature.
    pub temperature: f64,
    /// Potential value of the symmetric-side minimum.
    pub symmetric_value: f64,
    /// Potential value of the broken-side minimum, when one exists.
    pub broken_value: Option<f64>,
    /// Norm of the broken-side minimum, when one exists.
    pub broken_norm: Option<f64>,
    /// Whether the global minimum at this temperature is broken.
    pub global_broken: bool,
}

/// Full result of a transition scan: the point plus the trace that led there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionReport {
    /// The located (or failed) transition point.
    pub point: PhaseTransitionPoint,
    /// Downward-scan trace, in scan order.
    pub samples: Vec<ScanSample>,
    /// Number of bisection steps spent refining the bracket.
    pub bisections: usize,
}
