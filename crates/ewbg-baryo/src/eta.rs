//! Eta orchestration: validation, truncation control and the sphaleron
//! aggregation of the per-species chemical potentials.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use ewbg_core::{ErrorInfo, EwbgError, FieldPoint, PotentialModel};

use crate::opts::TransportOpts;
use crate::profile::WallProfile;
use crate::species::{PhaseRegion, Species};
use crate::transport::solve_species;

/// Weak-sphaleron rate in units of the critical temperature.
const SPHALERON_RATE: f64 = 1.0e-6;

/// Grid resolution of the eta integral over the symmetric region.
const ETA_GRID: usize = 512;

/// Outcome classification of a transport computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EtaStatus {
    /// Transport system solved and eta aggregated.
    Computed,
    /// Transition too weak to convert an asymmetry; eta is exactly zero.
    NoConversion,
    /// Numerical failure; eta is a NaN sentinel and the diagnostics carry
    /// the failing code.
    Failed,
}

impl EtaStatus {
    /// Short stable label used in output rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            EtaStatus::Computed => "computed",
            EtaStatus::NoConversion => "no-conversion",
            EtaStatus::Failed => "failed",
        }
    }
}

/// Result of a transport computation for one model point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtaResult {
    /// Baryon-to-entropy ratio.
    pub eta: f64,
    /// Wall width used by the profile, in inverse GeV.
    pub wall_width: f64,
    /// CP-phase diagnostics keyed `<species>_<region>_phase`; all six keys
    /// are always present, species excluded by the method report zero.
    pub phases: BTreeMap<String, f64>,
    /// Outcome classification.
    pub status: EtaStatus,
    /// Failure diagnostics when `status` is [`EtaStatus::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ErrorInfo>,
}

impl EtaResult {
    fn no_conversion(wall_width: f64, phases: BTreeMap<String, f64>) -> Self {
        Self {
            eta: 0.0,
            wall_width,
            phases,
            status: EtaStatus::NoConversion,
            failure: None,
        }
    }

    fn sentinel(wall_width: f64, phases: BTreeMap<String, f64>, failure: ErrorInfo) -> Self {
        Self {
            eta: f64::NAN,
            wall_width,
            phases,
            status: EtaStatus::Failed,
            failure: Some(failure),
        }
    }
}

/// Computes the baryon-to-entropy ratio produced across the bubble wall.
///
/// Input validation failures (unphysical wall velocity, degenerate vacua,
/// non-positive temperature) are `Err`: the caller passed garbage. Runtime
/// numerical failures (stiffness, divergence, truncation non-convergence)
/// are `Ok` with a sentinel result so one bad model point never takes down
/// a batch.
pub fn calc_eta(
    wall_velocity: f64,
    broken_vev: &FieldPoint,
    symmetric_vev: &FieldPoint,
    tc: f64,
    model: &dyn PotentialModel,
    opts: &TransportOpts,
) -> Result<EtaResult, EwbgError> {
    validate_inputs(wall_velocity, broken_vev, symmetric_vev, tc)?;

    let phases = phase_diagnostics(opts);
    let separation = broken_vev.distance(symmetric_vev);
    if separation / tc < opts.strength_threshold {
        // Weak transition: sphalerons wash out anything produced.
        return Ok(EtaResult::no_conversion(f64::NAN, phases));
    }

    let profile = match WallProfile::build(broken_vev, symmetric_vev, tc, wall_velocity, model) {
        Ok(profile) => profile,
        Err(err) => return Ok(EtaResult::sentinel(f64::NAN, phases, err.info().clone())),
    };

    match converge_truncation(&profile, opts) {
        Ok(eta) => Ok(EtaResult {
            eta,
            wall_width: profile.lw,
            phases,
            status: EtaStatus::Computed,
            failure: None,
        }),
        Err(err) => Ok(EtaResult::sentinel(
            profile.lw,
            phases,
            err.info().clone(),
        )),
    }
}

fn validate_inputs(
    wall_velocity: f64,
    broken_vev: &FieldPoint,
    symmetric_vev: &FieldPoint,
    tc: f64,
) -> Result<(), EwbgError> {
    let invalid = |message: &str, key: &str, value: String| {
        EwbgError::Transport(
            ErrorInfo::new("transport_input", message).with_context(key, value),
        )
    };
    if !(wall_velocity > 0.0 && wall_velocity < 1.0) {
        return Err(invalid(
            "wall velocity must lie strictly between 0 and 1",
            "vw",
            wall_velocity.to_string(),
        ));
    }
    if !(tc > 0.0) || !tc.is_finite() {
        return Err(invalid(
            "critical temperature must be positive and finite",
            "tc",
            tc.to_string(),
        ));
    }
    if broken_vev.dim() != symmetric_vev.dim() {
        return Err(invalid(
            "vacuum dimensions disagree",
            "dims",
            format!("{} vs {}", broken_vev.dim(), symmetric_vev.dim()),
        ));
    }
    if !broken_vev.is_finite() || !symmetric_vev.is_finite() {
        return Err(invalid(
            "vacuum coordinates must be finite",
            "broken",
            format!("{:?}", broken_vev.coords()),
        ));
    }
    if broken_vev.distance(symmetric_vev) == 0.0 {
        return Err(invalid(
            "broken and symmetric vacua coincide",
            "separation",
            "0".into(),
        ));
    }
    Ok(())
}

/// Doubles the truncation window until eta stabilizes.
fn converge_truncation(profile: &WallProfile, opts: &TransportOpts) -> Result<f64, EwbgError> {
    let mut z_max = opts.truncation_factor * profile.lw;
    let mut previous: Option<f64> = None;
    for _doubling in 0..=opts.max_truncation_doublings {
        let eta = eta_at_truncation(profile, opts, z_max)?;
        if let Some(prev) = previous {
            if (eta - prev).abs() <= opts.truncation_tolerance * eta.abs().max(1e-30) {
                return Ok(eta);
            }
        }
        previous = Some(eta);
        z_max *= 2.0;
    }
    Err(EwbgError::Transport(
        ErrorInfo::new(
            "transport_truncation",
            "eta did not stabilize under truncation doubling",
        )
        .with_context("z_max", format!("{z_max:.3e}"))
        .with_context("last_eta", format!("{:?}", previous)),
    ))
}

/// Solves every participating species at one truncation distance and
/// integrates the sphaleron-weighted left-handed source over the symmetric
/// region.
fn eta_at_truncation(
    profile: &WallProfile,
    opts: &TransportOpts,
    z_max: f64,
) -> Result<f64, EwbgError> {
    let solutions = opts
        .method
        .species()
        .iter()
        .map(|&species| solve_species(profile, species, opts, z_max))
        .collect::<Result<Vec<_>, EwbgError>>()?;

    let tc = profile.tc;
    let vw = profile.vw;
    let g_star = opts.sm.g_star;
    let rate = SPHALERON_RATE * tc;
    let nu = 45.0 * rate / (4.0 * vw);

    // Trapezoidal quadrature of mu_BL(z) exp(-nu z) over [0, z_max].
    let step = z_max / ETA_GRID as f64;
    let mut integral = 0.0;
    for node in 0..=ETA_GRID {
        let z = node as f64 * step;
        let mu_bl: f64 = solutions
            .iter()
            .map(|sol| sol.species.sphaleron_weight() * sol.mu(z))
            .sum();
        let weight = if node == 0 || node == ETA_GRID { 0.5 } else { 1.0 };
        integral += weight * mu_bl * (-nu * z).exp() * step;
    }

    let prefactor = 405.0 * rate / (4.0 * PI * PI * vw * g_star * tc);
    Ok(prefactor * integral)
}

fn phase_diagnostics(opts: &TransportOpts) -> BTreeMap<String, f64> {
    let mut phases = BTreeMap::new();
    let active = opts.method.species();
    for species in Species::ALL {
        let (sym, brk) = if active.contains(&species) {
            opts.cp.pair(species)
        } else {
            (0.0, 0.0)
        };
        phases.insert(
            format!("{}_{}_phase", species.label(), PhaseRegion::Symmetric.label()),
            sym,
        );
        phases.insert(
            format!("{}_{}_phase", species.label(), PhaseRegion::Broken.label()),
            brk,
        );
    }
    phases
}
