use serde::{Deserialize, Serialize};

use ewbg_core::SmConstants;

/// Fermion species carried by the transport system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Species {
    /// Top quark.
    Top,
    /// Bottom quark.
    Bottom,
    /// Tau lepton.
    Tau,
}

/// Phase region on either side of the bubble wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseRegion {
    /// Unbroken phase, `z > 0`.
    Symmetric,
    /// Broken phase, `z < 0`.
    Broken,
}

impl Species {
    /// All species in canonical (heaviest-first) order.
    pub const ALL: [Species; 3] = [Species::Top, Species::Bottom, Species::Tau];

    /// Short label used in output columns.
    pub fn label(&self) -> &'static str {
        match self {
            Species::Top => "top",
            Species::Bottom => "bot",
            Species::Tau => "tau",
        }
    }

    /// Whether the species feels the strong interaction.
    pub fn is_quark(&self) -> bool {
        matches!(self, Species::Top | Species::Bottom)
    }

    /// Yukawa coupling of the species.
    pub fn yukawa(&self, sm: &SmConstants) -> f64 {
        match self {
            Species::Top => sm.yukawa_top(),
            Species::Bottom => sm.yukawa_bottom(),
            Species::Tau => sm.yukawa_tau(),
        }
    }

    /// Left-handed doublet weight in the baryon-number source.
    pub fn sphaleron_weight(&self) -> f64 {
        0.5
    }
}

impl PhaseRegion {
    /// Short label used in output columns.
    pub fn label(&self) -> &'static str {
        match self {
            PhaseRegion::Symmetric => "sym",
            PhaseRegion::Broken => "brk",
        }
    }
}

// Fluid-approximation transport constants. Diffusion constants follow the
// standard quark/lepton values `D_q = 6/T`, `D_l = 100/T`; the thermal
// relaxation widths are `0.16 T` for quarks (strong-sphaleron dominated)
// and `0.002 T` for leptons, with the broken phase picking up a
// mass-induced contribution `m^2 / (50 T)`.
const DIFFUSION_QUARK: f64 = 6.0;
const DIFFUSION_LEPTON: f64 = 100.0;
const WIDTH_QUARK: f64 = 0.16;
const WIDTH_LEPTON: f64 = 2.0e-3;
const MASS_RELAXATION_DENOM: f64 = 50.0;

/// Coefficient set of the transport equation for one `(species, region)`
/// combination.
///
/// All six combinations are produced by this one builder; the per-species
/// physical distinctness lives entirely in the coefficient values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportCoefficients {
    /// Diffusion constant `D`.
    pub diffusion: f64,
    /// Relaxation rate `Gamma`.
    pub relaxation: f64,
    /// Dimensionless source normalization.
    pub source_strength: f64,
    /// CP phase deep in this region.
    pub cp_phase: f64,
}

/// Builds the transport coefficients for a species in a phase region.
///
/// `broken_mass` is the species mass deep in the broken phase; it only
/// enters the broken-region relaxation rate.
pub fn coefficients(
    species: Species,
    region: PhaseRegion,
    tc: f64,
    broken_mass: f64,
    cp_pair: (f64, f64),
) -> TransportCoefficients {
    let (diffusion_coeff, width) = if species.is_quark() {
        (DIFFUSION_QUARK, WIDTH_QUARK)
    } else {
        (DIFFUSION_LEPTON, WIDTH_LEPTON)
    };
    let diffusion = diffusion_coeff / tc;
    let relaxation = match region {
        PhaseRegion::Symmetric => width * tc,
        PhaseRegion::Broken => width * tc + broken_mass * broken_mass / (MASS_RELAXATION_DENOM * tc),
    };
    let cp_phase = match region {
        PhaseRegion::Symmetric => cp_pair.0,
        PhaseRegion::Broken => cp_pair.1,
    };
    TransportCoefficients {
        diffusion,
        relaxation,
        source_strength: 1.0,
        cp_phase,
    }
}
