use serde::{Deserialize, Serialize};

use ewbg_core::{ErrorInfo, EwbgError, FieldPoint, PotentialModel};

use crate::opts::CpPhases;
use crate::species::Species;

/// Number of samples taken along the inter-vacuum path when locating the
/// potential barrier.
const BARRIER_SAMPLES: usize = 128;

/// Relative floor applied to the barrier height near degeneracy.
const WALL_WIDTH_FLOOR: f64 = 1e-2;

/// Immutable bubble-wall profile connecting the two vacua at the critical
/// temperature.
///
/// The wall coordinate `z` runs from the broken phase (`z -> -inf`) to the
/// symmetric phase (`z -> +inf`); the field interpolates between the vacua
/// with a kink of width `lw` derived from the barrier height along the
/// straight inter-vacuum path. Construction freezes every derived quantity;
/// the ODE layer only reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallProfile {
    /// Critical temperature.
    pub tc: f64,
    /// Wall velocity.
    pub vw: f64,
    /// Wall width in inverse GeV.
    pub lw: f64,
    /// Broken-phase vacuum.
    pub broken: FieldPoint,
    /// Symmetric-phase vacuum.
    pub symmetric: FieldPoint,
    /// Norm of the broken vacuum.
    pub vc: f64,
}

impl WallProfile {
    /// Builds the profile from the transition data and the potential.
    ///
    /// The barrier height is the maximum of `V` along the straight path
    /// between the (degenerate) vacua, measured from the endpoint value; a
    /// relative floor keeps the width finite for marginal transitions.
    pub fn build(
        broken: &FieldPoint,
        symmetric: &FieldPoint,
        tc: f64,
        vw: f64,
        model: &dyn PotentialModel,
    ) -> Result<Self, EwbgError> {
        let vc = broken.distance(symmetric);
        let v_end = model
            .v_eff(broken, tc)
            .min(model.v_eff(symmetric, tc));
        let mut barrier = 0.0_f64;
        for k in 0..=BARRIER_SAMPLES {
            let s = k as f64 / BARRIER_SAMPLES as f64;
            let coords: Vec<f64> = (0..broken.dim())
                .map(|d| symmetric[d] + s * (broken[d] - symmetric[d]))
                .collect();
            let value = model.v_eff(&FieldPoint::new(coords), tc);
            barrier = barrier.max(value - v_end);
        }
        if !barrier.is_finite() {
            return Err(EwbgError::Transport(
                ErrorInfo::new("transport_profile", "barrier scan hit a non-finite potential")
                    .with_context("tc", tc.to_string()),
            ));
        }
        let floor = WALL_WIDTH_FLOOR * (vc * tc).powi(2).max(1e-12);
        let lw = vc / (8.0 * barrier.max(floor)).sqrt();
        Ok(Self {
            tc,
            vw,
            lw,
            broken: broken.clone(),
            symmetric: symmetric.clone(),
            vc,
        })
    }

    /// Fraction of the broken phase at wall coordinate `z`: 1 deep in the
    /// broken phase, 0 deep in the symmetric phase.
    pub fn wall_fraction(&self, z: f64) -> f64 {
        0.5 * (1.0 - (z / self.lw).tanh())
    }

    /// Field configuration at wall coordinate `z`.
    pub fn field(&self, z: f64) -> FieldPoint {
        let f = self.wall_fraction(z);
        let coords: Vec<f64> = (0..self.broken.dim())
            .map(|d| self.symmetric[d] + f * (self.broken[d] - self.symmetric[d]))
            .collect();
        FieldPoint::new(coords)
    }

    /// Squared fermion mass at wall coordinate `z` for the given Yukawa
    /// coupling.
    pub fn mass_sq(&self, yukawa: f64, z: f64) -> f64 {
        let h = self.field(z).norm();
        0.5 * yukawa * yukawa * h * h
    }

    /// Species mass deep in the broken phase.
    pub fn broken_mass(&self, yukawa: f64) -> f64 {
        yukawa * self.vc / std::f64::consts::SQRT_2
    }

    /// CP phase of a species at wall coordinate `z`: a kink between the
    /// broken- and symmetric-phase values with the same width as the wall.
    pub fn cp_phase(&self, species: Species, cp: &CpPhases, z: f64) -> f64 {
        let (sym, brk) = cp.pair(species);
        sym + (brk - sym) * self.wall_fraction(z)
    }

    /// Derivative of the CP phase with respect to `z`.
    pub fn cp_phase_deriv(&self, species: Species, cp: &CpPhases, z: f64) -> f64 {
        let (sym, brk) = cp.pair(species);
        let sech = 1.0 / (z / self.lw).cosh();
        -(brk - sym) * 0.5 * sech * sech / self.lw
    }
}
