use serde::{Deserialize, Serialize};

use ewbg_core::{ErrorInfo, EwbgError, FieldPoint, PotentialModel};

/// Single-field thermal quartic potential
/// `V = d (T^2 - t0^2) x^2 - e T x^3 + (lambda / 4) x^4`.
///
/// The transition is analytically solvable, which makes this the reference
/// model for pinning the transition finder: `Tc = t0 / sqrt(1 - e^2 /
/// (lambda d))` and `vc = 2 e Tc / lambda`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarticModel {
    /// Thermal mass coefficient.
    pub d: f64,
    /// Cubic coefficient driving the barrier.
    pub e: f64,
    /// Quartic self-coupling.
    pub lambda: f64,
    /// Temperature at which the symmetric origin destabilizes.
    pub t0: f64,
}

impl QuarticModel {
    /// Validates the couplings and constructs the model.
    pub fn new(d: f64, e: f64, lambda: f64, t0: f64) -> Result<Self, EwbgError> {
        if !(d > 0.0 && lambda > 0.0 && t0 > 0.0) || e < 0.0 {
            return Err(EwbgError::Model(
                ErrorInfo::new("quartic_couplings", "quartic model needs d, lambda, t0 > 0 and e >= 0")
                    .with_context("d", d.to_string())
                    .with_context("e", e.to_string())
                    .with_context("lambda", lambda.to_string())
                    .with_context("t0", t0.to_string()),
            ));
        }
        if e * e >= lambda * d {
            return Err(EwbgError::Model(
                ErrorInfo::new("quartic_unbounded", "e^2 must stay below lambda * d")
                    .with_hint("reduce the cubic coefficient or stiffen the quartic"),
            ));
        }
        Ok(Self { d, e, lambda, t0 })
    }

    /// Parses `d e lambda t0` from a whitespace-delimited row.
    pub fn from_fields(fields: &[f64]) -> Result<Self, EwbgError> {
        if fields.len() < 4 {
            return Err(EwbgError::Input(
                ErrorInfo::new("quartic_row", "quartic model expects four parameter columns")
                    .with_context("got", fields.len().to_string()),
            ));
        }
        Self::new(fields[0], fields[1], fields[2], fields[3])
    }

    /// Analytic critical temperature.
    pub fn critical_temperature(&self) -> f64 {
        self.t0 / (1.0 - self.e * self.e / (self.lambda * self.d)).sqrt()
    }

    /// Analytic broken vev at the critical temperature.
    pub fn critical_vev(&self) -> f64 {
        2.0 * self.e * self.critical_temperature() / self.lambda
    }
}

impl PotentialModel for QuarticModel {
    fn n_fields(&self) -> usize {
        1
    }

    fn v_eff(&self, point: &FieldPoint, temperature: f64) -> f64 {
        let x = point[0];
        let mass_sq = self.d * (temperature * temperature - self.t0 * self.t0);
        mass_sq * x * x - self.e * temperature * x.powi(3) + 0.25 * self.lambda * x.powi(4)
    }

    fn gradient(&self, point: &FieldPoint, temperature: f64) -> FieldPoint {
        let x = point[0];
        let mass_sq = self.d * (temperature * temperature - self.t0 * self.t0);
        FieldPoint::new(vec![
            2.0 * mass_sq * x - 3.0 * self.e * temperature * x * x + self.lambda * x.powi(3),
        ])
    }

    fn hessian(&self, point: &FieldPoint, temperature: f64) -> Vec<Vec<f64>> {
        let x = point[0];
        let mass_sq = self.d * (temperature * temperature - self.t0 * self.t0);
        vec![vec![
            2.0 * mass_sq - 6.0 * self.e * temperature * x + 3.0 * self.lambda * x * x,
        ]]
    }

    fn tree_minimum(&self) -> FieldPoint {
        FieldPoint::new(vec![self.t0 * (2.0 * self.d / self.lambda).sqrt()])
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        let reach = 4.0 * self.tree_minimum()[0].abs().max(100.0);
        vec![(-reach, reach)]
    }

    fn scale(&self) -> f64 {
        self.t0
    }

    fn params(&self) -> Vec<f64> {
        vec![self.d, self.e, self.lambda, self.t0]
    }

    fn counterterms(&self) -> Vec<f64> {
        Vec::new()
    }

    fn vev_legend(&self) -> Vec<String> {
        vec!["omega_c".into()]
    }
}
