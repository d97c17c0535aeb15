#![allow(dead_code)]

use ewbg_core::{FieldPoint, PotentialModel};

/// Single-field thermal quartic `V = d (T^2 - t0^2) x^2 - e T x^3 +
/// (lambda / 4) x^4` with the textbook first-order transition at
/// `Tc = t0 / sqrt(1 - e^2 / (lambda d))` and `vc = 2 e Tc / lambda`.
pub struct QuarticToy {
    pub d: f64,
    pub e: f64,
    pub lambda: f64,
    pub t0: f64,
}

impl QuarticToy {
    /// Parameters giving `Tc ~ 100 GeV` and `vc / Tc ~ 1`.
    pub fn benchmark() -> Self {
        Self {
            d: 0.37,
            e: 0.05,
            lambda: 0.1,
            t0: 96.55,
        }
    }

    pub fn analytic_tc(&self) -> f64 {
        self.t0 / (1.0 - self.e * self.e / (self.lambda * self.d)).sqrt()
    }

    pub fn analytic_vc(&self) -> f64 {
        2.0 * self.e * self.analytic_tc() / self.lambda
    }
}

impl PotentialModel for QuarticToy {
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
        vec![(-500.0, 500.0)]
    }

    fn scale(&self) -> f64 {
        246.22
    }

    fn params(&self) -> Vec<f64> {
        vec![self.d, self.e, self.lambda, self.t0]
    }

    fn counterterms(&self) -> Vec<f64> {
        Vec::new()
    }

    fn vev_legend(&self) -> Vec<String> {
        vec!["omega".into()]
    }
}

/// Potential whose thermal mass never turns negative: the symmetric vacuum
/// is global at every temperature.
pub struct AlwaysSymmetric {
    pub stiffness: f64,
}

impl PotentialModel for AlwaysSymmetric {
    fn n_fields(&self) -> usize {
        1
    }

    fn v_eff(&self, point: &FieldPoint, temperature: f64) -> f64 {
        let x = point[0];
        self.stiffness * (temperature * temperature + 100.0) * x * x + 0.05 * x.powi(4)
    }

    fn tree_minimum(&self) -> FieldPoint {
        FieldPoint::new(vec![100.0])
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-500.0, 500.0)]
    }

    fn scale(&self) -> f64 {
        246.22
    }

    fn params(&self) -> Vec<f64> {
        vec![self.stiffness]
    }

    fn counterterms(&self) -> Vec<f64> {
        Vec::new()
    }

    fn vev_legend(&self) -> Vec<String> {
        vec!["omega".into()]
    }
}
