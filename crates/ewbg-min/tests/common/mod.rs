#![allow(dead_code)]

use ewbg_core::{FieldPoint, PotentialModel};

/// One-dimensional double well `V = -a x^2 + b x^4` with minima at
/// `x = ±sqrt(a / 2b)` and a local maximum at the origin.
pub struct DoubleWell {
    pub a: f64,
    pub b: f64,
}

impl DoubleWell {
    pub fn vacuum(&self) -> f64 {
        (self.a / (2.0 * self.b)).sqrt()
    }
}

impl PotentialModel for DoubleWell {
    fn n_fields(&self) -> usize {
        1
    }

    fn v_eff(&self, point: &FieldPoint, _temperature: f64) -> f64 {
        let x = point[0];
        -self.a * x * x + self.b * x.powi(4)
    }

    fn gradient(&self, point: &FieldPoint, _temperature: f64) -> FieldPoint {
        let x = point[0];
        FieldPoint::new(vec![-2.0 * self.a * x + 4.0 * self.b * x.powi(3)])
    }

    fn hessian(&self, point: &FieldPoint, _temperature: f64) -> Vec<Vec<f64>> {
        let x = point[0];
        vec![vec![-2.0 * self.a + 12.0 * self.b * x * x]]
    }

    fn tree_minimum(&self) -> FieldPoint {
        FieldPoint::new(vec![self.vacuum()])
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-500.0, 500.0)]
    }

    fn scale(&self) -> f64 {
        self.vacuum()
    }

    fn params(&self) -> Vec<f64> {
        vec![self.a, self.b]
    }

    fn counterterms(&self) -> Vec<f64> {
        Vec::new()
    }

    fn vev_legend(&self) -> Vec<String> {
        vec!["omega".into()]
    }
}

/// Convex quadratic bowl centred away from the origin.
pub struct Bowl {
    pub center: Vec<f64>,
    pub stiffness: f64,
}

impl PotentialModel for Bowl {
    fn n_fields(&self) -> usize {
        self.center.len()
    }

    fn v_eff(&self, point: &FieldPoint, _temperature: f64) -> f64 {
        self.center
            .iter()
            .enumerate()
            .map(|(dir, c)| self.stiffness * (point[dir] - c).powi(2))
            .sum()
    }

    fn tree_minimum(&self) -> FieldPoint {
        FieldPoint::new(self.center.clone())
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-100.0, 100.0); self.center.len()]
    }

    fn scale(&self) -> f64 {
        1.0
    }

    fn params(&self) -> Vec<f64> {
        self.center.clone()
    }

    fn counterterms(&self) -> Vec<f64> {
        Vec::new()
    }

    fn vev_legend(&self) -> Vec<String> {
        (0..self.center.len()).map(|d| format!("x{d}")).collect()
    }
}
