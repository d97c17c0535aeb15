#![allow(dead_code)]

use ewbg_core::{FieldPoint, PotentialModel};

/// Single-field potential with exactly degenerate minima at the origin and
/// at `vc`, shaped so the wall width comes out near `5 / Tc` for the
/// benchmark point `Tc = 100`, `vc = 150`.
pub struct DegenerateWell {
    pub vc: f64,
    pub k: f64,
}

impl DegenerateWell {
    pub fn benchmark() -> Self {
        Self {
            vc: 150.0,
            k: 0.0356,
        }
    }
}

impl PotentialModel for DegenerateWell {
    fn n_fields(&self) -> usize {
        1
    }

    fn v_eff(&self, point: &FieldPoint, _temperature: f64) -> f64 {
        let x = point[0];
        self.k * x * x * (x - self.vc) * (x - self.vc)
    }

    fn tree_minimum(&self) -> FieldPoint {
        FieldPoint::new(vec![self.vc])
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-400.0, 400.0)]
    }

    fn scale(&self) -> f64 {
        246.22
    }

    fn params(&self) -> Vec<f64> {
        vec![self.vc, self.k]
    }

    fn counterterms(&self) -> Vec<f64> {
        Vec::new()
    }

    fn vev_legend(&self) -> Vec<String> {
        vec!["omega".into()]
    }
}
