use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Ordered sequence of real scalar-field values.
///
/// A field point has no identity beyond its coordinates; the dimension is the
/// scalar count of the model that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint(Vec<f64>);

impl FieldPoint {
    /// Creates a field point from raw coordinates.
    pub fn new(coords: Vec<f64>) -> Self {
        Self(coords)
    }

    /// Creates the origin of the given dimension.
    pub fn zero(dim: usize) -> Self {
        Self(vec![0.0; dim])
    }

    /// Number of field directions.
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Borrows the raw coordinates.
    pub fn coords(&self) -> &[f64] {
        &self.0
    }

    /// Euclidean norm of the point.
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Euclidean distance to another point of the same dimension.
    pub fn distance(&self, other: &FieldPoint) -> f64 {
        debug_assert_eq!(self.dim(), other.dim());
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Returns a copy with every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> FieldPoint {
        FieldPoint(self.0.iter().map(|x| x * factor).collect())
    }

    /// Returns true if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }

    /// Consumes the point, yielding its coordinates.
    pub fn into_coords(self) -> Vec<f64> {
        self.0
    }
}

impl Index<usize> for FieldPoint {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.0[idx]
    }
}

impl IndexMut<usize> for FieldPoint {
    fn index_mut(&mut self, idx: usize) -> &mut f64 {
        &mut self.0[idx]
    }
}

impl From<Vec<f64>> for FieldPoint {
    fn from(coords: Vec<f64>) -> Self {
        Self(coords)
    }
}

/// Standard Model constants consumed by the models and the transport engine.
///
/// All dimensionful values are in GeV. The Yukawa couplings are derived from
/// the pole masses and the zero-temperature vev.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmConstants {
    /// Zero-temperature electroweak vacuum expectation value.
    pub vev0: f64,
    /// Top quark pole mass.
    pub mass_top: f64,
    /// Bottom quark pole mass.
    pub mass_bottom: f64,
    /// Tau lepton pole mass.
    pub mass_tau: f64,
    /// SU(2) gauge coupling.
    pub g_weak: f64,
    /// U(1) hypercharge gauge coupling.
    pub g_prime: f64,
    /// Effective relativistic degrees of freedom in the plasma.
    pub g_star: f64,
}

impl Default for SmConstants {
    fn default() -> Self {
        Self {
            vev0: 246.22,
            mass_top: 172.5,
            mass_bottom: 4.18,
            mass_tau: 1.777,
            g_weak: 0.6516,
            g_prime: 0.3574,
            g_star: 106.75,
        }
    }
}

impl SmConstants {
    /// Top Yukawa coupling `sqrt(2) m_t / v`.
    pub fn yukawa_top(&self) -> f64 {
        std::f64::consts::SQRT_2 * self.mass_top / self.vev0
    }

    /// Bottom Yukawa coupling `sqrt(2) m_b / v`.
    pub fn yukawa_bottom(&self) -> f64 {
        std::f64::consts::SQRT_2 * self.mass_bottom / self.vev0
    }

    /// Tau Yukawa coupling `sqrt(2) m_tau / v`.
    pub fn yukawa_tau(&self) -> f64 {
        std::f64::consts::SQRT_2 * self.mass_tau / self.vev0
    }

    /// Entropy density of the plasma at temperature `t`.
    pub fn entropy_density(&self, t: f64) -> f64 {
        2.0 * std::f64::consts::PI.powi(2) / 45.0 * self.g_star * t.powi(3)
    }
}
