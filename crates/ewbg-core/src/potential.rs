//! The potential-model seam between per-model algebra and the numeric engines.

use crate::types::FieldPoint;

/// Relative finite-difference step scale, tuned for f64 central differences.
const FD_STEP: f64 = 6.0e-6;

/// Effective potential of a beyond-Standard-Model scalar sector.
///
/// Implementations are pure functions of `(field configuration, temperature)`
/// and are immutable per model-parameter point: scale variation and parameter
/// updates construct a fresh value instead of mutating shared state, so a
/// single instance may be evaluated from many threads at once.
pub trait PotentialModel: Sync {
    /// Number of scalar-field directions minimized over.
    fn n_fields(&self) -> usize;

    /// Effective potential at the given field configuration and temperature.
    fn v_eff(&self, point: &FieldPoint, temperature: f64) -> f64;

    /// Gradient of the effective potential.
    ///
    /// The default uses central finite differences; models with analytic
    /// derivatives should override it.
    fn gradient(&self, point: &FieldPoint, temperature: f64) -> FieldPoint {
        let mut grad = vec![0.0; self.n_fields()];
        for (dir, slot) in grad.iter_mut().enumerate() {
            let h = fd_step(point[dir]);
            let mut fwd = point.clone();
            fwd[dir] += h;
            let mut bwd = point.clone();
            bwd[dir] -= h;
            *slot = (self.v_eff(&fwd, temperature) - self.v_eff(&bwd, temperature)) / (2.0 * h);
        }
        FieldPoint::new(grad)
    }

    /// Hessian of the effective potential, row major.
    ///
    /// The default differentiates [`PotentialModel::gradient`] with central
    /// differences, so analytic-gradient models get a second-order Hessian
    /// for free.
    fn hessian(&self, point: &FieldPoint, temperature: f64) -> Vec<Vec<f64>> {
        let n = self.n_fields();
        let mut hess = vec![vec![0.0; n]; n];
        for col in 0..n {
            let h = fd_step(point[col]);
            let mut fwd = point.clone();
            fwd[col] += h;
            let mut bwd = point.clone();
            bwd[col] -= h;
            let grad_fwd = self.gradient(&fwd, temperature);
            let grad_bwd = self.gradient(&bwd, temperature);
            for row in 0..n {
                hess[row][col] = (grad_fwd[row] - grad_bwd[row]) / (2.0 * h);
            }
        }
        // Symmetrize to suppress finite-difference noise.
        for row in 0..n {
            for col in (row + 1)..n {
                let avg = 0.5 * (hess[row][col] + hess[col][row]);
                hess[row][col] = avg;
                hess[col][row] = avg;
            }
        }
        hess
    }

    /// The symmetric (field-origin) configuration.
    fn symmetric_point(&self) -> FieldPoint {
        FieldPoint::zero(self.n_fields())
    }

    /// Zero-temperature tree vacuum, used to seed broken-side starts.
    fn tree_minimum(&self) -> FieldPoint;

    /// Per-direction search box for the global backends.
    fn bounds(&self) -> Vec<(f64, f64)>;

    /// Current renormalization scale.
    fn scale(&self) -> f64;

    /// Tree-level input parameters in canonical order.
    fn params(&self) -> Vec<f64>;

    /// Counterterm parameters in canonical order.
    fn counterterms(&self) -> Vec<f64>;

    /// Labels for the vev output columns, in coordinate order.
    fn vev_legend(&self) -> Vec<String>;
}

fn fd_step(coord: f64) -> f64 {
    FD_STEP * coord.abs().max(1.0)
}
