//! Per-species transport ODE construction and the shooting solve across the
//! wall.

use ewbg_core::{ErrorInfo, EwbgError};

use crate::integrate::{integrate_adaptive, OdeOpts, OdeSolution};
use crate::opts::TransportOpts;
use crate::profile::WallProfile;
use crate::species::{coefficients, PhaseRegion, Species, TransportCoefficients};

/// Relative offset used when differentiating the CP source numerically.
const SOURCE_FD_FRACTION: f64 = 1e-3;

/// One phase region's share of a species solution.
///
/// The particular and homogeneous trajectories are integrated from the
/// outer truncation boundary inward to the wall, so the mode decaying into
/// the bulk is the one growing along the integration direction — the
/// numerically stable orientation. The bulk boundary condition
/// `mu(±z_max) -> 0` is then satisfied by construction up to the
/// exponentially small matched tail.
#[derive(Debug, Clone)]
pub struct RegionSolution {
    particular: OdeSolution,
    homogeneous: OdeSolution,
    weight: f64,
}

impl RegionSolution {
    /// Chemical potential at wall coordinate `z` within this region.
    pub fn mu(&self, z: f64) -> f64 {
        self.particular.sample(z)[0] + self.weight * self.homogeneous.sample(z)[0]
    }

    /// Derivative of the chemical potential at `z`.
    pub fn mu_prime(&self, z: f64) -> f64 {
        self.particular.sample(z)[1] + self.weight * self.homogeneous.sample(z)[1]
    }

    /// Evaluations spent on this region.
    pub fn evals(&self) -> usize {
        self.particular.evals + self.homogeneous.evals
    }

    /// `(mu, mu')` of the particular and homogeneous parts at the wall.
    fn wall_state(&self) -> WallState {
        let p = self.particular.terminal();
        let h = self.homogeneous.terminal();
        WallState {
            p_mu: p[0],
            p_slope: p[1],
            h_mu: h[0],
            h_slope: h[1],
        }
    }
}

struct WallState {
    p_mu: f64,
    p_slope: f64,
    h_mu: f64,
    h_slope: f64,
}

/// Matched two-region solution for one species.
#[derive(Debug, Clone)]
pub struct SpeciesSolution {
    /// The species this solution belongs to.
    pub species: Species,
    /// Symmetric-region trajectories, `z in [0, z_max]`.
    pub symmetric: RegionSolution,
    /// Broken-region trajectories, `z in [-z_max, 0]`.
    pub broken: RegionSolution,
}

impl SpeciesSolution {
    /// Chemical potential at any wall coordinate.
    pub fn mu(&self, z: f64) -> f64 {
        if z >= 0.0 {
            self.symmetric.mu(z)
        } else {
            self.broken.mu(z)
        }
    }

    /// Chemical potential at the wall.
    pub fn mu_at_wall(&self) -> f64 {
        self.symmetric.mu(0.0)
    }
}

/// Solves the transport equation for one species across both phase regions.
///
/// Each region carries the linear system `D mu'' + vw mu' - Gamma mu = S(z)`
/// in first-order form. Both regions are integrated from their truncation
/// boundary inward to the wall (particular trajectory from a zero state,
/// homogeneous trajectory fixing the free constant), and the continuity of
/// `mu` and of the diffusive flux at `z = 0` closes a 2x2 system for the
/// two homogeneous weights. A singular matching system means the decaying
/// modes cannot satisfy continuity and is reported as `transport_decay`.
pub fn solve_species(
    profile: &WallProfile,
    species: Species,
    opts: &TransportOpts,
    z_max: f64,
) -> Result<SpeciesSolution, EwbgError> {
    let yukawa = species.yukawa(&opts.sm);
    let broken_mass = profile.broken_mass(yukawa);
    let cp_pair = opts.cp.pair(species);
    let coeff_sym = coefficients(
        species,
        PhaseRegion::Symmetric,
        profile.tc,
        broken_mass,
        cp_pair,
    );
    let coeff_brk = coefficients(
        species,
        PhaseRegion::Broken,
        profile.tc,
        broken_mass,
        cp_pair,
    );

    let ode_opts = OdeOpts {
        rel_tol: opts.rel_tol,
        abs_tol: opts.abs_tol,
        max_evals: opts.max_step_evals,
        ..OdeOpts::default()
    };

    let mut symmetric = solve_region(profile, species, yukawa, &coeff_sym, z_max, &ode_opts, opts)?;
    let mut broken = solve_region(profile, species, yukawa, &coeff_brk, -z_max, &ode_opts, opts)?;

    // Continuity at the wall: mu and D mu' agree across regions. The
    // diffusion constant of a species is temperature-set and identical on
    // both sides, so the flux condition reduces to the slope.
    let sym = symmetric.wall_state();
    let brk = broken.wall_state();
    let a11 = sym.h_mu;
    let a12 = -brk.h_mu;
    let a21 = sym.h_slope;
    let a22 = -brk.h_slope;
    let b1 = brk.p_mu - sym.p_mu;
    let b2 = brk.p_slope - sym.p_slope;
    let det = a11 * a22 - a12 * a21;
    let row1 = a11.abs().max(a12.abs());
    let row2 = a21.abs().max(a22.abs());
    if !det.is_finite() || det.abs() <= 1e-12 * row1 * row2 {
        return Err(EwbgError::Transport(
            ErrorInfo::new("transport_decay", "decay matching system is singular")
                .with_context("species", species.label())
                .with_context("z_max", format!("{z_max:.3e}")),
        ));
    }
    symmetric.weight = (b1 * a22 - a12 * b2) / det;
    broken.weight = (a11 * b2 - a21 * b1) / det;

    Ok(SpeciesSolution {
        species,
        symmetric,
        broken,
    })
}

/// Integrates the particular and homogeneous systems of one region from the
/// truncation boundary `z_edge` inward to the wall at `z = 0`.
fn solve_region(
    profile: &WallProfile,
    species: Species,
    yukawa: f64,
    coeff: &TransportCoefficients,
    z_edge: f64,
    ode_opts: &OdeOpts,
    opts: &TransportOpts,
) -> Result<RegionSolution, EwbgError> {
    let vw = profile.vw;
    let tc = profile.tc;
    let diffusion = coeff.diffusion;
    let relaxation = coeff.relaxation;
    let strength = coeff.source_strength;
    let delta = SOURCE_FD_FRACTION * profile.lw;

    let source = |z: f64| -> f64 {
        let g =
            |zz: f64| profile.mass_sq(yukawa, zz) * profile.cp_phase_deriv(species, &opts.cp, zz);
        strength * vw * (g(z + delta) - g(z - delta)) / (2.0 * delta) / (tc * tc)
    };

    let with_source = |z: f64, y: &[f64]| -> Vec<f64> {
        vec![
            y[1],
            (source(z) - vw * y[1] + relaxation * y[0]) / diffusion,
        ]
    };
    let homogeneous = |_z: f64, y: &[f64]| -> Vec<f64> {
        vec![y[1], (-vw * y[1] + relaxation * y[0]) / diffusion]
    };

    let particular = integrate_adaptive(with_source, z_edge, &[0.0, 0.0], 0.0, ode_opts)?;
    let hom = integrate_adaptive(homogeneous, z_edge, &[1.0, 0.0], 0.0, ode_opts)?;

    Ok(RegionSolution {
        particular,
        homogeneous: hom,
        weight: 0.0,
    })
}
