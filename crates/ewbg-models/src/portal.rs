use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use ewbg_core::{ErrorInfo, EwbgError, FieldPoint, PotentialModel, SmConstants};

/// Loop factor `1 / 64 pi^2` of the Coleman-Weinberg potential.
const LOOP_FACTOR: f64 = 1.0 / (64.0 * PI * PI);

/// MS-bar constants: gauge bosons versus scalars and fermions.
const CW_GAUGE: f64 = 5.0 / 6.0;
const CW_SCALAR_FERMION: f64 = 1.5;

/// Finite-difference step fraction for the counterterm conditions.
const CT_FD_FRACTION: f64 = 1e-4;

/// Tree-level inputs of the dark-portal model: the two scalar masses, the
/// dark gauge boson mass, the mixing angle and the dark gauge coupling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortalParams {
    /// Mass of the lighter (SM-like) Higgs.
    pub mh1: f64,
    /// Mass of the heavier scalar.
    pub mh2: f64,
    /// Dark gauge boson mass.
    pub mx: f64,
    /// Scalar mixing angle in radians.
    pub alpha: f64,
    /// Dark gauge coupling.
    pub gx: f64,
}

impl PortalParams {
    /// Parses the canonical input columns `MH1 MH2 MX alpha v gX`,
    /// optionally preceded by an index column. The `v` column is read for
    /// format compatibility but the electroweak vev is always pinned to its
    /// measured value.
    pub fn from_line(line: &str, use_index_col: bool) -> Result<Self, EwbgError> {
        let mut fields = line.split_whitespace().map(str::parse::<f64>);
        if use_index_col {
            fields.next();
        }
        let mut take = |name: &str| -> Result<f64, EwbgError> {
            fields
                .next()
                .transpose()
                .map_err(|err| {
                    EwbgError::Input(
                        ErrorInfo::new("portal_row_parse", "non-numeric parameter column")
                            .with_context("column", name)
                            .with_context("cause", err.to_string()),
                    )
                })?
                .ok_or_else(|| {
                    EwbgError::Input(
                        ErrorInfo::new("portal_row_short", "parameter row ended early")
                            .with_context("column", name),
                    )
                })
        };
        let mh1 = take("MH1")?;
        let mh2 = take("MH2")?;
        let mx = take("MX")?;
        let alpha = take("alpha")?;
        let _v = take("v")?;
        let gx = take("gX")?;
        let params = Self {
            mh1,
            mh2,
            mx,
            alpha,
            gx,
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<(), EwbgError> {
        if !(self.mh1 > 0.0 && self.mh2 > 0.0 && self.mx > 0.0) || self.gx == 0.0 {
            return Err(EwbgError::Model(
                ErrorInfo::new(
                    "portal_params",
                    "masses must be positive and the dark coupling non-zero",
                )
                .with_context("mh1", self.mh1.to_string())
                .with_context("mh2", self.mh2.to_string())
                .with_context("mx", self.mx.to_string())
                .with_context("gx", self.gx.to_string()),
            ));
        }
        Ok(())
    }

    /// Dark singlet vev fixed by the gauge boson mass.
    pub fn vs(&self) -> f64 {
        self.mx / self.gx
    }
}

/// Counterterm parameters in the order of the tree operator basis, plus the
/// two tadpoles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
struct Counterterms {
    d_mu_h_sq: f64,
    d_lambda_h: f64,
    d_kappa: f64,
    d_mu_s_sq: f64,
    d_lambda_s: f64,
    d_t_h: f64,
    d_t_s: f64,
}

/// SM Higgs doublet plus a dark-charged complex singlet, reduced to the two
/// vev directions `(h, s)`.
///
/// The quartic couplings are fixed from the mass spectrum and mixing angle
/// through the tadpole conditions; the effective potential is tree +
/// counterterms + Coleman-Weinberg + high-temperature thermal corrections
/// with the daisy-resummed gauge cubic. Counterterms are chosen so the
/// one-loop vacuum and scalar masses sit exactly at their tree values, and
/// are recomputed whenever the renormalization scale changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkPortalModel {
    params: PortalParams,
    sm: SmConstants,
    v: f64,
    vs: f64,
    lambda_h: f64,
    lambda_s: f64,
    kappa: f64,
    mu_h_sq: f64,
    mu_s_sq: f64,
    scale: f64,
    ct: Counterterms,
}

impl DarkPortalModel {
    /// Builds the model at the default renormalization scale (the
    /// electroweak vev).
    pub fn new(params: PortalParams, sm: SmConstants) -> Result<Self, EwbgError> {
        params.validate()?;
        let v = sm.vev0;
        let vs = params.vs();
        let (sin_a, cos_a) = params.alpha.sin_cos();
        let mh1_sq = params.mh1 * params.mh1;
        let mh2_sq = params.mh2 * params.mh2;

        // Tadpole conditions of the active parameterization.
        let lambda_h = (mh1_sq * cos_a * cos_a + mh2_sq * sin_a * sin_a) / (2.0 * v * v);
        let lambda_s = (mh2_sq * cos_a * cos_a + mh1_sq * sin_a * sin_a) / (2.0 * vs * vs);
        let kappa = (mh1_sq - mh2_sq) * sin_a * cos_a / (v * vs);
        let mu_h_sq = vs * vs * kappa / 2.0 + v * v * lambda_h;
        let mu_s_sq = kappa * v * v / 2.0 + lambda_s * vs * vs;

        let mut model = Self {
            params,
            sm,
            v,
            vs,
            lambda_h,
            lambda_s,
            kappa,
            mu_h_sq,
            mu_s_sq,
            scale: v,
            ct: Counterterms::default(),
        };
        model.ct = model.solve_counterterms();
        Ok(model)
    }

    /// Rebuilds the model at a different renormalization scale, recomputing
    /// the counterterms so the zero-temperature vacuum stays in place.
    pub fn with_scale(&self, scale: f64) -> Result<Self, EwbgError> {
        if !(scale > 0.0) || !scale.is_finite() {
            return Err(EwbgError::Model(
                ErrorInfo::new("portal_scale", "renormalization scale must be positive")
                    .with_context("scale", scale.to_string()),
            ));
        }
        let mut model = self.clone();
        model.scale = scale;
        model.ct = model.solve_counterterms();
        Ok(model)
    }

    /// Input parameters in the canonical order of the original legend.
    pub fn portal_params(&self) -> &PortalParams {
        &self.params
    }

    /// Labels of the counterterm vector.
    pub fn ct_legend() -> Vec<String> {
        ["dmuHSq", "dlambdaH", "dkappa", "dmuSSq", "dlambdaS", "dTh", "dTs"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn v_tree(&self, h: f64, s: f64) -> f64 {
        -0.5 * self.mu_h_sq * h * h + 0.25 * self.lambda_h * h.powi(4)
            - 0.5 * self.mu_s_sq * s * s
            + 0.25 * self.lambda_s * s.powi(4)
            + 0.25 * self.kappa * h * h * s * s
    }

    fn v_counter(&self, h: f64, s: f64) -> f64 {
        let ct = &self.ct;
        -0.5 * ct.d_mu_h_sq * h * h + 0.25 * ct.d_lambda_h * h.powi(4)
            - 0.5 * ct.d_mu_s_sq * s * s
            + 0.25 * ct.d_lambda_s * s.powi(4)
            + 0.25 * ct.d_kappa * h * h * s * s
            + ct.d_t_h * h
            + ct.d_t_s * s
    }

    /// Tree-level scalar mass matrix in the `(h, s)` directions.
    fn scalar_mass_matrix(&self, h: f64, s: f64) -> [[f64; 2]; 2] {
        let hh = -self.mu_h_sq + 3.0 * self.lambda_h * h * h + 0.5 * self.kappa * s * s;
        let ss = -self.mu_s_sq + 3.0 * self.lambda_s * s * s + 0.5 * self.kappa * h * h;
        let hs = self.kappa * h * s;
        [[hh, hs], [hs, ss]]
    }

    /// Field-dependent `(mass^2, dof, msbar constant)` triplets entering
    /// the one-loop sum.
    fn mass_spectrum(&self, h: f64, s: f64) -> Vec<(f64, f64, f64)> {
        let sm = &self.sm;
        let g_sq = sm.g_weak * sm.g_weak;
        let gz_sq = g_sq + sm.g_prime * sm.g_prime;
        let m = self.scalar_mass_matrix(h, s);
        let trace = m[0][0] + m[1][1];
        let disc = (0.25 * (m[0][0] - m[1][1]).powi(2) + m[0][1] * m[0][1]).sqrt();

        vec![
            (0.25 * g_sq * h * h, 6.0, CW_GAUGE),
            (0.25 * gz_sq * h * h, 3.0, CW_GAUGE),
            (self.params.gx * self.params.gx * s * s, 3.0, CW_GAUGE),
            (0.5 * trace + disc, 1.0, CW_SCALAR_FERMION),
            (0.5 * trace - disc, 1.0, CW_SCALAR_FERMION),
            (0.5 * sm.yukawa_top().powi(2) * h * h, -12.0, CW_SCALAR_FERMION),
            (0.5 * sm.yukawa_bottom().powi(2) * h * h, -12.0, CW_SCALAR_FERMION),
            (0.5 * sm.yukawa_tau().powi(2) * h * h, -4.0, CW_SCALAR_FERMION),
        ]
    }

    fn v_coleman_weinberg(&self, h: f64, s: f64) -> f64 {
        let mu_sq = self.scale * self.scale;
        self.mass_spectrum(h, s)
            .into_iter()
            .map(|(m_sq, dof, c)| {
                let m_abs = m_sq.abs();
                if m_abs < 1e-100 {
                    0.0
                } else {
                    dof * m_sq * m_sq * ((m_abs / mu_sq).ln() - c)
                }
            })
            .sum::<f64>()
            * LOOP_FACTOR
    }

    fn v_thermal(&self, h: f64, s: f64, t: f64) -> f64 {
        let sm = &self.sm;
        let g_sq = sm.g_weak * sm.g_weak;
        let gp_sq = sm.g_prime * sm.g_prime;
        // High-temperature Debye coefficients of the two directions.
        let c_h = (3.0 * g_sq + gp_sq) / 16.0
            + sm.yukawa_top().powi(2) / 4.0
            + sm.yukawa_bottom().powi(2) / 4.0
            + sm.yukawa_tau().powi(2) / 12.0
            + self.lambda_h / 2.0
            + self.kappa / 24.0;
        let c_s =
            self.lambda_s / 4.0 + self.kappa / 6.0 + self.params.gx * self.params.gx / 4.0;
        let quadratic = 0.5 * t * t * (c_h * h * h + c_s * s * s);

        // Daisy-resummed gauge cubic; this is what carries the barrier.
        let m_w = (0.25 * g_sq * h * h).max(0.0).sqrt();
        let m_z = (0.25 * (g_sq + gp_sq) * h * h).max(0.0).sqrt();
        let m_x = (self.params.gx * self.params.gx * s * s).max(0.0).sqrt();
        let cubic = -t / (12.0 * PI) * (6.0 * m_w.powi(3) + 3.0 * m_z.powi(3) + 3.0 * m_x.powi(3));

        quadratic + cubic
    }

    /// Fixes the counterterm basis so that the gradient and Hessian of the
    /// Coleman-Weinberg piece vanish at the tree vacuum.
    fn solve_counterterms(&self) -> Counterterms {
        let v = self.v;
        let vs = self.vs;
        let grad = self.cw_gradient(v, vs);
        let hess = self.cw_hessian(v, vs);

        let d_kappa = -hess[0][1] / (v * vs);
        let d_lambda_h = (grad[0] / v - hess[0][0]) / (2.0 * v * v);
        let d_mu_h_sq = grad[0] / v + d_lambda_h * v * v + 0.5 * d_kappa * vs * vs;
        let d_lambda_s = (grad[1] / vs - hess[1][1]) / (2.0 * vs * vs);
        let d_mu_s_sq = grad[1] / vs + d_lambda_s * vs * vs + 0.5 * d_kappa * v * v;

        Counterterms {
            d_mu_h_sq,
            d_lambda_h,
            d_kappa,
            d_mu_s_sq,
            d_lambda_s,
            d_t_h: 0.0,
            d_t_s: 0.0,
        }
    }

    fn cw_gradient(&self, h: f64, s: f64) -> [f64; 2] {
        let dh = CT_FD_FRACTION * h.abs().max(1.0);
        let ds = CT_FD_FRACTION * s.abs().max(1.0);
        [
            (self.v_coleman_weinberg(h + dh, s) - self.v_coleman_weinberg(h - dh, s)) / (2.0 * dh),
            (self.v_coleman_weinberg(h, s + ds) - self.v_coleman_weinberg(h, s - ds)) / (2.0 * ds),
        ]
    }

    fn cw_hessian(&self, h: f64, s: f64) -> [[f64; 2]; 2] {
        let dh = CT_FD_FRACTION * h.abs().max(1.0);
        let ds = CT_FD_FRACTION * s.abs().max(1.0);
        let f = |h: f64, s: f64| self.v_coleman_weinberg(h, s);
        let hh = (f(h + dh, s) - 2.0 * f(h, s) + f(h - dh, s)) / (dh * dh);
        let ss = (f(h, s + ds) - 2.0 * f(h, s) + f(h, s - ds)) / (ds * ds);
        let hs = (f(h + dh, s + ds) - f(h + dh, s - ds) - f(h - dh, s + ds) + f(h - dh, s - ds))
            / (4.0 * dh * ds);
        [[hh, hs], [hs, ss]]
    }
}

impl PotentialModel for DarkPortalModel {
    fn n_fields(&self) -> usize {
        2
    }

    fn v_eff(&self, point: &FieldPoint, temperature: f64) -> f64 {
        let (h, s) = (point[0], point[1]);
        self.v_tree(h, s)
            + self.v_counter(h, s)
            + self.v_coleman_weinberg(h, s)
            + self.v_thermal(h, s, temperature)
    }

    fn tree_minimum(&self) -> FieldPoint {
        FieldPoint::new(vec![self.v, self.vs])
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        let reach_h = 3.0 * self.v;
        let reach_s = 3.0 * self.vs.abs().max(self.v);
        vec![(-reach_h, reach_h), (-reach_s, reach_s)]
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn params(&self) -> Vec<f64> {
        vec![
            self.params.mh1,
            self.params.mh2,
            self.v,
            self.vs,
            self.params.alpha,
            self.params.mx,
        ]
    }

    fn counterterms(&self) -> Vec<f64> {
        vec![
            self.ct.d_mu_h_sq,
            self.ct.d_lambda_h,
            self.ct.d_kappa,
            self.ct.d_mu_s_sq,
            self.ct.d_lambda_s,
            self.ct.d_t_h,
            self.ct.d_t_s,
        ]
    }

    fn vev_legend(&self) -> Vec<String> {
        vec!["omega_c".into(), "omega_sc".into()]
    }
}
