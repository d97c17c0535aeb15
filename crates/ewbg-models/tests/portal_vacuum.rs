use ewbg_core::{FieldPoint, PotentialModel, SmConstants};
use ewbg_min::{find_minimum, MinimizeOpts};
use ewbg_models::{DarkPortalModel, PortalParams};

fn benchmark() -> DarkPortalModel {
    let params = PortalParams {
        mh1: 125.09,
        mh2: 300.0,
        mx: 200.0,
        alpha: 0.1,
        gx: 0.65,
    };
    DarkPortalModel::new(params, SmConstants::default()).expect("valid point")
}

#[test]
fn tree_vacuum_is_stationary_at_zero_temperature() {
    let model = benchmark();
    let vacuum = model.tree_minimum();
    let grad = model.gradient(&vacuum, 0.0);
    let scale = vacuum.norm().powi(3);
    assert!(
        grad.norm() < 1e-6 * scale,
        "tadpole violated: |grad| = {}",
        grad.norm()
    );
}

#[test]
fn one_loop_masses_reproduce_the_inputs() {
    let model = benchmark();
    let vacuum = model.tree_minimum();
    let hess = model.hessian(&vacuum, 0.0);

    let trace = hess[0][0] + hess[1][1];
    let disc = (0.25 * (hess[0][0] - hess[1][1]).powi(2) + hess[0][1] * hess[0][1]).sqrt();
    let mut eigen = [0.5 * trace - disc, 0.5 * trace + disc];
    eigen.sort_by(f64::total_cmp);

    let mh1_sq = 125.09_f64.powi(2);
    let mh2_sq = 300.0_f64.powi(2);
    assert!(
        (eigen[0] - mh1_sq).abs() < 0.01 * mh1_sq,
        "light mass off: {} vs {mh1_sq}",
        eigen[0]
    );
    assert!(
        (eigen[1] - mh2_sq).abs() < 0.01 * mh2_sq,
        "heavy mass off: {} vs {mh2_sq}",
        eigen[1]
    );
}

#[test]
fn scale_reset_keeps_the_vacuum_in_place() {
    let model = benchmark();
    let rescaled = model.with_scale(0.5 * model.scale()).expect("rescale");
    assert!((rescaled.scale() - 0.5 * model.scale()).abs() < 1e-9);

    let vacuum = rescaled.tree_minimum();
    let grad = rescaled.gradient(&vacuum, 0.0);
    assert!(grad.norm() < 1e-6 * vacuum.norm().powi(3));

    // The counterterms must actually move with the scale.
    assert_ne!(model.counterterms(), rescaled.counterterms());
}

#[test]
fn minimizer_lands_on_the_tree_vacuum() {
    let model = benchmark();
    let result = find_minimum(&model, 0.0, &[], &MinimizeOpts::default()).expect("solve");
    assert!(result.is_converged());

    let vacuum = model.tree_minimum();
    // The potential is even in both fields, so compare magnitudes.
    assert!((result.point[0].abs() - vacuum[0]).abs() < 1.0);
    assert!((result.point[1].abs() - vacuum[1].abs()).abs() < 1.0);
}

#[test]
fn counterterm_vector_matches_the_legend() {
    let model = benchmark();
    assert_eq!(model.counterterms().len(), DarkPortalModel::ct_legend().len());
    // Tadpole slots of the reduced basis are identically zero.
    let ct = model.counterterms();
    assert_eq!(ct[5], 0.0);
    assert_eq!(ct[6], 0.0);
}
