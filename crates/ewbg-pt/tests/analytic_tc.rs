mod common;

use common::QuarticToy;
use ewbg_core::PotentialModel;
use ewbg_pt::{find_transition, ScanOpts, TransitionStatus};

#[test]
fn quartic_tc_matches_analytic_within_one_percent() {
    let model = QuarticToy::benchmark();
    let report = find_transition(&model, &ScanOpts::default()).expect("scan");

    assert_eq!(report.point.status, TransitionStatus::Found);
    let tc = report.point.tc;
    let analytic = model.analytic_tc();
    assert!(
        (tc - analytic).abs() / analytic < 0.01,
        "tc {tc} vs analytic {analytic}"
    );

    let vc = report.point.vc;
    let analytic_vc = model.analytic_vc();
    assert!(
        (vc - analytic_vc).abs() / analytic_vc < 0.05,
        "vc {vc} vs analytic {analytic_vc}"
    );
    assert!(report.point.strength() > 0.5);
}

#[test]
fn vacua_are_degenerate_at_reported_tc() {
    let model = QuarticToy::benchmark();
    let opts = ScanOpts::default();
    let report = find_transition(&model, &opts).expect("scan");
    let point = &report.point;
    assert!(point.is_found());

    let v_sym = model.v_eff(&point.symmetric_vev, point.tc);
    let v_brk = model.v_eff(&point.broken_vev, point.tc);
    assert!(
        (v_sym - v_brk).abs() <= opts.bisection_tolerance * (1.0 + v_sym.abs()),
        "degeneracy violated: {v_sym} vs {v_brk}"
    );
    assert!(point.broken_vev.distance(&point.symmetric_vev) > opts.vev_threshold);
}

#[test]
fn scan_stops_at_first_bracket() {
    let model = QuarticToy::benchmark();
    let report = find_transition(&model, &ScanOpts::default()).expect("scan");
    assert!(report.point.is_found());

    // The downward scan must not continue past the bracketing step: every
    // recorded sample except the last sits in the symmetric phase.
    let switched: Vec<_> = report.samples.iter().filter(|s| s.global_broken).collect();
    assert_eq!(switched.len(), 1);
    assert!(report.samples.last().expect("samples").global_broken);
    assert!(report.bisections > 0);
}
