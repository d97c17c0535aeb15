mod common;

use common::DegenerateWell;
use ewbg_core::FieldPoint;
use ewbg_baryo::{calc_eta, CpPhases, EtaStatus, TransportOpts};

fn benchmark_inputs() -> (FieldPoint, FieldPoint, f64) {
    (FieldPoint::new(vec![150.0]), FieldPoint::zero(1), 100.0)
}

#[test]
fn strong_transition_yields_finite_nonzero_eta() {
    let model = DegenerateWell::benchmark();
    let (broken, symmetric, tc) = benchmark_inputs();
    let result = calc_eta(0.1, &broken, &symmetric, tc, &model, &TransportOpts::default())
        .expect("valid inputs");

    assert_eq!(result.status, EtaStatus::Computed);
    assert!(result.eta.is_finite());
    assert!(result.eta != 0.0);
    assert!(
        result.eta.abs() > 1e-16 && result.eta.abs() < 1e-2,
        "eta out of physical ballpark: {}",
        result.eta
    );
    assert!(result.wall_width > 0.0);
    // The wall is a few inverse critical temperatures thick.
    assert!(result.wall_width * tc > 0.5 && result.wall_width * tc < 50.0);
    assert_eq!(result.phases.len(), 6);
    assert_eq!(result.phases["top_sym_phase"], 0.1);
}

#[test]
fn eta_sign_tracks_the_injected_cp_phase() {
    let model = DegenerateWell::benchmark();
    let (broken, symmetric, tc) = benchmark_inputs();

    let plus = TransportOpts::default();
    let mut minus = TransportOpts::default();
    minus.cp = CpPhases {
        top_symmetric: -plus.cp.top_symmetric,
        top_broken: -plus.cp.top_broken,
        bottom_symmetric: -plus.cp.bottom_symmetric,
        bottom_broken: -plus.cp.bottom_broken,
        tau_symmetric: -plus.cp.tau_symmetric,
        tau_broken: -plus.cp.tau_broken,
    };

    let eta_plus = calc_eta(0.1, &broken, &symmetric, tc, &model, &plus)
        .expect("plus run")
        .eta;
    let eta_minus = calc_eta(0.1, &broken, &symmetric, tc, &model, &minus)
        .expect("minus run")
        .eta;

    assert!(eta_plus != 0.0);
    assert!(eta_plus.signum() == -eta_minus.signum());
    // The transport system is linear in the phase, so the flip is exact up
    // to floating point noise.
    assert!((eta_plus + eta_minus).abs() <= 1e-8 * eta_plus.abs());
}

#[test]
fn doubled_phase_doubles_eta() {
    let model = DegenerateWell::benchmark();
    let (broken, symmetric, tc) = benchmark_inputs();

    let base = TransportOpts::default();
    let mut doubled = TransportOpts::default();
    doubled.cp.top_symmetric *= 2.0;
    doubled.cp.bottom_symmetric *= 2.0;
    doubled.cp.tau_symmetric *= 2.0;

    let eta_base = calc_eta(0.1, &broken, &symmetric, tc, &model, &base)
        .expect("base run")
        .eta;
    let eta_doubled = calc_eta(0.1, &broken, &symmetric, tc, &model, &doubled)
        .expect("doubled run")
        .eta;

    assert!((eta_doubled - 2.0 * eta_base).abs() <= 1e-6 * eta_base.abs().max(1e-30));
}

#[test]
fn weak_transition_short_circuits_to_zero() {
    let model = DegenerateWell { vc: 40.0, k: 0.04 };
    let broken = FieldPoint::new(vec![40.0]);
    let symmetric = FieldPoint::zero(1);
    let result = calc_eta(0.1, &broken, &symmetric, 100.0, &model, &TransportOpts::default())
        .expect("valid inputs");

    assert_eq!(result.status, EtaStatus::NoConversion);
    assert_eq!(result.eta, 0.0);
}

#[test]
fn repeated_runs_are_bit_identical() {
    let model = DegenerateWell::benchmark();
    let (broken, symmetric, tc) = benchmark_inputs();
    let opts = TransportOpts::default();

    let first = calc_eta(0.1, &broken, &symmetric, tc, &model, &opts).expect("first");
    let second = calc_eta(0.1, &broken, &symmetric, tc, &model, &opts).expect("second");
    assert_eq!(first.eta.to_bits(), second.eta.to_bits());
    assert_eq!(first.wall_width.to_bits(), second.wall_width.to_bits());
}
