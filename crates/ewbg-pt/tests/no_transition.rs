mod common;

use common::AlwaysSymmetric;
use ewbg_pt::{find_transition, ScanOpts, TransitionStatus};

#[test]
fn always_symmetric_potential_yields_not_found() {
    let model = AlwaysSymmetric { stiffness: 0.4 };
    let report = find_transition(&model, &ScanOpts::default()).expect("scan");

    assert_eq!(report.point.status, TransitionStatus::NotFound);
    assert!(report.point.tc.is_nan());
    assert!(report.samples.iter().all(|s| !s.global_broken));
    assert_eq!(report.bisections, 0);
}

#[test]
fn bad_scan_range_is_a_structural_error() {
    let model = AlwaysSymmetric { stiffness: 0.4 };
    let opts = ScanOpts {
        t_max: 10.0,
        t_min: 50.0,
        ..ScanOpts::default()
    };
    let err = find_transition(&model, &opts).expect_err("inverted range must fail");
    assert_eq!(err.info().code, "pt_bad_range");
}

#[test]
fn report_serde_round_trip() {
    let model = AlwaysSymmetric { stiffness: 0.4 };
    let report = find_transition(&model, &ScanOpts::default()).expect("scan");
    let json = serde_json::to_string(&report.samples).expect("serialize samples");
    let decoded: Vec<ewbg_pt::ScanSample> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded.len(), report.samples.len());
}
