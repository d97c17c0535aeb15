mod common;

use common::DoubleWell;
use ewbg_core::PotentialModel;
use ewbg_min::{find_minimum, EvolutionBackend, LocalBackend, MinimizeOpts};

#[test]
fn evolutionary_search_is_seed_deterministic() {
    let model = DoubleWell { a: 5000.0, b: 0.5 };
    let opts = MinimizeOpts::default();
    let backend = EvolutionBackend::default();
    let start = model.symmetric_point();

    let run_a = backend
        .refine(&model, 0.0, &start, &model.bounds(), &opts)
        .expect("run a");
    let run_b = backend
        .refine(&model, 0.0, &start, &model.bounds(), &opts)
        .expect("run b");

    assert_eq!(run_a.point, run_b.point);
    assert_eq!(run_a.value, run_b.value);
}

#[test]
fn full_driver_is_seed_deterministic() {
    let model = DoubleWell { a: 5000.0, b: 0.5 };
    let opts = MinimizeOpts::default();

    let run_a = find_minimum(&model, 0.0, &[], &opts).expect("run a");
    let run_b = find_minimum(&model, 0.0, &[], &opts).expect("run b");
    assert_eq!(run_a.point, run_b.point);
    assert_eq!(run_a.status, run_b.status);
}
