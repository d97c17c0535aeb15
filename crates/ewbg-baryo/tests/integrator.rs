use ewbg_baryo::{integrate_adaptive, OdeOpts};

#[test]
fn exponential_decay_matches_analytic() {
    let sol = integrate_adaptive(
        |_t, y| vec![-y[0]],
        0.0,
        &[1.0],
        5.0,
        &OdeOpts::default(),
    )
    .expect("integrate");
    let expected = (-5.0_f64).exp();
    assert!((sol.terminal()[0] - expected).abs() < 1e-7);
}

#[test]
fn harmonic_oscillator_conserves_energy() {
    let sol = integrate_adaptive(
        |_t, y| vec![y[1], -y[0]],
        0.0,
        &[1.0, 0.0],
        20.0 * std::f64::consts::PI,
        &OdeOpts::default(),
    )
    .expect("integrate");
    let terminal = sol.terminal();
    let energy = terminal[0] * terminal[0] + terminal[1] * terminal[1];
    assert!((energy - 1.0).abs() < 1e-4, "energy drifted to {energy}");
}

#[test]
fn descending_integration_works() {
    let sol = integrate_adaptive(
        |_t, y| vec![-y[0]],
        0.0,
        &[1.0],
        -3.0,
        &OdeOpts::default(),
    )
    .expect("integrate");
    let expected = 3.0_f64.exp();
    assert!((sol.terminal()[0] - expected).abs() / expected < 1e-7);
}

#[test]
fn sampling_interpolates_the_trajectory() {
    let sol = integrate_adaptive(
        |_t, y| vec![-y[0]],
        0.0,
        &[1.0],
        2.0,
        &OdeOpts::default(),
    )
    .expect("integrate");
    let mid = sol.sample(1.0)[0];
    assert!((mid - (-1.0_f64).exp()).abs() < 1e-4);
    // Clamped outside the range.
    assert_eq!(sol.sample(10.0)[0], sol.terminal()[0]);
}

#[test]
fn exhausted_budget_reports_transport_budget() {
    let opts = OdeOpts {
        max_evals: 12,
        ..OdeOpts::default()
    };
    let err = integrate_adaptive(|_t, y| vec![-y[0]], 0.0, &[1.0], 50.0, &opts)
        .expect_err("budget must trip");
    assert_eq!(err.info().code, "transport_budget");
}

#[test]
fn non_finite_state_reports_divergence() {
    let err = integrate_adaptive(
        |t, y| {
            if t > 0.5 {
                vec![f64::NAN]
            } else {
                vec![y[0]]
            }
        },
        0.0,
        &[1.0],
        2.0,
        &OdeOpts::default(),
    )
    .expect_err("divergence must trip");
    assert_eq!(err.info().code, "transport_divergence");
}
