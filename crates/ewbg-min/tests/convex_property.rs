mod common;

use common::Bowl;
use ewbg_min::{find_minimum, MinimizeOpts};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// On any convex bowl the driver converges to the analytic centre.
    #[test]
    fn driver_finds_bowl_center(
        cx in -40.0f64..40.0,
        cy in -40.0f64..40.0,
        stiffness in 0.5f64..10.0,
    ) {
        let model = Bowl {
            center: vec![cx, cy],
            stiffness,
        };
        let result = find_minimum(&model, 0.0, &[], &MinimizeOpts::default())
            .expect("convex solve");
        prop_assert!(result.is_converged());
        prop_assert!((result.point[0] - cx).abs() < 0.1);
        prop_assert!((result.point[1] - cy).abs() < 0.1);
    }
}
