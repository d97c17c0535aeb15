use ewbg_core::{FieldPoint, PotentialModel};

/// Two-field anisotropic paraboloid with a temperature-dependent offset:
/// `V = a x^2 + b y^2 + c x y + t (x + y)`.
struct Paraboloid {
    a: f64,
    b: f64,
    c: f64,
}

impl PotentialModel for Paraboloid {
    fn n_fields(&self) -> usize {
        2
    }

    fn v_eff(&self, point: &FieldPoint, temperature: f64) -> f64 {
        let (x, y) = (point[0], point[1]);
        self.a * x * x + self.b * y * y + self.c * x * y + temperature * (x + y)
    }

    fn tree_minimum(&self) -> FieldPoint {
        FieldPoint::zero(2)
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-10.0, 10.0); 2]
    }

    fn scale(&self) -> f64 {
        1.0
    }

    fn params(&self) -> Vec<f64> {
        vec![self.a, self.b, self.c]
    }

    fn counterterms(&self) -> Vec<f64> {
        Vec::new()
    }

    fn vev_legend(&self) -> Vec<String> {
        vec!["x".into(), "y".into()]
    }
}

#[test]
fn fd_gradient_matches_analytic() {
    let model = Paraboloid {
        a: 1.5,
        b: 0.75,
        c: 0.3,
    };
    let point = FieldPoint::new(vec![2.0, -1.0]);
    let t = 0.5;
    let grad = model.gradient(&point, t);

    let expect_x = 2.0 * model.a * point[0] + model.c * point[1] + t;
    let expect_y = 2.0 * model.b * point[1] + model.c * point[0] + t;
    assert!((grad[0] - expect_x).abs() < 1e-6);
    assert!((grad[1] - expect_y).abs() < 1e-6);
}

#[test]
fn fd_hessian_matches_analytic_and_is_symmetric() {
    let model = Paraboloid {
        a: 2.0,
        b: 1.0,
        c: -0.4,
    };
    let point = FieldPoint::new(vec![-3.0, 4.0]);
    let hess = model.hessian(&point, 10.0);

    assert!((hess[0][0] - 2.0 * model.a).abs() < 1e-3);
    assert!((hess[1][1] - 2.0 * model.b).abs() < 1e-3);
    assert!((hess[0][1] - model.c).abs() < 1e-3);
    assert_eq!(hess[0][1], hess[1][0]);
}

#[test]
fn field_point_geometry() {
    let a = FieldPoint::new(vec![3.0, 4.0]);
    let b = FieldPoint::zero(2);
    assert_eq!(a.norm(), 5.0);
    assert_eq!(a.distance(&b), 5.0);
    assert_eq!(a.scaled(2.0).coords(), &[6.0, 8.0]);
    assert!(a.is_finite());
}
