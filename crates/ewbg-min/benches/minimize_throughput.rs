use criterion::{criterion_group, criterion_main, Criterion};
use ewbg_core::{FieldPoint, PotentialModel};
use ewbg_min::{find_minimum, MinimizeOpts};

/// Two-field double well shaped like a thermal potential near degeneracy.
struct TwoFieldWell;

impl PotentialModel for TwoFieldWell {
    fn n_fields(&self) -> usize {
        2
    }

    fn v_eff(&self, point: &FieldPoint, temperature: f64) -> f64 {
        let (h, s) = (point[0], point[1]);
        let d = 0.37;
        let t0sq = 8000.0;
        d * (temperature * temperature - t0sq) * (h * h + 0.5 * s * s)
            - 2.0 * temperature * h * h * h / 60.0
            + 0.12 * (h * h + s * s).powi(2) / 4.0
    }

    fn tree_minimum(&self) -> FieldPoint {
        FieldPoint::new(vec![246.22, 80.0])
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-600.0, 600.0); 2]
    }

    fn scale(&self) -> f64 {
        246.22
    }

    fn params(&self) -> Vec<f64> {
        Vec::new()
    }

    fn counterterms(&self) -> Vec<f64> {
        Vec::new()
    }

    fn vev_legend(&self) -> Vec<String> {
        vec!["omega_h".into(), "omega_s".into()]
    }
}

fn bench_minimize(c: &mut Criterion) {
    let model = TwoFieldWell;
    let opts = MinimizeOpts::default();
    c.bench_function("find_minimum_two_field", |b| {
        b.iter(|| find_minimum(&model, 80.0, &[], &opts).expect("solve"))
    });
}

criterion_group!(benches, bench_minimize);
criterion_main!(benches);
