use criterion::{criterion_group, criterion_main, Criterion};
use ewbg_baryo::{calc_eta, TransportOpts};
use ewbg_core::{FieldPoint, PotentialModel};

struct DegenerateWell;

impl PotentialModel for DegenerateWell {
    fn n_fields(&self) -> usize {
        1
    }

    fn v_eff(&self, point: &FieldPoint, _temperature: f64) -> f64 {
        let x = point[0];
        0.0356 * x * x * (x - 150.0) * (x - 150.0)
    }

    fn tree_minimum(&self) -> FieldPoint {
        FieldPoint::new(vec![150.0])
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(-400.0, 400.0)]
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
        vec!["omega".into()]
    }
}

fn bench_transport(c: &mut Criterion) {
    let model = DegenerateWell;
    let broken = FieldPoint::new(vec![150.0]);
    let symmetric = FieldPoint::zero(1);
    let opts = TransportOpts::default();
    c.bench_function("calc_eta_benchmark_point", |b| {
        b.iter(|| calc_eta(0.1, &broken, &symmetric, 100.0, &model, &opts).expect("eta"))
    });
}

criterion_group!(benches, bench_transport);
criterion_main!(benches);
