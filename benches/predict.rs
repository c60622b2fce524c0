use agri_estimator::{ReferenceDataStore, RngSource, WaterLossSimulator, YieldInputs, YieldPredictor};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_predict(c: &mut Criterion) {
    let store = ReferenceDataStore::builtin();
    let predictor = YieldPredictor::new(&store);
    let inputs = YieldInputs::default();

    c.bench_function("predict_wheat", |b| {
        b.iter(|| predictor.predict(black_box("wheat"), black_box(&inputs)))
    });
}

fn bench_simulate(c: &mut Criterion) {
    let store = ReferenceDataStore::builtin();
    let simulator = WaterLossSimulator::new(&store);
    let mut rng = RngSource::seeded(42);

    c.bench_function("simulate_north", |b| {
        b.iter(|| simulator.simulate(black_box("north"), "drip", "loam", &mut rng))
    });
}

criterion_group!(benches, bench_predict, bench_simulate);
criterion_main!(benches);
