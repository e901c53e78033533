use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use forecast_automl::data::Record;
use forecast_automl::pipeline::forecast_records;
use forecast_automl::preprocessing::ForecastConfig;
use forecast_automl::training::{ModelSelector, TrainEngine};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use serde_json::json;

fn create_ledger(n_rows: usize) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(7);
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

    (0..n_rows)
        .map(|i| {
            let spend: f64 = rng.gen::<f64>() * 100.0;
            let fees: f64 = rng.gen::<f64>() * 5.0;
            let date = start + chrono::Duration::days(i as i64);
            let row = json!({
                "date": date.format("%Y-%m-%d").to_string(),
                "amount": format!("${:.2}", 3.0 * spend - fees + rng.gen::<f64>()),
                "spend": spend,
                "fees": fees,
                "kind": ["card", "cash", "wire"][i % 3],
            });
            row.as_object().unwrap().clone()
        })
        .collect()
}

fn create_regression_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(11);
    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 10.0);
    let y = x.sum_axis(ndarray::Axis(1));
    (x, y)
}

fn bench_forecast(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast");
    group.sample_size(10);

    for n_rows in [100, 500, 1000].iter() {
        let rows = create_ledger(*n_rows);
        let config = ForecastConfig::new("date", "amount", &["spend", "fees"])
            .with_categories(&["kind"]);

        group.bench_with_input(BenchmarkId::new("ensemble", n_rows), &rows, |b, rows| {
            b.iter(|| forecast_records(black_box(rows), &config).unwrap())
        });
    }

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);

    let (x, y) = create_regression_data(1000, 10);
    let names: Vec<String> = (0..10).map(|i| format!("feature_{}", i)).collect();

    for model in ["linear", "random_forest", "xgboost"] {
        let engine = TrainEngine::new(ModelSelector::parse(model).unwrap());
        group.bench_function(model, |b| {
            b.iter(|| engine.train(black_box(&x), black_box(&y), &names).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forecast, bench_training);
criterion_main!(benches);
