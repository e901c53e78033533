//! Integration test: end-to-end forecasts over JSON rows and CSV input

use forecast_automl::data::{load_csv_bytes, Record};
use forecast_automl::error::ForecastError;
use forecast_automl::pipeline::{forecast_records, run_forecast};
use forecast_automl::preprocessing::ForecastConfig;
use serde_json::{json, Value};

fn rows(value: Value) -> Vec<Record> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_object().unwrap().clone())
        .collect()
}

fn finance_rows() -> Vec<Record> {
    rows(json!([
        {"date": "2023-01-01", "amount": "$1,000", "rate": 1.5, "region": "north"},
        {"date": "2023-01-02", "amount": "$1,100", "rate": 1.7, "region": "south"},
        {"date": "2023-01-03", "amount": "$1,250", "rate": "2.0", "region": null},
        {"date": "01/04/2023", "amount": 1300, "rate": 2.1, "region": "north"},
        {"date": "2023-01-05", "amount": "1,420.50", "rate": 2.4, "region": "south"}
    ]))
}

fn config() -> ForecastConfig {
    ForecastConfig::new("date", "amount", &["rate"]).with_categories(&["region"])
}

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn test_ensemble_forecast_shape() {
    let output = forecast_records(&finance_rows(), &config()).unwrap();

    assert_eq!(output.target, "amount");
    assert_eq!(output.predictions.len(), 5);
    for row in &output.predictions {
        let keys: Vec<&String> = row.keys().collect();
        assert_eq!(keys, vec!["date", "rate", "region", "predicted_amount"]);
        assert!(row["predicted_amount"].as_f64().unwrap().is_finite());
    }

    let models: Vec<&String> = output.metrics.keys().collect();
    assert_eq!(models, vec!["ensemble", "linear", "random_forest", "xgboost"]);
    for metrics in output.metrics.values() {
        assert!(metrics.mae >= 0.0);
        assert!(metrics.rmse >= metrics.mae - 1e-9);
    }

    // Only tree models report importances
    let importance_models: Vec<&String> = output.feature_importance.keys().collect();
    assert_eq!(importance_models, vec!["random_forest", "xgboost"]);
}

#[test]
fn test_rows_carry_prepared_values() {
    let output = forecast_records(&finance_rows(), &config()).unwrap();

    // Dates normalized, including the slash-formatted one
    assert_eq!(output.predictions[0]["date"], json!("2023-01-01"));
    assert_eq!(output.predictions[3]["date"], json!("2023-01-04"));
    // Predictors are numeric after coercion
    assert_eq!(output.predictions[2]["rate"], json!(2.0));
    // The missing region takes the most frequent value
    let filled = output.predictions[2]["region"].as_str().unwrap();
    assert!(filled == "north" || filled == "south");
}

#[test]
fn test_available_features_listed() {
    let output = forecast_records(&finance_rows(), &config()).unwrap();
    let features = &output.available_features;

    assert_eq!(features[0], "days");
    for name in [
        "amount_lag_1",
        "amount_lag_2",
        "amount_roll_mean_3",
        "rate_lag_1",
        "rate_lag_2",
        "rate_roll_mean_3",
    ] {
        assert!(features.iter().any(|f| f == name), "missing {}", name);
    }
    assert!(!features.iter().any(|f| f == "region_encoded"));
}

#[test]
fn test_ensemble_is_mean_of_models() {
    let base = forecast_records(&finance_rows(), &config()).unwrap();
    let linear = forecast_records(&finance_rows(), &config().with_model_type("linear")).unwrap();
    let forest =
        forecast_records(&finance_rows(), &config().with_model_type("random_forest")).unwrap();
    let boost = forecast_records(&finance_rows(), &config().with_model_type("xgboost")).unwrap();

    for i in 0..5 {
        let expected = (linear.predictions[i]["predicted_amount"].as_f64().unwrap()
            + forest.predictions[i]["predicted_amount"].as_f64().unwrap()
            + boost.predictions[i]["predicted_amount"].as_f64().unwrap())
            / 3.0;
        let actual = base.predictions[i]["predicted_amount"].as_f64().unwrap();
        assert!((expected - actual).abs() < 1e-6, "row {}: {} vs {}", i, expected, actual);
    }
}

#[test]
fn test_forecast_is_deterministic() {
    let first = forecast_records(&finance_rows(), &config()).unwrap();
    let second = forecast_records(&finance_rows(), &config()).unwrap();

    assert_eq!(first.predictions, second.predictions);
    assert_eq!(first.metrics, second.metrics);
    assert_eq!(first.feature_importance, second.feature_importance);
}

#[test]
fn test_unknown_model_type_falls_back_to_ensemble() {
    let output =
        forecast_records(&finance_rows(), &config().with_model_type("neural_net")).unwrap();
    assert!(output.metrics.contains_key("ensemble"));
    assert_eq!(output.metrics.len(), 4);
}

#[test]
fn test_forecast_from_csv() {
    let csv = "date,amount,rate\n\
               2023-01-01,100,1.0\n\
               2023-01-02,110,1.2\n\
               2023-01-03,,1.1\n\
               2023-01-04,140,1.6\n\
               2023-01-05,150,1.9\n\
               2023-01-06,165,2.0\n";
    let dataset = load_csv_bytes(csv.as_bytes()).unwrap();
    let config = ForecastConfig::new("date", "amount", &["rate"]).with_model_type("linear");

    let output = run_forecast(dataset, &config).unwrap();
    assert_eq!(output.predictions.len(), 6);
    assert_eq!(output.metrics.keys().collect::<Vec<_>>(), vec!["linear"]);
}

#[test]
fn test_adjacent_float_predictors_train_every_model() {
    let data = rows(json!([
        {"date": "2024-01-01", "amount": 1, "spend": 0.3},
        {"date": "2024-01-02", "amount": 2, "spend": 0.30000000000000004}
    ]));

    for model_type in ["random_forest", "xgboost", "ensemble"] {
        let config = ForecastConfig::new("date", "amount", &["spend"])
            .with_selected_features(&["spend_roll_mean_3"])
            .with_model_type(model_type);
        let output = forecast_records(&data, &config).unwrap();

        assert_eq!(output.predictions.len(), 2);
        for row in &output.predictions {
            assert!(row["predicted_amount"].as_f64().unwrap().is_finite());
        }
    }
}

#[test]
fn test_repeated_predictor_values() {
    let data = rows(json!([
        {"date": "2024-01-01", "amount": 5, "spend": 1},
        {"date": "2024-01-02", "amount": 7, "spend": 1},
        {"date": "2024-01-03", "amount": 6, "spend": 1},
        {"date": "2024-01-04", "amount": 9, "spend": 2},
        {"date": "2024-01-05", "amount": 8, "spend": 2}
    ]));
    let config = ForecastConfig::new("date", "amount", &["spend"])
        .with_selected_features(&["spend_lag_1"]);

    let output = forecast_records(&data, &config).unwrap();
    assert_eq!(output.metrics.len(), 4);
    assert!(output.metrics.values().all(|m| m.rmse.is_finite()));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_target_column() {
    let config = ForecastConfig::new("date", "balance", &["rate"]);
    let err = forecast_records(&finance_rows(), &config).unwrap_err();

    assert!(matches!(err, ForecastError::ColumnNotFound(_)));
    assert!(err.is_client_error());
    assert!(err.to_string().contains("balance"));
}

#[test]
fn test_non_numeric_predictor() {
    let data = rows(json!([
        {"date": "2023-01-01", "amount": 1, "rate": "n/a"},
        {"date": "2023-01-02", "amount": 2, "rate": "unknown"},
        {"date": "2023-01-03", "amount": 3, "rate": "-"}
    ]));
    let config = ForecastConfig::new("date", "amount", &["rate"]);
    let err = forecast_records(&data, &config).unwrap_err();

    assert!(matches!(err, ForecastError::ParseError(_)));
    assert!(err.to_string().contains("cannot be converted to numeric"));
}

#[test]
fn test_unparsable_dates() {
    let data = rows(json!([
        {"date": "soon", "amount": 1, "rate": 1},
        {"date": "later", "amount": 2, "rate": 2}
    ]));
    let config = ForecastConfig::new("date", "amount", &["rate"]);
    let err = forecast_records(&data, &config).unwrap_err();

    assert!(matches!(err, ForecastError::ParseError(_)));
    assert!(err.to_string().contains("date"));
}

#[test]
fn test_empty_rows_rejected() {
    let err = forecast_records(&[], &config()).unwrap_err();
    assert!(matches!(err, ForecastError::ConfigError(_)));
}
