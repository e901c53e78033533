//! Integration test: Server API endpoints

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use forecast_automl::server::{create_router, AppState, ServerConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "forecast-test-boundary";

fn test_app() -> axum::Router {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_upload_size: 1024 * 1024,
        cors_origin: None,
    };
    let state = Arc::new(AppState::new(config));
    create_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_body(field: &str, file_name: &str, content: &str) -> String {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: text/csv\r\n\r\n{content}\r\n--{b}--\r\n",
        b = BOUNDARY,
        field = field,
        file_name = file_name,
        content = content,
    )
}

fn upload_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn predict_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn sample_rows() -> Value {
    json!([
        {"date": "2024-01-01", "amount": "$100", "spend": 10, "kind": "a"},
        {"date": "2024-01-02", "amount": "$110", "spend": 12, "kind": "b"},
        {"date": "2024-01-03", "amount": "$125", "spend": 15, "kind": "a"},
        {"date": "2024-01-04", "amount": "$130", "spend": 16, "kind": "b"},
        {"date": "2024-01-05", "amount": "$150", "spend": 20, "kind": "a"}
    ])
}

// ============================================================================
// System
// ============================================================================

#[tokio::test]
async fn test_welcome_message() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Welcome to the Finance Web App API");
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_app()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let response = test_app()
        .oneshot(Request::builder().uri("/api/models").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let response = test_app()
        .oneshot(Request::builder().uri("/api/predict").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ============================================================================
// Upload
// ============================================================================

#[tokio::test]
async fn test_upload_csv() {
    let csv = "date,amount,kind\n2024-01-01,10.5,food\n2024-01-02,,rent\n";
    let response = test_app()
        .oneshot(upload_request(multipart_body("file", "ledger.csv", csv)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["filename"], "ledger.csv");
    assert_eq!(body["rows"], 2);
    assert_eq!(body["columns"], json!(["date", "amount", "kind"]));
    assert_eq!(body["data"][0]["amount"], json!(10.5));
    assert_eq!(body["data"][1]["amount"], Value::Null);
    assert_eq!(body["data"][1]["kind"], "rent");
}

#[tokio::test]
async fn test_upload_rejects_non_csv() {
    let response = test_app()
        .oneshot(upload_request(multipart_body("file", "ledger.xlsx", "a,b\n1,2\n")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid file type. Only CSV files are allowed.");
}

#[tokio::test]
async fn test_upload_without_file_part() {
    let response = test_app()
        .oneshot(upload_request(multipart_body("other", "ledger.csv", "a\n1\n")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No file part");
}

#[tokio::test]
async fn test_upload_with_empty_filename() {
    let response = test_app()
        .oneshot(upload_request(multipart_body("file", "", "a\n1\n")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No selected file");
}

// ============================================================================
// Predict
// ============================================================================

#[tokio::test]
async fn test_predict_ensemble() {
    let request = predict_request(json!({
        "data": sample_rows(),
        "date_column": "date",
        "target": "amount",
        "predictors": ["spend"],
        "category_columns": ["kind"]
    }));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["target"], "amount");
    assert_eq!(body["predictions"].as_array().unwrap().len(), 5);
    assert!(body["predictions"][0]["predicted_amount"].is_number());
    assert!(body["metrics"]["ensemble"]["mae"].is_number());
    assert!(body["metrics"]["ensemble"]["rmse"].is_number());
    assert!(body["feature_importance"]["random_forest"].is_object());
    assert!(body["feature_importance"].get("linear").is_none());
}

#[tokio::test]
async fn test_predict_accepts_aliases() {
    let request = predict_request(json!({
        "data": sample_rows(),
        "date_col": "date",
        "target_column": "amount",
        "x_variables": ["spend"],
        "features": ["days", "spend_lag_1"],
        "model_type": "linear"
    }));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let models: Vec<&String> = body["metrics"].as_object().unwrap().keys().collect();
    assert_eq!(models, vec!["linear"]);
}

#[tokio::test]
async fn test_predict_missing_column() {
    let request = predict_request(json!({
        "data": sample_rows(),
        "date_column": "date",
        "target": "balance",
        "predictors": ["spend"]
    }));
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("balance"));
}

#[tokio::test]
async fn test_predict_malformed_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["error"].is_string());
}
