use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_helpers::{test_app_state, test_server};

async fn never_called(upstream: &MockServer) {
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(upstream).await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(upstream).await;
}

#[tokio::test]
async fn test_list_models_passthrough() {
    let upstream = MockServer::start().await;
    let models = json!([{"name": "granite-7b-lab", "last_modified": "2024-10-01"}]);
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(models.clone()))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state).get("/api/fine-tune/models").await;

    response.assert_status_ok();
    response.assert_json(&models);
}

#[tokio::test]
async fn test_vllm_status_forwards_model_name() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vllm-status"))
        .and(query_param("model_name", "pre-train"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response =
        test_server(state).get("/api/fine-tune/model/vllm-status").add_query_param("modelName", "pre-train").await;

    response.assert_status_ok();
    response.assert_json(&json!({"status": "running"}));
}

#[tokio::test]
async fn test_vllm_status_accepts_snake_case_param() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vllm-status"))
        .and(query_param("model_name", "post-train"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "stopped"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state)
        .get("/api/fine-tune/model/vllm-status")
        .add_query_param("model_name", "post-train")
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_vllm_status_missing_model_name() {
    let upstream = MockServer::start().await;
    never_called(&upstream).await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state).get("/api/fine-tune/model/vllm-status").await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing modelName query param");
}

#[tokio::test]
async fn test_vllm_unload_round_trip() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vllm-unload"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"model_name": "m1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "unloaded"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state)
        .post("/api/fine-tune/model/vllm-unload")
        .json(&json!({"model_name": "m1"}))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({"status": "unloaded"}));
}

#[tokio::test]
async fn test_vllm_unload_missing_model_name() {
    let upstream = MockServer::start().await;
    never_called(&upstream).await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state).post("/api/fine-tune/model/vllm-unload").json(&json!({})).await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing model_name");
}

#[tokio::test]
async fn test_vllm_unload_malformed_body() {
    let upstream = MockServer::start().await;
    never_called(&upstream).await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state).post("/api/fine-tune/model/vllm-unload").text("model_name=m1").await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Invalid request body")));
}

#[tokio::test]
async fn test_serve_latest_requires_job_id() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/model/serve-latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state).post("/api/fine-tune/model/serve-latest").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "API server response does not contain job_id");
}

#[tokio::test]
async fn test_serve_base_returns_job() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/model/serve-base"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "serve-1"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state).post("/api/fine-tune/model/serve-base").await;

    response.assert_status_ok();
    response.assert_json(&json!({"job_id": "serve-1"}));
}

#[tokio::test]
async fn test_train_forwards_names() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/model/train"))
        .and(body_json(json!({"modelName": "granite", "branchName": "skills-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"job_id": "t-9"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state)
        .post("/api/fine-tune/model/train")
        .json(&json!({"modelName": "granite", "branchName": "skills-1"}))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({"job_id": "t-9"}));
}

#[tokio::test]
async fn test_generate_train_missing_branch() {
    let upstream = MockServer::start().await;
    never_called(&upstream).await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state)
        .post("/api/fine-tune/pipeline/generate-train")
        .json(&json!({"modelName": "granite"}))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing required parameters: modelName and branchName");
}

#[tokio::test]
async fn test_train_upstream_503_is_forwarded() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/model/train"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"error": "no GPUs available"})),
        )
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state)
        .post("/api/fine-tune/model/train")
        .json(&json!({"modelName": "granite", "branchName": "main"}))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to train the model on the API server");
    assert_eq!(body["details"], "no GPUs available");
}

#[tokio::test]
async fn test_vllm_status_conflicting_params_is_json_400() {
    let upstream = MockServer::start().await;
    never_called(&upstream).await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state)
        .get("/api/fine-tune/model/vllm-status")
        .add_query_param("modelName", "a")
        .add_query_param("model_name", "b")
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.header("content-type"), "application/json");
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().is_some_and(|e| e.contains("modelName")));
}
