use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::test_helpers::{test_app_state, test_server};

#[tokio::test]
async fn test_list_collections_asks_for_json() {
    let upstream = MockServer::start().await;
    let collections = json!([{"name": "docs", "documents": 3}]);
    Mock::given(method("GET"))
        .and(path("/collections"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collections.clone()))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state).get("/api/playground/ragchat/collections").await;

    response.assert_status_ok();
    response.assert_json(&collections);
}

#[tokio::test]
async fn test_delete_collection_encodes_name() {
    let upstream = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/collections/my%20docs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response =
        test_server(state).delete("/api/playground/ragchat/collections/my%20docs/delete").await;

    response.assert_status_ok();
    response.assert_json(&json!({"deleted": true}));
}

#[tokio::test]
async fn test_delete_collection_upstream_404() {
    let upstream = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/collections/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "no such collection"})))
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state).delete("/api/playground/ragchat/collections/gone/delete").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to delete collection");
    assert_eq!(body["details"], "no such collection");
}

#[tokio::test]
async fn test_upload_url_forwards_source() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections/docs/documents/url"))
        .and(body_json(json!({"http_source": "https://example.com/guide.pdf"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ingested"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state)
        .post("/api/playground/ragchat/collections/docs/documents/url")
        .json(&json!({"http_source": "https://example.com/guide.pdf"}))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({"status": "ingested"}));
}

#[tokio::test]
async fn test_upload_url_missing_source() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&upstream).await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state)
        .post("/api/playground/ragchat/collections/docs/documents/url")
        .json(&json!({"http_source": ""}))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing http_source");
}

#[tokio::test]
async fn test_query_collection_narrows_response() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/collections/docs/query"))
        .and(body_json(json!({"question": "what is lab?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Large-scale Alignment for chatBots",
            "sources": [{"doc": "README.md"}],
            "timings": {"retrieval_ms": 12},
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state)
        .post("/api/playground/ragchat/collections/docs/query")
        .json(&json!({"question": "what is lab?"}))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "answer": "Large-scale Alignment for chatBots",
        "sources": [{"doc": "README.md"}],
    }));
}

#[tokio::test]
async fn test_query_collection_missing_question() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&upstream).await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response =
        test_server(state).post("/api/playground/ragchat/collections/docs/query").await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing question");
}

#[tokio::test]
async fn test_delete_collection_blank_name() {
    let upstream = MockServer::start().await;
    Mock::given(method("DELETE")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&upstream).await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response =
        test_server(state).delete("/api/playground/ragchat/collections/%20/delete").await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing collection name");
}

#[tokio::test]
async fn test_upload_url_blank_collection_name() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&upstream).await;

    let (state, _tmp) = test_app_state(&upstream.uri());
    let response = test_server(state)
        .post("/api/playground/ragchat/collections/%20/documents/url")
        .json(&json!({"http_source": "https://example.com/guide.pdf"}))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing collection name");
}
