//! API Routes
//!
//! Browser-facing endpoints. Each proxy handler extracts its parameters and
//! hands off to one `RouteSpec`; the shared forwarder does the rest.

mod config;
mod eval;
mod extract;
mod fine_tune;
mod model;
mod ragchat;
mod taxonomy;

#[cfg(test)]
mod model_tests;
#[cfg(test)]
mod ragchat_tests;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Fine-tuning data and jobs
        .route("/fine-tune/data-sets", get(fine_tune::list_datasets))
        .route("/fine-tune/data/generate", post(fine_tune::generate_data))
        .route("/fine-tune/gpu-free", get(fine_tune::gpu_free))
        .route("/fine-tune/jobs", get(fine_tune::list_jobs))
        .route("/fine-tune/jobs/:job_id/logs", get(fine_tune::job_logs))
        .route("/fine-tune/jobs/:job_id/status", get(fine_tune::job_status))
        // Model serving and training
        .route("/fine-tune/models", get(model::list_models))
        .route("/fine-tune/model/vllm-status", get(model::vllm_status))
        .route("/fine-tune/model/vllm-unload", post(model::vllm_unload))
        .route("/fine-tune/model/serve-base", post(model::serve_base))
        .route("/fine-tune/model/serve-latest", post(model::serve_latest))
        .route("/fine-tune/model/train", post(model::train))
        .route("/fine-tune/pipeline/generate-train", post(model::generate_train))
        // Evaluation
        .route("/native/eval/checkpoints", get(eval::list_checkpoints))
        // Retrieval playground
        .route("/playground/ragchat/collections", get(ragchat::list_collections))
        .route(
            "/playground/ragchat/collections/:collection_name/delete",
            delete(ragchat::delete_collection),
        )
        .route(
            "/playground/ragchat/collections/:collection_name/documents/url",
            post(ragchat::upload_url),
        )
        .route(
            "/playground/ragchat/collections/:collection_name/query",
            post(ragchat::query_collection),
        )
        // Taxonomy tree
        .route("/tree", post(taxonomy::tree))
        // UI configuration
        .route("/analyticsConfig", get(config::analytics_config))
        .route("/envConfig", get(config::env_config))
        .layer(middleware::map_response(json_method_not_allowed))
        // API fallback: return 404 for unknown API endpoints
        .fallback(api_not_found)
}

async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Not found"})))
}

/// Give axum's bare 405 the same JSON shape as every other API error.
/// Upstream 405s already carry a JSON body and pass through untouched.
async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let mut json_response = (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({"error": "Method not allowed"})),
    )
        .into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        json_response.headers_mut().insert(header::ALLOW, allow.clone());
    }
    json_response
}
