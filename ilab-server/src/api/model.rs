//! Model serving, unloading and training handlers

use axum::{body::Bytes, extract::State};
use serde_json::json;

use ilab_core::models::{parse_json_body, require, TrainRequest, UnloadModelRequest, VllmStatusQuery};
use ilab_core::routes;
use ilab_core::{ForwardedResponse, ProxyResult};

use super::extract::ApiQuery;
use crate::state::AppState;

pub async fn list_models(State(state): State<AppState>) -> ProxyResult<ForwardedResponse> {
    state.forward(&routes::LIST_MODELS, &[]).await
}

pub async fn vllm_status(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<VllmStatusQuery>,
) -> ProxyResult<ForwardedResponse> {
    let model_name = require(query.model_name, "Missing modelName query param")?;

    let request = state.request(&routes::VLLM_STATUS, &[])?.with_query("model_name", &model_name);
    state.send(&routes::VLLM_STATUS, request).await
}

pub async fn vllm_unload(
    State(state): State<AppState>,
    body: Bytes,
) -> ProxyResult<ForwardedResponse> {
    let payload: UnloadModelRequest = parse_json_body(&body)?;
    let model_name = require(payload.model_name, "Missing model_name")?;

    tracing::info!("[vllm-unload] Unloading model {}", model_name);
    let request =
        state.request(&routes::VLLM_UNLOAD, &[])?.with_json(json!({ "model_name": model_name }));
    state.send(&routes::VLLM_UNLOAD, request).await
}

pub async fn serve_base(State(state): State<AppState>) -> ProxyResult<ForwardedResponse> {
    state.forward(&routes::SERVE_BASE_MODEL, &[]).await
}

pub async fn serve_latest(State(state): State<AppState>) -> ProxyResult<ForwardedResponse> {
    state.forward(&routes::SERVE_LATEST_MODEL, &[]).await
}

pub async fn train(State(state): State<AppState>, body: Bytes) -> ProxyResult<ForwardedResponse> {
    forward_training(&state, &routes::TRAIN_MODEL, &body).await
}

pub async fn generate_train(
    State(state): State<AppState>,
    body: Bytes,
) -> ProxyResult<ForwardedResponse> {
    forward_training(&state, &routes::GENERATE_TRAIN_PIPELINE, &body).await
}

async fn forward_training(
    state: &AppState,
    route: &ilab_core::RouteSpec,
    body: &[u8],
) -> ProxyResult<ForwardedResponse> {
    const MISSING: &str = "Missing required parameters: modelName and branchName";

    let payload: TrainRequest = parse_json_body(body)?;
    let model_name = require(payload.model_name, MISSING)?;
    let branch_name = require(payload.branch_name, MISSING)?;

    tracing::info!("[{}] model={} branch={}", route.name, model_name, branch_name);
    let request = state
        .request(route, &[])?
        .with_json(json!({ "modelName": model_name, "branchName": branch_name }));
    state.send(route, request).await
}
