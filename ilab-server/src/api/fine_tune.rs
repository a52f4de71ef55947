//! Fine-tuning data, GPU and job handlers

use axum::{extract::State, http::StatusCode};

use ilab_core::models::{require, GpuAvailability};
use ilab_core::routes;
use ilab_core::{ForwardedResponse, ProxyResult};

use super::extract::ApiPath;
use crate::state::AppState;

pub async fn list_datasets(State(state): State<AppState>) -> ProxyResult<ForwardedResponse> {
    state.forward(&routes::LIST_DATASETS, &[]).await
}

pub async fn generate_data(State(state): State<AppState>) -> ProxyResult<ForwardedResponse> {
    state.forward(&routes::GENERATE_DATA, &[]).await
}

/// Never fails: the GPU poller in the UI expects a count, so every failure
/// reads as zero GPUs.
pub async fn gpu_free(State(state): State<AppState>) -> ForwardedResponse {
    match state.forward(&routes::GPU_FREE, &[]).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("[gpu-free] Reporting 0 free GPUs: {}", e);
            let fallback = serde_json::to_value(GpuAvailability::UNAVAILABLE)
                .unwrap_or_else(|_| serde_json::json!({"free_gpus": 0, "total_gpus": 0}));
            ForwardedResponse::json(StatusCode::OK, fallback)
        },
    }
}

pub async fn list_jobs(State(state): State<AppState>) -> ProxyResult<ForwardedResponse> {
    state.forward(&routes::LIST_JOBS, &[]).await
}

pub async fn job_logs(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
) -> ProxyResult<ForwardedResponse> {
    let job_id = require(Some(job_id), "Missing job_id")?;
    state.forward(&routes::JOB_LOGS, &[&job_id]).await
}

pub async fn job_status(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<String>,
) -> ProxyResult<ForwardedResponse> {
    let job_id = require(Some(job_id), "Missing job_id")?;
    state.forward(&routes::JOB_STATUS, &[&job_id]).await
}
