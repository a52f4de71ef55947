//! Configuration snapshots for the browser

use axum::{extract::State, Json};

use ilab_core::{AnalyticsConfig, DeploymentEnv};

use crate::state::AppState;

pub async fn analytics_config(State(state): State<AppState>) -> Json<AnalyticsConfig> {
    Json(state.config().analytics.clone())
}

pub async fn env_config(State(state): State<AppState>) -> Json<DeploymentEnv> {
    Json(state.config().deployment.clone())
}
