//! Evaluation checkpoint handlers

use axum::extract::State;

use ilab_core::routes;
use ilab_core::{ForwardedResponse, ProxyResult};

use crate::state::AppState;

pub async fn list_checkpoints(State(state): State<AppState>) -> ProxyResult<ForwardedResponse> {
    state.forward(&routes::LIST_CHECKPOINTS, &[]).await
}
