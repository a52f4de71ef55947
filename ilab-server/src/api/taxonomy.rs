//! Taxonomy tree listing

use axum::{body::Bytes, extract::State, http::StatusCode, Json};

use ilab_core::models::{parse_json_body, require, TreeRequest, TreeResponse};
use ilab_core::taxonomy::{list_first_level_directories, resolve_tree_path, TaxonomyCategory};
use ilab_core::{ProxyError, ProxyResult};

use crate::state::AppState;

pub async fn tree(
    State(state): State<AppState>,
    body: Bytes,
) -> ProxyResult<(StatusCode, Json<TreeResponse>)> {
    let payload: TreeRequest = parse_json_body(&body)?;
    let root_path = require(payload.root_path, "Missing root_path")?;
    // An empty dir_name lists the category itself.
    let dir_name = payload.dir_name.ok_or(ProxyError::MissingParameter("Missing dir_name"))?;

    let category = TaxonomyCategory::from_root_path(&root_path);
    let path = resolve_tree_path(&state.config().taxonomy_dir(), category, &dir_name)?;
    tracing::debug!("[tree] Listing {}", path.display());

    let data = list_first_level_directories(&path).await?;
    Ok((StatusCode::CREATED, Json(TreeResponse { data })))
}
