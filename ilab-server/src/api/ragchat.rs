//! Retrieval playground: document collection handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue},
};
use serde_json::{json, Value};

use ilab_core::models::{parse_json_body, require, CollectionQueryRequest, UrlUploadRequest};
use ilab_core::routes;
use ilab_core::{ForwardedResponse, ProxyResult};

use super::extract::ApiPath;
use crate::state::AppState;

pub async fn list_collections(State(state): State<AppState>) -> ProxyResult<ForwardedResponse> {
    let request = state
        .request(&routes::LIST_COLLECTIONS, &[])?
        .with_header(header::ACCEPT, HeaderValue::from_static("application/json"));
    state.send(&routes::LIST_COLLECTIONS, request).await
}

pub async fn delete_collection(
    State(state): State<AppState>,
    ApiPath(collection_name): ApiPath<String>,
) -> ProxyResult<ForwardedResponse> {
    let collection_name = require(Some(collection_name), "Missing collection name")?;

    tracing::info!("[delete-collection] Deleting collection {}", collection_name);
    state.forward(&routes::DELETE_COLLECTION, &[&collection_name]).await
}

pub async fn upload_url(
    State(state): State<AppState>,
    ApiPath(collection_name): ApiPath<String>,
    body: Bytes,
) -> ProxyResult<ForwardedResponse> {
    let collection_name = require(Some(collection_name), "Missing collection name")?;
    let payload: UrlUploadRequest = parse_json_body(&body)?;
    let http_source = require(payload.http_source, "Missing http_source")?;

    tracing::info!("[upload-url] {} -> collection {}", http_source, collection_name);
    let request = state
        .request(&routes::UPLOAD_COLLECTION_URL, &[&collection_name])?
        .with_json(json!({ "http_source": http_source }));
    state.send(&routes::UPLOAD_COLLECTION_URL, request).await
}

/// Only `answer` and `sources` reach the browser.
pub async fn query_collection(
    State(state): State<AppState>,
    ApiPath(collection_name): ApiPath<String>,
    body: Bytes,
) -> ProxyResult<ForwardedResponse> {
    let collection_name = require(Some(collection_name), "Missing collection name")?;
    let payload: CollectionQueryRequest = parse_json_body(&body)?;
    let question = require(payload.question, "Missing question")?;

    let request = state
        .request(&routes::QUERY_COLLECTION, &[&collection_name])?
        .with_json(json!({ "question": question }));
    let response = state.send(&routes::QUERY_COLLECTION, request).await?;

    let status = response.status;
    let upstream = response.into_json().unwrap_or(Value::Null);
    let narrowed = json!({
        "answer": upstream.get("answer").cloned().unwrap_or(Value::Null),
        "sources": upstream.get("sources").cloned().unwrap_or_else(|| json!([])),
    });
    Ok(ForwardedResponse::json(status, narrowed))
}
