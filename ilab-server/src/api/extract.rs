//! `Path`/`Query` wrappers whose rejections answer with a JSON `error` body.

use axum::extract::FromRequestParts;

use ilab_core::ProxyError;

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ProxyError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ProxyError))]
pub struct ApiQuery<T>(pub T);
