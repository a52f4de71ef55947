//! Upstream forwarding
//!
//! `UpstreamClient::forward` is the single primitive behind every proxy route:
//! send exactly one request, then normalize the outcome into either a
//! `ForwardedResponse` or a `ProxyError`.

use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::error::{ProxyError, ProxyResult};
use crate::routes::{BodyKind, ForwardedRequest, RouteSpec, SuccessCheck};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_ERROR_DETAIL_CHARS: usize = 2048;

/// Build the shared HTTP client used for all upstream calls.
pub fn build_http_client(timeout_secs: u64) -> ProxyResult<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(timeout_secs.max(5)))
        .tcp_nodelay(true)
        .build()
        .map_err(|e| ProxyError::Config(format!("Failed to build HTTP client: {e}")))
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForwardedBody {
    Json(Value),
    Text(Bytes),
}

/// What the browser receives after a successful upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub body: ForwardedBody,
}

impl ForwardedResponse {
    pub fn json(status: StatusCode, value: Value) -> Self {
        Self { status, body: ForwardedBody::Json(value) }
    }

    /// The JSON payload, if this response carries one.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            ForwardedBody::Json(value) => Some(value),
            ForwardedBody::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self.body {
            ForwardedBody::Json(value) => Some(value),
            ForwardedBody::Text(_) => None,
        }
    }
}

impl IntoResponse for ForwardedResponse {
    fn into_response(self) -> Response {
        match self.body {
            ForwardedBody::Json(value) => (self.status, Json(value)).into_response(),
            ForwardedBody::Text(bytes) => {
                (self.status, [(header::CONTENT_TYPE, "text/plain")], bytes).into_response()
            },
        }
    }
}

#[derive(Clone)]
pub struct UpstreamClient {
    http_client: reqwest::Client,
}

impl UpstreamClient {
    /// Accepts a pre-built client so every route shares one connection pool.
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    pub async fn forward(
        &self,
        route: &RouteSpec,
        request: ForwardedRequest,
    ) -> ProxyResult<ForwardedResponse> {
        tracing::info!("[{}] Forwarding {} {}", route.name, request.method, request.url);

        let mut builder =
            self.http_client.request(request.method, request.url.clone()).headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("[{}] Upstream request to {} failed: {}", route.name, request.url, e);
            ProxyError::Transport { message: route.failure.to_string(), source: e }
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!("[{}] Failed to read upstream body: {}", route.name, e);
            ProxyError::Transport { message: route.failure.to_string(), source: e }
        })?;

        if !status.is_success() {
            let details = error_details(&bytes);
            tracing::warn!(
                "[{}] Upstream returned HTTP {}: {}",
                route.name,
                status,
                details.as_deref().unwrap_or("<empty body>")
            );
            return Err(ProxyError::Upstream {
                status,
                message: route.failure.to_string(),
                details,
            });
        }

        let body = match route.body {
            BodyKind::Text => ForwardedBody::Text(bytes),
            BodyKind::Json => ForwardedBody::Json(decode_json(route, &bytes)?),
        };
        verify(route, &body)?;

        tracing::info!("[{}] Upstream fetch succeeded (HTTP {})", route.name, status);
        Ok(ForwardedResponse { status: route.success, body })
    }
}

/// An empty body decodes as `{}`.
fn decode_json(route: &RouteSpec, bytes: &[u8]) -> ProxyResult<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|e| {
        tracing::error!("[{}] Invalid JSON from upstream: {}", route.name, e);
        ProxyError::Decode { message: route.failure.to_string(), reason: e.to_string() }
    })
}

fn verify(route: &RouteSpec, body: &ForwardedBody) -> ProxyResult<()> {
    let ForwardedBody::Json(value) = body else {
        return Ok(());
    };

    match route.check {
        SuccessCheck::None => Ok(()),
        SuccessCheck::JsonArray if value.is_array() => Ok(()),
        SuccessCheck::JsonArray => {
            tracing::warn!("[{}] Expected a JSON array from upstream, got: {}", route.name, value);
            Err(ProxyError::UnexpectedShape(format!(
                "Invalid data format received from {} upstream",
                route.name
            )))
        },
        SuccessCheck::RequiredField(field) => {
            let present = match value.get(field) {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            };
            if present {
                Ok(())
            } else {
                tracing::error!("[{}] Missing {} in upstream response: {}", route.name, field, value);
                Err(ProxyError::UnexpectedShape(format!(
                    "API server response does not contain {field}"
                )))
            }
        },
    }
}

/// Extract something useful from an upstream error payload.
fn error_details(bytes: &[u8]) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(bytes) {
        for key in ["error", "detail", "message"] {
            if let Some(Value::String(s)) = map.get(key) {
                if !s.is_empty() {
                    return Some(s.clone());
                }
            }
        }
    }

    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.chars().take(MAX_ERROR_DETAIL_CHARS).collect())
    }
}
