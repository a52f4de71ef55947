//! Declarative route table
//!
//! Each browser-facing proxy route is a `RouteSpec`: which upstream it talks
//! to, which verb and resource path it uses, how the success body is decoded
//! and checked, and which message the browser sees when it fails.

use axum::http::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::error::{ProxyError, ProxyResult};

/// Upstream services the gateway relays to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// Fine-tuning / job API server.
    ApiServer,
    /// Retrieval document-collection server.
    Collections,
    /// Local checkpoint service.
    Checkpoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Delete,
}

impl Verb {
    pub fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Delete => Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Text,
}

/// Extra validation applied to a decoded 2xx body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessCheck {
    None,
    JsonArray,
    RequiredField(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub name: &'static str,
    pub upstream: Upstream,
    pub verb: Verb,
    /// Resource path relative to the upstream base URL. `{...}` segments are
    /// filled from the path parameters, in order.
    pub path: &'static str,
    pub body: BodyKind,
    pub success: StatusCode,
    pub check: SuccessCheck,
    pub failure: &'static str,
}

impl RouteSpec {
    const fn new(
        name: &'static str,
        upstream: Upstream,
        verb: Verb,
        path: &'static str,
        failure: &'static str,
    ) -> Self {
        Self {
            name,
            upstream,
            verb,
            path,
            body: BodyKind::Json,
            success: StatusCode::OK,
            check: SuccessCheck::None,
            failure,
        }
    }

    const fn text(self) -> Self {
        Self { body: BodyKind::Text, ..self }
    }

    const fn check(self, check: SuccessCheck) -> Self {
        Self { check, ..self }
    }

    /// Build the upstream URL for this route.
    pub fn url(&self, base: &Url, params: &[&str]) -> ProxyResult<Url> {
        let mut url = base.clone();
        let mut params = params.iter();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ProxyError::Config(format!("Upstream base URL cannot carry a path: {base}"))
            })?;
            segments.pop_if_empty();
            for segment in self.path.split('/').filter(|s| !s.is_empty()) {
                if segment.starts_with('{') && segment.ends_with('}') {
                    let value = params.next().ok_or_else(|| {
                        ProxyError::Config(format!(
                            "Route {} is missing a value for {segment}",
                            self.name
                        ))
                    })?;
                    segments.push(value);
                } else {
                    segments.push(segment);
                }
            }
        }
        Ok(url)
    }

    pub fn request(&self, base: &Url, params: &[&str]) -> ProxyResult<ForwardedRequest> {
        Ok(ForwardedRequest {
            method: self.verb.as_method(),
            url: self.url(base, params)?,
            body: None,
            headers: HeaderMap::new(),
        })
    }
}

/// One outbound call, built per incoming request.
#[derive(Debug, Clone)]
pub struct ForwardedRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl ForwardedRequest {
    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    /// Attach a JSON body; it is sent with `Content-Type: application/json`.
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

// ============ Fine-tuning API server ============

pub const LIST_DATASETS: RouteSpec =
    RouteSpec::new("data-sets", Upstream::ApiServer, Verb::Get, "data", "Failed to fetch datasets");

pub const GENERATE_DATA: RouteSpec = RouteSpec::new(
    "data-generate",
    Upstream::ApiServer,
    Verb::Post,
    "data/generate",
    "Failed to generate data",
);

pub const GPU_FREE: RouteSpec =
    RouteSpec::new("gpu-free", Upstream::ApiServer, Verb::Get, "gpu-free", "Failed to fetch GPU status");

pub const JOB_LOGS: RouteSpec = RouteSpec::new(
    "job-logs",
    Upstream::ApiServer,
    Verb::Get,
    "jobs/{job_id}/logs",
    "Error fetching logs",
)
.text();

pub const JOB_STATUS: RouteSpec = RouteSpec::new(
    "job-status",
    Upstream::ApiServer,
    Verb::Get,
    "jobs/{job_id}/status",
    "Error fetching job status",
);

pub const LIST_JOBS: RouteSpec =
    RouteSpec::new("jobs", Upstream::ApiServer, Verb::Get, "jobs", "Error fetching jobs");

pub const VLLM_STATUS: RouteSpec = RouteSpec::new(
    "vllm-status",
    Upstream::ApiServer,
    Verb::Get,
    "vllm-status",
    "Failed to get vllm status",
);

pub const VLLM_UNLOAD: RouteSpec = RouteSpec::new(
    "vllm-unload",
    Upstream::ApiServer,
    Verb::Post,
    "vllm-unload",
    "Failed to unload model",
);

pub const LIST_MODELS: RouteSpec =
    RouteSpec::new("models", Upstream::ApiServer, Verb::Get, "models", "Failed to fetch models");

pub const SERVE_BASE_MODEL: RouteSpec = RouteSpec::new(
    "serve-base",
    Upstream::ApiServer,
    Verb::Post,
    "model/serve-base",
    "Failed to serve the base model on the API server",
)
.check(SuccessCheck::RequiredField("job_id"));

pub const SERVE_LATEST_MODEL: RouteSpec = RouteSpec::new(
    "serve-latest",
    Upstream::ApiServer,
    Verb::Post,
    "model/serve-latest",
    "Failed to serve the latest model on the API server",
)
.check(SuccessCheck::RequiredField("job_id"));

pub const TRAIN_MODEL: RouteSpec = RouteSpec::new(
    "train",
    Upstream::ApiServer,
    Verb::Post,
    "model/train",
    "Failed to train the model on the API server",
)
.check(SuccessCheck::RequiredField("job_id"));

pub const GENERATE_TRAIN_PIPELINE: RouteSpec = RouteSpec::new(
    "generate-train",
    Upstream::ApiServer,
    Verb::Post,
    "pipeline/generate-train",
    "Failed to run generate-train pipeline on the API server",
);

// ============ Checkpoint service ============

pub const LIST_CHECKPOINTS: RouteSpec = RouteSpec::new(
    "checkpoints",
    Upstream::Checkpoints,
    Verb::Get,
    "checkpoints",
    "Failed to fetch checkpoints",
)
.check(SuccessCheck::JsonArray);

// ============ Document collections ============

pub const LIST_COLLECTIONS: RouteSpec = RouteSpec::new(
    "collections",
    Upstream::Collections,
    Verb::Get,
    "collections",
    "Failed to fetch collections",
);

pub const DELETE_COLLECTION: RouteSpec = RouteSpec::new(
    "delete-collection",
    Upstream::Collections,
    Verb::Delete,
    "collections/{collection_name}",
    "Failed to delete collection",
);

pub const UPLOAD_COLLECTION_URL: RouteSpec = RouteSpec::new(
    "upload-url",
    Upstream::Collections,
    Verb::Post,
    "collections/{collection_name}/documents/url",
    "Failed to upload URL",
);

pub const QUERY_COLLECTION: RouteSpec = RouteSpec::new(
    "query-collection",
    Upstream::Collections,
    Verb::Post,
    "collections/{collection_name}/query",
    "Failed to query collection",
);
