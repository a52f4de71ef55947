//! Request and response shapes exchanged with the browser.
//!
//! Incoming fields are all optional so that a missing value surfaces as a
//! 400 with our own `error` body instead of an extractor rejection.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ProxyError, ProxyResult};

#[derive(Debug, Default, Deserialize)]
pub struct VllmStatusQuery {
    #[serde(rename = "modelName", alias = "model_name")]
    pub model_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnloadModelRequest {
    pub model_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    pub model_name: Option<String>,
    pub branch_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UrlUploadRequest {
    pub http_source: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectionQueryRequest {
    pub question: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TreeRequest {
    pub root_path: Option<String>,
    pub dir_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeResponse {
    pub data: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GpuAvailability {
    pub free_gpus: u64,
    #[serde(default)]
    pub total_gpus: u64,
}

impl GpuAvailability {
    /// What the browser sees whenever the GPU count cannot be obtained.
    pub const UNAVAILABLE: Self = Self { free_gpus: 0, total_gpus: 0 };
}

/// Parse a request body; an empty body yields the all-`None` default.
pub fn parse_json_body<T>(bytes: &[u8]) -> ProxyResult<T>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| ProxyError::InvalidBody(e.to_string()))
}

/// Unwrap a required parameter, treating blank strings as absent.
pub fn require(value: Option<String>, missing: &'static str) -> ProxyResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ProxyError::MissingParameter(missing)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_body_is_default() {
        let req: UnloadModelRequest = parse_json_body(b"").unwrap();
        assert!(req.model_name.is_none());
    }

    #[test]
    fn test_parse_invalid_body_is_bad_request() {
        let err = parse_json_body::<UnloadModelRequest>(b"model_name=m1").unwrap_err();
        assert!(matches!(err, ProxyError::InvalidBody(_)));
    }

    #[test]
    fn test_train_request_uses_camel_case() {
        let req: TrainRequest =
            parse_json_body(br#"{"modelName": "granite", "branchName": "main"}"#).unwrap();
        assert_eq!(req.model_name.as_deref(), Some("granite"));
        assert_eq!(req.branch_name.as_deref(), Some("main"));
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require(Some("  ".to_string()), "Missing job_id").is_err());
        assert!(require(None, "Missing job_id").is_err());
        assert_eq!(require(Some("j1".to_string()), "Missing job_id").unwrap(), "j1");
    }

    #[test]
    fn test_gpu_availability_total_defaults_to_zero() {
        let gpus: GpuAvailability = serde_json::from_str(r#"{"free_gpus": 2}"#).unwrap();
        assert_eq!(gpus, GpuAvailability { free_gpus: 2, total_gpus: 0 });
    }
}
