//! Gateway configuration
//!
//! Built once at startup from the process environment and carried in the
//! server state. Handlers never read the environment themselves.

use serde::Serialize;
use std::path::PathBuf;
use url::Url;

use crate::analytics::AnalyticsConfig;
use crate::error::{ProxyError, ProxyResult};
use crate::routes::Upstream;

pub const ENV_API_SERVER: &str = "ILAB_API_SERVER";
pub const ENV_COLLECTIONS_URL: &str = "ILAB_COLLECTIONS_URL";
pub const ENV_CHECKPOINTS_URL: &str = "ILAB_CHECKPOINTS_URL";
pub const ENV_TAXONOMY_ROOT_DIR: &str = "ILAB_TAXONOMY_ROOT_DIR";
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "ILAB_UPSTREAM_TIMEOUT_SECS";
pub const ENV_STATIC_DIR: &str = "ILAB_UI_STATIC_DIR";

const DEFAULT_API_SERVER: &str = "http://localhost:8080";
const DEFAULT_COLLECTIONS_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_CHECKPOINTS_URL: &str = "http://localhost:8080";
const DEFAULT_TAXONOMY_ROOT: &str = ".instructlab-ui";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 300;

/// Name of the taxonomy checkout inside the taxonomy root directory.
pub const TAXONOMY_DIR_NAME: &str = "taxonomy";

#[derive(Debug, Clone, Serialize)]
pub struct GatewayConfig {
    pub api_server_url: Url,
    pub collections_url: Url,
    pub checkpoints_url: Url,
    pub taxonomy_root_dir: PathBuf,
    pub upstream_timeout_secs: u64,
    pub static_dir: Option<PathBuf>,
    pub analytics: AnalyticsConfig,
    pub deployment: DeploymentEnv,
}

impl GatewayConfig {
    pub fn from_env() -> ProxyResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty or whitespace-only values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ProxyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        let api_server_url = parse_base_url(ENV_API_SERVER, get(ENV_API_SERVER), DEFAULT_API_SERVER)?;
        let collections_url =
            parse_base_url(ENV_COLLECTIONS_URL, get(ENV_COLLECTIONS_URL), DEFAULT_COLLECTIONS_URL)?;
        let checkpoints_url =
            parse_base_url(ENV_CHECKPOINTS_URL, get(ENV_CHECKPOINTS_URL), DEFAULT_CHECKPOINTS_URL)?;

        let taxonomy_root_dir = get(ENV_TAXONOMY_ROOT_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_taxonomy_root);

        let upstream_timeout_secs = match get(ENV_UPSTREAM_TIMEOUT_SECS) {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ProxyError::Config(format!("{ENV_UPSTREAM_TIMEOUT_SECS} must be a number: {e}"))
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        Ok(Self {
            api_server_url,
            collections_url,
            checkpoints_url,
            taxonomy_root_dir,
            upstream_timeout_secs,
            static_dir: get(ENV_STATIC_DIR).map(PathBuf::from),
            analytics: AnalyticsConfig::from_lookup(&get),
            deployment: DeploymentEnv::from_lookup(&get),
        })
    }

    pub fn base_url(&self, upstream: Upstream) -> &Url {
        match upstream {
            Upstream::ApiServer => &self.api_server_url,
            Upstream::Collections => &self.collections_url,
            Upstream::Checkpoints => &self.checkpoints_url,
        }
    }

    /// Local checkout of the taxonomy repository.
    pub fn taxonomy_dir(&self) -> PathBuf {
        self.taxonomy_root_dir.join(TAXONOMY_DIR_NAME)
    }
}

fn default_taxonomy_root() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_TAXONOMY_ROOT))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TAXONOMY_ROOT))
}

fn parse_base_url(key: &str, raw: Option<String>, default: &str) -> ProxyResult<Url> {
    let raw = raw.unwrap_or_else(|| default.to_string());
    let trimmed = raw.trim_end_matches('/');

    let url = Url::parse(trimmed)
        .map_err(|e| ProxyError::Config(format!("{key} is not a valid URL ('{raw}'): {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ProxyError::Config(format!(
            "{key} must be an http(s) base URL, got '{raw}'"
        )));
    }

    Ok(url)
}

/// Deployment settings relayed to the browser as-is.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DeploymentEnv {
    pub endpoint_proxy: String,
    pub granite_api: String,
    pub granite_model_name: String,
    pub merlinite_api: String,
    pub merlinite_model_name: String,
    pub upstream_repo_owner: String,
    pub upstream_repo_name: String,
    pub deployment_type: String,
}

impl DeploymentEnv {
    fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| get(key).unwrap_or_default();
        Self {
            endpoint_proxy: var("IL_ENDPOINT_PROXY"),
            granite_api: var("IL_GRANITE_API"),
            granite_model_name: var("IL_GRANITE_MODEL_NAME"),
            merlinite_api: var("IL_MERLINITE_API"),
            merlinite_model_name: var("IL_MERLINITE_MODEL_NAME"),
            upstream_repo_owner: var("NEXT_PUBLIC_TAXONOMY_REPO_OWNER"),
            upstream_repo_name: var("NEXT_PUBLIC_TAXONOMY_REPO"),
            deployment_type: var("IL_UI_DEPLOYMENT"),
        }
    }
}
