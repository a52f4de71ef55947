//! # ilab-core
//!
//! Proxy logic for the InstructLab UI gateway.
//!
//! ```text
//! ilab-core/src/
//! ├── config.rs     # GatewayConfig, built once from the environment
//! ├── analytics.rs  # UI analytics snapshot
//! ├── routes.rs     # RouteSpec table + ForwardedRequest
//! ├── upstream.rs   # UpstreamClient::forward, ForwardedResponse
//! ├── taxonomy.rs   # first-level directory listing of the taxonomy tree
//! ├── models.rs     # browser-facing request/response shapes
//! └── error.rs      # ProxyError -> HTTP response
//! ```

#![cfg_attr(test, allow(clippy::panic, clippy::assertions_on_result_states))]

pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod taxonomy;
pub mod upstream;

pub use analytics::AnalyticsConfig;
pub use config::{DeploymentEnv, GatewayConfig};
pub use error::{ProxyError, ProxyResult};
pub use routes::{ForwardedRequest, RouteSpec, Upstream};
pub use upstream::{build_http_client, ForwardedBody, ForwardedResponse, UpstreamClient};
