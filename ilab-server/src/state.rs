//! Application State
//!
//! Immutable after startup: the resolved configuration plus one pooled HTTP
//! client shared by every proxy route.

use std::sync::Arc;

use ilab_core::{
    build_http_client, ForwardedRequest, ForwardedResponse, GatewayConfig, ProxyResult, RouteSpec,
    UpstreamClient,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub(crate) inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub config: GatewayConfig,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> ProxyResult<Self> {
        let http_client = build_http_client(config.upstream_timeout_secs)?;
        Ok(Self::new_with_client(config, http_client))
    }

    pub fn new_with_client(config: GatewayConfig, http_client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, upstream: UpstreamClient::new(http_client) }),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Start an outbound request for `route` against its configured upstream.
    pub fn request(&self, route: &RouteSpec, params: &[&str]) -> ProxyResult<ForwardedRequest> {
        route.request(self.inner.config.base_url(route.upstream), params)
    }

    pub async fn send(
        &self,
        route: &RouteSpec,
        request: ForwardedRequest,
    ) -> ProxyResult<ForwardedResponse> {
        self.inner.upstream.forward(route, request).await
    }

    /// Forward a body-less request with the given path parameters.
    pub async fn forward(&self, route: &RouteSpec, params: &[&str]) -> ProxyResult<ForwardedResponse> {
        let request = self.request(route, params)?;
        self.send(route, request).await
    }
}
