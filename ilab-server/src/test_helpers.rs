//! Test helpers for ilab-server unit tests.

use std::collections::HashMap;

use axum_test::TestServer;
use tempfile::TempDir;

use ilab_core::GatewayConfig;

use crate::state::AppState;

/// Create an `AppState` whose upstreams all point at `upstream_uri`.
///
/// Returns `(AppState, TempDir)`. Keep `TempDir` alive for the test duration:
/// it is the taxonomy root (the checkout lives in `<tmp>/taxonomy`).
pub fn test_app_state(upstream_uri: &str) -> (AppState, TempDir) {
    test_app_state_with(upstream_uri, &[])
}

pub fn test_app_state_with(upstream_uri: &str, extra: &[(&str, &str)]) -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let mut vars: HashMap<String, String> = HashMap::from([
        ("ILAB_API_SERVER".to_string(), upstream_uri.to_string()),
        ("ILAB_COLLECTIONS_URL".to_string(), upstream_uri.to_string()),
        ("ILAB_CHECKPOINTS_URL".to_string(), upstream_uri.to_string()),
        ("ILAB_TAXONOMY_ROOT_DIR".to_string(), temp_dir.path().display().to_string()),
        ("ILAB_UPSTREAM_TIMEOUT_SECS".to_string(), "10".to_string()),
    ]);
    for (key, value) in extra {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    let config = GatewayConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("failed to build test config");
    let state = AppState::new(config).expect("failed to create test AppState");

    (state, temp_dir)
}

/// Full router wrapped in an in-process test server.
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(crate::router::build_router(state)).expect("failed to start test server")
}

/// Base URI of a local port with nothing listening on it.
pub fn unreachable_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind ephemeral port");
    let port = listener.local_addr().expect("failed to read local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
