//! UI analytics snapshot served to the browser.

use serde::Serialize;
use serde_json::{Map, Value};

const DEFAULT_PROVIDER: &str = "None";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsConfig {
    pub verbose: bool,
    pub active_providers: Vec<String>,
    pub umami_key: String,
    pub umami_host_url: String,
    pub segment_key: String,
    pub segment_cdn: String,
    pub segment_integrations: Value,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            active_providers: vec![DEFAULT_PROVIDER.to_string()],
            umami_key: String::new(),
            umami_host_url: String::new(),
            segment_key: String::new(),
            segment_cdn: String::new(),
            segment_integrations: Value::Object(Map::new()),
        }
    }
}

impl AnalyticsConfig {
    pub(crate) fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            verbose: get("ANALYTICS_VERBOSE").map_or(defaults.verbose, |v| parse_flag(&v)),
            active_providers: get("ANALYTICS_PROVIDERS")
                .map(|v| parse_providers(&v))
                .unwrap_or(defaults.active_providers),
            umami_key: get("UMAMI_KEY").unwrap_or_default(),
            umami_host_url: get("UMAMI_HOST_URL").unwrap_or_default(),
            segment_key: get("SEGMENT_KEY").unwrap_or_default(),
            segment_cdn: get("SEGMENT_CDN").unwrap_or_default(),
            segment_integrations: get("SEGMENT_INTEGRATIONS")
                .map_or(defaults.segment_integrations, |raw| parse_integrations(&raw)),
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    !matches!(raw.to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off")
}

fn parse_providers(raw: &str) -> Vec<String> {
    let providers: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if providers.is_empty() {
        vec![DEFAULT_PROVIDER.to_string()]
    } else {
        providers
    }
}

/// Malformed input degrades to an empty object.
fn parse_integrations(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => {
            tracing::warn!(
                "SEGMENT_INTEGRATIONS is not a JSON object (got {}), using {{}}",
                json_kind(&other)
            );
            Value::Object(Map::new())
        },
        Err(e) => {
            tracing::warn!("SEGMENT_INTEGRATIONS is not valid JSON ({}), using {{}}", e);
            Value::Object(Map::new())
        },
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
