//! API gateway settings and route table.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "127.0.0.1".into()
}

const fn default_port() -> u16 {
    8000
}

const fn default_timeout_secs() -> u64 {
    30
}

const DEFAULT_UPSTREAM: &str = "http://127.0.0.1:8080";

/// Path prefixes served by the entity services.
pub const SERVICE_PREFIXES: [&str; 8] = [
    "/rifles",
    "/loads",
    "/groups",
    "/shots",
    "/projectiles",
    "/propellants",
    "/primers",
    "/cases",
];

/// Requests whose path starts with `prefix` are forwarded to `upstream`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    pub prefix: String,
    pub upstream: String,
}

fn default_routes() -> Vec<RouteConfig> {
    SERVICE_PREFIXES
        .iter()
        .map(|prefix| RouteConfig {
            prefix: (*prefix).to_string(),
            upstream: DEFAULT_UPSTREAM.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            routes: default_routes(),
        }
    }
}

impl GatewayConfig {
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
