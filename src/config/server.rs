use std::{net::IpAddr, str::FromStr, time::Duration};

use http::{HeaderName, HeaderValue, Method};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Largest accepted request body. Submissions and catalog writes are small JSON documents.
    pub body_limit_bytes: usize,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            body_limit_bytes: 256 * 1024,
            cors: CorsConfig::default(),
        }
    }
}

/// `[server.cors]`: which browser origins may call the admin and public APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub enabled: bool,
    /// Exact origins such as `https://admin.example.com`, or `["*"]` for any.
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: Vec::new(),
            allowed_methods: ["GET", "POST", "PATCH", "OPTIONS"].map(String::from).to_vec(),
            allowed_headers: ["Content-Type", "Authorization", "X-Request-Id"]
                .map(String::from)
                .to_vec(),
            max_age_secs: 60 * 60,
        }
    }
}

/// Parse each configured entry, logging and skipping the ones that are not valid.
fn parse_entries<T: FromStr>(entries: &[String], kind: &'static str) -> Vec<T> {
    entries
        .iter()
        .filter_map(|entry| match entry.trim().parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!(kind, entry = %entry, "Ignoring invalid CORS entry");
                None
            }
        })
        .collect()
}

impl CorsConfig {
    /// `None` when CORS is disabled. With no origins configured the layer still
    /// answers preflights but allows nothing.
    pub fn into_layer(self) -> Option<CorsLayer> {
        if !self.enabled {
            return None;
        }

        let allow_origin = match self.allowed_origins.as_slice() {
            [only] if only == "*" => {
                tracing::warn!("CORS allows any origin");
                AllowOrigin::any()
            }
            origins => AllowOrigin::list(parse_entries::<HeaderValue>(origins, "origin")),
        };

        Some(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_methods(AllowMethods::list(parse_entries::<Method>(
                    &self.allowed_methods,
                    "method",
                )))
                .allow_headers(AllowHeaders::list(parse_entries::<HeaderName>(
                    &self.allowed_headers,
                    "header",
                )))
                .max_age(Duration::from_secs(self.max_age_secs)),
        )
    }
}
