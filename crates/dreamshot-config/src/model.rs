// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Dreamshot client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Dreamshot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DreamshotConfig {
    /// Site identity, origin and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Remote generation API.
    #[serde(default)]
    pub api: ApiConfig,

    /// Client-side upload validation limits.
    #[serde(default)]
    pub upload: UploadConfig,

    /// Generation-status watcher tuning.
    #[serde(default)]
    pub watcher: WatcherConfig,

    /// Dialog coordinator tuning.
    #[serde(default)]
    pub dialogs: DialogConfig,

    /// Same-origin sample-image proxy.
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Tool content location.
    #[serde(default)]
    pub content: ContentConfig,
}

/// Site identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in logs.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Public origin of the site. Sample URLs on this origin skip the proxy.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Locale used when a request does not name one.
    #[serde(default)]
    pub default_locale: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
            origin: default_origin(),
            default_locale: None,
        }
    }
}

fn default_app_name() -> String {
    "dreamshot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_origin() -> String {
    "http://127.0.0.1:3000".to_string()
}

/// Remote generation API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the generation service.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Path of the start-generation endpoint, relative to `base_url`.
    #[serde(default = "default_generate_path")]
    pub generate_path: String,

    /// Bearer token sent with start-generation calls. `None` sends no auth header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            generate_path: default_generate_path(),
            api_key: None,
            timeout_secs: default_api_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_generate_path() -> String {
    "/api/generate".to_string()
}

fn default_api_timeout_secs() -> u64 {
    120
}

/// Upload validation limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// MIME types accepted for upload.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_allowed_mime_types() -> Vec<String> {
    ["image/jpeg", "image/jpg", "image/png", "image/webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Generation-status watcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WatcherConfig {
    /// How long a `failed` status must persist before it is shown.
    #[serde(default = "default_failure_grace_ms")]
    pub failure_grace_ms: u64,

    /// Poll interval of the HTTP document store adapter.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Base URL of the document store REST endpoint.
    #[serde(default = "default_store_base_url")]
    pub store_base_url: String,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            failure_grace_ms: default_failure_grace_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            store_base_url: default_store_base_url(),
        }
    }
}

fn default_failure_grace_ms() -> u64 {
    3000
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_store_base_url() -> String {
    "http://127.0.0.1:8080/store".to_string()
}

/// Dialog coordinator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DialogConfig {
    /// Delay before `addCredit` is pushed onto a stack that already holds
    /// more than one dialog.
    #[serde(default = "default_add_credit_defer_ms")]
    pub add_credit_defer_ms: u64,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            add_credit_defer_ms: default_add_credit_defer_ms(),
        }
    }
}

fn default_add_credit_defer_ms() -> u64 {
    100
}

/// Sample-image proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    /// Address the proxy server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port the proxy server listens on.
    #[serde(default = "default_proxy_port")]
    pub port: u16,

    /// Route serving proxied images.
    #[serde(default = "default_proxy_route")]
    pub route: String,

    /// Hostnames the proxy may fetch from. Everything else is rejected.
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,

    /// Reject URLs whose host is a literal private or loopback IP.
    #[serde(default = "default_block_private_ips")]
    pub block_private_ips: bool,

    /// Largest upstream body the proxy will relay.
    #[serde(default = "default_proxy_max_bytes")]
    pub max_bytes: u64,

    /// Upstream fetch timeout in seconds.
    #[serde(default = "default_proxy_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_proxy_port(),
            route: default_proxy_route(),
            allowed_hosts: default_allowed_hosts(),
            block_private_ips: default_block_private_ips(),
            max_bytes: default_proxy_max_bytes(),
            timeout_secs: default_proxy_timeout_secs(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_proxy_port() -> u16 {
    3000
}

fn default_proxy_route() -> String {
    "/api/proxy-image".to_string()
}

fn default_allowed_hosts() -> Vec<String> {
    [
        "cdn.dreamshot.ai",
        "storage.googleapis.com",
        "firebasestorage.googleapis.com",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_block_private_ips() -> bool {
    true
}

fn default_proxy_max_bytes() -> u64 {
    20 * 1024 * 1024
}

fn default_proxy_timeout_secs() -> u64 {
    30
}

/// Tool content configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Root directory holding `{category}/[{locale}/]{slug}.json` files.
    #[serde(default = "default_tools_dir")]
    pub tools_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            tools_dir: default_tools_dir(),
        }
    }
}

fn default_tools_dir() -> String {
    "content/tools".to_string()
}
