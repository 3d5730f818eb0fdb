// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dreamshot.toml` > `~/.config/dreamshot/dreamshot.toml`
//! > `/etc/dreamshot/dreamshot.toml` with environment variable overrides via
//! the `DREAMSHOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DreamshotConfig;

/// Config sections, in the order env var prefixes are matched.
const SECTIONS: &[&str] = &[
    "app", "api", "upload", "watcher", "dialogs", "proxy", "content",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dreamshot/dreamshot.toml` (system-wide)
/// 3. `~/.config/dreamshot/dreamshot.toml` (user XDG config)
/// 4. `./dreamshot.toml` (local directory)
/// 5. `DREAMSHOT_*` environment variables
pub fn load_config() -> Result<DreamshotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<DreamshotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DreamshotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DreamshotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DreamshotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(DreamshotConfig::default()))
        .merge(Toml::file("/etc/dreamshot/dreamshot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dreamshot/dreamshot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dreamshot.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `DREAMSHOT_WATCHER_FAILURE_GRACE_MS` must map to
/// `watcher.failure_grace_ms`, not `watcher.failure.grace.ms`.
fn env_provider() -> Env {
    Env::prefixed("DREAMSHOT_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env key to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
