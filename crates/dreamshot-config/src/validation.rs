// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express: parseable URLs, positive limits,
//! a non-empty proxy allow-list.

use crate::diagnostic::ConfigError;
use crate::model::DreamshotConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &DreamshotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (key, value) in [
        ("app.origin", &config.app.origin),
        ("api.base_url", &config.api.base_url),
        ("watcher.store_base_url", &config.watcher.store_base_url),
    ] {
        check_http_url(key, value, &mut errors);
    }

    if !config.api.generate_path.starts_with('/') {
        errors.push(ConfigError::validation(format!(
            "api.generate_path must start with `/`, got `{}`",
            config.api.generate_path
        )));
    }

    if config.upload.max_file_bytes == 0 {
        errors.push(ConfigError::validation(
            "upload.max_file_bytes must be greater than 0",
        ));
    }

    if config.upload.allowed_mime_types.is_empty() {
        errors.push(ConfigError::validation(
            "upload.allowed_mime_types must list at least one type",
        ));
    }

    for mime in &config.upload.allowed_mime_types {
        if !mime.starts_with("image/") {
            errors.push(ConfigError::validation(format!(
                "upload.allowed_mime_types entry `{mime}` is not an image type"
            )));
        }
    }

    if config.watcher.poll_interval_ms == 0 {
        errors.push(ConfigError::validation(
            "watcher.poll_interval_ms must be greater than 0",
        ));
    }

    if !config.proxy.route.starts_with('/') {
        errors.push(ConfigError::validation(format!(
            "proxy.route must start with `/`, got `{}`",
            config.proxy.route
        )));
    }

    if config.proxy.allowed_hosts.is_empty() {
        errors.push(ConfigError::validation(
            "proxy.allowed_hosts must list at least one host",
        ));
    }

    for host in &config.proxy.allowed_hosts {
        if host.trim().is_empty() || host.contains('/') || host.contains("://") {
            errors.push(ConfigError::validation(format!(
                "proxy.allowed_hosts entry `{host}` must be a bare hostname"
            )));
        }
    }

    if config.proxy.bind_address.trim().is_empty() {
        errors.push(ConfigError::validation("proxy.bind_address must not be empty"));
    }

    if config.content.tools_dir.trim().is_empty() {
        errors.push(ConfigError::validation("content.tools_dir must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(key: &str, value: &str, errors: &mut Vec<ConfigError>) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ConfigError::validation(format!(
            "{key} must use http or https, got `{}`",
            url.scheme()
        ))),
        Err(e) => errors.push(ConfigError::validation(format!(
            "{key} `{value}` is not a valid URL: {e}"
        ))),
    }
}
