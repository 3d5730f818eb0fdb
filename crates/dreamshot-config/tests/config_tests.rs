// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Dreamshot configuration system.

use dreamshot_config::diagnostic::ConfigError;
use dreamshot_config::model::DreamshotConfig;
use dreamshot_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with every section deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[app]
name = "dreamshot-staging"
log_level = "debug"
origin = "https://staging.dreamshot.ai"
default_locale = "en"

[api]
base_url = "https://api.dreamshot.ai"
api_key = "secret"
timeout_secs = 60

[upload]
max_file_bytes = 5242880
allowed_mime_types = ["image/png"]

[watcher]
failure_grace_ms = 4000
poll_interval_ms = 500
store_base_url = "https://store.dreamshot.ai/v1"

[dialogs]
add_credit_defer_ms = 250

[proxy]
port = 4000
allowed_hosts = ["cdn.example.com"]
block_private_ips = false

[content]
tools_dir = "/srv/content/tools"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "dreamshot-staging");
    assert_eq!(config.app.default_locale.as_deref(), Some("en"));
    assert_eq!(config.api.api_key.as_deref(), Some("secret"));
    assert_eq!(config.api.generate_path, "/api/generate");
    assert_eq!(config.upload.max_file_bytes, 5 * 1024 * 1024);
    assert_eq!(config.upload.allowed_mime_types, vec!["image/png"]);
    assert_eq!(config.watcher.failure_grace_ms, 4000);
    assert_eq!(config.dialogs.add_credit_defer_ms, 250);
    assert_eq!(config.proxy.port, 4000);
    assert_eq!(config.proxy.route, "/api/proxy-image");
    assert!(!config.proxy.block_private_ips);
    assert_eq!(config.content.tools_dir, "/srv/content/tools");
}

/// Missing optional sections use defaults without error.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.name, "dreamshot");
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.upload.max_file_bytes, 10 * 1024 * 1024);
    assert!(config
        .upload
        .allowed_mime_types
        .iter()
        .any(|m| m == "image/webp"));
    assert_eq!(config.watcher.failure_grace_ms, 3000);
    assert_eq!(config.dialogs.add_credit_defer_ms, 100);
    assert!(config.proxy.block_private_ips);
    assert!(!config.proxy.allowed_hosts.is_empty());
}

/// Unknown field in a section is rejected.
#[test]
fn unknown_field_in_watcher_produces_error() {
    let toml = r#"
[watcher]
failure_grace = 3000
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("failure_grace"),
        "error should mention the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn unknown_top_level_section_rejected() {
    let toml = r#"
[payments]
provider = "stripe"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Dotted overrides land on the right field (what the env provider produces).
#[test]
fn dotted_override_sets_nested_field() {
    use figment::{providers::Serialized, Figment};

    let config: DreamshotConfig = Figment::new()
        .merge(Serialized::defaults(DreamshotConfig::default()))
        .merge(("proxy.allowed_hosts", vec!["images.example.org"]))
        .extract()
        .expect("should set allowed_hosts via dot notation");

    assert_eq!(config.proxy.allowed_hosts, vec!["images.example.org"]);
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_files_silently_skipped() {
    let config =
        dreamshot_config::load_config_from_path(std::path::Path::new("/nonexistent/dreamshot.toml"))
            .expect("missing file should be silently skipped");
    assert_eq!(config.app.name, "dreamshot");
}

/// Unknown key produces a suggestion and the valid key listing.
#[test]
fn diagnostic_suggests_correct_key() {
    let toml = r#"
[dialogs]
add_credit_defer = 100
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let matched = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "add_credit_defer"
                && suggestion.as_deref() == Some("add_credit_defer_ms")
                && valid_keys.contains("add_credit_defer_ms")
        })
    });
    assert!(matched, "expected UnknownKey with suggestion, got: {errors:?}");
}

/// Wrong value type is reported.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[upload]
max_file_bytes = "ten megabytes"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("max_file_bytes"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// Validation runs after a successful parse.
#[test]
fn validation_errors_surface_through_load() {
    let toml = r#"
[proxy]
allowed_hosts = []
"#;

    let errors = load_and_validate_str(toml).expect_err("empty allow-list should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("allowed_hosts"))
    }));
}

/// ConfigError renders through miette with its help text.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "orgin".to_string(),
        suggestion: Some("origin".to_string()),
        valid_keys: "name, log_level, origin, default_locale".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().expect("help").to_string();
    assert!(help.contains("did you mean `origin`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("orgin"));
}

/// Valid inline TOML passes both parse and validation.
#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[app]
origin = "https://dreamshot.ai"
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.app.origin, "https://dreamshot.ai");
}
