// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image proxy HTTP server built on axum.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use dreamshot_config::model::ProxyConfig;
use dreamshot_core::DreamshotError;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::allowlist::HostAllowlist;
use crate::handlers;

/// Upper bound on redirects followed for one proxied fetch.
const MAX_REDIRECTS: usize = 5;

/// Shared state for the proxy handlers.
#[derive(Clone)]
pub struct ProxyState {
    pub allowlist: Arc<HostAllowlist>,
    pub client: reqwest::Client,
    pub max_bytes: u64,
}

impl ProxyState {
    /// Build the state, including an upstream client whose redirects are held
    /// to the same allow-list as the original request.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, DreamshotError> {
        let allowlist = Arc::new(HostAllowlist::from_config(config));
        let redirect_list = Arc::clone(&allowlist);
        let policy = reqwest::redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if let Err(rejection) = redirect_list.check_url(attempt.url()) {
                attempt.error(rejection)
            } else {
                attempt.follow()
            }
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(policy)
            .build()
            .map_err(|e| DreamshotError::transport("failed to build proxy HTTP client", e))?;

        Ok(Self {
            allowlist,
            client,
            max_bytes: config.max_bytes,
        })
    }
}

/// Routes: `GET /health` and `GET {config.route}`.
pub fn router(config: &ProxyConfig, state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(&config.route, get(handlers::proxy_image))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until `shutdown` is cancelled.
pub async fn serve(config: &ProxyConfig, shutdown: CancellationToken) -> Result<(), DreamshotError> {
    let state = ProxyState::from_config(config)?;
    let app = router(config, state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DreamshotError::transport(format!("failed to bind proxy to {addr}: {e}"), e))?;

    tracing::info!(
        route = %config.route,
        hosts = config.allowed_hosts.len(),
        "image proxy listening on {addr}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| DreamshotError::transport(format!("proxy server error: {e}"), e))?;

    tracing::info!("image proxy stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_builds_from_default_config() {
        let state = ProxyState::from_config(&ProxyConfig::default()).unwrap();
        assert!(!state.allowlist.hosts().is_empty());
        assert_eq!(state.max_bytes, ProxyConfig::default().max_bytes);
    }
}
