// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP handlers for the image proxy.
//!
//! Handles GET /health and GET {proxy.route}?url=...

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::server::ProxyState;

/// Query string for the proxy route.
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET {proxy.route}?url=...
///
/// Relays an allow-listed image with its upstream content type. Refused
/// targets get 400/403 with an `error` body; anything that goes wrong talking
/// to the upstream is a 502.
pub async fn proxy_image(
    State(state): State<ProxyState>,
    Query(query): Query<ProxyQuery>,
) -> Response {
    let target = match state.allowlist.check(query.url.as_deref().unwrap_or_default()) {
        Ok(url) => url,
        Err(rejection) => {
            warn!(error = %rejection, "proxy request rejected");
            return error_response(rejection.status(), rejection.to_string());
        }
    };

    debug!(url = %target, "proxying image");
    let mut upstream = match state.client.get(target.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(url = %target, error = %e, "upstream fetch failed");
            return error_response(StatusCode::BAD_GATEWAY, "Failed to fetch image");
        }
    };

    let status = upstream.status();
    if !status.is_success() {
        warn!(url = %target, status = %status, "upstream returned error status");
        return error_response(
            StatusCode::BAD_GATEWAY,
            format!("Upstream responded with {}", status.as_u16()),
        );
    }

    if upstream
        .content_length()
        .is_some_and(|len| len > state.max_bytes)
    {
        return error_response(StatusCode::BAD_GATEWAY, "Image too large");
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

    let mut body = Vec::new();
    loop {
        match upstream.chunk().await {
            Ok(Some(chunk)) => {
                if body.len() as u64 + chunk.len() as u64 > state.max_bytes {
                    return error_response(StatusCode::BAD_GATEWAY, "Image too large");
                }
                body.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(e) => {
                warn!(url = %target, error = %e, "upstream body read failed");
                return error_response(StatusCode::BAD_GATEWAY, "Failed to fetch image");
            }
        }
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=86400"),
            ),
        ],
        body,
    )
        .into_response()
}
