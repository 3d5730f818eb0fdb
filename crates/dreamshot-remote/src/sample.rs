// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample-image materialization.
//!
//! Same-origin sample URLs (including relative ones) are fetched directly.
//! Anything else goes through the same-origin image proxy, which applies
//! the host allow-list.

use std::time::Duration;

use async_trait::async_trait;
use dreamshot_config::model::{AppConfig, ProxyConfig};
use dreamshot_core::{DreamshotError, ImageFile, PluginAdapter, SampleSource};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use crate::types::ApiErrorBody;

#[derive(Debug, Clone)]
pub struct ProxySampleSource {
    client: reqwest::Client,
    origin: Url,
    proxy: Url,
    max_bytes: u64,
}

impl ProxySampleSource {
    pub fn new(app: &AppConfig, proxy: &ProxyConfig) -> Result<Self, DreamshotError> {
        let origin = Url::parse(&app.origin)
            .map_err(|e| DreamshotError::Config(format!("invalid app.origin: {e}")))?;
        let proxy_url = origin
            .join(&proxy.route)
            .map_err(|e| DreamshotError::Config(format!("invalid proxy.route: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(proxy.timeout_secs))
            .build()
            .map_err(|e| DreamshotError::transport("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            origin,
            proxy: proxy_url,
            max_bytes: proxy.max_bytes,
        })
    }

    /// URL actually requested for `raw`.
    pub fn resolve(&self, raw: &str) -> Result<Url, DreamshotError> {
        let target = self
            .origin
            .join(raw.trim())
            .map_err(|e| DreamshotError::Validation(format!("invalid sample URL '{raw}': {e}")))?;

        if !matches!(target.scheme(), "http" | "https") {
            return Err(DreamshotError::Validation(format!(
                "unsupported sample URL scheme: {}",
                target.scheme()
            )));
        }

        if self.is_same_origin(&target) {
            return Ok(target);
        }

        let mut proxied = self.proxy.clone();
        proxied
            .query_pairs_mut()
            .clear()
            .append_pair("url", target.as_str());
        Ok(proxied)
    }

    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin.origin()
    }
}

impl PluginAdapter for ProxySampleSource {
    fn name(&self) -> &str {
        "proxy-sample-source"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }
}

#[async_trait]
impl SampleSource for ProxySampleSource {
    async fn fetch(&self, url: &str) -> Result<ImageFile, DreamshotError> {
        let target = self.resolve(url)?;
        debug!(sample = %url, request = %target, "fetching sample image");

        let response = self
            .client
            .get(target.clone())
            .send()
            .await
            .map_err(|e| DreamshotError::transport("sample image request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(sample = %url, status = %status, "sample image fetch rejected");
            let message = ApiErrorBody::message_from(&body)
                .unwrap_or_else(|| format!("sample image fetch returned {status}"));
            return Err(DreamshotError::Transport {
                message,
                source: None,
            });
        }

        if let Some(length) = response.content_length()
            && length > self.max_bytes
        {
            return Err(DreamshotError::Validation(format!(
                "sample image is too large ({length} bytes)"
            )));
        }

        let header_mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DreamshotError::transport("failed to read sample image", e))?;
        if bytes.len() as u64 > self.max_bytes {
            return Err(DreamshotError::Validation(format!(
                "sample image is too large ({} bytes)",
                bytes.len()
            )));
        }

        // Name and type come from the sample URL, not the proxy URL.
        let original = self.origin.join(url.trim()).unwrap_or(target);
        let name = original
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|s| !s.is_empty())
            .unwrap_or("sample")
            .to_string();
        let mime_type = header_mime
            .filter(|m| m.starts_with("image/"))
            .unwrap_or_else(|| {
                mime_guess::from_path(&name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        debug!(sample = %url, name = %name, mime_type = %mime_type, size = bytes.len(), "sample image fetched");
        Ok(ImageFile::new(name, mime_type, bytes.to_vec()))
    }
}
