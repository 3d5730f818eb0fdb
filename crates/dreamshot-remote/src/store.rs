// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store over plain HTTP polling.
//!
//! Each subscription polls `{store_base_url}/{path}` on an interval and
//! pushes a snapshot whenever the document differs from the last one pushed.
//! A 404 means the job document has not been written yet and is skipped.
//! Transport failures are pushed once per failure streak and polling
//! carries on.

use std::time::Duration;

use dreamshot_config::model::{ApiConfig, WatcherConfig};
use dreamshot_core::{
    DocumentPublisher, DocumentStore, DocumentSubscription, DreamshotError, GenerationDocument,
    PluginAdapter,
};
use reqwest::StatusCode;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::types::join_url;

#[derive(Debug, Clone)]
pub struct PollingDocumentStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    interval: Duration,
}

impl PollingDocumentStore {
    pub fn new(watcher: &WatcherConfig, api: &ApiConfig) -> Result<Self, DreamshotError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(|e| DreamshotError::transport("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: watcher.store_base_url.clone(),
            api_key: api.api_key.clone(),
            interval: Duration::from_millis(watcher.poll_interval_ms.max(1)),
        })
    }

    pub fn document_url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

impl PluginAdapter for PollingDocumentStore {
    fn name(&self) -> &str {
        "polling-document-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }
}

impl DocumentStore for PollingDocumentStore {
    fn subscribe(&self, path: &str) -> Result<DocumentSubscription, DreamshotError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| {
            DreamshotError::Internal("document polling needs an async runtime".into())
        })?;

        let (publisher, subscription) = DocumentSubscription::channel(path);
        let poller = Poller {
            client: self.client.clone(),
            url: self.document_url(path),
            api_key: self.api_key.clone(),
        };
        debug!(url = %poller.url, interval_ms = self.interval.as_millis() as u64, "polling document");
        handle.spawn(poll_loop(poller, publisher, self.interval));
        Ok(subscription)
    }
}

struct Poller {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl Poller {
    /// `Ok(None)` when the document does not exist yet.
    async fn fetch(&self) -> Result<Option<GenerationDocument>, DreamshotError> {
        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DreamshotError::transport("document store request failed", e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DreamshotError::Transport {
                message: format!("document store returned {status}"),
                source: None,
            });
        }

        response
            .json::<GenerationDocument>()
            .await
            .map(Some)
            .map_err(|e| DreamshotError::transport("invalid generation document", e))
    }
}

async fn poll_loop(poller: Poller, publisher: DocumentPublisher, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last: Option<GenerationDocument> = None;
    let mut failing = false;

    loop {
        tokio::select! {
            biased;
            _ = publisher.closed() => break,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            biased;
            _ = publisher.closed() => break,
            fetched = poller.fetch() => fetched,
        };

        let delivered = match fetched {
            Ok(Some(document)) => {
                failing = false;
                if last.as_ref() == Some(&document) {
                    true
                } else {
                    debug!(url = %poller.url, status = ?document.status, "document changed");
                    last = Some(document.clone());
                    publisher.publish(document)
                }
            }
            Ok(None) => {
                failing = false;
                debug!(url = %poller.url, "document not written yet");
                true
            }
            Err(e) if !failing => {
                warn!(url = %poller.url, error = %e, "document poll failed");
                failing = true;
                publisher.publish_error(e)
            }
            Err(e) => {
                debug!(url = %poller.url, error = %e, "document poll still failing");
                true
            }
        };

        if !delivered {
            break;
        }
    }

    debug!(url = %poller.url, "document polling stopped");
}
