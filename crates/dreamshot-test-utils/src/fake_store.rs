// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory document store for deterministic watcher tests.
//!
//! `FakeDocumentStore` hands out real [`DocumentSubscription`]s and keeps the
//! matching publishers, so a test can push snapshots or transport errors to
//! every live subscriber of a path and check that unsubscribes happened.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};


use dreamshot_core::traits::adapter::PluginAdapter;
use dreamshot_core::traits::store::{DocumentPublisher, DocumentStore, DocumentSubscription};
use dreamshot_core::types::GenerationDocument;
use dreamshot_core::DreamshotError;

#[derive(Default)]
struct Inner {
    publishers: HashMap<String, Vec<DocumentPublisher>>,
    subscribed: Vec<String>,
    fail_next: Option<String>,
}

/// A fake push store.
#[derive(Clone, Default)]
pub struct FakeDocumentStore {
    inner: Arc<Mutex<Inner>>,
}

impl FakeDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push a snapshot to every live subscriber of `path`.
    ///
    /// Returns the number of subscribers that received it.
    pub fn push(&self, path: &str, document: GenerationDocument) -> usize {
        self.live(path)
            .iter()
            .filter(|p| p.publish(document.clone()))
            .count()
    }

    /// Shorthand for pushing a document with only `status` set.
    pub fn push_status(&self, path: &str, status: &str) -> usize {
        self.push(
            path,
            GenerationDocument {
                status: Some(status.to_string()),
                ..Default::default()
            },
        )
    }

    /// Push a transport error to every live subscriber of `path`.
    pub fn push_error(&self, path: &str, message: &str) -> usize {
        self.live(path)
            .iter()
            .filter(|p| {
                p.publish_error(DreamshotError::Transport {
                    message: message.to_string(),
                    source: None,
                })
            })
            .count()
    }

    /// Make the next `subscribe` call fail with `message`.
    pub fn fail_next_subscribe(&self, message: &str) {
        self.lock().fail_next = Some(message.to_string());
    }

    /// Number of subscriptions on `path` that have not been dropped.
    pub fn active_subscriptions(&self, path: &str) -> usize {
        self.live(path).len()
    }

    /// Whether any subscription on any path is still live.
    pub fn has_active_subscriptions(&self) -> bool {
        self.lock()
            .publishers
            .values()
            .flatten()
            .any(|p| !p.is_closed())
    }

    /// Every path passed to `subscribe`, in call order.
    pub fn subscribed_paths(&self) -> Vec<String> {
        self.lock().subscribed.clone()
    }

    fn live(&self, path: &str) -> Vec<DocumentPublisher> {
        let mut inner = self.lock();
        let Some(publishers) = inner.publishers.get_mut(path) else {
            return Vec::new();
        };
        publishers.retain(|p| !p.is_closed());
        publishers.clone()
    }
}

impl PluginAdapter for FakeDocumentStore {
    fn name(&self) -> &str {
        "fake-document-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }
}

impl DocumentStore for FakeDocumentStore {
    fn subscribe(&self, path: &str) -> Result<DocumentSubscription, DreamshotError> {
        let mut inner = self.lock();
        inner.subscribed.push(path.to_string());
        if let Some(message) = inner.fail_next.take() {
            return Err(DreamshotError::Transport {
                message,
                source: None,
            });
        }

        let (publisher, subscription) = DocumentSubscription::channel(path);
        inner
            .publishers
            .entry(path.to_string())
            .or_default()
            .push(publisher);
        Ok(subscription)
    }
}
