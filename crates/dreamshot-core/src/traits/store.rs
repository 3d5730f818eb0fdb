// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Real-time document store trait and the subscription handle it returns.
//!
//! A subscription is a pair: the adapter keeps a [`DocumentPublisher`] and
//! pushes snapshots into it, the consumer holds the [`DocumentSubscription`].
//! Dropping the subscription unsubscribes; the publisher observes this via
//! [`DocumentPublisher::closed`].

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::DreamshotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::GenerationDocument;

/// One push from the store: a fresh snapshot or a transport-level failure.
pub type DocumentUpdate = Result<GenerationDocument, DreamshotError>;

/// Adapter for a store that pushes document snapshots.
pub trait DocumentStore: PluginAdapter {
    /// Starts listening on `path`. Dropping the returned handle unsubscribes.
    fn subscribe(&self, path: &str) -> Result<DocumentSubscription, DreamshotError>;
}

/// Consumer side of a document subscription.
#[derive(Debug)]
pub struct DocumentSubscription {
    path: String,
    updates: mpsc::UnboundedReceiver<DocumentUpdate>,
    cancel: CancellationToken,
}

/// Adapter side of a document subscription.
#[derive(Debug, Clone)]
pub struct DocumentPublisher {
    path: String,
    tx: mpsc::UnboundedSender<DocumentUpdate>,
    cancel: CancellationToken,
}

impl DocumentSubscription {
    /// Creates a linked publisher/subscription pair for `path`.
    pub fn channel(path: impl Into<String>) -> (DocumentPublisher, DocumentSubscription) {
        let path = path.into();
        let (tx, updates) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        (
            DocumentPublisher {
                path: path.clone(),
                tx,
                cancel: cancel.clone(),
            },
            DocumentSubscription {
                path,
                updates,
                cancel,
            },
        )
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Waits for the next push. `None` once the publisher side is gone.
    pub async fn next(&mut self) -> Option<DocumentUpdate> {
        self.updates.recv().await
    }

    /// Explicit unsubscribe; equivalent to dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for DocumentSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl DocumentPublisher {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Pushes a snapshot. Returns `false` if the consumer has unsubscribed.
    pub fn publish(&self, document: GenerationDocument) -> bool {
        !self.cancel.is_cancelled() && self.tx.send(Ok(document)).is_ok()
    }

    /// Pushes a transport failure. The subscription stays open.
    pub fn publish_error(&self, error: DreamshotError) -> bool {
        !self.cancel.is_cancelled() && self.tx.send(Err(error)).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    /// Resolves once the consumer unsubscribes.
    pub async fn closed(&self) {
        self.cancel.cancelled().await;
    }
}
