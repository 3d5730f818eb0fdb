// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote generation-status watcher.
//!
//! [`StatusWatcher`] subscribes to `users/{userId}/generations/{jobId}` and
//! publishes the job's status, results, and error through a `watch` channel.
//!
//! A `failed` push is not published right away. The remote pipeline can emit
//! a transient `failed` before recovering to `completed`, so a failure only
//! surfaces once it has stood for the grace period without a newer update.
//! A completed result is final: the watcher unsubscribes once it is
//! published, so a polling store stops polling.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dreamshot_config::model::WatcherConfig;
use dreamshot_core::types::generation_document_path;
use dreamshot_core::{
    DocumentStore, DocumentSubscription, GenerationDocument, GenerationResult, JobId, JobStatus,
    UserId,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Published when the store subscription itself fails.
pub const WATCH_FAILURE_MESSAGE: &str = "Failed to watch generation status";

/// Published when a job fails without a remote error message.
pub const GENERATION_FAILED_MESSAGE: &str = "Generation failed. Please try again.";

/// What the UI sees of the watched job. All fields are `None` while nothing
/// is being watched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchedJob {
    pub status: Option<JobStatus>,
    pub result: Option<Vec<GenerationResult>>,
    pub error: Option<String>,
}

impl WatchedJob {
    pub fn is_completed(&self) -> bool {
        self.status == Some(JobStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        self.status == Some(JobStatus::Failed)
    }
}

/// Cancellable one-shot timer that confirms a `failed` status.
///
/// Arming an armed timer restarts it.
#[derive(Debug)]
struct FailureTimer {
    grace: Duration,
    deadline: Option<Instant>,
    message: Option<String>,
}

impl FailureTimer {
    fn new(grace: Duration) -> Self {
        Self {
            grace,
            deadline: None,
            message: None,
        }
    }

    fn arm(&mut self, message: Option<String>) {
        self.deadline = Some(Instant::now() + self.grace);
        self.message = message;
    }

    fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            debug!("failure timer cancelled");
        }
        self.message = None;
    }

    fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }

    /// Disarm and return the error to publish.
    fn fire(&mut self) -> String {
        self.deadline = None;
        self.message
            .take()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERATION_FAILED_MESSAGE.to_string())
    }
}

/// Writes into the shared state, but only while its key is still current.
///
/// Each re-key bumps `epoch`; a task from an older key finds a mismatch
/// under the channel lock and leaves the state alone.
#[derive(Clone)]
struct StatePublisher {
    tx: Arc<watch::Sender<WatchedJob>>,
    epoch: Arc<AtomicU64>,
    mine: u64,
}

impl StatePublisher {
    fn publish(&self, update: impl FnOnce(&mut WatchedJob)) {
        self.tx.send_if_modified(|state| {
            if self.epoch.load(Ordering::SeqCst) != self.mine {
                return false;
            }
            let before = state.clone();
            update(state);
            *state != before
        });
    }
}

/// Watches one generation document at a time.
///
/// Dropping the watcher cancels the subscription and any pending failure
/// timer.
pub struct StatusWatcher {
    store: Arc<dyn DocumentStore>,
    grace: Duration,
    tx: Arc<watch::Sender<WatchedJob>>,
    epoch: Arc<AtomicU64>,
    key: Option<(UserId, JobId)>,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for StatusWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusWatcher")
            .field("store", &self.store.name())
            .field("grace", &self.grace)
            .field("key", &self.key)
            .field("state", &*self.tx.borrow())
            .finish()
    }
}

impl StatusWatcher {
    pub fn new(store: Arc<dyn DocumentStore>, grace: Duration) -> Self {
        let (tx, _) = watch::channel(WatchedJob::default());
        Self {
            store,
            grace,
            tx: Arc::new(tx),
            epoch: Arc::new(AtomicU64::new(0)),
            key: None,
            cancel: None,
            task: None,
        }
    }

    pub fn from_config(store: Arc<dyn DocumentStore>, config: &WatcherConfig) -> Self {
        Self::new(store, Duration::from_millis(config.failure_grace_ms))
    }

    /// Point the watcher at a job.
    ///
    /// Tears down the current subscription and resets the published state.
    /// With either id absent nothing is subscribed. Calling it again with
    /// the current key does nothing.
    pub fn watch(&mut self, user: Option<UserId>, job: Option<JobId>) {
        let key = user.zip(job);
        if key == self.key && (key.is_none() || self.task.is_some()) {
            return;
        }

        self.teardown();
        self.key = key.clone();

        let Some((user, job)) = key else {
            return;
        };

        let path = generation_document_path(&user, &job);
        let publisher = StatePublisher {
            tx: self.tx.clone(),
            epoch: self.epoch.clone(),
            mine: self.epoch.load(Ordering::SeqCst),
        };

        let subscription = match self.store.subscribe(&path) {
            Ok(subscription) => subscription,
            Err(e) => {
                warn!(path = %path, error = %e, "failed to subscribe to generation document");
                publisher.publish(|s| s.error = Some(WATCH_FAILURE_MESSAGE.to_string()));
                return;
            }
        };

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(path = %path, "no async runtime, cannot watch generation document");
                publisher.publish(|s| s.error = Some(WATCH_FAILURE_MESSAGE.to_string()));
                return;
            }
        };

        info!(path = %path, "watching generation status");
        let cancel = CancellationToken::new();
        self.task = Some(handle.spawn(run(
            subscription,
            publisher,
            cancel.clone(),
            self.grace,
        )));
        self.cancel = Some(cancel);
    }

    /// Stop watching and reset the published state.
    pub fn clear(&mut self) {
        self.watch(None, None);
    }

    /// Current published state.
    pub fn state(&self) -> WatchedJob {
        self.tx.borrow().clone()
    }

    pub fn key(&self) -> Option<&(UserId, JobId)> {
        self.key.as_ref()
    }

    pub fn is_watching(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Receiver that wakes on every published change, across re-keys.
    pub fn subscribe(&self) -> watch::Receiver<WatchedJob> {
        self.tx.subscribe()
    }

    fn teardown(&mut self) {
        // Invalidate the old key first so an in-flight publish is discarded.
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.tx.send_if_modified(|state| {
            let changed = *state != WatchedJob::default();
            *state = WatchedJob::default();
            changed
        });
        self.key = None;
    }
}

impl Drop for StatusWatcher {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn run(
    mut subscription: DocumentSubscription,
    publisher: StatePublisher,
    cancel: CancellationToken,
    grace: Duration,
) {
    let path = subscription.path().to_string();
    let mut timer = FailureTimer::new(grace);
    let mut open = true;

    loop {
        if !open && !timer.is_armed() {
            break;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(path = %path, "status watcher cancelled");
                break;
            }
            () = timer.expired(), if timer.is_armed() => {
                let message = timer.fire();
                warn!(path = %path, error = %message, "generation failed");
                publisher.publish(|s| {
                    s.status = Some(JobStatus::Failed);
                    s.result = None;
                    s.error = Some(message);
                });
            }
            update = subscription.next(), if open => match update {
                Some(Ok(document)) => {
                    if apply_document(&document, &publisher, &mut timer) {
                        debug!(path = %path, "generation settled, unsubscribing");
                        break;
                    }
                }
                Some(Err(e)) => {
                    warn!(path = %path, error = %e, "generation status subscription error");
                    publisher.publish(|s| s.error = Some(WATCH_FAILURE_MESSAGE.to_string()));
                }
                None => {
                    debug!(path = %path, "generation status subscription closed by store");
                    open = false;
                }
            },
        }
    }
}

/// Fold one document into the published state.
///
/// Returns `true` once a completed result has been published; nothing after
/// that can change what the user sees, so the caller stops listening.
fn apply_document(
    document: &GenerationDocument,
    publisher: &StatePublisher,
    timer: &mut FailureTimer,
) -> bool {
    let status = document.job_status();

    if status == Some(JobStatus::Completed)
        && let Some(results) = document.non_empty_result()
    {
        timer.cancel();
        info!(results = results.len(), "generation completed");
        publisher.publish(|s| {
            s.status = Some(JobStatus::Completed);
            s.result = Some(results.to_vec());
            s.error = None;
        });
        true
    } else if status == Some(JobStatus::Failed) {
        debug!(error = ?document.error, "failed status received, waiting for grace period");
        timer.arm(document.error.clone());
        false
    } else {
        timer.cancel();
        publisher.publish(|s| {
            s.status = Some(JobStatus::Pending);
            s.result = None;
            s.error = None;
        });
        false
    }
}
