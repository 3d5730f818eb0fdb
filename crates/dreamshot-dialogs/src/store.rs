// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared dialog store.
//!
//! [`DialogStore`] is the single owner of the session's [`DialogStack`].
//! Views hold a clone of the store (cheap, `Arc` inside) and either read a
//! snapshot or subscribe to changes; `add` and `remove` are the only mutators.

use std::sync::Arc;
use std::time::Duration;

use dreamshot_config::model::DialogConfig;
use dreamshot_core::{CacheReset, DialogId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::stack::DialogStack;

/// What happened to an `add` request.
#[derive(Debug)]
pub enum AddOutcome {
    /// The stack was updated before `add` returned.
    Applied,
    /// The add runs after the configured delay. Awaiting the handle waits
    /// for it; dropping the handle does not cancel it.
    Deferred(JoinHandle<()>),
}

#[derive(Clone)]
pub struct DialogStore {
    state: Arc<watch::Sender<DialogStack>>,
    cache_reset: Arc<dyn CacheReset>,
    add_credit_defer: Duration,
}

impl std::fmt::Debug for DialogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogStore")
            .field("stack", &*self.state.borrow())
            .field("add_credit_defer", &self.add_credit_defer)
            .finish()
    }
}

impl DialogStore {
    pub fn new(config: &DialogConfig, cache_reset: Arc<dyn CacheReset>) -> Self {
        let (state, _) = watch::channel(DialogStack::new());
        Self {
            state: Arc::new(state),
            cache_reset,
            add_credit_defer: Duration::from_millis(config.add_credit_defer_ms),
        }
    }

    /// Open `id` on top of the stack, closing any dialogs in `exclusions`.
    ///
    /// Opening `addCredit` over a stack of two or more dialogs resets the
    /// credit cache first and applies the add after a short delay, so the
    /// credit dialog reads fresh data.
    pub fn add(&self, id: DialogId, exclusions: &[DialogId]) -> AddOutcome {
        if id == DialogId::AddCredit && self.state.borrow().len() > 1 {
            self.cache_reset.reset();

            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    debug!(
                        delay_ms = self.add_credit_defer.as_millis() as u64,
                        "deferring addCredit until cache reset settles"
                    );
                    let store = self.clone();
                    let exclusions = exclusions.to_vec();
                    let delay = self.add_credit_defer;
                    return AddOutcome::Deferred(handle.spawn(async move {
                        tokio::time::sleep(delay).await;
                        store.apply_add(id, &exclusions);
                    }));
                }
                Err(_) => warn!("no async runtime, applying addCredit immediately"),
            }
        }

        self.apply_add(id, exclusions);
        AddOutcome::Applied
    }

    /// Shorthand for `add(id, &[])`.
    pub fn open(&self, id: DialogId) -> AddOutcome {
        self.add(id, &[])
    }

    /// Close `id` and every dialog in `exclusions`.
    pub fn remove(&self, id: DialogId, exclusions: &[DialogId]) {
        let changed = self.state.send_if_modified(|stack| stack.remove(id, exclusions));
        if changed {
            debug!(dialog = %id, "dialog closed");
        }
    }

    /// Shorthand for `remove(id, &[])`.
    pub fn close(&self, id: DialogId) {
        self.remove(id, &[]);
    }

    /// Close-button handling: closes whichever dialog is on top.
    pub fn close_active(&self) -> Option<DialogId> {
        let active = self.state.borrow().active()?;
        self.close(active);
        Some(active)
    }

    /// Close every dialog, e.g. after sign-out.
    pub fn clear(&self) {
        self.state.send_if_modified(DialogStack::clear);
    }

    pub fn snapshot(&self) -> DialogStack {
        self.state.borrow().clone()
    }

    pub fn is_open(&self, id: DialogId) -> bool {
        self.state.borrow().contains(id)
    }

    pub fn active(&self) -> Option<DialogId> {
        self.state.borrow().active()
    }

    pub fn backdrop_owner(&self) -> Option<DialogId> {
        self.state.borrow().backdrop_owner()
    }

    /// Receiver that wakes whenever the stack changes.
    pub fn subscribe(&self) -> watch::Receiver<DialogStack> {
        self.state.subscribe()
    }

    fn apply_add(&self, id: DialogId, exclusions: &[DialogId]) {
        let changed = self.state.send_if_modified(|stack| stack.add(id, exclusions));
        if changed {
            debug!(dialog = %id, "dialog opened");
        }
    }
}
