// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the collaborators the client core talks to.
//!
//! Remote adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod generation;
pub mod notify;
pub mod sample;
pub mod store;

pub use adapter::PluginAdapter;
pub use generation::GenerationApi;
pub use notify::{CacheReset, Notifier};
pub use sample::SampleSource;
pub use store::{DocumentPublisher, DocumentStore, DocumentSubscription, DocumentUpdate};
