// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Dreamshot integration tests.
//!
//! Provides fake adapters and recording hooks for fast, deterministic,
//! CI-runnable tests without a remote API or document store.
//!
//! # Components
//!
//! - [`FakeDocumentStore`] - In-memory document store with manual push
//! - [`MockGenerationApi`] - Start-generation API with queued responses
//! - [`MockSampleSource`] - Sample fetcher backed by a URL map
//! - [`RecordingNotifier`] / [`RecordingCacheReset`] - Capture UI hook calls

pub mod fake_store;
pub mod mock_api;
pub mod mock_sample;
pub mod recording;

pub use fake_store::FakeDocumentStore;
pub use mock_api::MockGenerationApi;
pub use mock_sample::MockSampleSource;
pub use recording::{RecordingCacheReset, RecordingNotifier};
