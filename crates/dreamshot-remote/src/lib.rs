// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP adapters for the Dreamshot client.
//!
//! - [`HttpGenerationApi`]: multipart start-generation calls
//! - [`PollingDocumentStore`]: [`DocumentStore`](dreamshot_core::DocumentStore)
//!   backed by interval polling
//! - [`ProxySampleSource`]: sample images, via the same-origin proxy when
//!   external

pub mod generation;
pub mod sample;
pub mod store;
pub mod types;

pub use generation::HttpGenerationApi;
pub use sample::ProxySampleSource;
pub use store::PollingDocumentStore;
