// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Dreamshot client.
//!
//! This crate provides the error type, the shared domain types (dialogs,
//! generation jobs, images), and the adapter traits the dialog coordinator,
//! the generation workflow, and the remote adapters are written against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DreamshotError;
pub use types::{
    DialogId, GenerationDocument, GenerationResult, ImageFile, JobId, JobStatus, MediaKind,
    Notification, NotificationLevel, StartGenerationRequest, StartGenerationResponse, ToolRef,
    UserId,
};

pub use traits::{
    CacheReset, DocumentPublisher, DocumentStore, DocumentSubscription, DocumentUpdate,
    GenerationApi, Notifier, PluginAdapter, SampleSource,
};
