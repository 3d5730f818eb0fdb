// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation workflow for the Dreamshot client.
//!
//! - [`upload`]: MIME/size validation and previews
//! - [`slots`]: upload slots, drop payloads, and `can_process`
//! - [`watcher`]: push subscription on the job document with a failure
//!   grace period
//! - [`workflow`]: the state machine tying them to the generation API

pub mod slots;
pub mod upload;
pub mod watcher;
pub mod workflow;

pub use slots::{DropPayload, Slot, SlotContent};
pub use upload::{UploadError, UploadPolicy};
pub use watcher::{StatusWatcher, WatchedJob};
pub use workflow::{GenerationWorkflow, Phase, WorkflowDeps, WorkflowView};
