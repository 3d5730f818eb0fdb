// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool content for the Dreamshot client.
//!
//! Each effect page is described by a JSON file keyed by category and slug,
//! optionally overridden per locale. [`ToolCatalog`] resolves those files;
//! [`ToolConfig`] is the parsed, immutable descriptor.

pub mod catalog;
pub mod model;

pub use catalog::ToolCatalog;
pub use model::{InputMode, LoadedTool, ToolConfig};
