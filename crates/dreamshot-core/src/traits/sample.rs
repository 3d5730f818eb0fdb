// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample-image source trait.

use async_trait::async_trait;

use crate::error::DreamshotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ImageFile;

/// Turns a sample-image URL into an in-memory file.
///
/// Called lazily at generate time, never when the sample is merely picked.
#[async_trait]
pub trait SampleSource: PluginAdapter {
    async fn fetch(&self, url: &str) -> Result<ImageFile, DreamshotError>;
}
