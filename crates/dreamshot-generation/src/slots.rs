// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upload slots and drop payloads.

use dreamshot_content::InputMode;
use dreamshot_core::ImageFile;
use strum::Display;
use url::Url;

use crate::upload::preview_data_url;

/// Which upload slot an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    /// Whether a tool with `mode` shows this slot.
    pub fn is_used_by(self, mode: InputMode) -> bool {
        self.index() < mode.slot_count()
    }
}

/// What a slot currently holds.
///
/// Samples stay as URLs until generate time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SlotContent {
    #[default]
    Empty,
    File { file: ImageFile, preview: String },
    Sample { url: String },
}

impl SlotContent {
    pub fn file(file: ImageFile) -> Self {
        let preview = preview_data_url(&file);
        Self::File { file, preview }
    }

    pub fn sample(url: impl Into<String>) -> Self {
        Self::Sample { url: url.into() }
    }

    pub fn is_filled(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// URL the slot preview shows: a data URL for uploads, the sample URL
    /// itself for samples.
    pub fn preview(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::File { preview, .. } => Some(preview),
            Self::Sample { url } => Some(url),
        }
    }
}

/// Data carried by a drag-and-drop onto a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    Files(Vec<ImageFile>),
    Text(String),
}

/// A plain-text drop counts as a sample when it is an absolute http(s) URL.
pub fn sample_url_from_text(text: &str) -> Option<String> {
    let text = text.trim();
    let url = Url::parse(text).ok()?;
    let has_host = url.host_str().is_some_and(|h| !h.is_empty());
    (matches!(url.scheme(), "http" | "https") && has_host).then(|| text.to_string())
}

/// Dual tools need both slots filled, single tools only the first.
pub fn can_process(mode: InputMode, slots: &[SlotContent; 2]) -> bool {
    Slot::ALL
        .iter()
        .filter(|slot| slot.is_used_by(mode))
        .all(|slot| slots[slot.index()].is_filled())
}
