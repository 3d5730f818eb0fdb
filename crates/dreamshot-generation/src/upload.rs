// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side upload validation and previews.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dreamshot_config::model::UploadConfig;
use dreamshot_core::{DreamshotError, ImageFile};
use thiserror::Error;
use tracing::debug;

const MIB: u64 = 1024 * 1024;

/// Why a file was rejected. The messages are shown to the user as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Unsupported file type: {mime_type}. Please upload a JPG, PNG or WebP image")]
    UnsupportedType { mime_type: String },

    #[error("File size must be less than {}MB", format_mib(.limit))]
    TooLarge { size: u64, limit: u64 },

    #[error("The selected file is empty")]
    Empty,
}

impl From<UploadError> for DreamshotError {
    fn from(e: UploadError) -> Self {
        DreamshotError::Validation(e.to_string())
    }
}

fn format_mib(bytes: &u64) -> String {
    let bytes = *bytes;
    if bytes % MIB == 0 {
        (bytes / MIB).to_string()
    } else {
        format!("{:.1}", bytes as f64 / MIB as f64)
    }
}

/// MIME whitelist plus byte ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    max_file_bytes: u64,
    allowed_mime_types: Vec<String>,
}

impl UploadPolicy {
    pub fn new(max_file_bytes: u64, allowed_mime_types: Vec<String>) -> Self {
        Self {
            max_file_bytes,
            allowed_mime_types: allowed_mime_types
                .into_iter()
                .map(|m| m.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.max_file_bytes, config.allowed_mime_types.clone())
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Type is checked before size.
    pub fn validate(&self, file: &ImageFile) -> Result<(), UploadError> {
        self.validate_parts(&file.mime_type, file.size())
    }

    /// Validate by declared MIME type and size, without the bytes in hand.
    pub fn validate_parts(&self, mime_type: &str, size: u64) -> Result<(), UploadError> {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !self.allowed_mime_types.contains(&essence) {
            return Err(UploadError::UnsupportedType {
                mime_type: mime_type.to_string(),
            });
        }
        if size == 0 {
            return Err(UploadError::Empty);
        }
        if size > self.max_file_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: self.max_file_bytes,
            });
        }
        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

/// `data:` URL for showing an uploaded file before it is sent anywhere.
pub fn preview_data_url(file: &ImageFile) -> String {
    format!("data:{};base64,{}", file.mime_type, STANDARD.encode(&file.bytes))
}

/// Read a local image, guessing its MIME type from the extension.
pub async fn read_image(path: &Path) -> Result<ImageFile, DreamshotError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        DreamshotError::transport(format!("failed to read {}", path.display()), e)
    })?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    debug!(name = %name, mime_type = %mime_type, size = bytes.len(), "image read from disk");
    Ok(ImageFile::new(name, mime_type, bytes))
}
