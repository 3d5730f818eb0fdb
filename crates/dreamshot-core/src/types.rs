// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the dialog coordinator, the generation workflow,
//! and the remote adapters.

use std::fmt;

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Opaque job identifier assigned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

/// Identifier of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Characters left as-is in a document path segment (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Path of the remote document holding a job's status.
///
/// Ids are percent-encoded so an id containing `/`, `?` or `#` cannot
/// address a different document.
pub fn generation_document_path(user: &UserId, job: &JobId) -> String {
    format!(
        "users/{}/generations/{}",
        utf8_percent_encode(&user.0, SEGMENT),
        utf8_percent_encode(&job.0, SEGMENT)
    )
}

/// Every modal dialog the front-end can stack.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum DialogId {
    #[strum(serialize = "login")]
    #[serde(rename = "login")]
    Login,
    #[strum(serialize = "register")]
    #[serde(rename = "register")]
    Register,
    #[strum(serialize = "forgotPassword")]
    #[serde(rename = "forgotPassword")]
    ForgotPassword,
    #[strum(serialize = "verifyEmail")]
    #[serde(rename = "verifyEmail")]
    VerifyEmail,
    #[strum(serialize = "logout")]
    #[serde(rename = "logout")]
    Logout,
    #[strum(serialize = "deleteAccount")]
    #[serde(rename = "deleteAccount")]
    DeleteAccount,
    #[strum(serialize = "clearData")]
    #[serde(rename = "clearData")]
    ClearData,
    #[strum(serialize = "addCredit")]
    #[serde(rename = "addCredit")]
    AddCredit,
    #[strum(serialize = "feedback")]
    #[serde(rename = "feedback")]
    Feedback,
    #[strum(serialize = "inspirationDialog")]
    #[serde(rename = "inspirationDialog")]
    Inspiration,
    #[strum(serialize = "resultFeedback")]
    #[serde(rename = "resultFeedback")]
    ResultFeedback,
    #[strum(serialize = "guidance-dialog")]
    #[serde(rename = "guidance-dialog")]
    Guidance,
    #[strum(serialize = "shareDialog")]
    #[serde(rename = "shareDialog")]
    Share,
    #[strum(serialize = "insufficientCredits")]
    #[serde(rename = "insufficientCredits")]
    InsufficientCredits,
}

/// Status of a generation job as reported by the remote store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

/// Kind of artifact a generation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// One artifact produced by a generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl GenerationResult {
    /// The URL a download button should point at.
    pub fn primary_url(&self) -> Option<&str> {
        match self.kind {
            MediaKind::Image => self.image.as_deref(),
            MediaKind::Video => self.video.as_deref().or(self.image.as_deref()),
        }
    }
}

/// Raw remote document at `users/{userId}/generations/{jobId}`.
///
/// `status` stays a string so an unrecognised value is treated like a
/// missing one instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationDocument {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<Vec<GenerationResult>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GenerationDocument {
    /// Parsed status, `None` when absent or unrecognised.
    pub fn job_status(&self) -> Option<JobStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    /// Results, only when the list is present and non-empty.
    pub fn non_empty_result(&self) -> Option<&[GenerationResult]> {
        self.result.as_deref().filter(|r| !r.is_empty())
    }
}

/// An image held in memory, either uploaded or materialized from a sample URL.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Identifies a tool by its content coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolRef {
    pub category: String,
    pub slug: String,
}

/// Body of a start-generation request.
#[derive(Debug, Clone)]
pub struct StartGenerationRequest {
    pub tool: ToolRef,
    pub user_id: UserId,
    /// One image for single-input tools, two for dual-input tools.
    pub images: Vec<ImageFile>,
}

/// Successful start-generation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGenerationResponse {
    pub job_id: JobId,
    pub status: String,
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A transient user-facing message (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}
