// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Dreamshot client.

use thiserror::Error;

/// Fallback shown to the user when a transport error carries no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// The primary error type used across Dreamshot adapter traits and core operations.
#[derive(Debug, Error)]
pub enum DreamshotError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Local input validation failed. Never sent to a remote system.
    #[error("{0}")]
    Validation(String),

    /// A network call failed (start-generation, proxy fetch, store subscription).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The remote generation pipeline reported a terminal failure.
    #[error("generation failed: {0}")]
    Remote(String),

    /// Requested content (tool config, document) does not exist.
    #[error("{kind} not found: {key}")]
    NotFound { kind: String, key: String },

    /// The user does not have enough credits for the requested tool.
    #[error("insufficient credits: {required} required, {available} available")]
    InsufficientCredits { required: u32, available: u32 },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DreamshotError {
    /// Shorthand for a transport error that wraps an underlying source.
    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Text suitable for a toast.
    ///
    /// Validation and remote failures are already phrased for users; transport
    /// and internal errors collapse to a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Remote(message) => message.clone(),
            Self::Transport { message, .. } if !message.is_empty() => message.clone(),
            Self::NotFound { kind, .. } => format!("{kind} not found"),
            Self::InsufficientCredits { .. } => {
                "You don't have enough credits for this effect.".to_string()
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
