// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Start-generation API trait.

use async_trait::async_trait;

use crate::error::DreamshotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{StartGenerationRequest, StartGenerationResponse};

/// Adapter for the remote generation service.
///
/// The client is write-only with respect to job creation: it submits images
/// and receives a job id. Job state is only ever read through a
/// [`DocumentStore`](crate::traits::DocumentStore).
#[async_trait]
pub trait GenerationApi: PluginAdapter {
    /// Submits one or two images and returns the accepted job.
    async fn start_generation(
        &self,
        request: StartGenerationRequest,
    ) -> Result<StartGenerationResponse, DreamshotError>;
}
