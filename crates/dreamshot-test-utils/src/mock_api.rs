// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock start-generation API for deterministic testing.
//!
//! `MockGenerationApi` implements `GenerationApi` with pre-configured
//! responses and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dreamshot_core::traits::adapter::PluginAdapter;
use dreamshot_core::traits::generation::GenerationApi;
use dreamshot_core::types::{JobId, StartGenerationRequest, StartGenerationResponse};
use dreamshot_core::DreamshotError;

type Response = Result<StartGenerationResponse, DreamshotError>;

/// A mock generation API.
///
/// Responses are popped from a FIFO queue. When the queue is empty a pending
/// job with a random id is returned.
#[derive(Clone, Default)]
pub struct MockGenerationApi {
    responses: Arc<Mutex<VecDeque<Response>>>,
    requests: Arc<Mutex<Vec<StartGenerationRequest>>>,
}

impl MockGenerationApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that accepts the first request as `job_id`.
    pub fn with_job(job_id: &str) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from([Ok(pending(job_id))]))),
            requests: Arc::default(),
        }
    }

    /// Queue an accepted job.
    pub async fn push_job(&self, job_id: &str) {
        self.responses.lock().await.push_back(Ok(pending(job_id)));
    }

    /// Queue a failed start call.
    pub async fn push_error(&self, message: &str) {
        self.responses
            .lock()
            .await
            .push_back(Err(DreamshotError::Transport {
                message: message.to_string(),
                source: None,
            }));
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<StartGenerationRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

fn pending(job_id: &str) -> StartGenerationResponse {
    StartGenerationResponse {
        job_id: JobId(job_id.to_string()),
        status: "pending".to_string(),
    }
}

impl PluginAdapter for MockGenerationApi {
    fn name(&self) -> &str {
        "mock-generation-api"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }
}

#[async_trait]
impl GenerationApi for MockGenerationApi {
    async fn start_generation(
        &self,
        request: StartGenerationRequest,
    ) -> Result<StartGenerationResponse, DreamshotError> {
        self.requests.lock().await.push(request);
        match self.responses.lock().await.pop_front() {
            Some(response) => response,
            None => Ok(pending(&format!("mock-job-{}", uuid::Uuid::new_v4()))),
        }
    }
}
