// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the start-generation endpoint.
//!
//! Sends the images as `multipart/form-data` together with the tool
//! coordinates and the user id. The call is not retried: a timed-out request
//! may still have created a job, and a retry would create a second one.

use std::time::Duration;

use async_trait::async_trait;
use dreamshot_config::model::ApiConfig;
use dreamshot_core::{
    DreamshotError, GenerationApi, PluginAdapter, StartGenerationRequest, StartGenerationResponse,
};
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};

use crate::types::{ApiErrorBody, join_url};

/// Shown when the service gives no usable reason.
pub const START_FAILED_MESSAGE: &str = "Failed to start generation. Please try again.";

#[derive(Debug, Clone)]
pub struct HttpGenerationApi {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpGenerationApi {
    pub fn new(config: &ApiConfig) -> Result<Self, DreamshotError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DreamshotError::transport("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            endpoint: join_url(&config.base_url, &config.generate_path),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(request: &StartGenerationRequest) -> Result<Form, DreamshotError> {
        let mut form = Form::new()
            .text("category", request.tool.category.clone())
            .text("slug", request.tool.slug.clone())
            .text("userId", request.user_id.0.clone());

        let dual = request.images.len() > 1;
        for (i, image) in request.images.iter().enumerate() {
            let field = if dual {
                format!("image{}", i + 1)
            } else {
                "image".to_string()
            };
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.name.clone())
                .mime_str(&image.mime_type)
                .map_err(|e| {
                    DreamshotError::Validation(format!(
                        "invalid MIME type '{}': {e}",
                        image.mime_type
                    ))
                })?;
            form = form.part(field, part);
        }
        Ok(form)
    }
}

impl PluginAdapter for HttpGenerationApi {
    fn name(&self) -> &str {
        "http-generation-api"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }
}

#[async_trait]
impl GenerationApi for HttpGenerationApi {
    async fn start_generation(
        &self,
        request: StartGenerationRequest,
    ) -> Result<StartGenerationResponse, DreamshotError> {
        if request.images.is_empty() || request.images.len() > 2 {
            return Err(DreamshotError::Validation(format!(
                "expected one or two images, got {}",
                request.images.len()
            )));
        }

        let form = Self::build_form(&request)?;
        let mut builder = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        debug!(
            endpoint = %self.endpoint,
            category = %request.tool.category,
            slug = %request.tool.slug,
            images = request.images.len(),
            "sending start-generation request"
        );

        let response = builder
            .send()
            .await
            .map_err(|e| DreamshotError::transport(START_FAILED_MESSAGE, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DreamshotError::transport(START_FAILED_MESSAGE, e))?;

        if !status.is_success() {
            warn!(status = %status, body = %body, "start-generation rejected");
            let message =
                ApiErrorBody::message_from(&body).unwrap_or_else(|| START_FAILED_MESSAGE.into());
            return Err(DreamshotError::Transport {
                message,
                source: None,
            });
        }

        let parsed: StartGenerationResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %body, "unexpected start-generation response");
            DreamshotError::transport(START_FAILED_MESSAGE, e)
        })?;

        info!(job_id = %parsed.job_id, status = %parsed.status, "generation job accepted");
        Ok(parsed)
    }
}
