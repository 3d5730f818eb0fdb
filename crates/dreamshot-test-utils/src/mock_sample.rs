// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock sample-image source.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use dreamshot_core::traits::adapter::PluginAdapter;
use dreamshot_core::traits::sample::SampleSource;
use dreamshot_core::types::ImageFile;
use dreamshot_core::DreamshotError;

/// Serves images from a URL map; unknown URLs fail with a transport error.
#[derive(Clone, Default)]
pub struct MockSampleSource {
    images: Arc<Mutex<HashMap<String, ImageFile>>>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockSampleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, url: &str, file: ImageFile) {
        self.images.lock().await.insert(url.to_string(), file);
    }

    /// A small PNG-typed file registered under `url`.
    pub async fn insert_png(&self, url: &str) {
        let name = url.rsplit('/').next().unwrap_or("sample.png");
        self.insert(url, ImageFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G']))
            .await;
    }

    /// URLs requested so far, in order.
    pub async fn fetched(&self) -> Vec<String> {
        self.fetched.lock().await.clone()
    }
}

impl PluginAdapter for MockSampleSource {
    fn name(&self) -> &str {
        "mock-sample-source"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }
}

#[async_trait]
impl SampleSource for MockSampleSource {
    async fn fetch(&self, url: &str) -> Result<ImageFile, DreamshotError> {
        self.fetched.lock().await.push(url.to_string());
        self.images
            .lock()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| DreamshotError::Transport {
                message: format!("no mock image for {url}"),
                source: None,
            })
    }
}
