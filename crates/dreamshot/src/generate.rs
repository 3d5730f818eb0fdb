// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dreamshot generate`: run one tool against the configured remote API.
//!
//! Inputs are assigned to slots in order: local files first, then sample
//! URLs. Status changes are printed until the job completes or fails.

use std::path::PathBuf;
use std::sync::Arc;

use dreamshot_config::model::DreamshotConfig;
use dreamshot_content::ToolCatalog;
use dreamshot_core::traits::notify::TracingNotifier;
use dreamshot_core::{DreamshotError, PluginAdapter, UserId};
use dreamshot_generation::{GenerationWorkflow, Phase, Slot, WorkflowDeps};
use dreamshot_remote::{HttpGenerationApi, PollingDocumentStore, ProxySampleSource};
use tracing::info;

use crate::shutdown::install_signal_handler;

#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub category: String,
    pub slug: String,
    pub user: String,
    pub locale: Option<String>,
    pub images: Vec<PathBuf>,
    pub samples: Vec<String>,
    pub credits: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
enum Input {
    Path(PathBuf),
    Sample(String),
}

/// Pair inputs with slots. More inputs than slots is an error rather than a
/// silent truncation.
fn assign_inputs(images: Vec<PathBuf>, samples: Vec<String>) -> Result<Vec<(Slot, Input)>, DreamshotError> {
    let inputs: Vec<Input> = images
        .into_iter()
        .map(Input::Path)
        .chain(samples.into_iter().map(Input::Sample))
        .collect();
    if inputs.len() > Slot::ALL.len() {
        return Err(DreamshotError::Validation(format!(
            "at most {} images can be supplied, got {}",
            Slot::ALL.len(),
            inputs.len()
        )));
    }
    Ok(Slot::ALL.into_iter().zip(inputs).collect())
}

/// One `backend: name vX.Y.Z` line per adapter.
fn describe_adapters(adapters: &[&dyn PluginAdapter]) -> Vec<String> {
    adapters
        .iter()
        .map(|adapter| format!("backend: {} v{}", adapter.name(), adapter.version()))
        .collect()
}

pub async fn run_generate(config: &DreamshotConfig, args: GenerateArgs) -> Result<(), DreamshotError> {
    let catalog = ToolCatalog::from_config(&config.content);
    let locale = args.locale.as_deref().or(config.app.default_locale.as_deref());
    let tool = catalog.load(&args.category, &args.slug, locale)?;
    info!(tool = %tool.config.id, mode = %tool.config.input_mode, "tool loaded");

    let api = Arc::new(HttpGenerationApi::new(&config.api)?);
    let samples = Arc::new(ProxySampleSource::new(&config.app, &config.proxy)?);
    let store = Arc::new(PollingDocumentStore::new(&config.watcher, &config.api)?);
    let backends: [&dyn PluginAdapter; 3] = [&*api, &*samples, &*store];
    for line in describe_adapters(&backends) {
        println!("{line}");
    }

    let deps = WorkflowDeps {
        api,
        samples,
        store,
        notifier: Arc::new(TracingNotifier),
    };
    let mut workflow = GenerationWorkflow::from_config(tool, config, deps);

    for (slot, input) in assign_inputs(args.images, args.samples)? {
        match input {
            Input::Path(path) => workflow.select_path(slot, &path).await?,
            Input::Sample(url) => workflow.select_sample(slot, url)?,
        }
    }

    let job_id = workflow.generate(&UserId(args.user), args.credits).await?;
    println!("job {job_id} started");

    let cancel = install_signal_handler();
    let settled = loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                println!("interrupted, job {job_id} keeps running remotely");
                return Ok(());
            }
            update = workflow.next_update() => match update {
                Some(phase) => {
                    println!("status: {phase}");
                    if phase.is_terminal() {
                        break phase;
                    }
                }
                None => {
                    return Err(DreamshotError::Internal("status watch ended unexpectedly".into()));
                }
            },
        }
    };

    match settled {
        Phase::Completed => {
            for result in workflow.result().unwrap_or_default() {
                if let Some(url) = result.primary_url() {
                    println!("{}: {url}", result.kind);
                }
            }
            Ok(())
        }
        _ => Err(DreamshotError::Remote(
            workflow.error().unwrap_or("generation failed").to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_fill_slots_before_samples() {
        let assigned = assign_inputs(
            vec![PathBuf::from("me.png")],
            vec!["https://cdn.dreamshot.ai/s.png".into()],
        )
        .unwrap();
        assert_eq!(
            assigned,
            vec![
                (Slot::First, Input::Path(PathBuf::from("me.png"))),
                (Slot::Second, Input::Sample("https://cdn.dreamshot.ai/s.png".into())),
            ]
        );
    }

    #[test]
    fn too_many_inputs_is_rejected() {
        let err = assign_inputs(
            vec![PathBuf::from("a.png"), PathBuf::from("b.png")],
            vec!["https://cdn.dreamshot.ai/s.png".into()],
        )
        .unwrap_err();
        assert!(matches!(err, DreamshotError::Validation(_)));
    }

    #[test]
    fn describes_every_wired_backend() {
        let config = DreamshotConfig::default();
        let api = HttpGenerationApi::new(&config.api).unwrap();
        let samples = ProxySampleSource::new(&config.app, &config.proxy).unwrap();
        let store = PollingDocumentStore::new(&config.watcher, &config.api).unwrap();

        let backends: [&dyn PluginAdapter; 3] = [&api, &samples, &store];
        let lines = describe_adapters(&backends);
        assert_eq!(
            lines,
            vec![
                "backend: http-generation-api v0.1.0",
                "backend: proxy-sample-source v0.1.0",
                "backend: polling-document-store v0.1.0",
            ]
        );
    }

    #[test]
    fn no_inputs_assigns_nothing() {
        assert!(assign_inputs(vec![], vec![]).unwrap().is_empty());
    }
}
