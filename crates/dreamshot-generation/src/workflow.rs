// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upload, start, and track a generation for one tool page.
//!
//! Phases move `idle → uploading → starting → pending → completed | failed`.
//! `reset` returns to `idle` from anywhere. The `pending` exit is driven by
//! the [`StatusWatcher`]; call [`GenerationWorkflow::next_update`] (or
//! [`GenerationWorkflow::sync_status`]) to fold its output into the phase.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use dreamshot_config::model::DreamshotConfig;
use dreamshot_content::LoadedTool;
use dreamshot_core::{
    DocumentStore, DreamshotError, GenerationApi, GenerationResult, ImageFile, JobId, JobStatus,
    Notification, Notifier, SampleSource, StartGenerationRequest, UserId,
};
use strum::Display;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::slots::{DropPayload, Slot, SlotContent, can_process, sample_url_from_text};
use crate::upload::{UploadPolicy, read_image};
use crate::watcher::{GENERATION_FAILED_MESSAGE, StatusWatcher, WatchedJob};

pub const UPLOAD_BOTH_MESSAGE: &str = "Please upload both images";
pub const UPLOAD_ONE_MESSAGE: &str = "Please upload an image";
pub const PREPARE_FAILED_MESSAGE: &str = "Failed to prepare image";
pub const SINGLE_INPUT_MESSAGE: &str = "This effect takes a single image";
pub const UNSUPPORTED_DROP_MESSAGE: &str = "Please drop an image file or an image link";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Starting,
    Pending,
    Completed,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

/// Everything a playground view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowView {
    pub phase: Phase,
    pub previews: [Option<String>; 2],
    pub can_process: bool,
    pub is_uploading: bool,
    pub is_generating: bool,
    pub job_id: Option<JobId>,
    pub result: Option<Vec<GenerationResult>>,
    pub error: Option<String>,
}

impl WorkflowView {
    /// First result's URL, once the job has completed.
    pub fn download_url(&self) -> Option<&str> {
        if self.phase != Phase::Completed {
            return None;
        }
        self.result.as_ref()?.first()?.primary_url()
    }

    /// "Try another image" is offered once the job has settled.
    pub fn can_try_another(&self) -> bool {
        self.phase.is_terminal()
    }
}

/// Collaborators the workflow calls out to.
#[derive(Clone)]
pub struct WorkflowDeps {
    pub api: Arc<dyn GenerationApi>,
    pub samples: Arc<dyn SampleSource>,
    pub store: Arc<dyn DocumentStore>,
    pub notifier: Arc<dyn Notifier>,
}

pub struct GenerationWorkflow {
    tool: LoadedTool,
    policy: UploadPolicy,
    api: Arc<dyn GenerationApi>,
    samples: Arc<dyn SampleSource>,
    notifier: Arc<dyn Notifier>,
    slots: [SlotContent; 2],
    phase: Phase,
    job_id: Option<JobId>,
    result: Option<Vec<GenerationResult>>,
    error: Option<String>,
    is_uploading: bool,
    is_generating: bool,
    watcher: StatusWatcher,
    updates: watch::Receiver<WatchedJob>,
    view: watch::Sender<WorkflowView>,
}

impl std::fmt::Debug for GenerationWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationWorkflow")
            .field("tool", &self.tool.config.id)
            .field("phase", &self.phase)
            .field("slots", &self.slots)
            .field("job_id", &self.job_id)
            .field("error", &self.error)
            .finish()
    }
}

impl GenerationWorkflow {
    pub fn new(
        tool: LoadedTool,
        policy: UploadPolicy,
        failure_grace: Duration,
        deps: WorkflowDeps,
    ) -> Self {
        let watcher = StatusWatcher::new(deps.store, failure_grace);
        let updates = watcher.subscribe();
        let (view, _) = watch::channel(WorkflowView::default());
        let workflow = Self {
            tool,
            policy,
            api: deps.api,
            samples: deps.samples,
            notifier: deps.notifier,
            slots: Default::default(),
            phase: Phase::Idle,
            job_id: None,
            result: None,
            error: None,
            is_uploading: false,
            is_generating: false,
            watcher,
            updates,
            view,
        };
        workflow.publish();
        workflow
    }

    pub fn from_config(tool: LoadedTool, config: &DreamshotConfig, deps: WorkflowDeps) -> Self {
        Self::new(
            tool,
            UploadPolicy::from_config(&config.upload),
            Duration::from_millis(config.watcher.failure_grace_ms),
            deps,
        )
    }

    pub fn tool(&self) -> &LoadedTool {
        &self.tool
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn slot(&self, slot: Slot) -> &SlotContent {
        &self.slots[slot.index()]
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    pub fn result(&self) -> Option<&[GenerationResult]> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn can_process(&self) -> bool {
        can_process(self.tool.config.input_mode, &self.slots)
    }

    pub fn view(&self) -> WorkflowView {
        self.view.borrow().clone()
    }

    /// Receiver that wakes whenever the view changes.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowView> {
        self.view.subscribe()
    }

    /// Put an uploaded file into `slot` after validating it.
    ///
    /// A rejected file leaves the workflow as it was.
    pub fn select_file(&mut self, slot: Slot, file: ImageFile) -> Result<(), DreamshotError> {
        self.check_slot(slot)?;
        if let Err(e) = self.policy.validate(&file) {
            debug!(slot = %slot, name = %file.name, error = %e, "upload rejected");
            return Err(self.reject(e.into()));
        }

        self.discard_job();
        debug!(slot = %slot, name = %file.name, size = file.size(), "file selected");
        self.slots[slot.index()] = SlotContent::file(file);
        self.phase = Phase::Uploading;
        self.error = None;
        self.publish();
        Ok(())
    }

    /// Read a file from disk into `slot`.
    pub async fn select_path(&mut self, slot: Slot, path: &Path) -> Result<(), DreamshotError> {
        self.check_slot(slot)?;
        self.is_uploading = true;
        self.publish();

        let read = read_image(path).await;
        self.is_uploading = false;
        match read {
            Ok(file) => {
                let selected = self.select_file(slot, file);
                if selected.is_err() {
                    // A rejected file publishes nothing, but the spinner must clear.
                    self.publish();
                }
                selected
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read image");
                self.publish();
                Err(self.reject(e))
            }
        }
    }

    /// Put a sample image into `slot`. Only the URL is kept; nothing is
    /// fetched until `generate`.
    pub fn select_sample(&mut self, slot: Slot, url: impl Into<String>) -> Result<(), DreamshotError> {
        self.check_slot(slot)?;
        let url = url.into();
        self.discard_job();
        debug!(slot = %slot, url = %url, "sample selected");
        self.slots[slot.index()] = SlotContent::sample(url);
        self.phase = Phase::Uploading;
        self.error = None;
        self.publish();
        Ok(())
    }

    /// Handle a drag-and-drop: files are uploads, a plain-text http(s) URL
    /// is a sample.
    pub fn drop_on(&mut self, slot: Slot, payload: DropPayload) -> Result<(), DreamshotError> {
        match payload {
            DropPayload::Files(files) => match files.into_iter().next() {
                Some(file) => self.select_file(slot, file),
                None => Err(self.reject(DreamshotError::Validation(
                    UNSUPPORTED_DROP_MESSAGE.into(),
                ))),
            },
            DropPayload::Text(text) => match sample_url_from_text(&text) {
                Some(url) => self.select_sample(slot, url),
                None => Err(self.reject(DreamshotError::Validation(
                    UNSUPPORTED_DROP_MESSAGE.into(),
                ))),
            },
        }
    }

    /// Empty one slot and drop the job linkage. The other slot is kept.
    pub fn clear_slot(&mut self, slot: Slot) {
        self.slots[slot.index()] = SlotContent::Empty;
        self.discard_job();
        self.error = None;
        self.phase = if self.slots.iter().any(SlotContent::is_filled) {
            Phase::Uploading
        } else {
            Phase::Idle
        };
        debug!(slot = %slot, phase = %self.phase, "slot cleared");
        self.publish();
    }

    /// "Try another image": discard uploads, samples, and the job.
    pub fn reset(&mut self) {
        self.slots = Default::default();
        self.discard_job();
        self.error = None;
        self.is_uploading = false;
        self.phase = Phase::Idle;
        debug!("workflow reset");
        self.publish();
    }

    /// Start a generation for `user`.
    ///
    /// `credits` is the user's balance when known; a balance below the tool's
    /// cost fails with [`DreamshotError::InsufficientCredits`] so the caller
    /// can open the credits dialog. No network call happens unless every
    /// required slot is filled and the balance suffices.
    pub async fn generate(
        &mut self,
        user: &UserId,
        credits: Option<u32>,
    ) -> Result<JobId, DreamshotError> {
        if !self.can_process() {
            let message = if self.tool.config.is_dual() {
                UPLOAD_BOTH_MESSAGE
            } else {
                UPLOAD_ONE_MESSAGE
            };
            return Err(self.reject(DreamshotError::Validation(message.into())));
        }

        let required = self.tool.config.credit_cost;
        if let Some(available) = credits
            && available < required
        {
            info!(required, available, "not enough credits to generate");
            return Err(DreamshotError::InsufficientCredits {
                required,
                available,
            });
        }

        self.discard_job();
        self.phase = Phase::Starting;
        self.is_generating = true;
        self.error = None;
        self.publish();

        let images = match self.materialize().await {
            Ok(images) => images,
            Err(e) => {
                warn!(error = %e, "failed to prepare sample image");
                self.phase = Phase::Uploading;
                self.is_generating = false;
                self.error = Some(PREPARE_FAILED_MESSAGE.to_string());
                self.publish();
                self.notify_error(PREPARE_FAILED_MESSAGE);
                return Err(DreamshotError::transport(PREPARE_FAILED_MESSAGE, e));
            }
        };

        let request = StartGenerationRequest {
            tool: self.tool.tool_ref.clone(),
            user_id: user.clone(),
            images,
        };

        match self.api.start_generation(request).await {
            Ok(response) => {
                info!(
                    job_id = %response.job_id,
                    status = %response.status,
                    tool = %self.tool.config.id,
                    "generation started"
                );
                self.job_id = Some(response.job_id.clone());
                self.phase = Phase::Pending;
                self.watcher
                    .watch(Some(user.clone()), Some(response.job_id.clone()));
                self.publish();
                Ok(response.job_id)
            }
            Err(e) => {
                warn!(error = %e, tool = %self.tool.config.id, "start generation failed");
                let message = e.user_message();
                self.phase = Phase::Idle;
                self.is_generating = false;
                self.error = Some(message.clone());
                self.publish();
                self.notify_error(&message);
                Err(e)
            }
        }
    }

    /// Wait for the watcher to publish and apply it.
    ///
    /// Returns the phase afterwards, or `None` when no job is linked.
    pub async fn next_update(&mut self) -> Option<Phase> {
        self.job_id.as_ref()?;
        self.updates.changed().await.ok()?;
        let state = self.updates.borrow_and_update().clone();
        self.apply_watch(&state);
        Some(self.phase)
    }

    /// Apply a pending watcher update without waiting. Returns `true` if one
    /// was applied.
    pub fn sync_status(&mut self) -> bool {
        if self.job_id.is_none() || !self.updates.has_changed().unwrap_or(false) {
            return false;
        }
        let state = self.updates.borrow_and_update().clone();
        self.apply_watch(&state);
        true
    }

    /// Wait until the linked job completes or fails.
    pub async fn wait_until_settled(&mut self) -> Option<Phase> {
        loop {
            let phase = self.next_update().await?;
            if phase.is_terminal() {
                return Some(phase);
            }
        }
    }

    fn apply_watch(&mut self, state: &WatchedJob) {
        match state.status {
            Some(JobStatus::Completed) => {
                self.phase = Phase::Completed;
                self.result = state.result.clone();
                self.error = None;
                self.is_generating = false;
            }
            Some(JobStatus::Failed) => {
                let message = state
                    .error
                    .clone()
                    .unwrap_or_else(|| GENERATION_FAILED_MESSAGE.to_string());
                self.phase = Phase::Failed;
                self.result = None;
                self.is_generating = false;
                self.notify_error(&message);
                self.error = Some(message);
            }
            Some(JobStatus::Pending) | None => {
                if state.status.is_some() {
                    self.phase = Phase::Pending;
                    self.result = None;
                    self.is_generating = true;
                }
                match &state.error {
                    Some(message) => {
                        self.notify_error(message);
                        self.error = Some(message.clone());
                    }
                    None => self.error = None,
                }
            }
        }
        debug!(phase = %self.phase, "status update applied");
        self.publish();
    }

    async fn materialize(&self) -> Result<Vec<ImageFile>, DreamshotError> {
        let mode = self.tool.config.input_mode;
        let mut images = Vec::with_capacity(mode.slot_count());
        for slot in Slot::ALL.into_iter().filter(|s| s.is_used_by(mode)) {
            let file = match &self.slots[slot.index()] {
                SlotContent::File { file, .. } => file.clone(),
                SlotContent::Sample { url } => {
                    let file = self.samples.fetch(url).await?;
                    self.policy.validate(&file)?;
                    debug!(slot = %slot, url = %url, size = file.size(), "sample materialized");
                    file
                }
                SlotContent::Empty => {
                    return Err(DreamshotError::Internal(format!("slot {slot} is empty")));
                }
            };
            images.push(file);
        }
        Ok(images)
    }

    fn check_slot(&self, slot: Slot) -> Result<(), DreamshotError> {
        if slot.is_used_by(self.tool.config.input_mode) {
            Ok(())
        } else {
            Err(self.reject(DreamshotError::Validation(SINGLE_INPUT_MESSAGE.into())))
        }
    }

    /// Stop watching and forget the job. The reset the watcher publishes is
    /// marked seen so it is not applied as an update.
    fn discard_job(&mut self) {
        self.watcher.clear();
        self.updates.mark_unchanged();
        self.job_id = None;
        self.result = None;
        self.is_generating = false;
    }

    fn reject(&self, error: DreamshotError) -> DreamshotError {
        self.notify_error(&error.user_message());
        error
    }

    fn notify_error(&self, message: &str) {
        self.notifier.notify(Notification::error(message));
    }

    fn publish(&self) {
        let view = WorkflowView {
            phase: self.phase,
            previews: [
                self.slots[0].preview().map(str::to_string),
                self.slots[1].preview().map(str::to_string),
            ],
            can_process: self.can_process(),
            is_uploading: self.is_uploading,
            is_generating: self.is_generating,
            job_id: self.job_id.clone(),
            result: self.result.clone(),
            error: self.error.clone(),
        };
        self.view.send_if_modified(|current| {
            if *current == view {
                return false;
            }
            *current = view;
            true
        });
    }
}
