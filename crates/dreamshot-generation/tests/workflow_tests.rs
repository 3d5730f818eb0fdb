// SPDX-FileCopyrightText: 2026 Dreamshot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation workflow scenarios with mock collaborators.

use std::sync::Arc;
use std::time::Duration;

use dreamshot_content::LoadedTool;
use dreamshot_core::{
    DreamshotError, GenerationDocument, GenerationResult, ImageFile, JobId, MediaKind, ToolRef,
    UserId,
};
use dreamshot_generation::workflow::{
    PREPARE_FAILED_MESSAGE, SINGLE_INPUT_MESSAGE, UNSUPPORTED_DROP_MESSAGE, UPLOAD_BOTH_MESSAGE,
    UPLOAD_ONE_MESSAGE,
};
use dreamshot_generation::{
    DropPayload, GenerationWorkflow, Phase, Slot, SlotContent, UploadPolicy, WorkflowDeps,
};
use dreamshot_test_utils::{
    FakeDocumentStore, MockGenerationApi, MockSampleSource, RecordingNotifier,
};
use serde_json::json;

const MIB: usize = 1024 * 1024;
const SAMPLE: &str = "https://cdn.example.com/sample1.png";

struct Harness {
    workflow: GenerationWorkflow,
    api: MockGenerationApi,
    samples: MockSampleSource,
    store: FakeDocumentStore,
    notifier: Arc<RecordingNotifier>,
}

fn tool(input_mode: &str, credit_cost: u32) -> LoadedTool {
    LoadedTool {
        tool_ref: ToolRef {
            category: "effects".into(),
            slug: "ghibli".into(),
        },
        locale: None,
        config: serde_json::from_value(json!({
            "id": "ghibli",
            "title": "Ghibli Style",
            "creditCost": credit_cost,
            "inputMode": input_mode,
        }))
        .unwrap(),
    }
}

fn harness(input_mode: &str) -> Harness {
    harness_with_cost(input_mode, 1)
}

fn harness_with_cost(input_mode: &str, credit_cost: u32) -> Harness {
    let api = MockGenerationApi::new();
    let samples = MockSampleSource::new();
    let store = FakeDocumentStore::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let workflow = GenerationWorkflow::new(
        tool(input_mode, credit_cost),
        UploadPolicy::default(),
        Duration::from_secs(3),
        WorkflowDeps {
            api: Arc::new(api.clone()),
            samples: Arc::new(samples.clone()),
            store: Arc::new(store.clone()),
            notifier: notifier.clone(),
        },
    );
    Harness {
        workflow,
        api,
        samples,
        store,
        notifier,
    }
}

fn png(size: usize) -> ImageFile {
    ImageFile::new("cat.png", "image/png", vec![7; size])
}

fn user() -> UserId {
    UserId("uid-1".into())
}

fn completed_doc(url: &str) -> GenerationDocument {
    GenerationDocument {
        status: Some("completed".into()),
        result: Some(vec![GenerationResult {
            kind: MediaKind::Image,
            image: Some(url.into()),
            video: None,
            thumbnail: None,
        }]),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn upload_start_watch_complete() {
    let mut h = harness("single");
    h.api.push_job("abc123").await;

    h.workflow.select_file(Slot::First, png(2 * MIB)).unwrap();
    assert_eq!(h.workflow.phase(), Phase::Uploading);
    assert!(h.workflow.can_process());

    let job = h.workflow.generate(&user(), None).await.unwrap();
    assert_eq!(job, JobId("abc123".into()));
    assert_eq!(h.workflow.phase(), Phase::Pending);
    assert!(h.workflow.is_generating());
    assert_eq!(h.store.subscribed_paths(), vec!["users/uid-1/generations/abc123"]);

    let requests = h.api.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].images.len(), 1);
    assert_eq!(requests[0].images[0].size(), (2 * MIB) as u64);
    assert_eq!(requests[0].user_id, user());

    h.store.push_status("users/uid-1/generations/abc123", "pending");
    assert_eq!(h.workflow.next_update().await, Some(Phase::Pending));
    assert!(!h.workflow.view().can_try_another());

    h.store.push(
        "users/uid-1/generations/abc123",
        completed_doc("https://cdn.example.com/out.png"),
    );
    assert_eq!(h.workflow.next_update().await, Some(Phase::Completed));

    let view = h.workflow.view();
    assert!(!view.is_generating);
    assert!(view.can_try_another());
    assert_eq!(view.download_url(), Some("https://cdn.example.com/out.png"));
    assert!(h.notifier.errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dual_tool_with_one_sample_requires_both_images() {
    let mut h = harness("dual");

    h.workflow
        .drop_on(Slot::First, DropPayload::Text(SAMPLE.into()))
        .unwrap();
    assert_eq!(h.workflow.view().previews[0].as_deref(), Some(SAMPLE));
    assert!(!h.workflow.can_process());

    let err = h.workflow.generate(&user(), None).await.unwrap_err();
    assert!(matches!(err, DreamshotError::Validation(ref m) if m == UPLOAD_BOTH_MESSAGE));
    assert_eq!(h.api.call_count().await, 0);
    assert!(h.samples.fetched().await.is_empty());
    assert_eq!(h.notifier.errors(), vec![UPLOAD_BOTH_MESSAGE]);
    assert_eq!(h.workflow.phase(), Phase::Uploading);
}

#[tokio::test(start_paused = true)]
async fn single_tool_without_upload_asks_for_an_image() {
    let mut h = harness("single");
    let err = h.workflow.generate(&user(), None).await.unwrap_err();
    assert_eq!(err.user_message(), UPLOAD_ONE_MESSAGE);
    assert_eq!(h.api.call_count().await, 0);
    assert_eq!(h.workflow.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn invalid_upload_leaves_state_untouched() {
    let mut h = harness("single");

    let err = h
        .workflow
        .select_file(Slot::First, ImageFile::new("doc.pdf", "application/pdf", vec![1; 10]))
        .unwrap_err();
    assert!(err.user_message().contains("application/pdf"));
    assert_eq!(h.workflow.phase(), Phase::Idle);
    assert_eq!(h.workflow.slot(Slot::First), &SlotContent::Empty);

    h.workflow.select_file(Slot::First, png(1024)).unwrap();
    let err = h
        .workflow
        .select_file(Slot::First, png(15 * MIB))
        .unwrap_err();
    assert_eq!(err.user_message(), "File size must be less than 10MB");
    assert!(matches!(h.workflow.slot(Slot::First), SlotContent::File { .. }));
    assert_eq!(h.notifier.errors().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn samples_are_fetched_only_at_generate_time() {
    let mut h = harness("dual");
    h.samples.insert_png(SAMPLE).await;
    h.api.push_job("job-1").await;

    h.workflow.select_sample(Slot::First, SAMPLE).unwrap();
    h.workflow.select_file(Slot::Second, png(512)).unwrap();
    assert!(h.workflow.can_process());
    assert!(h.samples.fetched().await.is_empty());

    h.workflow.generate(&user(), None).await.unwrap();
    assert_eq!(h.samples.fetched().await, vec![SAMPLE]);

    let request = &h.api.requests().await[0];
    assert_eq!(request.images.len(), 2);
    assert_eq!(request.images[0].name, "sample1.png");
    assert_eq!(request.images[1].name, "cat.png");
}

#[tokio::test(start_paused = true)]
async fn sample_fetch_failure_reports_prepare_error() {
    let mut h = harness("single");
    h.workflow
        .select_sample(Slot::First, "https://cdn.example.com/missing.png")
        .unwrap();

    let err = h.workflow.generate(&user(), None).await.unwrap_err();
    assert_eq!(err.user_message(), PREPARE_FAILED_MESSAGE);
    assert_eq!(h.api.call_count().await, 0);
    assert_eq!(h.notifier.errors(), vec![PREPARE_FAILED_MESSAGE]);
    assert_eq!(h.workflow.phase(), Phase::Uploading);
    assert!(!h.workflow.is_generating());
}

#[tokio::test(start_paused = true)]
async fn start_failure_returns_to_idle_and_keeps_uploads() {
    let mut h = harness("single");
    h.api.push_error("Daily quota exceeded").await;

    h.workflow.select_file(Slot::First, png(1024)).unwrap();
    assert!(h.workflow.generate(&user(), None).await.is_err());

    assert_eq!(h.workflow.phase(), Phase::Idle);
    assert_eq!(h.workflow.job_id(), None);
    assert!(!h.workflow.is_generating());
    assert!(h.workflow.can_process(), "uploads kept for a retry");
    assert!(h.store.subscribed_paths().is_empty());
    assert_eq!(h.notifier.errors(), vec!["Daily quota exceeded"]);

    // Retry goes through.
    h.api.push_job("job-2").await;
    assert!(h.workflow.generate(&user(), None).await.is_ok());
    assert_eq!(h.workflow.phase(), Phase::Pending);
}

#[tokio::test(start_paused = true)]
async fn insufficient_credits_blocks_before_network() {
    let mut h = harness_with_cost("single", 5);
    h.workflow.select_file(Slot::First, png(1024)).unwrap();

    let err = h.workflow.generate(&user(), Some(2)).await.unwrap_err();
    assert!(matches!(
        err,
        DreamshotError::InsufficientCredits {
            required: 5,
            available: 2
        }
    ));
    assert_eq!(h.api.call_count().await, 0);

    h.workflow.generate(&user(), Some(5)).await.unwrap();
    assert_eq!(h.api.call_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn clearing_one_slot_keeps_the_other() {
    let mut h = harness("dual");
    h.workflow.select_file(Slot::First, png(64)).unwrap();
    h.workflow.select_sample(Slot::Second, SAMPLE).unwrap();

    h.workflow.clear_slot(Slot::First);
    assert_eq!(h.workflow.slot(Slot::First), &SlotContent::Empty);
    assert_eq!(h.workflow.slot(Slot::Second), &SlotContent::sample(SAMPLE));
    assert_eq!(h.workflow.phase(), Phase::Uploading);

    h.workflow.clear_slot(Slot::Second);
    assert_eq!(h.workflow.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn reset_discards_job_and_unsubscribes() {
    let mut h = harness("single");
    h.api.push_job("abc123").await;
    h.workflow.select_file(Slot::First, png(64)).unwrap();
    h.workflow.generate(&user(), None).await.unwrap();
    assert!(h.store.has_active_subscriptions());

    h.workflow.reset();
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert_eq!(h.workflow.phase(), Phase::Idle);
    assert_eq!(h.workflow.job_id(), None);
    assert!(!h.workflow.can_process());
    assert!(!h.store.has_active_subscriptions());
    assert_eq!(h.workflow.next_update().await, None);
}

#[tokio::test(start_paused = true)]
async fn remote_failure_surfaces_after_grace() {
    let mut h = harness("single");
    h.api.push_job("abc123").await;
    h.workflow.select_file(Slot::First, png(64)).unwrap();
    h.workflow.generate(&user(), None).await.unwrap();

    h.store.push(
        "users/uid-1/generations/abc123",
        GenerationDocument {
            status: Some("failed".into()),
            error: Some("Face not detected".into()),
            ..Default::default()
        },
    );

    assert_eq!(h.workflow.wait_until_settled().await, Some(Phase::Failed));
    assert_eq!(h.workflow.error(), Some("Face not detected"));
    assert_eq!(h.notifier.errors(), vec!["Face not detected"]);
    assert!(h.workflow.view().can_try_another());
}

#[tokio::test(start_paused = true)]
async fn watch_failure_toasts_but_keeps_pending() {
    let mut h = harness("single");
    h.api.push_job("abc123").await;
    h.workflow.select_file(Slot::First, png(64)).unwrap();
    h.workflow.generate(&user(), None).await.unwrap();

    h.store
        .push_error("users/uid-1/generations/abc123", "connection reset");
    assert_eq!(h.workflow.next_update().await, Some(Phase::Pending));
    assert_eq!(
        h.notifier.errors(),
        vec![dreamshot_generation::watcher::WATCH_FAILURE_MESSAGE]
    );

    h.store.push(
        "users/uid-1/generations/abc123",
        completed_doc("https://cdn.example.com/out.png"),
    );
    assert_eq!(h.workflow.wait_until_settled().await, Some(Phase::Completed));
    assert_eq!(h.workflow.error(), None);
}

#[tokio::test(start_paused = true)]
async fn new_upload_discards_previous_job() {
    let mut h = harness("single");
    h.api.push_job("abc123").await;
    h.workflow.select_file(Slot::First, png(64)).unwrap();
    h.workflow.generate(&user(), None).await.unwrap();

    h.workflow.select_file(Slot::First, png(128)).unwrap();
    assert_eq!(h.workflow.job_id(), None);
    assert_eq!(h.workflow.phase(), Phase::Uploading);
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(!h.store.has_active_subscriptions());
}

#[tokio::test(start_paused = true)]
async fn second_slot_rejected_for_single_tools() {
    let mut h = harness("single");
    let err = h.workflow.select_sample(Slot::Second, SAMPLE).unwrap_err();
    assert_eq!(err.user_message(), SINGLE_INPUT_MESSAGE);
    assert_eq!(h.workflow.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn non_url_text_drop_is_rejected() {
    let mut h = harness("dual");
    let err = h
        .workflow
        .drop_on(Slot::Second, DropPayload::Text("hello there".into()))
        .unwrap_err();
    assert_eq!(err.user_message(), UNSUPPORTED_DROP_MESSAGE);

    h.workflow
        .drop_on(Slot::Second, DropPayload::Files(vec![png(64)]))
        .unwrap();
    assert!(matches!(h.workflow.slot(Slot::Second), SlotContent::File { .. }));
}

#[tokio::test(start_paused = true)]
async fn select_path_reads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("selfie.jpg");
    let bad = dir.path().join("notes.txt");
    std::fs::write(&good, vec![1u8; 256]).unwrap();
    std::fs::write(&bad, b"hello").unwrap();

    let mut h = harness("single");
    assert!(h.workflow.select_path(Slot::First, &bad).await.is_err());
    assert_eq!(h.workflow.phase(), Phase::Idle);
    assert!(!h.workflow.is_uploading());
    assert!(!h.workflow.view().is_uploading);

    h.workflow.select_path(Slot::First, &good).await.unwrap();
    assert!(!h.workflow.is_uploading());
    assert!(!h.workflow.view().is_uploading);
    let SlotContent::File { file, preview } = h.workflow.slot(Slot::First) else {
        panic!("expected a file");
    };
    assert_eq!(file.mime_type, "image/jpeg");
    assert!(preview.starts_with("data:image/jpeg;base64,"));
}

#[tokio::test(start_paused = true)]
async fn view_subscribers_observe_phase_changes() {
    let mut h = harness("single");
    let mut rx = h.workflow.subscribe();
    rx.borrow_and_update();

    h.workflow.select_file(Slot::First, png(64)).unwrap();
    assert!(rx.has_changed().unwrap());
    let view = rx.borrow_and_update().clone();
    assert_eq!(view.phase, Phase::Uploading);
    assert!(view.can_process);
    assert!(view.previews[0].is_some());
    assert!(view.previews[1].is_none());
}
