//! End-to-end workflow tests
//!
//! Drives a full studio session (acquire, record, stop, upload, reset)
//! against mock capture and server backends.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use studio_core::{
    CaptureSettings, ConnectionState, DeviceError, DeviceKind, DeviceRecorder, DeviceResult,
    MediaFeed, RecorderFactory, RecorderResult, Recording, RecordingState, RemoteServerClient,
    SessionAction, StepNavigator, StreamHandle, StreamSource, Studio, UploadPayload, UploadState,
};

/// Capture backend serving both stream acquisition and recorder creation.
#[derive(Default)]
struct MockBackend {
    deny_display: AtomicBool,
    open_calls: AtomicUsize,
    close_calls: AtomicUsize,
}

#[async_trait]
impl StreamSource for MockBackend {
    async fn open(&self, kind: DeviceKind) -> DeviceResult<MediaFeed> {
        if kind == DeviceKind::Display && self.deny_display.load(Ordering::SeqCst) {
            return Err(DeviceError::DeviceUnavailable(kind));
        }
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        Ok(MediaFeed {
            mime_type: "video/webm".to_string(),
            device_label: Some(format!("mock {kind} device")),
        })
    }

    fn close(&self, _kind: DeviceKind) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockRecorder {
    kind: DeviceKind,
    mime_type: String,
    recording: bool,
}

#[async_trait]
impl DeviceRecorder for MockRecorder {
    fn device_kind(&self) -> DeviceKind {
        self.kind
    }

    async fn start(&mut self) -> RecorderResult<()> {
        self.recording = true;
        Ok(())
    }

    async fn pause(&mut self) -> RecorderResult<()> {
        self.recording = false;
        Ok(())
    }

    async fn resume(&mut self) -> RecorderResult<()> {
        self.recording = true;
        Ok(())
    }

    async fn stop(&mut self) -> RecorderResult<Recording> {
        self.recording = false;
        Ok(Recording::new(
            self.kind,
            self.mime_type.clone(),
            vec![0u8; 128],
            format!("mem://{}", self.kind),
        ))
    }

    fn is_recording(&self) -> bool {
        self.recording
    }
}

impl RecorderFactory for MockBackend {
    fn recorder(&self, stream: &StreamHandle) -> RecorderResult<Box<dyn DeviceRecorder>> {
        Ok(Box::new(MockRecorder {
            kind: stream.kind(),
            mime_type: stream.mime_type().to_string(),
            recording: false,
        }))
    }
}

struct MockClient {
    ready: bool,
    succeed: bool,
    state: ConnectionState,
    upload_calls: AtomicUsize,
}

impl MockClient {
    fn new(succeed: bool, state: ConnectionState) -> Self {
        Self {
            ready: true,
            succeed,
            state,
            upload_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RemoteServerClient for MockClient {
    fn is_ready_to_upload(&self) -> bool {
        self.ready
    }

    async fn upload(&self, payload: UploadPayload) -> bool {
        assert!(!payload.title.is_empty());
        assert!(!payload.creator.is_empty());
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.succeed
    }

    fn connection_state(&self) -> ConnectionState {
        self.state
    }

    fn pretty_server_url(&self) -> Option<String> {
        Some("media.example.org".to_string())
    }
}

#[derive(Default)]
struct MockNavigator {
    first: AtomicUsize,
    next: AtomicUsize,
}

impl StepNavigator for MockNavigator {
    fn first_step(&self) {
        self.first.fetch_add(1, Ordering::SeqCst);
    }

    fn previous_step(&self) {}

    fn next_step(&self) {
        self.next.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    studio: Studio,
    backend: Arc<MockBackend>,
    client: Arc<MockClient>,
    navigator: Arc<MockNavigator>,
}

fn harness(client: MockClient) -> Harness {
    let backend = Arc::new(MockBackend::default());
    let client = Arc::new(client);
    let navigator = Arc::new(MockNavigator::default());
    let studio = Studio::new(
        backend.clone(),
        backend.clone(),
        client.clone(),
        navigator.clone(),
    );
    Harness {
        studio,
        backend,
        client,
        navigator,
    }
}

fn set_metadata(studio: &Studio, title: &str, presenter: &str) {
    studio.store().dispatch(SessionAction::UpdateMetadata {
        title: Some(title.to_string()),
        presenter: Some(presenter.to_string()),
    });
}

async fn wait_for_inactive(studio: &Studio) {
    for _ in 0..100 {
        if studio.recording_state().await == RecordingState::Inactive {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session never went inactive");
}

#[tokio::test]
async fn test_two_streams_record_stop_and_reset() {
    let h = harness(MockClient::new(true, ConnectionState::LoggedIn));

    let streams = h
        .studio
        .acquire_streams(&CaptureSettings::default())
        .await
        .unwrap();
    assert_eq!(streams.len(), 2);

    h.studio.start_recording().await.unwrap();
    assert_eq!(h.studio.recording_state().await, RecordingState::Recording);

    let recordings = h.studio.stop_recording().await.unwrap();
    assert_eq!(recordings.len(), 2);
    assert_eq!(h.studio.store().recordings().len(), 2);
    assert_eq!(h.navigator.next.load(Ordering::SeqCst), 1);

    h.studio.reset().await;
    assert!(h.studio.store().recordings().is_empty());
    assert!(h.studio.devices().live_streams().is_empty());
    assert_eq!(h.backend.close_calls.load(Ordering::SeqCst), 2);
    assert_eq!(h.navigator.first.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_partial_acquisition_still_records() {
    let h = harness(MockClient::new(true, ConnectionState::LoggedIn));
    h.backend.deny_display.store(true, Ordering::SeqCst);

    let streams = h
        .studio
        .acquire_streams(&CaptureSettings::default())
        .await
        .unwrap();
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].kind(), DeviceKind::User);

    h.studio.start_recording().await.unwrap();
    let recordings = h.studio.stop_recording().await.unwrap();
    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0].device_kind, DeviceKind::User);
}

#[tokio::test]
async fn test_acquisition_fails_when_no_device_available() {
    let h = harness(MockClient::new(true, ConnectionState::LoggedIn));
    h.backend.deny_display.store(true, Ordering::SeqCst);

    let capture = CaptureSettings {
        display: true,
        user: false,
    };
    let err = h.studio.acquire_streams(&capture).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        DeviceError::DeviceUnavailable(DeviceKind::Display).to_string()
    );
}

#[tokio::test]
async fn test_stream_loss_forces_session_inactive() {
    let h = harness(MockClient::new(true, ConnectionState::LoggedIn));
    let watcher = h.studio.spawn_stream_watcher();

    let streams = h
        .studio
        .acquire_streams(&CaptureSettings::default())
        .await
        .unwrap();
    h.studio.start_recording().await.unwrap();

    for stream in &streams {
        h.studio.devices().mark_lost(stream.id());
    }
    wait_for_inactive(&h.studio).await;

    // Partial data from the lost devices is discarded.
    assert!(h.studio.store().recordings().is_empty());
    assert_eq!(h.navigator.first.load(Ordering::SeqCst), 1);

    watcher.abort();
}

#[tokio::test]
async fn test_empty_presenter_blocks_the_upload() {
    let h = harness(MockClient::new(true, ConnectionState::LoggedIn));

    h.studio
        .acquire_streams(&CaptureSettings::default())
        .await
        .unwrap();
    h.studio.start_recording().await.unwrap();
    h.studio.stop_recording().await.unwrap();

    set_metadata(&h.studio, "Lecture 1", "");
    h.studio.submit_upload().await;

    assert_eq!(h.client.upload_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.studio.store().upload_status().state, UploadState::Error);
}

#[tokio::test]
async fn test_happy_path_uploads_and_advances() {
    let h = harness(MockClient::new(true, ConnectionState::LoggedIn));

    h.studio
        .acquire_streams(&CaptureSettings::default())
        .await
        .unwrap();
    h.studio.start_recording().await.unwrap();
    h.studio.pause_recording().await.unwrap();
    h.studio.resume_recording().await.unwrap();
    h.studio.stop_recording().await.unwrap();

    set_metadata(&h.studio, "Lecture 1", "Ada");
    assert!(h.studio.can_submit());

    h.studio.submit_upload().await;

    assert_eq!(h.client.upload_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.studio.store().upload_status().state, UploadState::Uploaded);
    // Once after stop, once after the completed upload.
    assert_eq!(h.navigator.next.load(Ordering::SeqCst), 2);

    // Completed uploads are terminal until reset.
    assert!(!h.studio.can_submit());
    h.studio.submit_upload().await;
    assert_eq!(h.client.upload_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_incorrect_login_is_reported_as_auth_failure() {
    let h = harness(MockClient::new(false, ConnectionState::IncorrectLogin));

    h.studio
        .acquire_streams(&CaptureSettings::default())
        .await
        .unwrap();
    h.studio.start_recording().await.unwrap();
    h.studio.stop_recording().await.unwrap();
    set_metadata(&h.studio, "Lecture 1", "Ada");

    h.studio.submit_upload().await;

    let status = h.studio.store().upload_status();
    assert_eq!(status.state, UploadState::Error);
    assert!(status.error.unwrap().contains("login"));
}

#[tokio::test]
async fn test_unreachable_server_is_reported_generically() {
    let h = harness(MockClient::new(false, ConnectionState::NetworkError));

    h.studio
        .acquire_streams(&CaptureSettings::default())
        .await
        .unwrap();
    h.studio.start_recording().await.unwrap();
    h.studio.stop_recording().await.unwrap();
    set_metadata(&h.studio, "Lecture 1", "Ada");

    h.studio.submit_upload().await;

    let status = h.studio.store().upload_status();
    assert_eq!(status.state, UploadState::Error);
    assert!(status.error.unwrap().contains("reached"));
}

#[tokio::test]
async fn test_unconfigured_client_blocks_submission() {
    let mut client = MockClient::new(true, ConnectionState::Unconfigured);
    client.ready = false;
    let h = harness(client);

    h.studio
        .acquire_streams(&CaptureSettings::default())
        .await
        .unwrap();
    h.studio.start_recording().await.unwrap();
    h.studio.stop_recording().await.unwrap();
    set_metadata(&h.studio, "Lecture 1", "Ada");

    assert!(!h.studio.can_submit());
}
