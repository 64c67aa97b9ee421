//! Studio façade
//!
//! Wires the device manager, the recording controller, the session store,
//! and the upload coordinator into one recording-to-upload workflow, and
//! owns the watcher task that reacts to device loss.

use crate::config::CaptureSettings;
use crate::device::manager::{DeviceStreamManager, StreamEvent};
use crate::device::stream::StreamHandle;
use crate::device::traits::{DeviceError, StreamSource};
use crate::recorder::channel::{RecorderFactory, RecorderResult};
use crate::recorder::controller::RecordingSessionController;
use crate::recorder::state::{Recording, RecordingState};
use crate::store::{SessionAction, SessionStore, SharedStore};
use crate::upload::client::RemoteServerClient;
use crate::upload::coordinator::UploadCoordinator;
use crate::utils::error::StudioResult;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

/// Navigation callbacks implemented by the embedding presentation layer.
///
/// Invoked when the workflow has to move on its own: back to device
/// selection on stream loss, forward when a recording or upload finishes.
pub trait StepNavigator: Send + Sync {
    /// Jump back to the first step (device selection)
    fn first_step(&self);

    /// Go back one step
    fn previous_step(&self);

    /// Advance to the next step
    fn next_step(&self);
}

/// One recording-to-upload workflow.
#[derive(Clone)]
pub struct Studio {
    devices: Arc<DeviceStreamManager>,
    controller: Arc<Mutex<RecordingSessionController>>,
    store: SharedStore,
    uploader: Arc<UploadCoordinator>,
    navigator: Arc<dyn StepNavigator>,
}

impl Studio {
    pub fn new(
        source: Arc<dyn StreamSource>,
        factory: Arc<dyn RecorderFactory>,
        client: Arc<dyn RemoteServerClient>,
        navigator: Arc<dyn StepNavigator>,
    ) -> Self {
        let store = SessionStore::new();
        let devices = Arc::new(DeviceStreamManager::new(source));
        let controller = Arc::new(Mutex::new(RecordingSessionController::new(
            factory,
            store.clone(),
            navigator.clone(),
        )));
        let uploader = Arc::new(UploadCoordinator::new(
            client,
            store.clone(),
            navigator.clone(),
        ));
        Self {
            devices,
            controller,
            store,
            uploader,
            navigator,
        }
    }

    /// The session store, for observers and metadata updates
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// The device stream manager
    pub fn devices(&self) -> &DeviceStreamManager {
        &self.devices
    }

    /// Acquire the streams enabled in the capture settings.
    ///
    /// Per-device failures are logged individually; an error is returned
    /// only when no enabled device could be acquired.
    pub async fn acquire_streams(
        &self,
        capture: &CaptureSettings,
    ) -> StudioResult<Vec<StreamHandle>> {
        let mut handles = Vec::new();
        let mut first_error: Option<DeviceError> = None;

        if capture.display {
            match self.devices.acquire_display().await {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    tracing::warn!("display acquisition failed: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        if capture.user {
            match self.devices.acquire_user().await {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    tracing::warn!("user stream acquisition failed: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        if handles.is_empty() {
            if let Some(e) = first_error {
                return Err(e.into());
            }
        }
        Ok(handles)
    }

    /// Start recording on every currently live stream.
    pub async fn start_recording(&self) -> RecorderResult<()> {
        let streams = self.devices.live_streams();
        self.controller.lock().await.start(streams).await
    }

    /// Stop recording.
    ///
    /// Finished recordings land in the store and the workflow advances to
    /// the next step.
    pub async fn stop_recording(&self) -> RecorderResult<Vec<Recording>> {
        let recordings = self.controller.lock().await.stop().await?;
        self.navigator.next_step();
        Ok(recordings)
    }

    /// Pause the running recording.
    pub async fn pause_recording(&self) -> RecorderResult<()> {
        self.controller.lock().await.pause().await
    }

    /// Resume a paused recording.
    pub async fn resume_recording(&self) -> RecorderResult<()> {
        self.controller.lock().await.resume().await
    }

    /// Current state of the recording session
    pub async fn recording_state(&self) -> RecordingState {
        self.controller.lock().await.state()
    }

    /// True when an upload may be attempted right now
    pub fn can_submit(&self) -> bool {
        self.uploader.can_submit()
    }

    /// Run one upload attempt against the remote server.
    pub async fn submit_upload(&self) {
        self.uploader.submit().await;
    }

    /// Tear down the session and start over.
    ///
    /// Releases every device stream, aborts any running recording, resets
    /// the store to a new generation (so in-flight upload completions are
    /// discarded), and navigates back to the first step.
    pub async fn reset(&self) {
        self.controller.lock().await.abort().await;
        self.devices.release_all();
        self.store.dispatch(SessionAction::Reset);
        self.navigator.first_step();
    }

    /// Watch for stream loss and force the controller inactive when the
    /// last live stream disappears.
    pub fn spawn_stream_watcher(&self) -> JoinHandle<()> {
        let mut events = self.devices.subscribe();
        let controller = self.controller.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(StreamEvent::Lost(kind)) => {
                        tracing::debug!("handling loss of {} stream", kind);
                        controller.lock().await.handle_stream_lost().await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!("stream watcher lagged by {} event(s)", missed);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
