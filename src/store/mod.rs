//! Session store
//!
//! The single process-wide state container for a recording-to-upload
//! workflow. All mutation flows through [`SessionStore::dispatch`] as tagged
//! actions consumed by one reducer; actions are serialized and applied
//! atomically.

use crate::recorder::state::Recording;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Upload lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    /// No upload requested yet
    Idle,
    /// An upload was requested
    Requested,
    /// The network call is in flight
    Uploading,
    /// The upload completed; terminal until reset
    Uploaded,
    /// The upload was rejected or failed
    Error,
}

impl Default for UploadState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Upload state plus the error message while in error
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatus {
    pub state: UploadState,
    pub error: Option<String>,
}

/// User-entered metadata attached to an upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub presenter: String,
}

impl Metadata {
    /// Both fields must be non-empty before an upload may be attempted
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.presenter.is_empty()
    }
}

/// Actions consumed by the session reducer
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// Clear recordings, metadata, and upload state; starts a new generation
    Reset,

    /// Single writer entry point for the metadata fields
    UpdateMetadata {
        title: Option<String>,
        presenter: Option<String>,
    },

    /// Append a finished recording (idempotent by recording id)
    AppendRecording(Recording),

    /// An upload was requested; ignored while uploading or uploaded
    UploadRequest,

    /// The network call is about to be made
    UploadStart,

    /// The upload completed successfully
    UploadSuccess,

    /// The upload attempt failed (server or network)
    UploadFailure(String),

    /// The upload was rejected before any network call (validation)
    UploadError(String),
}

/// Snapshot of the full session state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Finished recordings, in completion order
    pub recordings: Vec<Recording>,

    /// Metadata for the upcoming upload
    pub metadata: Metadata,

    /// Current upload status
    pub upload: UploadStatus,

    /// Generation counter, bumped on every reset
    pub epoch: u64,
}

/// Reducer-style state container, created once per user session.
#[derive(Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
}

/// Shared handle to the session store
pub type SharedStore = Arc<SessionStore>;

impl SessionStore {
    pub fn new() -> SharedStore {
        Arc::new(Self::default())
    }

    /// Apply an action to the store.
    pub fn dispatch(&self, action: SessionAction) {
        let mut state = self.state.write();
        Self::reduce(&mut state, action);
    }

    /// Apply an action only if the store is still in the given generation.
    ///
    /// Used by asynchronous completions so a reset session is never
    /// resurrected by a stale result. Returns false when the action was
    /// discarded.
    pub fn dispatch_at(&self, epoch: u64, action: SessionAction) -> bool {
        let mut state = self.state.write();
        if state.epoch != epoch {
            tracing::debug!("discarding stale {:?} from generation {}", action, epoch);
            return false;
        }
        Self::reduce(&mut state, action);
        true
    }

    fn reduce(state: &mut SessionState, action: SessionAction) {
        match action {
            SessionAction::Reset => {
                tracing::info!("session reset");
                let epoch = state.epoch + 1;
                *state = SessionState {
                    epoch,
                    ..SessionState::default()
                };
            }
            SessionAction::UpdateMetadata { title, presenter } => {
                if let Some(title) = title {
                    state.metadata.title = title;
                }
                if let Some(presenter) = presenter {
                    state.metadata.presenter = presenter;
                }
            }
            SessionAction::AppendRecording(recording) => {
                if state.recordings.iter().any(|r| r.id == recording.id) {
                    return;
                }
                tracing::debug!(
                    "recording {} added ({}, {} bytes)",
                    recording.id,
                    recording.mime_type,
                    recording.len()
                );
                state.recordings.push(recording);
            }
            SessionAction::UploadRequest => match state.upload.state {
                UploadState::Uploading | UploadState::Uploaded => {
                    tracing::debug!("upload request ignored in state {:?}", state.upload.state);
                }
                _ => {
                    state.upload = UploadStatus {
                        state: UploadState::Requested,
                        error: None,
                    };
                }
            },
            SessionAction::UploadStart => {
                if state.upload.state == UploadState::Requested {
                    state.upload.state = UploadState::Uploading;
                }
            }
            SessionAction::UploadSuccess => {
                state.upload = UploadStatus {
                    state: UploadState::Uploaded,
                    error: None,
                };
            }
            SessionAction::UploadFailure(message) => {
                tracing::error!("upload failed: {}", message);
                state.upload = UploadStatus {
                    state: UploadState::Error,
                    error: Some(message),
                };
            }
            SessionAction::UploadError(message) => {
                tracing::warn!("upload rejected: {}", message);
                state.upload = UploadStatus {
                    state: UploadState::Error,
                    error: Some(message),
                };
            }
        }
    }

    /// Clone of the full current state
    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn upload_status(&self) -> UploadStatus {
        self.state.read().upload.clone()
    }

    pub fn metadata(&self) -> Metadata {
        self.state.read().metadata.clone()
    }

    pub fn recordings(&self) -> Vec<Recording> {
        self.state.read().recordings.clone()
    }

    /// Current store generation
    pub fn epoch(&self) -> u64 {
        self.state.read().epoch
    }
}
