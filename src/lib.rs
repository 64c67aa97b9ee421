//! studio-core - Recording session and upload orchestration for lecture
//! capture.
//!
//! The crate captures a display stream and a user-facing stream through a
//! pluggable capture backend, drives the recording session state machine,
//! and hands finished recordings to an upload coordinator that talks to a
//! remote media server with login/connectivity-aware failure
//! classification. Presentation is left to the embedding application,
//! which plugs in through the `StepNavigator` callbacks and observes the
//! session store.

pub mod config;
pub mod device;
pub mod recorder;
pub mod store;
pub mod studio;
pub mod upload;
pub mod utils;

pub use config::{CaptureSettings, ServerSettings, StudioSettings};
pub use device::{
    DeviceError, DeviceKind, DeviceResult, DeviceStreamManager, MediaFeed, StreamEvent,
    StreamHandle, StreamId, StreamSource,
};
pub use recorder::{
    DeviceRecorder, RecorderError, RecorderFactory, RecorderResult, Recording,
    RecordingSessionController, RecordingState, SessionEvent,
};
pub use store::{
    Metadata, SessionAction, SessionState, SessionStore, SharedStore, UploadState, UploadStatus,
};
pub use studio::{StepNavigator, Studio};
pub use upload::{ConnectionState, RemoteServerClient, UploadCoordinator, UploadPayload};
pub use utils::error::{ErrorResponse, StudioError, StudioResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for embedding applications.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
