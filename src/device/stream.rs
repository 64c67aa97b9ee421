//! Device stream types
//!
//! A stream is one live capture source. The manager owns the stream; the
//! recording controller only ever holds non-owning handles, so liveness is
//! shared through an atomic flag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for an acquired stream
pub type StreamId = Uuid;

/// Kind of capture device behind a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Screen/display capture
    Display,
    /// User-facing camera and microphone capture
    User,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Display => write!(f, "display"),
            DeviceKind::User => write!(f, "user"),
        }
    }
}

/// A live capture source, owned exclusively by the stream manager.
#[derive(Debug)]
pub struct DeviceStream {
    id: StreamId,
    kind: DeviceKind,
    mime_type: String,
    device_label: Option<String>,
    live: Arc<AtomicBool>,
}

impl DeviceStream {
    pub(crate) fn new(kind: DeviceKind, mime_type: String, device_label: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            mime_type,
            device_label,
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_dead(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    /// Create a non-owning handle to this stream
    pub fn handle(&self) -> StreamHandle {
        StreamHandle {
            id: self.id,
            kind: self.kind,
            mime_type: self.mime_type.clone(),
            device_label: self.device_label.clone(),
            live: self.live.clone(),
        }
    }
}

/// Non-owning reference to a live stream, used to start a recorder.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    id: StreamId,
    kind: DeviceKind,
    mime_type: String,
    device_label: Option<String>,
    live: Arc<AtomicBool>,
}

impl StreamHandle {
    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// MIME/container type the backing source captures into
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Human-readable device name, if the source reported one
    pub fn device_label(&self) -> Option<&str> {
        self.device_label.as_deref()
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}
