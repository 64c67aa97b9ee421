//! Capture source trait definitions
//!
//! The seam between the orchestration core and a concrete capture backend.
//! Backends classify acquisition failures instead of collapsing them into a
//! boolean so callers can react per cause.

use super::stream::DeviceKind;
use async_trait::async_trait;
use thiserror::Error;

/// Classified stream acquisition failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// No matching device present, or the device is busy
    #[error("no {0} capture device available")]
    DeviceUnavailable(DeviceKind),

    /// The user or platform denied access to the device
    #[error("permission denied for {0} capture")]
    PermissionDenied(DeviceKind),
}

/// Result type alias for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Descriptor of a raw feed opened by a capture backend.
#[derive(Debug, Clone)]
pub struct MediaFeed {
    /// MIME/container type the backend records into
    pub mime_type: String,

    /// Human-readable device name, if known
    pub device_label: Option<String>,
}

/// Asynchronous capture backend.
///
/// At most one feed per device kind is open at a time, so `kind` is enough
/// to identify the feed on `close`.
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Open a live feed for the given device kind
    async fn open(&self, kind: DeviceKind) -> DeviceResult<MediaFeed>;

    /// Close the feed for the given device kind. Best-effort
    fn close(&self, kind: DeviceKind);
}
