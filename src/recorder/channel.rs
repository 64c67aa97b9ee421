//! Per-device recorder trait
//!
//! A recorder converts one live stream into exactly one finished recording.
//! Concrete recorders live in the capture backend alongside the stream
//! source; the controller only drives the lifecycle.

use super::state::Recording;
use crate::device::stream::{DeviceKind, StreamHandle};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from recorder lifecycle operations
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("recording already in progress")]
    AlreadyRecording,

    #[error("no recording in progress")]
    NotRecording,

    #[error("no live capture stream available")]
    NoLiveStreams,

    #[error("all recorders failed to start")]
    AllRecordersFailed,

    #[error("stream is no longer live")]
    StreamLost,

    #[error("recorder failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for recorder operations
pub type RecorderResult<T> = Result<T, RecorderError>;

/// Converts one live device stream into a finished recording.
#[async_trait]
pub trait DeviceRecorder: Send {
    /// Kind of device this recorder is bound to
    fn device_kind(&self) -> DeviceKind;

    /// Begin capturing from the bound stream
    async fn start(&mut self) -> RecorderResult<()>;

    /// Suspend capture without discarding buffered data
    async fn pause(&mut self) -> RecorderResult<()>;

    /// Resume a paused capture
    async fn resume(&mut self) -> RecorderResult<()>;

    /// Stop capture, flush buffers, and produce the finished recording
    async fn stop(&mut self) -> RecorderResult<Recording>;

    /// Whether the recorder is currently capturing
    fn is_recording(&self) -> bool;
}

/// Builds recorders for live streams.
///
/// Implemented by the capture backend next to its stream source.
pub trait RecorderFactory: Send + Sync {
    fn recorder(&self, stream: &StreamHandle) -> RecorderResult<Box<dyn DeviceRecorder>>;
}
