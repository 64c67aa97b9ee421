//! Recording state management
//!
//! Defines the recording state machine states and the finished-recording
//! record.

use crate::device::stream::DeviceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Current state of the recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No recording in progress
    Inactive,
    /// Currently recording
    Recording,
    /// Recording is paused
    Paused,
}

impl Default for RecordingState {
    fn default() -> Self {
        Self::Inactive
    }
}

/// Immutable record produced when a device's capture stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// Unique id of this recording
    pub id: Uuid,

    /// Device the recording came from
    pub device_kind: DeviceKind,

    /// MIME/container type of the payload
    pub mime_type: String,

    /// Finished byte payload
    #[serde(skip)]
    pub media: Arc<Vec<u8>>,

    /// Playback reference (object URL, file path, ...)
    pub media_url: String,

    /// When the recording finished
    pub created_at: DateTime<Utc>,
}

impl Recording {
    pub fn new(
        device_kind: DeviceKind,
        mime_type: impl Into<String>,
        media: Vec<u8>,
        media_url: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            device_kind,
            mime_type: mime_type.into(),
            media: Arc::new(media),
            media_url: media_url.into(),
            created_at: Utc::now(),
        }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.media.len()
    }

    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }
}

/// One span of active recording between start/resume and pause/stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSegment {
    /// Segment index (0, 1, 2, ...)
    pub index: usize,

    /// Duration of this segment in milliseconds
    pub duration_ms: f64,

    /// Process time when the segment started
    pub process_time_start_ms: f64,

    /// Process time when the segment ended
    pub process_time_end_ms: f64,
}

impl SessionSegment {
    /// Create a new segment starting now
    pub fn new(index: usize, process_time_ms: f64) -> Self {
        Self {
            index,
            duration_ms: 0.0,
            process_time_start_ms: process_time_ms,
            process_time_end_ms: process_time_ms,
        }
    }

    /// End the segment
    pub fn end(&mut self, process_time_ms: f64) {
        self.process_time_end_ms = process_time_ms;
        self.duration_ms = self.process_time_end_ms - self.process_time_start_ms;
    }
}
