//! Recording session module
//!
//! This module implements the recording side of the workflow:
//! - DeviceRecorder trait for per-device recorders
//! - RecordingSessionController driving the session state machine
//! - Finished Recording records emitted into the session store

pub mod channel;
pub mod controller;
pub mod state;

pub use channel::{DeviceRecorder, RecorderError, RecorderFactory, RecorderResult};
pub use controller::{RecordingSessionController, SessionEvent};
pub use state::{Recording, RecordingState, SessionSegment};
