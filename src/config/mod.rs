//! Configuration
//!
//! Settings document for server connection and capture preferences.

pub mod settings;

pub use settings::{CaptureSettings, ServerSettings, StudioSettings};
