//! Error types and handling
//!
//! Crate-wide error taxonomy shared across the device, recorder, and upload
//! concerns.

use crate::device::traits::DeviceError;
use crate::recorder::channel::RecorderError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum StudioError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Recorder(#[from] RecorderError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("authentication rejected by remote server")]
    Auth,

    #[error("remote server unreachable: {0}")]
    Connectivity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error code/message pair for embedding UIs
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<StudioError> for ErrorResponse {
    fn from(error: StudioError) -> Self {
        let code = match &error {
            StudioError::Device(DeviceError::DeviceUnavailable(_)) => "DEVICE_UNAVAILABLE",
            StudioError::Device(DeviceError::PermissionDenied(_)) => "PERMISSION_DENIED",
            StudioError::Recorder(_) => "RECORDER_ERROR",
            StudioError::Validation(_) => "VALIDATION_ERROR",
            StudioError::Auth => "AUTH_ERROR",
            StudioError::Connectivity(_) => "CONNECTIVITY_ERROR",
            StudioError::Io(_) => "IO_ERROR",
            StudioError::Serialization(_) => "SERIALIZATION_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using StudioError
pub type StudioResult<T> = Result<T, StudioError>;
