//! Upload pipeline
//!
//! This module hands finished recordings to the remote media server:
//! - RemoteServerClient trait for the concrete server implementation
//! - UploadCoordinator sequencing validation, the network call, and
//!   failure classification

pub mod client;
pub mod coordinator;

pub use client::{ConnectionState, RemoteServerClient, UploadPayload};
pub use coordinator::{
    UploadCoordinator, MSG_LOGIN_FAILED, MSG_METADATA_INVALID, MSG_SERVER_UNREACHABLE,
};
