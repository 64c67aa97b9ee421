//! Remote server client contract
//!
//! Abstract capability the upload coordinator drives. Implementations own
//! the wire format, authentication, and connection settings; the core only
//! needs success/failure plus a connection state to classify failures.

use crate::recorder::state::Recording;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Connection status reported by the remote client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    /// Connected and authenticated
    LoggedIn,
    /// The server rejected the configured credentials
    IncorrectLogin,
    /// The server could not be reached
    NetworkError,
    /// No connection settings configured yet
    Unconfigured,
}

/// Payload handed to the remote client for one upload attempt
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// Finished recordings to ingest
    pub recordings: Vec<Recording>,

    /// Title of the event
    pub title: String,

    /// Name of the presenter
    pub creator: String,
}

/// Remote media server the finished recordings are uploaded to.
#[async_trait]
pub trait RemoteServerClient: Send + Sync {
    /// True when connection settings are configured
    fn is_ready_to_upload(&self) -> bool;

    /// Upload the payload.
    ///
    /// Returns false for ordinary network/auth failures instead of erroring;
    /// the coordinator classifies the cause via [`Self::connection_state`].
    async fn upload(&self, payload: UploadPayload) -> bool;

    /// Connection status; queried after a failed upload to classify the cause
    fn connection_state(&self) -> ConnectionState;

    /// Display form of the configured server URL, if any
    fn pretty_server_url(&self) -> Option<String>;
}
