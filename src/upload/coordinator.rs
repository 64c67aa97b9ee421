//! Upload coordinator
//!
//! Validates metadata, sequences the remote upload call, classifies the
//! outcome, and writes it back into the session store. At most one attempt
//! is in flight at a time.

use super::client::{ConnectionState, RemoteServerClient, UploadPayload};
use crate::store::{SessionAction, SharedStore, UploadState};
use crate::studio::StepNavigator;
use std::sync::Arc;

/// Message shown when required metadata is missing
pub const MSG_METADATA_INVALID: &str =
    "Please fill in both a title and a presenter name before uploading.";

/// Message shown when the server rejects the configured credentials
pub const MSG_LOGIN_FAILED: &str =
    "Upload failed: the remote server rejected the configured login credentials.";

/// Message shown for any other failed upload attempt
pub const MSG_SERVER_UNREACHABLE: &str =
    "Upload failed: the remote server could not be reached. Check your connection and try again.";

/// Drives one upload attempt at a time against the remote server.
pub struct UploadCoordinator {
    client: Arc<dyn RemoteServerClient>,
    store: SharedStore,
    navigator: Arc<dyn StepNavigator>,
}

impl UploadCoordinator {
    pub fn new(
        client: Arc<dyn RemoteServerClient>,
        store: SharedStore,
        navigator: Arc<dyn StepNavigator>,
    ) -> Self {
        Self {
            client,
            store,
            navigator,
        }
    }

    /// True when an upload may be attempted right now: the client is
    /// configured, at least one recording exists, and no attempt is in
    /// flight or already completed.
    pub fn can_submit(&self) -> bool {
        let snapshot = self.store.snapshot();
        self.client.is_ready_to_upload()
            && !snapshot.recordings.is_empty()
            && !matches!(
                snapshot.upload.state,
                UploadState::Uploading | UploadState::Uploaded
            )
    }

    /// Run one upload attempt.
    ///
    /// Validation failures never reach the network. Completions of an
    /// attempt whose session was reset in the meantime are discarded.
    pub async fn submit(&self) {
        let snapshot = self.store.snapshot();
        let epoch = snapshot.epoch;

        if matches!(
            snapshot.upload.state,
            UploadState::Uploading | UploadState::Uploaded
        ) {
            tracing::debug!("submit ignored, upload is {:?}", snapshot.upload.state);
            return;
        }

        if !snapshot.metadata.is_complete() {
            tracing::warn!("upload rejected: missing title or presenter");
            self.store
                .dispatch(SessionAction::UploadError(MSG_METADATA_INVALID.to_string()));
            return;
        }

        self.store.dispatch(SessionAction::UploadRequest);
        self.store.dispatch(SessionAction::UploadStart);

        let payload = UploadPayload {
            recordings: snapshot.recordings,
            title: snapshot.metadata.title.clone(),
            creator: snapshot.metadata.presenter.clone(),
        };
        tracing::info!(
            "uploading {} recording(s) as \"{}\"",
            payload.recordings.len(),
            payload.title
        );

        let success = self.client.upload(payload).await;

        if success {
            if self.store.dispatch_at(epoch, SessionAction::UploadSuccess) {
                tracing::info!("upload complete");
                self.navigator.next_step();
            }
            return;
        }

        let message = match self.client.connection_state() {
            ConnectionState::IncorrectLogin => MSG_LOGIN_FAILED,
            _ => MSG_SERVER_UNREACHABLE,
        };
        self.store
            .dispatch_at(epoch, SessionAction::UploadFailure(message.to_string()));
    }
}
