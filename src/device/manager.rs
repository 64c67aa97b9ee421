//! Device stream manager
//!
//! Acquires and releases the display and user-facing capture streams and
//! guarantees at most one live stream per device kind. Liveness changes are
//! broadcast so the recording controller can react to unexpected device
//! loss.

use super::stream::{DeviceKind, DeviceStream, StreamHandle, StreamId};
use super::traits::{DeviceResult, StreamSource};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Liveness changes observable by the recording controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// A stream was acquired
    Acquired(DeviceKind),
    /// A stream was released on request
    Released(DeviceKind),
    /// The device disappeared mid-session (unplugged, permission revoked)
    Lost(DeviceKind),
}

/// Owns the live capture streams, keyed by device kind.
pub struct DeviceStreamManager {
    source: Arc<dyn StreamSource>,
    streams: RwLock<HashMap<DeviceKind, DeviceStream>>,
    event_tx: broadcast::Sender<StreamEvent>,
}

impl DeviceStreamManager {
    pub fn new(source: Arc<dyn StreamSource>) -> Self {
        let (event_tx, _) = broadcast::channel(16);
        Self {
            source,
            streams: RwLock::new(HashMap::new()),
            event_tx,
        }
    }

    /// Subscribe to stream liveness events
    pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.event_tx.subscribe()
    }

    /// Acquire the display stream, releasing any prior display handle first.
    pub async fn acquire_display(&self) -> DeviceResult<StreamHandle> {
        self.acquire(DeviceKind::Display).await
    }

    /// Acquire the user-facing stream, releasing any prior user handle first.
    pub async fn acquire_user(&self) -> DeviceResult<StreamHandle> {
        self.acquire(DeviceKind::User).await
    }

    async fn acquire(&self, kind: DeviceKind) -> DeviceResult<StreamHandle> {
        // A second acquisition for the same kind replaces the prior handle.
        if let Some(prior) = self.streams.write().remove(&kind) {
            tracing::debug!("releasing prior {} stream {}", kind, prior.id());
            prior.mark_dead();
            self.source.close(kind);
            let _ = self.event_tx.send(StreamEvent::Released(kind));
        }

        let feed = self.source.open(kind).await.map_err(|e| {
            tracing::warn!("failed to acquire {} stream: {}", kind, e);
            e
        })?;

        let stream = DeviceStream::new(kind, feed.mime_type, feed.device_label);
        let handle = stream.handle();
        tracing::info!("acquired {} stream {}", kind, stream.id());
        self.streams.write().insert(kind, stream);
        let _ = self.event_tx.send(StreamEvent::Acquired(kind));
        Ok(handle)
    }

    /// Release the stream with the given id, if it is still held.
    pub fn release(&self, id: StreamId) {
        let mut streams = self.streams.write();
        let kind = streams
            .iter()
            .find(|(_, s)| s.id() == id)
            .map(|(kind, _)| *kind);

        if let Some(kind) = kind {
            if let Some(stream) = streams.remove(&kind) {
                stream.mark_dead();
                self.source.close(kind);
                tracing::info!("released {} stream {}", kind, id);
                let _ = self.event_tx.send(StreamEvent::Released(kind));
            }
        }
    }

    /// Release every held stream (session teardown).
    pub fn release_all(&self) {
        let drained: Vec<DeviceStream> = self
            .streams
            .write()
            .drain()
            .map(|(_, stream)| stream)
            .collect();

        for stream in drained {
            stream.mark_dead();
            self.source.close(stream.kind());
            tracing::info!("released {} stream {}", stream.kind(), stream.id());
            let _ = self.event_tx.send(StreamEvent::Released(stream.kind()));
        }
    }

    /// Whether the stream with the given id is held and live
    pub fn is_live(&self, id: StreamId) -> bool {
        self.streams
            .read()
            .values()
            .any(|s| s.id() == id && s.is_live())
    }

    /// Handles for every currently live stream
    pub fn live_streams(&self) -> Vec<StreamHandle> {
        self.streams
            .read()
            .values()
            .filter(|s| s.is_live())
            .map(|s| s.handle())
            .collect()
    }

    /// Report that a device disappeared out from under us.
    ///
    /// Flips the stream's liveness flag and notifies subscribers. The dead
    /// stream stays registered until released so `is_live` keeps answering
    /// for stale ids.
    pub fn mark_lost(&self, id: StreamId) {
        let streams = self.streams.read();
        if let Some(stream) = streams.values().find(|s| s.id() == id) {
            stream.mark_dead();
            tracing::warn!("{} stream {} lost", stream.kind(), id);
            let _ = self.event_tx.send(StreamEvent::Lost(stream.kind()));
        }
    }
}
