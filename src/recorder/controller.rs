//! Recording session controller
//!
//! Owns the recording state machine and the per-device recorders bound to
//! the live streams. Finished recordings are appended to the session store;
//! losing the last live stream forces the session back to inactive.

use super::channel::{DeviceRecorder, RecorderError, RecorderFactory, RecorderResult};
use super::state::{Recording, RecordingState, SessionSegment};
use crate::device::stream::{DeviceKind, StreamHandle};
use crate::store::{SessionAction, SharedStore};
use crate::studio::StepNavigator;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

/// Events emitted during a recording session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Recording started
    Started,
    /// Recording paused
    Paused,
    /// Recording resumed
    Resumed,
    /// Recording stopped; this many recordings were produced
    Stopped(usize),
    /// Every live stream was lost and the session was forced inactive
    StreamLost,
    /// Error occurred
    Error(String),
}

/// Drives the per-device recorders through the session state machine.
pub struct RecordingSessionController {
    /// Current session state
    state: Arc<RwLock<RecordingState>>,

    /// Builds a recorder per live stream
    factory: Arc<dyn RecorderFactory>,

    /// Destination for finished recordings
    store: SharedStore,

    /// Presentation-layer navigation callbacks
    navigator: Arc<dyn StepNavigator>,

    /// Active recorders, one per successfully started device
    recorders: Vec<Box<dyn DeviceRecorder>>,

    /// Non-owning references to the session's streams
    streams: Vec<StreamHandle>,

    /// Recording segments (one per pause/resume cycle)
    segments: Vec<SessionSegment>,

    /// Current segment index
    current_segment: usize,

    /// Time when recording started
    start_time: Option<Instant>,

    /// Event broadcaster
    event_tx: broadcast::Sender<SessionEvent>,
}

impl RecordingSessionController {
    pub fn new(
        factory: Arc<dyn RecorderFactory>,
        store: SharedStore,
        navigator: Arc<dyn StepNavigator>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(32);
        Self {
            state: Arc::new(RwLock::new(RecordingState::Inactive)),
            factory,
            store,
            navigator,
            recorders: Vec::new(),
            streams: Vec::new(),
            segments: Vec::new(),
            current_segment: 0,
            start_time: None,
            event_tx,
        }
    }

    /// Get the current session state
    pub fn state(&self) -> RecordingState {
        *self.state.read()
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    fn process_time_ms(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    /// Start recording on the given streams.
    ///
    /// Requires at least one live stream. A recorder that fails to start is
    /// non-fatal: that device is omitted from the session. If every recorder
    /// fails, the session stays inactive and an error is returned.
    pub async fn start(&mut self, streams: Vec<StreamHandle>) -> RecorderResult<()> {
        if *self.state.read() != RecordingState::Inactive {
            return Err(RecorderError::AlreadyRecording);
        }

        let live: Vec<StreamHandle> = streams.into_iter().filter(|s| s.is_live()).collect();
        if live.is_empty() {
            return Err(RecorderError::NoLiveStreams);
        }

        let mut recorders = Vec::new();
        for stream in &live {
            match self.factory.recorder(stream) {
                Ok(mut recorder) => match recorder.start().await {
                    Ok(()) => {
                        tracing::info!("recorder started for {} stream", stream.kind());
                        recorders.push(recorder);
                    }
                    Err(e) => {
                        tracing::warn!("recorder for {} stream failed to start: {}", stream.kind(), e);
                    }
                },
                Err(e) => {
                    tracing::warn!("no recorder available for {} stream: {}", stream.kind(), e);
                }
            }
        }

        if recorders.is_empty() {
            let _ = self
                .event_tx
                .send(SessionEvent::Error("all recorders failed to start".to_string()));
            return Err(RecorderError::AllRecordersFailed);
        }

        self.recorders = recorders;
        self.streams = live;
        self.start_time = Some(Instant::now());
        self.current_segment = 0;
        self.segments.clear();
        self.segments.push(SessionSegment::new(0, 0.0));

        *self.state.write() = RecordingState::Recording;
        let _ = self.event_tx.send(SessionEvent::Started);
        tracing::info!("recording started with {} device(s)", self.recorders.len());
        Ok(())
    }

    /// Suspend all active recorders without discarding buffered data.
    pub async fn pause(&mut self) -> RecorderResult<()> {
        if *self.state.read() != RecordingState::Recording {
            return Err(RecorderError::NotRecording);
        }

        let end_time = self.process_time_ms();
        if let Some(segment) = self.segments.last_mut() {
            segment.end(end_time);
        }

        for recorder in &mut self.recorders {
            recorder.pause().await?;
        }

        *self.state.write() = RecordingState::Paused;
        let _ = self.event_tx.send(SessionEvent::Paused);
        tracing::info!("recording paused");
        Ok(())
    }

    /// Resume all paused recorders.
    pub async fn resume(&mut self) -> RecorderResult<()> {
        if *self.state.read() != RecordingState::Paused {
            return Err(RecorderError::NotRecording);
        }

        self.current_segment += 1;
        let segment = SessionSegment::new(self.current_segment, self.process_time_ms());
        self.segments.push(segment);

        for recorder in &mut self.recorders {
            recorder.resume().await?;
        }

        *self.state.write() = RecordingState::Recording;
        let _ = self.event_tx.send(SessionEvent::Resumed);
        tracing::info!("recording resumed");
        Ok(())
    }

    /// Stop all recorders.
    ///
    /// Each active recorder flushes to exactly one finished recording, which
    /// is appended to the session store. A recorder that fails to flush is
    /// logged and omitted.
    pub async fn stop(&mut self) -> RecorderResult<Vec<Recording>> {
        let current = *self.state.read();
        if current == RecordingState::Inactive {
            return Err(RecorderError::NotRecording);
        }

        if current == RecordingState::Recording {
            let end_time = self.process_time_ms();
            if let Some(segment) = self.segments.last_mut() {
                segment.end(end_time);
            }
        }

        let mut recordings = Vec::new();
        for recorder in &mut self.recorders {
            let kind = recorder.device_kind();
            match recorder.stop().await {
                Ok(recording) => {
                    tracing::info!(
                        "{} recorder produced {} bytes ({})",
                        kind,
                        recording.len(),
                        recording.mime_type
                    );
                    self.store
                        .dispatch(SessionAction::AppendRecording(recording.clone()));
                    recordings.push(recording);
                }
                Err(e) => {
                    tracing::warn!("{} recorder failed to flush: {}", kind, e);
                }
            }
        }

        self.recorders.clear();
        self.streams.clear();
        self.start_time = None;
        *self.state.write() = RecordingState::Inactive;
        let _ = self.event_tx.send(SessionEvent::Stopped(recordings.len()));
        tracing::info!("recording stopped, {} recording(s) finished", recordings.len());
        Ok(recordings)
    }

    /// Abort the session without producing recordings.
    ///
    /// Recorders are stopped best-effort and their output discarded.
    pub async fn abort(&mut self) {
        if *self.state.read() == RecordingState::Inactive {
            return;
        }

        for mut recorder in self.recorders.drain(..) {
            let _ = recorder.stop().await;
        }
        self.streams.clear();
        self.start_time = None;
        *self.state.write() = RecordingState::Inactive;
        tracing::info!("recording session aborted");
    }

    /// React to a stream liveness change.
    ///
    /// Recorders bound to dead streams are aborted and their partial output
    /// discarded. If no live stream remains while recording or paused, the
    /// whole session is forced inactive and the caller is sent back to
    /// device selection.
    pub async fn handle_stream_lost(&mut self) {
        if *self.state.read() == RecordingState::Inactive {
            return;
        }

        let dead_kinds: Vec<DeviceKind> = self
            .streams
            .iter()
            .filter(|s| !s.is_live())
            .map(|s| s.kind())
            .collect();

        let mut kept = Vec::new();
        for mut recorder in self.recorders.drain(..) {
            if dead_kinds.contains(&recorder.device_kind()) {
                tracing::warn!("aborting {} recorder after stream loss", recorder.device_kind());
                let _ = recorder.stop().await;
            } else {
                kept.push(recorder);
            }
        }
        self.recorders = kept;
        self.streams.retain(|s| s.is_live());

        if !self.streams.is_empty() && !self.recorders.is_empty() {
            return;
        }

        tracing::warn!("all capture streams lost, forcing session inactive");
        self.abort().await;
        let _ = self.event_tx.send(SessionEvent::StreamLost);
        self.navigator.first_step();
    }

    /// Total recorded duration in milliseconds across pause/resume segments.
    pub fn duration_ms(&self) -> f64 {
        let completed: f64 = self
            .segments
            .iter()
            .take(self.segments.len().saturating_sub(1))
            .map(|s| s.duration_ms)
            .sum();

        let current = if *self.state.read() == RecordingState::Recording {
            self.segments
                .last()
                .map(|s| self.process_time_ms() - s.process_time_start_ms)
                .unwrap_or(0.0)
        } else {
            self.segments.last().map(|s| s.duration_ms).unwrap_or(0.0)
        };

        completed + current
    }
}
