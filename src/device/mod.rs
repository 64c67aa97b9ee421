//! Device stream acquisition
//!
//! This module owns the live capture streams:
//! - StreamSource trait implemented by the concrete capture backend
//! - DeviceStreamManager enforcing one live stream per device kind
//! - Non-owning StreamHandle references used by the recording controller

pub mod manager;
pub mod stream;
pub mod traits;

pub use manager::{DeviceStreamManager, StreamEvent};
pub use stream::{DeviceKind, DeviceStream, StreamHandle, StreamId};
pub use traits::{DeviceError, DeviceResult, MediaFeed, StreamSource};
