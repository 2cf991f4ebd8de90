// Media engine abstraction driven by the playback controller

use crate::error::Result;
use crate::event::EngineCallback;
use crate::state::VideoSize;
use std::sync::Arc;

/// Opaque token identifying a renderable display target.
///
/// The windowing host owns the actual surface object; engines only need a
/// stable identity to attach their output to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayHandle(u64);

impl DisplayHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Media decoding/playback engine
/// All engine integrations must implement this trait
pub trait MediaEngine: Send {
    /// Attach engine output to a display target
    fn set_display(&mut self, display: DisplayHandle);

    /// Set a callback for engine events
    fn set_callback(&mut self, callback: Option<Arc<dyn EngineCallback>>);

    /// Begin preparing the given source. Completion is reported through
    /// [`crate::event::EngineEvent::Prepared`], not the return value.
    fn prepare(&mut self, source: &str) -> Result<()>;

    /// Start or resume playback
    fn start(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self) -> Result<()>;

    /// Stop playback
    fn stop(&mut self) -> Result<()>;

    /// Seek to a position (in milliseconds)
    fn seek(&mut self, position_ms: u64) -> Result<()>;

    /// Release all engine resources. Infallible; a released engine emits no
    /// further events.
    fn release(&mut self);

    /// Total duration in milliseconds, 0 while unknown
    fn duration_ms(&self) -> u64;

    /// Current playback position in milliseconds
    fn position_ms(&self) -> u64;

    /// Whether the engine is actively producing frames
    fn is_playing(&self) -> bool;

    /// Buffered share of a streamed source, 0..=100
    fn buffer_percent(&self) -> u8;

    /// Natural video dimensions, 0x0 while unknown
    fn video_size(&self) -> VideoSize;

    /// Downcast to concrete type (for accessing engine-specific features)
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Media engine factory trait
/// Allows the controller to create a fresh engine per session
pub trait EngineFactory: Send {
    fn create_engine(&self) -> Result<Box<dyn MediaEngine>>;
}
