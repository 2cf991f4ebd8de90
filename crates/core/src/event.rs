// Engine event channel: one tagged variant per engine notification

/// Engine error codes forwarded through [`EngineEvent::Error`].
///
/// Numeric values follow the media framework convention the original display
/// widget consumed, so host-side handlers can keep their switch tables.
pub mod error_code {
    /// Unspecified engine failure
    pub const UNKNOWN: i32 = 1;
    /// Media service process died
    pub const SERVER_DIED: i32 = 100;
    /// Container not valid for progressive playback
    pub const NOT_VALID_FOR_PROGRESSIVE_PLAYBACK: i32 = 200;
    /// File or network I/O error
    pub const IO: i32 = -1004;
}

/// Event emitted by a media engine during the lifetime of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Asynchronous preparation finished
    Prepared,

    /// Playback reached the natural end of the media
    Completed,

    /// Decode or I/O failure
    Error { code: i32 },

    /// Download/buffer progress for streamed sources
    BufferingUpdate { percent: u8 },

    /// A previously issued seek finished
    SeekComplete,

    /// The engine discovered or changed the natural video dimensions
    VideoSizeChanged { width: u32, height: u32 },
}

/// Engine event callback trait
/// Implementations should be lightweight and non-blocking
pub trait EngineCallback: Send + Sync {
    /// Called when an event occurs
    fn on_event(&self, event: EngineEvent);
}
