// One open-source-to-release lifetime of the engine binding

use kinoview_core::{Capabilities, MediaEngine};

/// Binds one source to one engine instance, together with per-session caches.
///
/// The generation id distinguishes events of this session from late events of
/// a torn-down predecessor.
pub(crate) struct PlaybackSession {
    pub(crate) generation: u64,
    pub(crate) source: String,
    pub(crate) engine: Box<dyn MediaEngine>,
    pub(crate) cached_duration: Option<u64>,
    pub(crate) buffer_percent: u8,
    pub(crate) capabilities: Capabilities,
}

impl PlaybackSession {
    pub(crate) fn new(generation: u64, source: String, engine: Box<dyn MediaEngine>) -> Self {
        Self {
            generation,
            source,
            engine,
            cached_duration: None,
            buffer_percent: 0,
            capabilities: Capabilities::default(),
        }
    }
}
