// Renderable surface abstraction layer

use kinoview_core::{DisplayHandle, MediaEngine, Result, VideoSize};

/// Lifecycle event emitted by the windowing host for a render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A surface exists and can accept engine output
    Created(DisplayHandle),

    /// The surface was resized (dimensions in pixels)
    Changed { width: u32, height: u32 },

    /// The surface is gone; engine output must detach
    Destroyed,
}

/// Renderable surface trait
/// Platform windowing integrations implement this trait
pub trait Surface: Send {
    /// Stable identity of the underlying display target
    fn display_handle(&self) -> DisplayHandle;

    /// Current surface dimensions, 0x0 before the first size report
    fn size(&self) -> VideoSize;

    /// Attach a media engine's output to this surface
    fn bind(&self, engine: &mut dyn MediaEngine) -> Result<()> {
        engine.set_display(self.display_handle());
        Ok(())
    }
}

/// Tracks whether a surface currently exists and its last known dimensions.
///
/// The controller gates playback start on a size match between the bound
/// surface and the media's natural dimensions, so the binding keeps both the
/// handle and the most recent size report.
#[derive(Debug, Default)]
pub struct SurfaceBinding {
    handle: Option<DisplayHandle>,
    width: u32,
    height: u32,
}

impl SurfaceBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface was created; dimensions arrive with the first change report
    pub fn attach(&mut self, handle: DisplayHandle) {
        log::debug!("surface attached: {:?}", handle);
        self.handle = Some(handle);
    }

    /// Record the latest surface dimensions
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// The surface is gone; forget handle and dimensions
    pub fn detach(&mut self) {
        log::debug!("surface detached");
        self.handle = None;
        self.width = 0;
        self.height = 0;
    }

    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<DisplayHandle> {
        self.handle
    }

    pub fn size(&self) -> VideoSize {
        VideoSize::new(self.width, self.height)
    }

    /// Whether the bound surface exactly matches the given natural size
    pub fn matches(&self, natural: VideoSize) -> bool {
        self.is_bound() && self.size() == natural
    }
}
