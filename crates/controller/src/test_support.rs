// Recording test doubles for the engine, factory, and observer seams

use kinoview_core::{
    ControllerObserver, DisplayHandle, EngineCallback, EngineFactory, MediaEngine, PlaybackError,
    Result, VideoSize,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
pub(crate) struct MockEngineState {
    pub prepares: Vec<String>,
    pub starts: usize,
    pub pauses: usize,
    pub stops: usize,
    pub releases: usize,
    pub seeks: Vec<u64>,
    pub displays: Vec<DisplayHandle>,
    pub duration_queries: usize,
    pub playing: bool,
    pub duration_ms: u64,
    pub video_size: VideoSize,
    pub fail_prepare: bool,
    pub callback: Option<Arc<dyn EngineCallback>>,
}

/// Shared view into one mock engine's recorded calls
#[derive(Clone, Default)]
pub(crate) struct MockHandle(Arc<Mutex<MockEngineState>>);

impl MockHandle {
    pub fn prepares(&self) -> Vec<String> {
        self.0.lock().prepares.clone()
    }

    pub fn starts(&self) -> usize {
        self.0.lock().starts
    }

    pub fn pauses(&self) -> usize {
        self.0.lock().pauses
    }

    pub fn stops(&self) -> usize {
        self.0.lock().stops
    }

    pub fn releases(&self) -> usize {
        self.0.lock().releases
    }

    pub fn seeks(&self) -> Vec<u64> {
        self.0.lock().seeks.clone()
    }

    pub fn displays(&self) -> Vec<DisplayHandle> {
        self.0.lock().displays.clone()
    }

    pub fn duration_queries(&self) -> usize {
        self.0.lock().duration_queries
    }

    pub fn take_callback(&self) -> Option<Arc<dyn EngineCallback>> {
        self.0.lock().callback.take()
    }
}

struct MockEngine {
    state: MockHandle,
}

impl MediaEngine for MockEngine {
    fn set_display(&mut self, display: DisplayHandle) {
        self.state.0.lock().displays.push(display);
    }

    fn set_callback(&mut self, callback: Option<Arc<dyn EngineCallback>>) {
        self.state.0.lock().callback = callback;
    }

    fn prepare(&mut self, source: &str) -> Result<()> {
        let mut state = self.state.0.lock();
        if state.fail_prepare {
            return Err(PlaybackError::EngineFailure("mock prepare failure".to_string()));
        }
        state.prepares.push(source.to_string());
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        let mut state = self.state.0.lock();
        state.starts += 1;
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let mut state = self.state.0.lock();
        state.pauses += 1;
        state.playing = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut state = self.state.0.lock();
        state.stops += 1;
        state.playing = false;
        Ok(())
    }

    fn seek(&mut self, position_ms: u64) -> Result<()> {
        self.state.0.lock().seeks.push(position_ms);
        Ok(())
    }

    fn release(&mut self) {
        let mut state = self.state.0.lock();
        state.releases += 1;
        state.playing = false;
    }

    fn duration_ms(&self) -> u64 {
        let mut state = self.state.0.lock();
        state.duration_queries += 1;
        state.duration_ms
    }

    fn position_ms(&self) -> u64 {
        0
    }

    fn is_playing(&self) -> bool {
        self.state.0.lock().playing
    }

    fn buffer_percent(&self) -> u8 {
        0
    }

    fn video_size(&self) -> VideoSize {
        self.state.0.lock().video_size
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Factory handing out recording engines, keeping a handle to each
#[derive(Clone, Default)]
pub(crate) struct MockFactory {
    engines: Arc<Mutex<Vec<MockHandle>>>,
    video_size: Arc<Mutex<VideoSize>>,
    duration_ms: Arc<Mutex<u64>>,
    fail_create: Arc<Mutex<bool>>,
    fail_prepare: Arc<Mutex<bool>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video_size(self, size: VideoSize) -> Self {
        *self.video_size.lock() = size;
        self
    }

    pub fn with_duration(self, duration_ms: u64) -> Self {
        *self.duration_ms.lock() = duration_ms;
        self
    }

    pub fn with_fail_create(self) -> Self {
        *self.fail_create.lock() = true;
        self
    }

    pub fn with_fail_prepare(self) -> Self {
        *self.fail_prepare.lock() = true;
        self
    }

    pub fn engine_count(&self) -> usize {
        self.engines.lock().len()
    }

    pub fn engine(&self, index: usize) -> MockHandle {
        self.engines.lock()[index].clone()
    }
}

impl EngineFactory for MockFactory {
    fn create_engine(&self) -> Result<Box<dyn MediaEngine>> {
        if *self.fail_create.lock() {
            return Err(PlaybackError::EngineFailure("mock create failure".to_string()));
        }
        let state = MockEngineState {
            video_size: *self.video_size.lock(),
            duration_ms: *self.duration_ms.lock(),
            fail_prepare: *self.fail_prepare.lock(),
            ..Default::default()
        };
        let handle = MockHandle(Arc::new(Mutex::new(state)));
        self.engines.lock().push(handle.clone());
        Ok(Box::new(MockEngine { state: handle }))
    }
}

/// Observer recording every notification as a readable tag
#[derive(Default)]
pub(crate) struct RecordingObserver {
    events: Mutex<Vec<String>>,
    handle_errors: bool,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handling_errors() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            handle_errors: true,
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

impl ControllerObserver for RecordingObserver {
    fn on_prepared(&self) {
        self.events.lock().push("prepared".to_string());
    }

    fn on_completion(&self) {
        self.events.lock().push("completion".to_string());
    }

    fn on_buffered(&self) {
        self.events.lock().push("buffered".to_string());
    }

    fn on_error(&self, code: i32) -> bool {
        self.events.lock().push(format!("error:{}", code));
        self.handle_errors
    }

    fn on_buffering_update(&self, percent: u8) {
        self.events.lock().push(format!("buffering:{}", percent));
    }

    fn on_seek_complete(&self) {
        self.events.lock().push("seek_complete".to_string());
    }
}
