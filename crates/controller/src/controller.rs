// Playback state machine coordinating engine, surface, and caller intents

use crate::session::PlaybackSession;
use crate::relay::EngineEventRelay;
use kinoview_core::{
    error_code, Capabilities, ControllerObserver, DisplayHandle, EngineEvent, EngineFactory,
    MediaEngine, PlaybackError, PlaybackState, Result, StateTracker, TargetState, VideoSize,
};
use kinoview_surface_api::{SurfaceBinding, SurfaceEvent};
use std::sync::Arc;

/// Drives one media engine against one render surface.
///
/// The controller is long-lived and outlives its sessions: opening a source
/// creates a session, releasing the engine ends it. All entry points are
/// expected to run on one control thread; engine events are generation-tagged
/// so late callbacks from a torn-down session are discarded.
pub struct PlaybackController {
    factory: Box<dyn EngineFactory>,
    states: StateTracker,
    session: Option<PlaybackSession>,
    surface: SurfaceBinding,
    observer: Option<Arc<dyn ControllerObserver>>,

    /// Requested source; survives engine teardown so a deferred open can
    /// retry once a surface appears
    source: Option<String>,
    /// Seek recorded while not playable, applied once preparation completes
    pending_seek_ms: u64,
    natural_size: VideoSize,

    being_buffered: bool,
    buffered: bool,
    pause_on_seek: bool,
    prepare_async: bool,

    next_generation: u64,
    registry_id: Option<i64>,
}

impl PlaybackController {
    pub fn new(factory: Box<dyn EngineFactory>) -> Self {
        Self {
            factory,
            states: StateTracker::new(),
            session: None,
            surface: SurfaceBinding::new(),
            observer: None,
            source: None,
            pending_seek_ms: 0,
            natural_size: VideoSize::default(),
            being_buffered: false,
            buffered: false,
            pause_on_seek: false,
            prepare_async: true,
            next_generation: 1,
            registry_id: None,
        }
    }

    // ------------------------------------------------------------------
    // Caller intents
    // ------------------------------------------------------------------

    /// Bind a new source, tearing down any existing session.
    ///
    /// With no surface bound the request is remembered and retried when the
    /// surface appears; `SourceUnavailable` is returned in that case.
    pub fn open_source(&mut self, source: &str) -> Result<()> {
        log::info!("open source: {}", source);
        self.source = Some(source.to_string());
        self.pending_seek_ms = 0;
        self.open_video()
    }

    /// Ask for playback. Starts immediately when playable, otherwise the
    /// intent is honored when preparation completes.
    pub fn request_play(&mut self) {
        self.start_with_mode(false);
    }

    /// Ask for a pause. Pauses immediately only while the engine is actively
    /// playing; the intent is always recorded.
    pub fn request_pause(&mut self) {
        if self.in_playback_state() {
            let paused = match self.session.as_mut() {
                Some(session) if session.engine.is_playing() => {
                    Some(session.engine.pause())
                }
                _ => None,
            };
            match paused {
                Some(Ok(())) => self.enter(PlaybackState::Paused),
                Some(Err(err)) => {
                    log::error!("engine pause failed: {}", err);
                    self.fail_session(error_code::UNKNOWN);
                    return;
                }
                None => {}
            }
        }
        self.states.set_target(TargetState::Paused);
    }

    /// Seek to `position_ms`. While not playable the offset is stored and
    /// applied once after preparation completes; a later request overwrites
    /// an earlier stored one.
    pub fn request_seek(&mut self, position_ms: u64) {
        if self.in_playback_state() {
            let result = match self.session.as_mut() {
                Some(session) => session.engine.seek(position_ms),
                None => Ok(()),
            };
            if let Err(err) = result {
                log::error!("engine seek failed: {}", err);
                self.fail_session(error_code::UNKNOWN);
                return;
            }
            self.pending_seek_ms = 0;
        } else {
            self.pending_seek_ms = position_ms;
        }
    }

    /// Run the media once in buffering mode: playback whose natural end is
    /// reported as "buffer finished" instead of "playback ended". No-op when
    /// a probe is already running.
    pub fn request_buffer(&mut self) {
        if self.being_buffered {
            return;
        }
        log::info!("starting buffer probe");
        self.buffered = false;
        self.start_with_mode(true);
        self.request_seek(0);
    }

    /// Give up the engine while keeping the source. The engine offers no true
    /// suspend, so the resource is released and resume reopens from scratch.
    pub fn suspend(&mut self) {
        if self.in_playback_state() {
            self.release_engine(false);
            self.enter(PlaybackState::SuspendedUnsupported);
            log::warn!("engine suspend unsupported, released engine instead");
        }
    }

    /// Undo a suspend. Without a surface the intent is recorded and honored
    /// at surface creation.
    pub fn resume(&mut self) {
        if !self.surface.is_bound() && self.states.current() == PlaybackState::Suspended {
            self.states.set_target(TargetState::Resume);
            return;
        }
        if self.states.current() == PlaybackState::SuspendedUnsupported {
            if let Err(err) = self.open_video() {
                log::warn!("resume failed: {}", err);
            }
        }
    }

    /// Stop and fully release the current session
    pub fn stop_playback(&mut self) {
        if self.session.is_some() {
            self.being_buffered = false;
            self.buffered = false;
            let stopped = match self.session.as_mut() {
                Some(session) => session.engine.stop(),
                None => Ok(()),
            };
            if let Err(err) = stopped {
                log::warn!("engine stop failed during shutdown: {}", err);
            }
            self.release_engine(true);
        }
    }

    // ------------------------------------------------------------------
    // Surface lifecycle
    // ------------------------------------------------------------------

    pub fn handle_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Created(handle) => self.surface_created(handle),
            SurfaceEvent::Changed { width, height } => self.surface_changed(width, height),
            SurfaceEvent::Destroyed => self.surface_destroyed(),
        }
    }

    /// A surface exists. Retries a deferred open, or rebinds the display of a
    /// session suspended with a pending resume.
    pub fn surface_created(&mut self, handle: DisplayHandle) {
        self.surface.attach(handle);

        let resuming = self.session.is_some()
            && self.states.current() == PlaybackState::Suspended
            && self.states.target() == TargetState::Resume;
        if resuming {
            if let Some(session) = self.session.as_mut() {
                session.engine.set_display(handle);
            }
            self.resume();
        } else if self.source.is_some() {
            if let Err(err) = self.open_video() {
                log::warn!("deferred open failed: {}", err);
            }
        }
    }

    /// The surface reached new dimensions. When the caller wants playback and
    /// the surface now matches the media's natural size, start here: if
    /// preparation finished before the surface reached its final size, no
    /// other callback will fire.
    pub fn surface_changed(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);

        let should_start = self.session.is_some()
            && self.states.target() == TargetState::Playing
            && self.natural_size.is_known()
            && self.surface.matches(self.natural_size);
        if should_start {
            if self.pending_seek_ms != 0 {
                let pending = self.pending_seek_ms;
                self.request_seek(pending);
            }
            self.request_play();
        }
    }

    /// The surface is gone; the engine cannot keep rendering into it
    pub fn surface_destroyed(&mut self) {
        self.surface.detach();
        if self.states.current() != PlaybackState::Suspended {
            self.release_engine(true);
        }
    }

    // ------------------------------------------------------------------
    // Engine events
    // ------------------------------------------------------------------

    /// Single dispatch entry for engine events. Events whose generation does
    /// not match the live session are discarded.
    pub fn handle_engine_event(&mut self, generation: u64, event: EngineEvent) {
        let live = match &self.session {
            Some(session) => session.generation,
            None => {
                log::debug!("dropping {:?}: no live session", event);
                return;
            }
        };
        if generation != live {
            log::debug!(
                "dropping stale {:?} (generation {}, live {})",
                event,
                generation,
                live
            );
            return;
        }

        match event {
            EngineEvent::Prepared => self.on_prepared(),
            EngineEvent::Completed => self.on_completion(),
            EngineEvent::Error { code } => self.on_engine_error(code),
            EngineEvent::BufferingUpdate { percent } => self.on_buffering_update(percent),
            EngineEvent::SeekComplete => self.on_seek_complete(),
            EngineEvent::VideoSizeChanged { width, height } => {
                self.on_video_size_changed(width, height)
            }
        }
    }

    fn on_prepared(&mut self) {
        self.enter(PlaybackState::Prepared);

        // Capability metadata is not queried from the engine; everything is
        // assumed available once prepared.
        if let Some(session) = self.session.as_mut() {
            session.capabilities = Capabilities::assume_all();
        }

        if let Some(observer) = self.observer.clone() {
            observer.on_prepared();
        }

        self.natural_size = match &self.session {
            Some(session) => session.engine.video_size(),
            None => VideoSize::default(),
        };

        // the stored offset may have been rewritten since it was recorded
        let seek_to = self.pending_seek_ms;
        if seek_to != 0 {
            self.request_seek(seek_to);
        }

        if self.natural_size.is_known() {
            if self.surface.matches(self.natural_size)
                && self.states.target() == TargetState::Playing
            {
                // The surface is already at the needed size, so no resize
                // callback will come; start here instead of in
                // surface_changed.
                let buffer_mode = self.being_buffered;
                self.start_with_mode(buffer_mode);
            }
        } else if self.states.target() == TargetState::Playing {
            // Size not reported yet; it may arrive later. Start anyway.
            self.request_play();
        }
    }

    fn on_completion(&mut self) {
        self.enter(PlaybackState::Completed);
        self.states.set_target(TargetState::Completed);
        log::debug!(
            "playback completed (being_buffered={}, buffered={})",
            self.being_buffered,
            self.buffered
        );

        if self.being_buffered {
            self.being_buffered = false;
            self.buffered = true;
            self.request_seek(0);
            if let Some(observer) = self.observer.clone() {
                observer.on_buffered();
            }
        } else if let Some(observer) = self.observer.clone() {
            observer.on_completion();
        }
    }

    fn on_engine_error(&mut self, code: i32) {
        log::warn!("engine error: code {}", code);
        self.fail_session(code);
    }

    fn on_buffering_update(&mut self, percent: u8) {
        if let Some(session) = self.session.as_mut() {
            session.buffer_percent = percent;
        }
        if let Some(observer) = self.observer.clone() {
            observer.on_buffering_update(percent);
        }
    }

    fn on_seek_complete(&mut self) {
        if self.pause_on_seek {
            self.request_pause();
            self.pause_on_seek = false;
        }
        if let Some(observer) = self.observer.clone() {
            observer.on_seek_complete();
        }
    }

    fn on_video_size_changed(&mut self, width: u32, height: u32) {
        log::debug!("video size changed: {}x{}", width, height);
        self.natural_size = VideoSize::new(width, height);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> PlaybackState {
        self.states.current()
    }

    pub fn target(&self) -> TargetState {
        self.states.target()
    }

    pub fn current_source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn natural_size(&self) -> VideoSize {
        self.natural_size
    }

    /// Generation id of the live session, for hosts that pump engine events
    /// into [`Self::handle_engine_event`] themselves
    pub fn session_generation(&self) -> Option<u64> {
        self.session.as_ref().map(|session| session.generation)
    }

    /// Cached media duration; `None` outside playback
    pub fn duration_ms(&mut self) -> Option<u64> {
        if !self.in_playback_state() {
            return None;
        }
        match self.session.as_mut() {
            Some(session) => {
                if session.cached_duration.is_none() {
                    session.cached_duration = Some(session.engine.duration_ms());
                }
                session.cached_duration
            }
            None => None,
        }
    }

    pub fn position_ms(&self) -> u64 {
        if self.in_playback_state() {
            if let Some(session) = self.session.as_ref() {
                return session.engine.position_ms();
            }
        }
        0
    }

    pub fn is_playing(&self) -> bool {
        self.in_playback_state()
            && self
                .session
                .as_ref()
                .map(|session| session.engine.is_playing())
                .unwrap_or(false)
    }

    pub fn buffer_percent(&self) -> u8 {
        self.session
            .as_ref()
            .map(|session| session.buffer_percent)
            .unwrap_or(0)
    }

    pub fn is_being_buffered(&self) -> bool {
        self.being_buffered
    }

    pub fn is_buffered(&self) -> bool {
        self.buffered
    }

    pub fn can_pause(&self) -> bool {
        self.capabilities().can_pause
    }

    pub fn can_seek_backward(&self) -> bool {
        self.capabilities().can_seek_backward
    }

    pub fn can_seek_forward(&self) -> bool {
        self.capabilities().can_seek_forward
    }

    /// Borrow the live engine, e.g. to downcast to an engine-specific type
    pub fn engine(&self) -> Option<&dyn MediaEngine> {
        self.session.as_ref().map(|session| session.engine.as_ref())
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub fn set_observer(&mut self, observer: Option<Arc<dyn ControllerObserver>>) {
        self.observer = observer;
    }

    /// Pause as soon as the next seek completes, once
    pub fn set_pause_on_seek(&mut self, pause: bool) {
        self.pause_on_seek = pause;
    }

    pub fn prepare_async(&self) -> bool {
        self.prepare_async
    }

    /// Choose between asynchronous preparation (completion via the `Prepared`
    /// event) and a synchronous variant for engines without an async prepare.
    /// Completion is routed through the same event path either way.
    pub fn set_prepare_async(&mut self, prepare_async: bool) {
        self.prepare_async = prepare_async;
    }

    pub(crate) fn set_registry_id(&mut self, id: i64) {
        self.registry_id = Some(id);
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn capabilities(&self) -> Capabilities {
        self.session
            .as_ref()
            .map(|session| session.capabilities)
            .unwrap_or_default()
    }

    /// Playable means a session exists and preparation finished without error
    fn in_playback_state(&self) -> bool {
        self.session.is_some()
            && !matches!(
                self.states.current(),
                PlaybackState::Error | PlaybackState::Idle | PlaybackState::Preparing
            )
    }

    fn enter(&mut self, next: PlaybackState) {
        if let Err(err) = self.states.set_current(next) {
            log::warn!("rejected transition: {}", err);
        }
    }

    fn start_with_mode(&mut self, buffer_mode: bool) {
        self.being_buffered = buffer_mode;
        if self.in_playback_state() {
            let started = match self.session.as_mut() {
                Some(session) => session.engine.start(),
                None => Ok(()),
            };
            match started {
                Ok(()) => self.enter(PlaybackState::Playing),
                Err(err) => {
                    log::error!("engine start failed: {}", err);
                    self.fail_session(error_code::UNKNOWN);
                    return;
                }
            }
        }
        self.states.set_target(TargetState::Playing);
    }

    /// Create a fresh session for the stored source. The previous engine is
    /// released before the new one exists; the caller's target survives.
    fn open_video(&mut self) -> Result<()> {
        let source = match &self.source {
            Some(source) => source.clone(),
            None => {
                return Err(PlaybackError::SourceUnavailable("no source set".to_string()))
            }
        };
        let display = match self.surface.handle() {
            Some(handle) => handle,
            None => {
                return Err(PlaybackError::SourceUnavailable(format!(
                    "no surface bound for {}",
                    source
                )))
            }
        };

        self.release_engine(false);

        let mut engine = match self.factory.create_engine() {
            Ok(engine) => engine,
            Err(err) => {
                log::warn!("unable to create engine for {}: {}", source, err);
                self.fail_session(error_code::UNKNOWN);
                return Err(err);
            }
        };

        let generation = self.next_generation;
        self.next_generation += 1;

        engine.set_display(display);
        match self.registry_id {
            Some(id) => {
                engine.set_callback(Some(Arc::new(EngineEventRelay::new(id, generation))))
            }
            // host pumps handle_engine_event itself
            None => engine.set_callback(None),
        }

        self.session = Some(PlaybackSession::new(generation, source.clone(), engine));
        self.enter(PlaybackState::Preparing);

        let prepared = match self.session.as_mut() {
            Some(session) => session.engine.prepare(&source),
            None => Ok(()),
        };
        if let Err(err) = prepared {
            log::warn!("unable to open {}: {}", source, err);
            self.fail_session(error_code::UNKNOWN);
            return Err(err);
        }

        if !self.prepare_async {
            self.handle_engine_event(generation, EngineEvent::Prepared);
        }
        Ok(())
    }

    /// Release the engine resource. The recorded target survives unless
    /// `clear_target` is set, so an intent issued before a reopen still fires.
    fn release_engine(&mut self, clear_target: bool) {
        if let Some(mut session) = self.session.take() {
            log::debug!(
                "releasing engine for {} (generation {})",
                session.source,
                session.generation
            );
            session.engine.release();
            self.enter(PlaybackState::Idle);
            if clear_target {
                self.states.set_target(TargetState::Idle);
            }
        }
    }

    /// Error exit: tear down the session, report to the observer, and fall
    /// back to a synthesized completion when nobody handles the error.
    fn fail_session(&mut self, code: i32) {
        if let Some(mut session) = self.session.take() {
            session.engine.release();
        }
        self.enter(PlaybackState::Error);
        self.states.set_target(TargetState::Error);

        let handled = match &self.observer {
            Some(observer) => observer.on_error(code),
            None => false,
        };
        if !handled {
            log::warn!("unhandled playback error (code {}), signalling completion", code);
            // downstream consumers wait on completion; do not stall them
            if let Some(observer) = self.observer.clone() {
                observer.on_completion();
            }
        }
    }
}
