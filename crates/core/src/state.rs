// Playback state machine types and transition validation

use crate::error::{PlaybackError, Result};

/// Current controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No session (nothing opened, or the engine was released)
    Idle,
    /// A source is bound and the engine is preparing it
    Preparing,
    /// Preparation finished, ready to start
    Prepared,
    /// Engine is actively playing
    Playing,
    /// Playback paused
    Paused,
    /// Playback reached the natural end of the media
    Completed,
    /// Engine-level suspend (not reachable with engines that cannot suspend)
    Suspended,
    /// Suspend was requested but the engine had to be released instead
    SuspendedUnsupported,
    /// Unrecoverable engine or source error
    Error,
}

/// The state a caller last asked for, which may not yet be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Idle,
    Playing,
    Paused,
    Completed,
    /// Resume requested while no surface was bound
    Resume,
    Error,
}

/// Natural or negotiated video dimensions in pixels. 0x0 means unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

impl VideoSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions reported and nonzero
    pub fn is_known(&self) -> bool {
        self.width != 0 && self.height != 0
    }
}

/// Stream capability flags fixed once preparation completes.
///
/// Engine capability metadata is intentionally not queried; all flags are
/// assumed true after prepare. Documented default, not a gap to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub can_pause: bool,
    pub can_seek_backward: bool,
    pub can_seek_forward: bool,
}

impl Capabilities {
    pub fn assume_all() -> Self {
        Self {
            can_pause: true,
            can_seek_backward: true,
            can_seek_forward: true,
        }
    }
}

/// Returns whether `from -> to` is a defined edge of the state machine.
///
/// Release is legal from any state, and any state may fail into `Error`.
/// Self-transitions are allowed (repeated intents are idempotent).
pub fn transition_allowed(from: PlaybackState, to: PlaybackState) -> bool {
    use PlaybackState::*;

    if from == to {
        return true;
    }

    match to {
        Error => true,
        Idle => true,
        Preparing => matches!(from, Idle | Error | Suspended | SuspendedUnsupported),
        Prepared => matches!(from, Preparing),
        Playing => matches!(from, Prepared | Paused | Completed),
        Paused => matches!(from, Prepared | Playing | Completed),
        Completed => matches!(from, Prepared | Playing | Paused),
        Suspended => false,
        SuspendedUnsupported => matches!(from, Idle | Prepared | Playing | Paused | Completed),
    }
}

/// Tracks current and target state for a single-owner controller.
///
/// Every change of the current state is validated against the transition
/// table; an edge outside the table is rejected and reported instead of
/// letting the state drift.
#[derive(Debug)]
pub struct StateTracker {
    current: PlaybackState,
    target: TargetState,
}

impl StateTracker {
    pub fn new() -> Self {
        Self {
            current: PlaybackState::Idle,
            target: TargetState::Idle,
        }
    }

    pub fn current(&self) -> PlaybackState {
        self.current
    }

    pub fn target(&self) -> TargetState {
        self.target
    }

    pub fn set_target(&mut self, target: TargetState) {
        self.target = target;
    }

    pub fn set_current(&mut self, next: PlaybackState) -> Result<()> {
        if !transition_allowed(self.current, next) {
            return Err(PlaybackError::InvalidTransition(format!(
                "{:?} -> {:?}",
                self.current, next
            )));
        }
        if self.current != next {
            log::debug!("playback state {:?} -> {:?}", self.current, next);
        }
        self.current = next;
        Ok(())
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}
