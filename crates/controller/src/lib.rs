// Playback controller for a video display widget
// Coordinates a media engine, a render surface, and caller intents

pub mod controller;
pub mod measure;
pub mod registry;
pub mod relay;

mod session;

#[cfg(test)]
mod test_support;

// Re-exports
pub use controller::PlaybackController;
pub use measure::{default_size, measure, resolve_adjusted_size, MeasureMode, MeasureSpec};
pub use relay::EngineEventRelay;
