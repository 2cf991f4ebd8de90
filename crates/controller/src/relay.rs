// Generation-tagged glue between engine callbacks and a registered controller

use crate::registry;
use kinoview_core::{EngineCallback, EngineEvent};

/// Forwards engine events into a registered controller.
///
/// Each relay is created for one session and carries that session's
/// generation; events arriving after the session was torn down are discarded
/// by the controller's generation check.
pub struct EngineEventRelay {
    controller_id: i64,
    generation: u64,
}

impl EngineEventRelay {
    pub fn new(controller_id: i64, generation: u64) -> Self {
        Self {
            controller_id,
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl EngineCallback for EngineEventRelay {
    fn on_event(&self, event: EngineEvent) {
        registry::dispatch_engine_event(self.controller_id, self.generation, event);
    }
}
