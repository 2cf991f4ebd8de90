// Shared-handle hosting for controllers driven from embedding glue

use crate::controller::PlaybackController;
use kinoview_core::{EngineEvent, PlaybackError, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Once};

static CONTROLLER_REGISTRY: Lazy<Mutex<HashMap<i64, Arc<Mutex<PlaybackController>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));
static NEXT_CONTROLLER_ID: Lazy<Mutex<i64>> = Lazy::new(|| Mutex::new(1));
static INIT_LOGGER: Once = Once::new();

pub fn init_logging() {
    INIT_LOGGER.call_once(|| {
        // Keep it simple: try env_logger if available, otherwise no-op.
        let _ = env_logger::builder()
            .is_test(false)
            .filter_level(log::LevelFilter::Info)
            .try_init();
    });
}

/// Register a controller and return its handle. The controller will wire
/// engine callbacks back through this registry from now on.
pub fn register_controller(mut controller: PlaybackController) -> i64 {
    init_logging();
    let mut next = NEXT_CONTROLLER_ID.lock();
    let id = *next;
    *next += 1;
    drop(next);

    controller.set_registry_id(id);
    CONTROLLER_REGISTRY.lock().insert(id, Arc::new(Mutex::new(controller)));
    id
}

fn shared(id: i64) -> Result<Arc<Mutex<PlaybackController>>> {
    CONTROLLER_REGISTRY
        .lock()
        .get(&id)
        .cloned()
        .ok_or_else(|| PlaybackError::Other(format!("invalid controller id {}", id)))
}

pub fn with_controller_mut<R>(
    id: i64,
    f: impl FnOnce(&mut PlaybackController) -> Result<R>,
) -> Result<R> {
    let shared = shared(id)?;
    let mut controller = shared.lock();
    f(&mut controller)
}

pub fn with_controller<R>(id: i64, f: impl FnOnce(&PlaybackController) -> Result<R>) -> Result<R> {
    let shared = shared(id)?;
    let controller = shared.lock();
    f(&controller)
}

/// Remove a controller from the registry, stopping any live session
pub fn release_controller(id: i64) -> Result<()> {
    let shared = CONTROLLER_REGISTRY
        .lock()
        .remove(&id)
        .ok_or_else(|| PlaybackError::Other(format!("invalid controller id {}", id)))?;
    shared.lock().stop_playback();
    Ok(())
}

pub(crate) fn dispatch_engine_event(id: i64, generation: u64, event: EngineEvent) {
    match shared(id) {
        Ok(shared) => shared.lock().handle_engine_event(generation, event),
        Err(_) => {
            log::debug!("dropping {:?} event for released controller {}", event, id);
        }
    }
}
