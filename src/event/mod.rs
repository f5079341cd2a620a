mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::EngineEvent;
pub use handlers::{EngineStatus, StatusTracker};

/// Receives notifications from a drawing engine.
pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EngineEvent);
}
