use std::cell::RefCell;

use super::{EngineEvent, EventHandler};

/// Broadcasts engine events to registered handlers, in subscription order.
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    pub fn emit(&self, event: EngineEvent) {
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    struct Recorder(Arc<Mutex<Vec<EngineEvent>>>);

    impl EventHandler for Recorder {
        fn handle_event(&mut self, event: &EngineEvent) {
            self.0.lock().push(event.clone());
        }
    }

    #[test]
    fn test_every_handler_sees_every_event() {
        let bus = EventBus::new();
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Box::new(Recorder(first.clone())));
        bus.subscribe(Box::new(Recorder(second.clone())));

        bus.emit(EngineEvent::DrawingsChanged);
        bus.emit(EngineEvent::StrokeCommitted { points: 4 });

        assert_eq!(*first.lock(), *second.lock());
        assert_eq!(first.lock().len(), 2);
    }
}
