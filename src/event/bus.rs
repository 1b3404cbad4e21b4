use std::cell::RefCell;

use crate::event::{EditorEvent, EventHandler};

/// A simple event bus for broadcasting editor events to registered handlers
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

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Emit an event to all registered handlers, in subscription order.
    ///
    /// Handlers must not emit on the same bus.
    pub fn emit(&self, event: EditorEvent) {
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventQueue;
    use crate::tools::ToolKind;

    #[test]
    fn test_emit_reaches_every_handler() {
        let bus = EventBus::new();
        let first = EventQueue::new();
        let second = EventQueue::new();
        bus.subscribe(Box::new(first.clone()));
        bus.subscribe(Box::new(second.clone()));

        let event = EditorEvent::ToolChanged {
            old: ToolKind::Pen,
            new: ToolKind::Line,
        };
        bus.emit(event.clone());

        assert_eq!(first.drain(), vec![event.clone()]);
        assert_eq!(second.drain(), vec![event]);
        assert!(first.drain().is_empty());
    }

    #[test]
    fn test_closure_handler() {
        let bus = EventBus::new();
        let seen = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = seen.clone();
        bus.subscribe(Box::new(move |_: &EditorEvent| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }));
        bus.emit(EditorEvent::PolyModeChanged { active: true });
        bus.emit(EditorEvent::PolyModeChanged { active: false });
        assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
