mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::{DocumentEvent, EditorEvent};
pub use handlers::{EventQueue, LoggingEventHandler};

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&EditorEvent) + Send,
{
    fn handle_event(&mut self, event: &EditorEvent) {
        self(event)
    }
}
