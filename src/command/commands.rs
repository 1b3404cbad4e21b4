use uuid::Uuid;

use crate::surface::{Snapshot, Surface};

/// One completed edit, stored as the surface before and after it
#[derive(Debug, Clone)]
pub struct Command {
    id: Uuid,
    /// Short description for logs and the shell ("Pen", "Resize", ...)
    label: &'static str,
    before: Snapshot,
    after: Snapshot,
}

impl Command {
    pub fn new(label: &'static str, before: Snapshot, after: Snapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            label,
            before,
            after,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn before(&self) -> &Snapshot {
        &self.before
    }

    pub fn after(&self) -> &Snapshot {
        &self.after
    }

    /// Put the surface back to how it was before the edit
    pub fn undo(&self, surface: &mut Surface) {
        surface.restore(&self.before);
    }

    /// Reapply the edit
    pub fn redo(&self, surface: &mut Surface) {
        surface.restore(&self.after);
    }
}
