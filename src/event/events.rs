use egui::Pos2;
use uuid::Uuid;

use crate::geometry::DirtyRegion;
use crate::tools::ToolKind;

/// Notifications the paint core sends to whoever drives it
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Part of the surface changed and should be redrawn
    Repaint(DirtyRegion),
    /// Secondary button pressed over the canvas; the shell opens the
    /// configuration for `tool`
    SecondaryClick { tool: ToolKind, position: Pos2 },
    ToolChanged { old: ToolKind, new: ToolKind },
    /// The line tool entered or left poly mode
    PolyModeChanged { active: bool },
    CommandCommitted { id: Uuid, label: &'static str },
    Undone { id: Uuid },
    Redone { id: Uuid },
    DocumentChanged(DocumentEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    Created { width: u32, height: u32 },
    Loaded,
    Saved,
    Resized { width: u32, height: u32 },
    Cleared,
}
