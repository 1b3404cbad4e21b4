//! Everything one paint session owns.
//!
//! The context replaces ambient globals. Surface, tool set, palette, undo
//! history, scene renderer and event bus all live here and are lent out per
//! event.

use crate::command::CommandHistory;
use crate::config::PaintConfig;
use crate::event::EventBus;
use crate::scene::{SceneRenderer, SoftwareSceneRenderer};
use crate::surface::Surface;
use crate::tools::{Palette, ToolSet};

pub struct EditorContext {
    /// The raster being edited
    pub surface: Surface,
    pub tools: ToolSet,
    pub palette: Palette,
    pub history: CommandHistory,
    /// Frame source for the scene-capture tool
    pub renderer: Box<dyn SceneRenderer>,
    /// The event bus for broadcasting editor events
    pub event_bus: EventBus,
    pub config: PaintConfig,
}

impl std::fmt::Debug for EditorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorContext")
            .field("surface", &format_args!("{}x{}", self.surface.width(), self.surface.height()))
            .field("tools", &self.tools)
            .field("palette", &self.palette)
            .field("history", &self.history.len())
            .field("event_bus", &self.event_bus)
            .finish()
    }
}

impl EditorContext {
    /// Creates a context with an empty surface and the built-in software
    /// scene renderer
    pub fn new(config: PaintConfig) -> Self {
        Self::with_renderer(config, Box::new(SoftwareSceneRenderer::new()))
    }

    pub fn with_renderer(config: PaintConfig, renderer: Box<dyn SceneRenderer>) -> Self {
        let config = config.sanitized();
        Self {
            surface: Surface::new(),
            tools: ToolSet::from_config(&config),
            palette: Palette {
                foreground: config.foreground,
                background: config.background,
            },
            history: CommandHistory::new(config.undo_limit),
            renderer,
            event_bus: EventBus::new(),
            config,
        }
    }
}
