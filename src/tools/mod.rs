use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::config::PaintConfig;
use crate::error::PaintResult;
use crate::geometry::DirtyRegion;
use crate::scene::SceneRenderer;
use crate::surface::Surface;

pub mod style;

mod line_tool;
mod scene_capture_tool;
mod shape_tool;
mod stroke_tool;

pub use line_tool::LineTool;
pub use scene_capture_tool::SceneCaptureTool;
pub use shape_tool::ShapeTool;
pub use stroke_tool::StrokeTool;

use style::StrokeStyle;

/// The five built-in tool kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Pen,
    Line,
    Eraser,
    Shape,
    SceneCapture,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Pen,
        ToolKind::Line,
        ToolKind::Eraser,
        ToolKind::Shape,
        ToolKind::SceneCapture,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Pen => "Pen",
            ToolKind::Line => "Line",
            ToolKind::Eraser => "Eraser",
            ToolKind::Shape => "Shape",
            ToolKind::SceneCapture => "Scene capture",
        }
    }

    /// Tools that redraw from a fixed anchor on every move
    pub fn previews_from_anchor(self) -> bool {
        matches!(self, ToolKind::Line | ToolKind::Shape)
    }
}

/// Which palette entry a tool paints with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSource {
    Foreground,
    Background,
}

/// Foreground / background color pair shared by all tools
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub foreground: Color32,
    pub background: Color32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Color32::BLACK,
            background: Color32::WHITE,
        }
    }
}

impl Palette {
    pub fn color(&self, source: ColorSource) -> Color32 {
        match source {
            ColorSource::Foreground => self.foreground,
            ColorSource::Background => self.background,
        }
    }
}

/// Everything a tool may touch while drawing
pub struct DrawContext<'a> {
    pub surface: &'a mut Surface,
    pub palette: &'a Palette,
    pub renderer: &'a mut dyn SceneRenderer,
}

/// Tool trait defines the interface for all drawing tools
pub trait Tool: Send + Sync {
    fn kind(&self) -> ToolKind;

    /// Start point of the current gesture
    fn anchor(&self) -> Pos2;

    fn set_anchor(&mut self, point: Pos2);

    /// Draw from the anchor to `point` on the live surface.
    ///
    /// Returns the region that needs repainting, or `None` when nothing was
    /// drawn (no canvas yet, or a degenerate gesture).
    fn draw_to(&mut self, point: Pos2, ctx: &mut DrawContext<'_>) -> PaintResult<Option<DirtyRegion>>;
}

/// Enum representing all available tool types
/// This allows us to avoid using Box<dyn Tool> and simplifies memory management
#[derive(Debug, Clone)]
pub enum ToolType {
    Pen(StrokeTool),
    Line(LineTool),
    Eraser(StrokeTool),
    Shape(ShapeTool),
    SceneCapture(SceneCaptureTool),
}

impl Tool for ToolType {
    fn kind(&self) -> ToolKind {
        match self {
            Self::Pen(_) => ToolKind::Pen,
            Self::Line(_) => ToolKind::Line,
            Self::Eraser(_) => ToolKind::Eraser,
            Self::Shape(_) => ToolKind::Shape,
            Self::SceneCapture(_) => ToolKind::SceneCapture,
        }
    }

    fn anchor(&self) -> Pos2 {
        match self {
            Self::Pen(tool) | Self::Eraser(tool) => tool.anchor(),
            Self::Line(tool) => tool.anchor(),
            Self::Shape(tool) => tool.anchor(),
            Self::SceneCapture(tool) => tool.anchor(),
        }
    }

    fn set_anchor(&mut self, point: Pos2) {
        match self {
            Self::Pen(tool) | Self::Eraser(tool) => tool.set_anchor(point),
            Self::Line(tool) => tool.set_anchor(point),
            Self::Shape(tool) => tool.set_anchor(point),
            Self::SceneCapture(tool) => tool.set_anchor(point),
        }
    }

    fn draw_to(&mut self, point: Pos2, ctx: &mut DrawContext<'_>) -> PaintResult<Option<DirtyRegion>> {
        match self {
            Self::Pen(tool) | Self::Eraser(tool) => tool.draw_to(point, ctx),
            Self::Line(tool) => tool.draw_to(point, ctx),
            Self::Shape(tool) => tool.draw_to(point, ctx),
            Self::SceneCapture(tool) => tool.draw_to(point, ctx),
        }
    }
}

impl ToolType {
    /// Stroke attributes, for the kinds that have them
    pub fn style(&self) -> Option<&StrokeStyle> {
        match self {
            Self::Pen(tool) | Self::Eraser(tool) => Some(&tool.style),
            Self::Line(tool) => Some(&tool.style),
            Self::Shape(tool) => Some(&tool.style),
            Self::SceneCapture(_) => None,
        }
    }

    pub fn style_mut(&mut self) -> Option<&mut StrokeStyle> {
        match self {
            Self::Pen(tool) | Self::Eraser(tool) => Some(&mut tool.style),
            Self::Line(tool) => Some(&mut tool.style),
            Self::Shape(tool) => Some(&mut tool.style),
            Self::SceneCapture(_) => None,
        }
    }
}

/// The five tools of a session and the kind currently driven by input
#[derive(Debug, Clone)]
pub struct ToolSet {
    pen: ToolType,
    line: ToolType,
    eraser: ToolType,
    shape: ToolType,
    scene_capture: ToolType,
    active: ToolKind,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::from_config(&PaintConfig::default())
    }
}

impl ToolSet {
    pub fn from_config(config: &PaintConfig) -> Self {
        Self {
            pen: ToolType::Pen(StrokeTool::pen(config.pen_width)),
            line: ToolType::Line(LineTool::new(config.pen_width)),
            eraser: ToolType::Eraser(StrokeTool::eraser(config.eraser_width)),
            shape: ToolType::Shape(ShapeTool::new(config.pen_width, config.rect_curve)),
            scene_capture: ToolType::SceneCapture(SceneCaptureTool::new(config.capture_width, config.capture_height)),
            active: ToolKind::Pen,
        }
    }

    pub fn active_kind(&self) -> ToolKind {
        self.active
    }

    /// Make `kind` the tool driven by input; returns the previous kind
    pub fn set_active(&mut self, kind: ToolKind) -> ToolKind {
        std::mem::replace(&mut self.active, kind)
    }

    pub fn get(&self, kind: ToolKind) -> &ToolType {
        match kind {
            ToolKind::Pen => &self.pen,
            ToolKind::Line => &self.line,
            ToolKind::Eraser => &self.eraser,
            ToolKind::Shape => &self.shape,
            ToolKind::SceneCapture => &self.scene_capture,
        }
    }

    pub fn get_mut(&mut self, kind: ToolKind) -> &mut ToolType {
        match kind {
            ToolKind::Pen => &mut self.pen,
            ToolKind::Line => &mut self.line,
            ToolKind::Eraser => &mut self.eraser,
            ToolKind::Shape => &mut self.shape,
            ToolKind::SceneCapture => &mut self.scene_capture,
        }
    }

    pub fn active(&self) -> &ToolType {
        self.get(self.active)
    }

    pub fn active_mut(&mut self) -> &mut ToolType {
        self.get_mut(self.active)
    }

    pub fn line(&self) -> Option<&LineTool> {
        match &self.line {
            ToolType::Line(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn line_mut(&mut self) -> Option<&mut LineTool> {
        match &mut self.line {
            ToolType::Line(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn shape(&self) -> Option<&ShapeTool> {
        match &self.shape {
            ToolType::Shape(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn shape_mut(&mut self) -> Option<&mut ShapeTool> {
        match &mut self.shape {
            ToolType::Shape(tool) => Some(tool),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_set_slots_match_kinds() {
        let tools = ToolSet::default();
        for kind in ToolKind::ALL {
            assert_eq!(tools.get(kind).kind(), kind);
        }
        assert_eq!(tools.active_kind(), ToolKind::Pen);
    }

    #[test]
    fn test_set_active_returns_previous() {
        let mut tools = ToolSet::default();
        assert_eq!(tools.set_active(ToolKind::Line), ToolKind::Pen);
        assert_eq!(tools.active().kind(), ToolKind::Line);
    }

    #[test]
    fn test_scene_capture_has_no_stroke_style() {
        let tools = ToolSet::default();
        assert!(tools.get(ToolKind::SceneCapture).style().is_none());
        assert_eq!(tools.get(ToolKind::Eraser).style().map(|s| s.width), Some(10));
    }
}
