use egui::Pos2;

use super::style::StrokeStyle;
use super::{ColorSource, DrawContext, Tool, ToolKind};
use crate::error::PaintResult;
use crate::geometry::{DirtyRegion, segment_update_rect};
use crate::raster;
use crate::surface::to_rgba;

/// Freehand stroke: each move draws one segment and advances the anchor.
///
/// The pen paints in the foreground color and the eraser in the background
/// color; otherwise they are the same tool.
#[derive(Debug, Clone)]
pub struct StrokeTool {
    kind: ToolKind,
    pub style: StrokeStyle,
    pub color: ColorSource,
    anchor: Pos2,
}

impl StrokeTool {
    pub fn pen(width: u32) -> Self {
        Self {
            kind: ToolKind::Pen,
            style: StrokeStyle::new(width),
            color: ColorSource::Foreground,
            anchor: Pos2::ZERO,
        }
    }

    pub fn eraser(width: u32) -> Self {
        Self {
            kind: ToolKind::Eraser,
            style: StrokeStyle::new(width),
            color: ColorSource::Background,
            anchor: Pos2::ZERO,
        }
    }
}

impl Tool for StrokeTool {
    fn kind(&self) -> ToolKind {
        self.kind
    }

    fn anchor(&self) -> Pos2 {
        self.anchor
    }

    fn set_anchor(&mut self, point: Pos2) {
        self.anchor = point;
    }

    fn draw_to(&mut self, point: Pos2, ctx: &mut DrawContext<'_>) -> PaintResult<Option<DirtyRegion>> {
        let Some(image) = ctx.surface.image_mut() else {
            return Ok(None);
        };
        let color = to_rgba(ctx.palette.color(self.color));
        raster::stroke_segment(image, self.anchor, point, &self.style, color);

        let region = segment_update_rect(self.anchor, point, self.style.width as f32);
        self.anchor = point;
        Ok(Some(DirtyRegion::Area(region)))
    }
}
