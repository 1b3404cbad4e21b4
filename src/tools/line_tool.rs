use egui::Pos2;

use super::style::{DrawType, StrokeStyle};
use super::{ColorSource, DrawContext, Tool, ToolKind};
use crate::error::PaintResult;
use crate::geometry::DirtyRegion;
use crate::raster;
use crate::surface::to_rgba;

/// Straight segment from a fixed anchor, optionally chained into a poly-line
#[derive(Debug, Clone)]
pub struct LineTool {
    pub style: StrokeStyle,
    pub draw_type: DrawType,
    anchor: Pos2,
}

impl LineTool {
    pub fn new(width: u32) -> Self {
        Self {
            style: StrokeStyle::new(width),
            draw_type: DrawType::Single,
            anchor: Pos2::ZERO,
        }
    }

    pub fn is_poly(&self) -> bool {
        self.draw_type == DrawType::Poly
    }
}

impl Tool for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
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
        let color = to_rgba(ctx.palette.color(ColorSource::Foreground));
        raster::stroke_segment(image, self.anchor, point, &self.style, color);
        Ok(Some(DirtyRegion::Full))
    }
}
