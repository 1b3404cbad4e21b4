use egui::{Color32, Pos2};

use super::style::{FillMode, ShapeType, StrokeStyle};
use super::{DrawContext, Palette, Tool, ToolKind};
use crate::error::PaintResult;
use crate::geometry::{DirtyRegion, normalize_rect};
use crate::raster::{self, Shape};
use crate::surface::to_rgba;

/// Rectangle, rounded rectangle or ellipse spanned by the drag
#[derive(Debug, Clone)]
pub struct ShapeTool {
    pub style: StrokeStyle,
    pub shape_type: ShapeType,
    pub fill_mode: FillMode,
    /// Corner roundness of rounded rectangles, 0..=100
    pub curve: u32,
    anchor: Pos2,
}

impl ShapeTool {
    pub fn new(width: u32, curve: u32) -> Self {
        Self {
            style: StrokeStyle::new(width),
            shape_type: ShapeType::Rectangle,
            fill_mode: FillMode::NoFill,
            curve,
            anchor: Pos2::ZERO,
        }
    }

    /// Fill color for the current mode, read from the palette at draw time
    pub fn fill_color(&self, palette: &Palette) -> Option<Color32> {
        match self.fill_mode {
            FillMode::Foreground => Some(palette.foreground),
            FillMode::Background => Some(palette.background),
            FillMode::NoFill => None,
        }
    }

    fn shape(&self, a: Pos2, b: Pos2) -> Shape {
        let rect = normalize_rect(a, b);
        match self.shape_type {
            ShapeType::Rectangle => Shape::Rectangle(rect),
            ShapeType::RoundedRectangle => Shape::rounded(rect, self.curve),
            ShapeType::Ellipse => Shape::Ellipse(rect),
        }
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Shape
    }

    fn anchor(&self) -> Pos2 {
        self.anchor
    }

    fn set_anchor(&mut self, point: Pos2) {
        self.anchor = point;
    }

    fn draw_to(&mut self, point: Pos2, ctx: &mut DrawContext<'_>) -> PaintResult<Option<DirtyRegion>> {
        let fill = self.fill_color(ctx.palette);
        let outline = to_rgba(ctx.palette.foreground);
        let Some(image) = ctx.surface.image_mut() else {
            return Ok(None);
        };

        let shape = self.shape(self.anchor, point);
        if let Some(fill) = fill {
            raster::fill_shape(image, &shape, to_rgba(fill));
        }
        raster::stroke_shape(image, &shape, &self.style, outline);
        Ok(Some(DirtyRegion::Full))
    }
}
