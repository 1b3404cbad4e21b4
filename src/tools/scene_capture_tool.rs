use egui::Pos2;
use image::imageops::{self, FilterType};

use super::{DrawContext, Tool, ToolKind};
use crate::error::PaintResult;
use crate::geometry::{DirtyRegion, normalize_rect};
use crate::raster;

/// Stamps a frame from the scene renderer into the dragged rectangle
#[derive(Debug, Clone)]
pub struct SceneCaptureTool {
    /// Resolution the frame is requested at before scaling
    pub capture_width: u32,
    pub capture_height: u32,
    anchor: Pos2,
}

impl SceneCaptureTool {
    pub fn new(capture_width: u32, capture_height: u32) -> Self {
        Self {
            capture_width,
            capture_height,
            anchor: Pos2::ZERO,
        }
    }
}

impl Tool for SceneCaptureTool {
    fn kind(&self) -> ToolKind {
        ToolKind::SceneCapture
    }

    fn anchor(&self) -> Pos2 {
        self.anchor
    }

    fn set_anchor(&mut self, point: Pos2) {
        self.anchor = point;
    }

    fn draw_to(&mut self, point: Pos2, ctx: &mut DrawContext<'_>) -> PaintResult<Option<DirtyRegion>> {
        if ctx.surface.is_empty() {
            return Ok(None);
        }
        let rect = normalize_rect(self.anchor, point);
        let (width, height) = (rect.width() as u32, rect.height() as u32);
        if width == 0 || height == 0 {
            log::debug!("Scene capture over an empty rectangle, nothing to stamp");
            return Ok(None);
        }

        let frame = ctx.renderer.capture_frame(self.capture_width, self.capture_height)?;
        let overlay = frame.into_surface_image()?;
        let overlay = imageops::resize(&overlay, width, height, FilterType::Triangle);

        let Some(image) = ctx.surface.image_mut() else {
            return Ok(None);
        };
        raster::blit(image, &overlay, rect.min.x as i32, rect.min.y as i32);
        Ok(Some(DirtyRegion::Full))
    }
}
