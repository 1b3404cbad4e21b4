use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;
use thiserror::Error;

use crate::geometry::DirtyRegion;
use crate::surface::Surface;

/// Errors that can occur while uploading the surface
#[derive(Error, Debug, PartialEq)]
pub enum TextureError {
    #[error("no surface to upload")]
    EmptySurface,
    #[error("invalid texture region {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Copy a pixel rectangle of `image` into an egui image.
///
/// `region` is clipped to the image; an empty intersection is an error.
pub fn color_image_region(image: &RgbaImage, region: DirtyRegion) -> Result<([usize; 2], ColorImage), TextureError> {
    let rect = region.to_rect(image.width(), image.height());
    let x0 = rect.min.x.floor().max(0.0) as u32;
    let y0 = rect.min.y.floor().max(0.0) as u32;
    let x1 = (rect.max.x.ceil() as u32).min(image.width());
    let y1 = (rect.max.y.ceil() as u32).min(image.height());
    if x1 <= x0 || y1 <= y0 {
        return Err(TextureError::InvalidDimensions {
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        });
    }

    let (width, height) = (x1 - x0, y1 - y0);
    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for y in y0..y1 {
        let start = (y as usize * image.width() as usize + x0 as usize) * 4;
        let end = start + width as usize * 4;
        rgba.extend_from_slice(&image.as_raw()[start..end]);
    }
    let color_image = ColorImage::from_rgba_unmultiplied([width as usize, height as usize], &rgba);
    Ok(([x0 as usize, y0 as usize], color_image))
}

/// Keeps one GPU texture in sync with the surface, re-uploading only the
/// damaged part when the size is unchanged
#[derive(Default)]
pub struct TextureManager {
    handle: Option<TextureHandle>,
    size: (u32, u32),
    uploads: u64,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of uploads so far, full or partial
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Bring the texture up to date with `surface` and return its id
    pub fn sync(&mut self, ctx: &Context, surface: &Surface, damage: Option<DirtyRegion>) -> Result<TextureId, TextureError> {
        let image = surface.image().ok_or(TextureError::EmptySurface)?;
        let size = image.dimensions();

        if self.size == size {
            if let Some(handle) = &mut self.handle {
                if let Some(region) = damage {
                    match color_image_region(image, region) {
                        Ok((pos, patch)) => {
                            handle.set_partial(pos, patch, TextureOptions::NEAREST);
                            self.uploads += 1;
                        }
                        // damage entirely off the canvas
                        Err(TextureError::InvalidDimensions { .. }) => {}
                        Err(err) => return Err(err),
                    }
                }
                return Ok(handle.id());
            }
        }

        let (_, full) = color_image_region(image, DirtyRegion::Full)?;
        let handle = ctx.load_texture("surface", full, TextureOptions::NEAREST);
        let id = handle.id();
        self.handle = Some(handle);
        self.size = size;
        self.uploads += 1;
        log::debug!("Uploaded {}x{} surface texture", size.0, size.1);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Rect, pos2};
    use image::Rgba;

    #[test]
    fn test_region_is_clipped_to_image() {
        let mut image = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        image.put_pixel(8, 9, Rgba([0, 0, 0, 255]));
        let region = DirtyRegion::Area(Rect::from_min_max(pos2(6.0, 7.0), pos2(30.0, 30.0)));

        let (pos, patch) = color_image_region(&image, region).unwrap();
        assert_eq!(pos, [6, 7]);
        assert_eq!(patch.size, [4, 3]);
        assert_eq!(patch[(2, 2)], egui::Color32::BLACK);
    }

    #[test]
    fn test_region_outside_image_is_rejected() {
        let image = RgbaImage::new(4, 4);
        let region = DirtyRegion::Area(Rect::from_min_max(pos2(10.0, 10.0), pos2(20.0, 20.0)));
        assert!(color_image_region(&image, region).is_err());
    }

    #[test]
    fn test_sync_without_surface_fails() {
        let ctx = Context::default();
        let mut textures = TextureManager::new();
        assert_eq!(textures.sync(&ctx, &Surface::new(), None), Err(TextureError::EmptySurface));
        assert_eq!(textures.uploads(), 0);
    }

    #[test]
    fn test_off_canvas_damage_keeps_texture() {
        let ctx = Context::default();
        let mut surface = Surface::new();
        surface.create_blank(8, 8, egui::Color32::WHITE).unwrap();
        let mut textures = TextureManager::new();

        let id = textures.sync(&ctx, &surface, None).unwrap();
        let outside = DirtyRegion::Area(Rect::from_min_max(pos2(-40.0, -40.0), pos2(-20.0, -20.0)));
        assert_eq!(textures.sync(&ctx, &surface, Some(outside)), Ok(id));
        assert_eq!(textures.uploads(), 1);
    }
}
