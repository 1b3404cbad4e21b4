//! Off-screen 3-D scene rendering consumed by the scene-capture tool.

mod software;

pub use software::SoftwareSceneRenderer;

use egui::Color32;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{PaintError, PaintResult};

/// Built-in primitives the software renderer can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneShape {
    Cube,
    Sphere,
    Cylinder,
}

impl SceneShape {
    pub const ALL: [SceneShape; 3] = [SceneShape::Cube, SceneShape::Sphere, SceneShape::Cylinder];

    pub fn label(self) -> &'static str {
        match self {
            SceneShape::Cube => "Cube",
            SceneShape::Sphere => "Sphere",
            SceneShape::Cylinder => "Cylinder",
        }
    }
}

/// A single primitive lit in `foreground` against a `background` clear color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub shape: SceneShape,
    pub foreground: Color32,
    pub background: Color32,
}

/// One rendered frame as renderers hand it over: BGRA bytes, rows stored
/// bottom-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// Encode a top-down RGBA image in the renderer layout
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut data = Vec::with_capacity(image.as_raw().len());
        for y in (0..height).rev() {
            for x in 0..width {
                let [r, g, b, a] = image.get_pixel(x, y).0;
                data.extend_from_slice(&[b, g, r, a]);
            }
        }
        Self { width, height, data }
    }

    /// Mirror vertically and swap the red and blue channels, giving a
    /// top-down RGBA image
    pub fn into_surface_image(self) -> PaintResult<RgbaImage> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.width == 0 || self.height == 0 || self.data.len() != expected {
            return Err(PaintError::RenderUnavailable(format!(
                "frame of {} bytes does not match {}x{}",
                self.data.len(),
                self.width,
                self.height
            )));
        }

        let row_len = self.width as usize * 4;
        let mut image = RgbaImage::new(self.width, self.height);
        for (y, row) in self.data.chunks_exact(row_len).rev().enumerate() {
            for (x, px) in row.chunks_exact(4).enumerate() {
                image.put_pixel(x as u32, y as u32, Rgba([px[2], px[1], px[0], px[3]]));
            }
        }
        Ok(image)
    }
}

/// Source of frames for the scene-capture tool.
///
/// `capture_frame` is a blocking call returning one complete frame.
pub trait SceneRenderer {
    fn capture_frame(&mut self, width: u32, height: u32) -> PaintResult<Frame>;

    /// Replace the displayed scene. Renderers that manage their own scene
    /// ignore this.
    fn set_scene(&mut self, _scene: Scene) {}

    fn scene(&self) -> Option<Scene> {
        None
    }
}
