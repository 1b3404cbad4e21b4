use egui::{Color32, Pos2, pos2, vec2};
use image::{Rgba, RgbaImage};

use super::{Frame, Scene, SceneRenderer, SceneShape};
use crate::error::{PaintError, PaintResult};

/// Light direction for the diffuse term, pointing from the surface towards
/// the light (up, left and towards the viewer)
const LIGHT: [f32; 3] = [-0.4, -0.5, 0.77];
const AMBIENT: f32 = 0.25;

fn shade(color: Color32, intensity: f32) -> Rgba<u8> {
    let k = intensity.clamp(0.0, 1.0);
    let scale = |c: u8| (c as f32 * k).round() as u8;
    Rgba([scale(color.r()), scale(color.g()), scale(color.b()), 255])
}

fn diffuse(normal: [f32; 3]) -> f32 {
    let len = LIGHT.iter().map(|c| c * c).sum::<f32>().sqrt();
    let dot: f32 = normal.iter().zip(LIGHT).map(|(n, l)| n * l / len).sum();
    AMBIENT + (1.0 - AMBIENT) * dot.max(0.0)
}

/// Point-in-convex-polygon test for a counter- or clockwise outline
fn in_convex(poly: &[Pos2], p: Pos2) -> bool {
    let mut sign = 0.0_f32;
    for (i, a) in poly.iter().enumerate() {
        let b = poly[(i + 1) % poly.len()];
        let cross = (b - *a).x * (p - *a).y - (b - *a).y * (p - *a).x;
        if cross != 0.0 {
            if sign != 0.0 && cross.signum() != sign {
                return false;
            }
            sign = cross.signum();
        }
    }
    true
}

/// CPU renderer for the built-in primitives.
///
/// Without a scene it reports [`PaintError::RenderUnavailable`], the same as a
/// renderer whose window was never set up.
#[derive(Debug, Default)]
pub struct SoftwareSceneRenderer {
    scene: Option<Scene>,
}

impl SoftwareSceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scene(scene: Scene) -> Self {
        Self { scene: Some(scene) }
    }

    fn render(scene: &Scene, width: u32, height: u32) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(width, height, shade(scene.background, 1.0));
        let center = pos2(width as f32 / 2.0, height as f32 / 2.0);
        let unit = width.min(height) as f32;

        match scene.shape {
            SceneShape::Sphere => {
                let radius = unit * 0.35;
                for (x, y, px) in image.enumerate_pixels_mut() {
                    let d = (pos2(x as f32, y as f32) - center) / radius;
                    let r2 = d.length_sq();
                    if r2 <= 1.0 {
                        let normal = [d.x, d.y, (1.0 - r2).sqrt()];
                        *px = shade(scene.foreground, diffuse(normal));
                    }
                }
            }
            SceneShape::Cube => {
                let side = unit * 0.45;
                let depth = vec2(side * 0.35, -side * 0.35);
                let front_min = center - vec2(side, side) / 2.0 - depth / 2.0;
                let front = [
                    front_min,
                    front_min + vec2(side, 0.0),
                    front_min + vec2(side, side),
                    front_min + vec2(0.0, side),
                ];
                let top = [front[0], front[1], front[1] + depth, front[0] + depth];
                let right = [front[1], front[1] + depth, front[2] + depth, front[2]];
                let faces = [
                    (front, diffuse([0.0, 0.0, 1.0])),
                    (top, diffuse([0.0, -1.0, 0.0]).max(0.9)),
                    (right, diffuse([1.0, 0.0, 0.0])),
                ];
                for (x, y, px) in image.enumerate_pixels_mut() {
                    let p = pos2(x as f32, y as f32);
                    if let Some((_, light)) = faces.iter().find(|(poly, _)| in_convex(poly, p)) {
                        *px = shade(scene.foreground, *light);
                    }
                }
            }
            SceneShape::Cylinder => {
                let rx = unit * 0.25;
                let ry = rx * 0.3;
                let half_height = unit * 0.3;
                let top_center = center - vec2(0.0, half_height);
                let bottom_center = center + vec2(0.0, half_height);
                for (x, y, px) in image.enumerate_pixels_mut() {
                    let p = pos2(x as f32, y as f32);
                    let in_cap = |c: Pos2| ((p.x - c.x) / rx).powi(2) + ((p.y - c.y) / ry).powi(2) <= 1.0;
                    let nx = (p.x - center.x) / rx;
                    let in_body = p.y >= top_center.y && p.y <= bottom_center.y;
                    if in_cap(top_center) {
                        *px = shade(scene.foreground, diffuse([0.0, -1.0, 0.0]).max(0.9));
                    } else if nx.abs() <= 1.0 && (in_body || in_cap(bottom_center)) {
                        let normal = [nx, 0.0, (1.0 - nx * nx).sqrt()];
                        *px = shade(scene.foreground, diffuse(normal));
                    }
                }
            }
        }
        image
    }
}

impl SceneRenderer for SoftwareSceneRenderer {
    fn capture_frame(&mut self, width: u32, height: u32) -> PaintResult<Frame> {
        let scene = self
            .scene
            .as_ref()
            .ok_or_else(|| PaintError::RenderUnavailable("no scene to render".to_string()))?;
        if width == 0 || height == 0 {
            return Err(PaintError::RenderUnavailable(format!("empty viewport {}x{}", width, height)));
        }
        log::debug!("Rendering {:?} at {}x{}", scene.shape, width, height);
        Ok(Frame::from_rgba(&Self::render(scene, width, height)))
    }

    fn set_scene(&mut self, scene: Scene) {
        self.scene = Some(scene);
    }

    fn scene(&self) -> Option<Scene> {
        self.scene
    }
}
