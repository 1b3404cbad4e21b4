use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use egui::Color32;
use image::{ImageFormat, Rgba, RgbaImage};
use image::imageops::{self, FilterType};

use crate::config::{MAX_IMG_SIZE, MIN_IMG_SIZE};
use crate::error::{PaintError, PaintResult};
use crate::geometry::DirtyRegion;

pub fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

/// Frozen copy of the surface contents, or of the empty state.
///
/// Snapshots compare by exact pixel equality.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    image: Option<Arc<RgbaImage>>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.dimensions())
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        match (&self.image, &other.image) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || (a.dimensions() == b.dimensions() && a.as_raw() == b.as_raw()),
            _ => false,
        }
    }
}

impl Eq for Snapshot {}

/// The raster being edited
#[derive(Debug, Default)]
pub struct Surface {
    image: Option<RgbaImage>,
    fill_color: Color32,
    damage: Option<DirtyRegion>,
}

fn validate_dimensions(width: u32, height: u32) -> PaintResult<()> {
    let valid = MIN_IMG_SIZE..=MAX_IMG_SIZE;
    if valid.contains(&width) && valid.contains(&height) {
        Ok(())
    } else {
        Err(PaintError::InvalidDimensions { width, height })
    }
}

impl Surface {
    /// An uninitialized surface; tools ignore it until a canvas exists
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    pub fn width(&self) -> u32 {
        self.image.as_ref().map_or(0, |img| img.width())
    }

    pub fn height(&self) -> u32 {
        self.image.as_ref().map_or(0, |img| img.height())
    }

    /// Color the surface was last created or cleared with
    pub fn fill_color(&self) -> Color32 {
        self.fill_color
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn image_mut(&mut self) -> Option<&mut RgbaImage> {
        self.image.as_mut()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        let img = self.image.as_ref()?;
        if x >= img.width() || y >= img.height() {
            return None;
        }
        let [r, g, b, a] = img.get_pixel(x, y).0;
        Some(Color32::from_rgba_unmultiplied(r, g, b, a))
    }

    pub fn create_blank(&mut self, width: u32, height: u32, fill: Color32) -> PaintResult<()> {
        validate_dimensions(width, height)?;
        self.image = Some(RgbaImage::from_pixel(width, height, to_rgba(fill)));
        self.fill_color = fill;
        self.mark_damaged(DirtyRegion::Full);
        log::debug!("Created blank {}x{} surface", width, height);
        Ok(())
    }

    /// Replace the contents with a decoded image. On failure the surface is
    /// left empty.
    pub fn load_from(&mut self, bytes: &[u8]) -> PaintResult<()> {
        self.mark_damaged(DirtyRegion::Full);
        match image::load_from_memory(bytes) {
            Ok(decoded) => {
                let img = decoded.to_rgba8();
                log::debug!("Decoded {}x{} image", img.width(), img.height());
                self.image = Some(img);
                Ok(())
            }
            Err(err) => {
                self.image = None;
                Err(PaintError::Decode(err.to_string()))
            }
        }
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> PaintResult<()> {
        let bytes = match std::fs::read(path.as_ref()) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.image = None;
                self.mark_damaged(DirtyRegion::Full);
                return Err(err.into());
            }
        };
        self.load_from(&bytes)
    }

    /// BMP encoding of the current contents
    pub fn encode_bmp(&self) -> PaintResult<Vec<u8>> {
        let img = self.image.as_ref().ok_or(PaintError::EmptySurface)?;
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Bmp)?;
        Ok(bytes.into_inner())
    }

    /// Write the surface as BMP, whatever extension `path` carries
    pub fn save_to(&self, path: impl AsRef<Path>) -> PaintResult<()> {
        let bytes = self.encode_bmp()?;
        std::fs::write(path.as_ref(), bytes)?;
        log::info!("Saved surface to {}", path.as_ref().display());
        Ok(())
    }

    /// Rescale to the given size, ignoring aspect ratio
    pub fn resize_to(&mut self, width: u32, height: u32) -> PaintResult<()> {
        let img = self.image.as_ref().ok_or(PaintError::EmptySurface)?;
        validate_dimensions(width, height)?;
        if img.dimensions() == (width, height) {
            return Ok(());
        }
        self.image = Some(imageops::resize(img, width, height, FilterType::Triangle));
        self.mark_damaged(DirtyRegion::Full);
        Ok(())
    }

    pub fn clear(&mut self, fill: Color32) -> PaintResult<()> {
        let img = self.image.as_mut().ok_or(PaintError::EmptySurface)?;
        let color = to_rgba(fill);
        img.pixels_mut().for_each(|p| *p = color);
        self.fill_color = fill;
        self.mark_damaged(DirtyRegion::Full);
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            image: self.image.clone().map(Arc::new),
        }
    }

    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.image = snapshot.image.as_deref().cloned();
        self.mark_damaged(DirtyRegion::Full);
    }

    /// Whether the live contents match `snapshot` pixel for pixel
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        match (&self.image, &snapshot.image) {
            (None, None) => true,
            (Some(a), Some(b)) => a.dimensions() == b.dimensions() && a.as_raw() == b.as_raw(),
            _ => false,
        }
    }

    pub fn mark_damaged(&mut self, region: DirtyRegion) {
        self.damage = Some(match self.damage {
            Some(existing) => existing.union(region),
            None => region,
        });
    }

    /// Region changed since the last call, if any
    pub fn take_damage(&mut self) -> Option<DirtyRegion> {
        self.damage.take()
    }
}
