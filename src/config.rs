use std::fs;
use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::PaintResult;

pub const DEFAULT_IMG_WIDTH: u32 = 640;
pub const DEFAULT_IMG_HEIGHT: u32 = 480;
pub const MIN_IMG_SIZE: u32 = 1;
pub const MAX_IMG_SIZE: u32 = 10_000;

pub const MIN_PEN_SIZE: u32 = 1;
pub const MAX_PEN_SIZE: u32 = 50;
pub const DEFAULT_PEN_THICKNESS: u32 = 1;
pub const DEFAULT_ERASER_THICKNESS: u32 = 10;

pub const MIN_RECT_CURVE: u32 = 0;
pub const MAX_RECT_CURVE: u32 = 100;
pub const DEFAULT_RECT_CURVE: u32 = 25;

pub const DEFAULT_UNDO_LIMIT: usize = 20;

/// Working resolution of frames requested from the scene renderer
pub const CAPTURE_WIDTH: u32 = 300;
pub const CAPTURE_HEIGHT: u32 = 300;

/// User-tunable defaults for a paint session.
///
/// Stored as JSON; any field missing from the file falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub undo_limit: usize,
    pub pen_width: u32,
    pub eraser_width: u32,
    pub rect_curve: u32,
    pub capture_width: u32,
    pub capture_height: u32,
    pub foreground: Color32,
    pub background: Color32,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_IMG_WIDTH,
            canvas_height: DEFAULT_IMG_HEIGHT,
            undo_limit: DEFAULT_UNDO_LIMIT,
            pen_width: DEFAULT_PEN_THICKNESS,
            eraser_width: DEFAULT_ERASER_THICKNESS,
            rect_curve: DEFAULT_RECT_CURVE,
            capture_width: CAPTURE_WIDTH,
            capture_height: CAPTURE_HEIGHT,
            foreground: Color32::BLACK,
            background: Color32::WHITE,
        }
    }
}

impl PaintConfig {
    /// Read a config file, clamping every numeric field into its legal range
    pub fn load(path: impl AsRef<Path>) -> PaintResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: PaintConfig = serde_json::from_str(&json)?;
        log::info!("Loaded paint config from {}", path.as_ref().display());
        Ok(config.sanitized())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> PaintResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn sanitized(mut self) -> Self {
        self.canvas_width = self.canvas_width.clamp(MIN_IMG_SIZE, MAX_IMG_SIZE);
        self.canvas_height = self.canvas_height.clamp(MIN_IMG_SIZE, MAX_IMG_SIZE);
        self.undo_limit = self.undo_limit.max(1);
        self.pen_width = self.pen_width.clamp(MIN_PEN_SIZE, MAX_PEN_SIZE);
        self.eraser_width = self.eraser_width.clamp(MIN_PEN_SIZE, MAX_PEN_SIZE);
        self.rect_curve = self.rect_curve.clamp(MIN_RECT_CURVE, MAX_RECT_CURVE);
        self.capture_width = self.capture_width.clamp(MIN_IMG_SIZE, MAX_IMG_SIZE);
        self.capture_height = self.capture_height.clamp(MIN_IMG_SIZE, MAX_IMG_SIZE);
        self
    }
}
