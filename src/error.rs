use thiserror::Error;

/// Errors surfaced by the paint core.
///
/// None of these are fatal: drawing on an empty surface or compositing a
/// missing frame degrades to a no-op, and the caller decides what to show.
#[derive(Debug, Error)]
pub enum PaintError {
    /// A surface operation was attempted before any canvas exists
    #[error("no canvas: create or load an image first")]
    EmptySurface,

    /// The bytes handed to `load` are not a raster format we can decode
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The scene renderer could not produce a frame
    #[error("scene renderer unavailable: {0}")]
    RenderUnavailable(String),

    /// Width or height outside the supported canvas range
    #[error("invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl PaintError {
    /// True for the errors that only mean "there is nothing to act on yet"
    pub fn is_empty_surface(&self) -> bool {
        matches!(self, Self::EmptySurface)
    }
}

/// Result type for paint operations
pub type PaintResult<T> = Result<T, PaintError>;
