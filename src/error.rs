use thiserror::Error;

/// Errors raised while parsing a persisted stroke color
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Color {0:?} must start with '#'")]
    MissingHash(String),

    #[error("Color {0:?} contains non-hex digits")]
    InvalidDigits(String),

    #[error("Hex color must have 3, 6 or 8 digits, got {0}")]
    InvalidLength(usize),
}

/// Errors raised when exporting a raster surface
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Surface has no pixels to export")]
    Empty,

    #[error("Failed to encode surface: {0}")]
    Encode(#[from] image::ImageError),
}
