use std::fmt;

use thiserror::Error;

/// Which side of the sheet ran into the size cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Width => f.write_str("width"),
            Dimension::Height => f.write_str("height"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Nothing to pack")]
    Empty,
    /// Growing the sheet would push `dimension` to `attempted` pixels, past `max_size`.
    #[error(
        "Atlas too large: {dimension} would need {attempted}px but the maximum atlas size is {max_size}px \
         (reduce the number or size of images, or raise the maximum)"
    )]
    AtlasTooLarge {
        dimension: Dimension,
        attempted: u32,
        max_size: u32,
    },
    #[error("Sprite '{name}': rotated sprites are not yet supported")]
    UnsupportedRotation { name: String },
}

pub type Result<T> = std::result::Result<T, AtlasError>;
