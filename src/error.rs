// Error types for the surface, the window and the config loader.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Coord, Rect};

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A coordinate or rectangle fell outside a surface.
/// Always caller error: the arguments were invalid, nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutOfBounds {
    /// Single pixel lookup outside `[0,width) x [0,height)`.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} surface")]
    Pixel { x: i32, y: i32, width: usize, height: usize },

    /// Source rectangle is empty or does not fit inside the source surface.
    #[error("source rectangle {rect} does not fit the {width}x{height} source")]
    Source { rect: Rect, width: usize, height: usize },

    /// Placing the rectangle at `coord` would cross the destination's edges.
    #[error("placing {rect} at {coord} does not fit the {width}x{height} destination")]
    Destination { rect: Rect, coord: Coord, width: usize, height: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    // Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    // Updating the window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    // Decoding or encoding a surface image failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    // Surface too large for the image crate's u32 dimensions
    #[error("Surface {width}x{height} cannot be encoded as an image")]
    ImageSize { width: usize, height: usize },

    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// True for the caller-error family raised by surface operations.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Error::OutOfBounds(_))
    }
}
