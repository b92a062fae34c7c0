use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, BlinktError>;

/// Errors surfaced by the pixel store and the frame encoder.
///
/// Out-of-range color and brightness values are never errors; they wrap.
#[derive(Debug)]
pub enum BlinktError {
    /// Pixel index outside `0..NUM_PIXELS`.
    IndexOutOfRange { index: usize },
    /// Brightness-only update (or transmit) touching a slot that was never set.
    PixelNotInitialized { index: usize },
    /// A GPIO line could not be driven.
    Io(io::Error),
}

impl fmt::Display for BlinktError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlinktError::IndexOutOfRange { index } => {
                write!(f, "pixel index {} out of range (0..{})", index, crate::NUM_PIXELS)
            }
            BlinktError::PixelNotInitialized { index } => {
                write!(f, "pixel {} has not been initialized", index)
            }
            BlinktError::Io(e) => write!(f, "port I/O error: {}", e),
        }
    }
}

impl std::error::Error for BlinktError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlinktError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BlinktError {
    fn from(e: io::Error) -> Self {
        BlinktError::Io(e)
    }
}
