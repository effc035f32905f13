//! Error types for card composition, rendering and export

use thiserror::Error;

/// Result type alias for card operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or exporting a card
#[derive(Error, Debug)]
pub enum Error {
    /// The selected photo is neither a JPG nor a PNG
    #[error("{message}")]
    InvalidPhoto {
        /// User-facing validation message
        message: String,
    },

    /// Failed to read a staged photo into memory
    #[error("Failed to read photo {0}")]
    PhotoRead(String),

    /// Failed to render the card document
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// The rasterization collaborator failed to produce an image
    #[error("Rasterization failed: {0}")]
    RasterError(String),

    /// The print fallback failed
    #[error("Print fallback failed: {0}")]
    PrintError(String),

    /// Export was requested while no card is visible
    #[error("No card has been rendered yet")]
    NoCardRendered,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<askama::Error> for Error {
    fn from(err: askama::Error) -> Self {
        Error::RenderError(err.to_string())
    }
}

