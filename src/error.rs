//! Error types for the artwork generators

use thiserror::Error;

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing an artwork
#[derive(Error, Debug)]
pub enum Error {
    /// The payload could not be encoded as a QR code
    #[error("QR encoding failed: {0}")]
    EncodeError(String),

    /// Failed to render a scene
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Network error while fetching a remote asset
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Image decoding or encoding failed
    #[error("Image error: {0}")]
    ImageError(String),

    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageError(err.to_string())
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(err: qrcode::types::QrError) -> Self {
        Error::EncodeError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
