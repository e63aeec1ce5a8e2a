//! Error types for voxsculpt

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Failed to export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an I/O error raised while writing `path`
    pub fn export(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Export {
            path: path.into(),
            source,
        }
    }
}
