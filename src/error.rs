//! Error types.
//!
//! Every error in this program is fatal: it is logged once in `main` and the
//! process exits with a non-zero code.

use thiserror::Error;

/// Everything that can go wrong between startup and shutdown.
#[derive(Error, Debug)]
pub enum Error {
    /// SDL2 failed to initialize, create the window or create the GL context.
    #[error("SDL error: {0}")]
    Sdl(String),

    /// The graphics API refused to hand out a vertex array or buffer handle.
    #[error("Failed to allocate GPU resource: {0}")]
    Allocation(String),

    /// An embedded asset is not valid JSON or has the wrong shape.
    #[error("Failed to parse asset: {0}")]
    Asset(#[from] serde_json::Error),

    /// A model in the scene asset references geometry that does not exist.
    #[error("Invalid scene: {0}")]
    Validation(#[from] ValidationError),

    /// The logger could not be installed.
    #[error("Failed to set up logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Problems found when checking a model's geometry before upload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("model '{model}': index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        model: String,
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("model '{model}': {index_count} indices do not form whole triangles")]
    IncompleteTriangle { model: String, index_count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
