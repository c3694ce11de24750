//! Error types for the sample application.

use jsona_graph::JsonaError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and deserializing documents.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The document file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON:API document.
    #[error("Document error: {0}")]
    Document(#[from] JsonaError),

    /// A deserialization task panicked or was cancelled.
    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The document has no primary data, or every primary resource was declined.
    #[error("Document has no primary data")]
    Empty,
}
