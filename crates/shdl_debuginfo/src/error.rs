//! Error type for the (rare) failure modes that are not simply handled by
//! falling back to a cache miss.

use std::path::PathBuf;

/// Errors that can occur while writing a debug-info sidecar.
///
/// Loading is deliberately infallible (see [`crate::DebugInfo::load`]) —
/// only writing needs to report failure, since a missing or corrupt
/// sidecar is not itself an error for the caller.
#[derive(Debug, thiserror::Error)]
pub enum DebugInfoError {
    /// An I/O error occurred while writing the sidecar file.
    #[error("debug-info I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The debug-info document could not be serialized to JSON.
    #[error("failed to serialize debug-info sidecar: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
