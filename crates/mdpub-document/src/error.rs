use std::path::PathBuf;

/// Error reading or discovering documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The file could not be read as UTF-8 text.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The discovery pattern is malformed.
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
