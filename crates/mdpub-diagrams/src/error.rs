use std::time::Duration;

/// Failure of a single rendering strategy.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The strategy cannot run in this environment.
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
    /// HTTP transport failure or error status.
    #[error("HTTP error: {0}")]
    Http(String),
    /// Filesystem or process I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The renderer process exceeded its time budget.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// The renderer process exited unsuccessfully.
    #[error("renderer exited with {0}")]
    Exit(String),
    /// The renderer returned something that is not an SVG document.
    #[error("response is not an SVG document")]
    InvalidSvg,
}
