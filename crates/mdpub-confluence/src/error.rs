//! Error types for Confluence integration.

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("{method} {path} failed ({status}): {body}")]
    HttpResponse {
        /// Request method.
        method: String,
        /// Request path without host or query.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// An explicitly referenced page does not exist.
    #[error("Page not found: {page_id}")]
    NotFound {
        /// Requested page id.
        page_id: String,
    },

    /// The space key does not resolve.
    #[error("Space key not found or inaccessible: {0}")]
    SpaceNotFound(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A successful response carried no usable payload.
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}
