//! Error types for publishing.

use crate::error::ConfluenceError;

/// Error while publishing one document.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Confluence API error.
    #[error(transparent)]
    Confluence(#[from] ConfluenceError),
    /// The page is already at the highest representable version.
    #[error("Page {page_id} is at version {version} and cannot be updated further")]
    VersionOverflow {
        /// Page that cannot be updated.
        page_id: String,
        /// Its current version.
        version: u32,
    },
}
