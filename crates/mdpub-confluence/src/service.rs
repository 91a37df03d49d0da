//! Remote operations used by reconciliation.

use crate::error::ConfluenceError;
use crate::types::{Attachment, Page, Space};

/// Page creation request.
#[derive(Debug, Clone, Copy)]
pub struct CreatePage<'a> {
    /// Target space id.
    pub space_id: &'a str,
    /// Page title.
    pub title: &'a str,
    /// Storage-format body.
    pub body: &'a str,
    /// Optional parent page id.
    pub parent_id: Option<&'a str>,
}

/// Page update request.
#[derive(Debug, Clone, Copy)]
pub struct UpdatePage<'a> {
    /// Page id.
    pub page_id: &'a str,
    /// New title.
    pub title: &'a str,
    /// Storage-format body.
    pub body: &'a str,
    /// New version number (current + 1).
    pub version: u32,
    /// Version comment.
    pub message: &'a str,
    /// Optional parent page id.
    pub parent_id: Option<&'a str>,
}

/// Remote page operations.
///
/// Implemented by [`ConfluenceClient`](crate::ConfluenceClient) and, for
/// tests, by `MockPageService`.
pub trait PageService {
    /// Resolve a space by key.
    fn get_space_by_key(&self, key: &str) -> Result<Space, ConfluenceError>;

    /// Find a current page in a space by title.
    ///
    /// Returns the first exact title match, otherwise the first result.
    fn find_page_by_title(&self, space_id: &str, title: &str)
    -> Result<Option<Page>, ConfluenceError>;

    /// Fetch a page by id.
    ///
    /// Fails with [`ConfluenceError::NotFound`] when the page does not exist.
    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError>;

    /// Create a page.
    fn create_page(&self, request: &CreatePage<'_>) -> Result<Page, ConfluenceError>;

    /// Update a page to the given version.
    fn update_page(&self, request: &UpdatePage<'_>) -> Result<Page, ConfluenceError>;

    /// Attach global labels to a page. Does nothing for an empty list.
    fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ConfluenceError>;

    /// Upload a file attachment, replacing the data of an existing attachment
    /// with the same filename.
    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError>;
}
