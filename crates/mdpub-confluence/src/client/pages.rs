//! Space and page operations for the Confluence v2 API.

use serde_json::json;
use tracing::info;

use super::{ConfluenceClient, parse_json};
use crate::error::ConfluenceError;
use crate::service::{CreatePage, UpdatePage};
use crate::types::{Page, Results, Space};

/// Page size when searching by title.
const TITLE_SEARCH_LIMIT: &str = "25";

impl ConfluenceClient {
    /// Resolve a space by key.
    pub(crate) fn space_by_key(&self, key: &str) -> Result<Space, ConfluenceError> {
        let response: Results<Space> =
            self.get_json("/wiki/api/v2/spaces", &[("keys", key), ("limit", "1")])?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ConfluenceError::SpaceNotFound(key.to_owned()))
    }

    /// Search current pages in a space by title.
    ///
    /// The service may return near matches; the first exact title match wins,
    /// otherwise the first result is taken.
    pub(crate) fn page_by_title(
        &self,
        space_id: &str,
        title: &str,
    ) -> Result<Option<Page>, ConfluenceError> {
        info!("Searching page '{}' in space {}", title, space_id);
        let response: Results<Page> = self.get_json(
            "/wiki/api/v2/pages",
            &[
                ("space-id", space_id),
                ("status", "current"),
                ("title", title),
                ("limit", TITLE_SEARCH_LIMIT),
            ],
        )?;
        Ok(best_title_match(response.results, title))
    }

    /// Get page by id with its storage body.
    pub(crate) fn page_by_id(&self, page_id: &str) -> Result<Page, ConfluenceError> {
        info!("Getting page {}", page_id);
        let path = format!("/wiki/api/v2/pages/{page_id}");
        self.get_json(&path, &[("body-format", "storage")])
            .map_err(|e| match e {
                ConfluenceError::HttpResponse { status: 404, .. } => ConfluenceError::NotFound {
                    page_id: page_id.to_owned(),
                },
                other => other,
            })
    }

    /// Create a page.
    pub(crate) fn post_page(&self, request: &CreatePage<'_>) -> Result<Page, ConfluenceError> {
        let mut payload = json!({
            "spaceId": request.space_id,
            "status": "current",
            "title": request.title,
            "body": {
                "representation": "storage",
                "value": request.body
            }
        });
        if let Some(parent_id) = request.parent_id {
            payload["parentId"] = json!(parent_id);
        }

        info!("Creating page '{}' in space {}", request.title, request.space_id);
        let path = "/wiki/api/v2/pages";
        let page: Page = parse_json(&self.post_json(path, &payload)?, path)?;
        info!("Created page {}", page.id);
        Ok(page)
    }

    /// Update an existing page to `request.version`.
    pub(crate) fn put_page(&self, request: &UpdatePage<'_>) -> Result<Page, ConfluenceError> {
        let mut payload = json!({
            "id": request.page_id,
            "status": "current",
            "title": request.title,
            "body": {
                "representation": "storage",
                "value": request.body
            },
            "version": {
                "number": request.version,
                "message": request.message
            }
        });
        if let Some(parent_id) = request.parent_id {
            payload["parentId"] = json!(parent_id);
        }

        info!(
            "Updating page {} to version {}",
            request.page_id, request.version
        );
        let path = format!("/wiki/api/v2/pages/{}", request.page_id);
        parse_json(&self.put_json(&path, &payload)?, &path)
    }
}

/// First exact title match, otherwise the first result.
pub(crate) fn best_title_match(pages: Vec<Page>, title: &str) -> Option<Page> {
    let exact = pages.iter().position(|p| p.title == title);
    pages.into_iter().nth(exact.unwrap_or(0))
}
