//! Label operations (v1 content API).

use serde_json::json;
use tracing::info;

use super::ConfluenceClient;
use crate::error::ConfluenceError;

impl ConfluenceClient {
    /// Attach global labels to a page.
    pub(crate) fn post_labels(
        &self,
        page_id: &str,
        labels: &[String],
    ) -> Result<(), ConfluenceError> {
        if labels.is_empty() {
            return Ok(());
        }

        let payload = json!(
            labels
                .iter()
                .map(|name| json!({"prefix": "global", "name": name}))
                .collect::<Vec<_>>()
        );

        info!("Adding {} label(s) to page {}", labels.len(), page_id);
        let path = format!("/wiki/rest/api/content/{page_id}/label");
        self.post_json(&path, &payload)?;
        Ok(())
    }
}
