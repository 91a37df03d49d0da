//! Attachment operations (v1 content API).

use rand::RngExt;
use tracing::info;

use super::{ConfluenceClient, parse_json, read_response};
use crate::error::ConfluenceError;
use crate::types::{Attachment, AttachmentUpload, Results};

impl ConfluenceClient {
    /// Upload or update attachment (upsert by filename).
    pub(crate) fn post_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        let existing = self.find_attachment_by_name(page_id, filename)?;

        let path = if let Some(att) = &existing {
            info!("Updating existing attachment '{}' (id={})", filename, att.id);
            format!("/wiki/rest/api/content/{page_id}/child/attachment/{}/data", att.id)
        } else {
            info!("Uploading new attachment '{}' to page {}", filename, page_id);
            format!("/wiki/rest/api/content/{page_id}/child/attachment")
        };

        let boundary = format!("----MdpubFormBoundary{:016x}", rand::rng().random::<u64>());
        let body = multipart_body(&boundary, filename, content_type, data);

        let response = self
            .agent
            .post(self.url(&path))
            .header("Authorization", &self.auth_header)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("X-Atlassian-Token", "nocheck")
            .header("Accept", "application/json")
            .send(&body[..])?;

        let text = read_response("POST", &path, response)?;
        let upload: AttachmentUpload = parse_json(&text, &path)?;
        upload
            .into_attachment()
            .ok_or(ConfluenceError::EmptyResponse(path))
    }

    /// Find attachment by exact filename on a page.
    fn find_attachment_by_name(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Option<Attachment>, ConfluenceError> {
        let path = format!("/wiki/rest/api/content/{page_id}/child/attachment");
        let attachments: Results<Attachment> =
            self.get_json(&path, &[("filename", filename), ("limit", "5")])?;
        Ok(attachments.results.into_iter().find(|a| a.title == filename))
    }
}

/// Single-file `multipart/form-data` body.
///
/// Double quotes in the filename are replaced so the disposition header
/// stays well formed.
fn multipart_body(boundary: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let safe_filename = filename.replace('"', "_");
    let mut body = Vec::with_capacity(data.len() + 256);

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{safe_filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_multipart_body_layout() {
        let body = multipart_body("XYZ", "Doc Mermaid 01.svg", "image/svg+xml", b"<svg/>");
        assert_eq!(
            String::from_utf8(body).unwrap(),
            concat!(
                "--XYZ\r\n",
                "Content-Disposition: form-data; name=\"file\"; filename=\"Doc Mermaid 01.svg\"\r\n",
                "Content-Type: image/svg+xml\r\n\r\n",
                "<svg/>\r\n",
                "--XYZ--\r\n"
            )
        );
    }

    #[test]
    fn test_multipart_body_replaces_quotes_in_filename() {
        let body = multipart_body("B", "say \"hi\".svg", "image/svg+xml", b"");
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("filename=\"say _hi_.svg\""));
    }

    #[test]
    fn test_multipart_body_keeps_binary_data() {
        let data = [0u8, 159, 146, 150];
        let body = multipart_body("B", "a.bin", "application/octet-stream", &data);
        assert!(body.windows(data.len()).any(|w| w == data));
    }
}
