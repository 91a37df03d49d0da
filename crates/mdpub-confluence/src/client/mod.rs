//! Confluence Cloud REST API client.
//!
//! Provides a sync HTTP client using Basic authentication with an account
//! email and API token. All calls share one agent with a fixed timeout and
//! are never retried.

mod attachments;
mod labels;
mod pages;

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;
use ureq::typestate::WithBody;

use crate::error::ConfluenceError;
use crate::service::{CreatePage, PageService, UpdatePage};
use crate::types::{Attachment, Page, Space};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 45;

/// Maximum characters of an error body kept in errors.
const MAX_ERROR_BODY_CHARS: usize = 800;

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl ConfluenceClient {
    /// Create a client for `site`.
    ///
    /// `site` is a host such as `example.atlassian.net`; `https://` is
    /// assumed unless a scheme is given.
    #[must_use]
    pub fn new(site: &str, email: &str, api_token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url(site),
            auth_header: basic_auth(email, api_token),
        }
    }

    /// Site base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` with query parameters and parse the JSON response.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ConfluenceError> {
        debug!(method = "GET", path, "Confluence request");
        let mut request = self
            .agent
            .get(self.url(path))
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json");
        for (key, value) in query {
            request = request.query(*key, *value);
        }

        let text = read_response("GET", path, request.call()?)?;
        parse_json(&text, path)
    }

    /// POST a JSON payload and return the raw response text.
    fn post_json(&self, path: &str, payload: &serde_json::Value) -> Result<String, ConfluenceError> {
        let request = self.agent.post(self.url(path));
        self.send_json("POST", path, request, payload)
    }

    /// PUT a JSON payload and return the raw response text.
    fn put_json(&self, path: &str, payload: &serde_json::Value) -> Result<String, ConfluenceError> {
        let request = self.agent.put(self.url(path));
        self.send_json("PUT", path, request, payload)
    }

    fn send_json(
        &self,
        method: &str,
        path: &str,
        request: ureq::RequestBuilder<WithBody>,
        payload: &serde_json::Value,
    ) -> Result<String, ConfluenceError> {
        debug!(method, path, "Confluence request");
        let payload_bytes = serde_json::to_vec(payload)?;
        let response = request
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        read_response(method, path, response)
    }
}

impl PageService for ConfluenceClient {
    fn get_space_by_key(&self, key: &str) -> Result<Space, ConfluenceError> {
        self.space_by_key(key)
    }

    fn find_page_by_title(
        &self,
        space_id: &str,
        title: &str,
    ) -> Result<Option<Page>, ConfluenceError> {
        self.page_by_title(space_id, title)
    }

    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError> {
        self.page_by_id(page_id)
    }

    fn create_page(&self, request: &CreatePage<'_>) -> Result<Page, ConfluenceError> {
        self.post_page(request)
    }

    fn update_page(&self, request: &UpdatePage<'_>) -> Result<Page, ConfluenceError> {
        self.put_page(request)
    }

    fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ConfluenceError> {
        self.post_labels(page_id, labels)
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        self.post_attachment(page_id, filename, data, content_type)
    }
}

/// Normalize a site host or URL to a base URL.
fn base_url(site: &str) -> String {
    let site = site.trim().trim_end_matches('/');
    if site.starts_with("http://") || site.starts_with("https://") {
        site.to_owned()
    } else {
        format!("https://{site}")
    }
}

/// `Basic` authorization header value.
fn basic_auth(email: &str, api_token: &str) -> String {
    format!("Basic {}", BASE64_STANDARD.encode(format!("{email}:{api_token}")))
}

/// Read a response body, turning error statuses into errors.
fn read_response(
    method: &str,
    path: &str,
    response: ureq::http::Response<ureq::Body>,
) -> Result<String, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::HttpResponse {
            method: method.to_owned(),
            path: path.to_owned(),
            status,
            body: truncate_chars(&error_body, MAX_ERROR_BODY_CHARS),
        });
    }

    Ok(body_reader.read_to_string()?)
}

/// Parse a JSON response body; a blank body is an error.
fn parse_json<T: DeserializeOwned>(text: &str, path: &str) -> Result<T, ConfluenceError> {
    if text.trim().is_empty() {
        return Err(ConfluenceError::EmptyResponse(path.to_owned()));
    }
    Ok(serde_json::from_str(text)?)
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
