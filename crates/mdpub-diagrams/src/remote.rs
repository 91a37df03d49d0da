//! Remote rendering services.
//!
//! - [`MermaidInkRenderer`]: `GET {base}/svg/{source as URL-safe base64}`
//! - [`KrokiRenderer`]: `POST {base}/mermaid/svg` with the source as body

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use ureq::Agent;

use crate::error::RenderError;
use crate::rasterizer::DiagramRenderer;

/// Default mermaid.ink endpoint.
pub const DEFAULT_MERMAID_INK_URL: &str = "https://mermaid.ink";

/// Default time budget for one remote request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Create HTTP agent with the specified timeout.
///
/// Error statuses are returned as responses so the body can be inspected.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Renders diagrams through the mermaid.ink web service.
#[derive(Debug, Clone)]
pub struct MermaidInkRenderer {
    agent: Agent,
    base_url: String,
}

impl MermaidInkRenderer {
    /// Create a renderer for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// URL rendering `source`.
    #[must_use]
    pub fn render_url(&self, source: &str) -> String {
        let encoded = BASE64_URL_SAFE_NO_PAD.encode(source.as_bytes());
        format!("{}/svg/{encoded}", self.base_url)
    }
}

impl Default for MermaidInkRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_MERMAID_INK_URL, DEFAULT_TIMEOUT)
    }
}

impl DiagramRenderer for MermaidInkRenderer {
    fn name(&self) -> &'static str {
        "mermaid.ink"
    }

    fn render(&self, source: &str) -> Result<Vec<u8>, RenderError> {
        let url = self.render_url(source);
        let response = self
            .agent
            .get(&url)
            .header("User-Agent", "Mozilla/5.0")
            .header("Accept", "image/svg+xml")
            .call()
            .map_err(|e| RenderError::Http(e.to_string()))?;

        read_svg(response)
    }
}

/// Renders diagrams through a Kroki server.
#[derive(Debug, Clone)]
pub struct KrokiRenderer {
    agent: Agent,
    base_url: String,
}

impl KrokiRenderer {
    /// Create a renderer for the Kroki server at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

impl DiagramRenderer for KrokiRenderer {
    fn name(&self) -> &'static str {
        "kroki"
    }

    fn render(&self, source: &str) -> Result<Vec<u8>, RenderError> {
        let url = format!("{}/mermaid/svg", self.base_url);
        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(source.as_bytes())
            .map_err(|e| RenderError::Http(e.to_string()))?;

        read_svg(response)
    }
}

/// Read a response body that must be an SVG document.
fn read_svg(response: ureq::http::Response<ureq::Body>) -> Result<Vec<u8>, RenderError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| String::from("(unable to read error body)"));
        return Err(RenderError::Http(format!("HTTP {status}: {error_body}")));
    }

    let data = body
        .read_to_vec()
        .map_err(|e| RenderError::Http(e.to_string()))?;
    if !looks_like_svg(&data) {
        return Err(RenderError::InvalidSvg);
    }
    Ok(data)
}

fn looks_like_svg(data: &[u8]) -> bool {
    String::from_utf8_lossy(data).contains("<svg")
}
