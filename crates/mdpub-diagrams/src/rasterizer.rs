//! Ordered fallback chain of diagram renderers.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::RenderError;
use crate::local::{self, LocalCliRenderer};
use crate::placeholder::placeholder_svg;
use crate::remote::{self, KrokiRenderer, MermaidInkRenderer};

/// Content type of every rendered image.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// A strategy that turns mermaid source into SVG bytes.
pub trait DiagramRenderer {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether the strategy can run at all (e.g. its executable exists).
    fn is_available(&self) -> bool {
        true
    }

    /// Render `source` to SVG.
    fn render(&self, source: &str) -> Result<Vec<u8>, RenderError>;
}

/// Settings for the standard renderer chain.
#[derive(Debug, Clone)]
pub struct RasterizerConfig {
    /// mermaid-cli executable name or path.
    pub mmdc: String,
    /// mermaid.ink base URL.
    pub mermaid_ink_url: String,
    /// Kroki base URL; Kroki is skipped when unset.
    pub kroki_url: Option<String>,
    /// Time budget for the local CLI.
    pub local_timeout: Duration,
    /// Time budget for each remote request.
    pub remote_timeout: Duration,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            mmdc: local::DEFAULT_MMDC.to_owned(),
            mermaid_ink_url: remote::DEFAULT_MERMAID_INK_URL.to_owned(),
            kroki_url: None,
            local_timeout: local::DEFAULT_TIMEOUT,
            remote_timeout: remote::DEFAULT_TIMEOUT,
        }
    }
}

/// An SVG image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// SVG bytes.
    pub data: Vec<u8>,
    /// Name of the renderer that produced the image, `None` for the placeholder.
    pub renderer: Option<&'static str>,
}

impl RenderedImage {
    /// Whether every renderer failed and this is the placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.renderer.is_none()
    }

    /// MIME type of [`Self::data`].
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        SVG_CONTENT_TYPE
    }
}

/// Tries each renderer in order and falls back to a placeholder image.
pub struct DiagramRasterizer {
    renderers: Vec<Box<dyn DiagramRenderer>>,
}

impl DiagramRasterizer {
    /// Create a rasterizer from an explicit renderer chain.
    #[must_use]
    pub fn new(renderers: Vec<Box<dyn DiagramRenderer>>) -> Self {
        Self { renderers }
    }

    /// Standard chain: local CLI, Kroki (when configured), mermaid.ink.
    #[must_use]
    pub fn from_config(config: &RasterizerConfig) -> Self {
        let mut renderers: Vec<Box<dyn DiagramRenderer>> = vec![Box::new(
            LocalCliRenderer::new(config.mmdc.clone()).with_timeout(config.local_timeout),
        )];
        if let Some(url) = config.kroki_url.as_deref().filter(|u| !u.is_empty()) {
            renderers.push(Box::new(KrokiRenderer::new(url, config.remote_timeout)));
        }
        renderers.push(Box::new(MermaidInkRenderer::new(
            &config.mermaid_ink_url,
            config.remote_timeout,
        )));
        Self::new(renderers)
    }

    /// Names of the configured renderers, in order.
    #[must_use]
    pub fn renderer_names(&self) -> Vec<&'static str> {
        self.renderers.iter().map(|r| r.name()).collect()
    }

    /// Render `source`, never failing.
    pub fn rasterize(&self, source: &str) -> RenderedImage {
        for renderer in &self.renderers {
            if !renderer.is_available() {
                debug!(renderer = renderer.name(), "Diagram renderer unavailable");
                continue;
            }
            match renderer.render(source) {
                Ok(data) => {
                    debug!(renderer = renderer.name(), bytes = data.len(), "Rendered diagram");
                    return RenderedImage {
                        data,
                        renderer: Some(renderer.name()),
                    };
                }
                Err(e) => warn!(renderer = renderer.name(), error = %e, "Diagram render failed"),
            }
        }

        warn!("All diagram renderers failed, using placeholder");
        RenderedImage {
            data: placeholder_svg(source).into_bytes(),
            renderer: None,
        }
    }
}

impl Default for DiagramRasterizer {
    fn default() -> Self {
        Self::from_config(&RasterizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;

    struct Fixed {
        name: &'static str,
        available: bool,
        result: Option<&'static str>,
        calls: Rc<Cell<usize>>,
    }

    impl Fixed {
        fn boxed(
            name: &'static str,
            available: bool,
            result: Option<&'static str>,
        ) -> (Box<dyn DiagramRenderer>, Rc<Cell<usize>>) {
            let calls = Rc::new(Cell::new(0));
            let renderer = Self {
                name,
                available,
                result,
                calls: Rc::clone(&calls),
            };
            (Box::new(renderer), calls)
        }
    }

    impl DiagramRenderer for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn render(&self, _source: &str) -> Result<Vec<u8>, RenderError> {
            self.calls.set(self.calls.get() + 1);
            self.result
                .map(|svg| svg.as_bytes().to_vec())
                .ok_or(RenderError::InvalidSvg)
        }
    }

    #[test]
    fn test_first_success_wins() {
        let (a, a_calls) = Fixed::boxed("a", true, Some("<svg>a</svg>"));
        let (b, b_calls) = Fixed::boxed("b", true, Some("<svg>b</svg>"));
        let image = DiagramRasterizer::new(vec![a, b]).rasterize("graph TD");

        assert_eq!(image.data, b"<svg>a</svg>");
        assert_eq!(image.renderer, Some("a"));
        assert_eq!(a_calls.get(), 1);
        assert_eq!(b_calls.get(), 0);
    }

    #[test]
    fn test_falls_through_failures_and_unavailable() {
        let (a, a_calls) = Fixed::boxed("a", false, Some("<svg>a</svg>"));
        let (b, _) = Fixed::boxed("b", true, None);
        let (c, _) = Fixed::boxed("c", true, Some("<svg>c</svg>"));
        let image = DiagramRasterizer::new(vec![a, b, c]).rasterize("graph TD");

        assert_eq!(image.renderer, Some("c"));
        assert_eq!(a_calls.get(), 0);
        assert!(!image.is_placeholder());
    }

    #[test]
    fn test_placeholder_when_all_fail() {
        let (a, _) = Fixed::boxed("a", true, None);
        let image = DiagramRasterizer::new(vec![a]).rasterize("graph TD\nA-->B");

        assert!(image.is_placeholder());
        assert_eq!(image.content_type(), "image/svg+xml");
        let svg = String::from_utf8(image.data).unwrap();
        assert!(svg.contains("Mermaid render failed"));
        assert!(svg.contains("A--&gt;B"));
    }

    #[test]
    fn test_empty_chain_yields_placeholder() {
        assert!(DiagramRasterizer::new(Vec::new()).rasterize("x").is_placeholder());
    }

    #[test]
    fn test_standard_chain_order() {
        let config = RasterizerConfig {
            kroki_url: Some("https://kroki.example.com".to_owned()),
            ..RasterizerConfig::default()
        };
        assert_eq!(
            DiagramRasterizer::from_config(&config).renderer_names(),
            vec!["mmdc", "kroki", "mermaid.ink"]
        );
        assert_eq!(
            DiagramRasterizer::default().renderer_names(),
            vec!["mmdc", "mermaid.ink"]
        );
    }
}
