//! Mermaid diagram rendering for page attachments.
//!
//! Diagram sources are rasterized to SVG by trying an ordered list of
//! [`DiagramRenderer`] strategies: the local `mmdc` CLI, then remote web
//! services (Kroki when configured, then mermaid.ink). When every strategy
//! fails a placeholder image carrying the diagram source is produced, so
//! rendering never fails a publish.

mod error;
mod local;
mod placeholder;
mod rasterizer;
mod remote;

pub use error::RenderError;
pub use local::{DEFAULT_MMDC, LocalCliRenderer};
pub use placeholder::placeholder_svg;
pub use rasterizer::{
    DiagramRasterizer, DiagramRenderer, RasterizerConfig, RenderedImage, SVG_CONTENT_TYPE,
};
pub use remote::{DEFAULT_MERMAID_INK_URL, KrokiRenderer, MermaidInkRenderer, create_agent};
