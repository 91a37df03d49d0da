//! Markdown to Confluence storage format conversion.
//!
//! The built-in converter is deliberately small and line oriented: ATX
//! headings, flat bullet lists, GFM pipe tables, fenced code blocks and
//! paragraphs with bold, italic and code-span inline formatting. Anything
//! else is emitted as escaped paragraph text.
//!
//! Fenced blocks tagged `mermaid` or `mmd` are diagram fences and render
//! according to [`DiagramMode`]. In attachment mode, the resulting
//! [`Conversion`] lists the diagrams the caller must render and upload.
//!
//! # Example
//!
//! ```
//! use mdpub_renderer::{DiagramOptions, convert};
//!
//! let conversion = convert("# Hello\n\n**Bold** text", &DiagramOptions::default());
//! assert_eq!(
//!     conversion.html,
//!     "<h1>Hello</h1>\n<p><strong>Bold</strong> text</p>"
//! );
//! ```

mod cmark;
mod converter;
mod diagram;
mod escape;
mod inline;
mod macros;
mod renderer;
mod table;

pub use converter::{Conversion, convert};
pub use diagram::{
    DEFAULT_IMAGE_WIDTH, DiagramMode, DiagramOptions, MAX_FILENAME_CHARS, MAX_IMAGE_WIDTH,
    MIN_IMAGE_WIDTH, ParseDiagramModeError, PlannedDiagram, diagram_filename,
};
pub use escape::escape_html;
pub use inline::render_inline;
pub use renderer::{MarkdownEngine, StorageRenderer};
