//! Document-to-page reconciliation.
//!
//! [`Publisher`] decides what a single [`Document`](mdpub_document::Document)
//! needs on the remote side and carries it out:
//!
//! 1. Render the body to storage format and merge labels
//! 2. Resolve the existing page (explicit id, or title search)
//! 3. Skip, report a dry run, update to the next version, or create
//! 4. Upload planned diagram attachments and attach labels
//!
//! Exactly one [`PublishOutcome`] is produced per document.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use mdpub_confluence::{ConfluenceClient, PageService, PublishOptions, Publisher};
//! use mdpub_diagrams::DiagramRasterizer;
//! use mdpub_document::Document;
//!
//! let client = ConfluenceClient::new("example.atlassian.net", "me@example.com", "token");
//! let space = client.get_space_by_key("DOCS")?;
//! let rasterizer = DiagramRasterizer::default();
//! let publisher = Publisher::new(&client, &rasterizer, PublishOptions::new(space.id));
//!
//! let doc = Document::from_path(Path::new("docs/guide.md"))?;
//! println!("{}", publisher.publish(&doc)?);
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod outcome;

pub use error::PublishError;
pub use executor::Publisher;
pub use outcome::{PublishAction, PublishOutcome};

use mdpub_renderer::{DEFAULT_IMAGE_WIDTH, DiagramMode, MarkdownEngine};

/// Version comment used when none is configured.
pub const DEFAULT_VERSION_MESSAGE: &str = "Updated by mdpub";

/// Batch-wide publishing options.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Id of the target space.
    pub space_id: String,
    /// Parent page used when a document names none.
    pub default_parent_id: Option<String>,
    /// Labels applied to every page, before document labels.
    pub default_labels: Vec<String>,
    /// Create pages that do not exist yet.
    pub create_if_missing: bool,
    /// Search by title and update pages that already exist.
    pub update_if_title_match: bool,
    /// Report planned actions without changing anything.
    pub dry_run: bool,
    /// Comment stored with each new page version.
    pub version_message: String,
    /// How diagram fences render.
    pub diagram_mode: DiagramMode,
    /// Width of attachment images.
    pub image_width: u32,
    /// Markdown engine for page bodies.
    pub markdown_engine: MarkdownEngine,
}

impl PublishOptions {
    /// Options for `space_id` with default behavior: create and update
    /// enabled, no dry run, diagrams as code.
    #[must_use]
    pub fn new(space_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            default_parent_id: None,
            default_labels: Vec::new(),
            create_if_missing: true,
            update_if_title_match: true,
            dry_run: false,
            version_message: DEFAULT_VERSION_MESSAGE.to_owned(),
            diagram_mode: DiagramMode::Code,
            image_width: DEFAULT_IMAGE_WIDTH,
            markdown_engine: MarkdownEngine::Builtin,
        }
    }
}
