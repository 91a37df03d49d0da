//! Local markdown documents for publishing.
//!
//! A [`Document`] is built from one file: optional `---` front matter is
//! parsed into flat key/value metadata, a title is derived, and page
//! references and labels are read from well-known keys.
//!
//! ```
//! use std::path::Path;
//! use mdpub_document::Document;
//!
//! let doc = Document::parse(
//!     Path::new("docs/getting-started.md"),
//!     "---\nlabels: [guide, intro]\n---\n# Welcome\n",
//! );
//! assert_eq!(doc.title, "Welcome");
//! assert_eq!(doc.labels, vec!["guide", "intro"]);
//! ```

mod discover;
mod document;
mod error;
mod front_matter;
mod labels;
mod title;

pub use discover::discover;
pub use document::Document;
pub use error::DocumentError;
pub use front_matter::{FrontMatter, parse_front_matter};
pub use labels::{merge_labels, parse_labels};
pub use title::{derive_title, title_from_stem};
