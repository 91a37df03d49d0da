use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DocumentError;
use crate::front_matter::parse_front_matter;
use crate::labels::{merge_labels, parse_labels};
use crate::title::derive_title;

/// Front matter keys naming the parent page.
const PARENT_KEYS: &[&str] = &["parent_id", "parentId"];

/// Front matter keys naming an explicit target page.
const PAGE_KEYS: &[&str] = &["confluence_id", "page_id"];

/// A markdown file prepared for publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Source file.
    pub path: PathBuf,
    /// Page title, never empty.
    pub title: String,
    /// Markdown body without front matter.
    pub body: String,
    /// Parent page id from front matter.
    pub parent_id: Option<String>,
    /// Explicit target page id from front matter.
    pub page_id: Option<String>,
    /// Labels from front matter, in declaration order.
    pub labels: Vec<String>,
}

impl Document {
    /// Build a document from file contents.
    #[must_use]
    pub fn parse(path: &Path, text: &str) -> Self {
        let (metadata, body) = parse_front_matter(text);
        let title = derive_title(path, body, &metadata);

        Self {
            path: path.to_path_buf(),
            title,
            body: body.to_owned(),
            parent_id: metadata.first_non_empty(PARENT_KEYS).map(str::to_owned),
            page_id: metadata.first_non_empty(PAGE_KEYS).map(str::to_owned),
            labels: metadata
                .get("labels")
                .map(|raw| merge_labels(&[], &parse_labels(raw)))
                .unwrap_or_default(),
        }
    }

    /// Read and parse a UTF-8 markdown file.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Read`] if the file cannot be read or is not
    /// valid UTF-8.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(path, &text))
    }
}
