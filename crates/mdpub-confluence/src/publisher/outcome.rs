//! Per-document publishing outcome.

use std::fmt;
use std::path::PathBuf;

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    /// A new page was created.
    Created,
    /// An existing page got a new version.
    Updated,
    /// Nothing was done; the note says why.
    Skipped,
    /// Dry run: a page would be created.
    DryRunCreate,
    /// Dry run: an existing page would be updated.
    DryRunUpdate,
}

impl PublishAction {
    /// Tag printed in result lines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Skipped => "skipped",
            Self::DryRunCreate => "dry-run-create",
            Self::DryRunUpdate => "dry-run-update",
        }
    }
}

impl fmt::Display for PublishAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of publishing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Action taken.
    pub action: PublishAction,
    /// Page id, when a page exists or was created.
    pub page_id: Option<String>,
    /// Document title.
    pub title: String,
    /// Source file.
    pub path: PathBuf,
    /// Optional explanation.
    pub note: Option<String>,
}

impl fmt::Display for PublishOutcome {
    /// `[action] path -> "title" page_id=ID (note)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> \"{}\"",
            self.action,
            self.path.display(),
            self.title
        )?;
        if let Some(page_id) = &self.page_id {
            write!(f, " page_id={page_id}")?;
        }
        if let Some(note) = &self.note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}
