//! Engine selection for storage-format rendering.

use std::fmt;
use std::str::FromStr;

use crate::cmark;
use crate::converter::{Conversion, convert};
use crate::diagram::{DiagramMode, DiagramOptions};

/// Markdown engine used for page bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MarkdownEngine {
    /// Built-in line-oriented converter.
    #[default]
    Builtin,
    /// `pulldown-cmark` with full GFM support.
    Cmark,
}

impl MarkdownEngine {
    /// Lowercase name as used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Cmark => "cmark",
        }
    }
}

impl fmt::Display for MarkdownEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkdownEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "builtin" => Ok(Self::Builtin),
            "cmark" => Ok(Self::Cmark),
            other => Err(format!(
                "unknown markdown engine '{other}' (expected builtin or cmark)"
            )),
        }
    }
}

/// Renders markdown bodies to Confluence storage format.
///
/// The `cmark` engine only applies when diagram fences render as plain code;
/// the macro and attachment modes always go through the built-in converter,
/// which is the one that understands diagram fences.
#[derive(Debug, Clone, Default)]
pub struct StorageRenderer {
    engine: MarkdownEngine,
    diagrams: DiagramOptions,
}

impl StorageRenderer {
    /// Create a renderer with the built-in engine and code-mode diagrams.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the markdown engine.
    #[must_use]
    pub fn engine(mut self, engine: MarkdownEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Set diagram fence options.
    #[must_use]
    pub fn diagrams(mut self, options: DiagramOptions) -> Self {
        self.diagrams = options;
        self
    }

    /// Engine that will actually be used for the configured diagram mode.
    #[must_use]
    pub fn effective_engine(&self) -> MarkdownEngine {
        match self.diagrams.mode {
            DiagramMode::Code => self.engine,
            DiagramMode::Macro | DiagramMode::Attachment => MarkdownEngine::Builtin,
        }
    }

    /// Render a markdown body.
    pub fn render(&self, markdown: &str) -> Conversion {
        match self.effective_engine() {
            MarkdownEngine::Builtin => convert(markdown, &self.diagrams),
            MarkdownEngine::Cmark => Conversion {
                html: cmark::render(markdown),
                diagrams: Vec::new(),
            },
        }
    }
}
