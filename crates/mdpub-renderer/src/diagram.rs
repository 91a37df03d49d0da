//! Diagram fence dialect.
//!
//! Fenced blocks tagged `mermaid` or `mmd` are diagram fences. How they render
//! depends on [`DiagramMode`]; in attachment mode each one is recorded as a
//! [`PlannedDiagram`] so the caller can rasterize and upload it later.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a generated attachment filename, in characters.
pub const MAX_FILENAME_CHARS: usize = 180;

/// Smallest image width emitted in an image reference.
pub const MIN_IMAGE_WIDTH: u32 = 240;

/// Largest accepted image width.
pub const MAX_IMAGE_WIDTH: u32 = 4000;

/// Default image width in pixels.
pub const DEFAULT_IMAGE_WIDTH: u32 = 1000;

/// Base name used when the title has no usable characters.
const FALLBACK_BASE: &str = "Diagram";

static DISALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w .()-]+").unwrap());

/// How diagram fences are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DiagramMode {
    /// Ordinary code macro, no special handling.
    #[default]
    Code,
    /// Native mermaid macro embedding the source.
    Macro,
    /// Image reference to an attachment rendered out of band.
    Attachment,
}

impl DiagramMode {
    /// Lowercase name as used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Macro => "macro",
            Self::Attachment => "attachment",
        }
    }
}

impl fmt::Display for DiagramMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown diagram mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagramModeError(String);

impl fmt::Display for ParseDiagramModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown diagram mode '{}' (expected code, macro or attachment)",
            self.0
        )
    }
}

impl std::error::Error for ParseDiagramModeError {}

impl FromStr for DiagramMode {
    type Err = ParseDiagramModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "code" => Ok(Self::Code),
            "macro" => Ok(Self::Macro),
            "attachment" => Ok(Self::Attachment),
            _ => Err(ParseDiagramModeError(s.to_owned())),
        }
    }
}

/// Diagram fence options for a single conversion.
#[derive(Debug, Clone)]
pub struct DiagramOptions {
    /// Rendering mode.
    pub mode: DiagramMode,
    /// Image width for attachment mode.
    pub image_width: u32,
    /// Prefix for generated filenames, normally the document title.
    pub filename_prefix: String,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            mode: DiagramMode::Code,
            image_width: DEFAULT_IMAGE_WIDTH,
            filename_prefix: FALLBACK_BASE.to_owned(),
        }
    }
}

/// A diagram scheduled for out-of-band rendering and upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDiagram {
    /// Attachment filename referenced by the page body.
    pub filename: String,
    /// Diagram source text.
    pub source: String,
}

/// Whether a fence language tag names a diagram.
pub(crate) fn is_diagram_language(lang: &str) -> bool {
    matches!(lang.trim().to_lowercase().as_str(), "mermaid" | "mmd")
}

/// Build the attachment filename for the `index`-th diagram (1-based).
///
/// Characters outside `[\w .()-]` are removed from `prefix`. The base is
/// shortened when needed so the result never exceeds
/// [`MAX_FILENAME_CHARS`] and always keeps its sequence suffix.
pub fn diagram_filename(prefix: &str, index: usize) -> String {
    let cleaned = DISALLOWED_RE.replace_all(prefix, "");
    let mut base = cleaned.trim();
    if base.is_empty() {
        base = FALLBACK_BASE;
    }

    let suffix = format!(" Mermaid {index:02}.svg");
    let budget = MAX_FILENAME_CHARS.saturating_sub(suffix.chars().count());
    let base: String = base.chars().take(budget).collect();
    format!("{}{suffix}", base.trim_end())
}
