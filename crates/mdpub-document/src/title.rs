//! Page title derivation.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::front_matter::FrontMatter;

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+?)\s*$").unwrap());
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_]+").unwrap());

const UNTITLED: &str = "Untitled";

/// Derive a page title.
///
/// Candidates in order: the `title` metadata value, the first level-1
/// heading in the body (trailing `#` removed), then the title-cased file
/// stem. Empty candidates fall through; the result is never empty.
#[must_use]
pub fn derive_title(path: &Path, body: &str, metadata: &FrontMatter) -> String {
    if let Some(title) = metadata.get("title").filter(|t| !t.is_empty()) {
        return title.to_owned();
    }

    if let Some(caps) = H1_RE.captures(body) {
        let heading = caps[1].trim().trim_end_matches('#').trim();
        if !heading.is_empty() {
            return heading.to_owned();
        }
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let from_stem = title_from_stem(&stem);
    if from_stem.is_empty() {
        UNTITLED.to_owned()
    } else {
        from_stem
    }
}

/// Turn a file stem into a title: runs of `-`/`_` become a space and every
/// word is title-cased.
///
/// A cased letter following a non-letter is uppercased and any other cased
/// letter is lowercased, so `api_v2-notes` becomes `Api V2 Notes`.
#[must_use]
pub fn title_from_stem(stem: &str) -> String {
    let spaced = SEPARATOR_RE.replace_all(stem, " ");

    let mut title = String::with_capacity(spaced.len());
    let mut after_letter = false;
    for ch in spaced.trim().chars() {
        let cased = ch.is_lowercase() || ch.is_uppercase();
        if cased && after_letter {
            title.extend(ch.to_lowercase());
        } else if cased {
            title.extend(ch.to_uppercase());
        } else {
            title.push(ch);
        }
        after_letter = cased;
    }
    title
}
