//! Label lists.

use std::collections::HashSet;

/// Parse a comma-separated label list.
///
/// The list may be wrapped in `[...]`. Items are trimmed, stripped of
/// surrounding `"` and `'` characters, and dropped when empty. Duplicates
/// are kept; use [`merge_labels`] to deduplicate.
#[must_use]
pub fn parse_labels(raw: &str) -> Vec<String> {
    let mut value = raw.trim();
    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        value = inner;
    }

    value
        .split(',')
        .map(|item| item.trim().trim_matches('"').trim_matches('\''))
        .filter(|label| !label.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Concatenate `base` and `extra`, keeping the first occurrence of each
/// label compared case-insensitively.
#[must_use]
pub fn merge_labels(base: &[String], extra: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    base.iter()
        .chain(extra)
        .filter(|label| seen.insert(label.to_lowercase()))
        .cloned()
        .collect()
}
