//! Flat `key: value` front matter.
//!
//! This is not YAML: every line inside the `---` fences is a single
//! `key: value` pair split at the first colon. Comment lines (`#`), blank
//! lines and lines without a colon are ignored.

use std::collections::BTreeMap;

const DELIMITER: &str = "---";

/// Metadata parsed from a front matter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    entries: BTreeMap<String, String>,
}

impl FrontMatter {
    fn from_block(block: &str) -> Self {
        let mut entries = BTreeMap::new();
        for raw in block.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            entries.insert(key.trim().to_owned(), value.trim().to_owned());
        }
        Self { entries }
    }

    /// Raw value for `key`, possibly empty.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// First non-empty value among `keys`, in order.
    #[must_use]
    pub fn first_non_empty(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|value| !value.is_empty())
    }

    /// Whether no metadata was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Split `text` into front matter and body.
///
/// Front matter exists only when the text starts with `---\n` or `---\r\n`
/// and a later line trims to `---`. The body is everything after the
/// closing line with its original line endings. Without a well-formed
/// block, the metadata is empty and the whole text is the body.
#[must_use]
pub fn parse_front_matter(text: &str) -> (FrontMatter, &str) {
    if !text.starts_with("---\n") && !text.starts_with("---\r\n") {
        return (FrontMatter::default(), text);
    }

    let mut lines = text.split_inclusive('\n');
    let mut offset = lines.next().map_or(0, str::len);
    let block_start = offset;

    for line in lines {
        let line_end = offset + line.len();
        if line.trim() == DELIMITER {
            let metadata = FrontMatter::from_block(&text[block_start..offset]);
            return (metadata, &text[line_end..]);
        }
        offset = line_end;
    }

    (FrontMatter::default(), text)
}
