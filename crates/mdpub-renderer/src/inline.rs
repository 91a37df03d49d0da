//! Inline formatting: code spans, bold and italic.

use std::sync::LazyLock;

use regex::Regex;

use crate::escape::escape_html;

static CODE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static STRONG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

/// Render inline markdown to storage format.
///
/// Backtick spans become `<code>` elements with escaped, otherwise untouched
/// content. Text between spans is escaped first, then `**bold**` and
/// `*italic*` are converted, so user content can never inject markup.
pub fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for caps in CODE_SPAN_RE.captures_iter(text) {
        let span = caps.get(0).unwrap();
        out.push_str(&render_plain(&text[last..span.start()]));
        out.push_str("<code>");
        out.push_str(&escape_html(&caps[1]));
        out.push_str("</code>");
        last = span.end();
    }
    out.push_str(&render_plain(&text[last..]));

    out
}

fn render_plain(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let escaped = escape_html(text);
    let strong = STRONG_RE.replace_all(&escaped, "<strong>$1</strong>");
    EMPHASIS_RE
        .replace_all(&strong, "<em>$1</em>")
        .into_owned()
}
