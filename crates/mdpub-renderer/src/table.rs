//! Pipe table detection and rendering.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::inline::render_inline;

static SEPARATOR_CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-{3,}:?$").unwrap());

/// Column alignment read from the separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Alignment {
    Left,
    Right,
    Center,
}

impl Alignment {
    fn parse(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Some(Self::Center),
            (false, true) => Some(Self::Right),
            (true, false) => Some(Self::Left),
            (false, false) => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

/// Split a table row into trimmed cells.
///
/// One leading and one trailing pipe are dropped. A backslash makes the next
/// character literal (so `\|` does not split) and is itself removed.
pub(crate) fn split_row(line: &str) -> Vec<String> {
    let mut raw = line.trim();
    raw = raw.strip_prefix('|').unwrap_or(raw);
    raw = raw.strip_suffix('|').unwrap_or(raw);

    let mut cells = Vec::new();
    let mut buf = String::new();
    let mut escaped = false;
    for ch in raw.chars() {
        if escaped {
            buf.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '|' {
            cells.push(buf.trim().to_owned());
            buf.clear();
        } else {
            buf.push(ch);
        }
    }
    cells.push(buf.trim().to_owned());
    cells
}

/// Whether `line` and `next` form a header row followed by a separator row.
pub(crate) fn is_header(line: &str, next: &str) -> bool {
    let row = line.trim();
    let sep = next.trim();
    if !(row.starts_with('|') && sep.starts_with('|')) {
        return false;
    }
    let header_cells = split_row(row);
    let sep_cells = split_row(sep);
    if header_cells.len() < 2 || sep_cells.len() != header_cells.len() {
        return false;
    }
    sep_cells
        .iter()
        .all(|cell| SEPARATOR_CELL_RE.is_match(cell.trim()))
}

/// Whether `line` continues a table body.
pub(crate) fn is_row(line: &str) -> bool {
    line.trim()
        .strip_prefix('|')
        .is_some_and(|rest| rest.contains('|'))
}

/// Render a table from its header line, separator line and body lines.
pub(crate) fn render(header: &str, separator: &str, body: &[&str]) -> String {
    let header_cells = split_row(header);
    let alignments: Vec<Option<Alignment>> = split_row(separator)
        .iter()
        .map(|cell| Alignment::parse(cell))
        .collect();
    let width = header_cells.len();

    let mut out = String::from("<table><thead><tr>");
    for (cell, align) in header_cells.iter().zip(&alignments) {
        push_cell(&mut out, "th", cell, *align);
    }
    out.push_str("</tr></thead><tbody>");

    for line in body {
        let mut cells = split_row(line);
        cells.resize(width, String::new());
        out.push_str("<tr>");
        for (cell, align) in cells.iter().zip(&alignments) {
            push_cell(&mut out, "td", cell, *align);
        }
        out.push_str("</tr>");
    }

    out.push_str("</tbody></table>");
    out
}

fn push_cell(out: &mut String, tag: &str, content: &str, align: Option<Alignment>) {
    let body = render_inline(content);
    match align {
        Some(align) => write!(
            out,
            r#"<{tag} style="text-align:{};">{body}</{tag}>"#,
            align.as_str()
        )
        .unwrap(),
        None => write!(out, "<{tag}>{body}</{tag}>").unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_row_strips_outer_pipes() {
        assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_row_without_outer_pipes() {
        assert_eq!(split_row("a | b"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_row_escaped_pipe() {
        assert_eq!(split_row(r"| a \| b | c |"), vec!["a | b", "c"]);
    }

    #[test]
    fn test_split_row_keeps_empty_cells() {
        assert_eq!(split_row("| a || c |"), vec!["a", "", "c"]);
    }

    #[test]
    fn test_is_header() {
        assert!(is_header("| A | B |", "| --- | :---: |"));
        assert!(is_header("| A | B |", "|:---|---:|"));
    }

    #[test]
    fn test_is_header_rejects_single_column() {
        assert!(!is_header("| A |", "| --- |"));
    }

    #[test]
    fn test_is_header_rejects_count_mismatch() {
        assert!(!is_header("| A | B |", "| --- | --- | --- |"));
    }

    #[test]
    fn test_is_header_rejects_short_dashes() {
        assert!(!is_header("| A | B |", "| -- | --- |"));
    }

    #[test]
    fn test_is_header_requires_leading_pipe() {
        assert!(!is_header("A | B", "| --- | --- |"));
    }

    #[test]
    fn test_is_row() {
        assert!(is_row("| a | b |"));
        assert!(is_row("  |a|"));
        assert!(!is_row("|"));
        assert!(!is_row("a | b"));
    }

    #[test]
    fn test_alignment_parse() {
        assert_eq!(Alignment::parse(":---"), Some(Alignment::Left));
        assert_eq!(Alignment::parse("---:"), Some(Alignment::Right));
        assert_eq!(Alignment::parse(":---:"), Some(Alignment::Center));
        assert_eq!(Alignment::parse("---"), None);
    }

    #[test]
    fn test_render_applies_alignment_to_every_row() {
        let html = render("| L | R |", "|:---|---:|", &["| 1 | 2 |"]);
        assert_eq!(
            html,
            concat!(
                "<table><thead><tr>",
                r#"<th style="text-align:left;">L</th><th style="text-align:right;">R</th>"#,
                "</tr></thead><tbody><tr>",
                r#"<td style="text-align:left;">1</td><td style="text-align:right;">2</td>"#,
                "</tr></tbody></table>"
            )
        );
    }

    #[test]
    fn test_render_pads_short_rows() {
        let html = render("| A | B | C |", "| --- | --- | --- |", &["| 1 |"]);
        assert!(html.contains("<tr><td>1</td><td></td><td></td></tr>"));
    }

    #[test]
    fn test_render_truncates_long_rows() {
        let html = render("| A | B |", "| --- | --- |", &["| 1 | 2 | 3 | 4 |"]);
        assert!(html.contains("<tr><td>1</td><td>2</td></tr>"));
        assert!(!html.contains("<td>3</td>"));
    }

    #[test]
    fn test_render_body_rows_always_match_header_width() {
        let rows = ["| 1 |", "| 1 | 2 |", "| 1 | 2 | 3 |", "| 1 | 2 | 3 | 4 | 5 |"];
        let html = render("| A | B | C |", "| --- | --- | --- |", &rows);
        let body = html.split("<tbody>").nth(1).unwrap();
        for row in body.split("<tr>").skip(1) {
            assert_eq!(row.matches("<td>").count(), 3, "row: {row}");
        }
    }

    #[test]
    fn test_render_header_only() {
        let html = render("| A | B |", "| --- | --- |", &[]);
        assert_eq!(
            html,
            "<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody></tbody></table>"
        );
    }

    #[test]
    fn test_render_cells_use_inline_formatting() {
        let html = render("| **A** | `b` |", "| --- | --- |", &["| <x> | *y* |"]);
        assert!(html.contains("<th><strong>A</strong></th><th><code>b</code></th>"));
        assert!(html.contains("<td>&lt;x&gt;</td><td><em>y</em></td>"));
    }
}
