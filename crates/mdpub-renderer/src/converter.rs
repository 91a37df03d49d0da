//! Built-in line-oriented markdown converter.
//!
//! A cursor walks the body line by line. Line constructs are recognized by
//! their start pattern in a fixed priority order: fence, blank line, table
//! header + separator, heading, bullet, paragraph. The converter never fails:
//! constructs still open at end of input are flushed.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::diagram::{
    DiagramMode, DiagramOptions, PlannedDiagram, diagram_filename, is_diagram_language,
};
use crate::inline::render_inline;
use crate::macros::{attachment_image, code_macro, mermaid_macro};
use crate::table;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s+(.*)$").unwrap());

const FENCE: &str = "```";

/// Output of a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Confluence storage-format markup.
    pub html: String,
    /// Diagrams to render and attach (attachment mode only), in document order.
    pub diagrams: Vec<PlannedDiagram>,
}

/// Convert a markdown body to storage format with the built-in converter.
///
/// Output is deterministic for a given input and options. A body with no
/// recognized blocks renders as a single empty paragraph.
pub fn convert(markdown: &str, options: &DiagramOptions) -> Conversion {
    let markdown = normalize_line_endings(markdown);
    let lines: Vec<&str> = markdown.lines().collect();
    let mut cursor = Cursor::new(options);

    let mut i = 0;
    while i < lines.len() {
        i = cursor.step(&lines, i);
    }

    cursor.finish()
}

/// Rewrite `\r\n` and lone `\r` line endings as `\n`.
fn normalize_line_endings(markdown: &str) -> Cow<'_, str> {
    if markdown.contains('\r') {
        Cow::Owned(markdown.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(markdown)
    }
}

/// Block-level state of the cursor.
enum BlockState<'a> {
    Default,
    InList,
    InCode { lang: String, lines: Vec<&'a str> },
}

struct Cursor<'o, 'a> {
    options: &'o DiagramOptions,
    state: BlockState<'a>,
    parts: Vec<String>,
    diagrams: Vec<PlannedDiagram>,
}

impl<'o, 'a> Cursor<'o, 'a> {
    fn new(options: &'o DiagramOptions) -> Self {
        Self {
            options,
            state: BlockState::Default,
            parts: Vec::new(),
            diagrams: Vec::new(),
        }
    }

    /// Process the line at `i` and return the index of the next unprocessed line.
    fn step(&mut self, lines: &[&'a str], i: usize) -> usize {
        let raw = lines[i];
        let stripped = raw.trim();

        if let Some(rest) = stripped.strip_prefix(FENCE) {
            self.close_list();
            match std::mem::replace(&mut self.state, BlockState::Default) {
                BlockState::InCode { lang, lines } => {
                    let block = self.fenced_block(&lang, &lines.join("\n"));
                    self.parts.push(block);
                }
                _ => {
                    self.state = BlockState::InCode {
                        lang: rest.trim().to_owned(),
                        lines: Vec::new(),
                    };
                }
            }
            return i + 1;
        }

        if let BlockState::InCode { lines: code, .. } = &mut self.state {
            code.push(raw);
            return i + 1;
        }

        if stripped.is_empty() {
            self.close_list();
            return i + 1;
        }

        if let Some(next) = lines.get(i + 1)
            && table::is_header(raw, next)
        {
            self.close_list();
            let mut end = i + 2;
            while end < lines.len() && table::is_row(lines[end]) {
                end += 1;
            }
            self.parts.push(table::render(raw, next, &lines[i + 2..end]));
            return end;
        }

        if let Some(caps) = HEADING_RE.captures(stripped) {
            self.close_list();
            let level = caps[1].len();
            self.parts.push(format!(
                "<h{level}>{}</h{level}>",
                render_inline(caps[2].trim())
            ));
            return i + 1;
        }

        if let Some(caps) = BULLET_RE.captures(stripped) {
            if !matches!(self.state, BlockState::InList) {
                self.parts.push("<ul>".to_owned());
                self.state = BlockState::InList;
            }
            self.parts
                .push(format!("<li>{}</li>", render_inline(caps[1].trim())));
            return i + 1;
        }

        self.close_list();
        self.parts.push(format!("<p>{}</p>", render_inline(stripped)));
        i + 1
    }

    fn close_list(&mut self) {
        if matches!(self.state, BlockState::InList) {
            self.parts.push("</ul>".to_owned());
            self.state = BlockState::Default;
        }
    }

    fn fenced_block(&mut self, lang: &str, code: &str) -> String {
        if is_diagram_language(lang) {
            match self.options.mode {
                DiagramMode::Code => {}
                DiagramMode::Macro => return mermaid_macro(code),
                DiagramMode::Attachment => {
                    let filename =
                        diagram_filename(&self.options.filename_prefix, self.diagrams.len() + 1);
                    let image = attachment_image(&filename, self.options.image_width);
                    self.diagrams.push(PlannedDiagram {
                        filename,
                        source: code.to_owned(),
                    });
                    return image;
                }
            }
        }
        code_macro(lang, code)
    }

    /// Close whatever construct is still open and assemble the output.
    fn finish(mut self) -> Conversion {
        match std::mem::replace(&mut self.state, BlockState::Default) {
            BlockState::Default => {}
            BlockState::InList => self.parts.push("</ul>".to_owned()),
            BlockState::InCode { lang, lines } => {
                let block = self.fenced_block(&lang, &lines.join("\n"));
                self.parts.push(block);
            }
        }

        let html = if self.parts.is_empty() {
            "<p></p>".to_owned()
        } else {
            self.parts.join("\n")
        };

        Conversion {
            html,
            diagrams: self.diagrams,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    use super::*;

    fn html(markdown: &str) -> String {
        convert(markdown, &DiagramOptions::default()).html
    }

    fn with_mode(markdown: &str, mode: DiagramMode, prefix: &str) -> Conversion {
        let options = DiagramOptions {
            mode,
            image_width: 800,
            filename_prefix: prefix.to_owned(),
        };
        convert(markdown, &options)
    }

    /// Parse output wrapped in a namespaced root, failing on malformed XML.
    fn assert_well_formed(html: &str) {
        let doc = format!(
            r#"<root xmlns:ac="http://atlassian.com/content" xmlns:ri="http://atlassian.com/resource/identifier">{html}</root>"#
        );
        let mut reader = Reader::from_str(&doc);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => panic!("malformed output: {e}\n{html}"),
            }
        }
    }

    #[test]
    fn test_heading_then_paragraph() {
        assert_eq!(html("# Hello\nWorld"), "<h1>Hello</h1>\n<p>World</p>");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            html("## Two\n###### Six"),
            "<h2>Two</h2>\n<h6>Six</h6>"
        );
    }

    #[test]
    fn test_seven_hashes_is_paragraph() {
        assert_eq!(html("####### Seven"), "<p>####### Seven</p>");
    }

    #[test]
    fn test_hash_without_space_is_paragraph() {
        assert_eq!(html("#tag"), "<p>#tag</p>");
    }

    #[test]
    fn test_heading_keeps_trailing_hashes() {
        assert_eq!(html("# Title #"), "<h1>Title #</h1>");
    }

    #[test]
    fn test_plain_text_is_single_paragraph() {
        assert_eq!(
            html("Some **bold** & <odd> text"),
            "<p>Some <strong>bold</strong> &amp; &lt;odd&gt; text</p>"
        );
    }

    #[test]
    fn test_empty_input_renders_empty_paragraph() {
        assert_eq!(html(""), "<p></p>");
        assert_eq!(html("\n\n   \n"), "<p></p>");
    }

    #[test]
    fn test_paragraph_lines_are_trimmed() {
        assert_eq!(html("   indented   "), "<p>indented</p>");
    }

    #[test]
    fn test_each_line_is_its_own_paragraph() {
        assert_eq!(html("one\ntwo"), "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn test_bullets_form_one_list() {
        assert_eq!(
            html("- one\n* two\n- `three`"),
            "<ul>\n<li>one</li>\n<li>two</li>\n<li><code>three</code></li>\n</ul>"
        );
    }

    #[test]
    fn test_paragraph_closes_list() {
        assert_eq!(
            html("- a\nafter"),
            "<ul>\n<li>a</li>\n</ul>\n<p>after</p>"
        );
    }

    #[test]
    fn test_blank_line_splits_lists() {
        assert_eq!(
            html("- a\n\n- b"),
            "<ul>\n<li>a</li>\n</ul>\n<ul>\n<li>b</li>\n</ul>"
        );
    }

    #[test]
    fn test_heading_closes_list() {
        assert_eq!(html("- a\n# H"), "<ul>\n<li>a</li>\n</ul>\n<h1>H</h1>");
    }

    #[test]
    fn test_list_closed_at_end_of_input() {
        assert_eq!(html("- last"), "<ul>\n<li>last</li>\n</ul>");
    }

    #[test]
    fn test_dash_without_space_is_paragraph() {
        assert_eq!(html("---"), "<p>---</p>");
        assert_eq!(html("**bold** start"), "<p><strong>bold</strong> start</p>");
    }

    #[test]
    fn test_fenced_code_block() {
        assert_eq!(
            html("```rust\nfn main() {\n    *x* <y>\n}\n```"),
            concat!(
                r#"<ac:structured-macro ac:name="code">"#,
                r#"<ac:parameter ac:name="language">rust</ac:parameter>"#,
                "<ac:plain-text-body><![CDATA[fn main() {\n    *x* <y>\n}]]></ac:plain-text-body>",
                "</ac:structured-macro>"
            )
        );
    }

    #[test]
    fn test_code_block_keeps_raw_lines() {
        let out = html("```\n  indented  \n\n# not a heading\n```");
        assert!(out.contains("<![CDATA[  indented  \n\n# not a heading]]>"));
        assert!(!out.contains("<h1>"));
    }

    #[test]
    fn test_code_block_without_language() {
        assert!(html("```\nx\n```").contains(r#"<ac:parameter ac:name="language">none</ac:parameter>"#));
    }

    #[test]
    fn test_fence_opening_closes_list() {
        let out = html("- item\n```\ncode\n```");
        assert!(out.starts_with("<ul>\n<li>item</li>\n</ul>\n<ac:structured-macro"));
    }

    #[test]
    fn test_unterminated_fence_is_flushed() {
        let out = html("intro\n```python\nprint(1)\nprint(2)");
        assert_eq!(out.matches(r#"ac:name="code""#).count(), 1);
        assert!(out.starts_with("<p>intro</p>\n"));
        assert!(out.contains("<![CDATA[print(1)\nprint(2)]]>"));
        assert!(out.contains(">python</ac:parameter>"));
    }

    #[test]
    fn test_unterminated_empty_fence_is_flushed() {
        let out = html("```");
        assert!(out.contains("<![CDATA[]]>"));
    }

    #[test]
    fn test_cdata_terminator_in_code() {
        let out = html("```\na ]]> b\n```");
        assert!(out.contains("<![CDATA[a ]]]]><![CDATA[> b]]>"));
        assert_well_formed(&out);
    }

    #[test]
    fn test_table() {
        let out = html("| Name | Qty |\n| :--- | ---: |\n| a | 1 |\n| b |\nafter");
        assert_eq!(
            out,
            concat!(
                "<table><thead><tr>",
                r#"<th style="text-align:left;">Name</th><th style="text-align:right;">Qty</th>"#,
                "</tr></thead><tbody>",
                r#"<tr><td style="text-align:left;">a</td><td style="text-align:right;">1</td></tr>"#,
                r#"<tr><td style="text-align:left;">b</td><td style="text-align:right;"></td></tr>"#,
                "</tbody></table>\n<p>after</p>"
            )
        );
    }

    #[test]
    fn test_table_closes_list() {
        let out = html("- a\n| A | B |\n| --- | --- |");
        assert!(out.starts_with("<ul>\n<li>a</li>\n</ul>\n<table>"));
    }

    #[test]
    fn test_pipe_line_without_separator_is_paragraph() {
        assert_eq!(html("| a | b |\ntext"), "<p>| a | b |</p>\n<p>text</p>");
    }

    #[test]
    fn test_table_ends_at_blank_line() {
        let out = html("| A | B |\n| --- | --- |\n| 1 | 2 |\n\n| 3 | 4 |");
        assert!(out.ends_with("</tbody></table>\n<p>| 3 | 4 |</p>"));
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(html("# T\r\nbody\r\n"), "<h1>T</h1>\n<p>body</p>");
    }

    #[test]
    fn test_lone_cr_line_endings() {
        assert_eq!(html("# Title\rBody\r"), "<h1>Title</h1>\n<p>Body</p>");
        assert_eq!(html("- a\r- b\r\rtext"), html("- a\n- b\n\ntext"));
    }

    #[test]
    fn test_mermaid_code_mode_is_plain_code() {
        let conversion = with_mode("```mermaid\ngraph TD\n```", DiagramMode::Code, "Doc");
        assert!(conversion.html.contains(r#"<ac:parameter ac:name="language">mermaid</ac:parameter>"#));
        assert!(conversion.diagrams.is_empty());
    }

    #[test]
    fn test_mermaid_macro_mode() {
        let conversion = with_mode("```Mermaid\ngraph TD\n  A-->B\n```", DiagramMode::Macro, "Doc");
        assert_eq!(
            conversion.html,
            concat!(
                r#"<ac:structured-macro ac:name="mermaid">"#,
                "<ac:plain-text-body><![CDATA[graph TD\n  A-->B]]></ac:plain-text-body>",
                "</ac:structured-macro>"
            )
        );
        assert!(conversion.diagrams.is_empty());
    }

    #[test]
    fn test_non_diagram_fence_in_macro_mode() {
        let conversion = with_mode("```python\nx\n```", DiagramMode::Macro, "Doc");
        assert!(conversion.html.contains(r#"ac:name="code""#));
    }

    #[test]
    fn test_mermaid_attachment_mode() {
        let markdown = "```mermaid\ngraph A\n```\ntext\n```mmd\ngraph B\n```";
        let conversion = with_mode(markdown, DiagramMode::Attachment, "My Doc!!");

        assert_eq!(
            conversion.diagrams,
            vec![
                PlannedDiagram {
                    filename: "My Doc Mermaid 01.svg".to_owned(),
                    source: "graph A".to_owned(),
                },
                PlannedDiagram {
                    filename: "My Doc Mermaid 02.svg".to_owned(),
                    source: "graph B".to_owned(),
                },
            ]
        );
        assert_eq!(
            conversion.html,
            concat!(
                r#"<ac:image ac:align="center" ac:width="800"><ri:attachment ri:filename="My Doc Mermaid 01.svg" /></ac:image>"#,
                "\n<p>text</p>\n",
                r#"<ac:image ac:align="center" ac:width="800"><ri:attachment ri:filename="My Doc Mermaid 02.svg" /></ac:image>"#
            )
        );
    }

    #[test]
    fn test_unterminated_mermaid_fence_is_planned() {
        let conversion = with_mode("```mermaid\ngraph TD", DiagramMode::Attachment, "Doc");
        assert_eq!(conversion.diagrams.len(), 1);
        assert_eq!(conversion.diagrams[0].source, "graph TD");
    }

    #[test]
    fn test_output_is_well_formed() {
        let markdown = "\
# Title with <tags> & \"quotes\"

Intro with `code <b>` and **bold** and *em*.

- item one
- item 'two'

| A | B |
| --- | :---: |
| <x> | y & z |

```xml
<unclosed attr=\"1\">]]>
```

```mermaid
graph TD
```
";
        for mode in [DiagramMode::Code, DiagramMode::Macro, DiagramMode::Attachment] {
            assert_well_formed(&with_mode(markdown, mode, "Doc").html);
        }
    }

    #[test]
    fn test_no_unescaped_special_characters_in_text() {
        let out = html("a < b & c \" d ' e > f");
        assert_eq!(
            out,
            "<p>a &lt; b &amp; c &quot; d &#x27; e &gt; f</p>"
        );
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let markdown = "# A\n- b\n```mermaid\nc\n```";
        let first = with_mode(markdown, DiagramMode::Attachment, "Doc");
        let second = with_mode(markdown, DiagramMode::Attachment, "Doc");
        assert_eq!(first, second);
    }
}
