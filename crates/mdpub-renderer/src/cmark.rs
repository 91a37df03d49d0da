//! `pulldown-cmark` accelerator.
//!
//! Renders GitHub-flavored markdown through `pulldown-cmark`'s HTML writer,
//! replacing code blocks with the same code macro the built-in converter
//! emits. Only used when diagram fences need no special handling.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::macros::code_macro;

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render markdown to XHTML with code blocks as code macros.
pub(crate) fn render(markdown: &str) -> String {
    let mut code: Option<(String, String)> = None;

    let events = Parser::new_ext(markdown, parser_options()).filter_map(|event| match event {
        Event::Start(Tag::CodeBlock(kind)) => {
            let lang = match kind {
                CodeBlockKind::Fenced(info) => {
                    info.split_whitespace().next().unwrap_or_default().to_owned()
                }
                CodeBlockKind::Indented => String::new(),
            };
            code = Some((lang, String::new()));
            None
        }
        Event::Text(text) if code.is_some() => {
            if let Some((_, buf)) = code.as_mut() {
                buf.push_str(&text);
            }
            None
        }
        Event::End(TagEnd::CodeBlock) => {
            let (lang, text) = code.take()?;
            let text = text.strip_suffix('\n').unwrap_or(&text);
            Some(Event::Html(code_macro(&lang, text).into()))
        }
        other => Some(other),
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut out, events);

    if out.trim().is_empty() {
        "<p></p>".to_owned()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let out = render("# Title\n\nHello **world**\n");
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<p>Hello <strong>world</strong></p>"));
    }

    #[test]
    fn test_render_code_block_as_macro() {
        let out = render("```rust\nfn main() {}\n```\n");
        assert!(out.contains(r#"<ac:parameter ac:name="language">rust</ac:parameter>"#));
        assert!(out.contains("<![CDATA[fn main() {}]]>"));
        assert!(!out.contains("<pre>"));
    }

    #[test]
    fn test_render_indented_code_block() {
        let out = render("    let x = 1;\n");
        assert!(out.contains(r#"<ac:parameter ac:name="language">none</ac:parameter>"#));
        assert!(out.contains("<![CDATA[let x = 1;]]>"));
    }

    #[test]
    fn test_render_table() {
        let out = render("| A | B |\n| --- | --- |\n| 1 | 2 |\n");
        assert!(out.contains("<table>"));
        assert!(out.contains("<td>1</td>"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(""), "<p></p>");
    }
}
