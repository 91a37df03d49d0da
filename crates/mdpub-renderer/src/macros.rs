//! Confluence storage-format macro generation.

use crate::escape::{escape_cdata, escape_html};

/// Code macro: `<ac:structured-macro ac:name="code">` with a language
/// parameter (`none` when the fence has no tag) and a CDATA body.
pub(crate) fn code_macro(lang: &str, code: &str) -> String {
    let lang = if lang.is_empty() { "none" } else { lang };
    format!(
        concat!(
            r#"<ac:structured-macro ac:name="code">"#,
            r#"<ac:parameter ac:name="language">{}</ac:parameter>"#,
            "<ac:plain-text-body><![CDATA[{}]]></ac:plain-text-body>",
            "</ac:structured-macro>"
        ),
        escape_html(lang),
        escape_cdata(code)
    )
}

/// Native mermaid macro embedding the diagram source.
pub(crate) fn mermaid_macro(source: &str) -> String {
    format!(
        concat!(
            r#"<ac:structured-macro ac:name="mermaid">"#,
            "<ac:plain-text-body><![CDATA[{}]]></ac:plain-text-body>",
            "</ac:structured-macro>"
        ),
        escape_cdata(source)
    )
}

/// Centered image referencing a page attachment.
///
/// Generates: `<ac:image ac:align="center" ac:width="{w}"><ri:attachment ri:filename="{f}" /></ac:image>`
pub(crate) fn attachment_image(filename: &str, width: u32) -> String {
    format!(
        r#"<ac:image ac:align="center" ac:width="{}"><ri:attachment ri:filename="{}" /></ac:image>"#,
        width.max(crate::diagram::MIN_IMAGE_WIDTH),
        escape_html(filename)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_code_macro_with_language() {
        assert_eq!(
            code_macro("python", "print('hi')"),
            concat!(
                r#"<ac:structured-macro ac:name="code">"#,
                r#"<ac:parameter ac:name="language">python</ac:parameter>"#,
                "<ac:plain-text-body><![CDATA[print('hi')]]></ac:plain-text-body>",
                "</ac:structured-macro>"
            )
        );
    }

    #[test]
    fn test_code_macro_without_language() {
        let out = code_macro("", "x");
        assert!(out.contains(r#"<ac:parameter ac:name="language">none</ac:parameter>"#));
    }

    #[test]
    fn test_code_macro_escapes_language() {
        let out = code_macro("c<++>", "x");
        assert!(out.contains(">c&lt;++&gt;</ac:parameter>"));
    }

    #[test]
    fn test_code_macro_keeps_cdata_well_formed() {
        let out = code_macro("xml", "<![CDATA[x]]>");
        assert!(out.contains("<![CDATA[<![CDATA[x]]]]><![CDATA[>]]>"));
    }

    #[test]
    fn test_mermaid_macro() {
        assert_eq!(
            mermaid_macro("graph TD\nA-->B"),
            concat!(
                r#"<ac:structured-macro ac:name="mermaid">"#,
                "<ac:plain-text-body><![CDATA[graph TD\nA-->B]]></ac:plain-text-body>",
                "</ac:structured-macro>"
            )
        );
    }

    #[test]
    fn test_attachment_image() {
        assert_eq!(
            attachment_image("Doc Mermaid 01.svg", 1000),
            r#"<ac:image ac:align="center" ac:width="1000"><ri:attachment ri:filename="Doc Mermaid 01.svg" /></ac:image>"#
        );
    }

    #[test]
    fn test_attachment_image_minimum_width() {
        assert!(attachment_image("a.svg", 10).contains(r#"ac:width="240""#));
    }

    #[test]
    fn test_attachment_image_escapes_filename() {
        assert!(attachment_image("Tom & Jerry Mermaid 01.svg", 500)
            .contains(r#"ri:filename="Tom &amp; Jerry Mermaid 01.svg""#));
    }
}
