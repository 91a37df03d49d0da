use mdpub_renderer::escape_html;

/// Characters of diagram source embedded in the placeholder.
const SOURCE_PREVIEW_CHARS: usize = 300;

/// SVG shown in place of a diagram that could not be rendered.
///
/// A 960x180 grey panel with a headline and the escaped first 300
/// characters of the source.
#[must_use]
pub fn placeholder_svg(source: &str) -> String {
    let preview: String = source.chars().take(SOURCE_PREVIEW_CHARS).collect();
    format!(
        concat!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='960' height='180'>",
            "<rect width='100%' height='100%' fill='#f5f5f5' stroke='#999'/>",
            "<text x='20' y='40' font-family='monospace' font-size='18'>",
            "Mermaid render failed. Showing source below.",
            "</text>",
            "<text x='20' y='80' font-family='monospace' font-size='14'>",
            "{}",
            "</text></svg>"
        ),
        escape_html(&preview)
    )
}
