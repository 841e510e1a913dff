use comrak::{markdown_to_html as render, Options};

/// Render Markdown to an HTML fragment.
///
/// Raw HTML in the source is passed through. GFM tables, strikethrough and
/// autolinks are enabled.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::default();
    options.render.unsafe_ = true;
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;

    render(markdown, &options)
}

/// Wrap an HTML fragment in a complete document.
pub fn wrap_html_document(fragment: &str) -> String {
    format!(
        "<html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
        fragment.trim_end()
    )
}
