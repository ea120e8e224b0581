use scraper::Html;

/// Render an HTML document to its visible text.
///
/// Text nodes are concatenated with newline separators so tokens from
/// adjacent elements never fuse into one. Downstream extraction tolerates
/// arbitrary interior whitespace, so the exact collapsing here is not load
/// bearing beyond that separation.
pub fn page_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut text = String::with_capacity(markup.len() / 4);
    for piece in document.root_element().text() {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        text.push_str(piece);
        text.push('\n');
    }
    text
}
