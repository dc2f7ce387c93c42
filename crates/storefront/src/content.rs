//! Markdown rendering for AI chat replies.
//!
//! The reasoning model answers in loose markdown (bold, lists, headings).
//! The chat UI displays the rendered HTML, so the relay response carries
//! both the raw text and this rendering.

use comrak::{Options, markdown_to_html};

/// Render a model reply to HTML.
///
/// Unsafe HTML in the input is escaped by default (comrak's `unsafe_` flag
/// stays off), so model output cannot inject markup.
#[must_use]
pub fn render_reply_html(text: &str) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.render.hardbreaks = true;

    markdown_to_html(text, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_bold_and_lists() {
        let html = render_reply_html("**Tips**\n- wash your face\n- use sunscreen");
        assert!(html.contains("<strong>Tips</strong>"));
        assert!(html.contains("<li>wash your face</li>"));
    }

    #[test]
    fn test_hardbreaks_preserve_line_structure() {
        let html = render_reply_html("line one\nline two");
        assert!(html.contains("<br"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_reply_html("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }
}
