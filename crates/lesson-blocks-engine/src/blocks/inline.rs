//! Inline markup carried inside rich-text strings.
//!
//! Rich text is trusted markup: the renderer writes it verbatim. These
//! helpers only produce the few marks the authoring widget emits and strip
//! markup back out for plain-text previews.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid break regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineMark {
    Bold,
    Marker,
    InlineCode,
}

/// Wrap already-trusted text in the markup for `mark`
pub fn wrap(mark: InlineMark, text: &str) -> String {
    match mark {
        InlineMark::Bold => format!("<b>{text}</b>"),
        InlineMark::Marker => format!("<mark class=\"cdx-marker\">{text}</mark>"),
        InlineMark::InlineCode => format!("<code class=\"inline-code\">{text}</code>"),
    }
}

/// Plain text of a rich-text string: `<br>` becomes a newline, other tags
/// are dropped and entities decoded.
pub fn strip_markup(text: &str) -> String {
    let text = BREAK.replace_all(text, "\n");
    let text = TAG.replace_all(&text, "");
    html_escape::decode_html_entities(&text).into_owned()
}
