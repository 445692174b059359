//! Lightweight HTML to plain text conversion
//!
//! This is not a renderer. It removes markup with a fixed sequence of
//! substitutions so that the same input always produces the same text.

use regex::Regex;

static RAW_TEXT_OPEN: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?is)<(script|style).*?>").unwrap());

static LINE_BREAK: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?i)<\s*br\s*/?\s*>").unwrap());

static BLOCK_CLOSE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?i)</\s*(p|div|h[1-6]|li|tr)\s*>").unwrap());

static ANY_TAG: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?s)<.*?>").unwrap());

static HORIZONTAL_SPACE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"[ \t\r\f]+").unwrap());

static BLANK_LINES: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\n\s*\n\s*").unwrap());

/// Convert an HTML fragment to plain text.
///
/// Entities are unescaped only after tags are stripped, so an escaped
/// `&lt;b&gt;` survives as the literal text `<b>`.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let without_raw_text = strip_script_and_style(html);
    let with_breaks = LINE_BREAK.replace_all(&without_raw_text, "\n");
    let with_blocks = BLOCK_CLOSE.replace_all(&with_breaks, "\n");
    let stripped = ANY_TAG.replace_all(&with_blocks, "");
    let unescaped = html_escape::decode_html_entities(&stripped);
    let spaced = HORIZONTAL_SPACE.replace_all(&unescaped, " ");
    let collapsed = BLANK_LINES.replace_all(spaced.trim(), "\n");

    collapsed.trim().to_string()
}

/// Remove `<script>` and `<style>` elements together with their content.
///
/// An opening tag without a matching `</script>` or `</style>` is left in
/// place and later stripped as an ordinary tag.
fn strip_script_and_style(html: &str) -> String {
    // ASCII lowercasing keeps byte offsets identical to `html`.
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(caps) = RAW_TEXT_OPEN.captures_at(html, pos) {
        let (Some(open), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let close = format!("</{}>", name.as_str().to_ascii_lowercase());

        if let Some(offset) = lower[open.end()..].find(&close) {
            out.push_str(&html[copied..open.start()]);
            copied = open.end() + offset + close.len();
            pos = copied;
        } else {
            // `<` is a single byte, so the next offset is a char boundary.
            pos = open.start() + 1;
        }
    }

    out.push_str(&html[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_with_content() {
        let out = strip_script_and_style("a<script type=\"x\">var s = '<p>';</script>b");
        assert_eq!(out, "ab");
    }

    #[test]
    fn strips_mixed_case_style() {
        let out = strip_script_and_style("a<STYLE>p { color: red }</Style>b");
        assert_eq!(out, "ab");
    }

    #[test]
    fn keeps_unterminated_script_open_tag() {
        let out = strip_script_and_style("a<script>never closed");
        assert_eq!(out, "a<script>never closed");
    }

    #[test]
    fn uses_shortest_span() {
        let out = strip_script_and_style("<style>x</style>keep<style>y</style>");
        assert_eq!(out, "keep");
    }

    #[test]
    fn does_not_close_script_with_style_tag() {
        let out = strip_script_and_style("<script>a</style>b</script>c");
        assert_eq!(out, "c");
    }
}
