//! RFC 2047 encoded-word decoding for header values

use tracing::debug;

/// Decode a raw header value that may contain encoded words
/// (`=?charset?B?...?=` or `=?charset?Q?...?=`).
///
/// Never fails: text that cannot be decoded is returned as given, and an
/// empty value decodes to an empty string.
#[must_use]
pub fn decode_header(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    if !raw.contains("=?") {
        return raw.to_string();
    }
    // Encoded words are ASCII by definition; a value that already carries
    // raw 8-bit text is left alone rather than being reinterpreted.
    if !raw.is_ascii() {
        return raw.to_string();
    }

    let line = format!("X-Decode: {raw}");
    match mailparse::parse_header(line.as_bytes()) {
        Ok((header, _)) => header.get_value(),
        Err(e) => {
            debug!("Keeping undecodable header value: {e}");
            raw.to_string()
        }
    }
}

/// Remove folding line breaks from a raw header value.
pub(crate) fn unfold(raw: &str) -> String {
    raw.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}
