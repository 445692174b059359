//! Payload decoding with a charset fallback chain

use encoding_rs::Encoding;
use tracing::debug;

/// Decode a transfer-decoded payload into text.
///
/// The declared charset wins when it names a known encoding; malformed
/// sequences become U+FFFD. With no usable declaration the bytes are read as
/// UTF-8, and bytes that are not UTF-8 are mapped one-to-one through
/// ISO-8859-1 so nothing is lost. Line endings are normalized to `\n`.
#[must_use]
pub fn decode_payload(payload: &[u8], charset: Option<&str>) -> String {
    let text = match charset.and_then(|label| Encoding::for_label(label.trim().as_bytes())) {
        Some(encoding) => {
            let (text, had_errors) = encoding.decode_without_bom_handling(payload);
            if had_errors {
                debug!("Replaced malformed {} sequences", encoding.name());
            }
            text.into_owned()
        }
        None => {
            if let Some(label) = charset {
                debug!("Unknown charset {label:?}, falling back to UTF-8");
            }
            decode_utf8_or_latin1(payload)
        }
    };

    text.replace("\r\n", "\n")
}

/// Strict UTF-8, or ISO-8859-1 byte-for-byte when the bytes are not UTF-8
pub(crate) fn decode_utf8_or_latin1(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => payload.iter().copied().map(char::from).collect(),
    }
}
