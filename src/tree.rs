//! Typed representation of a parsed message

use crate::charset::{decode_payload, decode_utf8_or_latin1};
use crate::error::{Error, Result};
use crate::header::unfold;
use mailparse::body::Body as EncodedBody;
use mailparse::{DispositionType, MailHeader, ParsedMail};
use tracing::debug;

/// Header fields in message order.
///
/// Names compare case-insensitively and a name may repeat; lookups return
/// the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a field. The value is kept raw, without encoded-word decoding.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First raw value for `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Every raw value for `name`, in message order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_mail_headers(headers: &[MailHeader]) -> Self {
        Self(
            headers
                .iter()
                .map(|h| {
                    let raw = decode_utf8_or_latin1(h.get_value_raw());
                    (h.get_key(), unfold(raw.trim()))
                })
                .collect(),
        )
    }
}

/// Whether a part is meant for inline display or as a detached file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Disposition {
    #[default]
    Inline,
    Attachment,
}

/// A part with a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafPart {
    /// Lowercased MIME type, e.g. `text/plain`
    pub content_type: String,

    /// Declared charset parameter, if any
    pub charset: Option<String>,

    pub disposition: Disposition,

    /// Payload with the transfer encoding already removed
    pub payload: Vec<u8>,
}

impl LeafPart {
    #[must_use]
    pub fn new(content_type: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into().to_ascii_lowercase(),
            charset: None,
            disposition: Disposition::Inline,
            payload: payload.into(),
        }
    }

    #[must_use]
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    #[must_use]
    pub const fn as_attachment(mut self) -> Self {
        self.disposition = Disposition::Attachment;
        self
    }

    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.disposition == Disposition::Attachment
    }

    /// Top-level media type, e.g. `text` for `text/html`
    #[must_use]
    pub fn main_type(&self) -> &str {
        self.content_type
            .split_once('/')
            .map_or(self.content_type.as_str(), |(main, _)| main)
    }

    /// Payload decoded to text through the charset fallback chain
    #[must_use]
    pub fn decode_text(&self) -> String {
        decode_payload(&self.payload, self.charset.as_deref())
    }
}

/// One node of a message tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    Leaf(LeafPart),
    Multipart(Vec<MessagePart>),
}

impl MessagePart {
    /// Visit every leaf depth-first, in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a LeafPart)) {
        match self {
            Self::Leaf(leaf) => visit(leaf),
            Self::Multipart(children) => {
                for child in children {
                    child.walk(visit);
                }
            }
        }
    }

    /// Build a node from a parsed part.
    ///
    /// A `multipart/*` part whose boundary is missing or never appears keeps
    /// its body as a leaf. An embedded `message/rfc822` part becomes a
    /// container holding the parsed inner message.
    fn from_parsed(parsed: &ParsedMail) -> Self {
        if !parsed.subparts.is_empty() {
            return Self::Multipart(parsed.subparts.iter().map(Self::from_parsed).collect());
        }

        let mimetype = parsed.ctype.mimetype.to_ascii_lowercase();
        if mimetype == "message/rfc822" {
            let payload = decoded_payload(parsed);
            match mailparse::parse_mail(&payload) {
                Ok(inner) => return Self::Multipart(vec![Self::from_parsed(&inner)]),
                Err(e) => debug!("Keeping unparseable message/rfc822 part as a leaf: {e}"),
            }
        }

        let disposition = if parsed.get_content_disposition().disposition
            == DispositionType::Attachment
        {
            Disposition::Attachment
        } else {
            Disposition::Inline
        };

        Self::Leaf(LeafPart {
            content_type: mimetype,
            charset: parsed.ctype.params.get("charset").cloned(),
            disposition,
            payload: decoded_payload(parsed),
        })
    }
}

/// A parsed message: root headers plus the body structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTree {
    pub headers: Headers,
    pub root: MessagePart,
}

impl MessageTree {
    /// Parse raw message bytes
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let parsed = mailparse::parse_mail(raw).map_err(|e| Error::Parse(e.to_string()))?;

        Ok(Self {
            headers: Headers::from_mail_headers(&parsed.headers),
            root: MessagePart::from_parsed(&parsed),
        })
    }

    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self.root, MessagePart::Multipart(_))
    }

    /// All leaves, depth-first
    #[must_use]
    pub fn leaves(&self) -> Vec<&LeafPart> {
        let mut leaves = Vec::new();
        self.root.walk(&mut |leaf| leaves.push(leaf));
        leaves
    }
}

/// Transfer-decoded payload, or the still-encoded bytes when the transfer
/// encoding is broken.
fn decoded_payload(parsed: &ParsedMail) -> Vec<u8> {
    parsed.get_body_raw().unwrap_or_else(|e| {
        debug!("Keeping undecoded payload: {e}");
        match parsed.get_body_encoded() {
            EncodedBody::Base64(body) | EncodedBody::QuotedPrintable(body) => body.get_raw().to_vec(),
            EncodedBody::SevenBit(body) | EncodedBody::EightBit(body) => body.get_raw().to_vec(),
            EncodedBody::Binary(body) => body.get_raw().to_vec(),
        }
    })
}
