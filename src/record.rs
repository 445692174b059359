//! Normalized output records

use crate::body::{FallbackJoin, extract_body};
use crate::header::decode_header;
use crate::tree::MessageTree;
use chrono::{DateTime, Utc};
use mailparse::MailAddr;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A mailbox from an address header
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipient {
    /// Decoded display name, empty when absent
    pub name: String,

    /// Address as written, e.g. `john@example.com`
    pub email: String,
}

impl Recipient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Parse a single-mailbox header such as `From`.
    ///
    /// Only the first mailbox is kept. A value that is not valid address
    /// syntax becomes the address verbatim with no name.
    #[must_use]
    pub fn parse_mailbox(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        Self::parse_list(raw).into_iter().next().unwrap_or_default()
    }

    /// Parse an address-list header such as `To` or `Cc`.
    ///
    /// Group syntax is flattened into its member mailboxes.
    #[must_use]
    pub fn parse_list(raw: &str) -> Vec<Self> {
        if raw.trim().is_empty() {
            return Vec::new();
        }

        match mailparse::addrparse(raw) {
            Ok(list) => list
                .iter()
                .flat_map(|addr| match addr {
                    MailAddr::Single(info) => vec![info],
                    MailAddr::Group(group) => group.addrs.iter().collect(),
                })
                .map(|info| {
                    Self::new(
                        decode_header(info.display_name.as_deref().unwrap_or_default()),
                        info.addr.clone(),
                    )
                })
                .collect(),
            Err(e) => {
                debug!("Unparseable address header {raw:?}: {e}");
                vec![Self::new(String::new(), raw.trim())]
            }
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.email)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}

/// One message reduced to clean text fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub subject: String,

    /// Plain text, never markup
    pub body: String,

    pub from_name: String,
    pub from_email: String,

    /// `Date` header as sent, decoded but not reformatted
    pub date: String,

    /// `Message-ID` header verbatim
    pub message_id: String,

    pub to: Vec<Recipient>,
    pub cc: Vec<Recipient>,
}

impl NormalizedRecord {
    /// Build a record from a parsed message
    #[must_use]
    pub fn from_tree(tree: &MessageTree) -> Self {
        let header = |name: &str| tree.headers.get(name).unwrap_or_default();
        let sender = Recipient::parse_mailbox(header("From"));

        let record = Self {
            subject: decode_header(header("Subject")),
            body: extract_body(tree, FallbackJoin::BlankLine),
            from_name: sender.name,
            from_email: sender.email,
            date: decode_header(header("Date")),
            message_id: header("Message-ID").trim().to_string(),
            to: Recipient::parse_list(header("To")),
            cc: Recipient::parse_list(header("Cc")),
        };

        debug!("Built record: {} from {}", record.subject, record.from_email);
        record
    }

    /// The `Date` header as a UTC timestamp, if it is valid RFC 2822
    #[must_use]
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc2822(self.date.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
