// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! POP3 mailbox to text corpus
//!
//! Fetches messages from a POP3 server, reduces every message to clean plain
//! text and exports the result as JSON records or as a one-line-per-message
//! corpus for a spam/ham classifier.
//!
//! # Pipeline
//!
//! - [`fetch_messages`] downloads the newest messages and parses each one
//!   into a [`MessageTree`]
//! - [`extract_body`] picks the best text part, converting HTML with
//!   [`html_to_text`]
//! - [`NormalizedRecord::from_tree`] adds decoded headers and addresses
//! - [`write_json`], [`write_corpus`] and [`write_labeled_csv`] export
//!
//! # Example
//!
//! ```rust
//! use pop_corpus::{MessageTree, NormalizedRecord, corpus_line};
//!
//! let raw = b"From: Ann <ann@example.com>\r\nSubject: Hello\r\n\r\nHello, World!!!";
//! let tree = MessageTree::parse(raw).unwrap();
//!
//! let record = NormalizedRecord::from_tree(&tree);
//! assert_eq!(record.from_name, "Ann");
//! assert_eq!(corpus_line(&tree), "hello world");
//! ```

mod body;
mod charset;
mod config;
mod error;
mod export;
mod fetcher;
mod header;
mod html;
mod label;
pub mod pop3;
mod record;
mod tree;

pub use body::{FallbackJoin, extract_body};
pub use charset::decode_payload;
pub use config::{DEFAULT_TIMEOUT, Security, SessionConfig};
pub use error::{Error, Result};
pub use export::{
    LabeledLine, corpus_line, normalize_corpus_text, write_corpus, write_json, write_labeled_csv,
};
pub use fetcher::{FetchedMessage, fetch_messages, fetch_with_session, select_newest};
pub use header::decode_header;
pub use html::html_to_text;
pub use label::Label;
pub use pop3::Envelope;
pub use record::{NormalizedRecord, Recipient};
pub use tree::{Disposition, Headers, LeafPart, MessagePart, MessageTree};
