//! Mailbox retrieval: enumerate, select newest first, download and parse

use crate::config::SessionConfig;
use crate::error::Result;
use crate::pop3::{self, Envelope, Session};
use crate::tree::MessageTree;
use std::io::{Read, Write};
use tracing::{debug, info, warn};

/// A retrieved and parsed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMessage {
    pub envelope: Envelope,
    pub tree: MessageTree,
}

/// Connect to the configured server and fetch messages newest first.
///
/// The session is closed with `QUIT` whether or not the fetch succeeds.
pub fn fetch_messages(config: &SessionConfig) -> Result<Vec<FetchedMessage>> {
    let transport = pop3::connect(config)?;
    let session = Session::start(transport)?;
    fetch_with_session(session, config)
}

/// Run the fetch over an already greeted session, then quit.
///
/// Errors from `QUIT` are dropped: they are less informative than whatever
/// ended the fetch, and after a successful fetch the data is already in hand.
pub fn fetch_with_session<S: Read + Write>(
    mut session: Session<S>,
    config: &SessionConfig,
) -> Result<Vec<FetchedMessage>> {
    let result = retrieve(&mut session, config);

    if let Err(e) = session.quit() {
        debug!("Ignoring error while closing session: {e}");
    }

    result
}

/// Pick which messages to retrieve: highest indices first, at most `max`.
#[must_use]
pub fn select_newest(mut envelopes: Vec<Envelope>, max: Option<usize>) -> Vec<Envelope> {
    envelopes.sort_by(|a, b| b.index.cmp(&a.index));
    if let Some(max) = max {
        envelopes.truncate(max);
    }
    envelopes
}

fn retrieve<S: Read + Write>(
    session: &mut Session<S>,
    config: &SessionConfig,
) -> Result<Vec<FetchedMessage>> {
    session.login(&config.username, &config.secret)?;

    let listing = session.list()?;
    info!("Mailbox lists {} messages", listing.len());

    let selected = select_newest(listing, config.max_messages);
    let mut messages = Vec::with_capacity(selected.len());

    for envelope in selected {
        let raw = session.retr(envelope.index)?;
        debug!("Retrieved message {} ({} bytes)", envelope.index, raw.len());

        let tree = MessageTree::parse(&raw)?;
        messages.push(FetchedMessage { envelope, tree });
    }

    // Only mark once every message is in hand: QUIT commits deletions even
    // when the run is failing.
    if config.delete_after_fetch && !messages.is_empty() {
        for message in &messages {
            session.dele(message.envelope.index)?;
        }
        warn!("{} messages marked for deletion", messages.len());
    }
    info!("Fetched {} messages", messages.len());
    Ok(messages)
}
