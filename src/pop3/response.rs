//! Parsing of POP3 server responses

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Outcome of a single-line status response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status<'a> {
    /// `+OK`, with the rest of the line
    Ok(&'a str),
    /// `-ERR`, with the server's explanation
    Err(&'a str),
}

/// Split a status line into its indicator and text.
pub fn parse_status(line: &str) -> Result<Status<'_>> {
    if let Some(rest) = line.strip_prefix("+OK") {
        Ok(Status::Ok(rest.trim()))
    } else if let Some(rest) = line.strip_prefix("-ERR") {
        Ok(Status::Err(rest.trim()))
    } else {
        Err(Error::Protocol(format!("expected +OK or -ERR, got {line:?}")))
    }
}

/// One entry of a `LIST` response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Envelope {
    /// 1-based message number within this session
    pub index: u32,

    /// Size in octets as reported by the server, 0 if omitted
    pub size: u64,
}

impl Envelope {
    /// Parse a scan listing such as `3 1204`.
    ///
    /// The leading message number is required; a missing or unparseable
    /// size is tolerated.
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let index = tokens
            .next()
            .and_then(|t| t.parse::<u32>().ok())
            .ok_or_else(|| Error::Protocol(format!("bad LIST entry {line:?}")))?;
        let size = tokens.next().and_then(|t| t.parse().ok()).unwrap_or(0);

        Ok(Self { index, size })
    }
}

/// Strip the line terminator (`\r\n` or a bare `\n`).
pub fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Undo byte-stuffing of a multi-line response body line.
///
/// Returns `None` for the lone `.` that terminates the response.
pub fn unstuff(line: &[u8]) -> Option<&[u8]> {
    match line {
        b"." => None,
        [b'.', rest @ ..] => Some(rest),
        _ => Some(line),
    }
}
