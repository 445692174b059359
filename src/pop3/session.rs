//! Stateful POP3 command session

use super::response::{Envelope, Status, parse_status, trim_line_ending, unstuff};
use crate::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::io::{BufRead, BufReader, Read, Write};
use tracing::debug;

/// A POP3 session over any byte stream.
///
/// Commands are strictly sequential: each one is written and its full
/// response read before the next is sent.
#[derive(Debug)]
pub struct Session<S: Read + Write> {
    stream: BufReader<S>,
}

impl<S: Read + Write> Session<S> {
    /// Wrap a connected stream and consume the server greeting.
    pub fn start(stream: S) -> Result<Self> {
        let mut session = Self {
            stream: BufReader::new(stream),
        };

        let greeting = session.read_text_line()?;
        match parse_status(&greeting)? {
            Status::Ok(banner) => {
                debug!("Server greeting: {banner}");
                Ok(session)
            }
            Status::Err(message) => Err(Error::Server {
                command: "greeting".into(),
                message: message.to_string(),
            }),
        }
    }

    /// `USER` followed by `PASS`. Stops at the first rejection.
    pub fn login(&mut self, username: &str, secret: &SecretString) -> Result<()> {
        self.command(&format!("USER {username}"), "USER")
            .map_err(into_auth_error)?;
        self.command(&format!("PASS {}", secret.expose_secret()), "PASS")
            .map_err(into_auth_error)?;
        debug!("Authenticated as {username}");
        Ok(())
    }

    /// `LIST`: every message in the maildrop, in server order
    pub fn list(&mut self) -> Result<Vec<Envelope>> {
        self.command("LIST", "LIST")?;
        self.read_multiline()?
            .iter()
            .map(|line| Envelope::parse(&String::from_utf8_lossy(line)))
            .collect()
    }

    /// `RETR`: the message with its lines rejoined by CRLF
    pub fn retr(&mut self, index: u32) -> Result<Vec<u8>> {
        self.command(&format!("RETR {index}"), "RETR")?;
        let lines = self.read_multiline()?;
        Ok(lines.join(&b"\r\n"[..]))
    }

    /// `DELE`: mark a message for removal when the session ends
    pub fn dele(&mut self, index: u32) -> Result<()> {
        self.command(&format!("DELE {index}"), "DELE")?;
        Ok(())
    }

    /// `QUIT`: end the session, committing any deletions
    pub fn quit(mut self) -> Result<()> {
        self.command("QUIT", "QUIT")?;
        Ok(())
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    /// Send one command and read its status line.
    ///
    /// `name` is what gets logged and reported, so arguments such as the
    /// secret never leave this function.
    fn command(&mut self, line: &str, name: &str) -> Result<String> {
        debug!("> {name}");
        let writer = self.stream.get_mut();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\r\n")?;
        writer.flush()?;

        let reply = self.read_text_line()?;
        match parse_status(&reply)? {
            Status::Ok(text) => Ok(text.to_string()),
            Status::Err(message) => Err(Error::Server {
                command: name.to_string(),
                message: message.to_string(),
            }),
        }
    }

    fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if self.stream.read_until(b'\n', &mut buf)? == 0 {
            return Err(Error::Protocol("connection closed by server".into()));
        }
        Ok(trim_line_ending(&buf).to_vec())
    }

    fn read_text_line(&mut self) -> Result<String> {
        let line = self.read_line()?;
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    fn read_multiline(&mut self) -> Result<Vec<Vec<u8>>> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line()?;
            match unstuff(&line) {
                Some(content) => lines.push(content.to_vec()),
                None => return Ok(lines),
            }
        }
    }
}

fn into_auth_error(err: Error) -> Error {
    match err {
        Error::Server { message, .. } => Error::Authentication(message),
        other => other,
    }
}
