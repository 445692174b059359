//! Mailbox session configuration

use secrecy::SecretString;
use std::time::Duration;

/// Default timeout for connecting and for each socket read or write
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport security for the POP3 connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Security {
    /// TLS from the first byte (POP3S)
    #[default]
    Tls,
    /// Unencrypted TCP. Credentials travel in cleartext.
    Plain,
}

impl Security {
    /// Well-known port for this mode
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Tls => 995,
            Self::Plain => 110,
        }
    }
}

/// Everything the fetcher needs to open, authenticate and drain a mailbox.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub security: Security,
    pub username: String,
    pub secret: SecretString,
    pub timeout: Duration,

    /// Retrieve at most this many messages, newest first. `None` means all.
    pub max_messages: Option<usize>,

    /// Mark retrieved messages for deletion before quitting
    pub delete_after_fetch: bool,
}

impl SessionConfig {
    /// Implicit TLS on port 995 with a 60 second timeout and no limit
    pub fn new(host: impl Into<String>, username: impl Into<String>, secret: SecretString) -> Self {
        Self {
            host: host.into(),
            port: Security::Tls.default_port(),
            security: Security::Tls,
            username: username.into(),
            secret,
            timeout: DEFAULT_TIMEOUT,
            max_messages: None,
            delete_after_fetch: false,
        }
    }

    /// Switch transport mode. The port follows unless set explicitly later.
    #[must_use]
    pub fn security(mut self, security: Security) -> Self {
        self.security = security;
        self.port = security.default_port();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn max_messages(mut self, max: Option<usize>) -> Self {
        self.max_messages = max;
        self
    }

    #[must_use]
    pub fn delete_after_fetch(mut self, delete: bool) -> Self {
        self.delete_after_fetch = delete;
        self
    }
}
