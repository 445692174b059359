//! Error types for fetching and exporting mail

use thiserror::Error;

/// Errors that can abort a fetch or export run
#[derive(Error, Debug)]
pub enum Error {
    /// Could not open a TCP connection to the server
    #[error("Failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// TLS setup or handshake failure
    #[error("TLS error: {0}")]
    Tls(String),

    /// The server rejected the username or the secret
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The server answered a command with `-ERR`
    #[error("Server rejected {command}: {message}")]
    Server { command: String, message: String },

    /// The server sent something that is not valid POP3
    #[error("Malformed server response: {0}")]
    Protocol(String),

    /// Failed to parse a retrieved message
    #[error("Failed to parse message structure: {0}")]
    Parse(String),

    /// Failed to serialize export output
    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Socket or file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fetch and export operations
pub type Result<T> = std::result::Result<T, Error>;
