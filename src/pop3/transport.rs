//! TCP and implicit-TLS transports with bounded timeouts

use crate::config::{Security, SessionConfig};
use crate::error::{Error, Result};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use tracing::{debug, info};

/// A connected byte stream to the mail server
#[derive(Debug)]
pub enum Transport {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Read for Transport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(stream) => stream.read(buf),
            Self::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for Transport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(stream) => stream.write(buf),
            Self::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(stream) => stream.flush(),
            Self::Tls(stream) => stream.flush(),
        }
    }
}

/// Open a connection as configured. For TLS the handshake is completed
/// here, so certificate problems surface as [`Error::Tls`].
pub fn connect(config: &SessionConfig) -> Result<Transport> {
    let tcp = connect_tcp(config)?;

    match config.security {
        Security::Plain => {
            info!("Connected to {}:{} without TLS", config.host, config.port);
            Ok(Transport::Plain(tcp))
        }
        Security::Tls => {
            let stream = handshake(&config.host, tcp)?;
            info!("Connected to {}:{} over TLS", config.host, config.port);
            Ok(Transport::Tls(Box::new(stream)))
        }
    }
}

fn connect_tcp(config: &SessionConfig) -> Result<TcpStream> {
    let connect_error = |source| Error::Connect {
        host: config.host.clone(),
        port: config.port,
        source,
    };

    let addrs = (config.host.as_str(), config.port)
        .to_socket_addrs()
        .map_err(connect_error)?;

    let mut last_error = io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses");
    for addr in addrs {
        debug!("Trying {addr}");
        match TcpStream::connect_timeout(&addr, config.timeout) {
            Ok(stream) => {
                stream.set_read_timeout(Some(config.timeout))?;
                stream.set_write_timeout(Some(config.timeout))?;
                return Ok(stream);
            }
            Err(e) => last_error = e,
        }
    }

    Err(connect_error(last_error))
}

fn handshake(host: &str, mut tcp: TcpStream) -> Result<StreamOwned<ClientConnection, TcpStream>> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Tls(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    let server_name =
        ServerName::try_from(host.to_string()).map_err(|e| Error::Tls(e.to_string()))?;
    let mut conn = ClientConnection::new(Arc::new(tls_config), server_name)
        .map_err(|e| Error::Tls(e.to_string()))?;

    while conn.is_handshaking() {
        conn.complete_io(&mut tcp)
            .map_err(|e| Error::Tls(e.to_string()))?;
    }

    Ok(StreamOwned::new(conn, tcp))
}
