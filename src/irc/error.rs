use std::io;
use thiserror::Error;

/// Failure to reach the server or to secure the stream.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid TLS server name '{0}'")]
    InvalidServerName(String),
    #[error("TLS handshake with {addr} failed: {source}")]
    Tls {
        addr: String,
        #[source]
        source: io::Error,
    },
}

/// Failure while registering, identifying or joining.
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("I/O error during handshake: {0}")]
    Io(#[from] io::Error),
    #[error("server closed the connection while waiting for {0}")]
    Closed(&'static str),
    #[error("NickServ did not confirm identification within {0}s")]
    IdentifyTimeout(u64),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Handshake(#[from] HandshakeError),
}
