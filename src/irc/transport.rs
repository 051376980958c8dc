//! TCP connection setup with optional TLS.
//!
//! The stream is split into independent read and write halves right away:
//! the router owns the reader, every write goes through one [`LineWriter`].
//!
//! [`LineWriter`]: crate::irc::writer::LineWriter

use crate::irc::error::ConnectionError;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::rustls;
use tokio_rustls::TlsConnector;

pub type BoxedReader = Box<dyn AsyncRead + Send + Sync + Unpin>;
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Sync + Unpin>;

/// How the transport should be established.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportOptions {
    pub secure: bool,
    /// Skip server certificate verification (self-signed test servers).
    pub accept_invalid_certs: bool,
}

/// A live connection to the server, already split into halves.
pub struct Connection {
    pub reader: BoxedReader,
    pub writer: BoxedWriter,
    pub secure: bool,
}

impl Connection {
    /// Wrap any duplex byte stream. Used for plaintext sockets and in tests.
    pub fn from_stream<S>(stream: S, secure: bool) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + Sync + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
            secure,
        }
    }
}

/// Connect to `host:port`, negotiating TLS first when `options.secure` is set.
pub async fn connect(
    host: &str,
    port: u16,
    options: TransportOptions,
) -> Result<Connection, ConnectionError> {
    let addr = format!("{}:{}", host, port);
    tracing::debug!(%addr, secure = options.secure, "connecting");

    let tcp = TcpStream::connect((host, port))
        .await
        .map_err(|source| ConnectionError::Connect {
            addr: addr.clone(),
            source,
        })?;
    let _ = tcp.set_nodelay(true);
    tracing::info!(%addr, "TCP connected");

    if !options.secure {
        return Ok(Connection::from_stream(tcp, false));
    }

    let config = if options.accept_invalid_certs {
        tracing::warn!("TLS certificate verification disabled");
        insecure_client_config()
    } else {
        verified_client_config()
    };
    let connector = TlsConnector::from(Arc::new(config));
    let server_name = rustls::pki_types::ServerName::try_from(host.to_string())
        .map_err(|_| ConnectionError::InvalidServerName(host.to_string()))?;

    let tls = connector
        .connect(server_name, tcp)
        .await
        .map_err(|source| ConnectionError::Tls {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(%addr, "TLS handshake complete");

    Ok(Connection::from_stream(tls, true))
}

fn verified_client_config() -> rustls::ClientConfig {
    let mut roots = rustls::RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for cert in native.certs {
        if let Err(e) = roots.add(cert) {
            tracing::warn!("Failed to add root cert: {}", e);
        }
    }
    for e in &native.errors {
        tracing::warn!("Error loading native certs: {}", e);
    }
    rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth()
}

fn insecure_client_config() -> rustls::ClientConfig {
    rustls::ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCert))
        .with_no_client_auth()
}

#[derive(Debug)]
struct AcceptAnyCert;

impl rustls::client::danger::ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::aws_lc_rs::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
