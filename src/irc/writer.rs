//! Serialized line writer shared by every task that talks to the server.

use crate::irc::transport::BoxedWriter;
use std::io;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::{watch, Mutex};

/// Cloneable handle to the write half of the connection.
///
/// Each [`send_line`](Self::send_line) writes one complete CRLF-terminated
/// line while holding the lock, so concurrent senders never interleave bytes
/// of different messages. [`close`](Self::close) shuts the stream down once;
/// later writes fail with `NotConnected`.
#[derive(Clone)]
pub struct LineWriter {
    inner: Arc<Mutex<Option<BoxedWriter>>>,
    closed_tx: Arc<watch::Sender<bool>>,
}

impl LineWriter {
    pub fn new(writer: BoxedWriter) -> Self {
        let (closed_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Mutex::new(Some(writer))),
            closed_tx: Arc::new(closed_tx),
        }
    }

    /// Send `line` followed by CRLF. The line itself must not contain CR or LF.
    pub async fn send_line(&self, line: &str) -> io::Result<()> {
        if line.contains(['\r', '\n']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "protocol line contains a line break",
            ));
        }

        let mut guard = self.inner.lock().await;
        let writer = guard
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection closed"))?;

        let mut bytes = Vec::with_capacity(line.len() + 2);
        bytes.extend_from_slice(line.as_bytes());
        bytes.extend_from_slice(b"\r\n");
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        tracing::trace!(line = %redact(line), "sent");
        Ok(())
    }

    /// Shut down the write half. Safe to call from any clone, any number of
    /// times; only the first call touches the stream.
    pub async fn close(&self) {
        let taken = self.inner.lock().await.take();
        if let Some(mut writer) = taken {
            if let Err(e) = writer.shutdown().await {
                tracing::debug!("shutdown after close: {}", e);
            }
            self.closed_tx.send_replace(true);
        }
    }

    pub fn is_closed(&self) -> bool {
        *self.closed_tx.borrow()
    }

    /// Resolves once [`close`](Self::close) has run.
    pub async fn closed(&self) {
        let mut rx = self.closed_tx.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }
}

/// Keep NickServ passwords out of trace output.
fn redact(line: &str) -> &str {
    if line.starts_with("PRIVMSG NickServ :IDENTIFY") {
        "PRIVMSG NickServ :IDENTIFY <redacted>"
    } else {
        line
    }
}
