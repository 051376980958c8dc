//! Registration, optional NickServ identification and channel join.
//!
//! Every step writes and then blocks on the next server line, so nothing
//! else may read from the connection until [`establish`] returns.

use crate::app::event::{DisplayEvent, DisplaySink};
use crate::irc::error::HandshakeError;
use crate::irc::framer::LineReader;
use crate::irc::message::{self, Inbound, IDENTIFIED_MARKER};
use crate::irc::writer::LineWriter;
use std::time::Duration;
use tokio::io::AsyncRead;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct HandshakeParams {
    pub nickname: String,
    pub channel: String,
    pub credentials: Option<Credentials>,
    /// Bound on the NickServ wait. `None` waits forever.
    pub identify_timeout: Option<Duration>,
}

/// Proof that the session is registered and in the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ready {
    pub identified: bool,
}

pub async fn establish<R: AsyncRead + Unpin>(
    reader: &mut LineReader<R>,
    writer: &LineWriter,
    params: &HandshakeParams,
    display: &DisplaySink,
) -> Result<Ready, HandshakeError> {
    writer.send_line(&message::nick(&params.nickname)).await?;
    writer.send_line(&message::user(&params.nickname)).await?;
    tracing::debug!(nickname = %params.nickname, "registration sent");

    let banner = read_line(reader, writer, "the welcome banner").await?;
    let _ = display.send(DisplayEvent::Banner(banner));

    let mut identified = false;
    if let Some(creds) = &params.credentials {
        writer
            .send_line(&message::identify(&creds.account, &creds.password))
            .await?;
        tracing::debug!(account = %creds.account, "IDENTIFY sent");

        let wait = wait_for_identified(reader, writer, display);
        match params.identify_timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| HandshakeError::IdentifyTimeout(limit.as_secs()))??,
            None => wait.await?,
        }
        identified = true;
        tracing::info!(account = %creds.account, "identified with NickServ");
    }

    writer.send_line(&message::join(&params.channel)).await?;
    let ack = read_line(reader, writer, "the JOIN acknowledgment").await?;
    let _ = display.send(DisplayEvent::JoinAck(ack));
    tracing::info!(channel = %params.channel, "joined");

    Ok(Ready { identified })
}

async fn wait_for_identified<R: AsyncRead + Unpin>(
    reader: &mut LineReader<R>,
    writer: &LineWriter,
    display: &DisplaySink,
) -> Result<(), HandshakeError> {
    loop {
        let line = read_line(reader, writer, "NickServ identification").await?;
        let done = line.contains(IDENTIFIED_MARKER);
        let _ = display.send(DisplayEvent::Identify(line));
        if done {
            return Ok(());
        }
    }
}

/// Next non-PING line. PINGs that arrive mid-handshake are answered here.
async fn read_line<R: AsyncRead + Unpin>(
    reader: &mut LineReader<R>,
    writer: &LineWriter,
    waiting_for: &'static str,
) -> Result<String, HandshakeError> {
    loop {
        let Some(line) = reader.next_line().await? else {
            return Err(HandshakeError::Closed(waiting_for));
        };
        if let Inbound::Ping(payload) = message::classify(&line) {
            tracing::debug!("PING during handshake");
            writer.send_line(&message::pong(payload)).await?;
            continue;
        }
        return Ok(line);
    }
}
