//! One complete client session: connect, handshake, duplex, shutdown.

use crate::app::event::{DisplayEvent, DisplaySink};
use crate::irc::error::SessionError;
use crate::irc::framer::LineReader;
use crate::irc::handshake::{self, Credentials, HandshakeParams};
use crate::irc::message;
use crate::irc::router::Router;
use crate::irc::sender::Sender;
use crate::irc::transport::{self, Connection, TransportOptions};
use crate::irc::writer::LineWriter;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub nickname: String,
    pub channel: String,
    pub credentials: Option<Credentials>,
    pub secure: bool,
    pub accept_invalid_certs: bool,
    pub identify_timeout: Option<Duration>,
    pub timestamp_format: String,
}

/// Which side of the duplex ended first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finished {
    Router,
    Sender,
}

/// Connect to the configured server and run until either side ends.
pub async fn run(
    config: &SessionConfig,
    input: mpsc::Receiver<String>,
    display: DisplaySink,
) -> Result<Finished, SessionError> {
    let options = TransportOptions {
        secure: config.secure,
        accept_invalid_certs: config.accept_invalid_certs,
    };
    let conn = transport::connect(&config.host, config.port, options).await?;
    let _ = display.send(DisplayEvent::Status(format!(
        "Connected to {}:{}{}",
        config.host,
        config.port,
        if conn.secure { " (TLS)" } else { "" }
    )));
    run_with_connection(conn, config, input, display).await
}

/// Drive a session over an already established connection.
pub async fn run_with_connection(
    conn: Connection,
    config: &SessionConfig,
    input: mpsc::Receiver<String>,
    display: DisplaySink,
) -> Result<Finished, SessionError> {
    let mut lines = LineReader::new(conn.reader);
    let writer = LineWriter::new(conn.writer);

    let params = HandshakeParams {
        nickname: config.nickname.clone(),
        channel: config.channel.clone(),
        credentials: config.credentials.clone(),
        identify_timeout: config.identify_timeout,
    };
    let ready = match handshake::establish(&mut lines, &writer, &params, &display).await {
        Ok(ready) => ready,
        Err(e) => {
            writer.close().await;
            return Err(e.into());
        }
    };
    tracing::debug!(identified = ready.identified, "handshake complete");

    let router = Router {
        lines,
        writer: writer.clone(),
        nickname: config.nickname.clone(),
        timestamp_format: config.timestamp_format.clone(),
        display: display.clone(),
    };
    let sender = Sender {
        writer: writer.clone(),
        channel: config.channel.clone(),
        nickname: config.nickname.clone(),
        timestamp_format: config.timestamp_format.clone(),
        display: display.clone(),
    };

    let mut router_task = tokio::spawn(router.run());
    let mut sender_task = tokio::spawn(sender.run(input));

    let finished = tokio::select! {
        res = &mut router_task => {
            log_join("router", res);
            Finished::Router
        }
        res = &mut sender_task => {
            log_join("sender", res);
            Finished::Sender
        }
    };
    tracing::info!(?finished, "session ending");

    if !writer.is_closed() {
        if let Err(e) = writer.send_line(message::QUIT).await {
            tracing::debug!("QUIT not sent: {}", e);
        }
    }
    writer.close().await;
    let _ = display.send(DisplayEvent::Status("Disconnected.".to_string()));

    match finished {
        Finished::Router => log_join("sender", sender_task.await),
        Finished::Sender => log_join("router", router_task.await),
    }
    Ok(finished)
}

fn log_join(task: &str, res: Result<(), tokio::task::JoinError>) {
    if let Err(e) = res {
        tracing::error!(task, "task failed: {}", e);
    }
}
