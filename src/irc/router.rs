//! Inbound half of the session: keep-alive replies and chat dispatch.

use crate::app::event::{self, ChatEvent, DisplayEvent, DisplaySink};
use crate::irc::framer::LineReader;
use crate::irc::message::{self, Inbound};
use crate::irc::writer::LineWriter;
use tokio::io::AsyncRead;

pub struct Router<R> {
    pub lines: LineReader<R>,
    pub writer: LineWriter,
    pub nickname: String,
    pub timestamp_format: String,
    pub display: DisplaySink,
}

impl<R: AsyncRead + Unpin> Router<R> {
    /// Read and dispatch lines until the stream ends or a read fails.
    ///
    /// Neither outcome is an error from the session's point of view: it is
    /// the signal to shut down.
    pub async fn run(mut self) {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => self.dispatch(&line).await,
                Ok(None) => {
                    tracing::debug!("server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::debug!("read failed: {}", e);
                    break;
                }
            }
        }
    }

    async fn dispatch(&self, line: &str) {
        match message::classify(line) {
            Inbound::Ping(payload) => {
                tracing::trace!("PING");
                if let Err(e) = self.writer.send_line(&message::pong(payload)).await {
                    tracing::warn!("failed to answer PING: {}", e);
                }
            }
            Inbound::Privmsg(msg) => {
                let chat = ChatEvent {
                    timestamp: event::timestamp(&self.timestamp_format),
                    sender: msg.sender.to_string(),
                    target: msg.target.to_string(),
                    content: msg.content.to_string(),
                    mention: msg.mentions(&self.nickname),
                };
                let _ = self.display.send(DisplayEvent::Chat(chat));
            }
            Inbound::Malformed => {
                tracing::warn!(%line, "malformed PRIVMSG");
                let _ = self.display.send(DisplayEvent::Malformed(line.to_string()));
            }
            Inbound::Other => tracing::trace!(%line, "ignored"),
        }
    }
}
