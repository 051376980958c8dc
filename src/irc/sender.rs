//! Outbound half of the session: user input to channel messages.

use crate::app::event::{self, DisplayEvent, DisplaySink};
use crate::irc::message;
use crate::irc::writer::LineWriter;
use tokio::sync::mpsc;

pub struct Sender {
    pub writer: LineWriter,
    pub channel: String,
    pub nickname: String,
    pub timestamp_format: String,
    pub display: DisplaySink,
}

impl Sender {
    /// Forward input lines until the input ends, the connection is closed,
    /// or a write fails.
    pub async fn run(self, mut input: mpsc::Receiver<String>) {
        loop {
            let line = tokio::select! {
                line = input.recv() => line,
                _ = self.writer.closed() => {
                    tracing::debug!("connection closed, input no longer forwarded");
                    break;
                }
            };
            let Some(text) = line else {
                tracing::debug!("end of input");
                break;
            };
            if text.trim().is_empty() {
                continue;
            }
            if let Err(e) = self.send(&text).await {
                tracing::debug!("send failed: {}", e);
                break;
            }
        }
    }

    async fn send(&self, text: &str) -> std::io::Result<()> {
        let escaped = message::escape_outgoing(text);
        self.writer
            .send_line(&message::privmsg(&self.channel, &escaped))
            .await?;

        let _ = self.display.send(DisplayEvent::Echo {
            timestamp: event::timestamp(&self.timestamp_format),
            channel: self.channel.clone(),
            nickname: self.nickname.clone(),
            text: text.to_string(),
        });
        Ok(())
    }
}
