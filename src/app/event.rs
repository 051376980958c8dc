use chrono::Local;
use std::fmt::Write;
use tokio::sync::mpsc;

/// Receiving end of everything the session wants shown to the user.
pub type DisplaySink = mpsc::UnboundedSender<DisplayEvent>;

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    /// First line the server sent after registration.
    Banner(String),
    /// Server lines read while waiting for NickServ.
    Identify(String),
    /// Server line read right after JOIN.
    JoinAck(String),
    /// A channel or private message from someone.
    Chat(ChatEvent),
    /// Local copy of a message we just sent.
    Echo {
        timestamp: String,
        channel: String,
        nickname: String,
        text: String,
    },
    /// A PRIVMSG line that could not be split.
    Malformed(String),
    /// Client-side status notes (connected, closing, ...).
    Status(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatEvent {
    pub timestamp: String,
    pub sender: String,
    pub target: String,
    pub content: String,
    pub mention: bool,
}

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%y-%m-%d %H:%M:%S";

/// Wall-clock timestamp in the given chrono format. An unusable format falls
/// back to [`DEFAULT_TIMESTAMP_FORMAT`].
pub fn timestamp(format: &str) -> String {
    let now = Local::now();
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", now.format(DEFAULT_TIMESTAMP_FORMAT));
    }
    out
}
