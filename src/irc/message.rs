//! Protocol line parsing and formatting.
//!
//! Parsing is plain token splitting on the raw line; every function returns
//! an explicit classification instead of an error so the router can treat
//! malformed input as an ordinary branch.

/// Marker NickServ sends once IDENTIFY succeeded.
pub const IDENTIFIED_MARKER: &str = "You are now identified";

/// Classification of one inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// Keep-alive challenge, with its payload if it carried one.
    Ping(Option<&'a str>),
    Privmsg(Privmsg<'a>),
    /// Contained `PRIVMSG` but no `:` after it.
    Malformed,
    Other,
}

/// The pieces of a PRIVMSG line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Privmsg<'a> {
    pub sender: &'a str,
    pub target: &'a str,
    pub content: &'a str,
}

impl Privmsg<'_> {
    /// True when `nickname` occurs anywhere in the content.
    pub fn mentions(&self, nickname: &str) -> bool {
        self.content.contains(nickname)
    }
}

pub fn classify(line: &str) -> Inbound<'_> {
    if let Some(rest) = line.strip_prefix("PING") {
        return Inbound::Ping(ping_payload(rest));
    }

    let Some(idx) = line.find("PRIVMSG") else {
        return Inbound::Other;
    };
    let head = &line[..idx];
    let tail = &line[idx + "PRIVMSG".len()..];

    match tail.split_once(':') {
        Some((target, content)) => Inbound::Privmsg(Privmsg {
            sender: sender_of(head),
            target: target.trim(),
            content,
        }),
        None => Inbound::Malformed,
    }
}

/// Text between the leading `:` and the first `!` of the prefix.
fn sender_of(head: &str) -> &str {
    let head = head.trim();
    let head = head.strip_prefix(':').unwrap_or(head);
    match head.find('!') {
        Some(bang) => &head[..bang],
        None => head,
    }
}

fn ping_payload(rest: &str) -> Option<&str> {
    let rest = rest.trim();
    let payload = rest.strip_prefix(':').unwrap_or(rest);
    if payload.is_empty() {
        None
    } else {
        Some(payload)
    }
}

/// Make user text safe to send as a trailing parameter: every `:` becomes
/// `:%` and line breaks become spaces.
pub fn escape_outgoing(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ':' => out.push_str(":%"),
            '\n' | '\r' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

pub fn nick(nickname: &str) -> String {
    format!("NICK {}", nickname)
}

pub fn user(nickname: &str) -> String {
    format!("USER {} 0 * :{}", nickname, nickname)
}

pub fn identify(account: &str, password: &str) -> String {
    format!("PRIVMSG NickServ :IDENTIFY {} {}", account, password)
}

pub fn join(channel: &str) -> String {
    format!("JOIN {}", channel)
}

pub fn pong(payload: Option<&str>) -> String {
    match payload {
        Some(p) => format!("PONG :{}", p),
        None => "PONG".to_string(),
    }
}

/// A channel message carrying already-escaped text.
pub fn privmsg(target: &str, escaped: &str) -> String {
    format!("PRIVMSG {} :{}", target, escaped)
}

pub const QUIT: &str = "QUIT";
