//! Terminal display sink.
//!
//! One output line per [`DisplayEvent`]. Chat lines look like
//! `<timestamp> <channel> <nick>: <text>`, with the nick colored by who sent
//! it and whether it mentions us.

mod theme;

use crate::app::event::DisplayEvent;
use crate::config::UiConfig;
use crossterm::style::{ContentStyle, StyledContent};
use crossterm::{cursor, queue, terminal};
use std::io::{self, IsTerminal, Write};
use theme::Theme;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct Display<W: Write> {
    out: W,
    color: bool,
    /// Erase the line the user just typed before echoing it back.
    erase_input: bool,
}

impl<W: Write> Display<W> {
    pub fn new(out: W, color: bool, erase_input: bool) -> Self {
        Self {
            out,
            color,
            erase_input,
        }
    }

    pub fn render(&mut self, event: &DisplayEvent) -> io::Result<()> {
        match event {
            DisplayEvent::Banner(line)
            | DisplayEvent::Identify(line)
            | DisplayEvent::JoinAck(line) => {
                let text = self.styled(Theme::server_text(), line);
                writeln!(self.out, "{}", text)?;
            }
            DisplayEvent::Chat(chat) => {
                let nick_style = if chat.mention {
                    Theme::nick_mention()
                } else {
                    Theme::nick_other()
                };
                let prefix = self.styled(
                    Theme::prefix(),
                    &format!("{} {}", chat.timestamp, chat.target),
                );
                let nick = self.styled(nick_style, &format!("<{}>", chat.sender));
                writeln!(self.out, "{} {}: {}", prefix, nick, chat.content)?;
            }
            DisplayEvent::Echo {
                timestamp,
                channel,
                nickname,
                text,
            } => {
                if self.erase_input {
                    queue!(
                        self.out,
                        cursor::MoveToPreviousLine(1),
                        terminal::Clear(terminal::ClearType::CurrentLine)
                    )?;
                }
                let prefix = self.styled(Theme::prefix(), &format!("{} {}", timestamp, channel));
                let nick = self.styled(Theme::nick_self(), &format!("<{}>", nickname));
                writeln!(self.out, "{} {}: {}", prefix, nick, text)?;
            }
            DisplayEvent::Malformed(_) => {
                let text = self.styled(Theme::error_message(), "Error: Malformed message");
                writeln!(self.out, "{}", text)?;
            }
            DisplayEvent::Status(line) => {
                let text = self.styled(Theme::status(), &format!("*** {}", line));
                writeln!(self.out, "{}", text)?;
            }
        }
        self.out.flush()
    }

    fn styled(&self, style: ContentStyle, text: &str) -> StyledContent<String> {
        let style = if self.color { style } else { ContentStyle::new() };
        StyledContent::new(style, text.to_string())
    }
}

/// Render display events to stdout until every sender is gone.
pub fn spawn_display(mut rx: mpsc::UnboundedReceiver<DisplayEvent>, ui: &UiConfig) -> JoinHandle<()> {
    let stdout = io::stdout();
    let color = ui.color && stdout.is_terminal();
    let erase_input = io::stdin().is_terminal() && stdout.is_terminal();
    let mut display = Display::new(stdout, color, erase_input);

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Err(e) = display.render(&event) {
                tracing::warn!("display write failed: {}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::event::ChatEvent;

    fn render_plain(event: DisplayEvent) -> String {
        let mut display = Display::new(Vec::new(), false, false);
        display.render(&event).unwrap();
        String::from_utf8(display.out).unwrap()
    }

    fn chat(mention: bool) -> DisplayEvent {
        DisplayEvent::Chat(ChatEvent {
            timestamp: "24-01-02 03:04:05".into(),
            sender: "bob".into(),
            target: "#rust".into(),
            content: "hi crab".into(),
            mention,
        })
    }

    #[test]
    fn test_chat_line_layout() {
        assert_eq!(
            render_plain(chat(false)),
            "24-01-02 03:04:05 #rust <bob>: hi crab\n"
        );
    }

    #[test]
    fn test_mention_uses_distinct_style() {
        let render = |ev| {
            let mut display = Display::new(Vec::new(), true, false);
            display.render(&ev).unwrap();
            String::from_utf8(display.out).unwrap()
        };
        let normal = render(chat(false));
        let mention = render(chat(true));
        assert!(normal.contains('\x1b'));
        assert_ne!(normal, mention);
    }

    #[test]
    fn test_echo_and_diagnostics() {
        let echo = DisplayEvent::Echo {
            timestamp: "t".into(),
            channel: "#rust".into(),
            nickname: "crab".into(),
            text: "see: http://x".into(),
        };
        assert_eq!(render_plain(echo), "t #rust <crab>: see: http://x\n");
        assert_eq!(
            render_plain(DisplayEvent::Malformed("PRIVMSG x".into())),
            "Error: Malformed message\n"
        );
        assert_eq!(
            render_plain(DisplayEvent::Banner(":srv 001 crab :Welcome".into())),
            ":srv 001 crab :Welcome\n"
        );
    }

    #[test]
    fn test_echo_erases_typed_line() {
        let mut display = Display::new(Vec::new(), false, true);
        display
            .render(&DisplayEvent::Echo {
                timestamp: "t".into(),
                channel: "#c".into(),
                nickname: "me".into(),
                text: "x".into(),
            })
            .unwrap();
        let out = String::from_utf8(display.out).unwrap();
        assert!(out.starts_with('\x1b'));
        assert!(out.ends_with("t #c <me>: x\n"));
    }
}
