use crossterm::style::{Attribute, Attributes, Color, ContentStyle};

pub struct Theme;

impl Theme {
    /// Timestamp and channel column of chat lines.
    pub fn prefix() -> ContentStyle {
        style(None, Attribute::Bold.into())
    }

    pub fn nick_other() -> ContentStyle {
        style(Some(Color::Green), Attribute::Bold.into())
    }

    pub fn nick_mention() -> ContentStyle {
        style(Some(Color::Red), Attribute::Bold.into())
    }

    pub fn nick_self() -> ContentStyle {
        style(Some(Color::Yellow), Attribute::Bold.into())
    }

    pub fn server_text() -> ContentStyle {
        style(Some(Color::DarkGrey), Attributes::default())
    }

    pub fn status() -> ContentStyle {
        style(Some(Color::Cyan), Attributes::default())
    }

    pub fn error_message() -> ContentStyle {
        style(Some(Color::Red), Attributes::default())
    }
}

fn style(fg: Option<Color>, attributes: Attributes) -> ContentStyle {
    ContentStyle {
        foreground_color: fg,
        attributes,
        ..ContentStyle::new()
    }
}
