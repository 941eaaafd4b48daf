use ratatui::style::{Color, Modifier, Style};

/// Display attribute for a run of text inside a window line.
///
/// Windows record attributes rather than raw styles so that turning an
/// attribute on and off again can be matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Text,
    Time,
    Them,
    Me,
    Error,
    Online,
    Away,
    Chat,
    Dnd,
    Xa,
    Offline,
}

impl Attr {
    pub fn style(self) -> Style {
        match self {
            Attr::Text => Theme::message_text(),
            Attr::Time => Theme::timestamp(),
            Attr::Them => Theme::nick_other(),
            Attr::Me => Theme::nick_self(),
            Attr::Error => Theme::error_message(),
            Attr::Online => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            Attr::Away => Style::default().fg(Color::Cyan),
            Attr::Chat => Style::default().fg(Color::LightGreen),
            Attr::Dnd => Style::default().fg(Color::Red),
            Attr::Xa => Style::default().fg(Color::Blue),
            Attr::Offline => Style::default().fg(Color::DarkGray),
        }
    }
}

pub struct Theme;

impl Theme {
    pub fn timestamp() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn nick_self() -> Style {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    }

    pub fn nick_other() -> Style {
        Style::default().fg(Color::Magenta)
    }

    pub fn message_text() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn error_message() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn title_bar() -> Style {
        Style::default().fg(Color::White).bg(Color::Blue)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }

    pub fn window_current() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn window_unread() -> Style {
        Style::default().fg(Color::Yellow).bg(Color::DarkGray)
    }

    pub fn input_text() -> Style {
        Style::default().fg(Color::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_attrs_are_distinct() {
        let attrs = [
            Attr::Online,
            Attr::Away,
            Attr::Chat,
            Attr::Dnd,
            Attr::Xa,
            Attr::Offline,
        ];
        for (i, a) in attrs.iter().enumerate() {
            for b in &attrs[i + 1..] {
                assert_ne!(a.style(), b.style(), "{:?} and {:?} share a style", a, b);
            }
        }
    }
}
